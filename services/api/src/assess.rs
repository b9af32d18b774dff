use careflow::config::AppConfig;
use careflow::error::AppError;
use careflow::risk::features::encode;
use careflow::risk::{
    fuse, ClassifierHandle, ClassifierState, IntakeGuard, RiskAssessment, RuleEngine,
    TemperatureUnit, TrainingReport, TrainingSet, VitalsSnapshot, VitalsSubmission,
};
use clap::Args;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Age in years
    #[arg(long)]
    pub(crate) age: i64,
    /// Biological sex (male or female)
    #[arg(long)]
    pub(crate) sex: String,
    /// Systolic blood pressure in mmHg
    #[arg(long)]
    pub(crate) systolic: i64,
    /// Diastolic blood pressure in mmHg
    #[arg(long)]
    pub(crate) diastolic: i64,
    /// Resting heart rate in beats per minute
    #[arg(long)]
    pub(crate) heart_rate: i64,
    /// Body temperature (Celsius unless --fahrenheit is given)
    #[arg(long)]
    pub(crate) temperature: f64,
    /// Read --temperature as degrees Fahrenheit
    #[arg(long)]
    pub(crate) fahrenheit: bool,
    /// Reported symptom; repeat for several
    #[arg(long = "symptom")]
    pub(crate) symptoms: Vec<String>,
    /// Pre-existing condition; repeat for several
    #[arg(long = "condition")]
    pub(crate) conditions: Vec<String>,
}

impl AssessArgs {
    fn into_submission(self) -> VitalsSubmission {
        VitalsSubmission {
            age: Some(self.age),
            sex: Some(self.sex),
            systolic_bp: Some(self.systolic),
            diastolic_bp: Some(self.diastolic),
            heart_rate: Some(self.heart_rate),
            temperature: Some(self.temperature),
            temperature_unit: if self.fahrenheit {
                TemperatureUnit::Fahrenheit
            } else {
                TemperatureUnit::Celsius
            },
            symptoms: self.symptoms,
            conditions: self.conditions,
        }
    }
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let vitals = IntakeGuard::default().snapshot_from_submission(args.into_submission())?;

    let handle = ClassifierHandle::new();
    let set = TrainingSet::bundled()?;
    let report = handle.train_blocking(&set, &config.classifier)?;
    let prediction = match handle.state() {
        ClassifierState::Ready(classifier) => Some(classifier.predict(&encode(&vitals))),
        _ => None,
    };

    let assessment = fuse(RuleEngine::new().score(&vitals), prediction);
    render_assessment(&vitals, &report, &assessment);
    Ok(())
}

fn render_assessment(
    vitals: &VitalsSnapshot,
    report: &TrainingReport,
    assessment: &RiskAssessment,
) {
    println!("Risk assessment");
    println!(
        "- Vitals: age {} | {}/{} mmHg | {} bpm | {:.1} °C ({:.1} °F)",
        vitals.age,
        vitals.systolic,
        vitals.diastolic,
        vitals.heart_rate,
        vitals.temperature_c,
        vitals.temperature_f()
    );

    println!(
        "\nRule engine: score {}/99 -> {}",
        assessment.rule_score,
        assessment.rule_tier.label()
    );
    if assessment.factors.is_empty() {
        println!("  No contributing factors");
    }
    for factor in &assessment.factors {
        println!("  - {} (weight {})", factor.label, factor.weight);
    }
    for alert in &assessment.alerts {
        println!("  ! {alert}");
    }

    println!(
        "\nClassifier: {} samples, {} epochs, training accuracy {:.0}%",
        report.samples,
        report.epochs,
        report.accuracy * 100.0
    );
    if let Some([low, medium, high]) = assessment.class_probabilities {
        println!(
            "  Low {:.0}% | Medium {:.0}% | High {:.0}%",
            low * 100.0,
            medium * 100.0,
            high * 100.0
        );
    }

    println!(
        "\nFinal tier: {} ({}% confidence, decided by {:?})",
        assessment.tier.label(),
        assessment.confidence,
        assessment.source
    );
    println!("Specialist: {}", assessment.specialist.label());
    println!("Recommendation: {}", assessment.recommendation);
}
