mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use careflow::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
