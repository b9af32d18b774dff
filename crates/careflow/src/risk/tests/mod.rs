mod common;
mod fusion;
mod routing;
mod scoring;
