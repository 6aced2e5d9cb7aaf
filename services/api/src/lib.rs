mod cli;
mod infra;
mod routes;
mod score;
mod server;

use contract_performance::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
