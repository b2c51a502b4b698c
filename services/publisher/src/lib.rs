mod cli;
mod commands;
mod infra;

use wealth_automation::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
