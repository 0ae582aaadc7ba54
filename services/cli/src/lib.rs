mod cli;
mod infra;
mod replay;

use finplan::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
