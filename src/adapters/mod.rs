#[cfg(feature = "cli")]
pub mod cli;
pub mod share;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
pub fn run() -> Result<(), crate::error::AppError> {
    use crate::adapters::cli::{Args, parse_inputs};
    use crate::treatment::engine::calculate_treatment;

    let args = Args::parse();
    let req = parse_inputs(&args)?;

    let editing = req.edit_id.as_deref().is_some_and(|id| !id.is_empty());
    let out = calculate_treatment(
        &req.pool,
        &req.measurements,
        &req.visual,
        &req.catalog,
        req.history.previous_measurements(editing),
        req.edit_id.as_deref(),
    );

    crate::adapters::cli::print_output(&out, &args)?;

    Ok(())
}
