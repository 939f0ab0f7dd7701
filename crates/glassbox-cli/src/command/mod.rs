use clap::{Parser, Subcommand};

use self::{
    analyze::AnalyzeArg, generate_data::GenerateDataArg, sensitivity::SensitivityArg,
};

mod analyze;
mod generate_data;
mod sensitivity;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze model prediction errors across groups
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Analyze model sensitivity to synthetic perturbations
    Sensitivity(#[clap(flatten)] SensitivityArg),
    /// Generate a synthetic dataset and matching linear model
    GenerateData(#[clap(flatten)] GenerateDataArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Sensitivity(arg) => sensitivity::run(&arg)?,
        Mode::GenerateData(arg) => generate_data::run(&arg)?,
    }
    Ok(())
}
