use glassbox_analysis::config::Mode;

use crate::command::analyze::{self, CommonArgs};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SensitivityArg {
    #[clap(flatten)]
    common: CommonArgs,
    /// Signed number of standard deviations to shift continuous columns
    /// (-3, -2, -1, 1, 2, or 3)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    std_num: i32,
}

pub(crate) fn run(arg: &SensitivityArg) -> anyhow::Result<()> {
    analyze::run_analysis(&arg.common, Mode::Sensitivity, Some(arg.std_num))
}
