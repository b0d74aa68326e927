use clap::Args;
use lapwatch_core::format_duration;

#[derive(Args)]
pub struct FormatArgs {
    /// Milliseconds (negative values clamp to zero)
    #[arg(allow_negative_numbers = true)]
    pub ms: i64,
}

pub fn run(args: FormatArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_duration(args.ms));
    Ok(())
}
