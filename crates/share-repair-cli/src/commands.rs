use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "share-repair")]
#[command(
    about = "Diagnose and fix share owners and reshare initiators left behind by ownership transfers",
    long_about = None
)]
pub struct Cli {
    /// Type of issue to find, allowed: all|invalid-owner|invalid-initiator
    #[arg(value_name = "TYPE", default_value = "all")]
    pub issue_type: String,

    /// Perform fix for the issues found
    #[arg(long)]
    pub fix: bool,

    /// Path to the share database (overrides configuration)
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// List every affected share before the totals
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
