use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-guard",
    version,
    about = "Checks untrusted strings before they are used as hyperlink targets"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "link-guard.yaml", global = true)]
    pub config: PathBuf,

    /// Append rejections to this JSON-lines audit file (overrides config file setting)
    #[arg(long, global = true)]
    pub audit_log: Option<PathBuf>,

    /// Log filter, e.g. "debug" (overrides config file setting; RUST_LOG wins over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sanitize candidates given as arguments, or one per stdin line
    Check(CheckArgs),
    /// List the validation rules in evaluation order
    Rules {
        /// Print the rules as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Candidate link targets; read from stdin when omitted
    pub candidates: Vec<String>,

    /// Print one JSON report per candidate instead of the sanitized value
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 if any candidate was rejected
    #[arg(long)]
    pub strict: bool,
}
