use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "study-dashboard")]
#[command(about = "Terminal dashboard for tracking study progress")]
pub struct CliConfig {
    /// Program state file (overrides the config file)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
