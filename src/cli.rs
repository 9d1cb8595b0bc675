use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "siteaudit")]
#[command(
    about = "Audits configured pages for SEO defects and broken links and files a bug report",
    long_about = None
)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run every day at this local time (HH:MM) instead of once
    #[arg(short, long, value_name = "HH:MM")]
    pub daily_at: Option<String>,

    /// Print the ticket description instead of submitting it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for the run report: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
