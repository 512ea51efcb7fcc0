use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "MLB ELO Processor",
    author = "MLB ELO",
    long_about = "Rates batters and pitchers plate appearance by plate appearance, \
    with a scalar run-value ELO and a multi-facet talent ELO"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        global = true,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Run both rating models over a plate appearance stream
    Process(ProcessArgs),
    /// Compute the base-out run expectancy baseline from a plate appearance stream
    DeriveBaseline(DeriveBaselineArgs)
}

#[derive(clap::Args, Clone, Debug)]
pub struct ProcessArgs {
    #[arg(
        short,
        long,
        env = "PLATE_APPEARANCES",
        help = "JSON file of plate appearances",
        long_help = "JSON array of plate appearance records. Records are sorted by \
        (game_date, pa_id) on load."
    )]
    pub plate_appearances: PathBuf,

    #[arg(short, long, env = "OUTPUT_DIR", default_value = "output", help = "Directory for result files")]
    pub output_dir: PathBuf,

    #[arg(long, env = "ELO_CONFIG", help = "Scalar model configuration override (JSON)")]
    pub elo_config: Option<PathBuf>,

    #[arg(long, env = "TALENT_CONFIG", help = "Facet model configuration override (JSON)")]
    pub talent_config: Option<PathBuf>,

    #[arg(long, env = "RE24_BASELINE", help = "Base-out run expectancy baseline (JSON rows)")]
    pub baseline: Option<PathBuf>,

    #[arg(long, env = "PARK_FACTORS", help = "Park factors by home team (JSON rows)")]
    pub park_factors: Option<PathBuf>,

    #[arg(long, env = "PITCHER_ROLES", help = "Pitcher usage roles (JSON rows)")]
    pub pitcher_roles: Option<PathBuf>,

    /// Resuming from a previous run: these are the player snapshot files
    /// that run wrote. Missing files start from default ratings.
    #[arg(long, env = "ELO_SNAPSHOT", help = "Scalar snapshot to resume from")]
    pub elo_snapshot: Option<PathBuf>,

    #[arg(long, env = "TALENT_SNAPSHOT", help = "Facet snapshot to resume from")]
    pub talent_snapshot: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Only export players seen in this run")]
    pub active_only: bool,

    #[arg(long, action = clap::ArgAction::SetTrue, help = "Reset season facet ratings before processing")]
    pub reset_season: bool,

    #[arg(
        long,
        action = clap::ArgAction::SetTrue,
        help = "Fail on plate appearances out of (game_date, pa_id) order"
    )]
    pub strict_ordering: bool
}

#[derive(clap::Args, Clone, Debug)]
pub struct DeriveBaselineArgs {
    #[arg(short, long, env = "PLATE_APPEARANCES", help = "JSON file of plate appearances")]
    pub plate_appearances: PathBuf,

    #[arg(short, long, default_value = "re24_baseline.json", help = "Where to write the baseline rows")]
    pub output: PathBuf
}
