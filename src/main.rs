use std::path::Path;

use clap::Parser;
use dotenv::dotenv;
use mlb_elo_processor::{
    args::{Args, Command, DeriveBaselineArgs, ProcessArgs},
    error::ProcessorError,
    model::{
        config::EloConfig,
        corrections::{BaselineRow, ParkFactor, ParkFactorRow, Re24Baseline},
        talent_config::TalentConfig
    },
    pipeline::{self, pitcher_role_map, PipelineInputs, PipelineOptions, PitcherRoleRow},
    store::{
        records::{PlayerEloRecord, TalentPlayerRecord},
        JsonStore
    }
};
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level);

    let result = match args.command {
        Command::Process(process_args) => process(process_args).await,
        Command::DeriveBaseline(baseline_args) => derive_baseline(baseline_args).await
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

async fn load_rows_if_some<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> Result<Option<Vec<T>>, ProcessorError> {
    match path {
        Some(path) => Ok(Some(JsonStore::load_rows(path).await?)),
        None => Ok(None)
    }
}

async fn process(args: ProcessArgs) -> Result<(), ProcessorError> {
    let plate_appearances = JsonStore::load_plate_appearances(&args.plate_appearances).await?;
    let elo_config: EloConfig = JsonStore::load_config(args.elo_config.as_deref()).await?;
    let talent_config: TalentConfig = JsonStore::load_config(args.talent_config.as_deref()).await?;

    let baseline = load_rows_if_some::<BaselineRow>(args.baseline.as_deref())
        .await?
        .map(|rows| Re24Baseline::from_rows(&rows));
    let park_factor = load_rows_if_some::<ParkFactorRow>(args.park_factors.as_deref())
        .await?
        .map(|rows| ParkFactor::from_rows(&rows));
    let pitcher_roles = load_rows_if_some::<PitcherRoleRow>(args.pitcher_roles.as_deref())
        .await?
        .map(|rows| pitcher_role_map(&rows))
        .unwrap_or_default();

    let elo_seed: Vec<PlayerEloRecord> = JsonStore::load_snapshot(args.elo_snapshot.as_deref()).await?;
    let talent_seed: Vec<TalentPlayerRecord> = JsonStore::load_snapshot(args.talent_snapshot.as_deref()).await?;

    let inputs = PipelineInputs {
        plate_appearances: &plate_appearances,
        elo_config: &elo_config,
        talent_config: &talent_config,
        baseline: baseline.as_ref(),
        park_factor: park_factor.as_ref(),
        pitcher_roles: &pitcher_roles,
        elo_seed: &elo_seed,
        talent_seed: &talent_seed
    };
    let options = PipelineOptions {
        active_only: args.active_only,
        reset_season: args.reset_season,
        strict_ordering: args.strict_ordering
    };

    let output = pipeline::run(&inputs, &options)?;

    JsonStore::new(&args.output_dir).save_run(&output).await
}

async fn derive_baseline(args: DeriveBaselineArgs) -> Result<(), ProcessorError> {
    let plate_appearances = JsonStore::load_plate_appearances(&args.plate_appearances).await?;
    let rows = Re24Baseline::derive(&plate_appearances)?;

    let (dir, file_name) = match (args.output.parent(), args.output.file_name()) {
        (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_string_lossy().into_owned()),
        _ => {
            return Err(ProcessorError::InvalidConfig(format!(
                "invalid output path {}",
                args.output.display()
            )))
        }
    };

    let path = JsonStore::new(dir).save(&file_name, &rows).await?;
    info!("Derived baseline for {} base-out states into {}", rows.len(), path.display());

    Ok(())
}
