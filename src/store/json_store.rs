use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::{
    error::ProcessorError,
    model::structures::plate_appearance::PlateAppearance,
    pipeline::RunOutput,
    utils::progress_utils::progress_bar
};

pub const PLAYER_ELO_FILE: &str = "player_elo.json";
pub const ELO_PA_DETAIL_FILE: &str = "elo_pa_detail.json";
pub const ELO_DAILY_OHLC_FILE: &str = "elo_daily_ohlc.json";
pub const TALENT_PLAYER_FILE: &str = "talent_player_current.json";
pub const TALENT_COMPOSITE_FILE: &str = "talent_composite.json";
pub const TALENT_PA_DETAIL_FILE: &str = "talent_pa_detail.json";
pub const TALENT_DAILY_OHLC_FILE: &str = "talent_daily_ohlc.json";

/// Reads inputs from and writes run outputs to JSON files.
pub struct JsonStore {
    output_dir: PathBuf
}

impl JsonStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> JsonStore {
        JsonStore {
            output_dir: output_dir.into()
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ProcessorError> {
        let bytes = fs::read(path).await?;
        let rows: Vec<T> = serde_json::from_slice(&bytes)?;

        debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Loads the PA stream and puts it in `(game_date, pa_id)` order.
    pub async fn load_plate_appearances(path: &Path) -> Result<Vec<PlateAppearance>, ProcessorError> {
        info!("Loading plate appearances from {}", path.display());

        let mut pas: Vec<PlateAppearance> = Self::load_rows(path).await?;
        pas.sort_by_key(|pa| pa.sequence_key());

        info!("Loaded {} plate appearances", pas.len());
        Ok(pas)
    }

    /// Loads a config override, or the built-in defaults when no path is given.
    pub async fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, ProcessorError> {
        match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                let bytes = fs::read(path).await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => Ok(T::default())
        }
    }

    /// Loads snapshot rows to resume from. A missing file means a fresh start.
    pub async fn load_snapshot<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, ProcessorError> {
        let Some(path) = path else {
            return Ok(Vec::new());
        };
        if !fs::try_exists(path).await? {
            warn!("Snapshot {} not found, starting from defaults", path.display());
            return Ok(Vec::new());
        }

        let rows = Self::load_rows(path).await?;
        info!("Resuming from {} snapshot rows in {}", rows.len(), path.display());
        Ok(rows)
    }

    pub async fn save<T: Serialize>(&self, file_name: &str, rows: &[T]) -> Result<PathBuf, ProcessorError> {
        fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(file_name);
        let bytes = serde_json::to_vec_pretty(rows)?;
        fs::write(&path, bytes).await?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }

    pub async fn save_run(&self, output: &RunOutput) -> Result<(), ProcessorError> {
        info!("Writing results to {}", self.output_dir.display());
        let progress_bar = progress_bar(7, "Writing output files".to_string());

        let tick = || {
            if let Some(bar) = &progress_bar {
                bar.inc(1);
            }
        };

        let elo = &output.elo;
        self.save(PLAYER_ELO_FILE, &elo.players).await?;
        tick();
        self.save(ELO_PA_DETAIL_FILE, &elo.pa_details).await?;
        tick();
        self.save(ELO_DAILY_OHLC_FILE, &elo.daily_ohlc).await?;
        tick();

        let talent = &output.talent;
        self.save(TALENT_PLAYER_FILE, &talent.players).await?;
        tick();
        self.save(TALENT_COMPOSITE_FILE, &talent.composites).await?;
        tick();
        self.save(TALENT_PA_DETAIL_FILE, &talent.pa_details).await?;
        tick();
        self.save(TALENT_DAILY_OHLC_FILE, &talent.daily_ohlc).await?;
        tick();

        if let Some(bar) = progress_bar {
            bar.finish_and_clear();
        }
        info!("Wrote 7 output files");

        Ok(())
    }
}
