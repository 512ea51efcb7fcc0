pub mod config;
pub mod constants;
pub mod corrections;
pub mod elo_batch;
pub mod elo_calculator;
pub mod ohlc;
pub mod sequence;
pub mod structures;
pub mod talent_batch;
pub mod talent_config;
pub mod talent_engine;
pub mod talent_state;

pub use config::EloConfig;
pub use elo_batch::{EloBatch, EloRunOutput};
pub use elo_calculator::{EloCalculator, EloUpdateResult};
pub use talent_batch::{TalentBatch, TalentRunOutput};
pub use talent_config::TalentConfig;
pub use talent_engine::{TalentEngine, TalentUpdateResult};
