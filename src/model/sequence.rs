use chrono::NaiveDate;

use crate::{error::ProcessorError, model::structures::plate_appearance::PlateAppearance};

/// Rejects plate appearances that do not strictly follow their predecessor
/// in `(game_date, pa_id)` order. Disabled guards accept anything.
#[derive(Debug, Clone, Default)]
pub struct SequenceGuard {
    enabled: bool,
    last: Option<(NaiveDate, i64)>
}

impl SequenceGuard {
    pub fn new(enabled: bool) -> SequenceGuard {
        SequenceGuard { enabled, last: None }
    }

    pub fn check(&mut self, pa: &PlateAppearance) -> Result<(), ProcessorError> {
        if !self.enabled {
            return Ok(());
        }

        let key = pa.sequence_key();
        if let Some((previous_date, previous_pa_id)) = self.last {
            if key <= (previous_date, previous_pa_id) {
                return Err(ProcessorError::OutOfOrder {
                    pa_id: pa.pa_id,
                    game_date: pa.game_date,
                    previous_pa_id,
                    previous_date
                });
            }
        }
        self.last = Some(key);

        Ok(())
    }
}
