use std::hash::Hash;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::structures::elo_type::EloType;

/// One day of a player's rating in one stream (a scalar role or a facet).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyOhlc<S> {
    pub player_id: i32,
    pub game_date: NaiveDate,
    pub elo_type: EloType,
    pub stream: S,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub total_pa: u32
}

impl<S> DailyOhlc<S> {
    pub fn delta(&self) -> f64 {
        self.close - self.open
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenBar {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    total_pa: u32
}

/// Aggregates rating movements into daily bars.
///
/// A bar opens at the rating before the player's first PA of the day and
/// closes at the rating after their last one. Bars are flushed whenever the
/// date moves on, and by `finish` at the end of a run.
#[derive(Debug, Clone)]
pub struct OhlcTracker<S> {
    current_date: Option<NaiveDate>,
    bars: IndexMap<(i32, S), OpenBar>,
    records: Vec<DailyOhlc<S>>
}

impl<S: Copy + Eq + Hash> Default for OhlcTracker<S> {
    fn default() -> Self {
        OhlcTracker {
            current_date: None,
            bars: IndexMap::new(),
            records: Vec::new()
        }
    }
}

impl<S: Copy + Eq + Hash> OhlcTracker<S> {
    pub fn new() -> OhlcTracker<S> {
        OhlcTracker::default()
    }

    /// Closes out the previous day if `date` differs from it.
    pub fn advance_to(&mut self, date: NaiveDate) {
        if self.current_date.is_some_and(|d| d != date) {
            self.flush();
        }
        self.current_date = Some(date);
    }

    pub fn record(&mut self, player_id: i32, stream: S, before: f64, after: f64) {
        let bar = self.bars.entry((player_id, stream)).or_insert(OpenBar {
            open: before,
            high: before,
            low: before,
            close: before,
            total_pa: 0
        });

        bar.high = bar.high.max(after);
        bar.low = bar.low.min(after);
        bar.close = after;
        bar.total_pa += 1;
    }

    /// Flushes the last open day.
    pub fn finish(&mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        let Some(game_date) = self.current_date else {
            return;
        };

        self.records
            .extend(self.bars.drain(..).map(|((player_id, stream), bar)| DailyOhlc {
                player_id,
                game_date,
                elo_type: EloType::Season,
                stream,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                total_pa: bar.total_pa
            }));
    }

    pub fn records(&self) -> &[DailyOhlc<S>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DailyOhlc<S>> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structures::player_role::EloRole;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    #[test]
    fn test_single_day_bar() {
        let mut tracker = OhlcTracker::new();
        tracker.advance_to(date(1));
        tracker.record(1, EloRole::Batting, 1500.0, 1510.0);
        tracker.record(1, EloRole::Batting, 1510.0, 1490.0);
        tracker.record(1, EloRole::Batting, 1490.0, 1495.0);
        tracker.finish();

        let bar = &tracker.records()[0];
        assert_eq!(tracker.records().len(), 1);
        assert_eq!(bar.open, 1500.0);
        assert_eq!(bar.high, 1510.0);
        assert_eq!(bar.low, 1490.0);
        assert_eq!(bar.close, 1495.0);
        assert_eq!(bar.total_pa, 3);
        assert_eq!(bar.delta(), -5.0);
        assert_eq!(bar.range(), 20.0);
        assert_eq!(bar.elo_type, EloType::Season);
    }

    #[test]
    fn test_open_is_part_of_range() {
        let mut tracker = OhlcTracker::new();
        tracker.advance_to(date(1));
        tracker.record(1, EloRole::Pitching, 1500.0, 1520.0);
        tracker.finish();

        let bar = &tracker.records()[0];
        assert_eq!(bar.low, 1500.0);
        assert_eq!(bar.high, 1520.0);
    }

    #[test]
    fn test_day_rollover() {
        let mut tracker = OhlcTracker::new();
        tracker.advance_to(date(1));
        tracker.record(1, EloRole::Batting, 1500.0, 1510.0);
        tracker.record(2, EloRole::Pitching, 1500.0, 1490.0);
        tracker.advance_to(date(1));
        assert!(tracker.records().is_empty());

        tracker.advance_to(date(2));
        assert_eq!(tracker.records().len(), 2);
        tracker.record(1, EloRole::Batting, 1510.0, 1515.0);
        tracker.finish();

        let records = tracker.into_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].game_date, date(2));
        assert_eq!(records[2].open, records[0].close);
    }

    #[test]
    fn test_finish_without_events() {
        let mut tracker: OhlcTracker<EloRole> = OhlcTracker::new();
        tracker.finish();
        assert!(tracker.records().is_empty());
    }
}
