use crate::model::{
    corrections::{state_name, BaselineRow, ParkFactorRow},
    structures::{plate_appearance::PlateAppearance, result_type::ResultType}
};
use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const TEAMS: [&str; 6] = ["NYY", "BOS", "COL", "SD", "LAD", "SEA"];

/// Opening day of every generated stream
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 28).unwrap()
}

/// A bases-empty, no-out PA on the opening day at a neutral park.
pub fn generate_plate_appearance(
    pa_id: i64,
    batter_id: i32,
    pitcher_id: i32,
    result_type: Option<ResultType>,
    delta_run_exp: Option<f64>
) -> PlateAppearance {
    PlateAppearance {
        pa_id,
        game_pk: 1,
        game_date: start_date(),
        batter_id,
        pitcher_id,
        result_type,
        delta_run_exp,
        on_1b: false,
        on_2b: false,
        on_3b: false,
        outs_when_up: 0,
        home_team: "NYY".to_string(),
        xwoba: None,
        leverage_index: None
    }
}

fn random_result(rng: &mut ChaCha8Rng) -> (ResultType, f64) {
    match rng.random_range(0..100) {
        0..=2 => (ResultType::HomeRun, rng.random_range(1.0..=1.9)),
        3 => (ResultType::Triple, rng.random_range(0.7..=1.3)),
        4..=8 => (ResultType::Double, rng.random_range(0.5..=1.1)),
        9..=23 => (ResultType::Single, rng.random_range(0.3..=0.8)),
        24..=49 => (ResultType::Out, rng.random_range(-0.35..=-0.1)),
        50..=52 => (ResultType::GroundIntoDoublePlay, rng.random_range(-0.9..=-0.4)),
        53..=54 => (ResultType::FieldersChoice, rng.random_range(-0.3..=0.1)),
        55..=76 => (ResultType::StrikeOut, rng.random_range(-0.35..=-0.15)),
        77..=85 => (ResultType::Walk, rng.random_range(0.2..=0.5)),
        86 => (ResultType::IntentionalWalk, rng.random_range(0.1..=0.3)),
        87..=88 => (ResultType::HitByPitch, rng.random_range(0.2..=0.5)),
        89..=90 => (ResultType::Sacrifice, rng.random_range(-0.2..=0.3)),
        _ => (ResultType::FieldError, rng.random_range(0.1..=0.6))
    }
}

/// Generates `n` plate appearances spread evenly over `n_days` consecutive days,
/// already in `(game_date, pa_id)` order.
///
/// Batters are numbered from 1, pitchers from 1000. Roughly 2% of PAs carry no
/// run value, 1% no result type, and batted balls carry an xwOBA. The stream is
/// seeded so repeated calls return identical data.
pub fn generate_plate_appearances(n: usize, n_days: usize, n_batters: i32, n_pitchers: i32) -> Vec<PlateAppearance> {
    if n_days < 1 || n_batters < 1 || n_pitchers < 1 {
        panic!("Days, batters and pitchers must all be at least 1");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let per_day = n.div_ceil(n_days).max(1);

    (0..n)
        .map(|i| {
            let (result_type, rv) = random_result(&mut rng);
            let is_bip = !matches!(
                result_type,
                ResultType::StrikeOut
                    | ResultType::Walk
                    | ResultType::IntentionalWalk
                    | ResultType::HitByPitch
                    | ResultType::Sacrifice
                    | ResultType::FieldError
            );

            PlateAppearance {
                pa_id: i as i64 + 1,
                game_pk: (i / 60) as i64 + 1,
                game_date: start_date() + Duration::days((i / per_day) as i64),
                batter_id: rng.random_range(1..=n_batters),
                pitcher_id: 1000 + rng.random_range(1..=n_pitchers),
                result_type: if rng.random_range(0..100) == 0 {
                    None
                } else {
                    Some(result_type)
                },
                delta_run_exp: if rng.random_range(0..50) == 0 { None } else { Some(rv) },
                on_1b: rng.random_bool(0.3),
                on_2b: rng.random_bool(0.2),
                on_3b: rng.random_bool(0.1),
                outs_when_up: rng.random_range(0..=2),
                home_team: TEAMS[rng.random_range(0..TEAMS.len())].to_string(),
                xwoba: if is_bip {
                    Some(rng.random_range(0.0..=1.5))
                } else {
                    None
                },
                leverage_index: Some(rng.random_range(0.2..=4.5))
            }
        })
        .collect()
}

pub fn generate_baseline_rows() -> Vec<BaselineRow> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    (0..24u8)
        .map(|state| BaselineRow {
            base_out_state: state,
            state_name: state_name(state),
            sample_size: rng.random_range(500..5000),
            mean_rv: rng.random_range(-0.05..=0.05)
        })
        .collect()
}

pub fn generate_park_factor_rows() -> Vec<ParkFactorRow> {
    [("NYY", 1.03), ("BOS", 1.05), ("COL", 1.16), ("SD", 0.94), ("LAD", 0.98)]
        .into_iter()
        .map(|(team, park_factor)| ParkFactorRow {
            team: team.to_string(),
            park_factor
        })
        .collect()
}
