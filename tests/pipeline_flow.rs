mod common;

use approx::assert_abs_diff_eq;
use itertools::Itertools;
use mlb_elo_processor::{
    model::{
        constants::{INITIAL_ELO, MIN_ELO, TALENT_ELO_MAX, TALENT_ELO_MIN},
        structures::{player_role::PitcherRole, result_type::ResultType},
        EloBatch, EloCalculator
    },
    pipeline::{run, PipelineOptions},
    store::{json_store, records::PlayerEloRecord, JsonStore},
    utils::test_utils::{generate_plate_appearance, generate_plate_appearances},
    ProcessorError
};

use common::{init_test_env, Fixture};

#[test]
fn test_scalar_exchange_is_zero_sum() {
    init_test_env();

    let fixture = Fixture::new();
    let pas = generate_plate_appearances(2_000, 10, 15, 6);
    let output = run(&fixture.inputs(&pas), &PipelineOptions::default()).unwrap();

    for detail in &output.elo.pa_details {
        assert_abs_diff_eq!(detail.update.batter_delta + detail.update.pitcher_delta, 0.0, epsilon = 1e-10);
    }

    let net: f64 = output
        .elo
        .players
        .iter()
        .map(|p| (p.batting_elo - INITIAL_ELO) + (p.pitching_elo - INITIAL_ELO))
        .sum();
    assert!(net.abs() < 1e-6, "net rating drift {}", net);
}

#[test]
fn test_ratings_respect_bounds() {
    init_test_env();

    let fixture = Fixture::new();
    let pas = (1..=400)
        .map(|i| generate_plate_appearance(i, 1, 2, Some(ResultType::StrikeOut), Some(-0.6)))
        .collect_vec();
    let output = run(&fixture.inputs(&pas), &PipelineOptions::default()).unwrap();

    let batter = output.elo.players.iter().find(|p| p.player_id == 1).unwrap();
    assert_eq!(batter.batting_elo, MIN_ELO);
    for r in &output.talent.players {
        assert!((TALENT_ELO_MIN..=TALENT_ELO_MAX).contains(&r.season_elo));
        assert!((TALENT_ELO_MIN..=TALENT_ELO_MAX).contains(&r.career_elo));
    }
}

#[test]
fn test_daily_bars_are_consistent() {
    init_test_env();

    let fixture = Fixture::new();
    let pas = generate_plate_appearances(1_500, 8, 10, 4);
    let output = run(&fixture.inputs(&pas), &PipelineOptions::default()).unwrap();

    for bar in &output.elo.daily_ohlc {
        assert!(bar.low <= bar.open.min(bar.close));
        assert!(bar.high >= bar.open.max(bar.close));
        assert!(bar.total_pa > 0);
    }
    for bar in &output.talent.daily_ohlc {
        assert!(bar.low <= bar.open.min(bar.close));
        assert!(bar.high >= bar.open.max(bar.close));
    }

    // Each stream opens where it last closed
    for (_, bars) in &output
        .elo
        .daily_ohlc
        .iter()
        .sorted_by_key(|b| (b.player_id, b.stream, b.game_date))
        .chunk_by(|b| (b.player_id, b.stream))
    {
        for (previous, next) in bars.tuple_windows() {
            assert!(previous.game_date < next.game_date);
            assert_eq!(previous.close, next.open);
        }
    }
    for (_, bars) in &output
        .talent
        .daily_ohlc
        .iter()
        .sorted_by_key(|b| (b.player_id, b.stream, b.game_date))
        .chunk_by(|b| (b.player_id, b.stream))
    {
        for (previous, next) in bars.tuple_windows() {
            assert_eq!(previous.close, next.open);
        }
    }

    let total_batting_pa: u32 = output
        .elo
        .daily_ohlc
        .iter()
        .filter(|b| b.stream == mlb_elo_processor::model::structures::player_role::EloRole::Batting)
        .map(|b| b.total_pa)
        .sum();
    assert_eq!(total_batting_pa as usize, pas.len());
}

#[test]
fn test_missing_run_value_only_counts() {
    init_test_env();

    let fixture = Fixture::new();
    let pas = vec![generate_plate_appearance(1, 1, 2, Some(ResultType::HomeRun), None)];
    let output = run(&fixture.inputs(&pas), &PipelineOptions::default()).unwrap();

    let batter = output.elo.players.iter().find(|p| p.player_id == 1).unwrap();
    assert_eq!(batter.batting_elo, INITIAL_ELO);
    assert_eq!(batter.batting_pa, 1);
    assert_eq!(output.elo.pa_details[0].update.batter_delta, 0.0);
}

#[test]
fn test_field_error_never_rewards_batter() {
    init_test_env();

    let fixture = Fixture::new();
    let pas = (1..=20)
        .map(|i| generate_plate_appearance(i, 1, 2, Some(ResultType::FieldError), Some(0.7)))
        .collect_vec();
    let output = run(&fixture.inputs(&pas), &PipelineOptions::default()).unwrap();

    assert!(output.elo.pa_details.iter().all(|d| d.update.batter_delta == 0.0));
    assert!(output.elo.pa_details.iter().all(|d| d.update.k_base == 0.0));
}

#[test]
fn test_home_run_reference_values() {
    init_test_env();

    let fixture = Fixture::new();
    let calculator = EloCalculator::new(&fixture.elo_config, None, None);
    let mut batch = EloBatch::new(calculator);
    batch
        .process(&[generate_plate_appearance(1, 1, 2, Some(ResultType::HomeRun), Some(1.4))])
        .unwrap();

    assert_abs_diff_eq!(batch.player(1).unwrap().batting_elo, 1521.0, epsilon = 1e-10);
    assert_abs_diff_eq!(batch.player(2).unwrap().pitching_elo, 1479.0, epsilon = 1e-10);
}

#[test]
fn test_reset_season_and_pitcher_roles() {
    init_test_env();

    let mut fixture = Fixture::new();
    let pas = generate_plate_appearances(300, 3, 6, 2);
    let first = run(&fixture.inputs(&pas), &PipelineOptions::default()).unwrap();

    fixture.pitcher_roles.insert(1001, PitcherRole::Closer);
    let mut inputs = fixture.inputs(&[]);
    inputs.talent_seed = &first.talent.players;
    let options = PipelineOptions {
        reset_season: true,
        ..PipelineOptions::default()
    };
    let reset = run(&inputs, &options).unwrap();

    for (before, after) in first.talent.players.iter().zip(&reset.talent.players) {
        assert_eq!(after.season_elo, 1500.0);
        assert_eq!(after.season_pa_count, 0);
        assert_eq!(before.career_elo, after.career_elo);
    }
    let closer = reset
        .talent
        .composites
        .iter()
        .find(|c| c.player_id == 1001)
        .unwrap();
    assert_eq!(closer.pitcher_role, Some(PitcherRole::Closer));
}

#[test]
fn test_strict_ordering_rejects_shuffled_stream() {
    init_test_env();

    let fixture = Fixture::new();
    let mut pas = generate_plate_appearances(50, 2, 4, 2);
    pas.swap(3, 40);
    let options = PipelineOptions {
        strict_ordering: true,
        ..PipelineOptions::default()
    };

    assert!(matches!(
        run(&fixture.inputs(&pas), &options),
        Err(ProcessorError::OutOfOrder { .. })
    ));
    assert!(run(&fixture.inputs(&pas), &PipelineOptions::default()).is_ok());
}

#[tokio::test]
async fn test_json_round_trip_through_store() {
    init_test_env();

    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path().join("out"));
    let fixture = Fixture::new();

    let pas = generate_plate_appearances(200, 2, 5, 2);
    let mut shuffled = pas.clone();
    shuffled.reverse();
    let input_path = store.save("input.json", &shuffled).await.unwrap();

    let loaded = JsonStore::load_plate_appearances(&input_path).await.unwrap();
    assert_eq!(
        loaded.iter().map(|pa| pa.sequence_key()).collect_vec(),
        pas.iter().map(|pa| pa.sequence_key()).collect_vec()
    );

    let output = run(&fixture.inputs(&loaded), &PipelineOptions::default()).unwrap();
    store.save_run(&output).await.unwrap();

    let snapshot_path = store.output_dir().join(json_store::PLAYER_ELO_FILE);
    let snapshot: Vec<PlayerEloRecord> = JsonStore::load_snapshot(Some(&snapshot_path)).await.unwrap();
    assert_eq!(snapshot.len(), output.elo.players.len());
    for (saved, expected) in snapshot.iter().zip(&output.elo.players) {
        assert_eq!(saved.player_id, expected.player_id);
        assert_abs_diff_eq!(saved.batting_elo, expected.batting_elo, epsilon = 1e-10);
        assert_abs_diff_eq!(saved.pitching_elo, expected.pitching_elo, epsilon = 1e-10);
    }
    for file in [
        json_store::ELO_PA_DETAIL_FILE,
        json_store::ELO_DAILY_OHLC_FILE,
        json_store::TALENT_PLAYER_FILE,
        json_store::TALENT_COMPOSITE_FILE,
        json_store::TALENT_PA_DETAIL_FILE,
        json_store::TALENT_DAILY_OHLC_FILE
    ] {
        assert!(store.output_dir().join(file).exists(), "missing {}", file);
    }
}
