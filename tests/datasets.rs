use std::path::PathBuf;
use std::sync::Arc;

use eredivisie_terminal::comparison::Direction;
use eredivisie_terminal::config::{AppConfig, ComparisonStyle};
use eredivisie_terminal::datasets::{DatasetId, DatasetStore};
use eredivisie_terminal::standings::Methodology;
use eredivisie_terminal::state::{AppState, Screen, StandingsView};
use eredivisie_terminal::views::{ScreenView, build_view};

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn config_for(dir: PathBuf) -> AppConfig {
    let mut cfg = AppConfig::from_lookup(|_| None);
    cfg.data_dir = dir;
    cfg
}

#[test]
fn standings_are_parsed_once_per_methodology() {
    let mut store = DatasetStore::new(fixtures_dir());
    let first = store.standings(Methodology::Expected).expect("fixture loads");
    let second = store.standings(Methodology::Expected).expect("cached");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.load_count(), 1);

    let adjusted = store.standings(Methodology::Adjusted).expect("fixture loads");
    assert_eq!(store.load_count(), 2);
    assert_eq!(adjusted.methodology, Methodology::Adjusted);
    assert!(store.is_cached(DatasetId::Standings(Methodology::Adjusted)));
    assert!(!store.is_cached(DatasetId::Standings(Methodology::NonPenalty)));
}

#[test]
fn methodologies_map_onto_the_same_canonical_shape() {
    let mut store = DatasetStore::new(fixtures_dir());
    for methodology in Methodology::ALL {
        let table = store.standings(methodology).expect("fixture loads");
        assert_eq!(table.standings.len(), 6, "{}", methodology.label());
        assert_eq!(table.standings[0].team, "PSV");
        assert!(table.warnings.is_empty());
    }
    let np = store.standings(Methodology::NonPenalty).unwrap();
    assert_eq!(np.standings[2].team, "Ajax");
    assert_eq!(np.standings[2].expected_rank, 2.0);
}

#[test]
fn comparisons_are_cached_per_threshold() {
    let mut store = DatasetStore::new(fixtures_dir());
    let style = ComparisonStyle::default();
    let a = store.comparison(Methodology::Expected, &style).unwrap();
    let b = store.comparison(Methodology::Expected, &style).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let strict = store
        .comparison(Methodology::Expected, &style.with_threshold(4.0))
        .unwrap();
    assert!(!Arc::ptr_eq(&a, &strict));
    assert!(strict.connectors().count() < a.connectors().count());
    assert_eq!(store.load_count(), 1);

    let ajax = a.rows.iter().find(|r| r.team == "Ajax").unwrap();
    assert_eq!(ajax.delta.direction, Direction::UnderPerforming);
}

#[test]
fn failed_load_is_retried_not_cached() {
    let mut store = DatasetStore::new(fixtures_dir().join("missing"));
    assert!(store.results().is_err());
    assert!(!store.is_cached(DatasetId::Results));
    assert!(store.results().is_err());
    assert_eq!(store.load_count(), 0);
}

#[test]
fn standings_screen_selects_first_gameweek() {
    let cfg = config_for(fixtures_dir());
    let mut store = DatasetStore::new(cfg.data_dir.clone());
    let mut state = AppState::new();
    state.set_screen(Screen::Standings);

    let ScreenView::Standings(screen) = build_view(&mut state, &mut store, &cfg) else {
        panic!("expected standings view");
    };
    assert!(screen.table.is_ok());
    assert!(screen.chart.is_none());
    let results = screen.results.expect("results fixture loads");
    assert_eq!(results.gameweeks, vec![1, 2, 3]);
    assert_eq!(results.selected, Some(1));
    assert_eq!(results.rows.len(), 2);
    assert_eq!(results.rows[0].cells()[3], "71.0%");

    state.step_gameweek(&results.gameweeks, true);
    state.toggle_standings_view();
    assert_eq!(state.standings_view, StandingsView::Chart);
    let ScreenView::Standings(screen) = build_view(&mut state, &mut store, &cfg) else {
        panic!("expected standings view");
    };
    let chart = screen.chart.expect("chart requested").expect("chart renders");
    assert_eq!(chart.rows.len(), 6);
    assert_eq!(screen.results.unwrap().selected, Some(2));
}

#[test]
fn missing_files_degrade_only_their_section() {
    let cfg = config_for(fixtures_dir().join("missing"));
    let mut store = DatasetStore::new(cfg.data_dir.clone());
    let mut state = AppState::new();

    state.set_screen(Screen::Fantasy);
    let ScreenView::Fantasy(screen) = build_view(&mut state, &mut store, &cfg) else {
        panic!("expected fantasy view");
    };
    let notice = screen.table.expect_err("no fdr files");
    assert!(notice.contains("'fdr_schedule.csv' and 'fdr_small.csv' are"));
    assert!(state.logs.iter().any(|l| l.starts_with("[WARN]")));

    state.set_screen(Screen::Home);
    assert!(matches!(
        build_view(&mut state, &mut store, &cfg),
        ScreenView::Home
    ));
}

#[test]
fn fantasy_screen_follows_position_group() {
    let cfg = config_for(fixtures_dir());
    let mut store = DatasetStore::new(cfg.data_dir.clone());
    let mut state = AppState::new();
    state.set_screen(Screen::Fantasy);

    let ScreenView::Fantasy(kee) = build_view(&mut state, &mut store, &cfg) else {
        panic!("expected fantasy view");
    };
    state.cycle_position_group();
    state.cycle_position_group();
    let ScreenView::Fantasy(att) = build_view(&mut state, &mut store, &cfg) else {
        panic!("expected fantasy view");
    };
    let kee = kee.table.unwrap();
    let att = att.table.unwrap();
    assert_ne!(kee.rows[1][2].style, att.rows[1][2].style);
    assert_eq!(store.load_count(), 1);
}

#[test]
fn unreadable_file_notice_names_the_parse_error() {
    let cfg = config_for(fixtures_dir().join("malformed"));
    let mut store = DatasetStore::new(cfg.data_dir.clone());
    let mut state = AppState::new();
    state.set_screen(Screen::Standings);

    let ScreenView::Standings(screen) = build_view(&mut state, &mut store, &cfg) else {
        panic!("expected standings view");
    };
    let table_notice = screen.table.expect_err("malformed standings");
    assert!(table_notice.starts_with("Could not read 'expected_standings.csv':"));
    assert!(table_notice.contains("twenty-eight"));
    assert!(screen.chart.is_none());

    let results_notice = screen.results.expect_err("no results file");
    assert!(results_notice.starts_with("Please make sure 'expected_results.csv' is"));
}
