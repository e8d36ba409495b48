use eredivisie_terminal::fdr::PositionGroup;
use eredivisie_terminal::standings::Methodology;
use eredivisie_terminal::state::{AppState, StandingsView};

#[test]
fn gameweek_steps_stay_in_range() {
    let mut state = AppState::new();
    let gws = [1, 2, 5];
    state.clamp_gameweek(&gws);
    assert_eq!(state.gameweek, Some(1));

    state.step_gameweek(&gws, false);
    assert_eq!(state.gameweek, Some(1));
    state.step_gameweek(&gws, true);
    state.step_gameweek(&gws, true);
    assert_eq!(state.gameweek, Some(5));
    state.step_gameweek(&gws, true);
    assert_eq!(state.gameweek, Some(5));

    state.clamp_gameweek(&[7, 8]);
    assert_eq!(state.gameweek, Some(7));
    state.step_gameweek(&[], true);
    assert_eq!(state.gameweek, None);
}

#[test]
fn toggles_cycle_and_log() {
    let mut state = AppState::new();
    state.cycle_methodology();
    assert_eq!(state.methodology, Methodology::Adjusted);
    state.cycle_position_group();
    assert_eq!(state.position_group, PositionGroup::Def);
    assert_eq!(
        state.logs.iter().cloned().collect::<Vec<_>>(),
        [
            "[INFO] Standings: Adjusted Expected Standings",
            "[INFO] Position group: DEF",
        ]
    );

    state.toggle_standings_view();
    assert_eq!(state.standings_view, StandingsView::Chart);
    state.toggle_standings_view();
    assert_eq!(state.standings_view, StandingsView::Table);
}

#[test]
fn scrolling_is_bounded_by_row_count() {
    let mut state = AppState::new();
    for _ in 0..10 {
        state.scroll_down(3);
    }
    assert_eq!(state.scroll, 2);
    state.scroll_up();
    state.scroll_up();
    state.scroll_up();
    assert_eq!(state.scroll, 0);
}
