use std::io;
use std::sync::Arc;

use anyhow::Result;

use crate::comparison::RenderedComparison;
use crate::config::AppConfig;
use crate::datasets::{DatasetId, DatasetStore};
use crate::fdr::{self, StyledTable};
use crate::results::{ExpectedResult, ResultsTable};
use crate::standings::StandingsTable;
use crate::state::{AppState, Screen, StandingsView};

/// Either loaded data or the notice shown in its place.
pub type Section<T> = std::result::Result<T, String>;

#[derive(Debug, Clone)]
pub enum ScreenView {
    Home,
    Standings(StandingsScreen),
    Fantasy(FantasyScreen),
}

#[derive(Debug, Clone)]
pub struct StandingsScreen {
    pub table: Section<Arc<StandingsTable>>,
    pub chart: Option<Section<Arc<RenderedComparison>>>,
    pub results: Section<ResultsSection>,
}

#[derive(Debug, Clone)]
pub struct ResultsSection {
    pub gameweeks: Vec<u32>,
    pub selected: Option<u32>,
    pub rows: Vec<ExpectedResult>,
}

#[derive(Debug, Clone)]
pub struct FantasyScreen {
    pub table: Section<StyledTable>,
}

/// Rebuilds the active screen from state. Only views the screen needs are
/// loaded; a failing dataset degrades its own section.
pub fn build_view(state: &mut AppState, store: &mut DatasetStore, cfg: &AppConfig) -> ScreenView {
    match state.screen {
        Screen::Home => ScreenView::Home,
        Screen::Standings => ScreenView::Standings(build_standings(state, store, cfg)),
        Screen::Fantasy => ScreenView::Fantasy(build_fantasy(state, store, cfg)),
    }
}

fn build_standings(
    state: &mut AppState,
    store: &mut DatasetStore,
    cfg: &AppConfig,
) -> StandingsScreen {
    let methodology = state.methodology;
    let id = DatasetId::Standings(methodology);
    let fresh = !store.is_cached(id);
    let table = section(state, id, store.standings(methodology));
    if fresh {
        if let Ok(table) = &table {
            for warning in &table.warnings {
                state.push_log(format!("[WARN] {}: {warning}", methodology.label()));
            }
        }
    }

    let chart = match state.standings_view {
        StandingsView::Table => None,
        StandingsView::Chart if table.is_ok() => Some(
            store
                .comparison(methodology, &cfg.comparison)
                .map_err(|err| format!("Cannot draw comparison: {err}")),
        ),
        StandingsView::Chart => None,
    };

    let results = section(state, DatasetId::Results, store.results())
        .map(|table| results_section(state, &table));

    StandingsScreen {
        table,
        chart,
        results,
    }
}

fn results_section(state: &mut AppState, table: &ResultsTable) -> ResultsSection {
    let gameweeks = table.gameweeks();
    state.clamp_gameweek(&gameweeks);
    let rows = state
        .gameweek
        .map(|gw| table.for_gameweek(gw).into_iter().cloned().collect())
        .unwrap_or_default();
    ResultsSection {
        gameweeks,
        selected: state.gameweek,
        rows,
    }
}

fn build_fantasy(state: &mut AppState, store: &mut DatasetStore, cfg: &AppConfig) -> FantasyScreen {
    let table = section(state, DatasetId::Fdr, store.fdr()).map(|data| {
        fdr::style_schedule(&data.schedule, &data.lookup, state.position_group, &cfg.bands)
    });
    FantasyScreen { table }
}

fn section<T>(state: &mut AppState, id: DatasetId, loaded: Result<T>) -> Section<T> {
    loaded.map_err(|err| {
        state.push_log(format!("[WARN] Load failed: {err:#}"));
        if is_missing_file(&err) {
            format!(
                "Please make sure {} {} in the data directory.",
                id.describe(),
                if matches!(id, DatasetId::Fdr) { "are" } else { "is" }
            )
        } else {
            format!("Could not read {}: {err:#}", id.describe())
        }
    })
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}
