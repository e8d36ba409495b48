use std::collections::VecDeque;

use crate::fdr::PositionGroup;
use crate::standings::Methodology;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Standings,
    Fantasy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsView {
    Table,
    Chart,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub methodology: Methodology,
    pub standings_view: StandingsView,
    pub position_group: PositionGroup,
    pub gameweek: Option<u32>,
    /// First visible row of the active table.
    pub scroll: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            methodology: Methodology::Expected,
            standings_view: StandingsView::Table,
            position_group: PositionGroup::Kee,
            gameweek: None,
            scroll: 0,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.scroll = 0;
        }
    }

    pub fn cycle_methodology(&mut self) {
        self.methodology = self.methodology.next();
        self.scroll = 0;
        self.push_log(format!("[INFO] Standings: {}", self.methodology.label()));
    }

    pub fn toggle_standings_view(&mut self) {
        self.standings_view = match self.standings_view {
            StandingsView::Table => StandingsView::Chart,
            StandingsView::Chart => StandingsView::Table,
        };
        self.scroll = 0;
    }

    pub fn cycle_position_group(&mut self) {
        self.position_group = self.position_group.next();
        self.push_log(format!("[INFO] Position group: {}", self.position_group));
    }

    /// Keeps the selected gameweek inside `available`, defaulting to the
    /// first one.
    pub fn clamp_gameweek(&mut self, available: &[u32]) {
        match self.gameweek {
            Some(gw) if available.contains(&gw) => {}
            _ => self.gameweek = available.first().copied(),
        }
    }

    pub fn step_gameweek(&mut self, available: &[u32], forward: bool) {
        if available.is_empty() {
            self.gameweek = None;
            return;
        }
        let current = self
            .gameweek
            .and_then(|gw| available.iter().position(|g| *g == gw));
        let idx = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(available.len() - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.gameweek = Some(available[idx]);
    }

    pub fn scroll_down(&mut self, total: usize) {
        if self.scroll + 1 < total {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Home => "HOME",
        Screen::Standings => "EXPECTED STANDINGS",
        Screen::Fantasy => "FANTASY HUB",
    }
}
