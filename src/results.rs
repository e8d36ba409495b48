use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::formatting::CellFormat;
use crate::standings::parse_whole;

pub const RESULTS_FILE: &str = "expected_results.csv";

pub const RESULT_HEADERS: [&str; 12] = [
    "GW",
    "Home",
    "Away",
    "Home Win%",
    "Draw %",
    "Away Win%",
    "Home xPTS",
    "Home xG",
    "Home Goals",
    "Away Goals",
    "Away xG",
    "Away xPTS",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedResult {
    #[serde(rename = "GW", deserialize_with = "whole")]
    pub gameweek: u32,
    #[serde(rename = "Home")]
    pub home: String,
    #[serde(rename = "Away")]
    pub away: String,
    #[serde(rename = "Home_Win_pct")]
    pub home_win_pct: f64,
    #[serde(rename = "Draw_pct")]
    pub draw_pct: f64,
    #[serde(rename = "Away_Win_pct")]
    pub away_win_pct: f64,
    #[serde(rename = "Home_xPTS")]
    pub home_xpts: f64,
    #[serde(rename = "Home_xG")]
    pub home_xg: f64,
    // Empty until the match has been played.
    #[serde(rename = "Home_Goals", deserialize_with = "optional_whole")]
    pub home_goals: Option<u32>,
    #[serde(rename = "Away_Goals", deserialize_with = "optional_whole")]
    pub away_goals: Option<u32>,
    #[serde(rename = "Away_xG")]
    pub away_xg: f64,
    #[serde(rename = "Away_xPTS")]
    pub away_xpts: f64,
}

impl ExpectedResult {
    /// Display cells in `RESULT_HEADERS` order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.gameweek.to_string(),
            self.home.clone(),
            self.away.clone(),
            CellFormat::Percent.apply(self.home_win_pct),
            CellFormat::Percent.apply(self.draw_pct),
            CellFormat::Percent.apply(self.away_win_pct),
            CellFormat::OneDecimal.apply(self.home_xpts),
            CellFormat::OneDecimal.apply(self.home_xg),
            goals_cell(self.home_goals),
            goals_cell(self.away_goals),
            CellFormat::OneDecimal.apply(self.away_xg),
            CellFormat::OneDecimal.apply(self.away_xpts),
        ]
    }
}

fn goals_cell(goals: Option<u32>) -> String {
    goals.map(|g| g.to_string()).unwrap_or_default()
}

// Integer columns come back as "3.0" once pandas has seen a missing value.
fn whole<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<u32, D::Error> {
    let raw = String::deserialize(de)?;
    parse_whole(raw.trim(), 0).map_err(|err| D::Error::custom(format!("{err:#}")))
}

fn optional_whole<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<u32>, D::Error> {
    match Option::<String>::deserialize(de)? {
        Some(raw) if !raw.trim().is_empty() => parse_whole(raw.trim(), 0)
            .map(Some)
            .map_err(|err| D::Error::custom(format!("{err:#}"))),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultsTable {
    pub results: Vec<ExpectedResult>,
}

impl ResultsTable {
    pub fn gameweeks(&self) -> Vec<u32> {
        self.results
            .iter()
            .map(|r| r.gameweek)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn for_gameweek(&self, gameweek: u32) -> Vec<&ExpectedResult> {
        self.results
            .iter()
            .filter(|r| r.gameweek == gameweek)
            .collect()
    }
}

pub fn load_results(data_dir: &Path) -> Result<ResultsTable> {
    let path = data_dir.join(RESULTS_FILE);
    let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
    load_results_from_reader(file).with_context(|| format!("parse {}", path.display()))
}

/// Win/draw probabilities arrive as fractions and are stored as percent.
pub fn load_results_from_reader<R: Read>(rdr: R) -> Result<ResultsTable> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut results = Vec::new();
    for (row_no, record) in reader.deserialize::<ExpectedResult>().enumerate() {
        let mut row = record.with_context(|| format!("read row {}", row_no + 2))?;
        row.home_win_pct *= 100.0;
        row.draw_pct *= 100.0;
        row.away_win_pct *= 100.0;
        results.push(row);
    }
    Ok(ResultsTable { results })
}
