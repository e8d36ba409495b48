use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::config::{BandSpec, CellStyle, FdrBands};

pub const SCHEDULE_FILE: &str = "fdr_schedule.csv";
pub const LOOKUP_FILE: &str = "fdr_small.csv";
pub const TEAM_COLUMN: &str = "Team";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PositionGroup {
    Kee,
    Def,
    MidAtt,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 3] = [PositionGroup::Kee, PositionGroup::Def, PositionGroup::MidAtt];

    pub fn label(self) -> &'static str {
        match self {
            PositionGroup::Kee => "KEE",
            PositionGroup::Def => "DEF",
            PositionGroup::MidAtt => "MID/ATT",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PositionGroup::Kee => PositionGroup::Def,
            PositionGroup::Def => PositionGroup::MidAtt,
            PositionGroup::MidAtt => PositionGroup::Kee,
        }
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PositionGroup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "KEE" => Ok(PositionGroup::Kee),
            "DEF" => Ok(PositionGroup::Def),
            "MID/ATT" => Ok(PositionGroup::MidAtt),
            other => Err(anyhow!(
                "invalid position group '{other}' (expected KEE, DEF or MID/ATT)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FdrScores {
    pub fixture: String,
    pub fdr_kee: Option<f64>,
    pub fdr_def: Option<f64>,
    pub fdr_mid_att: Option<f64>,
}

impl FdrScores {
    fn for_group(&self, group: PositionGroup) -> Option<f64> {
        match group {
            PositionGroup::Kee => self.fdr_kee,
            PositionGroup::Def => self.fdr_def,
            PositionGroup::MidAtt => self.fdr_mid_att,
        }
    }
}

/// Fixture code -> per-position-group difficulty. The first row for a code
/// wins, matching a top-down scan of the file.
#[derive(Debug, Clone, Default)]
pub struct FdrLookup {
    by_fixture: HashMap<String, FdrScores>,
}

impl FdrLookup {
    pub fn from_rows(rows: impl IntoIterator<Item = FdrScores>) -> Self {
        let mut by_fixture = HashMap::new();
        for row in rows {
            by_fixture.entry(row.fixture.clone()).or_insert(row);
        }
        Self { by_fixture }
    }

    pub fn score_for(&self, fixture_code: Option<&str>, group: PositionGroup) -> Option<f64> {
        let code = fixture_code?;
        self.by_fixture
            .get(code)
            .and_then(|row| row.for_group(group))
            .filter(|v| !v.is_nan())
    }
}

/// Index of the band containing `score`. Out-of-range scores clamp to the
/// outer bands.
pub fn band_index(score: f64, bands: &FdrBands) -> usize {
    bands
        .thresholds
        .iter()
        .position(|&hi| score < hi)
        .unwrap_or(bands.thresholds.len())
}

pub fn band_for(score: Option<f64>, bands: &FdrBands) -> CellStyle {
    match score {
        Some(s) if !s.is_nan() => bands.bands[band_index(s, bands)].style,
        _ => bands.neutral,
    }
}

pub fn legend(bands: &FdrBands) -> &[BandSpec] {
    &bands.bands
}

#[derive(Debug, Clone, PartialEq)]
pub struct FdrSchedule {
    /// Gameweek column headers, in file order.
    pub gameweeks: Vec<String>,
    pub rows: Vec<ScheduleRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub team: String,
    pub fixtures: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledCell {
    pub text: String,
    pub score: Option<f64>,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<StyledCell>>,
}

/// Styles the whole schedule for one position group. Rows come out sorted by
/// team; the team column is always neutral.
pub fn style_schedule(
    schedule: &FdrSchedule,
    lookup: &FdrLookup,
    group: PositionGroup,
    bands: &FdrBands,
) -> StyledTable {
    let mut headers = Vec::with_capacity(schedule.gameweeks.len() + 1);
    headers.push(TEAM_COLUMN.to_string());
    headers.extend(schedule.gameweeks.iter().cloned());

    let mut sorted: Vec<&ScheduleRow> = schedule.rows.iter().collect();
    sorted.sort_by(|a, b| a.team.cmp(&b.team));

    let rows = sorted
        .into_iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(row.fixtures.len() + 1);
            cells.push(StyledCell {
                text: row.team.clone(),
                score: None,
                style: bands.neutral,
            });
            for fixture in &row.fixtures {
                let score = lookup.score_for(fixture.as_deref(), group);
                cells.push(StyledCell {
                    text: fixture.clone().unwrap_or_default(),
                    score,
                    style: band_for(score, bands),
                });
            }
            cells
        })
        .collect();

    StyledTable { headers, rows }
}

#[derive(Debug, Clone)]
pub struct FdrData {
    pub schedule: FdrSchedule,
    pub lookup: FdrLookup,
}

pub fn load_fdr(data_dir: &Path) -> Result<FdrData> {
    let schedule_path = data_dir.join(SCHEDULE_FILE);
    let lookup_path = data_dir.join(LOOKUP_FILE);
    let schedule = File::open(&schedule_path)
        .with_context(|| format!("open {}", schedule_path.display()))
        .and_then(load_schedule_from_reader)
        .with_context(|| format!("load {SCHEDULE_FILE}"))?;
    let lookup = File::open(&lookup_path)
        .with_context(|| format!("open {}", lookup_path.display()))
        .and_then(load_lookup_from_reader)
        .with_context(|| format!("load {LOOKUP_FILE}"))?;
    Ok(FdrData { schedule, lookup })
}

pub fn load_schedule_from_reader<R: Read>(rdr: R) -> Result<FdrSchedule> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()
        .context("read header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let team_idx = headers
        .iter()
        .position(|h| h == TEAM_COLUMN)
        .ok_or_else(|| anyhow!("missing column '{TEAM_COLUMN}'"))?;
    let gw_indices: Vec<usize> = (0..headers.len()).filter(|i| *i != team_idx).collect();
    let gameweeks = gw_indices.iter().map(|i| headers[*i].clone()).collect();

    let mut rows = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read row {}", row_no + 2))?;
        let team = record.get(team_idx).unwrap_or("").trim().to_string();
        let fixtures = gw_indices
            .iter()
            .map(|i| {
                record
                    .get(*i)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
            .collect();
        rows.push(ScheduleRow { team, fixtures });
    }
    Ok(FdrSchedule { gameweeks, rows })
}

pub fn load_lookup_from_reader<R: Read>(rdr: R) -> Result<FdrLookup> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut rows = Vec::new();
    for (row_no, record) in reader.deserialize::<FdrScores>().enumerate() {
        rows.push(record.with_context(|| format!("read row {}", row_no + 2))?);
    }
    Ok(FdrLookup::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FDR_BANDS;

    #[test]
    fn band_boundaries_belong_to_harder_band() {
        assert_eq!(band_index(0.0, &FDR_BANDS), 0);
        assert_eq!(band_index(0.19, &FDR_BANDS), 0);
        assert_eq!(band_index(0.2, &FDR_BANDS), 1);
        assert_eq!(band_index(0.39, &FDR_BANDS), 1);
        assert_eq!(band_index(0.6, &FDR_BANDS), 3);
        assert_eq!(band_index(0.8, &FDR_BANDS), 4);
        assert_eq!(band_index(1.0, &FDR_BANDS), 4);
    }

    #[test]
    fn out_of_range_scores_clamp() {
        assert_eq!(band_index(-0.3, &FDR_BANDS), 0);
        assert_eq!(band_index(1.7, &FDR_BANDS), 4);
    }

    #[test]
    fn missing_or_nan_score_is_neutral() {
        assert_eq!(band_for(None, &FDR_BANDS), CellStyle::NEUTRAL);
        assert_eq!(band_for(Some(f64::NAN), &FDR_BANDS), CellStyle::NEUTRAL);
    }

    #[test]
    fn first_lookup_row_wins() {
        let lookup = FdrLookup::from_rows([
            FdrScores {
                fixture: "AJA (H)".to_string(),
                fdr_kee: Some(0.1),
                fdr_def: Some(0.2),
                fdr_mid_att: Some(0.3),
            },
            FdrScores {
                fixture: "AJA (H)".to_string(),
                fdr_kee: Some(0.9),
                fdr_def: Some(0.9),
                fdr_mid_att: Some(0.9),
            },
        ]);
        assert_eq!(lookup.score_for(Some("AJA (H)"), PositionGroup::Kee), Some(0.1));
        assert_eq!(lookup.score_for(Some("AJA (H)"), PositionGroup::Def), Some(0.2));
    }

    #[test]
    fn parses_position_groups() {
        assert_eq!("MID/ATT".parse::<PositionGroup>().unwrap(), PositionGroup::MidAtt);
        assert_eq!(" KEE ".parse::<PositionGroup>().unwrap(), PositionGroup::Kee);
        let err = "GK".parse::<PositionGroup>().unwrap_err();
        assert!(err.to_string().contains("invalid position group"));
    }
}
