use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::formatting::CellFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Methodology {
    Expected,
    Adjusted,
    NonPenalty,
}

impl Methodology {
    pub const ALL: [Methodology; 3] = [
        Methodology::Expected,
        Methodology::Adjusted,
        Methodology::NonPenalty,
    ];

    pub fn schema(self) -> &'static StandingsSchema {
        match self {
            Methodology::Expected => &STANDINGS_SCHEMAS[0],
            Methodology::Adjusted => &STANDINGS_SCHEMAS[1],
            Methodology::NonPenalty => &STANDINGS_SCHEMAS[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.schema().label
    }

    pub fn next(self) -> Self {
        match self {
            Methodology::Expected => Methodology::Adjusted,
            Methodology::Adjusted => Methodology::NonPenalty,
            Methodology::NonPenalty => Methodology::Expected,
        }
    }
}

/// Maps one methodology's CSV columns onto the canonical standing fields.
#[derive(Debug)]
pub struct StandingsSchema {
    pub methodology: Methodology,
    pub label: &'static str,
    pub file_name: &'static str,
    pub team: &'static str,
    pub actual_rank: &'static str,
    pub actual_points: &'static str,
    pub expected_rank: &'static str,
    pub expected_points: &'static str,
    pub formats: &'static [(&'static str, CellFormat)],
}

pub static STANDINGS_SCHEMAS: [StandingsSchema; 3] = [
    StandingsSchema {
        methodology: Methodology::Expected,
        label: "Expected Standings",
        file_name: "expected_standings.csv",
        team: "Team",
        actual_rank: "Rank",
        actual_points: "PTS",
        expected_rank: "xRank",
        expected_points: "xPTS",
        formats: &[
            ("GD", CellFormat::SignedInt),
            ("xGD", CellFormat::SignedOneDecimal),
            ("xG", CellFormat::OneDecimal),
            ("xGA", CellFormat::OneDecimal),
            ("xPTS", CellFormat::OneDecimal),
        ],
    },
    StandingsSchema {
        methodology: Methodology::Adjusted,
        label: "Adjusted Expected Standings",
        file_name: "expected_adj_standings.csv",
        team: "Team",
        actual_rank: "Rank",
        actual_points: "PTS",
        expected_rank: "adjxRank",
        expected_points: "adjxPTS",
        formats: &[
            ("GD", CellFormat::SignedInt),
            ("adjxGD", CellFormat::SignedOneDecimal),
            ("adjxG", CellFormat::OneDecimal),
            ("adjxGA", CellFormat::OneDecimal),
            ("adjxPTS", CellFormat::OneDecimal),
        ],
    },
    StandingsSchema {
        methodology: Methodology::NonPenalty,
        label: "Non-Penalty Expected Standings",
        file_name: "expected_np_standings.csv",
        team: "Team",
        actual_rank: "Rank",
        actual_points: "PTS",
        expected_rank: "npxRank",
        expected_points: "npxPTS",
        formats: &[
            ("GD", CellFormat::SignedInt),
            ("npxGD", CellFormat::SignedOneDecimal),
            ("npxG", CellFormat::OneDecimal),
            ("npxGA", CellFormat::OneDecimal),
            ("npxPTS", CellFormat::OneDecimal),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team: String,
    pub actual_rank: u32,
    pub actual_points: u32,
    pub expected_rank: f64,
    pub expected_points: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsTable {
    pub methodology: Methodology,
    pub headers: Vec<String>,
    /// Display cells, already formatted, in the same order as `standings`.
    pub rows: Vec<Vec<String>>,
    pub standings: Vec<TeamStanding>,
    pub warnings: Vec<String>,
}

pub fn load_standings(data_dir: &Path, methodology: Methodology) -> Result<StandingsTable> {
    let path = data_dir.join(methodology.schema().file_name);
    let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
    load_standings_from_reader(file, methodology)
        .with_context(|| format!("parse {}", path.display()))
}

pub fn load_standings_from_reader<R: Read>(
    rdr: R,
    methodology: Methodology,
) -> Result<StandingsTable> {
    let schema = methodology.schema();
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()
        .context("read header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();
    let col = |name: &str| -> Result<usize> {
        index
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("missing column '{name}' for {}", schema.label))
    };
    let team_idx = col(schema.team)?;
    let rank_idx = col(schema.actual_rank)?;
    let pts_idx = col(schema.actual_points)?;
    let xrank_idx = col(schema.expected_rank)?;
    let xpts_idx = col(schema.expected_points)?;

    let formats: Vec<Option<CellFormat>> = headers
        .iter()
        .map(|h| {
            schema
                .formats
                .iter()
                .find(|(name, _)| *name == h.as_str())
                .map(|(_, fmt)| *fmt)
        })
        .collect();

    let mut parsed: Vec<(TeamStanding, Vec<String>)> = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let line = row_no + 2;
        let record = record.with_context(|| format!("read row {line}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let team = field(team_idx).to_string();
        if team.is_empty() {
            return Err(anyhow!("row {line}: empty team name"));
        }
        let standing = TeamStanding {
            actual_rank: parse_whole(field(rank_idx), 1)
                .with_context(|| format!("row {line}: {}", schema.actual_rank))?,
            actual_points: parse_whole(field(pts_idx), 0)
                .with_context(|| format!("row {line}: {}", schema.actual_points))?,
            expected_rank: parse_number(field(xrank_idx))
                .with_context(|| format!("row {line}: {}", schema.expected_rank))?,
            expected_points: parse_number(field(xpts_idx))
                .with_context(|| format!("row {line}: {}", schema.expected_points))?,
            team,
        };
        let cells = (0..headers.len())
            .map(|idx| match formats[idx] {
                Some(fmt) => fmt.apply_raw(field(idx)),
                None => field(idx).to_string(),
            })
            .collect();
        parsed.push((standing, cells));
    }

    if parsed.is_empty() {
        return Err(anyhow!("{} has no rows", schema.file_name));
    }

    parsed.sort_by_key(|(s, _)| s.actual_rank);
    let (standings, rows): (Vec<_>, Vec<_>) = parsed.into_iter().unzip();
    let warnings = data_quality_warnings(&standings);

    Ok(StandingsTable {
        methodology,
        headers,
        rows,
        standings,
        warnings,
    })
}

/// Duplicate teams and rank gaps are tolerated but reported.
pub fn data_quality_warnings(standings: &[TeamStanding]) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for s in standings {
        if !seen.insert(s.team.as_str()) && !dupes.contains(&s.team.as_str()) {
            dupes.push(s.team.as_str());
        }
    }
    if !dupes.is_empty() {
        warnings.push(format!("duplicate team names: {}", dupes.join(", ")));
    }

    let mut ranks: Vec<u32> = standings.iter().map(|s| s.actual_rank).collect();
    ranks.sort_unstable();
    let is_permutation = ranks
        .iter()
        .enumerate()
        .all(|(i, rank)| *rank as usize == i + 1);
    if !is_permutation {
        warnings.push(format!(
            "ranks do not form 1..{} (got {:?})",
            standings.len(),
            ranks
        ));
    }

    warnings
}

fn parse_number(raw: &str) -> Result<f64> {
    let v: f64 = raw
        .parse()
        .with_context(|| format!("'{raw}' is not a number"))?;
    if !v.is_finite() {
        return Err(anyhow!("'{raw}' is not finite"));
    }
    Ok(v)
}

// Whole numbers are sometimes exported as "12.0".
pub(crate) fn parse_whole(raw: &str, min: u32) -> Result<u32> {
    let v = parse_number(raw)?;
    if v.fract() != 0.0 || v < min as f64 || v > u32::MAX as f64 {
        return Err(anyhow!("'{raw}' is not a whole number >= {min}"));
    }
    Ok(v as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "\
Rank,Team,MP,GD,PTS,xG,xGA,xGD,xPTS,xRank
2,Feyenoord,10,12,22,19.44,9.1,10.34,20.56,2
1,PSV,10,20,28,24.0,8.0,16.0,24.9,1
3,Ajax,10,-1,15,14.2,13.25,0.95,16.02,3
";

    #[test]
    fn loads_and_sorts_by_rank() {
        let table = load_standings_from_reader(PLAIN.as_bytes(), Methodology::Expected)
            .expect("valid csv");
        let teams: Vec<&str> = table.standings.iter().map(|s| s.team.as_str()).collect();
        assert_eq!(teams, ["PSV", "Feyenoord", "Ajax"]);
        assert_eq!(table.standings[0].actual_points, 28);
        assert_eq!(table.standings[1].expected_points, 20.56);
        assert!(table.warnings.is_empty());
    }

    #[test]
    fn display_cells_follow_format_table() {
        let table = load_standings_from_reader(PLAIN.as_bytes(), Methodology::Expected)
            .expect("valid csv");
        let gd = table.headers.iter().position(|h| h == "GD").unwrap();
        let xgd = table.headers.iter().position(|h| h == "xGD").unwrap();
        let xpts = table.headers.iter().position(|h| h == "xPTS").unwrap();
        assert_eq!(table.rows[0][gd], "+20");
        assert_eq!(table.rows[2][gd], "-1");
        assert_eq!(table.rows[1][xgd], "+10.3");
        assert_eq!(table.rows[2][xpts], "16.0");
        // MP has no format rule.
        let mp = table.headers.iter().position(|h| h == "MP").unwrap();
        assert_eq!(table.rows[0][mp], "10");
    }

    #[test]
    fn missing_methodology_column_is_an_error() {
        let err = load_standings_from_reader(PLAIN.as_bytes(), Methodology::Adjusted)
            .expect_err("plain file lacks adjxRank");
        assert!(err.to_string().contains("adjxRank"));
    }

    #[test]
    fn fractional_rank_is_rejected() {
        let raw = "Rank,Team,PTS,xPTS,xRank\n1.5,PSV,10,9.0,1\n";
        assert!(load_standings_from_reader(raw.as_bytes(), Methodology::Expected).is_err());
    }

    #[test]
    fn duplicates_and_gaps_are_warnings() {
        let raw = "Rank,Team,PTS,xPTS,xRank\n1,PSV,30,25.0,1\n3,PSV,20,22.0,2\n";
        let table =
            load_standings_from_reader(raw.as_bytes(), Methodology::Expected).expect("loads");
        assert_eq!(table.warnings.len(), 2);
        assert!(table.warnings[0].contains("PSV"));
    }

    #[test]
    fn methodology_cycle_visits_all() {
        let mut m = Methodology::Expected;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(m);
            m = m.next();
        }
        assert_eq!(seen, Methodology::ALL);
        assert_eq!(m, Methodology::Expected);
    }
}
