use std::cmp::Ordering;

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::config::{ComparisonStyle, Rgb};
use crate::standings::TeamStanding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    OverPerforming,
    UnderPerforming,
    AsExpected,
}

impl Direction {
    /// A team over-performs when its expected rank is better (numerically
    /// lower) than where it actually sits.
    pub fn from_ranks(actual_rank: u32, expected_rank: f64) -> Self {
        match expected_rank.total_cmp(&(actual_rank as f64)) {
            Ordering::Less => Direction::OverPerforming,
            Ordering::Greater => Direction::UnderPerforming,
            Ordering::Equal => Direction::AsExpected,
        }
    }

    pub fn color(self, style: &ComparisonStyle) -> Rgb {
        match self {
            Direction::OverPerforming => style.colors.over,
            Direction::UnderPerforming => style.colors.under,
            Direction::AsExpected => style.colors.as_expected,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::OverPerforming => "over",
            Direction::UnderPerforming => "under",
            Direction::AsExpected => "as expected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankDelta {
    pub team: String,
    pub direction: Direction,
    pub magnitude: f64,
}

impl RankDelta {
    pub fn of(standing: &TeamStanding) -> Self {
        Self {
            team: standing.team.clone(),
            direction: Direction::from_ranks(standing.actual_rank, standing.expected_rank),
            magnitude: (standing.actual_points as f64 - standing.expected_points).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Actual,
    Expected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub team: String,
    /// Tail, next to the actual marker.
    pub from_x: f64,
    /// Head, next to the expected marker.
    pub to_x: f64,
    pub y: f64,
    pub color: Rgb,
}

impl Connector {
    pub fn points_right(&self) -> bool {
        self.to_x > self.from_x
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub team: String,
    pub actual_rank: u32,
    pub label: String,
    pub delta: RankDelta,
    pub actual: Marker,
    pub expected: Marker,
    pub connector: Option<Connector>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    pub kind: MarkerKind,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedComparison {
    /// Top to bottom.
    pub rows: Vec<ComparisonRow>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Rank 1 is drawn at the top, so the y axis runs downwards.
    pub y_reversed: bool,
    pub legend: Vec<LegendEntry>,
    pub threshold: f64,
}

impl RenderedComparison {
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.rows.iter().filter_map(|r| r.connector.as_ref())
    }

    pub fn axis_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }
}

pub fn render(standings: &[TeamStanding], style: &ComparisonStyle) -> Result<RenderedComparison> {
    if standings.is_empty() {
        return Err(anyhow!("no standings to compare"));
    }

    let mut ordered: Vec<&TeamStanding> = standings.iter().collect();
    // Stable sort keeps input order for exact duplicates.
    ordered.sort_by(|a, b| {
        a.actual_rank
            .cmp(&b.actual_rank)
            .then_with(|| a.team.cmp(&b.team))
    });

    let rows: Vec<ComparisonRow> = ordered.into_iter().map(|s| render_row(s, style)).collect();

    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for row in &rows {
        lo = lo.min(row.actual.x).min(row.expected.x);
        hi = hi.max(row.actual.x).max(row.expected.x);
    }
    let max_rank = rows.iter().map(|r| r.actual_rank).max().unwrap_or(1);

    Ok(RenderedComparison {
        rows,
        x_bounds: [lo - 1.0, hi + 1.0],
        y_bounds: [0.5, max_rank as f64 + 0.5],
        y_reversed: true,
        legend: vec![
            LegendEntry {
                label: "Actual",
                kind: MarkerKind::Actual,
                color: style.colors.actual_marker,
            },
            LegendEntry {
                label: "Expected",
                kind: MarkerKind::Expected,
                color: style.colors.as_expected,
            },
        ],
        threshold: style.magnitude_threshold,
    })
}

fn render_row(s: &TeamStanding, style: &ComparisonStyle) -> ComparisonRow {
    let delta = RankDelta::of(s);
    let color = delta.direction.color(style);
    let y = s.actual_rank as f64;
    let actual_x = s.actual_points as f64;
    let expected_x = s.expected_points;

    let connector = (delta.magnitude >= style.magnitude_threshold).then(|| {
        let inset = style.marker_radius.min(delta.magnitude / 4.0);
        let sign = (expected_x - actual_x).signum();
        Connector {
            team: s.team.clone(),
            from_x: actual_x + sign * inset,
            to_x: expected_x - sign * inset,
            y,
            color,
        }
    });

    ComparisonRow {
        team: s.team.clone(),
        actual_rank: s.actual_rank,
        label: format!("{}. {}", s.actual_rank, s.team),
        actual: Marker {
            kind: MarkerKind::Actual,
            x: actual_x,
            y,
            color: style.colors.actual_marker,
        },
        expected: Marker {
            kind: MarkerKind::Expected,
            x: expected_x,
            y,
            color,
        },
        connector,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(team: &str, rank: u32, pts: u32, xrank: f64, xpts: f64) -> TeamStanding {
        TeamStanding {
            team: team.to_string(),
            actual_rank: rank,
            actual_points: pts,
            expected_rank: xrank,
            expected_points: xpts,
        }
    }

    #[test]
    fn direction_follows_rank_order() {
        assert_eq!(Direction::from_ranks(3, 1.0), Direction::OverPerforming);
        assert_eq!(Direction::from_ranks(1, 3.0), Direction::UnderPerforming);
        assert_eq!(Direction::from_ranks(2, 2.0), Direction::AsExpected);
        assert_eq!(Direction::from_ranks(2, 1.99), Direction::OverPerforming);
        assert_eq!(Direction::from_ranks(1, 3.0).label(), "under");
        assert_eq!(Direction::from_ranks(2, 2.0).label(), "as expected");
    }

    #[test]
    fn connector_is_inset_from_both_markers() {
        let style = ComparisonStyle::default();
        let out = render(&[standing("PSV", 1, 30, 2.0, 24.0)], &style).unwrap();
        let c = out.rows[0].connector.as_ref().expect("magnitude 6 draws");
        assert!((c.from_x - 29.6).abs() < 1e-9);
        assert!((c.to_x - 24.4).abs() < 1e-9);
        assert!(!c.points_right());
    }

    #[test]
    fn short_connector_never_inverts() {
        let style = ComparisonStyle::default().with_threshold(0.5);
        let out = render(&[standing("AZ", 1, 10, 1.0, 10.8)], &style).unwrap();
        let c = out.rows[0].connector.as_ref().expect("0.8 >= 0.5");
        assert!(c.points_right());
        assert!(c.from_x < c.to_x);
        assert!((c.from_x - 10.2).abs() < 1e-9);
    }

    #[test]
    fn bounds_pad_every_marker() {
        let out = render(
            &[standing("A", 1, 50, 3.0, 44.0), standing("B", 2, 40, 1.0, 48.0)],
            &ComparisonStyle::default(),
        )
        .unwrap();
        assert_eq!(out.x_bounds, [39.0, 51.0]);
        assert_eq!(out.y_bounds, [0.5, 2.5]);
        assert!(out.y_reversed);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(render(&[], &ComparisonStyle::default()).is_err());
    }
}
