use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use eredivisie_terminal::fdr::{LOOKUP_FILE, SCHEDULE_FILE};
use eredivisie_terminal::results::RESULTS_FILE;
use eredivisie_terminal::standings::Methodology;

const TEAMS: [(&str, &str); 18] = [
    ("PSV", "PSV"),
    ("Feyenoord", "FEY"),
    ("Ajax", "AJA"),
    ("AZ", "AZ"),
    ("FC Twente", "TWE"),
    ("FC Utrecht", "UTR"),
    ("Go Ahead Eagles", "GAE"),
    ("NEC", "NEC"),
    ("sc Heerenveen", "HEE"),
    ("Sparta Rotterdam", "SPA"),
    ("Fortuna Sittard", "FOR"),
    ("PEC Zwolle", "PEC"),
    ("FC Groningen", "GRO"),
    ("Heracles Almelo", "HER"),
    ("NAC Breda", "NAC"),
    ("Willem II", "WIL"),
    ("RKC Waalwijk", "RKC"),
    ("Almere City", "ALM"),
];

const PLAYED: u32 = 10;
const UPCOMING: u32 = 6;

// Writes a synthetic data directory so the terminal can be tried without the
// real model output. Usage: demo_data [out_dir] [seed]
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(2024);
    let mut rng = StdRng::seed_from_u64(seed);

    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let strength: Vec<f64> = (0..TEAMS.len())
        .map(|i| 1.0 - i as f64 / TEAMS.len() as f64 + rng.gen_range(-0.15..0.15))
        .collect();

    let mut results = Vec::new();
    for gw in 1..=PLAYED {
        for (home, away) in pairings(&mut rng, 0) {
            results.push(simulate(&mut rng, gw, home, away, &strength));
        }
    }
    write_results(&out_dir, &results)?;
    for methodology in Methodology::ALL {
        write_standings(&out_dir, methodology, &results, &mut rng)?;
    }
    write_fdr(&out_dir, &strength, &mut rng)?;

    println!("Demo data written to {}", out_dir.display());
    Ok(())
}

struct SimResult {
    gw: u32,
    home: usize,
    away: usize,
    p: [f64; 3],
    xg: [f64; 2],
    goals: [u32; 2],
}

impl SimResult {
    fn xpts(&self) -> [f64; 2] {
        [
            3.0 * self.p[0] + self.p[1],
            3.0 * self.p[2] + self.p[1],
        ]
    }
}

/// Random pairings for one round; `byes` teams sit out.
fn pairings(rng: &mut StdRng, byes: usize) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..TEAMS.len()).collect();
    order.shuffle(rng);
    order.truncate(TEAMS.len() - byes);
    order.chunks(2).filter(|c| c.len() == 2).map(|c| (c[0], c[1])).collect()
}

fn simulate(rng: &mut StdRng, gw: u32, home: usize, away: usize, strength: &[f64]) -> SimResult {
    let diff = strength[home] - strength[away] + 0.1;
    let p_home = (0.45 + diff * 0.4).clamp(0.05, 0.9);
    let p_draw = 0.25_f64.min(1.0 - p_home);
    let p_away = 1.0 - p_home - p_draw;
    let xg = [
        (1.4 + diff + rng.gen_range(-0.4..0.4)).max(0.1),
        (1.2 - diff + rng.gen_range(-0.4..0.4)).max(0.1),
    ];
    let goals = [
        (xg[0] + rng.gen_range(-1.0..1.2)).round().max(0.0) as u32,
        (xg[1] + rng.gen_range(-1.0..1.2)).round().max(0.0) as u32,
    ];
    SimResult {
        gw,
        home,
        away,
        p: [p_home, p_draw, p_away],
        xg,
        goals,
    }
}

fn write_results(dir: &Path, results: &[SimResult]) -> Result<()> {
    let mut w = csv::Writer::from_path(dir.join(RESULTS_FILE))?;
    w.write_record([
        "GW", "Home", "Away", "Home_Win_pct", "Draw_pct", "Away_Win_pct", "Home_xPTS",
        "Home_xG", "Home_Goals", "Away_Goals", "Away_xG", "Away_xPTS",
    ])?;
    for r in results {
        let xpts = r.xpts();
        w.write_record([
            r.gw.to_string(),
            TEAMS[r.home].0.to_string(),
            TEAMS[r.away].0.to_string(),
            format!("{:.3}", r.p[0]),
            format!("{:.3}", r.p[1]),
            format!("{:.3}", r.p[2]),
            format!("{:.2}", xpts[0]),
            format!("{:.2}", r.xg[0]),
            r.goals[0].to_string(),
            r.goals[1].to_string(),
            format!("{:.2}", r.xg[1]),
            format!("{:.2}", xpts[1]),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[derive(Default, Clone)]
struct Tally {
    pts: u32,
    gf: u32,
    ga: u32,
    xg: f64,
    xga: f64,
    xpts: f64,
}

fn write_standings(
    dir: &Path,
    methodology: Methodology,
    results: &[SimResult],
    rng: &mut StdRng,
) -> Result<()> {
    let schema = methodology.schema();
    // Penalty adjustment only nudges xG, so the variants stay close.
    let wobble = match methodology {
        Methodology::Expected => 0.0,
        Methodology::Adjusted | Methodology::NonPenalty => 0.08,
    };

    let mut tally = vec![Tally::default(); TEAMS.len()];
    for r in results {
        let xpts = r.xpts();
        let points = match r.goals[0].cmp(&r.goals[1]) {
            std::cmp::Ordering::Greater => (3, 0),
            std::cmp::Ordering::Less => (0, 3),
            std::cmp::Ordering::Equal => (1, 1),
        };
        for (side, team) in [(0, r.home), (1, r.away)] {
            let t = &mut tally[team];
            t.pts += if side == 0 { points.0 } else { points.1 };
            t.gf += r.goals[side];
            t.ga += r.goals[1 - side];
            t.xg += r.xg[side] * (1.0 + rng.gen_range(-wobble..=wobble));
            t.xga += r.xg[1 - side];
            t.xpts += xpts[side];
        }
    }

    let mut by_points: Vec<usize> = (0..TEAMS.len()).collect();
    let gd = |t: &Tally| t.gf as i64 - t.ga as i64;
    by_points.sort_by(|a, b| {
        tally[*b]
            .pts
            .cmp(&tally[*a].pts)
            .then(gd(&tally[*b]).cmp(&gd(&tally[*a])))
    });
    let mut by_xpts: Vec<usize> = (0..TEAMS.len()).collect();
    by_xpts.sort_by(|a, b| tally[*b].xpts.total_cmp(&tally[*a].xpts));

    let p = schema.expected_points.trim_end_matches("PTS");
    let mut w = csv::Writer::from_path(dir.join(schema.file_name))?;
    w.write_record([
        "Rank".to_string(),
        "Team".to_string(),
        "MP".to_string(),
        "GD".to_string(),
        "PTS".to_string(),
        format!("{p}G"),
        format!("{p}GA"),
        format!("{p}GD"),
        schema.expected_points.to_string(),
        schema.expected_rank.to_string(),
    ])?;
    for (pos, team) in by_points.iter().enumerate() {
        let t = &tally[*team];
        let xrank = by_xpts.iter().position(|i| i == team).unwrap_or(0) + 1;
        w.write_record([
            (pos + 1).to_string(),
            TEAMS[*team].0.to_string(),
            PLAYED.to_string(),
            gd(t).to_string(),
            t.pts.to_string(),
            format!("{:.2}", t.xg),
            format!("{:.2}", t.xga),
            format!("{:.2}", t.xg - t.xga),
            format!("{:.2}", t.xpts),
            xrank.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn write_fdr(dir: &Path, strength: &[f64], rng: &mut StdRng) -> Result<()> {
    let mut schedule = vec![vec![String::new(); UPCOMING as usize]; TEAMS.len()];
    for gw in 0..UPCOMING as usize {
        let byes = if gw == 2 { 2 } else { 0 };
        for (home, away) in pairings(rng, byes) {
            schedule[home][gw] = format!("{} (H)", TEAMS[away].1);
            schedule[away][gw] = format!("{} (A)", TEAMS[home].1);
        }
    }

    let mut w = csv::Writer::from_path(dir.join(SCHEDULE_FILE))?;
    let mut header = vec!["Team".to_string()];
    header.extend((PLAYED + 1..=PLAYED + UPCOMING).map(|gw| format!("GW{gw}")));
    w.write_record(&header)?;
    for (idx, row) in schedule.iter().enumerate() {
        let mut record = vec![TEAMS[idx].0.to_string()];
        record.extend(row.iter().cloned());
        w.write_record(&record)?;
    }
    w.flush()?;

    let mut w = csv::Writer::from_path(dir.join(LOOKUP_FILE))?;
    w.write_record(["fixture", "fdr_kee", "fdr_def", "fdr_mid_att"])?;
    for (idx, (_, code)) in TEAMS.iter().enumerate() {
        for (venue, home_edge) in [("H", -0.08), ("A", 0.08)] {
            let base = strength[idx].clamp(0.0, 1.0);
            let score = |spread: f64, rng: &mut StdRng| {
                (base + home_edge + rng.gen_range(-spread..spread)).clamp(0.0, 1.0)
            };
            let kee = score(0.05, &mut *rng);
            let def = score(0.08, &mut *rng);
            let att = score(0.12, &mut *rng);
            w.write_record([
                format!("{code} ({venue})"),
                format!("{kee:.3}"),
                format!("{def:.3}"),
                format!("{att:.3}"),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
