use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use eredivisie_terminal::comparison;
use eredivisie_terminal::config::AppConfig;
use eredivisie_terminal::standings::{self, Methodology};

// Prints the rendered comparison for one methodology as JSON, e.g. for
// plotting elsewhere. Usage: comparison_dump [expected|adjusted|np] [data_dir]
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env");
    let cfg = AppConfig::from_env();

    let mut args = std::env::args().skip(1);
    let methodology = match args.next().as_deref() {
        None | Some("expected") => Methodology::Expected,
        Some("adjusted") | Some("adj") => Methodology::Adjusted,
        Some("np") | Some("non-penalty") => Methodology::NonPenalty,
        Some(other) => return Err(anyhow!("unknown methodology '{other}'")),
    };
    let data_dir = args.next().map(PathBuf::from).unwrap_or(cfg.data_dir.clone());

    let table = standings::load_standings(&data_dir, methodology)?;
    for warning in &table.warnings {
        eprintln!("[WARN] {warning}");
    }
    let chart = comparison::render(&table.standings, &cfg.comparison)?;
    for row in &chart.rows {
        eprintln!(
            "[INFO] {}: {} ({:.1} pts)",
            row.label,
            row.delta.direction.label(),
            row.delta.magnitude
        );
    }
    let json = serde_json::to_string_pretty(&chart).context("serialize comparison")?;
    println!("{json}");
    Ok(())
}
