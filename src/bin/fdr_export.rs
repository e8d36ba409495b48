use std::path::PathBuf;

use anyhow::{Result, anyhow};

use eredivisie_terminal::config::AppConfig;
use eredivisie_terminal::datasets::DatasetStore;
use eredivisie_terminal::export;
use eredivisie_terminal::standings::Methodology;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let cfg = AppConfig::from_env();

    let out = parse_arg("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("eredivisie_fdr.xlsx"));
    let data_dir = parse_arg("--data")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.data_dir.clone());

    let mut store = DatasetStore::new(data_dir);
    let mut errors = Vec::new();

    let fdr = match store.fdr() {
        Ok(data) => Some(data),
        Err(err) => {
            errors.push(format!("fdr: {err:#}"));
            None
        }
    };

    let mut tables = Vec::new();
    for methodology in Methodology::ALL {
        match store.standings(methodology) {
            Ok(table) => {
                for warning in &table.warnings {
                    eprintln!("[WARN] {}: {warning}", methodology.label());
                }
                tables.push(table);
            }
            Err(err) => errors.push(format!("{}: {err:#}", methodology.label())),
        }
    }
    let table_refs: Vec<_> = tables.iter().map(|t| t.as_ref()).collect();

    let report = export::export_workbook(&out, fdr.as_deref(), &table_refs, &cfg.bands)?;
    errors.extend(report.errors);

    for err in &errors {
        eprintln!("[WARN] {err}");
    }
    if report.fdr_sheets == 0 && report.standings_sheets == 0 {
        return Err(anyhow!("no datasets found in {}", store.data_dir().display()));
    }

    println!("Export complete");
    println!("File: {}", out.display());
    println!("FDR sheets: {}", report.fdr_sheets);
    println!("Standings sheets: {}", report.standings_sheets);
    Ok(())
}

fn parse_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
