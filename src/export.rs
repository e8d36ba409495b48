use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};

use crate::config::{CellStyle, FdrBands};
use crate::fdr::{self, FdrData, PositionGroup, StyledTable};
use crate::standings::StandingsTable;

pub struct ExportReport {
    pub fdr_sheets: usize,
    pub standings_sheets: usize,
    pub errors: Vec<String>,
}

/// Writes one sheet per position group with the FDR colours baked in, plus
/// one sheet per standings table that could be loaded.
pub fn export_workbook(
    path: &Path,
    fdr_data: Option<&FdrData>,
    standings: &[&StandingsTable],
    bands: &FdrBands,
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut report = ExportReport {
        fdr_sheets: 0,
        standings_sheets: 0,
        errors: Vec::new(),
    };

    if let Some(data) = fdr_data {
        for group in PositionGroup::ALL {
            let table = fdr::style_schedule(&data.schedule, &data.lookup, group, bands);
            let sheet = workbook.add_worksheet();
            sheet.set_name(format!("FDR {}", group.label().replace('/', "-")))?;
            write_styled(sheet, &table)?;
            report.fdr_sheets += 1;
        }
        let sheet = workbook.add_worksheet();
        sheet.set_name("FDR Key")?;
        write_legend(sheet, bands)?;
    }

    for table in standings {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(table))?;
        let mut rows = vec![table.headers.clone()];
        rows.extend(table.rows.iter().cloned());
        write_rows(sheet, &rows)?;
        report.standings_sheets += 1;
    }

    if report.fdr_sheets == 0 && report.standings_sheets == 0 {
        report.errors.push("nothing to export".to_string());
        return Ok(report);
    }

    workbook
        .save(path)
        .with_context(|| format!("save {}", path.display()))?;
    Ok(report)
}

fn sheet_name(table: &StandingsTable) -> String {
    // Sheet names are capped at 31 characters.
    table.methodology.label().chars().take(31).collect()
}

fn cell_format(style: CellStyle) -> Format {
    let mut format = Format::new()
        .set_background_color(Color::RGB(style.bg.packed()))
        .set_border(FormatBorder::Thin);
    if let Some(fg) = style.fg {
        format = format.set_font_color(Color::RGB(fg.packed()));
    }
    format
}

fn write_styled(worksheet: &mut Worksheet, table: &StyledTable) -> Result<()> {
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);
    for (col_idx, value) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_idx as u16, value, &header)
            .with_context(|| format!("write header {col_idx}"))?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row_no = row_idx as u32 + 1;
            worksheet
                .write_string_with_format(row_no, col_idx as u16, &cell.text, &cell_format(cell.style))
                .with_context(|| format!("write cell ({row_no},{col_idx})"))?;
        }
    }
    worksheet.set_freeze_panes(1, 1)?;
    Ok(())
}

fn write_legend(worksheet: &mut Worksheet, bands: &FdrBands) -> Result<()> {
    for (idx, band) in fdr::legend(bands).iter().enumerate() {
        worksheet
            .write_string_with_format(0, idx as u16, band.label, &cell_format(band.style))
            .with_context(|| format!("write legend {idx}"))?;
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
