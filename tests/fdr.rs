use std::fs;
use std::path::PathBuf;

use eredivisie_terminal::config::{CellStyle, FDR_BANDS};
use eredivisie_terminal::fdr::{
    PositionGroup, band_for, band_index, legend, load_fdr, load_lookup_from_reader,
    load_schedule_from_reader, style_schedule,
};

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).expect("fixture file should be readable")
}

#[test]
fn every_unit_score_maps_to_one_band() {
    for step in 0..=1000 {
        let score = step as f64 / 1000.0;
        let idx = band_index(score, &FDR_BANDS);
        assert!(idx < 5);
        assert_eq!(band_for(Some(score), &FDR_BANDS), FDR_BANDS.bands[idx].style);
    }
}

#[test]
fn boundary_scores_enter_the_harder_band() {
    assert_eq!(band_index(0.2, &FDR_BANDS), 1);
    assert_eq!(band_index(0.39, &FDR_BANDS), 1);
    assert_eq!(band_index(0.19, &FDR_BANDS), 0);
    assert_ne!(band_for(Some(0.2), &FDR_BANDS), band_for(Some(0.19), &FDR_BANDS));
    assert_eq!(band_for(Some(1.0), &FDR_BANDS), FDR_BANDS.bands[4].style);
}

#[test]
fn absent_fixture_has_no_score_for_any_group() {
    let lookup = load_lookup_from_reader(read_fixture("fdr_small.csv").as_bytes()).unwrap();
    for group in PositionGroup::ALL {
        assert_eq!(lookup.score_for(None, group), None);
    }
}

#[test]
fn lookup_uses_the_group_column() {
    let lookup = load_lookup_from_reader(read_fixture("fdr_small.csv").as_bytes()).unwrap();
    assert_eq!(lookup.score_for(Some("PSV (A)"), PositionGroup::Kee), Some(0.93));
    assert_eq!(lookup.score_for(Some("PSV (A)"), PositionGroup::Def), Some(0.97));
    assert_eq!(lookup.score_for(Some("PSV (A)"), PositionGroup::MidAtt), Some(1.0));
    assert_eq!(lookup.score_for(Some("XXX (H)"), PositionGroup::Def), None);
}

#[test]
fn styled_schedule_sorts_teams_and_keeps_team_column_neutral() {
    let schedule = load_schedule_from_reader(read_fixture("fdr_schedule.csv").as_bytes()).unwrap();
    let lookup = load_lookup_from_reader(read_fixture("fdr_small.csv").as_bytes()).unwrap();
    let table = style_schedule(&schedule, &lookup, PositionGroup::Def, &FDR_BANDS);

    assert_eq!(table.headers, ["Team", "GW11", "GW12", "GW13"]);
    let teams: Vec<&str> = table.rows.iter().map(|r| r[0].text.as_str()).collect();
    assert_eq!(teams, ["AZ", "Ajax", "FC Twente", "PSV"]);
    for row in &table.rows {
        assert_eq!(row[0].style, CellStyle::NEUTRAL);
    }

    // PSV: AJA (H) def 0.52 -> band 2, AZ (A) def 0.6 -> band 3, bye -> neutral.
    let psv = &table.rows[3];
    assert_eq!(psv[1].style, FDR_BANDS.bands[2].style);
    assert_eq!(psv[2].style, FDR_BANDS.bands[3].style);
    assert_eq!(psv[3].text, "");
    assert_eq!(psv[3].score, None);
    assert_eq!(psv[3].style, CellStyle::NEUTRAL);

    // Unknown fixture code is "no data", not an error.
    let twente = &table.rows[2];
    assert_eq!(twente[3].text, "XXX (H)");
    assert_eq!(twente[3].style, CellStyle::NEUTRAL);

    // AZ: UTR (H) def 0.0 -> easiest band.
    assert_eq!(table.rows[0][3].style, FDR_BANDS.bands[0].style);
}

#[test]
fn position_group_changes_bands() {
    let data = load_fdr(&fixtures_dir()).expect("fixtures load");
    let kee = style_schedule(&data.schedule, &data.lookup, PositionGroup::Kee, &FDR_BANDS);
    let att = style_schedule(&data.schedule, &data.lookup, PositionGroup::MidAtt, &FDR_BANDS);
    // Ajax GW12 TWE (H): kee 0.2 -> band 1, mid/att 0.19 -> band 0.
    assert_eq!(kee.rows[1][2].style, FDR_BANDS.bands[1].style);
    assert_eq!(att.rows[1][2].style, FDR_BANDS.bands[0].style);
}

#[test]
fn legend_lists_five_labelled_bands() {
    let labels: Vec<&str> = legend(&FDR_BANDS).iter().map(|b| b.label).collect();
    assert_eq!(labels, ["1 - Easiest", "2", "3", "4", "5 - Hardest"]);
}

#[test]
fn missing_files_are_reported() {
    let err = load_fdr(&fixtures_dir().join("nope")).unwrap_err();
    assert!(format!("{err:#}").contains("fdr_schedule.csv"));
}
