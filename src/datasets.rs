use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::comparison::{self, RenderedComparison};
use crate::config::ComparisonStyle;
use crate::fdr::{self, FdrData};
use crate::results::{self, ResultsTable};
use crate::standings::{self, Methodology, StandingsTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetId {
    Standings(Methodology),
    Results,
    Fdr,
}

impl DatasetId {
    pub fn describe(self) -> String {
        match self {
            DatasetId::Standings(m) => format!("'{}'", m.schema().file_name),
            DatasetId::Results => format!("'{}'", results::RESULTS_FILE),
            DatasetId::Fdr => format!("'{}' and '{}'", fdr::SCHEDULE_FILE, fdr::LOOKUP_FILE),
        }
    }
}

/// Static CSVs are parsed once per dataset and shared from then on. Failed
/// loads are not remembered, so the next request tries the disk again.
#[derive(Debug, Default)]
pub struct DatasetStore {
    data_dir: PathBuf,
    standings: HashMap<Methodology, Arc<StandingsTable>>,
    results: Option<Arc<ResultsTable>>,
    fdr: Option<Arc<FdrData>>,
    comparisons: HashMap<(Methodology, u64, u64), Arc<RenderedComparison>>,
    loads: usize,
}

impl DatasetStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Number of successful parses so far.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn is_cached(&self, id: DatasetId) -> bool {
        match id {
            DatasetId::Standings(m) => self.standings.contains_key(&m),
            DatasetId::Results => self.results.is_some(),
            DatasetId::Fdr => self.fdr.is_some(),
        }
    }

    pub fn standings(&mut self, methodology: Methodology) -> Result<Arc<StandingsTable>> {
        if let Some(table) = self.standings.get(&methodology) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(standings::load_standings(&self.data_dir, methodology)?);
        self.loads += 1;
        self.standings.insert(methodology, Arc::clone(&table));
        Ok(table)
    }

    pub fn results(&mut self) -> Result<Arc<ResultsTable>> {
        if let Some(table) = &self.results {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(results::load_results(&self.data_dir)?);
        self.loads += 1;
        self.results = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn fdr(&mut self) -> Result<Arc<FdrData>> {
        if let Some(data) = &self.fdr {
            return Ok(Arc::clone(data));
        }
        let data = Arc::new(fdr::load_fdr(&self.data_dir)?);
        self.loads += 1;
        self.fdr = Some(Arc::clone(&data));
        Ok(data)
    }

    /// Read-through cache of rendered charts keyed by methodology and the
    /// numeric style parameters.
    pub fn comparison(
        &mut self,
        methodology: Methodology,
        style: &ComparisonStyle,
    ) -> Result<Arc<RenderedComparison>> {
        let key = (
            methodology,
            style.magnitude_threshold.to_bits(),
            style.marker_radius.to_bits(),
        );
        if let Some(chart) = self.comparisons.get(&key) {
            return Ok(Arc::clone(chart));
        }
        let table = self.standings(methodology)?;
        let chart = Arc::new(comparison::render(&table.standings, style)?);
        self.comparisons.insert(key, Arc::clone(&chart));
        Ok(chart)
    }
}
