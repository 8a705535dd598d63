//! Spreadsheet export of ranked consensus results.
//!
//! One CSV per `(sport, DFS site)`, with a fixed bookmaker column layout
//! taken from the sport profile. Each bookmaker cell holds that book's
//! American price on the selected side, blank when the book did not
//! quote it.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::sports::Sport;
use crate::types::{ConsensusResult, DfsSite};

const LEADING_COLUMNS: &[&str] = &["Player Name", "Lean", "Prop Line", "Market"];
const TRAILING_COLUMN: &str = "Fair Probability";

/// Writes ranked results into a configured directory.
#[derive(Debug, Clone)]
pub struct TabularExporter {
    directory: PathBuf,
}

impl TabularExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// `<sport>_<site>_props.csv`
    pub fn file_name(sport: Sport, site: DfsSite) -> String {
        format!("{}_{}_props.csv", sport.slug(), site.slug())
    }

    /// Write (or overwrite) the export for one sport and site.
    pub fn export(
        &self,
        sport: Sport,
        site: DfsSite,
        bookmaker_columns: &[String],
        results: &[ConsensusResult],
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!("Failed to create export directory {}", self.directory.display())
        })?;

        let path = self.directory.join(Self::file_name(sport, site));
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        writer
            .write_record(header(bookmaker_columns))
            .context("Failed to write export header")?;
        for result in results {
            writer
                .write_record(build_row(result, bookmaker_columns))
                .context("Failed to write export row")?;
        }
        writer.flush().context("Failed to flush export")?;

        info!(
            sport = %sport,
            site = %site,
            rows = results.len(),
            path = %path.display(),
            "Exported props"
        );
        Ok(path)
    }
}

fn header(bookmaker_columns: &[String]) -> Vec<String> {
    LEADING_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .chain(bookmaker_columns.iter().cloned())
        .chain(std::iter::once(TRAILING_COLUMN.to_string()))
        .collect()
}

/// One export row. Bookmakers outside the column layout are left out.
pub fn build_row(result: &ConsensusResult, bookmaker_columns: &[String]) -> Vec<String> {
    let mut row = vec![
        result.player_name.clone(),
        result.selected_side.title().to_string(),
        result.line.to_string(),
        result.market_label.clone(),
    ];

    for column in bookmaker_columns {
        let cell = result
            .contributing_quotes
            .iter()
            .find(|q| &q.bookmaker == column)
            .map(|q| q.american_price.to_string())
            .unwrap_or_default();
        row.push(cell);
    }

    row.push(result.implied_probability.to_string());
    row
}
