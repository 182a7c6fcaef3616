use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::table::DataTable;
use crate::infrastructure::artifact_store::read_artifact;
use crate::infrastructure::csv::CsvParser;

pub const OCCUPATION_COLUMN: &str = "Occupation";

/// Distinct occupations from the reference dataset, sorted. Loaded once at
/// startup and never modified.
#[derive(Debug, Clone, Default)]
pub struct ReferenceOccupations {
    occupations: Vec<String>,
}

impl ReferenceOccupations {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = read_artifact(path)?;
        let table = CsvParser::new().parse_bytes(&bytes)?;
        let occupations = Self::from_table(&table)?;

        info!(
            path = %path.display(),
            rows = table.len(),
            occupations = occupations.len(),
            "Loaded reference occupations"
        );
        Ok(occupations)
    }

    pub fn from_table(table: &DataTable) -> Result<Self> {
        let col = table.column_index(OCCUPATION_COLUMN).ok_or_else(|| {
            AppError::ValidationError(format!(
                "reference dataset has no {} column",
                OCCUPATION_COLUMN
            ))
        })?;

        let distinct: BTreeSet<String> = table
            .rows
            .iter()
            .filter_map(|row| row.get(col))
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .collect();

        let occupations = Self {
            occupations: distinct.into_iter().collect(),
        };
        if occupations.is_empty() {
            return Err(AppError::ValidationError(format!(
                "reference dataset has no {} values",
                OCCUPATION_COLUMN
            )));
        }
        Ok(occupations)
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|value: &String| !value.trim().is_empty())
            .collect();
        Self {
            occupations: distinct.into_iter().collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.occupations
    }

    pub fn contains(&self, occupation: &str) -> bool {
        self.occupations
            .binary_search_by(|probe| probe.as_str().cmp(occupation))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.occupations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupations.is_empty()
    }
}
