//! Parameter-by-species value tables.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use serde::{Deserialize, Serialize};

/// Name of the column that carries parameter names in the raw layout.
pub const PARAMETER_COLUMN: &str = "parameter";

/// Values indexed by parameter name (rows) and species (columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct SpeciesTable {
    parameters: Vec<String>,
    species: Vec<String>,
    /// One row per parameter, one value per species.
    rows: Vec<Vec<f64>>,
}

/// Unchecked fields; deserialization goes through [`SpeciesTable::from_rows`].
#[derive(Deserialize)]
struct TableParts {
    parameters: Vec<String>,
    species: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TryFrom<TableParts> for SpeciesTable {
    type Error = &'static str;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        Self::from_rows(parts.parameters, parts.species, parts.rows)
            .ok_or("species table shape does not match its parameter and species names")
    }
}

/// Physiological parameters for every species.
pub type ParameterTable = SpeciesTable;

/// Size-distribution (bias correction) parameters for every species.
pub type SizeDistributionTable = SpeciesTable;

impl SpeciesTable {
    /// Build a table; `None` unless there is one row per parameter and one value
    /// per species in every row, and no species is named [`PARAMETER_COLUMN`].
    pub fn from_rows(
        parameters: Vec<String>,
        species: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Option<Self> {
        let shape_ok = rows.len() == parameters.len()
            && rows.iter().all(|row| row.len() == species.len())
            && !species.iter().any(|name| name == PARAMETER_COLUMN);
        shape_ok.then_some(Self {
            parameters,
            species,
            rows,
        })
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn get(&self, parameter: &str, species: &str) -> Option<f64> {
        let row = self.parameters.iter().position(|p| p == parameter)?;
        let col = self.species.iter().position(|s| s == species)?;
        Some(self.rows[row][col])
    }

    /// All values of one parameter, in species order.
    pub fn row(&self, parameter: &str) -> Option<&[f64]> {
        let row = self.parameters.iter().position(|p| p == parameter)?;
        Some(&self.rows[row])
    }

    /// All parameter values of one species, in parameter order.
    pub fn column(&self, species: &str) -> Option<Vec<f64>> {
        let col = self.species.iter().position(|s| s == species)?;
        Some(self.rows.iter().map(|row| row[col]).collect())
    }

    /// Raw layout: a `parameter` column followed by one column per species.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.species.len() + 1);
        columns.push(Series::new(PARAMETER_COLUMN.into(), self.parameters.clone()).into_column());
        for (col, name) in self.species.iter().enumerate() {
            let values: Vec<f64> = self.rows.iter().map(|row| row[col]).collect();
            columns.push(Series::new(name.as_str().into(), values).into_column());
        }
        DataFrame::new(columns)
    }
}
