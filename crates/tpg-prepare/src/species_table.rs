//! Merge of a user override table onto a default parameter table.
//!
//! Both the physiological parameters and the size-distribution parameters use
//! the same raw layout: a `parameter` column naming the row, then one numeric
//! column per species. The merged table holds every default parameter (in
//! default order) for every species (in species-table order); cells the user
//! supplies replace the default, everything else keeps it.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use tracing::debug;

use tpg_defaults::DefaultTable;
use tpg_model::{PARAMETER_COLUMN, PrepareError, Result, SpeciesSet, SpeciesTable, TableKind};

use crate::frame::TableView;

/// Merge `overrides` onto `defaults` for every species in `species`.
///
/// Fails when a row names a parameter outside `defaults`, when a column is not
/// a species of the scenario, or when a parameter row or species column is
/// repeated.
pub fn merge_species_table(
    table: TableKind,
    defaults: &DefaultTable,
    overrides: Option<&DataFrame>,
    species: &SpeciesSet,
    log_defaults: bool,
) -> Result<SpeciesTable> {
    let mut rows: Vec<Vec<f64>> = defaults
        .entries()
        .iter()
        .map(|entry| vec![entry.default; species.len()])
        .collect();

    let overridden = match overrides.filter(|df| df.width() > 0) {
        Some(df) => apply_overrides(table, defaults, df, species, &mut rows)?,
        None => 0,
    };

    let cells = defaults.len() * species.len();
    if log_defaults && overridden < cells {
        debug!(
            %table,
            defaulted = cells - overridden,
            overridden,
            "parameter defaults applied"
        );
    }

    let parameters = defaults.names().map(str::to_string).collect();
    SpeciesTable::from_rows(parameters, species.names().to_vec(), rows).ok_or_else(|| {
        PrepareError::Frame {
            message: format!("merged {table} table has an inconsistent shape"),
        }
    })
}

/// Write user values into `rows`; returns the number of cells replaced.
fn apply_overrides(
    table: TableKind,
    defaults: &DefaultTable,
    df: &DataFrame,
    species: &SpeciesSet,
    rows: &mut [Vec<f64>],
) -> Result<usize> {
    let view = TableView::new(table, df);
    view.require_columns(&[PARAMETER_COLUMN])?;

    // The parameter column is the first header matching `parameter`; every
    // other header is a species column, matched exactly after trimming.
    let parameter_header = view.header(PARAMETER_COLUMN).map(str::to_string);
    let mut columns: Vec<(&str, usize)> = Vec::new();
    let mut seen_columns = HashSet::new();
    for header in view.column_names() {
        if parameter_header.as_deref() == Some(header) {
            continue;
        }
        let name = header.trim();
        let Some(position) = species.position(name) else {
            return Err(PrepareError::UnknownSpeciesColumn {
                table,
                column: name.to_string(),
            });
        };
        if !seen_columns.insert(position) {
            return Err(view.out_of_range("column", name, "species column appears more than once"));
        }
        columns.push((header, position));
    }

    let mut seen_parameters = HashSet::new();
    let mut overridden = 0usize;
    for row in 0..view.height() {
        let parameter = view.text_at(PARAMETER_COLUMN, row)?;
        let Some(index) = defaults.position(&parameter) else {
            return Err(PrepareError::UnknownParameterName { table, parameter });
        };
        if !seen_parameters.insert(index) {
            return Err(view.out_of_range(
                PARAMETER_COLUMN,
                parameter,
                "parameter row appears more than once",
            ));
        }

        for &(header, position) in &columns {
            if let Some(value) = view.opt_f64_in(header, row)? {
                rows[index][position] = value;
                overridden += 1;
            }
        }
    }

    debug!(
        %table,
        rows = view.height(),
        species_columns = columns.len(),
        overridden,
        "overrides applied"
    );
    Ok(overridden)
}
