//! Typed, error-reporting access to raw DataFrame tables.
//!
//! User tables arrive with loosely typed columns: numbers may be stored as
//! strings, integers as floats, and missing values as nulls, NaN or blank
//! strings. [`TableView`] hides those differences behind accessors that either
//! return a typed value or the [`PrepareError`] describing the offending cell.

use std::collections::HashMap;

use polars::prelude::{AnyValue, Column, DataFrame};

use tpg_model::{PrepareError, Result, TableKind, YearMonth};

/// Case-insensitive column lookup. The first column wins when two headers
/// differ only by case or surrounding whitespace.
#[derive(Debug, Clone)]
pub(crate) struct ColumnLookup {
    map: HashMap<String, String>,
}

impl ColumnLookup {
    pub(crate) fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(normalize_name(name))
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&normalize_name(name)).map(String::as_str)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().trim_matches('\u{feff}').to_ascii_lowercase()
}

/// A raw table together with its name, for typed cell access.
pub(crate) struct TableView<'a> {
    table: TableKind,
    df: &'a DataFrame,
    lookup: ColumnLookup,
}

impl<'a> TableView<'a> {
    pub(crate) fn new(table: TableKind, df: &'a DataFrame) -> Self {
        let lookup = ColumnLookup::new(df.get_column_names().iter().map(|name| name.as_str()));
        Self { table, df, lookup }
    }

    /// The header `field` resolves to, exactly as supplied.
    pub(crate) fn header(&self, field: &str) -> Option<&str> {
        self.lookup.get(field)
    }

    pub(crate) fn height(&self) -> usize {
        self.df.height()
    }

    pub(crate) fn has_column(&self, field: &str) -> bool {
        self.lookup.get(field).is_some()
    }

    /// Header names exactly as supplied.
    pub(crate) fn column_names(&self) -> Vec<&'a str> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    /// Fail on the first field in `fields` that has no column.
    pub(crate) fn require_columns(&self, fields: &[&str]) -> Result<()> {
        match fields.iter().find(|field| !self.has_column(field)) {
            Some(field) => Err(self.missing_field(field)),
            None => Ok(()),
        }
    }

    pub(crate) fn missing_field(&self, field: &str) -> PrepareError {
        PrepareError::MissingField {
            table: self.table,
            field: field.to_string(),
        }
    }

    pub(crate) fn missing_value(&self, field: &str, row: usize) -> PrepareError {
        PrepareError::MissingValue {
            table: self.table,
            field: field.to_string(),
            row: row + 1,
        }
    }

    pub(crate) fn invalid_value(
        &self,
        field: &str,
        row: usize,
        value: impl Into<String>,
    ) -> PrepareError {
        PrepareError::InvalidValue {
            table: self.table,
            field: field.to_string(),
            value: value.into(),
            row: row + 1,
        }
    }

    pub(crate) fn out_of_range(
        &self,
        field: &str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> PrepareError {
        PrepareError::Range {
            table: self.table,
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn column(&self, field: &str) -> Result<Option<&'a Column>> {
        match self.lookup.get(field) {
            Some(name) => Ok(Some(self.df.column(name)?)),
            None => Ok(None),
        }
    }

    fn cell(&self, field: &str, row: usize) -> Result<Option<AnyValue<'a>>> {
        match self.column(field)? {
            Some(column) => Ok(Some(column.get(row)?)),
            None => Ok(None),
        }
    }

    /// Finite number or `None` when the column is absent or the cell empty.
    pub(crate) fn opt_f64_at(&self, field: &str, row: usize) -> Result<Option<f64>> {
        let Some(value) = self.cell(field, row)? else {
            return Ok(None);
        };
        match cell_to_f64(&value) {
            Cell::Missing => Ok(None),
            Cell::Value(v) if v.is_finite() => Ok(Some(v)),
            Cell::Value(v) => Err(self.invalid_value(field, row, v.to_string())),
            Cell::Invalid(text) => Err(self.invalid_value(field, row, text)),
        }
    }

    /// Like [`TableView::opt_f64_at`], but `column` is the header exactly as
    /// supplied. Used where names are data (species columns).
    pub(crate) fn opt_f64_in(&self, column: &str, row: usize) -> Result<Option<f64>> {
        let value = self.df.column(column)?.get(row)?;
        let field = column.trim();
        match cell_to_f64(&value) {
            Cell::Missing => Ok(None),
            Cell::Value(v) if v.is_finite() => Ok(Some(v)),
            Cell::Value(v) => Err(self.invalid_value(field, row, v.to_string())),
            Cell::Invalid(text) => Err(self.invalid_value(field, row, text)),
        }
    }

    /// Finite number from a required column.
    pub(crate) fn f64_at(&self, field: &str, row: usize) -> Result<f64> {
        if !self.has_column(field) {
            return Err(self.missing_field(field));
        }
        self.opt_f64_at(field, row)?
            .ok_or_else(|| self.missing_value(field, row))
    }

    /// Whole number from a required column; `3.0` is accepted, `3.5` is not.
    pub(crate) fn i64_at(&self, field: &str, row: usize) -> Result<i64> {
        let value = self.f64_at(field, row)?;
        if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
            return Err(self.invalid_value(field, row, value.to_string()));
        }
        Ok(value as i64)
    }

    /// Trimmed text or `None` when the column is absent or the cell blank.
    pub(crate) fn opt_text_at(&self, field: &str, row: usize) -> Result<Option<String>> {
        let Some(value) = self.cell(field, row)? else {
            return Ok(None);
        };
        let text = any_to_string(value);
        let trimmed = text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    /// Trimmed, non-blank text from a required column.
    pub(crate) fn text_at(&self, field: &str, row: usize) -> Result<String> {
        if !self.has_column(field) {
            return Err(self.missing_field(field));
        }
        self.opt_text_at(field, row)?
            .ok_or_else(|| self.missing_value(field, row))
    }

    /// `YYYY-MM` (or `YYYY-MM-DD`) month from a required column.
    pub(crate) fn month_at(&self, field: &str, row: usize) -> Result<YearMonth> {
        let text = self.text_at(field, row)?;
        YearMonth::parse(&text).ok_or_else(|| self.invalid_value(field, row, text))
    }
}

enum Cell {
    Missing,
    Value(f64),
    Invalid(String),
}

/// Numeric view of a cell. Null, NaN and blank strings count as missing.
fn cell_to_f64(value: &AnyValue<'_>) -> Cell {
    let number = match value {
        AnyValue::Null => return Cell::Missing,
        AnyValue::Int8(v) => f64::from(*v),
        AnyValue::Int16(v) => f64::from(*v),
        AnyValue::Int32(v) => f64::from(*v),
        AnyValue::Int64(v) => *v as f64,
        AnyValue::UInt8(v) => f64::from(*v),
        AnyValue::UInt16(v) => f64::from(*v),
        AnyValue::UInt32(v) => f64::from(*v),
        AnyValue::UInt64(v) => *v as f64,
        AnyValue::Float32(v) => f64::from(*v),
        AnyValue::Float64(v) => *v,
        AnyValue::String(s) => return parse_cell(s),
        AnyValue::StringOwned(s) => return parse_cell(s.as_str()),
        other => return Cell::Invalid(any_to_string(other.clone())),
    };
    if number.is_nan() {
        Cell::Missing
    } else {
        Cell::Value(number)
    }
}

fn parse_cell(text: &str) -> Cell {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("nan")
    {
        return Cell::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => Cell::Value(v),
        Err(_) => Cell::Invalid(trimmed.to_string()),
    }
}

/// Text form of a cell; empty for null.
fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Formats a float without a trailing `.0` so `1.0` reads as `1`.
fn format_numeric(v: f64) -> String {
    if v.is_nan() {
        return String::new();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        trimmed.to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Latitude ".into(), vec![Some(51.5), None]).into_column(),
            Series::new("soil_class".into(), vec!["2", "2.5"]).into_column(),
            Series::new("from".into(), vec!["2000-01", ""]).into_column(),
            Series::new("asw".into(), vec![f64::NAN, f64::INFINITY]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let lookup = ColumnLookup::new(["Latitude ", "latitude"]);
        assert_eq!(lookup.get("LATITUDE"), Some("Latitude "));
        assert_eq!(lookup.get("altitude"), None);
    }

    #[test]
    fn header_resolves_to_first_matching_column() {
        let df = DataFrame::new(vec![
            Series::new("parameter".into(), vec!["aWS"]).into_column(),
            Series::new("Parameter".into(), vec![0.5]).into_column(),
        ])
        .unwrap();
        let view = TableView::new(TableKind::Parameters, &df);
        assert_eq!(view.header("PARAMETER"), Some("parameter"));
        assert_eq!(view.header("species"), None);
    }

    #[test]
    fn numeric_cells() {
        let df = frame();
        let view = TableView::new(TableKind::Site, &df);
        assert_eq!(view.f64_at("latitude", 0).unwrap(), 51.5);
        assert!(matches!(
            view.f64_at("latitude", 1),
            Err(PrepareError::MissingValue { row: 2, .. })
        ));
        assert_eq!(view.opt_f64_at("asw", 0).unwrap(), None);
        assert!(matches!(
            view.opt_f64_at("asw", 1),
            Err(PrepareError::InvalidValue { .. })
        ));
        assert_eq!(view.opt_f64_at("altitude", 0).unwrap(), None);
    }

    #[test]
    fn integer_cells_reject_fractions() {
        let df = frame();
        let view = TableView::new(TableKind::Site, &df);
        assert_eq!(view.i64_at("soil_class", 0).unwrap(), 2);
        assert!(matches!(
            view.i64_at("soil_class", 1),
            Err(PrepareError::InvalidValue { .. })
        ));
    }

    #[test]
    fn text_and_month_cells() {
        let df = frame();
        let view = TableView::new(TableKind::Site, &df);
        assert_eq!(view.month_at("from", 0).unwrap(), YearMonth::new(2000, 1).unwrap());
        assert!(matches!(
            view.text_at("from", 1),
            Err(PrepareError::MissingValue { .. })
        ));
        assert!(matches!(
            view.text_at("to", 0),
            Err(PrepareError::MissingField { .. })
        ));
    }

    #[test]
    fn require_columns_reports_first_absent() {
        let df = frame();
        let view = TableView::new(TableKind::Site, &df);
        let err = view.require_columns(&["latitude", "altitude", "to"]).unwrap_err();
        assert_eq!(
            err,
            PrepareError::MissingField {
                table: TableKind::Site,
                field: "altitude".to_string(),
            }
        );
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(40.0), "40");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(-0.0), "0");
    }
}
