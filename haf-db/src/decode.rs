//! Backend-neutral cell decoding.
//!
//! Each backend turns a result row into a slice of [`Cell`]s in the order of
//! [`ANNUAL_COLUMNS`] / [`MONTHLY_COLUMNS`]; the record constructors here do
//! the type coercion so SQLite and Postgres accept the same loose shapes.

use crate::dates;
use crate::error::DbError;
use crate::models::{AnnualRecord, MonthlyRecord, ANNUAL_COLUMNS, MONTHLY_COLUMNS};
use chrono::NaiveDate;

/// A single value read from the store, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
}

/// Position of a row within its table, for error reporting.
pub(crate) struct RowCtx<'a> {
    pub table: &'a str,
    pub row: usize,
}

impl RowCtx<'_> {
    fn invalid(&self, column: &'static str, detail: impl Into<String>) -> DbError {
        DbError::InvalidValue {
            table: self.table.to_string(),
            column,
            row: self.row,
            detail: detail.into(),
        }
    }

    fn missing(&self, column: &'static str) -> DbError {
        DbError::MissingValue {
            table: self.table.to_string(),
            column,
            row: self.row,
        }
    }

    fn key(&self, column: &'static str, cell: &Cell) -> Result<String, DbError> {
        match cell {
            Cell::Text(s) if !s.trim().is_empty() => Ok(s.clone()),
            Cell::Null | Cell::Text(_) => Err(self.missing(column)),
            other => Err(self.invalid(column, format!("expected text, found {other:?}"))),
        }
    }

    fn number(&self, column: &'static str, cell: &Cell) -> Result<Option<f64>, DbError> {
        match cell {
            Cell::Null => Ok(None),
            Cell::Int(i) => Ok(Some(*i as f64)),
            Cell::Real(f) if f.is_nan() => Ok(None),
            Cell::Real(f) => Ok(Some(*f)),
            Cell::Text(s) if s.trim().is_empty() => Ok(None),
            Cell::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.invalid(column, format!("{s:?} is not numeric"))),
            Cell::Date(d) => Err(self.invalid(column, format!("expected a number, found date {d}"))),
        }
    }

    fn year(&self, column: &'static str, cell: &Cell) -> Result<i32, DbError> {
        let value = match cell {
            Cell::Null => return Err(self.missing(column)),
            Cell::Int(i) => *i,
            // Years written through a float column arrive as 2020.0
            Cell::Real(f) if f.fract() == 0.0 => *f as i64,
            Cell::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.invalid(column, format!("{s:?} is not a year")))?,
            other => return Err(self.invalid(column, format!("{other:?} is not a year"))),
        };
        i32::try_from(value).map_err(|_| self.invalid(column, format!("{value} is out of range")))
    }

    fn label(&self, cell: &Cell) -> Option<String> {
        match cell {
            Cell::Null => None,
            Cell::Int(i) => Some(i.to_string()),
            Cell::Real(f) if f.is_nan() => None,
            Cell::Real(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
            Cell::Real(f) => Some(f.to_string()),
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Date(d) => Some(dates::format_date(d)),
        }
    }

    fn month(&self, column: &'static str, cell: &Cell) -> Result<NaiveDate, DbError> {
        match cell {
            Cell::Date(d) => Ok(*d),
            Cell::Text(s) => dates::parse_month(s)
                .ok_or_else(|| self.invalid(column, format!("{s:?} is not a date"))),
            Cell::Null => Err(self.missing(column)),
            other => Err(self.invalid(column, format!("{other:?} is not a date"))),
        }
    }
}

impl AnnualRecord {
    /// Build a record from cells ordered as [`ANNUAL_COLUMNS`].
    pub(crate) fn from_cells(ctx: &RowCtx<'_>, cells: &[Cell]) -> Result<Self, DbError> {
        let [msa, year, income, hvi, mortgage_rate, affordability, predicted, cluster] = cells else {
            return Err(ctx.invalid(ANNUAL_COLUMNS[0], format!("expected {} columns", ANNUAL_COLUMNS.len())));
        };
        Ok(Self {
            msa: ctx.key("msa", msa)?,
            year: ctx.year("year", year)?,
            income: ctx.number("income", income)?,
            hvi: ctx.number("hvi", hvi)?,
            mortgage_rate: ctx.number("mortgage_rate", mortgage_rate)?,
            affordability: ctx.number("affordability", affordability)?,
            predicted_affordability: ctx.number("predicted_affordability", predicted)?,
            cluster: ctx.label(cluster),
        })
    }
}

impl MonthlyRecord {
    /// Build a record from cells ordered as [`MONTHLY_COLUMNS`].
    pub(crate) fn from_cells(ctx: &RowCtx<'_>, cells: &[Cell]) -> Result<Self, DbError> {
        let [msa, month_year, hvi, mortgage_rate] = cells else {
            return Err(ctx.invalid(MONTHLY_COLUMNS[0], format!("expected {} columns", MONTHLY_COLUMNS.len())));
        };
        Ok(Self {
            msa: ctx.key("msa", msa)?,
            month_year: ctx.month("month_year", month_year)?,
            hvi: ctx.number("hvi", hvi)?,
            mortgage_rate: ctx.number("mortgage_rate", mortgage_rate)?,
        })
    }
}
