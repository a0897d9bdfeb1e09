//! Postgres reader for the production tables, via `sqlx`.
//!
//! One connection is opened, both `SELECT *` queries run on it, and it is
//! closed again. There is no pool and no retry: a failure here aborts
//! startup.

use crate::decode::{Cell, RowCtx};
use crate::error::DbError;
use crate::models::{AnnualRecord, MonthlyRecord, ANNUAL_COLUMNS, MONTHLY_COLUMNS};
use crate::schema::TableNames;
use crate::source::PostgresSettings;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::types::BigDecimal;
use sqlx::{Connection, Row, TypeInfo, ValueRef};

fn connect_options(settings: &PostgresSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.database)
        .username(&settings.user)
        .password(&settings.password)
}

/// Read one column of a row into a backend-neutral cell.
fn pg_cell(row: &PgRow, column: &str) -> Result<Cell, sqlx::Error> {
    let type_name = {
        let raw = row.try_get_raw(column)?;
        if raw.is_null() {
            return Ok(Cell::Null);
        }
        raw.type_info().name().to_ascii_uppercase()
    };

    let cell = match type_name.as_str() {
        "FLOAT8" => Cell::Real(row.try_get::<f64, _>(column)?),
        "FLOAT4" => Cell::Real(f64::from(row.try_get::<f32, _>(column)?)),
        "INT8" => Cell::Int(row.try_get::<i64, _>(column)?),
        "INT4" => Cell::Int(i64::from(row.try_get::<i32, _>(column)?)),
        "INT2" => Cell::Int(i64::from(row.try_get::<i16, _>(column)?)),
        "NUMERIC" => numeric_cell(row.try_get::<BigDecimal, _>(column)?.to_string()),
        "DATE" => Cell::Date(row.try_get::<NaiveDate, _>(column)?),
        "TIMESTAMP" => Cell::Date(row.try_get::<NaiveDateTime, _>(column)?.date()),
        "TIMESTAMPTZ" => Cell::Date(row.try_get::<DateTime<Utc>, _>(column)?.date_naive()),
        // TEXT, VARCHAR, BPCHAR, NAME and anything else string-like
        _ => Cell::Text(row.try_get::<String, _>(column)?),
    };
    Ok(cell)
}

/// NUMERIC values are read through their decimal text. Metrics and years
/// fit an `f64`; anything unparseable stays text for the row decoder to reject.
fn numeric_cell(text: String) -> Cell {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Real(value),
        _ => Cell::Text(text),
    }
}

async fn select_all<T, const N: usize>(
    conn: &mut PgConnection,
    table: &str,
    columns: [&str; N],
    build: impl Fn(&RowCtx<'_>, &[Cell]) -> Result<T, DbError>,
) -> Result<Vec<T>, DbError> {
    let sql = format!("SELECT * FROM {table}");
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

    let mut out = Vec::with_capacity(rows.len());
    let mut cells = Vec::with_capacity(N);
    for (idx, row) in rows.iter().enumerate() {
        cells.clear();
        for column in columns {
            cells.push(pg_cell(row, column)?);
        }
        out.push(build(&RowCtx { table, row: idx }, cells.as_slice())?);
    }
    log::info!("query: SELECT * FROM {} returned {} rows", table, out.len());
    Ok(out)
}

/// Fetch both tables from Postgres in store order.
pub async fn fetch_tables(
    settings: &PostgresSettings,
    tables: &TableNames,
) -> Result<(Vec<AnnualRecord>, Vec<MonthlyRecord>), DbError> {
    log::info!("loader: Connecting to {}", settings.describe());
    let mut conn = PgConnection::connect_with(&connect_options(settings)).await?;

    let annual = select_all(&mut conn, tables.annual(), ANNUAL_COLUMNS, AnnualRecord::from_cells).await?;
    let monthly = select_all(&mut conn, tables.monthly(), MONTHLY_COLUMNS, MonthlyRecord::from_cells).await?;

    conn.close().await?;
    Ok((annual, monthly))
}
