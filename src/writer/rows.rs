//! Flattening of loaded snapshot records into SQL rows

use rusqlite::types::{ToSql, ToSqlOutput, Value};

use crate::records::Edge;
use crate::snapshot::Snapshot;

/// A single bound value. Non-finite reals are stored as NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Real(f64),
    Text(String),
}

impl SqlValue {
    fn text(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }

    fn optional_text(s: &str) -> Self {
        if s.is_empty() {
            SqlValue::Null
        } else {
            SqlValue::text(s)
        }
    }

    fn real(x: f64) -> Self {
        if x.is_finite() {
            SqlValue::Real(x)
        } else {
            SqlValue::Null
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Real(x) => ToSqlOutput::Owned(Value::Real(*x)),
            SqlValue::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

pub type Row = Vec<SqlValue>;

/// Rows for a table, in the column order of its schema. Unknown tables
/// yield nothing.
pub fn table_rows(snapshot: &Snapshot, table: &str) -> Vec<Row> {
    match table {
        "activities" => snapshot
            .reference
            .activities()
            .iter()
            .map(|a| {
                vec![
                    SqlValue::text(&a.code),
                    SqlValue::text(&a.description),
                    SqlValue::text(a.flow_type.as_str()),
                ]
            })
            .collect(),
        "locations" => snapshot
            .reference
            .regions()
            .iter()
            .map(|r| vec![SqlValue::text(&r.code), SqlValue::text(&r.display_name)])
            .collect(),
        "footprints" => snapshot
            .process
            .footprints()
            .iter()
            .map(|fp| {
                vec![
                    SqlValue::text(&fp.flow_code),
                    SqlValue::text(&fp.region_code),
                    SqlValue::real(fp.value),
                    SqlValue::text(&fp.unit_reference),
                    SqlValue::text(&fp.version),
                ]
            })
            .collect(),
        "recipes" => snapshot
            .process
            .recipes()
            .iter()
            .map(|row| {
                let (region_inflow, value_inflow, unit_inflow) = match &row.edge {
                    Edge::Named {
                        region,
                        value_inflow,
                        unit,
                        ..
                    } => (
                        SqlValue::optional_text(region),
                        SqlValue::real(*value_inflow),
                        SqlValue::optional_text(unit),
                    ),
                    _ => (SqlValue::Null, SqlValue::Null, SqlValue::Null),
                };
                vec![
                    SqlValue::text(&row.flow_reference),
                    SqlValue::text(&row.region_reference),
                    SqlValue::text(row.edge.input_code()),
                    region_inflow,
                    value_inflow,
                    SqlValue::real(row.edge.emission()),
                    unit_inflow,
                ]
            })
            .collect(),
        "agribalyse" => snapshot
            .national
            .iter()
            .map(|r| {
                vec![
                    SqlValue::optional_text(&r.group),
                    SqlValue::optional_text(&r.subgroup),
                    SqlValue::text(&r.product_name),
                    SqlValue::real(r.dqr),
                    SqlValue::real(r.agriculture),
                    SqlValue::real(r.processing),
                    SqlValue::real(r.packaging),
                    SqlValue::real(r.transportation),
                    SqlValue::real(r.retail),
                    SqlValue::real(r.consumption),
                    SqlValue::real(r.total),
                ]
            })
            .collect(),
        "big_climate" => snapshot
            .regional
            .iter()
            .map(|r| {
                vec![
                    SqlValue::text(&r.name),
                    SqlValue::optional_text(&r.category),
                    SqlValue::real(r.total),
                    SqlValue::real(r.agriculture),
                    SqlValue::real(r.iluc),
                    SqlValue::real(r.food_processing),
                    SqlValue::real(r.packaging),
                    SqlValue::real(r.transport),
                    SqlValue::real(r.retail),
                    SqlValue::text(&r.region),
                ]
            })
            .collect(),
        _ => Vec::new(),
    }
}
