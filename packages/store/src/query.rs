//! # Query builder for table reads and filtered writes
//!
//! [`Query`] describes a read against one table: a column list, a conjunction of
//! [`Filter`]s, an optional [`Order`] and an optional row limit. The same filters
//! scope `update` and `delete` calls.
//!
//! A query is interpreted two ways:
//!
//! - [`Filter::matches`] evaluates it against an in-memory [`Row`]; the
//!   [`crate::MemoryBackend`] uses this.
//! - [`Query::to_params`] renders it as PostgREST query-string pairs
//!   (`col=eq.value`, `col=in.("a","b")`, `order=created_at.desc`); the
//!   [`crate::RestBackend`] sends these.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// One table row as returned by the backend.
pub type Row = serde_json::Map<String, Value>;

/// A single predicate on a row.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(column.to_string(), value.into())
    }

    pub fn is_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        )
    }

    /// Evaluate against an in-memory row. Missing columns compare as `null`.
    pub fn matches(&self, row: &Row) -> bool {
        let field = |col: &str| row.get(col).unwrap_or(&Value::Null);
        match self {
            Filter::Eq(col, v) => field(col) == v,
            Filter::In(col, values) => values.contains(field(col)),
        }
    }

    /// PostgREST `(column, "op.value")` pair.
    fn to_param(&self) -> (String, String) {
        match self {
            Filter::Eq(col, v) => (col.clone(), format!("eq.{}", render_value(v))),
            Filter::In(col, values) => {
                let list: Vec<String> = values.iter().map(render_list_item).collect();
                (col.clone(), format!("in.({})", list.join(",")))
            }
        }
    }
}

fn render_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_list_item(v: &Value) -> String {
    match v {
        Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        other => other.to_string(),
    }
}

/// Sort order for a read.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A read against one table.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn is_in<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filter(Filter::is_in(column, values))
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Whether a row satisfies every filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Filter, order and limit an in-memory row set.
    pub fn apply(&self, rows: impl IntoIterator<Item = Row>) -> Vec<Row> {
        let mut out: Vec<Row> = rows.into_iter().filter(|r| self.matches(r)).collect();
        if let Some(order) = &self.order {
            out.sort_by(|a, b| {
                let ord = compare_values(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        if let Some(n) = self.limit {
            out.truncate(n);
        }
        out
    }

    /// PostgREST query-string pairs for this read.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        params.extend(filter_params(&self.filters));
        if let Some(order) = &self.order {
            let dir = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{dir}", order.column)));
        }
        if let Some(n) = self.limit {
            params.push(("limit".to_string(), n.to_string()));
        }
        params
    }
}

/// PostgREST query-string pairs for a bare filter list (update/delete scopes).
pub fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(Filter::to_param).collect()
}

/// Total order over JSON scalars: null < bool < number < string; arrays and
/// objects compare equal to each other.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Encode a record as a row.
pub fn to_row<T: Serialize>(record: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Decode(serde::de::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

/// Decode rows into typed records.
pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(StoreError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_filters_treat_missing_columns_as_null() {
        let r = row(json!({"visibility": "public", "creator_id": "u2"}));
        assert!(Filter::eq("visibility", "public").matches(&r));
        assert!(!Filter::eq("visibility", "private").matches(&r));
        assert!(Filter::eq("slug", Value::Null).matches(&r));
        assert!(Filter::is_in("creator_id", ["u1", "u2"]).matches(&r));
        assert!(!Filter::is_in("slug", ["a"]).matches(&r));
    }

    #[test]
    fn test_apply_orders_and_limits() {
        let rows = vec![
            row(json!({"id": "a", "created_at": "2024-01-01T00:00:00Z"})),
            row(json!({"id": "b", "created_at": "2024-03-01T00:00:00Z"})),
            row(json!({"id": "c", "created_at": "2024-02-01T00:00:00Z"})),
        ];
        let out = Query::table("projects")
            .order("created_at", false)
            .limit(2)
            .apply(rows);
        let ids: Vec<&str> = out.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_to_params_renders_postgrest_syntax() {
        let q = Query::table("projects")
            .select("id,title")
            .eq("visibility", "public")
            .is_in("creator_id", ["u1", "u2"])
            .order("created_at", false)
            .limit(10);
        assert_eq!(
            q.to_params(),
            vec![
                ("select".to_string(), "id,title".to_string()),
                ("visibility".to_string(), "eq.public".to_string()),
                ("creator_id".to_string(), "in.(\"u1\",\"u2\")".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }
}
