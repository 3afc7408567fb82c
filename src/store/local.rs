//! Row manipulation shared by the backends that keep data on this machine.
//! They stand in for the server, so they also assign `id` and `created_at`.

use super::{Query, Table};
use crate::error::{Error, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;

pub(crate) fn apply_query(rows: &[Value], query: &Query) -> Vec<Value> {
    let mut matched: Vec<Value> = rows
        .iter()
        .filter(|row| {
            query
                .filters
                .iter()
                .all(|(column, expected)| row.get(column) == Some(expected))
        })
        .cloned()
        .collect();

    if let Some(order) = &query.order {
        matched.sort_by(|a, b| {
            let ord = compare(a.get(&order.column), b.get(&order.column));
            if order.descending { ord.reverse() } else { ord }
        });
    }
    if let Some(n) = query.limit {
        matched.truncate(n);
    }
    matched
}

/// Nulls and missing columns sort after every value.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

pub(crate) fn insert_row(rows: &mut Vec<Value>, table: Table, row: Value) -> Result<Value> {
    let mut object = into_object(row)?;
    let has_id = object.get("id").map_or(false, |v| !v.is_null());
    if !has_id {
        object.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
    }
    if table.has_created_at() && !object.contains_key("created_at") {
        object.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));
    }
    let stored = Value::Object(object);
    rows.push(stored.clone());
    Ok(stored)
}

pub(crate) fn patch_row(rows: &mut [Value], table: Table, id: &str, patch: Value) -> Result<Value> {
    let patch = into_object(patch)?;
    let row = rows
        .iter_mut()
        .find(|r| row_id(r) == Some(id))
        .ok_or_else(|| not_found(table, id))?;
    if let Some(fields) = row.as_object_mut() {
        for (key, value) in patch {
            if key != "id" {
                fields.insert(key, value);
            }
        }
    }
    Ok(row.clone())
}

pub(crate) fn remove_row(rows: &mut Vec<Value>, table: Table, id: &str) -> Result<()> {
    let before = rows.len();
    rows.retain(|r| row_id(r) != Some(id));
    if rows.len() == before {
        return Err(not_found(table, id));
    }
    Ok(())
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn not_found(table: Table, id: &str) -> Error {
    Error::NotFound { table: table.name().to_string(), id: id.to_string() }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::validation(format!("expected a JSON object, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({ "id": "a", "user_id": "u1", "task_date": "2026-10-17", "scheduled_time": "09:30:00" }),
            json!({ "id": "b", "user_id": "u2", "task_date": "2026-10-17", "scheduled_time": "08:00:00" }),
            json!({ "id": "c", "user_id": "u1", "task_date": "2026-10-17", "scheduled_time": null }),
            json!({ "id": "d", "user_id": "u1", "task_date": "2026-10-16", "scheduled_time": "07:00:00" }),
        ]
    }

    #[test]
    fn filters_by_every_equality_and_sorts_nulls_last() {
        let q = Query::new()
            .eq("user_id", "u1")
            .eq("task_date", "2026-10-17")
            .order_asc("scheduled_time");
        let ids: Vec<_> = apply_query(&rows(), &q)
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn descending_order_and_limit() {
        let q = Query::new().eq("user_id", "u1").order_desc("task_date").limit(1);
        let out = apply_query(&rows(), &q);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["task_date"], "2026-10-17");
    }

    #[test]
    fn insert_assigns_id_and_timestamp() {
        let mut rows = Vec::new();
        let stored = insert_row(&mut rows, Table::Inspirations, json!({ "content": "x" })).unwrap();
        assert!(stored["id"].as_str().is_some());
        assert!(stored["created_at"].as_str().is_some());

        let task = insert_row(&mut rows, Table::Tasks, json!({ "title": "y" })).unwrap();
        assert!(task.get("created_at").is_none());
    }

    #[test]
    fn patch_keeps_id_and_reports_missing_rows() {
        let mut rows = rows();
        let updated = patch_row(&mut rows, Table::Tasks, "a", json!({ "id": "zzz", "title": "New" })).unwrap();
        assert_eq!(updated["id"], "a");
        assert_eq!(updated["title"], "New");

        let err = patch_row(&mut rows, Table::Tasks, "missing", json!({})).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(remove_row(&mut rows, Table::Tasks, "missing").is_err());
        remove_row(&mut rows, Table::Tasks, "a").unwrap();
        assert_eq!(rows.len(), 3);
    }
}
