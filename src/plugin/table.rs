//! Table and column descriptors
//!
//! Declarative metadata consumed by the scan driver: each table names its
//! hydrate function(s), the key-column qualifiers it accepts, an optional
//! "error is ignorable" predicate, an optional region fan-out provider, and
//! its column definitions.

use crate::config::ConnectionConfig;
use crate::plugin::cache::ConnectionCache;
use crate::plugin::context::QueryContext;
use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Hydrate function bound to a table's list or get operation.
pub type HydrateFn = for<'a> fn(&'a QueryContext) -> BoxFuture<'a, Result<()>>;

/// Per-table predicate marking an error as ignorable (empty result set).
pub type IgnorePredicate = fn(&anyhow::Error) -> bool;

/// Provider of the region list a table's list operation fans out over.
pub type MatrixFn = fn(&ConnectionConfig, &ConnectionCache) -> Vec<String>;

/// A qualifier column the operation is keyed on.
#[derive(Debug, Clone)]
pub struct KeyColumn {
    pub name: &'static str,
    pub required: bool,
}

impl KeyColumn {
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// List operation binding
pub struct ListConfig {
    pub hydrate: HydrateFn,
    pub key_columns: Vec<KeyColumn>,
    pub should_ignore: Option<IgnorePredicate>,
}

/// Get operation binding
pub struct GetConfig {
    pub hydrate: HydrateFn,
    pub key_columns: Vec<KeyColumn>,
    pub should_ignore: Option<IgnorePredicate>,
}

/// Primitive column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Int,
    Bool,
    Timestamp,
    Json,
}

/// How a column value is produced from a streamed item.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Extract the field named like the column.
    Default,
    /// Extract a field by dot-notation path, e.g. `"user.username"`.
    FromField(&'static str),
    /// Echo a query qualifier, e.g. the scoping `app_name`.
    FromQual(&'static str),
}

/// Column definition
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub transform: Transform,
    pub description: &'static str,
}

impl Column {
    pub fn new(name: &'static str, ty: ColumnType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            transform: Transform::Default,
            description,
        }
    }

    pub fn from_field(
        name: &'static str,
        ty: ColumnType,
        path: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            transform: Transform::FromField(path),
            description,
        }
    }

    pub fn from_qual(
        name: &'static str,
        ty: ColumnType,
        qual: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            transform: Transform::FromQual(qual),
            description,
        }
    }
}

/// Table definition
pub struct Table {
    pub name: &'static str,
    pub description: &'static str,
    pub list: Option<ListConfig>,
    pub get: Option<GetConfig>,
    pub matrix: Option<MatrixFn>,
    pub columns: Vec<Column>,
}

impl Table {
    /// Shape one raw API item into a row matching the declared columns.
    pub fn render_row(&self, item: &Value, quals: &HashMap<String, String>) -> Value {
        let mut row = Map::with_capacity(self.columns.len());

        for column in &self.columns {
            let raw = match &column.transform {
                Transform::Default => extract_value(item, column.name),
                Transform::FromField(path) => extract_value(item, path),
                Transform::FromQual(qual) => quals
                    .get(*qual)
                    .map(|v| Value::String(v.clone()))
                    .unwrap_or(Value::Null),
            };
            row.insert(column.name.to_string(), coerce(raw, column.ty));
        }

        Value::Object(row)
    }
}

/// Extract a value from JSON using a dot-notation path.
/// Path segments that parse as integers index into arrays.
pub fn extract_value(item: &Value, path: &str) -> Value {
    let mut current = item;

    for part in path.split('.') {
        current = if let Ok(idx) = part.parse::<usize>() {
            match current.get(idx) {
                Some(v) => v,
                None => return Value::Null,
            }
        } else {
            match current.get(part) {
                Some(v) => v,
                None => return Value::Null,
            }
        };
    }

    current.clone()
}

/// Coerce a raw JSON value to the declared column type.
/// Zero values (empty strings, zero timestamps) render as null.
fn coerce(value: Value, ty: ColumnType) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    match ty {
        ColumnType::String => match value {
            Value::String(s) if s.is_empty() => Value::Null,
            Value::String(s) => Value::String(s),
            Value::Number(n) => Value::String(n.to_string()),
            Value::Bool(b) => Value::String(b.to_string()),
            _ => Value::Null,
        },
        ColumnType::Int => match &value {
            Value::Number(n) => n.as_i64().map(Value::from).unwrap_or(Value::Null),
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            _ => Value::Null,
        },
        ColumnType::Bool => match value {
            Value::Bool(b) => Value::Bool(b),
            _ => Value::Null,
        },
        ColumnType::Timestamp => match &value {
            Value::String(s) => match DateTime::parse_from_rfc3339(s) {
                // The platform serializes unset times as year-one timestamps
                Ok(dt) if dt.year() <= 1 => Value::Null,
                Ok(dt) => Value::String(dt.with_timezone(&Utc).to_rfc3339()),
                Err(_) => Value::Null,
            },
            _ => Value::Null,
        },
        ColumnType::Json => value,
    }
}
