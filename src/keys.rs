//! Dotted-key helpers: the flat `a.b.c` form used by the schema and the nested
//! table form returned by subtree lookups.
//!
//! `("deeply.nested.config", v)` nests to `{deeply = {nested = {config = v}}}`
//! through [`set_nested`], and [`flatten_table`] walks the other way.

use toml::{Table, Value};

/// Check that `key` is a well-formed dotted path: non-empty segments, no
/// leading, trailing or doubled dots.
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("key is empty".into());
    }
    if key.split('.').any(str::is_empty) {
        return Err("key has an empty segment".into());
    }
    Ok(())
}

/// Insert `value` at `dotted_key`, creating intermediate tables.
/// A scalar sitting where a table is needed is replaced.
pub fn set_nested(table: &mut Table, dotted_key: &str, value: Value) {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    insert_nested(table, &segments, value);
}

fn insert_nested(table: &mut Table, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        table.insert(first.to_string(), value);
        return;
    }

    let sub = table
        .entry(first.to_string())
        .or_insert_with(|| Value::Table(Table::new()));
    if !sub.is_table() {
        *sub = Value::Table(Table::new());
    }
    if let Value::Table(sub_table) = sub {
        insert_nested(sub_table, rest, value);
    }
}

/// Navigate a `toml::Table` by dotted key path (e.g. `"database.url"`).
pub fn table_get<'a>(table: &'a Table, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let tbl = match path {
        Some(path) => {
            let mut current = table;
            for segment in path.split('.') {
                current = current.get(segment)?.as_table()?;
            }
            current
        }
        None => table,
    };

    tbl.get(leaf)
}

/// Flatten a nested table into dotted leaf pairs, in key order.
/// Arrays are leaves; empty tables produce nothing.
pub fn flatten_table(table: &Table) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    collect_leaves(table, "", &mut out);
    out
}

fn collect_leaves(table: &Table, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in table {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(sub) => collect_leaves(sub, &dotted, out),
            other => out.push((dotted, other.clone())),
        }
    }
}
