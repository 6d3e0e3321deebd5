//! Local mirror of a Realtime Database subtree.
//!
//! The streaming protocol sends `put` (replace the value at a path) and
//! `patch` (replace several children below a path) events. These helpers
//! apply them to a [`serde_json::Value`] and project the result into
//! listings the same way the database orders children: integer-like keys
//! first in numeric order, then the remaining keys lexicographically.

use serde_json::{Map, Value};

use crate::domain::{Listing, ListingId};

/// Replaces the value at `path` with `data`. `null` deletes it.
pub fn apply_put(root: &mut Value, path: &str, data: Value) {
    let segments = split(path);
    put_at(root, &segments, data);
}

/// Replaces each child of `data` below `path`. Child keys may themselves
/// be multi-segment paths.
pub fn apply_patch(root: &mut Value, path: &str, data: Value) {
    let base = split(path);
    let Value::Object(children) = data else {
        put_at(root, &base, data);
        return;
    };
    for (key, value) in children {
        let mut segments = base.clone();
        segments.extend(split(&key));
        put_at(root, &segments, value);
    }
}

/// Returns the non-null children of an object or array node in database
/// order. Scalars have no children.
#[must_use]
pub fn children(node: &Value) -> Vec<(String, &Value)> {
    let mut entries: Vec<(String, &Value)> = match node {
        Value::Object(map) => map
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        _ => Vec::new(),
    };
    entries.sort_by(|(a, _), (b, _)| key_order(a).cmp(&key_order(b)));
    entries
}

/// Decodes every child of `node` as a listing keyed by its child key.
/// Children that are not listing records are skipped.
#[must_use]
pub fn listings(node: &Value) -> Vec<Listing> {
    children(node)
        .into_iter()
        .filter_map(|(key, value)| {
            if !value.is_object() {
                return None;
            }
            match serde_json::from_value::<Listing>(value.clone()) {
                Ok(listing) => Some(listing.with_id(ListingId::new(key))),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "skipping undecodable listing");
                    None
                }
            }
        })
        .collect()
}

/// Returns the child keys of `node` as listing ids.
#[must_use]
pub fn keys(node: &Value) -> Vec<ListingId> {
    children(node)
        .into_iter()
        .map(|(key, _)| ListingId::new(key))
        .collect()
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Sort key of a child key: integer-like keys first in numeric order, then
/// the rest lexicographically.
pub(crate) fn key_order(key: &str) -> (bool, u64, &str) {
    match key.parse::<u64>() {
        Ok(n) => (false, n, key),
        Err(_) => (true, 0, key),
    }
}

fn put_at(node: &mut Value, segments: &[&str], data: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = data;
        return;
    };
    make_object(node);
    let Some(map) = node.as_object_mut() else {
        return;
    };
    if rest.is_empty() && data.is_null() {
        map.remove(*head);
        return;
    }
    let child = map.entry((*head).to_string()).or_insert(Value::Null);
    put_at(child, rest, data);
    let emptied = child.is_null() || child.as_object().is_some_and(Map::is_empty);
    if emptied {
        map.remove(*head);
    }
}

/// Turns `node` into an object, keeping array elements under their index.
fn make_object(node: &mut Value) {
    let map = match std::mem::take(node) {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        _ => Map::new(),
    };
    *node = Value::Object(map);
}
