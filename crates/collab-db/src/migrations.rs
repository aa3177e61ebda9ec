use anyhow::Result;
use chrono::Utc;
use collab_types::models::RequestStatus;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::models::Document;

const COLLECTIONS: &[&str] = &[
    "users",
    "profiles",
    "listings",
    "projects",
    "match_requests",
    "matches",
    "consents",
];

/// Read the document at `path`, repairing older or partial shapes.
///
/// A missing file yields an empty document. A file that is not JSON at all is
/// moved aside to `db.json.corrupt-<timestamp>` and replaced by an empty
/// document. Individual records that still do not fit the model are dropped
/// one by one, after the untouched file is copied to `db.json.bak-<timestamp>`.
pub fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        info!("No document at {}, starting empty", path.display());
        return Ok(Document::default());
    }

    let raw = fs::read_to_string(path)?;
    let mut value = match serde_json::from_str::<Value>(&raw) {
        Ok(value) => value,
        Err(e) => {
            let backup = path.with_extension(format!("json.corrupt-{}", Utc::now().timestamp()));
            warn!(
                "Document {} is unreadable ({}), moving it to {} and starting empty",
                path.display(),
                e,
                backup.display()
            );
            fs::rename(path, &backup)?;
            return Ok(Document::default());
        }
    };

    normalize_value(&mut value);
    let (mut doc, dropped) = into_document(value);
    if dropped > 0 {
        let backup = path.with_extension(format!("json.bak-{}", Utc::now().timestamp()));
        fs::copy(path, &backup)?;
        warn!(
            "Dropped {} unreadable records from {}, original kept at {}",
            dropped,
            path.display(),
            backup.display()
        );
    }

    align_request_statuses(&mut doc);
    Ok(doc)
}

/// Decode each collection record by record. Returns the number of records dropped.
fn into_document(value: Value) -> (Document, usize) {
    let Value::Object(mut root) = value else {
        return (Document::default(), 0);
    };

    let mut dropped = 0;
    let doc = Document {
        users: take_records(&mut root, "users", &mut dropped),
        profiles: take_records(&mut root, "profiles", &mut dropped),
        listings: take_records(&mut root, "listings", &mut dropped),
        projects: take_records(&mut root, "projects", &mut dropped),
        match_requests: take_records(&mut root, "match_requests", &mut dropped),
        matches: take_records(&mut root, "matches", &mut dropped),
        consents: take_records(&mut root, "consents", &mut dropped),
    };
    (doc, dropped)
}

fn take_records<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    key: &str,
    dropped: &mut usize,
) -> Vec<T> {
    let Some(Value::Array(items)) = root.remove(key) else {
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping {}[{}]: {}", key, i, e);
                *dropped += 1;
                None
            }
        })
        .collect()
}

/// Fill defaults the typed model cannot express on its own.
fn normalize_value(value: &mut Value) {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    let Some(root) = value.as_object_mut() else {
        return;
    };

    for name in COLLECTIONS {
        if !root.get(*name).is_some_and(Value::is_array) {
            root.insert((*name).to_string(), Value::Array(vec![]));
        }
    }

    let now = Value::String(Utc::now().to_rfc3339());

    for key in ["listings", "match_requests", "projects"] {
        for item in array_objects(root, key) {
            backfill_timestamps(item, &now);
        }
    }

    for item in array_objects(root, "profiles") {
        coerce_sales(item);
    }

    for item in array_objects(root, "match_requests") {
        let known = item
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| RequestStatus::ALL.iter().any(|st| st.as_str() == s));
        if !known {
            item.insert("status".into(), Value::String(RequestStatus::Pending.as_str().into()));
        }
    }
}

fn array_objects<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    root.get_mut(key)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

/// `created_at` falls back to now, `updated_at` to `created_at`.
fn backfill_timestamps(item: &mut Map<String, Value>, now: &Value) {
    if item.get("created_at").is_none_or(Value::is_null) {
        item.insert("created_at".into(), now.clone());
    }
    if item.get("updated_at").is_none_or(Value::is_null) {
        let created = item["created_at"].clone();
        item.insert("updated_at".into(), created);
    }
}

/// `sales_monthly_rub` may have been stored as a numeric string.
/// Anything that is not a finite number becomes null.
fn coerce_sales(item: &mut Map<String, Value>) {
    let Some(sales) = item.get_mut("sales_monthly_rub") else {
        return;
    };
    let number = match sales {
        Value::Number(_) | Value::Null => return,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .and_then(serde_json::Number::from_f64),
        _ => None,
    };
    *sales = number.map_or(Value::Null, Value::Number);
}

/// A request that already produced a match is confirmed, whatever it says.
fn align_request_statuses(doc: &mut Document) {
    let with_match: HashSet<_> = doc.matches.iter().filter_map(|m| m.request_id).collect();
    let mut fixed = 0;
    for req in &mut doc.match_requests {
        if with_match.contains(&req.id)
            && matches!(req.status, RequestStatus::Pending | RequestStatus::Accepted)
        {
            req.status = RequestStatus::Confirmed;
            fixed += 1;
        }
    }
    if fixed > 0 {
        info!("Marked {} matched requests as confirmed", fixed);
    }
}
