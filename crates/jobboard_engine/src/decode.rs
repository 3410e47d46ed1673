use board_logging::board_warn;
use serde::Deserialize;
use serde_json::Value;

use crate::identity::assign_ids;
use crate::{FailureKind, FetchError, ListingRecord};

/// Wire shape of one listing. Every field is optional and loosely typed.
#[derive(Debug, Default, Deserialize)]
struct RawListing {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    company: Option<Value>,
    #[serde(default)]
    location: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
}

/// Parses a JSON array of listings and assigns each a stable id.
///
/// The body must be an array. Elements that are not objects are skipped;
/// missing or non-text fields become empty strings.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<ListingRecord>, FetchError> {
    let elements: Vec<Value> = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        if !element.is_object() {
            board_warn!("Skipping non-object listing at index {}", index);
            continue;
        }
        match serde_json::from_value::<RawListing>(element) {
            Ok(raw) => records.push(into_record(raw)),
            Err(err) => board_warn!("Skipping listing at index {}: {}", index, err),
        }
    }

    assign_ids(&mut records);
    Ok(records)
}

fn into_record(raw: RawListing) -> ListingRecord {
    ListingRecord {
        id: String::new(),
        source_id: raw.id.map(text).filter(|id| !id.is_empty()),
        title: raw.title.map(text).unwrap_or_default(),
        company: raw.company.map(text).unwrap_or_default(),
        location: raw.location.map(text).unwrap_or_default(),
        description: raw.description.map(text).unwrap_or_default(),
    }
}

fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
