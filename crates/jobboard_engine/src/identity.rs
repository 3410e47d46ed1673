use std::collections::HashSet;
use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::ListingRecord;

/// Gives every record an id that is stable across fetches of the same data.
///
/// A source-provided id wins; otherwise the id is a short content hash.
/// Repeats get the first free occurrence suffix (`-1`, `-2`, ...) in source order,
/// skipping any suffix another record already owns.
pub fn assign_ids(records: &mut [ListingRecord]) {
    let mut taken: HashSet<String> = HashSet::new();
    for record in records.iter_mut() {
        let base = match record.source_id.as_deref() {
            Some(id) => format!("src-{id}"),
            None => format!("h-{}", content_hash(record)),
        };
        let mut candidate = base.clone();
        let mut occurrence = 0usize;
        while taken.contains(&candidate) {
            occurrence += 1;
            candidate = format!("{base}-{occurrence}");
        }
        taken.insert(candidate.clone());
        record.id = candidate;
    }
}

fn content_hash(record: &ListingRecord) -> String {
    let mut hasher = Sha256::new();
    for field in [
        &record.title,
        &record.company,
        &record.location,
        &record.description,
    ] {
        hasher.update(field.as_bytes());
        hasher.update([0x1f_u8]);
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
