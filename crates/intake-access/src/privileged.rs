use std::collections::BTreeSet;

/// Parses a comma-separated list of numeric operator ids.
///
/// Blank chunks are skipped. Chunks that are not integers are logged and skipped.
pub fn parse_privileged_ids(raw: &str) -> BTreeSet<i64> {
    let mut ids = BTreeSet::new();
    for chunk in raw.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        match chunk.parse::<i64>() {
            Ok(id) => {
                ids.insert(id);
            }
            Err(_) => {
                tracing::warn!(chunk, "invalid privileged id in ADMIN_IDS");
            }
        }
    }
    ids
}
