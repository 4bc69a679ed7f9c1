use serde::Serialize;

/// A video that has just been written to the upload directory.
#[derive(Debug, Clone, Serialize)]
pub struct StoredVideo {
    pub filename: String,
    pub original_filename: String,
    pub size: u64,
}

/// Builds the on-disk name `{millis}-{original}`.
pub fn stored_filename(millis: i64, original_filename: &str) -> String {
    format!("{}-{}", millis, original_filename)
}

/// Millisecond prefix of a stored filename, if it has one.
pub fn timestamp_prefix(filename: &str) -> Option<i64> {
    let (prefix, rest) = filename.split_once('-')?;

    if prefix.is_empty() || rest.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    prefix.parse().ok()
}

/// Newest first by embedded timestamp; ties and unprefixed names fall back to
/// descending name order.
pub fn sort_newest_first(names: &mut [String]) {
    names.sort_by(|a, b| {
        timestamp_prefix(b)
            .cmp(&timestamp_prefix(a))
            .then_with(|| b.cmp(a))
    });
}
