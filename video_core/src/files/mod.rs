pub mod manager;
pub mod models;
pub mod validation;

pub use manager::{VideoStore, VideoStoreConfig};
pub use models::{sort_newest_first, stored_filename, timestamp_prefix, StoredVideo};
pub use validation::{sanitize_requested_name, validate_original_filename, ValidationError, VideoValidator};
