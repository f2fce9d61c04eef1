//! Document-store identifiers: 24 lowercase or uppercase hex characters.

use crate::constants::OBJECT_ID_HEX_LEN;
use crate::errors::{InsightError, InsightResult};

/// Check that `id` is a well-formed object id.
pub fn validate_id(id: &str) -> InsightResult<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(InsightError::InvalidId { id: id.to_string() })
    }
}

/// Non-failing variant of [`validate_id`].
pub fn is_valid_id(id: &str) -> bool {
    id.len() == OBJECT_ID_HEX_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Generate a fresh object id from 12 random bytes.
pub fn new_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    uuid.as_bytes()[..OBJECT_ID_HEX_LEN / 2]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
