//! Golden feedback datasets stored as JSON under `golden/`.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use insight_core::{Insight, Organization};

use crate::store::InMemoryStore;

/// A form's insights plus the owning organization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenDataset {
    pub form_id: String,
    pub organization: Organization,
    pub insights: Vec<Insight>,
}

impl GoldenDataset {
    /// Load the dataset into a fresh in-memory store.
    pub fn into_store(self) -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_organization(self.organization);
        for insight in self.insights {
            store.add_insight(insight);
        }
        store
    }
}

fn golden_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a JSON fixture file relative to `golden/`.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = golden_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}
