use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseKey {
    /// The key value itself, globally unique.
    pub license_key: String,
    #[serde(deserialize_with = "super::bool_from_int")]
    pub is_active: bool,
    #[serde(default)]
    pub remarks: Option<String>,
    pub created_at: String,
    pub project_id: i64,
    /// Number of machine bindings. Zero when the backend variant does not
    /// report bindings.
    #[serde(default)]
    pub binding_count: i64,
}

/// Input for creating a key. The backend generates a value unless
/// `custom_key` is supplied.
#[derive(Debug, Clone, Serialize)]
pub struct CreateKey {
    pub project_id: i64,
    pub remarks: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<String>,
}

/// Aggregate counters for the stats panel.
///
/// `bound` counts keys with at least one machine binding. (The source had
/// a second reading, "count disabled"; this crate uses the binding count.)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStats {
    pub total: usize,
    pub active: usize,
    pub bound: usize,
}

impl KeyStats {
    pub fn of(keys: &[LicenseKey]) -> Self {
        Self {
            total: keys.len(),
            active: keys.iter().filter(|k| k.is_active).count(),
            bound: keys.iter().filter(|k| k.binding_count > 0).count(),
        }
    }
}
