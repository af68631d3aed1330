use serde::{Deserialize, Serialize};

/// A machine binding recorded by the activation flow. The console only
/// lists and removes bindings; it never creates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binding {
    pub id: i64,
    /// The owning key's value.
    pub key_value: String,
    pub machine_id: String,
    #[serde(default)]
    pub remarks: Option<String>,
    pub bound_at: String,
}
