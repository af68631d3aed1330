use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    /// Exactly one project is the default; it cannot be deleted.
    #[serde(default, deserialize_with = "super::bool_from_int")]
    pub is_default: bool,
}

/// Input for creating or updating a project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
