mod admin_user;
mod binding;
mod license;
mod project;

pub use admin_user::*;
pub use binding::*;
pub use license::*;
pub use project::*;

use serde::{Deserialize, Deserializer};

/// Deserialize a boolean that the backend may serialize as a JSON bool or
/// as a SQLite-style `0`/`1` integer.
pub(crate) fn bool_from_int<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
    }

    Ok(match BoolOrInt::deserialize(deserializer)? {
        BoolOrInt::Bool(b) => b,
        BoolOrInt::Int(n) => n != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_accept_ints_and_bools() {
        let key: LicenseKey =
            serde_json::from_str(r#"{"license_key":"KH-A-B","is_active":1,"project_id":1,"created_at":"2026-01-01T00:00:00"}"#)
                .unwrap();
        assert!(key.is_active);

        let key: LicenseKey =
            serde_json::from_str(r#"{"license_key":"KH-A-B","is_active":false,"project_id":1,"created_at":"2026-01-01T00:00:00"}"#)
                .unwrap();
        assert!(!key.is_active);
    }

    #[test]
    fn binding_count_defaults_to_zero() {
        // The backend variant without machine bindings omits the field.
        let key: LicenseKey =
            serde_json::from_str(r#"{"license_key":"KH-A-B","is_active":1,"project_id":1,"created_at":"2026-01-01T00:00:00"}"#)
                .unwrap();
        assert_eq!(key.binding_count, 0);
    }
}
