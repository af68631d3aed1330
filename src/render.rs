//! Plain-text rendering of lists, tables, and the stats line.

use std::fmt::Write;

use crate::console::BindingsView;
use crate::models::{AdminUser, KeyStats, LicenseKey, Project};

/// Format a backend timestamp (ISO-8601, no timezone) for display.
/// Unparseable values pass through verbatim.
pub fn format_timestamp(raw: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn status_badge(active: bool) -> &'static str {
    if active { "active" } else { "disabled" }
}

pub fn render_projects(projects: &[Project], selected: Option<i64>) -> String {
    if projects.is_empty() {
        return "No projects.\n".to_string();
    }
    let mut out = String::new();
    for p in projects {
        let marker = if selected == Some(p.id) { "*" } else { " " };
        let default = if p.is_default { " (default)" } else { "" };
        let desc = p.description.as_deref().unwrap_or("-");
        let _ = writeln!(out, "{marker} [{}] {}{default}  {desc}", p.id, p.name);
    }
    out
}

pub fn render_keys(keys: &[LicenseKey]) -> String {
    if keys.is_empty() {
        return "No keys yet.\n".to_string();
    }
    let key_width = keys
        .iter()
        .map(|k| k.license_key.len())
        .max()
        .unwrap_or(0)
        .max("KEY".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<key_width$}  {:<8}  {:<19}  {:>8}  REMARKS",
        "KEY", "STATUS", "CREATED", "BINDINGS"
    );
    for k in keys {
        let _ = writeln!(
            out,
            "{:<key_width$}  {:<8}  {:<19}  {:>8}  {}",
            k.license_key,
            status_badge(k.is_active),
            format_timestamp(&k.created_at),
            k.binding_count,
            k.remarks.as_deref().unwrap_or("-"),
        );
    }
    out
}

pub fn render_stats(stats: KeyStats) -> String {
    format!(
        "{} keys, {} active, {} bound\n",
        stats.total, stats.active, stats.bound
    )
}

pub fn render_bindings(view: &BindingsView) -> String {
    let mut out = format!("Bindings for {}:\n", view.key);
    if view.bindings.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for b in &view.bindings {
        let _ = writeln!(
            out,
            "  [{}] {}  bound {}  {}",
            b.id,
            b.machine_id,
            format_timestamp(&b.bound_at),
            b.remarks.as_deref().unwrap_or("-"),
        );
    }
    out
}

pub fn render_admins(admins: &[AdminUser]) -> String {
    if admins.is_empty() {
        return "No admin accounts.\n".to_string();
    }
    let mut out = String::new();
    for a in admins {
        let _ = writeln!(out, "{}  (created {})", a.username, format_timestamp(&a.created_at));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Binding;

    fn key(value: &str, active: bool, remarks: Option<&str>) -> LicenseKey {
        LicenseKey {
            license_key: value.to_string(),
            is_active: active,
            remarks: remarks.map(String::from),
            created_at: "2026-03-04T10:20:30.123456".to_string(),
            project_id: 1,
            binding_count: 0,
        }
    }

    #[test]
    fn timestamps_format_or_pass_through() {
        assert_eq!(format_timestamp("2026-03-04T10:20:30.123456"), "2026-03-04 10:20");
        assert_eq!(format_timestamp("not a date"), "not a date");
    }

    #[test]
    fn missing_remarks_render_as_dash() {
        let table = render_keys(&[key("KH-AAAA-BBBB", true, None)]);
        assert!(table.contains("KH-AAAA-BBBB"));
        assert!(table.contains("active"));
        assert!(table.contains('-'));
    }

    #[test]
    fn disabled_keys_get_the_disabled_badge() {
        let table = render_keys(&[key("KH-AAAA-BBBB", false, Some("qa box"))]);
        assert!(table.contains("disabled"));
        assert!(table.contains("qa box"));
    }

    #[test]
    fn empty_lists_render_empty_states() {
        assert_eq!(render_keys(&[]), "No keys yet.\n");
        assert_eq!(render_projects(&[], None), "No projects.\n");
        assert_eq!(render_admins(&[]), "No admin accounts.\n");
    }

    #[test]
    fn bindings_view_lists_machines() {
        let view = BindingsView {
            key: "KH-AAAA-BBBB".to_string(),
            bindings: vec![Binding {
                id: 3,
                key_value: "KH-AAAA-BBBB".to_string(),
                machine_id: "machine-77".to_string(),
                remarks: None,
                bound_at: "2026-03-04T10:20:30".to_string(),
            }],
        };
        let out = render_bindings(&view);
        assert!(out.contains("machine-77"));
        assert!(out.contains("[3]"));
    }
}
