//! Common helpers for naming and dating generated reports.

use chrono::NaiveDateTime;

pub const OUTPUT_PREFIX: &str = "Sick Leave";
pub const FALLBACK_FILENAME: &str = "Sick Leave.pdf";

/// Keep ASCII letters and digits only.
pub fn alphanumeric_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// `Sick Leave{id_number}_{issue date digits}.pdf`, made safe for any filesystem.
pub fn output_filename(id_number: &str, issue_date: &str) -> String {
    let raw = format!(
        "{OUTPUT_PREFIX}{}_{}.pdf",
        id_number.trim(),
        alphanumeric_only(issue_date)
    );
    let options = sanitize_filename::Options {
        truncate: true,
        windows: true,
        replacement: "",
    };
    let name = sanitize_filename::sanitize_with_options(raw, options);

    if name.trim().is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        name
    }
}

/// Render timestamp printed in the footer, e.g. `Saturday, 20 September 2025`.
pub fn format_render_date(now: NaiveDateTime) -> String {
    now.format("%A, %d %B %Y").to_string()
}
