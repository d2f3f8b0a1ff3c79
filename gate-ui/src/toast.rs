//! Toast severity levels and their presentation mapping.

use serde::{Deserialize, Serialize};

/// Severity of a toast notification.
///
/// This is a closed set; labels that don't match any variant parse to
/// [`Severity::Info`] rather than failing, mirroring how the toast host
/// falls back to the neutral style for unknown classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Style class applied to the toast container.
    pub fn style_class(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Icon class shown next to the toast message.
    pub fn icon_class(self) -> &'static str {
        match self {
            Severity::Info => "icon-info-circle",
            Severity::Success => "icon-check-circle",
            Severity::Warning => "icon-warning-triangle",
            Severity::Error => "icon-exclamation-circle",
        }
    }

    /// Parse a severity label, falling back to `Info` for unknown values.
    pub fn parse_lenient(label: &str) -> Self {
        match label {
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.style_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_labels_fall_back_to_info() {
        assert_eq!(Severity::parse_lenient("success"), Severity::Success);
        assert_eq!(Severity::parse_lenient("error"), Severity::Error);
        assert_eq!(Severity::parse_lenient("fatal"), Severity::Info);
        assert_eq!(Severity::parse_lenient(""), Severity::Info);
    }

    #[test]
    fn each_severity_has_a_distinct_icon() {
        let icons = [
            Severity::Info.icon_class(),
            Severity::Success.icon_class(),
            Severity::Warning.icon_class(),
            Severity::Error.icon_class(),
        ];
        for (i, a) in icons.iter().enumerate() {
            for b in icons.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
