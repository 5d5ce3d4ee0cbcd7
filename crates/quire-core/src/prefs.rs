//! Reader preference normalization.
//!
//! The font-size and theme preferences are persisted as short labels.
//! Earlier builds of the site stored CSS keyword values, so normalization
//! accepts those as aliases and maps anything unrecognized to the default.

use serde::{Deserialize, Serialize};

/// Storage keys shared with the generated site's stylesheet hooks.
pub mod storage_keys {
    /// localStorage key for the theme preference.
    pub const THEME: &str = "quire-theme";

    /// localStorage key for the font-size preference.
    pub const FONT_SIZE: &str = "quire-font-size";

    /// sessionStorage key for the per-page scroll position.
    pub const SCROLL_POSITION: &str = "quire-scroll-position";
}

/// Font-size steps exposed by the reader UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontSize {
    #[serde(rename = "3XS")]
    ThreeXs,
    #[serde(rename = "2XS")]
    TwoXs,
    #[serde(rename = "XS")]
    Xs,
    #[serde(rename = "S")]
    S,
    #[default]
    #[serde(rename = "M")]
    M,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "XL")]
    Xl,
}

impl FontSize {
    /// Canonical label, as stored and as shown in the size selector.
    pub fn label(self) -> &'static str {
        match self {
            FontSize::ThreeXs => "3XS",
            FontSize::TwoXs => "2XS",
            FontSize::Xs => "XS",
            FontSize::S => "S",
            FontSize::M => "M",
            FontSize::L => "L",
            FontSize::Xl => "XL",
        }
    }

    /// Normalize a stored or user-supplied value to a known step.
    ///
    /// Accepts canonical labels in any case plus legacy CSS keyword
    /// aliases; anything else falls back to the default size.
    pub fn normalize(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return FontSize::default();
        }
        match trimmed.to_ascii_uppercase().as_str() {
            "3XS" => return FontSize::ThreeXs,
            "2XS" => return FontSize::TwoXs,
            "XS" => return FontSize::Xs,
            "S" => return FontSize::S,
            "M" => return FontSize::M,
            "L" => return FontSize::L,
            "XL" => return FontSize::Xl,
            _ => {}
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "xxx-small" => FontSize::ThreeXs,
            "xx-small" => FontSize::TwoXs,
            "x-small" => FontSize::Xs,
            "small" => FontSize::S,
            "medium" | "default" => FontSize::M,
            "large" => FontSize::L,
            "x-large" | "xx-large" => FontSize::Xl,
            _ => FontSize::default(),
        }
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    /// Stored label for the theme.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    /// Parse a stored theme value, defaulting to light.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            "auto" => Theme::Auto,
            _ => Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonical_labels() {
        assert_eq!(FontSize::normalize("3XS"), FontSize::ThreeXs);
        assert_eq!(FontSize::normalize("M"), FontSize::M);
        assert_eq!(FontSize::normalize("XL"), FontSize::Xl);
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(FontSize::normalize("xs"), FontSize::Xs);
        assert_eq!(FontSize::normalize("2xs"), FontSize::TwoXs);
        assert_eq!(FontSize::normalize(" l "), FontSize::L);
    }

    #[test]
    fn test_normalize_legacy_aliases() {
        assert_eq!(FontSize::normalize("xxx-small"), FontSize::ThreeXs);
        assert_eq!(FontSize::normalize("xx-small"), FontSize::TwoXs);
        assert_eq!(FontSize::normalize("x-small"), FontSize::Xs);
        assert_eq!(FontSize::normalize("small"), FontSize::S);
        assert_eq!(FontSize::normalize("medium"), FontSize::M);
        assert_eq!(FontSize::normalize("default"), FontSize::M);
        assert_eq!(FontSize::normalize("large"), FontSize::L);
        assert_eq!(FontSize::normalize("x-large"), FontSize::Xl);
        assert_eq!(FontSize::normalize("xx-large"), FontSize::Xl);
    }

    #[test]
    fn test_normalize_unknown_falls_back_to_default() {
        assert_eq!(FontSize::normalize(""), FontSize::M);
        assert_eq!(FontSize::normalize("enormous"), FontSize::M);
        assert_eq!(FontSize::normalize("42px"), FontSize::M);
    }

    #[test]
    fn test_label_round_trip() {
        for size in [
            FontSize::ThreeXs,
            FontSize::TwoXs,
            FontSize::Xs,
            FontSize::S,
            FontSize::M,
            FontSize::L,
            FontSize::Xl,
        ] {
            assert_eq!(FontSize::normalize(size.label()), size);
        }
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("AUTO"), Theme::Auto);
        assert_eq!(Theme::parse("light"), Theme::Light);
        assert_eq!(Theme::parse("solarized"), Theme::Light);
    }

    #[test]
    fn test_theme_serde_labels() {
        let json = serde_json::to_string(&Theme::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
    }
}
