//! Interface language selection (Arabic / English).
//!
//! The API serves labels in either language. Clients choose with an explicit
//! `?lang=` query parameter or, failing that, the `Accept-Language` header.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Ar];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ar => "ar",
        }
    }

    /// Text direction used by the frontend (`ltr` / `rtl`).
    pub fn direction(self) -> &'static str {
        match self {
            Lang::En => "ltr",
            Lang::Ar => "rtl",
        }
    }

    /// Choose between an English and an Arabic variant.
    pub fn pick<'a>(self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Lang::En => en,
            Lang::Ar => ar,
        }
    }

    /// Choose the Arabic variant when present, falling back to English.
    ///
    /// Entities carry an optional `*_ar` column next to the primary one.
    pub fn pick_optional<'a>(self, en: &'a str, ar: Option<&'a str>) -> &'a str {
        match (self, ar) {
            (Lang::Ar, Some(ar)) if !ar.trim().is_empty() => ar,
            _ => en,
        }
    }

    /// Parse an `Accept-Language` header value.
    ///
    /// Tags are considered in descending `q` order; the first one whose
    /// primary subtag is supported wins. Returns `None` when nothing matches.
    pub fn from_accept_language(header: &str) -> Option<Lang> {
        let mut tags: Vec<(f32, &str)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.trim().split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let q = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|v| v.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((q, tag))
            })
            .collect();

        // Stable sort keeps header order for equal weights.
        tags.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        tags.into_iter()
            .filter(|(q, _)| *q > 0.0)
            .find_map(|(_, tag)| {
                let primary = tag.split(['-', '_']).next().unwrap_or(tag);
                primary.parse().ok()
            })
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "ar" => Ok(Lang::Ar),
            other => Err(format!("Unsupported language '{other}'")),
        }
    }
}
