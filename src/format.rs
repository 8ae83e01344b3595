//! Date formatting for letter output
//!
//! The engine never decides how a date reads in a letter; it asks a
//! [`DateFormatter`] chosen by the caller's language code.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Norwegian bokmål
    #[default]
    Nb,
    /// Norwegian nynorsk
    Nn,
    /// English
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Nb => "nb",
            Language::Nn => "nn",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nb" | "no" => Ok(Language::Nb),
            "nn" => Ok(Language::Nn),
            "en" | "e" => Ok(Language::En),
            other => Err(format!("unsupported language code '{}'", other)),
        }
    }
}

/// Renders dates as display strings
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

const NORWEGIAN_MONTHS: [&str; 12] = [
    "januar", "februar", "mars", "april", "mai", "juni", "juli", "august", "september", "oktober",
    "november", "desember",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Long-form dates in the letter language
///
/// `nb` and `nn` render as `1. januar 2021`, `en` as `1 January 2021`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleDateFormatter {
    language: Language,
}

impl LocaleDateFormatter {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl DateFormatter for LocaleDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        let month = date.month0() as usize;
        match self.language {
            Language::Nb | Language::Nn => {
                format!("{}. {} {}", date.day(), NORWEGIAN_MONTHS[month], date.year())
            }
            Language::En => format!("{} {} {}", date.day(), ENGLISH_MONTHS[month], date.year()),
        }
    }
}
