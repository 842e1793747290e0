//! Query value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A query to be answered by the mixture (Value Object)
///
/// Carries the natural-language text together with the optional language
/// and unit-system hints. The hints are forwarded verbatim to every source
/// and never interpreted by the aggregation logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    units: Option<String>,
}

impl Query {
    /// Create a new query, rejecting empty or whitespace-only text
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyQuery);
        }
        Ok(Self {
            text,
            lang: None,
            units: None,
        })
    }

    /// Attach a language tag (e.g. "en-us")
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Attach a unit-system tag (e.g. "metric")
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Derive a query with different text but the same hints.
    ///
    /// Used when a strategy sends a rendered prompt to a source: the prompt
    /// replaces the text, the language and units travel along unchanged.
    pub fn rephrase(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: self.lang.clone(),
            units: self.units.clone(),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<&str> for Query {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Query::new(s)
    }
}

impl TryFrom<String> for Query {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Query::new(s)
    }
}
