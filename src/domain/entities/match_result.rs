use super::CatalogueEntry;

/// Outcome of resolving a query against a catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// At least one entry, in catalogue order
    Found(Vec<CatalogueEntry>),
    /// Nothing matched; `hint` is shown to the user as-is
    NotFound { hint: String },
}

impl MatchResult {
    /// Wraps `entries`, falling back to `NotFound` when there are none.
    pub fn from_entries(entries: Vec<CatalogueEntry>, hint: impl Into<String>) -> Self {
        if entries.is_empty() {
            MatchResult::NotFound { hint: hint.into() }
        } else {
            MatchResult::Found(entries)
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found(_))
    }
}
