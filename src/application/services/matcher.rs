//! Query to catalogue matching

use crate::domain::entities::{Catalogue, CatalogueEntry, MatchResult};

/// Shown when a query matches nothing
pub const NOT_FOUND_HINT: &str = "Movie not found! 😿 \n👉 Please check the spelling or send the exact name.\n👉 If it's still missing, kindly search @cc_new_movie 🎬";

/// Case-insensitive substring match of `query` against every title.
///
/// All matches are returned in catalogue order, without ranking or a cap.
/// A blank query matches nothing rather than everything.
pub fn find_matches(query: &str, catalogue: &Catalogue) -> MatchResult {
    if query.trim().is_empty() {
        return MatchResult::NotFound { hint: NOT_FOUND_HINT.to_string() };
    }

    let needle = query.to_lowercase();
    let entries: Vec<CatalogueEntry> = catalogue
        .iter()
        .filter(|entry| entry.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    MatchResult::from_entries(entries, NOT_FOUND_HINT)
}
