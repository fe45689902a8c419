use serde_json::{Map, Value};

/// One title and the link it resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub title: String,
    pub link: String,
}

impl CatalogueEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Title to link mapping, in the order the source listed them.
///
/// A catalogue is a snapshot for one query. It is rebuilt on every fetch and
/// never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Values that are not strings are skipped.
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        let entries = object
            .into_iter()
            .filter_map(|(title, value)| match value {
                Value::String(link) => Some(CatalogueEntry { title, link }),
                other => {
                    tracing::warn!(title = %title, "Skipping catalogue entry with non-string link: {}", other);
                    None
                }
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogueEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, L> FromIterator<(T, L)> for Catalogue
where
    T: Into<String>,
    L: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, L)>>(iter: I) -> Self {
        let mut entries: Vec<CatalogueEntry> = Vec::new();
        for (title, link) in iter {
            let entry = CatalogueEntry::new(title, link);
            // Titles are unique; a repeated title replaces the earlier link in place.
            match entries.iter_mut().find(|e| e.title == entry.title) {
                Some(existing) => existing.link = entry.link,
                None => entries.push(entry),
            }
        }
        Self { entries }
    }
}
