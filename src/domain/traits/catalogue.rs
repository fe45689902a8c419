use async_trait::async_trait;
use crate::domain::entities::Catalogue;
use crate::application::errors::CatalogueError;

/// Where the title to link catalogue comes from.
///
/// Implementations fetch a fresh snapshot on every call; nothing is cached.
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Fetch the current catalogue
    async fn fetch(&self) -> Result<Catalogue, CatalogueError>;

    /// Fetch, degrading any failure to an empty catalogue.
    ///
    /// Callers cannot tell "source unavailable" from "nothing matched"; the
    /// failure is only visible in the logs.
    async fn fetch_or_empty(&self) -> Catalogue {
        match self.fetch().await {
            Ok(catalogue) => {
                tracing::debug!(entries = catalogue.len(), "Fetched catalogue");
                catalogue
            }
            Err(e) => {
                tracing::error!("Error fetching catalogue: {}", e);
                Catalogue::empty()
            }
        }
    }
}
