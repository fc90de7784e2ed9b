//! Process-scoped cache of available subreddit names.
//!
//! The snapshot service's listing endpoint takes no parameters and its result
//! is stable for the life of the process, so it is fetched at most once and
//! all filtering happens locally. The cache is an explicit value with an
//! explicit lifecycle (populated on first successful fetch, read-only after
//! that, reset only through [`SubredditDirectory::reset`]) rather than a
//! global mutable.

use tokio::sync::OnceCell;
use tracing::info;

use crate::client::{FetchError, WarpClient};

/// Lazily-populated directory of subreddit names.
#[derive(Default)]
pub struct SubredditDirectory {
    names: OnceCell<Vec<String>>,
}

impl SubredditDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All known names, fetching the listing on first use.
    ///
    /// A fetch failure leaves the cache unpopulated; the next call tries
    /// again.
    pub async fn all(&self, client: &WarpClient) -> Result<&[String], FetchError> {
        let names = self
            .names
            .get_or_try_init(|| async {
                let names = client.list_subreddits().await?;
                info!(count = names.len(), "populated subreddit directory");
                Ok::<_, FetchError>(names)
            })
            .await?;
        Ok(names)
    }

    /// Names containing `filter` (case-insensitive). An empty filter returns
    /// everything.
    pub async fn matching(
        &self,
        client: &WarpClient,
        filter: &str,
    ) -> Result<Vec<String>, FetchError> {
        Ok(filter_names(self.all(client).await?, filter))
    }

    /// Seed the cache without a network fetch. No-op if already populated.
    pub fn prime(&self, names: Vec<String>) {
        let _ = self.names.set(names);
    }

    pub fn is_populated(&self) -> bool {
        self.names.initialized()
    }

    /// Drop the cached listing so the next read fetches again.
    pub fn reset(&mut self) {
        self.names = OnceCell::new();
    }
}

fn filter_names(names: &[String], filter: &str) -> Vec<String> {
    if filter.is_empty() {
        return names.to_vec();
    }
    let needle = filter.to_lowercase();
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
