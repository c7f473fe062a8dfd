use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::domain::candidate::Candidate;
use crate::domain::report::AggregateRating;
use crate::models::config::AppConfig;

pub mod imdb;
pub mod letterboxd;
pub mod myanimelist;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to build provider: {0}")]
    Build(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to parse provider page: {0}")]
    Parse(String),
    #[error("rating data not found for {0}")]
    RatingNotFound(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// An abstraction over rating-site adapters that produce [`Candidate`]s
/// for a free-text title query.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Selector name used for dispatch and logging.
    fn name(&self) -> &'static str;

    /// Queries the provider's search page and returns every candidate
    /// extracted from it.
    async fn search(&self, query: &str) -> ProviderResult<Vec<Candidate>>;

    /// Fetches the page-level rating for a matched candidate.
    ///
    /// Most providers expose their score inline in the search results;
    /// those report no separate rating.
    async fn rating(&self, _candidate: &Candidate) -> ProviderResult<Option<AggregateRating>> {
        Ok(None)
    }
}

/// Shared HTTP client builder for all provider adapters.
pub(crate) fn build_reqwest_client(config: &AppConfig) -> ProviderResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetches a URL and returns the response body.
///
/// A permit from the adapter's [`Semaphore`] is acquired before issuing
/// the request, capping the number of in-flight requests per provider.
pub(crate) async fn fetch_page(
    client: &reqwest::Client,
    semaphore: &Semaphore,
    url: &str,
) -> ProviderResult<String> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| ProviderError::Build(e.to_string()))?;
    let res = client.get(url).send().await?;
    if !res.status().is_success() {
        log::warn!("Failed to get URL {}: {}", url, res.status());
        return Err(ProviderError::Status {
            url: url.to_string(),
            status: res.status(),
        });
    }
    Ok(res.text().await?)
}
