use futures::future;

use crate::domain::report::{ProviderMatch, TitleReport};
use crate::matching::select_best_match;
use crate::models::config::AppConfig;
use crate::providers::ProviderAdapter;
use crate::providers::ProviderError;
use crate::providers::ProviderResult;
use crate::providers::imdb::ImdbProvider;
use crate::providers::letterboxd::LetterboxdProvider;
use crate::providers::myanimelist::MyAnimeListProvider;

/// Resolves a provider selector string to a boxed adapter.
pub fn provider_by_name(
    name: &str,
    config: &AppConfig,
) -> ProviderResult<Box<dyn ProviderAdapter>> {
    match name {
        "imdb" => Ok(Box::new(ImdbProvider::new(config)?)),
        "myanimelist" | "mal" => Ok(Box::new(MyAnimeListProvider::new(config)?)),
        "letterboxd" => Ok(Box::new(LetterboxdProvider::new(config)?)),
        _ => Err(ProviderError::Build(format!(
            "unknown provider selector: {name}"
        ))),
    }
}

/// Builds the full default provider set.
pub fn default_providers(config: &AppConfig) -> ProviderResult<Vec<Box<dyn ProviderAdapter>>> {
    Ok(vec![
        Box::new(ImdbProvider::new(config)?),
        Box::new(MyAnimeListProvider::new(config)?),
        Box::new(LetterboxdProvider::new(config)?),
    ])
}

/// Looks a title up with every given provider and aggregates the results.
///
/// Provider searches run concurrently; each result set is reduced to its
/// best match independently. A failing provider is logged and reported as
/// a no-match rather than aborting the whole lookup.
pub async fn lookup_title(query: &str, providers: &[Box<dyn ProviderAdapter>]) -> TitleReport {
    let tasks = providers
        .iter()
        .map(|provider| run_provider(query, provider.as_ref()));
    let matches = future::join_all(tasks).await;

    TitleReport {
        query: query.to_string(),
        matches,
    }
}

async fn run_provider(query: &str, provider: &dyn ProviderAdapter) -> ProviderMatch {
    let candidates = match provider.search(query).await {
        Ok(candidates) => candidates,
        Err(e) => {
            log::error!("{}: search failed: {e}", provider.name());
            return ProviderMatch::not_found(provider.name());
        }
    };

    let Some(best) = select_best_match(query, candidates) else {
        log::warn!("{}: no candidate matched {query:?}", provider.name());
        return ProviderMatch::not_found(provider.name());
    };

    log::info!(
        "{}: best match {:?} (similarity {:.3})",
        provider.name(),
        best.candidate.title,
        best.similarity.similarity_score
    );

    // Rating failures downgrade the match, they do not discard it.
    let rating = match provider.rating(&best.candidate).await {
        Ok(rating) => rating,
        Err(e) => {
            log::warn!("{}: rating fetch failed: {e}", provider.name());
            None
        }
    };

    ProviderMatch {
        provider: provider.name(),
        best_match: Some(best),
        rating,
    }
}
