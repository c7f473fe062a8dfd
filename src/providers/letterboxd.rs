use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use url::Url;

use crate::MAX_SEARCH_RESULTS;
use crate::domain::candidate::Candidate;
use crate::models::config::AppConfig;
use crate::providers::ProviderAdapter;
use crate::providers::ProviderError;
use crate::providers::ProviderResult;
use crate::providers::build_reqwest_client;
use crate::providers::fetch_page;

/// Adapter for the Letterboxd film search page.
///
/// Letterboxd search results expose neither an inline score nor a
/// machine-readable rating block, so candidates carry no `raw_score`.
pub struct LetterboxdProvider {
    base_url: Url,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl LetterboxdProvider {
    pub fn new(config: &AppConfig) -> ProviderResult<Self> {
        Ok(Self {
            base_url: Url::parse("https://letterboxd.com/")
                .map_err(|e| ProviderError::Build(e.to_string()))?,
            client: build_reqwest_client(config)?,
            semaphore: Arc::new(Semaphore::new(config.concurrency)),
        })
    }

    fn search_url(&self, query: &str) -> ProviderResult<Url> {
        let mut url = self
            .base_url
            .join("search/films/")
            .map_err(|e| ProviderError::Build(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Build("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(query)
            .push("");
        Ok(url)
    }
}

/// Extracts film candidates from a search results page.
fn parse_search_results(html: &str, base_url: &Url) -> Vec<Candidate> {
    let document = Html::parse_document(html);

    let entry_selector = Selector::parse("li.search-result").unwrap();
    let title_selector = Selector::parse("span.film-title-wrapper a").unwrap();
    let poster_selector = Selector::parse("div.poster img").unwrap();

    document
        .select(&entry_selector)
        .take(MAX_SEARCH_RESULTS)
        .filter_map(|entry| {
            let anchor = entry.select(&title_selector).next()?;
            let title = anchor.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                return None;
            }
            let reference_url = anchor
                .value()
                .attr("href")
                .and_then(|href| base_url.join(href).ok())?
                .to_string();

            let image = entry
                .select(&poster_selector)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map(str::to_string);

            Some(Candidate {
                title,
                reference_url,
                image,
                raw_score: None,
            })
        })
        .collect()
}

#[async_trait]
impl ProviderAdapter for LetterboxdProvider {
    fn name(&self) -> &'static str {
        "letterboxd"
    }

    async fn search(&self, query: &str) -> ProviderResult<Vec<Candidate>> {
        let url = self.search_url(query)?;
        let html = fetch_page(&self.client, &self.semaphore, url.as_str()).await?;
        Ok(parse_search_results(&html, &self.base_url))
    }
}
