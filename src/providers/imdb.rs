use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use tokio::sync::Semaphore;
use url::Url;

use crate::MAX_SEARCH_RESULTS;
use crate::domain::candidate::Candidate;
use crate::domain::report::AggregateRating;
use crate::models::config::AppConfig;
use crate::providers::ProviderAdapter;
use crate::providers::ProviderError;
use crate::providers::ProviderResult;
use crate::providers::build_reqwest_client;
use crate::providers::fetch_page;

/// Search results are not rendered server-side; the find page embeds them
/// as JSON in a `#__NEXT_DATA__` script block.
#[derive(Debug, Deserialize)]
struct NextData {
    props: NextProps,
}

#[derive(Debug, Deserialize)]
struct NextProps {
    #[serde(rename = "pageProps")]
    page_props: PageProps,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(rename = "titleResults")]
    title_results: TitleResults,
}

#[derive(Debug, Deserialize)]
struct TitleResults {
    results: Vec<TitleResult>,
}

#[derive(Debug, Deserialize)]
struct TitleResult {
    id: String,
    #[serde(rename = "titleNameText")]
    title_name_text: Option<String>,
    #[serde(rename = "titlePosterImageModel")]
    title_poster_image_model: Option<PosterImage>,
}

#[derive(Debug, Deserialize)]
struct PosterImage {
    url: Option<String>,
}

/// Adapter for the IMDb find page.
///
/// Search results carry no rating, so the matched title's page is fetched
/// separately and its `aggregateRating` JSON-LD fragment extracted.
pub struct ImdbProvider {
    base_url: Url,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl ImdbProvider {
    pub fn new(config: &AppConfig) -> ProviderResult<Self> {
        Ok(Self {
            base_url: Url::parse("https://www.imdb.com/")
                .map_err(|e| ProviderError::Build(e.to_string()))?,
            client: build_reqwest_client(config)?,
            semaphore: Arc::new(Semaphore::new(config.concurrency)),
        })
    }

    fn search_url(&self, query: &str) -> ProviderResult<Url> {
        let mut url = self
            .base_url
            .join("find/")
            .map_err(|e| ProviderError::Build(e.to_string()))?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }
}

/// Deserializes the embedded `#__NEXT_DATA__` document and maps its title
/// results to candidates. Results without a title name are skipped.
fn parse_search_results(html: &str, base_url: &Url) -> ProviderResult<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script#__NEXT_DATA__").unwrap();

    let payload = document
        .select(&selector)
        .next()
        .map(|script| script.text().collect::<String>())
        .ok_or_else(|| ProviderError::Parse("missing #__NEXT_DATA__ script".to_string()))?;

    let next_data: NextData = serde_json::from_str(&payload)
        .map_err(|e| ProviderError::Parse(format!("malformed #__NEXT_DATA__ JSON: {e}")))?;

    let candidates = next_data
        .props
        .page_props
        .title_results
        .results
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .filter_map(|result| {
            let title = result.title_name_text?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            let reference_url = base_url
                .join(&format!("title/{}/", result.id))
                .ok()?
                .to_string();
            let image = result.title_poster_image_model.and_then(|poster| poster.url);

            Some(Candidate {
                title,
                reference_url,
                image,
                raw_score: None,
            })
        })
        .collect();

    Ok(candidates)
}

/// Extracts the `aggregateRating` JSON-LD fragment from a title page.
fn parse_rating(html: &str, url: &str) -> ProviderResult<AggregateRating> {
    let rating_re = Regex::new(
        r#""aggregateRating"\s*:\s*\{\s*"@type"\s*:\s*"AggregateRating"\s*,\s*"ratingCount"\s*:\s*(\d+)\s*,\s*"bestRating"\s*:\s*(\d+)\s*,\s*"worstRating"\s*:\s*(\d+)\s*,\s*"ratingValue"\s*:\s*([\d.]+)\s*\}"#,
    )
    .unwrap();

    let captures = rating_re
        .captures(html)
        .ok_or_else(|| ProviderError::RatingNotFound(url.to_string()))?;

    Ok(AggregateRating {
        rating_count: captures[1].parse().unwrap_or(0),
        best_rating: captures[2].parse().unwrap_or(0),
        worst_rating: captures[3].parse().unwrap_or(0),
        rating_value: captures[4].parse().unwrap_or(0.0),
    })
}

#[async_trait]
impl ProviderAdapter for ImdbProvider {
    fn name(&self) -> &'static str {
        "imdb"
    }

    async fn search(&self, query: &str) -> ProviderResult<Vec<Candidate>> {
        let url = self.search_url(query)?;
        let html = fetch_page(&self.client, &self.semaphore, url.as_str()).await?;
        parse_search_results(&html, &self.base_url)
    }

    async fn rating(&self, candidate: &Candidate) -> ProviderResult<Option<AggregateRating>> {
        let html = fetch_page(&self.client, &self.semaphore, &candidate.reference_url).await?;
        Ok(Some(parse_rating(&html, &candidate.reference_url)?))
    }
}
