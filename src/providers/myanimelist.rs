use std::sync::Arc;

use async_trait::async_trait;
use html_escape::decode_html_entities;
use regex::Regex;
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

/// Adapter for the MyAnimeList combined search page.
///
/// MyAnimeList renders scores inline in the result list, so candidates
/// carry their `raw_score` directly and no separate rating fetch is
/// needed.
pub struct MyAnimeListProvider {
    base_url: Url,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl MyAnimeListProvider {
    pub fn new(config: &AppConfig) -> ProviderResult<Self> {
        Ok(Self {
            base_url: Url::parse("https://myanimelist.net/")
                .map_err(|e| ProviderError::Build(e.to_string()))?,
            client: build_reqwest_client(config)?,
            semaphore: Arc::new(Semaphore::new(config.concurrency)),
        })
    }

    fn search_url(&self, query: &str) -> ProviderResult<Url> {
        let mut url = self
            .base_url
            .join("search/all")
            .map_err(|e| ProviderError::Build(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("cat", "all");
        Ok(url)
    }
}

/// Extracts candidates from a search results page.
///
/// Entries live in `div.list.di-t.w100` blocks; the title anchor, the
/// lazily-loaded poster and the "Scored N.NN" fragment are picked out of
/// each block. Entries without a usable title are skipped.
fn parse_search_results(html: &str, base_url: &Url) -> Vec<Candidate> {
    let document = Html::parse_document(html);

    let entry_selector = Selector::parse("div.list.di-t.w100").unwrap();
    let title_selector = Selector::parse(".title a").unwrap();
    let image_selector = Selector::parse(".picSurround a img").unwrap();
    let score_selector = Selector::parse(".pt8").unwrap();
    let score_re = Regex::new(r"Scored (\d+\.\d+)").unwrap();

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
                .select(&image_selector)
                .next()
                .and_then(|img| img.value().attr("data-src"))
                .map(str::to_string);

            // The score sits in free-form markup; decode entities and let
            // the regex find the "Scored N.NN" fragment wherever it is.
            let raw_score = entry.select(&score_selector).next().and_then(|block| {
                let text = decode_html_entities(&block.inner_html()).to_string();
                score_re
                    .captures(&text)
                    .map(|captures| captures[1].to_string())
            });

            Some(Candidate {
                title,
                reference_url,
                image,
                raw_score,
            })
        })
        .collect()
}

#[async_trait]
impl ProviderAdapter for MyAnimeListProvider {
    fn name(&self) -> &'static str {
        "myanimelist"
    }

    async fn search(&self, query: &str) -> ProviderResult<Vec<Candidate>> {
        let url = self.search_url(query)?;
        let html = fetch_page(&self.client, &self.semaphore, url.as_str()).await?;
        Ok(parse_search_results(&html, &self.base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://myanimelist.net/").unwrap()
    }

    fn entry(title: &str, href: &str, score_block: &str) -> String {
        format!(
            r#"<div class="list di-t w100">
                <div class="picSurround di-tc"><a href="{href}"><img data-src="https://cdn.myanimelist.net/images/anime/1613/102576.jpg"></a></div>
                <div class="information di-tc">
                    <div class="title"><a href="{href}">{title}</a></div>
                    <div class="pt8">{score_block}</div>
                </div>
            </div>"#
        )
    }

    #[test]
    fn extracts_title_image_and_score() {
        let html = entry(
            "Dr. Stone",
            "/anime/38691/Dr_Stone",
            "Watch Video TV (24 eps) Scored 8.28 139,475 members",
        );
        let candidates = parse_search_results(&html, &base_url());

        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(candidate.title, "Dr. Stone");
        assert_eq!(
            candidate.reference_url,
            "https://myanimelist.net/anime/38691/Dr_Stone"
        );
        assert_eq!(
            candidate.image.as_deref(),
            Some("https://cdn.myanimelist.net/images/anime/1613/102576.jpg")
        );
        assert_eq!(candidate.raw_score.as_deref(), Some("8.28"));
    }

    #[test]
    fn missing_score_block_yields_no_raw_score() {
        let html = entry("One Piece", "/anime/21/One_Piece", "TV (ongoing)");
        let candidates = parse_search_results(&html, &base_url());

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].raw_score.is_none());
    }

    #[test]
    fn entries_without_a_title_anchor_are_skipped() {
        let html = format!(
            r#"<div class="list di-t w100"><div class="pt8">Scored 7.00</div></div>{}"#,
            entry("Dr. Stone", "/anime/38691/Dr_Stone", "Scored 8.28")
        );
        let candidates = parse_search_results(&html, &base_url());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Dr. Stone");
    }

    #[test]
    fn results_are_capped_at_the_page_size() {
        let html: String = (0..15)
            .map(|i| entry(&format!("Title {i}"), &format!("/anime/{i}"), "Scored 7.50"))
            .collect();
        let candidates = parse_search_results(&html, &base_url());

        assert_eq!(candidates.len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn empty_page_yields_no_candidates() {
        assert!(parse_search_results("<html><body></body></html>", &base_url()).is_empty());
    }
}
