//! Streaming-site detection.
//!
//! Maps a browser tab URL to a known streaming service and recovers the
//! watched title where the service exposes it in the URL. The browser
//! side (tab events, in-page extraction) stays outside this crate; this
//! module only interprets the URL it is handed.

use url::Url;

/// Streaming services recognized by their tab URL host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingService {
    Netflix,
    HboMax,
    Crunchyroll,
}

impl StreamingService {
    pub fn name(&self) -> &'static str {
        match self {
            StreamingService::Netflix => "Netflix",
            StreamingService::HboMax => "HBO Max",
            StreamingService::Crunchyroll => "Crunchyroll",
        }
    }
}

/// Detects which streaming service a tab URL belongs to.
pub fn detect_service(url: &str) -> Option<StreamingService> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host_str()? {
        "www.netflix.com" => Some(StreamingService::Netflix),
        "play.max.com" => Some(StreamingService::HboMax),
        "www.crunchyroll.com" => Some(StreamingService::Crunchyroll),
        _ => None,
    }
}

/// Extracts the watched title from a tab URL.
///
/// Only Crunchyroll encodes the series in its URLs
/// (`/series/<id>/<slug>` and `/watch/<id>/<slug>`); other services need
/// in-page extraction and yield `None` here.
pub fn watched_title(url: &str) -> Option<String> {
    if detect_service(url)? != StreamingService::Crunchyroll {
        return None;
    }

    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["series", _, slug] | ["watch", _, slug] => {
            let title = normalize_slug(slug);
            (!title.is_empty()).then_some(title)
        }
        _ => None,
    }
}

/// Rewrites a hyphenated URL slug into a displayable title:
/// "dr-stone" becomes "Dr Stone".
pub fn normalize_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
