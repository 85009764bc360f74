//! DuckDuckGo search provider
//!
//! Uses DuckDuckGo's HTML interface; no API key is required.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

use staj_core::{Error, Result, SearchHit, SearchProvider};

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
    endpoint: String,
    whitespace: Regex,
}

impl DuckDuckGoProvider {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Result<Self> {
        Self::with_endpoint(DDG_HTML_URL, Self::DEFAULT_TIMEOUT)
    }

    /// Provider posting to a different HTML endpoint
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            whitespace: whitespace_regex()?,
        })
    }
}

fn whitespace_regex() -> Result<Regex> {
    Regex::new(r"\s+").map_err(|e| Error::Other(e.to_string()))
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("DuckDuckGo did not answer: {}", e))
                } else {
                    Error::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "DuckDuckGo request failed with status {}",
                status
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let hits = parse_results(&html, max_results, &self.whitespace)?;
        debug!(query, hits = hits.len(), "DuckDuckGo search finished");
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Other(format!("Invalid selector '{}': {:?}", css, e)))
}

/// Extract organic results from a DuckDuckGo HTML page; ads are skipped
fn parse_results(html: &str, max_results: usize, whitespace: &Regex) -> Result<Vec<SearchHit>> {
    let result_selector = selector(".result")?;
    let title_selector = selector(".result__a")?;
    let snippet_selector = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let mut hits = Vec::new();

    for result in document.select(&result_selector) {
        if hits.len() >= max_results {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(link) = result.select(&title_selector).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(resolve_result_url) else {
            continue;
        };

        let title = element_text(link, whitespace);
        let snippet = result
            .select(&snippet_selector)
            .next()
            .map(|el| element_text(el, whitespace))
            .unwrap_or_default();

        if !title.is_empty() {
            hits.push(SearchHit {
                title,
                url,
                snippet,
            });
        }
    }

    Ok(hits)
}

fn element_text(element: ElementRef<'_>, whitespace: &Regex) -> String {
    let text: String = element.text().collect();
    whitespace.replace_all(text.trim(), " ").into_owned()
}

/// Resolve DuckDuckGo's `//duckduckgo.com/l/?uddg=<target>` redirect links
fn resolve_result_url(href: &str) -> Option<String> {
    let base = Url::parse("https://duckduckgo.com/").ok()?;
    let url = base.join(href).ok()?;

    if let Some((_, target)) = url.query_pairs().find(|(key, _)| key == "uddg") {
        return Some(target.into_owned());
    }

    match url.host_str() {
        Some(host) if host.ends_with("duckduckgo.com") => None,
        _ => Some(url.to_string()),
    }
}
