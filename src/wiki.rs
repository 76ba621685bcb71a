use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use crate::wordfreq::ArticleSource;

const USER_AGENT: &str = concat!("subcopy-wordfreq/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Politeness pause between API calls, per the MediaWiki etiquette guidelines.
const PAUSE_MIN_MS: u64 = 500;
const PAUSE_MAX_MS: u64 = 1500;

/// Client for a Wikipedia language edition's MediaWiki API. Fetches random
/// main-namespace articles as plaintext extracts.
pub struct WikipediaClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl WikipediaClient {
    pub fn new(lang: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("https://{lang}.wikipedia.org/w/api.php"),
        })
    }

    fn random_title(&self) -> Result<String> {
        let response: RandomResponse = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "random"),
                ("rnnamespace", "0"),
                ("rnlimit", "1"),
            ])
            .send()
            .context("Failed to query random article")?
            .error_for_status()
            .context("Random article query was rejected")?
            .json()
            .context("Failed to decode random article response")?;

        response
            .query
            .random
            .into_iter()
            .next()
            .map(|page| page.title)
            .ok_or_else(|| anyhow!("Random article query returned no titles"))
    }

    fn extract(&self, title: &str) -> Result<String> {
        let response: ExtractResponse = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("titles", title),
                ("exlimit", "1"),
            ])
            .send()
            .with_context(|| format!("Failed to fetch extract for '{title}'"))?
            .error_for_status()
            .with_context(|| format!("Extract query for '{title}' was rejected"))?
            .json()
            .with_context(|| format!("Failed to decode extract response for '{title}'"))?;

        Ok(response
            .query
            .pages
            .into_values()
            .next()
            .and_then(|page| page.extract)
            .unwrap_or_default())
    }
}

impl ArticleSource for WikipediaClient {
    fn fetch_article(&mut self) -> Result<String> {
        let title = self.random_title()?;
        debug!(%title, "fetching article extract");
        let text = self.extract(&title)?;

        let pause = rand::rng().random_range(PAUSE_MIN_MS..=PAUSE_MAX_MS);
        thread::sleep(Duration::from_millis(pause));

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct RandomResponse {
    query: RandomQuery,
}

#[derive(Debug, Deserialize)]
struct RandomQuery {
    random: Vec<RandomPage>,
}

#[derive(Debug, Deserialize)]
struct RandomPage {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_random_response_shape() {
        let body = r#"{
            "batchcomplete": "",
            "query": {
                "random": [{"id": 42, "ns": 0, "title": "Example article"}]
            }
        }"#;

        let response: RandomResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.query.random[0].title, "Example article");
    }

    #[test]
    fn test_extract_response_shape() {
        let body = r#"{
            "batchcomplete": "",
            "query": {
                "pages": {
                    "42": {"pageid": 42, "ns": 0, "title": "Example article",
                           "extract": "Plain text body."}
                }
            }
        }"#;

        let response: ExtractResponse = serde_json::from_str(body).unwrap();
        let page = response.query.pages.into_values().next().unwrap();
        assert_eq!(page.extract.as_deref(), Some("Plain text body."));
    }

    #[test]
    fn test_extract_response_without_extract_field() {
        let body = r#"{
            "query": {
                "pages": {
                    "42": {"pageid": 42, "ns": 0, "title": "Example article"}
                }
            }
        }"#;

        let response: ExtractResponse = serde_json::from_str(body).unwrap();
        let page = response.query.pages.into_values().next().unwrap();
        assert_eq!(page.extract, None);
    }
}
