//! Web search through the DuckDuckGo instant-answer API.

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt::Write;

use crate::ui::Style;

/// Related topics shown per search.
pub const MAX_TOPICS: usize = 6;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResults {
    #[serde(default, rename = "AbstractURL")]
    pub abstract_url: String,
    #[serde(default)]
    pub related_topics: Vec<RelatedTopic>,
}

/// One related topic. Category groups carry no text of their own.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RelatedTopic {
    #[serde(default, rename = "FirstURL")]
    pub first_url: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub result: String,
}

pub struct SearchClient {
    client: Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let url = Url::parse_with_params(&self.endpoint, [("q", query), ("format", "json")])
            .with_context(|| format!("Invalid search endpoint: {}", self.endpoint))?;

        tracing::debug!(%url, "searching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to reach search endpoint")?
            .error_for_status()
            .context("Search request failed")?;

        // The API answers with `application/x-javascript`, so decode by hand.
        let body = response
            .text()
            .await
            .context("Failed to read search results")?;
        serde_json::from_str(&body).context("Failed to decode search results")
    }
}

/// Formats the abstract URL and the first [`MAX_TOPICS`] related topics.
pub fn format_results(results: &SearchResults) -> String {
    let mut out = String::new();

    if !results.abstract_url.is_empty() {
        let _ = writeln!(
            out,
            "{} {}",
            Style::label("Abstract:"),
            Style::path(&results.abstract_url)
        );
    }

    for (i, topic) in results.related_topics.iter().take(MAX_TOPICS).enumerate() {
        let text = if topic.text.is_empty() {
            &topic.result
        } else {
            &topic.text
        };
        let _ = write!(out, "{} {text}", Style::label(format!("Result {}:", i + 1)));
        if !topic.first_url.is_empty() {
            let _ = write!(out, " {}", Style::secondary(&topic.first_url));
        }
        out.push('\n');
    }

    if out.is_empty() {
        out.push_str("No results\n");
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn topic(i: usize) -> serde_json::Value {
        serde_json::json!({
            "FirstURL": format!("https://duckduckgo.com/t{i}"),
            "Text": format!("topic {i}"),
            "Result": format!("<a>topic {i}</a>")
        })
    }

    #[tokio::test]
    async fn test_search_escapes_query_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "rust & tokio"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                serde_json::json!({
                    "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
                    "RelatedTopics": [topic(1), {"Name": "Group", "Topics": []}]
                })
                .to_string(),
                "application/x-javascript",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = SearchClient::new(format!("{}/", server.uri()));
        let results = client.search("rust & tokio").await.unwrap();

        assert_eq!(results.abstract_url, "https://en.wikipedia.org/wiki/Rust");
        assert_eq!(results.related_topics.len(), 2);
        assert_eq!(results.related_topics[0].text, "topic 1");
        assert!(results.related_topics[1].text.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SearchClient::new(server.uri());
        assert!(client.search("q").await.is_err());
    }

    #[test]
    fn test_format_results_limits_topics() {
        let results = SearchResults {
            abstract_url: "https://example.com".to_string(),
            related_topics: (1..=9)
                .map(|i| serde_json::from_value(topic(i)).unwrap())
                .collect(),
        };

        let out = format_results(&results);

        assert!(out.contains("https://example.com"));
        assert!(out.contains("topic 6"));
        assert!(!out.contains("topic 7"));
        assert_eq!(out.lines().count(), 1 + MAX_TOPICS);
    }

    #[test]
    fn test_format_results_falls_back_to_result_html() {
        let results = SearchResults {
            abstract_url: String::new(),
            related_topics: vec![RelatedTopic {
                result: "<a>only html</a>".to_string(),
                ..RelatedTopic::default()
            }],
        };
        let out = format_results(&results);
        assert!(out.contains("<a>only html</a>"));
        assert!(!out.contains("Abstract"));
    }

    #[test]
    fn test_format_results_empty() {
        assert_eq!(format_results(&SearchResults::default()), "No results\n");
    }
}
