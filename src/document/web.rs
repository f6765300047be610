/*!
 * URL-sourced content front-end.
 *
 * This is the boundary to the fetching/extraction collaborator: a page
 * is fetched over HTTP and reduced to a sequence of text paragraphs.
 * The pipeline only ever sees the resulting `DocumentTree`; translated
 * URL content is serialized as plain text.
 */

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::model::DocumentTree;
use crate::document::plain;
use crate::errors::DocumentError;

static SCRIPT_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|head)\b.*?</(script|style|noscript|head)>").unwrap()
});

static BLOCK_BREAKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(p|div|li|h[1-6]|tr|td|th|section|article|blockquote)>|<br\s*/?>").unwrap()
});

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Fetch a URL and parse its content into a document tree
pub async fn fetch_url(url: &str, timeout_secs: u64) -> Result<DocumentTree, DocumentError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DocumentError::Fetch(format!("cannot build HTTP client: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DocumentError::Fetch(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocumentError::Fetch(format!(
            "{} answered with status {}",
            url, status
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| DocumentError::Fetch(format!("cannot read body of {}: {}", url, e)))?;

    Ok(parse_html(&body))
}

/// Reduce an HTML page to a tree of text paragraphs
pub fn parse_html(html: &str) -> DocumentTree {
    let without_scripts = SCRIPT_BLOCKS.replace_all(html, " ");
    let with_breaks = BLOCK_BREAKS.replace_all(&without_scripts, "\n");
    let text_only = TAGS.replace_all(&with_breaks, "");

    let paragraphs: Vec<String> = text_only
        .lines()
        .map(|line| decode_entities(line.trim()))
        .filter(|line| !line.is_empty())
        .collect();

    plain::parse_str(&paragraphs.join("\n"))
}

/// Decode the handful of named entities that matter for body text
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
