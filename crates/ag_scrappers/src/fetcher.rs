//! Page retrieval and cleaning.
//!
//! A fetch is a GET with a browser-like user agent and a bounded timeout.
//! Redirects are followed one hop at a time and every hop is held to the
//! domain allow-list. The body is decoded with the charset the server
//! declares and reduced to the text of its main content region. Nothing
//! here retries: a failed fetch is reported straight away.
//!
//! Failures are returned, not logged; the pipeline logs them once.

use ag_core::config::FetchConfig;
use ag_core::{Error, Result};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Elements that never carry article text.
const EXCLUDED: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Content regions, most specific first.
const CONTAINERS: &[&str] = &["main", "article", "body"];

/// Elements that end a line of text.
const BLOCKS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "section",
    "blockquote", "pre", "table", "tr", "figure", "figcaption", "dd", "dt",
];

pub struct Fetcher {
    client: Client,
    allowed_domains: Vec<String>,
    max_content_bytes: usize,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            allowed_domains: config
                .allowed_domains
                .iter()
                .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            max_content_bytes: config.max_content_bytes,
        })
    }

    /// Parse `raw` and require an http(s) scheme and a host.
    pub fn validate_url(raw: &str) -> Result<Url> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::InvalidUrl("URL is required".to_string()));
        }
        let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!("unsupported scheme: {}", url.scheme())));
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(url),
            _ => Err(Error::InvalidUrl("missing host".to_string())),
        }
    }

    /// A host passes when the allow-list is empty, equals an entry, or is a
    /// sub-domain of one.
    pub fn is_allowed_domain(&self, url: &Url) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }
        let Some(host) = url.host_str().map(str::to_lowercase) else {
            return false;
        };
        self.allowed_domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
    }

    /// Validation and domain policy, without touching the network.
    pub fn check_url(&self, raw: &str) -> Result<Url> {
        let url = Self::validate_url(raw)?;
        if !self.is_allowed_domain(&url) {
            let host = url.host_str().unwrap_or_default().to_string();
            debug!(%host, "Domain not allowed");
            return Err(Error::DomainNotAllowed(host));
        }
        Ok(url)
    }

    /// Cleaned text of the page at `raw`, or `None` if it has no content.
    #[instrument(level = "info", skip_all, fields(url = %raw))]
    pub async fn fetch(&self, raw: &str) -> Result<Option<String>> {
        let url = self.check_url(raw)?;
        let html = self.download(&url).await?;
        let text = clean_html(&html);
        info!(
            html_bytes = html.len(),
            text_bytes = text.as_ref().map_or(0, String::len),
            "Fetched page"
        );
        Ok(text)
    }

    async fn download(&self, url: &Url) -> Result<String> {
        let mut response = self.follow(url).await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Fetch returned error status");
            return Err(Error::FetchFailed(format!("HTTP {}", status)));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_content_bytes as u64 {
                return Err(self.too_large());
            }
        }

        let encoding = response_encoding(&response);
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            body.extend_from_slice(&chunk);
            if body.len() > self.max_content_bytes {
                return Err(self.too_large());
            }
        }
        debug!(bytes = body.len(), encoding = encoding.name(), "Downloaded body");

        let (text, _, _) = encoding.decode(&body);
        Ok(text.into_owned())
    }

    /// GET `url`, following redirects by hand so every hop passes the
    /// domain policy before it is requested.
    async fn follow(&self, url: &Url) -> Result<Response> {
        let mut current = url.clone();
        for _ in 0..=MAX_REDIRECTS {
            let response = self.client.get(current.clone()).send().await.map_err(classify)?;
            if !response.status().is_redirection() {
                return Ok(response);
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| Error::FetchFailed("redirect without location".to_string()))?;
            let next = current
                .join(location)
                .map_err(|e| Error::FetchFailed(format!("bad redirect location: {}", e)))?;
            debug!(from = %current, to = %next, "Following redirect");
            current = self.check_url(next.as_str())?;
        }
        Err(Error::FetchFailed("too many redirects".to_string()))
    }

    fn too_large(&self) -> Error {
        debug!(limit = self.max_content_bytes, "Fetched body exceeds limit");
        Error::FetchFailed(format!("response exceeds {} bytes", self.max_content_bytes))
    }
}

fn classify(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::FetchTimeout
    } else {
        Error::FetchFailed(e.without_url().to_string())
    }
}

/// Charset named by the `Content-Type` header, UTF-8 when absent or unknown.
fn response_encoding(response: &Response) -> &'static Encoding {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|content_type| {
            content_type.split(';').skip(1).find_map(|param| {
                let (name, value) = param.split_once('=')?;
                name.trim()
                    .eq_ignore_ascii_case("charset")
                    .then(|| value.trim().trim_matches('"'))
            })
        })
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Text of the most specific content region that has any, with
/// non-content elements dropped, runs of spaces collapsed and blank lines
/// removed.
pub fn clean_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for tag in CONTAINERS {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };
        let Some(container) = document.select(&selector).find(|el| !inside_excluded(el)) else {
            continue;
        };

        let mut raw = String::new();
        collect_text(container, &mut raw);
        let text = normalize_whitespace(&raw);
        if !text.is_empty() {
            return Some(text);
        }
    }

    None
}

fn inside_excluded(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .map_or(false, |el| EXCLUDED.contains(&el.name()))
    })
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if EXCLUDED.contains(&name) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if BLOCKS.contains(&name) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn normalize_whitespace(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
