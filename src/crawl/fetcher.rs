use std::collections::HashMap;
use std::time::Duration;

use crate::crawl::error::ScanError;
use crate::trace::trace::now_ms;

/// How long one page fetch may take before the crawler moves on.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves one page's markup. The live implementation hits the published
/// site; tests use the in-memory variant.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScanError>;
}

// ============================================================================
// HTTP fetcher
// ============================================================================

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScanError> {
        // Cache-defeating query parameter: repeated scans must observe the
        // live published markup, not a CDN copy.
        let separator = if url.contains('?') { '&' } else { '?' };
        let busted = format!("{}{}nocache={}", url, separator, now_ms());

        let response = self
            .client
            .get(&busted)
            .send()
            .map_err(|e| ScanError::PageFetch {
                url: url.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ScanError::PageStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().map_err(|e| ScanError::PageFetch {
            url: url.to_string(),
            source: e,
        })
    }
}

// ============================================================================
// Static fetcher (tests, offline scans)
// ============================================================================

pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn with_page(mut self, url: &str, markup: &str) -> Self {
        self.pages.insert(url.to_string(), markup.to_string());
        self
    }
}

impl Default for StaticFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScanError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScanError::PageStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}
