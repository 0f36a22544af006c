use serde::{Deserialize, Serialize};

use crate::crawl::error::ScanError;
use crate::extract::element_model::Page;

/// One page entry from the site-structure provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(rename = "shortName")]
    pub short_name: Option<String>,
}

/// The full inventory payload for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteStructure {
    pub pages: Vec<PageInfo>,
    pub site: SiteInfo,
}

fn default_true() -> bool {
    true
}

/// Source of the authoritative page inventory for a site.
pub trait InventoryProvider {
    fn fetch(&self, site_id: &str) -> Result<SiteStructure, ScanError>;
}

// ============================================================================
// HTTP provider
// ============================================================================

/// Fetches the inventory from the external site-structure API.
pub struct HttpInventoryProvider {
    endpoint: String,
    token: Option<String>,
}

impl HttpInventoryProvider {
    pub fn new(endpoint: &str, token: Option<&str>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.map(|t| t.to_string()),
        }
    }
}

impl InventoryProvider for HttpInventoryProvider {
    fn fetch(&self, site_id: &str) -> Result<SiteStructure, ScanError> {
        let url = format!("{}/{}", self.endpoint, site_id);
        let client = reqwest::blocking::Client::new();

        let mut request = client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| ScanError::InventoryFetch {
            site_id: site_id.to_string(),
            source: e,
        })?;

        if !response.status().is_success() {
            return Err(ScanError::InventoryStatus {
                site_id: site_id.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<SiteStructure>()
            .map_err(|e| ScanError::InventoryFetch {
                site_id: site_id.to_string(),
                source: e,
            })
    }
}

// ============================================================================
// Static provider (tests, offline scans)
// ============================================================================

pub struct StaticInventory {
    pub structure: SiteStructure,
}

impl InventoryProvider for StaticInventory {
    fn fetch(&self, _site_id: &str) -> Result<SiteStructure, ScanError> {
        Ok(self.structure.clone())
    }
}

// ============================================================================
// URL derivation
// ============================================================================

/// Derive the published URL of every live page:
/// `https://{short_name}.{publish_host}/{slug}`, with the root page mapping
/// to the bare host. Draft pages are skipped. A site record without a short
/// name is a fatal configuration error.
pub fn published_pages(
    structure: &SiteStructure,
    site_id: &str,
    publish_host: &str,
) -> Result<Vec<Page>, ScanError> {
    let short_name = structure
        .site
        .short_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ScanError::MissingShortName {
            site_id: site_id.to_string(),
        })?;

    let base = format!("https://{}.{}", short_name, publish_host);

    let pages = structure
        .pages
        .iter()
        .filter(|p| p.published)
        .map(|p| {
            let slug = p.slug.trim_matches('/');
            let url = if slug.is_empty() || slug == "index" {
                base.clone()
            } else {
                format!("{}/{}", base, slug)
            };
            Page {
                url,
                slug: slug.to_string(),
                title: p.title.clone(),
            }
        })
        .collect();

    Ok(pages)
}
