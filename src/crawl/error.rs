use std::fmt;

#[derive(Debug)]
pub enum ScanError {
    /// The page-inventory provider could not be reached
    InventoryFetch { site_id: String, source: reqwest::Error },

    /// The page-inventory provider answered with a non-success status
    InventoryStatus { site_id: String, status: u16 },

    /// The site record carries no short name, so no published URL can be derived
    MissingShortName { site_id: String },

    /// No inventory and no homepage URL configured — nothing to scan
    NoHomepage { site_id: String },

    /// The planned scan exceeds the page budget
    PageBudgetExceeded { planned: usize, budget: usize },

    /// A single page fetch failed (recovered locally by the crawler)
    PageFetch { url: String, source: reqwest::Error },

    /// A single page fetch answered with a non-success status
    PageStatus { url: String, status: u16 },

    /// Bad CLI/config input (unreadable rules file, bad JSON, ...)
    Config(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InventoryFetch { site_id, source } => {
                write!(f, "Failed to fetch page inventory for site '{}': {}", site_id, source)
            }
            ScanError::InventoryStatus { site_id, status } => {
                write!(f, "Page inventory for site '{}' returned HTTP {}", site_id, status)
            }
            ScanError::MissingShortName { site_id } => {
                write!(f, "Site '{}' has no short name; cannot derive published URLs", site_id)
            }
            ScanError::NoHomepage { site_id } => {
                write!(f, "Site '{}': no inventory and no homepage URL to fall back to", site_id)
            }
            ScanError::PageBudgetExceeded { planned, budget } => {
                write!(f, "Scan would visit {} pages, over the budget of {}", planned, budget)
            }
            ScanError::PageFetch { url, source } => {
                write!(f, "Failed to fetch '{}': {}", url, source)
            }
            ScanError::PageStatus { url, status } => {
                write!(f, "Fetch of '{}' returned HTTP {}", url, status)
            }
            ScanError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::InventoryFetch { source, .. } => Some(source),
            ScanError::PageFetch { source, .. } => Some(source),
            _ => None,
        }
    }
}
