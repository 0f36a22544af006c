use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "formscan",
    version,
    about = "Form discovery and conditional-logic engine for hosted sites"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Host published sites live under (default: webflow.io)
    #[arg(long, global = true)]
    pub publish_host: Option<String>,

    /// Page-inventory API endpoint
    #[arg(long, global = true)]
    pub inventory_endpoint: Option<String>,

    /// Bearer token for the page-inventory API
    #[arg(long, global = true)]
    pub api_token: Option<String>,

    /// Path to config file (default: formscan.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a site's published pages for forms and fields
    Scan {
        /// Site identifier
        #[arg(long)]
        site: String,

        /// Maximum pages to scan
        #[arg(long, default_value_t = 50)]
        max_pages: usize,

        /// Homepage URL fallback when the page inventory is unavailable
        #[arg(long)]
        homepage: Option<String>,

        /// Print the full scan result as JSON instead of the summary
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write JSONL diagnostics to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Scan a site and reconcile stored field identities against it
    Reconcile {
        /// Site identifier
        #[arg(long)]
        site: String,

        /// Path to a YAML file of stored field identities
        #[arg(long)]
        fields: String,

        /// Form id the fields are bound to
        #[arg(long)]
        form: Option<String>,

        /// Allow matches across forms (legacy rules without a form binding)
        #[arg(long, default_value_t = false)]
        cross_form: bool,

        /// Maximum pages to scan
        #[arg(long, default_value_t = 50)]
        max_pages: usize,

        /// Homepage URL fallback when the page inventory is unavailable
        #[arg(long)]
        homepage: Option<String>,

        /// Write JSONL diagnostics to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Generate the embeddable rule-evaluation script for a site
    Generate {
        /// Path to the rule set JSON file
        #[arg(long)]
        rules: String,

        /// Site identifier baked into the script
        #[arg(long)]
        site: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `formscan.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_fifty")]
    pub max_pages: usize,

    #[serde(default = "default_publish_host")]
    pub publish_host: String,

    pub homepage_url: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            publish_host: "webflow.io".to_string(),
            homepage_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub inventory_endpoint: String,

    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            inventory_endpoint: "https://api.webflow.com/sites".to_string(),
            token: None,
        }
    }
}

// Serde default helpers
fn default_fifty() -> usize { 50 }
fn default_publish_host() -> String { "webflow.io".to_string() }
fn default_endpoint() -> String { "https://api.webflow.com/sites".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("formscan.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build a CrawlConfig from resolved CLI/config values.
pub fn build_crawl_config(
    max_pages: usize,
    publish_host: &str,
    homepage_url: Option<&str>,
) -> crate::crawl::crawler::CrawlConfig {
    crate::crawl::crawler::CrawlConfig {
        max_pages,
        publish_host: publish_host.to_string(),
        homepage_url: homepage_url.map(|s| s.to_string()),
    }
}
