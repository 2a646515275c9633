// 🔄 AMFI Sync Check - is the AMC table still current?
//
// AMFI's NAV download page embeds the list of AMCs as a JavaScript array of
// objects (`mfId`, `mfName`, `tableId`, ...). We pull that array out of the
// HTML, coerce it into JSON and compare its ids against `Amc`.
//
// The check only reports; updating the table is a manual edit.

use crate::entities::{Amc, AmcRegistry};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

pub const AMFI_NAV_URL: &str = "https://www.amfiindia.com/net-asset-value/nav-download";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// AMFI ENTRY
// ============================================================================

/// One AMC as listed by AMFI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmfiEntry {
    #[serde(rename = "mfId", deserialize_with = "deserialize_id")]
    pub mf_id: u32,

    #[serde(rename = "mfName")]
    pub mf_name: String,
}

/// AMFI sends ids both as numbers and as numeric strings
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u32),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid mfId: {:?}", text))),
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Pull the AMC list out of the NAV download page
pub fn extract_amc_list(html: &str) -> Result<Vec<AmfiEntry>> {
    let array = Regex::new(r"(?s)\[\s*\{[^\]]*tableId[^\]]*\}\s*\]")?;
    let quote_keys = Regex::new(r"([{,])\s*(\w+)\s*:")?;
    let trailing_commas = Regex::new(r",\s*([}\]])")?;

    let found = array
        .find(html)
        .ok_or_else(|| anyhow!("Could not find AMC data in AMFI website response"))?;

    let json = found.as_str().replace("\\\"", "\"");
    let json = quote_keys.replace_all(&json, "$1\"$2\":");
    let json = trailing_commas.replace_all(&json, "$1");

    log::debug!("extracted AMC array ({} bytes)", json.len());

    serde_json::from_str(&json).context("Failed to parse AMC list from AMFI website")
}

/// Turn an AMFI display name into an `Amc` code
///
/// Example: "360 ONE Mutual Fund" → "_360_ONE_MUTUAL_FUND"
pub fn normalize_name(name: &str) -> String {
    let upper = name.to_uppercase();

    let mut normalized = String::with_capacity(upper.len());
    for c in upper.chars() {
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            normalized.push(c);
        } else if !normalized.ends_with('_') {
            normalized.push('_');
        }
    }

    let mut normalized = normalized.trim_matches('_').to_string();
    if normalized.starts_with(|c: char| c.is_ascii_digit()) {
        normalized.insert(0, '_');
    }
    normalized
}

// ============================================================================
// SYNC REPORT
// ============================================================================

/// AMC listed by AMFI but absent from the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAmc {
    pub id: u32,
    pub name: String,
    /// Code to use when adding it to the table
    pub suggested_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub source_url: String,
    pub checked_at: DateTime<Utc>,
    pub amfi_count: usize,
    pub table_count: usize,

    /// Ordered by id
    pub missing_in_table: Vec<MissingAmc>,

    /// Ordered by id; possibly defunct AMCs
    pub extra_in_table: Vec<Amc>,
}

impl SyncReport {
    /// Compare AMFI's list against the registry
    pub fn compare(registry: &AmcRegistry, amfi: &[AmfiEntry], source_url: &str) -> Self {
        // Later duplicates win, matching a plain id → name map
        let amfi_by_id: BTreeMap<u32, &str> = amfi
            .iter()
            .map(|entry| (entry.mf_id, entry.mf_name.as_str()))
            .collect();

        let table_ids = registry.ids();

        let missing_in_table = amfi_by_id
            .iter()
            .filter(|(id, _)| !table_ids.contains(*id))
            .map(|(&id, &name)| MissingAmc {
                id,
                name: name.to_string(),
                suggested_code: normalize_name(name),
            })
            .collect();

        let amfi_ids: BTreeSet<u32> = amfi_by_id.keys().copied().collect();
        let extra_in_table = registry
            .all()
            .iter()
            .copied()
            .filter(|amc| !amfi_ids.contains(&amc.id()))
            .collect();

        SyncReport {
            source_url: source_url.to_string(),
            checked_at: Utc::now(),
            amfi_count: amfi_by_id.len(),
            table_count: registry.count(),
            missing_in_table,
            extra_in_table,
        }
    }

    /// True when every AMFI id is present in the table
    pub fn is_in_sync(&self) -> bool {
        self.missing_in_table.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "AMFI: {} AMCs, table: {} AMCs, missing: {}, possibly defunct: {}",
            self.amfi_count,
            self.table_count,
            self.missing_in_table.len(),
            self.extra_in_table.len()
        )
    }

    /// Human-readable report, one item per line
    pub fn render(&self) -> String {
        let mut lines = vec![self.summary()];

        if !self.missing_in_table.is_empty() {
            lines.push("AMCs present in AMFI but missing in table:".to_string());
            for missing in &self.missing_in_table {
                lines.push(format!(
                    "  - {} (ID: {}) -> {}",
                    missing.name, missing.id, missing.suggested_code
                ));
            }
        }

        if !self.extra_in_table.is_empty() {
            lines.push("Note: AMCs in table but not in AMFI (possibly defunct):".to_string());
            for amc in &self.extra_in_table {
                lines.push(format!("  - {} (ID: {})", amc.code(), amc.id()));
            }
        }

        lines.join("\n")
    }
}

// ============================================================================
// AMFI CLIENT
// ============================================================================

/// Blocking HTTP client for the AMFI NAV download page
#[cfg(feature = "sync")]
pub struct AmfiClient {
    client: reqwest::blocking::Client,
    url: String,
}

#[cfg(feature = "sync")]
impl AmfiClient {
    pub fn new() -> Result<Self> {
        Self::with_url(AMFI_NAV_URL)
    }

    pub fn with_url(url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mfsignal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(AmfiClient {
            client,
            url: url.to_string(),
        })
    }

    /// HTTP status of the NAV download page
    pub fn check_endpoint(&self) -> Result<u16> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("GET {} failed", self.url))?;
        Ok(response.status().as_u16())
    }

    pub fn fetch_page(&self) -> Result<String> {
        log::info!("fetching {}", self.url);

        self.client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .with_context(|| format!("GET {} failed", self.url))
    }

    pub fn fetch_amc_list(&self) -> Result<Vec<AmfiEntry>> {
        let html = self.fetch_page()?;
        extract_amc_list(&html)
    }

    /// Fetch AMFI's list and compare it with the registry
    pub fn check(&self, registry: &AmcRegistry) -> Result<SyncReport> {
        let amfi = self.fetch_amc_list()?;
        Ok(SyncReport::compare(registry, &amfi, &self.url))
    }
}

// ============================================================================
// TESTS
// ============================================================================
