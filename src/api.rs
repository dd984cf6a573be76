/// Synchronous client for the **openFDA drug-label search API**.
///
/// This module wraps the `drug/label.json` endpoint and returns results as
/// tidy `models::LabelRow` rows. Pagination is handled automatically via
/// `skip`/`limit` query parameters; the API caps a single request at 99
/// records, so larger result sets are collected over several requests with a
/// fixed delay in between to avoid overloading the service.
///
/// ### Notes
/// - One initial request reads `meta.results.total`; the number of follow-up
///   requests is derived from it by integer division.
/// - There is deliberately no retry or backoff: a failed request surfaces as
///   an error immediately.
/// - Network timeouts use a sane default (30s) and can be adjusted by editing
///   the client builder.
///
/// Typical usage:
/// ```no_run
/// # use fdl_rs::Client;
/// let client = Client::default();
/// let rows = client.fetch("AstraZeneca")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
use crate::models::{LabelRow, SearchPage};
use anyhow::{Context, Result, bail};
use log::info;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// Maximum number of records the API returns per request.
pub const PAGE_LIMIT: u32 = 99;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    /// Pause before every full-page request.
    pub page_delay: Duration,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("fdl_rs/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: "https://api.fda.gov/drug/label.json".into(),
            page_delay: Duration::from_secs(5),
            http,
        }
    }
}

// Allow -, _, . unescaped in search phrases (common in manufacturer names)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

/// How many requests are needed to page through `total` records given the
/// 99-record cap: full pages plus one trailing partial request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub full_requests: u32,
    pub last_size: u32,
}

impl PagePlan {
    pub fn for_total(total: u32) -> Self {
        Self {
            full_requests: total / PAGE_LIMIT,
            last_size: total % PAGE_LIMIT,
        }
    }
}

impl Client {
    /// Same as `Client::default()` but with a custom inter-request delay.
    pub fn with_page_delay(page_delay: Duration) -> Self {
        Self {
            page_delay,
            ..Self::default()
        }
    }

    /// Search URL matching labels whose vendor block names `manufacturer`
    /// (exact phrase match).
    pub fn search_url(&self, manufacturer: &str) -> String {
        format!(
            "{}?search=openfda.manufacturer_name:{}",
            self.base_url,
            enc(&format!("\"{}\"", manufacturer))
        )
    }

    /// Number of records the search matches, from `meta.results.total`.
    pub fn result_count(&self, manufacturer: &str) -> Result<u32> {
        let url = self.search_url(manufacturer);
        let v = self.get_json(&url)?;
        v.pointer("/meta/results/total")
            .and_then(Value::as_u64)
            .map(|n| n as u32)
            .context("response has no meta.results.total")
    }

    /// Fetch every record the search matches and extract one tidy row per
    /// usable record, concatenated in request order.
    ///
    /// ### Errors
    /// - Network/HTTP error (no retry)
    /// - JSON decoding error
    /// - API-level error payload (surfaced as an error)
    /// - Schema error in a record that is not skippable
    pub fn fetch(&self, manufacturer: &str) -> Result<Vec<LabelRow>> {
        if manufacturer.trim().is_empty() {
            bail!("manufacturer name required");
        }
        let url = self.search_url(manufacturer);
        let total = self.result_count(manufacturer)?;
        let plan = PagePlan::for_total(total);

        let mut out: Vec<LabelRow> = Vec::with_capacity(total as usize);
        for req in 0..plan.full_requests {
            std::thread::sleep(self.page_delay);
            let start = req * PAGE_LIMIT;
            info!("collecting {} to {} of {}", start, start + PAGE_LIMIT, total);
            let page = self.get_page(&url, start, PAGE_LIMIT)?;
            out.extend(page.rows()?);
        }
        if plan.last_size != 0 {
            let start = total - plan.last_size;
            info!("collecting {} to {} of {}", start, total, total);
            let page = self.get_page(&url, start, plan.last_size)?;
            out.extend(page.rows()?);
        }
        Ok(out)
    }

    fn get_page(&self, url: &str, skip: u32, limit: u32) -> Result<SearchPage> {
        let page_url = format!("{}&skip={}&limit={}", url, skip, limit);
        let v = self.get_json(&page_url)?;
        serde_json::from_value(v).context("parse search page")
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("GET {}", url))?;
        if !resp.status().is_success() {
            bail!("request failed with HTTP {} for {}", resp.status(), url);
        }
        let v: Value = resp.json().with_context(|| format!("decode json from {}", url))?;

        // Error responses carry an "error" object instead of meta/results.
        if let Some(err) = v.get("error") {
            bail!("openFDA api error: {}", err);
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_plan_splits_total_into_cap_sized_requests() {
        assert_eq!(
            PagePlan::for_total(43),
            PagePlan {
                full_requests: 0,
                last_size: 43
            }
        );
        assert_eq!(
            PagePlan::for_total(99),
            PagePlan {
                full_requests: 1,
                last_size: 0
            }
        );
        assert_eq!(
            PagePlan::for_total(250),
            PagePlan {
                full_requests: 2,
                last_size: 52
            }
        );
        for total in [0u32, 1, 43, 98, 99, 100, 250, 9801] {
            let plan = PagePlan::for_total(total);
            assert_eq!(plan.full_requests * PAGE_LIMIT + plan.last_size, total);
        }
    }

    #[test]
    fn search_url_quotes_and_encodes_the_phrase() {
        let cli = Client::default();
        let url = cli.search_url("AstraZeneca");
        assert_eq!(
            url,
            "https://api.fda.gov/drug/label.json?search=openfda.manufacturer_name:%22AstraZeneca%22"
        );
        assert!(cli.search_url("Eli Lilly").contains("%22Eli%20Lilly%22"));
    }
}
