use crate::core::{Confirmer, ConfigProvider, WhoisSource};
use crate::domain::model::{
    Balance, ReverseKind, ReverseWhoisPage, ReverseWhoisResult, WhoisHistory, WhoisRecord,
};
use crate::utils::error::{PivotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PAGE_CONFIRM_THRESHOLD: u32 = 5;

/// Client for the Whoxy WHOIS API. Holds connection settings only.
#[derive(Debug, Clone)]
pub struct WhoxyClient {
    client: Client,
    url: String,
    api_key: String,
    page_confirm_threshold: u32,
}

impl WhoxyClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            page_confirm_threshold: DEFAULT_PAGE_CONFIRM_THRESHOLD,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(
            Self::with_timeout(config.api_url(), config.api_key(), config.request_timeout())?
                .with_page_confirm_threshold(config.page_confirm_threshold()),
        )
    }

    /// Reverse lookups spanning more pages than this ask before fetching the rest.
    pub fn with_page_confirm_threshold(mut self, threshold: u32) -> Self {
        self.page_confirm_threshold = threshold;
        self
    }

    async fn request<T: DeserializeOwned>(&self, params: &[(&str, String)]) -> Result<T> {
        tracing::debug!("Whoxy request {:?}", params);

        let response = self
            .client
            .get(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let data: Value = response.json().await?;
        check_status(&data)?;

        Ok(serde_json::from_value(data)?)
    }

    async fn reverse_page(
        &self,
        kind: ReverseKind,
        value: &str,
        page: u32,
    ) -> Result<ReverseWhoisPage> {
        self.request(&[
            ("reverse", "whois".to_string()),
            (kind.param(), value.to_string()),
            ("page", page.to_string()),
        ])
        .await
    }
}

/// `status` 0 marks a logical failure; `status_reason` says why.
fn check_status(data: &Value) -> Result<()> {
    let status = data.get("status").and_then(|s| match s {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    match status {
        Some(0) => Err(PivotError::ApiError {
            reason: data
                .get("status_reason")
                .and_then(Value::as_str)
                .unwrap_or("no reason given")
                .to_string(),
        }),
        Some(_) => Ok(()),
        None => Err(PivotError::ApiError {
            reason: "response carried no status field".to_string(),
        }),
    }
}

#[async_trait]
impl WhoisSource for WhoxyClient {
    async fn get_balance(&self) -> Result<Balance> {
        tracing::debug!("Requesting account balance");
        self.request(&[("account", "balance".to_string())]).await
    }

    async fn whois(&self, domain: &str) -> Result<WhoisRecord> {
        tracing::debug!("Requesting Whois data for {}", domain);
        self.request(&[("whois", domain.to_string())]).await
    }

    async fn whois_history(&self, domain: &str) -> Result<Vec<WhoisRecord>> {
        tracing::debug!("Requesting historical Whois data for {}", domain);
        let history: WhoisHistory = self.request(&[("history", domain.to_string())]).await?;
        Ok(history.whois_records)
    }

    async fn reverse_whois_by(
        &self,
        kind: ReverseKind,
        value: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<ReverseWhoisResult> {
        tracing::debug!("Requesting Reverse Whois data for {} \"{}\"", kind, value);

        let first = self.reverse_page(kind, value, 1).await?;
        let total_pages = first.total_pages.max(1);
        let mut result = ReverseWhoisResult {
            total_pages,
            pages_fetched: 1,
            search_result: first.search_result,
        };

        if total_pages > self.page_confirm_threshold {
            let prompt = format!(
                "The current lookup would result in {} API queries, continue?",
                total_pages - 1
            );
            if !confirmer.confirm(&prompt).await {
                tracing::info!(
                    "Keeping page 1 of {} for {} \"{}\"",
                    total_pages,
                    kind,
                    value
                );
                return Ok(result);
            }
        }

        for page in 2..=total_pages {
            match self.reverse_page(kind, value, page).await {
                Ok(data) => {
                    result.search_result.extend(data.search_result);
                    result.pages_fetched = page;
                }
                Err(source) => {
                    return Err(PivotError::PaginationError {
                        page,
                        total_pages,
                        partial: result.search_result,
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(result)
    }
}
