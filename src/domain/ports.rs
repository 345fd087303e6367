use crate::domain::model::{Balance, ReverseKind, ReverseWhoisResult, WhoisRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where `path` ends up, for reporting.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn output_path(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn page_confirm_threshold(&self) -> u32;
}

/// Blocking yes/no question put to the operator. Anything but an explicit
/// yes, including EOF, is a no.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Remote WHOIS source.
#[async_trait]
pub trait WhoisSource: Send + Sync {
    async fn get_balance(&self) -> Result<Balance>;

    async fn whois(&self, domain: &str) -> Result<WhoisRecord>;

    async fn whois_history(&self, domain: &str) -> Result<Vec<WhoisRecord>>;

    /// Paginated reverse lookup; `confirmer` gates long page runs.
    async fn reverse_whois_by(
        &self,
        kind: ReverseKind,
        value: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<ReverseWhoisResult>;
}
