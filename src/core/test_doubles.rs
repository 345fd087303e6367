//! In-memory stand-ins for the ports, shared by unit tests.

use crate::core::{Confirmer, Storage, WhoisSource};
use crate::domain::model::{Balance, ReverseKind, ReverseWhoisResult, WhoisRecord};
use crate::utils::error::{PivotError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub async fn get_file(&self, path: &str) -> Option<String> {
        let files = self.files.lock().await;
        files
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }
}

impl Storage for MockStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        format!("mem://{}", path)
    }
}

/// Answers prompts containing a registered needle, otherwise the default.
pub struct ScriptedConfirmer {
    default: bool,
    answers: Vec<(String, bool)>,
    prompts: StdMutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new(default: bool) -> Self {
        Self {
            default,
            answers: Vec::new(),
            prompts: StdMutex::new(Vec::new()),
        }
    }

    pub fn answer(mut self, needle: &str, decision: bool) -> Self {
        self.answers.push((needle.to_string(), decision));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, decision)| *decision)
            .unwrap_or(self.default)
    }
}

/// Canned WHOIS source that records every call it receives.
#[derive(Default)]
pub struct FakeSource {
    history: HashMap<String, Vec<WhoisRecord>>,
    reverse: HashMap<(&'static str, String), Vec<WhoisRecord>>,
    failing_reverse: HashMap<(&'static str, String), String>,
    interrupt_on: Option<(String, CancellationToken)>,
    calls: StdMutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, domain: &str, records: Vec<WhoisRecord>) -> Self {
        self.history.insert(domain.to_lowercase(), records);
        self
    }

    pub fn with_reverse(mut self, kind: ReverseKind, value: &str, records: Vec<WhoisRecord>) -> Self {
        self.reverse
            .insert((kind.param(), value.to_lowercase()), records);
        self
    }

    pub fn with_failing_reverse(mut self, kind: ReverseKind, value: &str, reason: &str) -> Self {
        self.failing_reverse
            .insert((kind.param(), value.to_lowercase()), reason.to_string());
        self
    }

    /// Cancels `token` when the history of `domain` is requested and never
    /// answers that request.
    pub fn interrupt_on_history(mut self, domain: &str, token: CancellationToken) -> Self {
        self.interrupt_on = Some((domain.to_lowercase(), token));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WhoisSource for FakeSource {
    async fn get_balance(&self) -> Result<Balance> {
        self.record("balance".to_string());
        Ok(Balance {
            live: 1000,
            history: 50,
            reverse: 5,
        })
    }

    async fn whois(&self, domain: &str) -> Result<WhoisRecord> {
        self.record(format!("whois:{}", domain));
        Ok(WhoisRecord::for_domain(domain))
    }

    async fn whois_history(&self, domain: &str) -> Result<Vec<WhoisRecord>> {
        self.record(format!("history:{}", domain));
        let key = domain.to_lowercase();

        if let Some((target, token)) = &self.interrupt_on {
            if *target == key {
                token.cancel();
                std::future::pending::<()>().await;
            }
        }

        Ok(self.history.get(&key).cloned().unwrap_or_default())
    }

    async fn reverse_whois_by(
        &self,
        kind: ReverseKind,
        value: &str,
        _confirmer: &dyn Confirmer,
    ) -> Result<ReverseWhoisResult> {
        self.record(format!("reverse:{}:{}", kind, value));
        let key = (kind.param(), value.to_lowercase());

        if let Some(reason) = self.failing_reverse.get(&key) {
            return Err(PivotError::ApiError {
                reason: reason.clone(),
            });
        }

        let records = self.reverse.get(&key).cloned().unwrap_or_default();
        Ok(ReverseWhoisResult {
            total_pages: 1,
            pages_fetched: 1,
            search_result: records,
        })
    }
}
