//! Discovery engine: walks WHOIS history and reverse WHOIS results outward
//! from one or more seed domains.
//!
//! 1. Fetch the historical records of a domain.
//! 2. For every record, queue its domain name and its contacts' company and
//!    email address.
//! 3. A company or email passing the noise filters is put to the operator;
//!    if followed, its reverse WHOIS records go back to step 2.
//!
//! The walk is depth-first over an explicit stack and every identifier is
//! looked at once, so no remote call is ever issued twice for the same value.

use crate::core::filter::{self, Verdict};
use crate::core::registrars::RegistrarList;
use crate::core::sink::ResultSink;
use crate::core::{Confirmer, Storage, WhoisSource};
use crate::domain::model::{Balance, Discoveries, EntitySet, ReverseKind, WhoisRecord};
use crate::utils::colors::color_number;
use crate::utils::error::{PivotError, Result};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Finalizing,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Domain(String),
    Company(String),
    Email(String),
}

pub struct Resolver<W: WhoisSource, C: Confirmer, S: Storage> {
    source: W,
    confirmer: C,
    sink: ResultSink<S>,
    registrars: RegistrarList,
    seen_companies: EntitySet,
    seen_emails: EntitySet,
    results: Discoveries,
    seed_domains: Vec<String>,
    balance: Option<Balance>,
    state: RunState,
}

impl<W: WhoisSource, C: Confirmer, S: Storage> Resolver<W, C, S> {
    pub fn new(source: W, confirmer: C, sink: ResultSink<S>, registrars: RegistrarList) -> Self {
        Self {
            source,
            confirmer,
            sink,
            registrars,
            seen_companies: EntitySet::new(),
            seen_emails: EntitySet::new(),
            results: Discoveries::default(),
            seed_domains: Vec::new(),
            balance: None,
            state: RunState::Running,
        }
    }

    pub fn results(&self) -> &Discoveries {
        &self.results
    }

    pub fn seed_domains(&self) -> &[String] {
        &self.seed_domains
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn source(&self) -> &W {
        &self.source
    }

    pub fn confirmer(&self) -> &C {
        &self.confirmer
    }

    pub fn sink(&self) -> &ResultSink<S> {
        &self.sink
    }

    pub fn has_seen_company(&self, company: &str) -> bool {
        self.seen_companies.contains(company)
    }

    pub fn has_seen_email(&self, email: &str) -> bool {
        self.seen_emails.contains(email)
    }

    /// Account balance, fetched on first use and kept for the session.
    pub async fn balance(&mut self) -> Result<Balance> {
        if let Some(balance) = self.balance {
            return Ok(balance);
        }

        let balance = self.source.get_balance().await?;
        tracing::info!(
            "Balance: Live {}, History {}, Reverse {}",
            color_number(balance.live),
            color_number(balance.history),
            color_number(balance.reverse)
        );
        self.balance = Some(balance);
        Ok(balance)
    }

    /// Explores from `seed`, then writes the artifacts and prints the summary.
    pub async fn resolve(&mut self, seed: &str, cancel: &CancellationToken) -> Result<Outcome> {
        self.resolve_all(&[seed], cancel).await
    }

    /// Explores from every seed in turn, sharing what was already seen, then
    /// writes the artifacts and prints the summary once.
    ///
    /// The partial results are flushed on interrupt and on failure too.
    pub async fn resolve_all<T: AsRef<str>>(
        &mut self,
        seeds: &[T],
        cancel: &CancellationToken,
    ) -> Result<Outcome> {
        self.state = RunState::Running;
        tracing::info!("Starting discovery...");

        let mut walked = Ok(Outcome::Completed);
        for seed in seeds {
            let seed = seed.as_ref().trim();
            if seed.is_empty() {
                continue;
            }
            self.seed_domains.push(seed.to_string());

            walked = tokio::select! {
                biased;
                _ = cancel.cancelled() => Ok(Outcome::Interrupted),
                walked = self.walk(Step::Domain(seed.to_string()), cancel) => walked,
            };

            if !matches!(walked, Ok(Outcome::Completed)) {
                break;
            }
        }

        match walked {
            Ok(Outcome::Completed) => {
                tracing::info!("All done");
                self.finalize().await?;
                Ok(Outcome::Completed)
            }
            Ok(Outcome::Interrupted) => {
                tracing::error!("Detected interrupt, stopping");
                self.finalize().await?;
                Ok(Outcome::Interrupted)
            }
            Err(e) => {
                tracing::error!("Discovery aborted: {}", e);
                if let Err(flush_err) = self.finalize().await {
                    tracing::error!("Could not write partial results: {}", flush_err);
                }
                Err(e)
            }
        }
    }

    /// Artifact basename: the seeds of this session joined with `-`.
    pub fn basename(&self) -> String {
        self.seed_domains.join("-")
    }

    async fn finalize(&mut self) -> Result<()> {
        self.state = RunState::Finalizing;

        let basename = self.basename();
        tracing::info!("Writing output files");
        let written = self.sink.persist(&basename, &self.results).await;
        self.sink.print_summary(&self.results);

        self.state = RunState::Terminated;

        for location in written? {
            tracing::info!("Wrote {}", location);
        }
        Ok(())
    }

    async fn walk(&mut self, start: Step, cancel: &CancellationToken) -> Result<Outcome> {
        let mut stack = vec![start];

        while let Some(step) = stack.pop() {
            if cancel.is_cancelled() {
                return Ok(Outcome::Interrupted);
            }

            let records = match step {
                Step::Domain(domain) => self.resolve_domain(&domain).await?,
                Step::Company(company) => {
                    if !self.check_company(&company).is_accept() {
                        continue;
                    }
                    self.resolve_company(&company).await?
                }
                Step::Email(email) => {
                    if !self.check_email(&email).is_accept() {
                        continue;
                    }
                    self.resolve_email(&email).await?
                }
            };

            // reversed so the first record's steps come off the stack first
            let mut next = Vec::new();
            for record in &records {
                next.extend(self.parse_record(record));
            }
            stack.extend(next.into_iter().rev());
        }

        Ok(Outcome::Completed)
    }

    /// Follow-up steps for one record: its domain name first, then company
    /// and email of each contact in role order.
    fn parse_record(&self, record: &WhoisRecord) -> Vec<Step> {
        let mut steps = Vec::new();

        if let Some(domain) = record.domain() {
            if !self.results.domains.contains(domain) {
                steps.push(Step::Domain(domain.to_string()));
            }
        }

        for (role, contact) in record.contacts() {
            if let Some(company) = contact.company() {
                if !self.seen_companies.contains(company) {
                    tracing::trace!("{} contact company \"{}\"", role.as_str(), company);
                    steps.push(Step::Company(company.to_string()));
                }
            }
            if let Some(email) = contact.email() {
                if !self.seen_emails.contains(email) {
                    tracing::trace!("{} contact email \"{}\"", role.as_str(), email);
                    steps.push(Step::Email(email.to_string()));
                }
            }
        }

        steps
    }

    /// Runs `company` through the filters. Only the first call for a given
    /// company (compared case-insensitively) can return [`Verdict::Accept`].
    pub fn check_company(&mut self, company: &str) -> Verdict {
        if !self.seen_companies.insert(company) {
            return Verdict::Seen;
        }
        tracing::debug!("Checking company \"{}\"", company);

        let verdict = filter::screen_company(company, &self.registrars);
        match verdict {
            Verdict::Protected => tracing::debug!("Looks protected, skipping"),
            Verdict::Registrar => tracing::debug!("Looks to be a registrar, skipping"),
            _ => {}
        }
        verdict
    }

    /// Runs `email` through the filters. Only the first call for a given
    /// address (compared case-insensitively) can return [`Verdict::Accept`].
    pub fn check_email(&mut self, email: &str) -> Verdict {
        if !self.seen_emails.insert(email) {
            return Verdict::Seen;
        }
        tracing::debug!("Checking email {}", email);

        let verdict = filter::screen_email(email);
        match verdict {
            Verdict::Protected => tracing::debug!("Looks protected, skipping"),
            Verdict::MalformedEmail => tracing::debug!("Doesn't look like a valid email"),
            _ => {}
        }
        verdict
    }

    async fn resolve_domain(&mut self, domain: &str) -> Result<Vec<WhoisRecord>> {
        if !self.results.domains.insert(domain) {
            return Ok(Vec::new());
        }
        tracing::info!("New domain {}", domain);

        self.source.whois_history(domain).await
    }

    async fn resolve_company(&mut self, company: &str) -> Result<Vec<WhoisRecord>> {
        let prompt = format!("New company \"{}\", follow?", company);
        if !self.confirmer.confirm(&prompt).await {
            return Ok(Vec::new());
        }

        self.results.companies.insert(company);
        tracing::info!("Following company \"{}\"", company);
        self.reverse_lookup(ReverseKind::Company, company).await
    }

    async fn resolve_email(&mut self, email: &str) -> Result<Vec<WhoisRecord>> {
        let prompt = format!("New email \"{}\", follow?", email);
        if !self.confirmer.confirm(&prompt).await {
            return Ok(Vec::new());
        }

        self.results.emails.insert(email);
        tracing::info!("Following email {}", email);
        self.reverse_lookup(ReverseKind::Email, email).await
    }

    async fn reverse_lookup(&self, kind: ReverseKind, value: &str) -> Result<Vec<WhoisRecord>> {
        match self
            .source
            .reverse_whois_by(kind, value, &self.confirmer)
            .await
        {
            Ok(result) => {
                if !result.is_complete() {
                    tracing::warn!(
                        "Only {} of {} pages fetched for {} \"{}\"",
                        result.pages_fetched,
                        result.total_pages,
                        kind,
                        value
                    );
                }
                Ok(result.search_result)
            }
            Err(e @ PivotError::PaginationError { .. }) => {
                for domain in e.partial_records().iter().filter_map(WhoisRecord::domain) {
                    tracing::warn!("Unexplored domain from {} \"{}\": {}", kind, value, domain);
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
