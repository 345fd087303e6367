use crate::core::Storage;
use crate::domain::model::{Discoveries, EntitySet};
use crate::utils::error::Result;
use colored::Colorize;

/// Writes result sets as `{basename}-{kind}.txt` artifacts and prints the
/// end-of-run summary.
pub struct ResultSink<S: Storage> {
    storage: S,
}

impl<S: Storage> ResultSink<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes every non-empty set, one sorted entry per line. Returns the
    /// locations written.
    pub async fn persist(&self, basename: &str, results: &Discoveries) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for (kind, set) in [
            ("domains", &results.domains),
            ("companies", &results.companies),
            ("emails", &results.emails),
        ] {
            if set.is_empty() {
                continue;
            }

            let filename = artifact_name(basename, kind);
            tracing::debug!("Writing {} ({} entries)", filename, set.len());
            self.storage
                .write_file(&filename, render_lines(set).as_bytes())
                .await?;
            written.push(self.storage.location(&filename));
        }

        Ok(written)
    }

    pub fn print_summary(&self, results: &Discoveries) {
        println!("{}", render_summary(results));
    }
}

pub fn artifact_name(basename: &str, kind: &str) -> String {
    format!("{}-{}.txt", basename, kind)
}

fn render_lines(set: &EntitySet) -> String {
    let mut out = set.sorted().join("\n");
    out.push('\n');
    out
}

pub fn render_summary(results: &Discoveries) -> String {
    let mut out = String::from("\n");

    if !results.companies.is_empty() {
        out.push_str(&format!("{}\n\n", "Companies:".yellow()));
        out.push_str(&render_lines(&results.companies));
        out.push('\n');
    }

    if !results.emails.is_empty() {
        out.push_str(&format!("{}\n\n", "Emails:".yellow()));
        out.push_str(&render_lines(&results.emails));
        out.push('\n');
    }

    out.push_str(&format!("{}\n\n", "Domains:".green()));
    out.push_str(&render_lines(&results.domains));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_doubles::MockStorage;

    fn discoveries() -> Discoveries {
        Discoveries {
            domains: ["b.com", "a.com"].into_iter().collect(),
            companies: ["Acme"].into_iter().collect(),
            emails: EntitySet::new(),
        }
    }

    #[tokio::test]
    async fn test_persist_writes_non_empty_sets_sorted() {
        let storage = MockStorage::default();
        let sink = ResultSink::new(storage.clone());

        let written = sink.persist("example.com", &discoveries()).await.unwrap();

        assert_eq!(
            written,
            vec![
                "mem://example.com-domains.txt".to_string(),
                "mem://example.com-companies.txt".to_string()
            ]
        );
        assert_eq!(storage.len().await, 2);
        assert_eq!(
            storage.get_file("example.com-domains.txt").await.unwrap(),
            "a.com\nb.com\n"
        );
        assert_eq!(
            storage.get_file("example.com-companies.txt").await.unwrap(),
            "Acme\n"
        );
        assert!(storage.get_file("example.com-emails.txt").await.is_none());
    }

    #[tokio::test]
    async fn test_persist_nothing_when_empty() {
        let storage = MockStorage::default();
        let sink = ResultSink::new(storage.clone());

        let written = sink
            .persist("example.com", &Discoveries::default())
            .await
            .unwrap();

        assert!(written.is_empty());
        assert_eq!(storage.len().await, 0);
    }

    #[test]
    fn test_summary_lists_domains_last() {
        let summary = render_summary(&discoveries());

        let companies = summary.find("Companies:").unwrap();
        let domains = summary.find("Domains:").unwrap();
        assert!(companies < domains);
        assert!(!summary.contains("Emails:"));
        assert!(summary.ends_with("a.com\nb.com\n"));
    }
}
