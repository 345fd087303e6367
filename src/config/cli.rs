use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).display().to_string()
    }
}

/// `y` or `yes`, in any case. Everything else declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(feature = "cli")]
pub use console_confirmer::ConsoleConfirmer;

#[cfg(feature = "cli")]
mod console_confirmer {
    use super::is_affirmative;
    use crate::core::Confirmer;
    use async_trait::async_trait;
    use dialoguer::{theme::ColorfulTheme, Confirm};
    use std::io::{self, BufRead, IsTerminal, Write};
    use tokio_util::sync::CancellationToken;

    /// Asks on the terminal. A Ctrl+C typed at the prompt cancels `interrupt`.
    #[derive(Debug, Clone)]
    pub struct ConsoleConfirmer {
        interrupt: CancellationToken,
    }

    impl ConsoleConfirmer {
        pub fn new(interrupt: CancellationToken) -> Self {
            Self { interrupt }
        }
    }

    #[async_trait]
    impl Confirmer for ConsoleConfirmer {
        async fn confirm(&self, prompt: &str) -> bool {
            let prompt = prompt.to_string();

            // 阻塞讀取放在 blocking 執行緒，讓中斷信號仍可被處理
            match tokio::task::spawn_blocking(move || ask(&prompt)).await {
                Ok(Ok(decision)) => decision,
                Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => {
                    self.interrupt.cancel();
                    false
                }
                Ok(Err(e)) => {
                    tracing::debug!("Prompt failed, treating as no: {}", e);
                    false
                }
                Err(e) => {
                    tracing::debug!("Prompt task failed, treating as no: {}", e);
                    false
                }
            }
        }
    }

    fn ask(prompt: &str) -> io::Result<bool> {
        if io::stdin().is_terminal() {
            return Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact_opt()
                .map(|answer| answer.unwrap_or(false))
                .map_err(|err| match err {
                    dialoguer::Error::IO(e) => e,
                });
        }

        let mut stdout = io::stdout();
        write!(stdout, "{} (y/N) ", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        Ok(is_affirmative(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("YES\n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yep"));
    }

    #[tokio::test]
    async fn test_local_storage_writes_under_base_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("out").display().to_string());

        storage
            .write_file("example.com-domains.txt", b"example.com\n")
            .await
            .unwrap();

        let written = std::fs::read_to_string(storage.location("example.com-domains.txt")).unwrap();
        assert_eq!(written, "example.com\n");
    }
}
