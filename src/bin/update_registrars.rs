use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use whois_pivot::core::registrars::{parse_iana_registry, RegistrarList, IANA_REGISTRARS_URL};
use whois_pivot::utils::logger::{self, Verbosity};

#[derive(Parser)]
#[command(name = "update-registrars")]
#[command(about = "Refresh the registrar list from the IANA registrar-ids registry")]
struct Args {
    /// Registry to download
    #[arg(long, default_value = IANA_REGISTRARS_URL)]
    url: String,

    /// Where to write the list, one registrar per line (defaults to the
    /// config directory, where discovery runs pick it up)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(Verbosity::from_flags(true, args.verbose), false);

    let output = match args.output {
        Some(path) => path,
        None => RegistrarList::refreshed_path()
            .context("No config directory on this system, pass --output")?,
    };

    tracing::info!("Downloading list of registrars from {}", args.url);
    let response = reqwest::get(&args.url)
        .await
        .with_context(|| format!("Failed to reach {}", args.url))?;

    if !response.status().is_success() {
        bail!("Error while retrieving registrars: HTTP {}", response.status());
    }

    let xml = response.text().await.context("Failed to read registry body")?;

    tracing::info!("Parsing registrars");
    let registrars = parse_iana_registry(&xml);
    if registrars.is_empty() {
        bail!("No registrar records found in {}", args.url);
    }
    tracing::info!("{} total registrars", registrars.len());

    tracing::info!("Writing to file {}", output.display());
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut content = registrars.join("\n");
    content.push('\n');
    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ {} registrars written to {}",
        registrars.len(),
        output.display()
    );
    Ok(())
}
