use clap::Parser;
use tokio_util::sync::CancellationToken;
use whois_pivot::utils::logger::{self, Verbosity};
use whois_pivot::utils::validation::Validate;
use whois_pivot::{
    CliConfig, ConsoleConfirmer, LocalStorage, Outcome, PivotError, Resolver, ResultSink,
    Settings, TomlConfig, WhoxyClient,
};

const INTERRUPTED_EXIT_CODE: i32 = 130;

fn load_settings(cli: &CliConfig) -> whois_pivot::Result<Settings> {
    let file_config = match (&cli.config, TomlConfig::default_path()) {
        (Some(path), _) => TomlConfig::from_file(path)?,
        (None, Some(default_path)) => TomlConfig::load_or_init(&default_path)?,
        (None, None) => TomlConfig::default(),
    };

    Ok(cli.apply_to(Settings::from_toml(&file_config)))
}

fn exit_with(e: &PivotError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(Verbosity::from_flags(cli.verbose, cli.debug), cli.log_json);
    tracing::debug!("Seed domains: {:?}", cli.domains);

    // 載入並驗證配置
    let settings = load_settings(&cli).unwrap_or_else(|e| exit_with(&e));
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let registrars = settings.registrars().unwrap_or_else(|e| exit_with(&e));
    tracing::debug!("Loaded {} registrars", registrars.len());

    let client = WhoxyClient::from_config(&settings).unwrap_or_else(|e| exit_with(&e));

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let storage = LocalStorage::new(settings.output_path.clone());
    let mut resolver = Resolver::new(
        client,
        ConsoleConfirmer::new(cancel.clone()),
        ResultSink::new(storage),
        registrars,
    );

    tokio::select! {
        _ = cancel.cancelled() => std::process::exit(INTERRUPTED_EXIT_CODE),
        balance = resolver.balance() => {
            if let Err(e) = balance {
                exit_with(&e);
            }
        }
    }

    match resolver.resolve_all(&cli.domains, &cancel).await {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Interrupted) => std::process::exit(INTERRUPTED_EXIT_CODE),
        Err(e) => exit_with(&e),
    }
}
