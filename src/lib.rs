pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::ConsoleConfirmer, CliConfig};

pub use config::{cli::LocalStorage, settings::Settings, toml_config::TomlConfig};
pub use core::{
    client::WhoxyClient,
    registrars::RegistrarList,
    resolver::{Outcome, Resolver, RunState},
    sink::ResultSink,
};
pub use utils::error::{PivotError, Result};
