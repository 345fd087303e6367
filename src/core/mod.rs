pub mod client;
pub mod filter;
pub mod registrars;
pub mod resolver;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_doubles;

pub use crate::domain::model::{Balance, Discoveries, ReverseKind, WhoisRecord};
pub use crate::domain::ports::{ConfigProvider, Confirmer, Storage, WhoisSource};
pub use crate::utils::error::Result;
