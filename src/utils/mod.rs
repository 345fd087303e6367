pub mod colors;
pub mod error;
pub mod logger;
pub mod validation;
