pub mod domain;
pub mod errors;
pub mod matcher;
pub mod parser;
pub mod ports;
pub mod services;

pub use errors::{CoreError, ImportError};
