pub mod config;
pub mod converter;
pub mod error;
pub mod schema;

pub use converter::{Callback, Converter};
pub use error::EngineError;
