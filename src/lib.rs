pub mod collector;
pub mod config;
pub mod error;
pub mod local;
pub mod output;
pub mod version;

pub use error::Error;
