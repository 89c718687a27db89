// Service exports
pub mod loader;

pub use loader::{LoaderError, MatchLogLoader, REQUIRED_COLUMNS};
