pub mod config;
pub mod error;
pub mod types;

pub use config::LeaderboardConfig;
pub use error::BrandLensError;
pub use types::*;
