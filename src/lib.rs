//! Health Risk - health risk prediction service
//!
//! Serves a pre-trained classifier over HTTP. Ten activity, sleep and
//! air-quality readings go in; a risk code and its label (`Low`, `Medium`,
//! `High`) come out.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use health_risk::{Config, HealthInput, RiskClassifier, Result};
//!
//! fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     let classifier = RiskClassifier::load(&config.model)?;
//!     let prediction = classifier.assess(&HealthInput::example())?;
//!     println!("{} ({})", prediction.risk_level, prediction.risk_code);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod error;

// Prediction contract
pub mod features;
pub mod model;
pub mod risk;
pub mod service;

// API module (optional)
#[cfg(feature = "http-server")]
pub mod api;

// Re-export commonly used types
pub use config::{Config, DeploymentMode};
pub use error::{Error, ErrorKind, Result};
pub use features::{HealthInput, FEATURE_COUNT, FIELD_NAMES};
pub use model::{Classifier, ModelArtifact};
pub use risk::{RiskLevel, RISK_LABELS};
pub use service::{Prediction, RiskClassifier};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging; `RUST_LOG` wins over the mode's default filter
pub fn init_logging(mode: DeploymentMode) -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(mode.default_log_filter()))
        .try_init()
        .map_err(|e| Error::config(format!("Failed to initialize logger: {}", e)))?;
    log::info!("{} {} initialized ({:?} mode)", NAME, VERSION, mode);
    Ok(())
}
