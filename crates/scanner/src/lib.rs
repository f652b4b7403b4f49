//! Cedge scanner: walks a root and keeps the registry and ledgers current
//!
//! - [`Config`]: paths and settings for one root
//! - [`IgnoreRules`]: `.cedgeignore` / `.gitignore` / config patterns
//! - [`Scanner`]: `register` and `scan`
//! - [`History`]: read-only revision lookups for one tracked file
//! - [`Registrar`]: optional hook for an external identifier registrar

pub mod config;
pub mod error;
pub mod history;
pub mod ignore;
pub mod registrar;
pub mod scan;

pub use config::{Config, CONFIG_FILE, STATE_DIR};
pub use error::{ConfigError, HistoryError, ScanError};
pub use history::History;
pub use self::ignore::{IgnoreConfig, IgnoreRules, IGNORE_FILE};
pub use registrar::{MemoryRegistrar, Registrar, Registration, RegistrationError};
pub use scan::{Conflict, ScanReport, Scanner, SkipReason, Skipped};
