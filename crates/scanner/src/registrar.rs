//! Hook for an external identifier registrar
//!
//! The scanner reports every new or advanced revision to an optional
//! [`Registrar`]. Nothing here performs network I/O; callers that talk to a
//! coordinating host implement the trait themselves.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Revision announced to the registrar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration<'a> {
    /// `full_uuid` of the revision
    pub uuid: &'a str,
    pub project: &'a str,
    pub host_node: &'a str,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Identifier already bound to another project
    #[error("{uuid} is already registered to project {existing_project} (requested by {requested_project})")]
    Conflict {
        uuid: String,
        existing_project: String,
        requested_project: String,
    },

    #[error("registrar unavailable: {0}")]
    Unavailable(String),
}

/// Validates global identifier uniqueness
pub trait Registrar {
    fn register(&self, registration: &Registration<'_>) -> Result<(), RegistrationError>;
}

/// In-process registrar binding each uuid to the first project that claims it
#[derive(Debug, Default)]
pub struct MemoryRegistrar {
    owners: Mutex<HashMap<String, String>>,
}

impl MemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.owners.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Registrar for MemoryRegistrar {
    fn register(&self, registration: &Registration<'_>) -> Result<(), RegistrationError> {
        let mut owners = self
            .owners
            .lock()
            .map_err(|_| RegistrationError::Unavailable("registrar state poisoned".into()))?;

        match owners.get(registration.uuid) {
            Some(existing) if existing != registration.project => Err(RegistrationError::Conflict {
                uuid: registration.uuid.to_string(),
                existing_project: existing.clone(),
                requested_project: registration.project.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                owners.insert(registration.uuid.to_string(), registration.project.to_string());
                Ok(())
            }
        }
    }
}
