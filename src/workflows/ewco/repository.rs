use std::collections::BTreeMap;
use std::sync::Mutex;

use super::domain::{Application, ApplicationId};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn list(&self) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-memory store. Submissions live only for the lifetime of the
/// process.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: Mutex<BTreeMap<String, Application>>,
}

impl InMemoryRepository {
    fn records(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Application>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl ApplicationRepository for InMemoryRepository {
    fn insert(&self, application: Application) -> Result<(), RepositoryError> {
        let mut records = self.records()?;
        if records.contains_key(&application.id.0) {
            return Err(RepositoryError::Conflict);
        }
        records.insert(application.id.0.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.records()?.get(&id.0).cloned())
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.records()?.values().cloned().collect())
    }
}
