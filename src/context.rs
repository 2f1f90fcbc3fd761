use crate::api::Backend;
use crate::db::Database;
use crate::error::ClientError;
use crate::notify::Notifier;
use crate::store::Store;

/// The collaborators every flow needs, borrowed for one command or one screen.
/// The store is passed alongside so flows can mutate it while these stay shared.
pub struct Services<'a> {
    pub backend: &'a dyn Backend,
    pub db: &'a Database,
    pub notifier: &'a dyn Notifier,
}

impl<'a> Services<'a> {
    pub fn new(backend: &'a dyn Backend, db: &'a Database, notifier: &'a dyn Notifier) -> Self {
        Self {
            backend,
            db,
            notifier,
        }
    }

    /// Writes the whitelisted slices of `store` to disk.
    pub fn persist(&self, store: &Store) -> Result<(), ClientError> {
        self.db.save_state(&store.persisted())?;
        Ok(())
    }

    /// Turns a failed step into an error notification and hands the error back.
    pub fn report<T>(&self, operation: &str, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(e) = &result {
            if e.is_validation() {
                tracing::debug!(operation, error = %e, "rejected before sending");
            } else {
                tracing::warn!(operation, error = %e, "operation failed");
            }
            self.notifier.error(&e.to_string());
        }
        result
    }
}
