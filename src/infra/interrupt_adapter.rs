use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::errors::{AppError, StorageError};

/// External abort signal for the manifest pipeline: an explicit abort flag
/// and an optional deadline. Checked between page fetches and object fetches,
/// and raced against in-flight storage requests through [`Cancellation::cancelled`].
#[derive(Debug, Clone)]
pub struct Cancellation {
    aborted: Arc<watch::Sender<bool>>,
    deadline: Option<Instant>,
}

impl Default for Cancellation {
    fn default() -> Self {
        Self {
            aborted: Arc::new(watch::Sender::new(false)),
            deadline: None,
        }
    }
}

fn interrupted() -> StorageError {
    StorageError::Cancelled("interrupted".to_string())
}

fn deadline_exceeded() -> StorageError {
    StorageError::Cancelled("deadline exceeded".to_string())
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn abort(&self) {
        self.aborted.send_replace(true);
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Cancelled`] once aborted or past the deadline.
    pub fn check(&self) -> Result<(), StorageError> {
        if *self.aborted.borrow() {
            return Err(interrupted());
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(deadline_exceeded());
            }
        }
        Ok(())
    }

    /// Resolves once the handle is aborted or its deadline passes, including
    /// when that already happened before the call. Never resolves otherwise.
    ///
    /// Needs a Tokio runtime with the time driver enabled when a deadline is set.
    pub async fn cancelled(&self) -> StorageError {
        let mut rx = self.aborted.subscribe();
        let aborted = async move {
            // The sender lives as long as `self`, so an error cannot happen here.
            if rx.wait_for(|aborted| *aborted).await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        match self.deadline {
            Some(deadline) => tokio::select! {
                () = aborted => interrupted(),
                () = tokio::time::sleep_until(deadline.into()) => deadline_exceeded(),
            },
            None => {
                aborted.await;
                interrupted()
            }
        }
    }
}

/// Abort `cancel` when the user presses Ctrl+C.
///
/// # Errors
///
/// Fails if a handler has already been installed for this process.
pub fn install_ctrlc(cancel: &Cancellation) -> Result<(), AppError> {
    let handle = cancel.clone();
    ctrlc::set_handler(move || handle.abort())?;
    Ok(())
}
