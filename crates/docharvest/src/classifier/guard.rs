//! Time-bounded, failure-absorbing wrapper around a classifier.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use log::{debug, warn};

use super::{EmailCategory, EmailClassifier};

/// Runs the wrapped classifier on a helper thread and waits at most
/// `timeout` for its answer. Errors, timeouts and panics all yield `None`.
#[derive(Clone)]
pub struct GuardedClassifier {
    inner: Arc<dyn EmailClassifier>,
    timeout: Duration,
}

impl GuardedClassifier {
    pub fn new(inner: Arc<dyn EmailClassifier>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn classify(&self, text: &str) -> Option<EmailCategory> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();

        let spawned = thread::Builder::new()
            .name("email-classifier".to_string())
            .spawn(move || {
                // Receiver may have given up already.
                let _ = tx.send(inner.classify(&text));
            });

        if let Err(e) = spawned {
            warn!("Could not start classifier thread: {}", e);
            return None;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(category)) => {
                debug!("Email classified as '{}'", category);
                Some(category)
            }
            Ok(Err(e)) => {
                debug!("Email classification skipped: {}", e);
                None
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Email classification timed out after {:?}, continuing without category",
                    self.timeout
                );
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Email classifier exited without an answer, continuing without category");
                None
            }
        }
    }
}
