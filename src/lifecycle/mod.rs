//! Host lifecycle synchronisation.
//!
//! After a target is promoted, the host unit loaded from it is restarted when
//! the host already knows it and started otherwise. The host is the source of
//! truth: `exists` always asks it, nothing is cached.
//!
//! Lifecycle failures never fail a build. The artifacts are already in place
//! and the caller only reports the error.

mod client;
mod types;

use std::future::Future;

use thiserror::Error;

pub use client::LifecycleClient;
pub use types::{ActionOutcome, RestartAll, SyncAction};

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Connection refused, reset, timed out.
    #[error("no response from lifecycle api: {0}")]
    NoResponse(#[source] reqwest::Error),

    /// Any non-2xx answer.
    #[error("lifecycle api returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be built or the answer not decoded.
    #[error("lifecycle request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl LifecycleError {
    /// Sort a transport error from `send()`.
    fn classify(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err)
        } else {
            Self::NoResponse(err)
        }
    }
}

/// Operations of the host's lifecycle API.
pub trait LifecycleApi: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<String>, LifecycleError>> + Send;

    fn restart(&self, name: &str) -> impl Future<Output = Result<ActionOutcome, LifecycleError>> + Send;

    fn start(&self, name: &str) -> impl Future<Output = Result<ActionOutcome, LifecycleError>> + Send;

    fn restart_all(&self) -> impl Future<Output = Result<RestartAll, LifecycleError>> + Send;

    fn exists(&self, name: &str) -> impl Future<Output = Result<bool, LifecycleError>> + Send {
        async move { Ok(self.list().await?.iter().any(|unit| unit == name)) }
    }
}

/// Restart `name` if the host runs it, start it otherwise.
pub async fn sync_unit<A: LifecycleApi>(
    api: &A,
    name: &str,
) -> Result<(SyncAction, ActionOutcome), LifecycleError> {
    if api.exists(name).await? {
        Ok((SyncAction::Restarted, api.restart(name).await?))
    } else {
        Ok((SyncAction::Started, api.start(name).await?))
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory lifecycle API recording every call.

    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    pub struct FakeApi {
        pub units: Mutex<Vec<String>>,
        pub calls: Mutex<Vec<String>>,
        /// Status returned by `restart` and `start`, 200 when unset.
        pub fail_status: Option<u16>,
    }

    impl FakeApi {
        pub fn with_units(units: &[&str]) -> Self {
            Self {
                units: Mutex::new(units.iter().map(|s| s.to_string()).collect()),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn action(&self, verb: &str, name: &str) -> Result<ActionOutcome, LifecycleError> {
            self.calls.lock().push(format!("{verb} {name}"));
            if let Some(status) = self.fail_status {
                return Err(LifecycleError::Status {
                    status,
                    body: "failed".into(),
                });
            }
            Ok(ActionOutcome {
                success: true,
                resource: Some(name.to_string()),
                message: verb.to_string(),
            })
        }
    }

    impl LifecycleApi for FakeApi {
        async fn list(&self) -> Result<Vec<String>, LifecycleError> {
            self.calls.lock().push("list".into());
            Ok(self.units.lock().clone())
        }

        async fn restart(&self, name: &str) -> Result<ActionOutcome, LifecycleError> {
            self.action("restart", name)
        }

        async fn start(&self, name: &str) -> Result<ActionOutcome, LifecycleError> {
            let outcome = self.action("start", name)?;
            self.units.lock().push(name.to_string());
            Ok(outcome)
        }

        async fn restart_all(&self) -> Result<RestartAll, LifecycleError> {
            self.calls.lock().push("restart_all".into());
            Ok(RestartAll {
                success: true,
                ..Default::default()
            })
        }
    }
}
