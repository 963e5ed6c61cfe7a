//! # Bootstrap: one backend handle and a readiness signal
//!
//! The launcher builds a single [`RestBackend`] from [`AppConfig`] and hands it to
//! every view through context; nothing reads it from a global. While the stored
//! session is being restored the [`ReadySignal`] stays low; controllers that must
//! not run before that (the dashboard, the production board) call
//! [`wait_until_ready`], which polls the signal on a fixed interval and gives up
//! after a bounded number of attempts. This is the only explicit timeout in the
//! app.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use store::config::BootstrapConfig;
use store::{AppConfig, RestBackend};
use thiserror::Error;

use crate::timer::sleep;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("Backend is not configured: set [backend] url and anon_key")]
    NotConfigured,

    #[error("Backend not ready after {attempts} attempts")]
    Timeout { attempts: u32 },
}

/// Build the backend handle. Fails when the config lacks a URL or key.
pub fn connect(config: &AppConfig) -> Result<RestBackend, BootstrapError> {
    if !config.backend.is_configured() {
        return Err(BootstrapError::NotConfigured);
    }
    tracing::info!(url = %config.backend.url, "Connecting to backend");
    Ok(RestBackend::new(config.backend.clone()))
}

/// Process-wide "backend is ready" flag, set once.
#[derive(Clone, Debug, Default)]
pub struct ReadySignal(Arc<AtomicBool>);

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// [`wait_until_ready`] with the configured interval and ceiling.
    pub async fn wait(&self, config: &BootstrapConfig) -> Result<u32, BootstrapError> {
        wait_until_ready(
            || self.is_ready(),
            Duration::from_millis(u64::from(config.poll_interval_ms)),
            config.max_attempts,
        )
        .await
    }
}

/// Poll `check` every `interval`, at most `max_attempts` times.
///
/// Returns the attempt on which the check passed.
pub async fn wait_until_ready(
    check: impl Fn() -> bool,
    interval: Duration,
    max_attempts: u32,
) -> Result<u32, BootstrapError> {
    for attempt in 1..=max_attempts {
        if check() {
            return Ok(attempt);
        }
        if attempt < max_attempts {
            sleep(interval).await;
        }
    }
    tracing::error!(max_attempts, "Backend readiness wait timed out");
    Err(BootstrapError::Timeout {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[tokio::test]
    async fn test_ready_after_a_few_polls() {
        let polls = AtomicU32::new(0);
        let attempt = wait_until_ready(
            || polls.fetch_add(1, Ordering::SeqCst) >= 2,
            Duration::from_millis(1),
            10,
        )
        .await
        .unwrap();
        assert_eq!(attempt, 3);
    }

    #[tokio::test]
    async fn test_times_out_at_ceiling() {
        let polls = AtomicU32::new(0);
        let err = wait_until_ready(
            || {
                polls.fetch_add(1, Ordering::SeqCst);
                false
            },
            Duration::from_millis(1),
            4,
        )
        .await
        .unwrap_err();
        assert_eq!(err, BootstrapError::Timeout { attempts: 4 });
        assert_eq!(polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_signal_wait() {
        let signal = ReadySignal::new();
        let flipper = signal.clone();
        let config = BootstrapConfig {
            poll_interval_ms: 2,
            max_attempts: 50,
        };
        let (result, _) = tokio::join!(signal.wait(&config), async move {
            sleep(Duration::from_millis(5)).await;
            flipper.mark_ready();
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_connect_requires_configuration() {
        assert!(matches!(
            connect(&AppConfig::default()),
            Err(BootstrapError::NotConfigured)
        ));
        let config = AppConfig::default()
            .with_backend_overrides(Some("https://demo.example.co"), Some("anon"));
        assert!(connect(&config).is_ok());
    }
}
