//! Periodic database liveness probe.
//!
//! The monitor pings the record store on a fixed period, keeps the latest
//! outcome in a watch channel for anyone rendering a status indicator, and
//! optionally raises user-facing notifications. A probe that resolves after
//! the monitor has been torn down is discarded without side effects.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::future::Future;
use tokio::sync::watch;

use crate::configuration::HealthCheckSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Checking,
    Healthy,
    Error,
}

/// The latest known state of the record store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessStatus {
    pub state: ConnectionState,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl LivenessStatus {
    fn initial() -> Self {
        Self {
            state: ConnectionState::Checking,
            last_checked_at: None,
        }
    }
}

/// The single store operation the monitor relies on.
pub trait Pinger: Send + Sync + 'static {
    fn ping(&self) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}

impl Pinger for PgPool {
    async fn ping(&self) -> Result<(), anyhow::Error> {
        sqlx::query("SELECT 1")
            .execute(self)
            .await
            .context("Failed to ping the database")?;
        Ok(())
    }
}

/// Boundary towards whatever renders user-visible notifications.
///
/// The monitor decides *when* to notify (per its policy flags); rendering is
/// somebody else's job.
pub trait Notifier: Send + Sync + 'static {
    fn connection_healthy(&self);
    fn connection_failed(&self);
}

/// Default notifier: emits the notification copy as log events.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn connection_healthy(&self) {
        tracing::info!("Database Status: connection is healthy");
    }

    fn connection_failed(&self) {
        tracing::warn!("Database Status: connection failed - attempting to reconnect");
    }
}

pub struct LivenessMonitor {
    status_rx: watch::Receiver<LivenessStatus>,
    shutdown_tx: watch::Sender<bool>,
}

impl LivenessMonitor {
    /// Starts probing in a background task. The first probe runs immediately,
    /// subsequent ones on every period tick. Probes never overlap: a slow
    /// ping delays the next tick instead of stacking on top of it.
    pub fn spawn<P, N>(pinger: P, notifier: N, settings: HealthCheckSettings) -> Self
    where
        P: Pinger,
        N: Notifier,
    {
        let (status_tx, status_rx) = watch::channel(LivenessStatus::initial());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(probe_loop(
            pinger,
            notifier,
            settings,
            status_tx,
            shutdown_rx,
        ));
        Self {
            status_rx,
            shutdown_tx,
        }
    }

    pub fn status(&self) -> LivenessStatus {
        *self.status_rx.borrow()
    }

    /// Hands out a receiver that can be polled (or awaited) for status
    /// changes, e.g. by the `/status` endpoint.
    pub fn subscribe(&self) -> watch::Receiver<LivenessStatus> {
        self.status_rx.clone()
    }

    /// Tears the probe down. Takes effect synchronously: a ping resolving
    /// after this call will not update the status, log, or notify.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for LivenessMonitor {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

async fn probe_loop<P, N>(
    pinger: P,
    notifier: N,
    settings: HealthCheckSettings,
    status_tx: watch::Sender<LivenessStatus>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    P: Pinger,
    N: Notifier,
{
    // The first tick completes immediately, i.e. we probe once on startup.
    let mut ticker = tokio::time::interval(settings.period());
    tracing::info!(
        period_seconds = settings.period_seconds,
        "database liveness probe started"
    );
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.changed() => break,
        }
        let outcome = tokio::select! {
            outcome = pinger.ping() => outcome,
            _ = shutdown_rx.changed() => break,
        };
        // The probe may have been torn down while the ping was in flight;
        // a resolved ping must not act after teardown.
        if *shutdown_rx.borrow() {
            break;
        }
        let checked_at = Utc::now();
        match outcome {
            Ok(()) => {
                tracing::debug!("database health check passed");
                status_tx.send_replace(LivenessStatus {
                    state: ConnectionState::Healthy,
                    last_checked_at: Some(checked_at),
                });
                if settings.notify_on_success {
                    notifier.connection_healthy();
                }
            }
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "database health check failed");
                status_tx.send_replace(LivenessStatus {
                    state: ConnectionState::Error,
                    last_checked_at: Some(checked_at),
                });
                if settings.notify_on_failure {
                    notifier.connection_failed();
                }
            }
        }
    }
    tracing::info!("database liveness probe stopped");
}
