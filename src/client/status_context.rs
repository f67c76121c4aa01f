//! Shared upstream status for every surface of one process.
//!
//! One context performs the checks; surfaces subscribe to the latest
//! [`StatusReport`] instead of polling the relay themselves.

use super::ArkClient;
use crate::api::types::StatusReport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Latest status plus an optional background refresh task.
///
/// Lifecycle: [`StatusContext::start`] runs the first check, [`refresh`]
/// re-checks on demand, [`shutdown`] stops the background task.
///
/// [`refresh`]: StatusContext::refresh
/// [`shutdown`]: StatusContext::shutdown
pub struct StatusContext {
    client: ArkClient,
    sender: Arc<watch::Sender<StatusReport>>,
    cancel_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StatusContext {
    /// Run the initial check and, when `refresh_every` is set, spawn the
    /// periodic refresh task.
    pub async fn start(client: ArkClient, refresh_every: Option<Duration>) -> Self {
        let initial = client.check_status().await;
        let (sender, _) = watch::channel(initial);
        let sender = Arc::new(sender);
        let cancel_token = CancellationToken::new();

        let task = refresh_every.map(|period| {
            spawn_refresh(client.clone(), sender.clone(), period, cancel_token.clone())
        });

        Self {
            client,
            sender,
            cancel_token,
            task,
        }
    }

    /// Latest report.
    pub fn current(&self) -> StatusReport {
        self.sender.borrow().clone()
    }

    /// Check now and publish the result.
    pub async fn refresh(&self) -> StatusReport {
        let report = self.client.check_status().await;
        publish(&self.sender, report.clone());
        report
    }

    /// Receiver notified whenever the report changes.
    pub fn subscribe(&self) -> watch::Receiver<StatusReport> {
        self.sender.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the refresh task and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Status refresh task ended abnormally");
            }
        }
    }
}

impl Drop for StatusContext {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

/// Replace the report, waking subscribers only when it differs.
fn publish(sender: &watch::Sender<StatusReport>, report: StatusReport) {
    sender.send_if_modified(|current| {
        if *current == report {
            false
        } else {
            *current = report;
            true
        }
    });
}

fn spawn_refresh(
    client: ArkClient,
    sender: Arc<watch::Sender<StatusReport>>,
    period: Duration,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::debug!(
            interval_ms = period.as_millis() as u64,
            endpoint = %client.endpoint(),
            "Status refresh started"
        );

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::debug!("Status refresh shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let report = client.check_status().await;
                    tracing::trace!(state = ?report.state, "Status refreshed");
                    publish(&sender, report);
                }
            }
        }
    })
}
