// src/gesture/dispatcher.rs — Gesture-to-action dispatch
//
// One entry point, `handle`, gates every recognized gesture in a fixed order:
// vocabulary membership, session authentication, cooldown since the last
// accepted gesture, and (camera only) the confidence threshold. Gestures that
// arrive while a command is still in flight hit the cooldown gate — that is
// the intended backpressure; nothing is queued.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::gesture::feedback::{AckOutcome, FeedbackSender};
use crate::gesture::mapping::{action_for, resolve_toggle, Action};
use crate::gesture::vocab::{GestureLabel, GestureSource};
use crate::infra::config::GestureConfig;
use crate::infra::errors::WavectlError;
use crate::snapshot::SnapshotHandle;

/// What the dispatcher needs from the gateway side. A seam so tests can run
/// the full gate sequence against a recording fake.
#[async_trait]
pub trait ControlGateway: Send + Sync {
    async fn is_authenticated(&self) -> bool;
    async fn dispatch(&self, action: &Action) -> Result<(), WavectlError>;
    /// Re-poll upstream and publish the result to the shared snapshot slot.
    async fn refresh_snapshot(&self);
}

pub struct Dispatcher {
    gateway: Arc<dyn ControlGateway>,
    feedback: FeedbackSender,
    snapshot: SnapshotHandle,
    cooldown: Duration,
    confidence_threshold: f32,
    settle: Duration,
    /// Baseline for the cooldown window. Only accepted gestures move it.
    last_accepted: Mutex<Option<Instant>>,
}

impl Dispatcher {
    pub fn new(
        gateway: Arc<dyn ControlGateway>,
        feedback: FeedbackSender,
        snapshot: SnapshotHandle,
        config: &GestureConfig,
    ) -> Self {
        Self {
            gateway,
            feedback,
            snapshot,
            cooldown: Duration::from_millis(config.cooldown_ms),
            confidence_threshold: config.confidence_threshold,
            settle: Duration::from_millis(config.snapshot_settle_ms),
            last_accepted: Mutex::new(None),
        }
    }

    /// Handle one recognized gesture. Returns whether it was accepted (i.e.
    /// made it past every gate and was dispatched, successfully or not).
    /// Never propagates gateway failures to the caller.
    pub async fn handle(&self, label: &str, confidence: f32, source: GestureSource) -> bool {
        let Ok(label) = label.parse::<GestureLabel>() else {
            tracing::debug!(label, "unrecognized gesture label dropped");
            return false;
        };

        if !self.gateway.is_authenticated().await {
            tracing::debug!(%label, "gesture dropped: not authenticated");
            return false;
        }

        // Cooldown check, threshold check, and baseline update happen under
        // one lock so two near-simultaneous gestures cannot both pass.
        {
            let mut last = self.last_accepted.lock().await;
            if let Some(at) = *last {
                if at.elapsed() < self.cooldown {
                    tracing::debug!(%label, "gesture dropped: within cooldown");
                    return false;
                }
            }
            // Touch events are discrete UI triggers, not classifier output;
            // only camera events carry a meaningful confidence.
            if source == GestureSource::Camera && confidence <= self.confidence_threshold {
                tracing::debug!(%label, confidence, "gesture dropped: below confidence threshold");
                return false;
            }
            *last = Some(Instant::now());
        }

        let action = resolve_toggle(action_for(label), self.snapshot.get().await.as_ref());
        tracing::info!(%label, action = %action.kind, ?source, "gesture accepted");

        match self.gateway.dispatch(&action).await {
            Ok(()) => {
                self.feedback.send(label, action.kind, AckOutcome::Success);
                self.schedule_settle_refresh();
            }
            Err(e) => {
                tracing::warn!(%label, action = %action.kind, "gateway call failed: {e}");
                self.feedback.send(label, action.kind, AckOutcome::Failure);
            }
        }
        true
    }

    /// Upstream needs a moment before it reports the new state; refresh the
    /// snapshot after a short settle delay rather than immediately.
    fn schedule_settle_refresh(&self) {
        let gateway = Arc::clone(&self.gateway);
        let settle = self.settle;
        tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            gateway.refresh_snapshot().await;
        });
    }
}
