// src/gesture/feedback.rs — Transient acknowledgments for dispatched gestures
//
// Every handled-and-accepted gesture produces exactly one Ack, success or
// failure. Acks are advisory UI feedback: the channel is bounded and lossy,
// and each Ack expires on its own after the configured TTL.

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::gesture::mapping::ActionKind;
use crate::gesture::vocab::GestureLabel;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct Ack {
    pub label: GestureLabel,
    pub action: ActionKind,
    pub outcome: AckOutcome,
    expires_at: Instant,
}

impl Ack {
    pub fn new(label: GestureLabel, action: ActionKind, outcome: AckOutcome, ttl: Duration) -> Self {
        Self {
            label,
            action,
            outcome,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Auto-dismiss check: consumers drop expired acks instead of rendering
    /// them.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Clone)]
pub struct FeedbackSender {
    tx: mpsc::Sender<Ack>,
    ttl: Duration,
}

impl FeedbackSender {
    pub fn send(&self, label: GestureLabel, action: ActionKind, outcome: AckOutcome) {
        let ack = Ack::new(label, action, outcome, self.ttl);
        // A full channel means the consumer is behind; stale feedback is
        // worthless, so drop rather than wait.
        if self.tx.try_send(ack).is_err() {
            tracing::debug!(%label, "feedback channel full, ack dropped");
        }
    }
}

pub type FeedbackReceiver = mpsc::Receiver<Ack>;

pub fn channel(ttl: Duration) -> (FeedbackSender, FeedbackReceiver) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    (FeedbackSender { tx, ttl }, rx)
}

/// Drain acknowledgments into the log. The browser UI renders its own
/// feedback; this keeps a server-side trace of every dispatched gesture.
pub async fn drain_to_log(mut rx: FeedbackReceiver) {
    while let Some(ack) = rx.recv().await {
        if ack.is_expired() {
            continue;
        }
        match ack.outcome {
            AckOutcome::Success => {
                tracing::info!(label = %ack.label, action = %ack.action, "gesture dispatched")
            }
            AckOutcome::Failure => {
                tracing::warn!(label = %ack.label, action = %ack.action, "gesture dispatch failed")
            }
        }
    }
}
