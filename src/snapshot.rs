// src/snapshot.rs — Shared now-playing snapshot
//
// One slot, replaced wholesale on every refresh. Readers (the dispatcher's
// toggle resolution, the HTTP surface) only ever see a complete snapshot or
// nothing.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::gesture::dispatcher::ControlGateway;
use crate::spotify::types::PlaybackSnapshot;

#[derive(Clone, Default)]
pub struct SnapshotHandle(Arc<RwLock<Option<PlaybackSnapshot>>>);

impl SnapshotHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<PlaybackSnapshot> {
        self.0.read().await.clone()
    }

    pub async fn replace(&self, snapshot: Option<PlaybackSnapshot>) {
        *self.0.write().await = snapshot;
    }
}

/// Fixed-interval poll keeping the snapshot current between commands.
/// Dispatch-triggered settles land independently of this loop.
pub async fn run_poll_loop(gateway: Arc<dyn ControlGateway>, interval: Duration) {
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tick.tick().await;
        gateway.refresh_snapshot().await;
    }
}
