// src/classifier/mod.rs — External gesture classifier and the camera poll loop
//
// The classifier itself is a collaborator, not ours: one still frame in,
// a label from the fixed vocabulary (or "none") plus a confidence out.
// Classifier trouble is never user-visible — a failed tick is just a tick
// with no gesture.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::gesture::dispatcher::Dispatcher;
use crate::gesture::vocab::GestureSource;
use crate::infra::errors::WavectlError;

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub gesture: String,
    pub confidence: f32,
}

#[async_trait]
pub trait FrameClassifier: Send + Sync {
    /// Classify one base64-encoded still frame.
    async fn classify(&self, image_b64: &str) -> Result<Prediction, WavectlError>;
}

pub struct HttpClassifier {
    http: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    pub fn new(url: String, poll_interval: Duration) -> Self {
        // A response slower than the polling interval is useless; time it out
        // so the next tick isn't starved indefinitely.
        let http = reqwest::Client::builder()
            .timeout(poll_interval * 2)
            .build()
            .unwrap_or_default();
        Self { http, url }
    }
}

#[async_trait]
impl FrameClassifier for HttpClassifier {
    async fn classify(&self, image_b64: &str) -> Result<Prediction, WavectlError> {
        let res = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "image": image_b64 }))
            .send()
            .await
            .map_err(|e| WavectlError::Classifier(e.to_string()))?;

        if !res.status().is_success() {
            return Err(WavectlError::Classifier(format!(
                "classifier returned {}",
                res.status()
            )));
        }
        res.json::<Prediction>()
            .await
            .map_err(|e| WavectlError::Classifier(e.to_string()))
    }
}

/// Latest-wins mailbox for camera frames. The browser posts frames as fast as
/// it likes; the poller only ever takes the freshest one.
#[derive(Clone, Default)]
pub struct LatestFrame(Arc<RwLock<Option<String>>>);

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, image_b64: String) {
        *self.0.write().await = Some(image_b64);
    }

    pub async fn take(&self) -> Option<String> {
        self.0.write().await.take()
    }
}

pub struct CameraPoller {
    classifier: Arc<dyn FrameClassifier>,
    frames: LatestFrame,
    dispatcher: Arc<Dispatcher>,
    interval: Duration,
}

impl CameraPoller {
    pub fn new(
        classifier: Arc<dyn FrameClassifier>,
        frames: LatestFrame,
        dispatcher: Arc<Dispatcher>,
        interval: Duration,
    ) -> Self {
        Self {
            classifier,
            frames,
            dispatcher,
            interval,
        }
    }

    /// Wall-clock ticks with at most one classification in flight: the next
    /// tick is not taken until the previous request resolves, and missed
    /// ticks are skipped rather than bursted. Action-level serialization is
    /// still the dispatcher's cooldown gate.
    pub async fn run(self) {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            let Some(frame) = self.frames.take().await else {
                continue;
            };
            match self.classifier.classify(&frame).await {
                Ok(p) if p.gesture != "none" => {
                    self.dispatcher
                        .handle(&p.gesture, p.confidence, GestureSource::Camera)
                        .await;
                }
                Ok(_) => {}
                Err(e) => {
                    // Treated as "no gesture" for this tick
                    tracing::debug!("classifier error: {e}");
                }
            }
        }
    }
}
