// src/gesture/mod.rs — Gesture dispatch layer

pub mod dispatcher;
pub mod feedback;
pub mod mapping;
pub mod vocab;

pub use dispatcher::{ControlGateway, Dispatcher};
pub use feedback::{Ack, AckOutcome, FeedbackReceiver, FeedbackSender};
pub use mapping::{resolve_toggle, Action, ActionKind};
pub use vocab::{GestureLabel, GestureSource};
