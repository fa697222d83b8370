// src/spotify/mod.rs — Upstream provider layer

pub mod client;
pub mod gateway;
pub mod types;

pub use client::SpotifyClient;
pub use gateway::{BoundGateway, Gateway};
pub use types::{AuthStatus, Device, PlaybackSnapshot, TokenGrant, UserProfile};
