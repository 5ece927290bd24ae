//! Headless presentation layer for NoorAI.
//!
//! Each screen is a state machine driven by user actions and by session
//! changes published through [`session::SessionProvider`]. Rendering is left
//! to whatever front end embeds the crate.

pub mod client;
pub mod config;
pub mod emotions;
pub mod error;
pub mod notice;
pub mod screens;
pub mod session;

pub use client::NoorClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{Principal, SessionProvider, SessionSubscription};

#[cfg(test)]
pub(crate) mod test_support;
