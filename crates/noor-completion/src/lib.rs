//! Client for the external chat-completions API that writes dua suggestions.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{CompletionClient, CompletionConfig};
pub use error::CompletionError;
