//! All Slack-specific functionality

pub mod client;
pub mod metadata;
pub mod prompt_builder;
pub mod response_builder;

// Re-export main types for convenience
pub use client::SlackClient;
pub use metadata::MetadataResolver;
