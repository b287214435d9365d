// GitHub API module.
// Provides the client, endpoint URLs and types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GitHubClient, HttpTransport, RemoteResponse, ResponseSource, Transport};
pub use types::*;
