//! Typed API client and listing view for the posts service.
//!
//! # Overview
//! `PostsClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). A `Transport`
//! executes the round-trip; `PostsApi` glues the two together, and
//! `PostsView` drives a listing/creation page on top of it.
//!
//! # Design
//! - `PostsClient` is stateless: it holds only `base_url`.
//! - Every failure is one `ApiError` carrying a human-readable message.
//! - No cache: each view re-fetches the list after a mutation.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod view;

pub use api::PostsApi;
pub use client::PostsClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorBody};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use transport::{Transport, UreqTransport};
pub use types::{NewPost, Post, PostChanges, PostEnvelope};
pub use view::{display_message, PostsView, Submit};
