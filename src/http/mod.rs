//! HTTP client for the transform service
//!
//! Boundary client for the document-to-Markdown conversion endpoint.

mod client;

pub use client::{ClientError, HealthStatus, TransformClient, TransformReply, TransformResponse};
