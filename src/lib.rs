//! Terminal client for an AI generation backend
//!
//! Collects text and image prompts, forwards them to the backend's
//! generation endpoints, and renders the returned text or image URL.

pub mod app;
pub mod backend;
pub mod error;
pub mod models;
pub mod page;

pub use error::{Error, Result};
