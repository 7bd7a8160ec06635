//! # gitapi
//!
//! A typed REST client for GitHub and Gitea repository administration.
//!
//! This library provides functionality to:
//! - Build vendor-aware requests from a long-lived [`connection::Connection`]
//! - Execute one HTTP round trip per call and classify the result
//! - Encrypt and submit Actions secrets with libsodium sealed boxes
//! - Load connection settings from TOML configuration files
//!
//! ## Modules
//!
//! - [`endpoint`] - Resource path construction
//! - [`payload`] - Request and response body variants
//! - [`engine`] - Request/response engine
//! - [`secrets`] - Public-key fetch, seal and submit pipeline
//! - [`client`] - Typed repository, topic and secret operations
//! - [`config`] - Configuration file parsing and validation
//! - [`paths`] - XDG-compliant path resolution
//! - [`validation`] - Input validation utilities
//! - [`error`] - Error formatting utilities
//! - [`errors`] - Structured error types
//! - [`constants`] - Application constants

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod connection;
pub mod constants;
pub mod crypto;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod errors;
pub mod http;
pub mod paths;
pub mod payload;
pub mod secrets;
pub mod validation;
