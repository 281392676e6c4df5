//! # dhub Core Library
//!
//! This crate contains the core logic of the `dhub` tool – a command-line lookup of libraries
//! and their published versions (with the images built for each of them).
//!
//! The dataset is a gzip-compressed tar archive published on a content host. It is fetched at
//! most once per UTC day with a conditional request, unpacked into a per-user cache directory,
//! and then queried locally.
//!
//! ## Modules Overview
//! - [`config`] – `config.toml` settings and environment overrides
//! - [`store`] – The local content store rooted at the cache directory
//! - [`untar`] – Safe extraction of the dataset archive
//! - [`marker`] – The record of the last successful synchronization
//! - [`download`] – Freshness policy and conditional fetch
//! - [`catalog`] – Library and version records
//! - [`manager`] – Queries over the synchronized dataset
//! - [`render`] – Table output used by the CLI
//! - [`global`] – Per-user directories (home, cache root, config file)
//!
//! The cache directory is single-writer: two `dhub` processes syncing at the same time may
//! interleave marker writes and extraction. No locking is done.

pub mod error;
pub mod config;
pub mod store;
pub mod untar;
pub mod marker;
pub mod download;
pub mod catalog;
pub mod manager;
pub mod render;
pub mod global;

pub use error::{Error, Result};
pub use config::{Config, Remote};
pub use store::ContentStore;
pub use marker::Marker;
pub use download::{Download, Fetch, FetchResponse, HttpFetcher, SyncOutcome};
pub use catalog::*;
pub use manager::Manager;
pub use render::Renderer;
