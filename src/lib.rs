//! git-version - build identity captured from git at compile time.
//!
//! The build script probes the source tree and exports the results to the
//! compiler; [`build_info`] exposes them as constants and as one immutable
//! [`BuildIdentity`] record for the lifetime of the process.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  rustc-env   ┌─────────────┐
//! │  build.rs   │ ───────────▶ │ build_info  │
//! │ (generator) │              └──────┬──────┘
//! └─────────────┘                     │
//!        ▲                   ┌────────┴────────┐
//!        │ probe             │                 │
//! ┌──────┴──────┐     ┌──────┴──────┐   ┌──────┴──────┐
//! │   verify    │ ──▶ │   output    │   │     CLI     │
//! └─────────────┘     └─────────────┘   └─────────────┘
//! ```

pub mod build_info;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod verify;

pub use build_info::{BuildIdentity, current};
pub use config::Config;
pub use error::{Error, Result};
