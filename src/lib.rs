//! codepad - the core of a small code-editing surface
//!
//! Two independent engines:
//! - `syntax`: a pure, per-line highlighter driven by an ordered rule table
//! - `sandbox`: runs code in a child interpreter with captured output,
//!   timeouts and cancellation, off the caller's thread
//!
//! `render` and `config` support the `codepad` binary.

pub mod config;
pub mod error;
pub mod render;
pub mod sandbox;
pub mod syntax;

pub use error::{CodepadError, Result};
