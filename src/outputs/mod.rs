//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: pretty-printed JSON documents on stdout

pub mod json;
