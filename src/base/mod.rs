//! Foundation types for the stub extractor.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - File extension constants
//!
//! This module has NO dependencies on other crate modules.

pub mod constants;
mod position;

pub use position::{LineCol, LineIndex};
pub use text_size::{TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
