//! File extensions understood by the driver.

/// Extension of source files picked up from directories.
pub const SOURCE_EXTENSION: &str = "py";

/// Extension written for generated stubs.
pub const STUB_EXTENSION: &str = "pyi";
