//! Grammar modules for Python parsing
//!
//! This module contains the parsing logic organized by construct:
//! - `expressions` - Expression precedence chain, displays, comprehensions, parameters
//! - `statements` - Simple and compound statements, blocks, definitions
//! - `patterns` - `match` statement patterns
//!
//! The parsing functions are generic over a trait (`ExpressionParser` / `StatementParser`)
//! so they can be used with any parser implementation.

pub mod expressions;
pub mod patterns;
pub mod statements;

pub use expressions::ExpressionParser;
pub use statements::{StatementParser, parse_expression_root, parse_file};
