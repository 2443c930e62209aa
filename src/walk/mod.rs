//! Declaration walker: syntax tree → [`SourceUnit`].
//!
//! The walk runs in two passes over the statements it visits:
//!
//! 1. **Bindings**: import statements are collected in source order, so
//!    decorators and type-variable factories can be canonicalized.
//! 2. **Declarations**: definitions and assignments become
//!    [`Declaration`](crate::model::Declaration)s with raw annotations and a
//!    [`Role`](crate::model::Role) classified from their decorators.
//!
//! Which statements are visited is decided once, by [`WalkContext::visible`]:
//! `if TYPE_CHECKING:` keeps only its body, `if not TYPE_CHECKING:` only its
//! `else`, other `if` chains keep every branch, and `try` keeps its body,
//! `else` and `finally` but never its handlers.

mod assignments;
mod context;
mod declarations;
mod imports;
mod raw;

pub use raw::{has_type_comment, literal_kind, literal_text, looks_like_type, parse_annotation, raw_expr};

use crate::base::LineIndex;
use crate::diagnostics::Diagnostics;
use crate::model::SourceUnit;
use crate::options::ExtractOptions;
use crate::parser::{AstNode, Parse, SourceFile};

use context::{Scope, WalkContext};

/// Walk a parsed unit into its declaration model.
///
/// Syntax errors are the caller's concern; an erroneous tree is walked as far
/// as it goes.
pub fn walk(parse: &Parse, options: &ExtractOptions) -> (SourceUnit, Diagnostics) {
    let root = parse.syntax();
    let line_index = LineIndex::new(&root.text().to_string());
    let mut ctx = WalkContext::new(options, line_index);
    let mut unit = SourceUnit::new(options.module_path.clone());

    let Some(file) = SourceFile::cast(root) else {
        return (unit, ctx.diagnostics);
    };

    let statements = ctx.visible(file.statements(), true);
    unit.declarations = ctx.declarations(&statements, Scope::Module);
    unit.imports = std::mem::take(&mut ctx.imports);
    unit.star_imports = std::mem::take(&mut ctx.star_imports);
    unit.export_list = ctx.exports.take();
    unit.line_index = std::mem::take(&mut ctx.line_index);

    (unit, ctx.diagnostics)
}

#[cfg(test)]
mod tests;
