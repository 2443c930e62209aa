//! Type expression normalization.
//!
//! Every [`TypeSlot::Raw`](crate::model::TypeSlot) annotation of the resolved
//! surface becomes a [`TypeExpr`] (or unknown, when the expression cannot be
//! expressed in a stub). Names are looked up in this order:
//!
//! 1. builtins,
//! 2. the enclosing class bodies and type-parameter lists,
//! 3. module-level declarations,
//! 4. import bindings, which add an [`ImportRequirement`](crate::model::ImportRequirement),
//! 5. star imports, which may bind anything.
//!
//! Whatever is left is rendered as a forward reference with an
//! `UnresolvedReference` warning.

mod declarations;
mod forms;

pub use forms::normalize;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::base::LineIndex;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, ExtractError};
use crate::model::{ImportBinding, ImportRequirements, SourceUnit, TypeExpr};
use crate::options::ExtractOptions;

/// Normalize every annotation of `unit` and fill in its import requirements.
///
/// Warnings are returned on success; an import collision fails the unit with
/// every diagnostic gathered so far.
pub fn normalize_unit(unit: &mut SourceUnit, options: &ExtractOptions) -> Result<Diagnostics, Diagnostics> {
    let mut ctx = NormalizeContext::new(unit, options);
    for binding in unit.imports.iter().filter(|b| b.reexported) {
        ctx.range = binding.range;
        ctx.require(binding, true);
    }
    for module in &unit.star_imports {
        ctx.requirements.require_star(module.clone());
    }
    for declaration in &mut unit.declarations {
        ctx.declaration(declaration);
    }

    let (requirements, diagnostics) = ctx.finish();
    unit.requirements = requirements;
    if diagnostics.has_errors() {
        Err(diagnostics)
    } else {
        Ok(diagnostics)
    }
}

/// Name scopes and accumulated requirements of the unit being normalized.
pub struct NormalizeContext<'a> {
    options: &'a ExtractOptions,
    module_path: String,
    imports: Vec<ImportBinding>,
    has_star_imports: bool,
    module_names: FxHashSet<SmolStr>,
    /// Innermost last: class bodies and type-parameter lists.
    scopes: Vec<FxHashSet<SmolStr>>,
    requirements: ImportRequirements,
    diagnostics: Diagnostics,
    /// Collisions already reported, by local name.
    collisions: FxHashSet<SmolStr>,
    line_index: LineIndex,
    /// Declaration being normalized, for positions.
    range: TextRange,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(unit: &SourceUnit, options: &'a ExtractOptions) -> Self {
        Self {
            options,
            module_path: unit.module_path.clone(),
            imports: unit.imports.clone(),
            has_star_imports: !unit.star_imports.is_empty(),
            module_names: unit.declarations.iter().map(|d| d.name.clone()).collect(),
            scopes: Vec::new(),
            requirements: ImportRequirements::new(),
            diagnostics: Diagnostics::new(),
            collisions: FxHashSet::default(),
            line_index: unit.line_index.clone(),
            range: TextRange::default(),
        }
    }

    pub fn finish(self) -> (ImportRequirements, Diagnostics) {
        (self.requirements, self.diagnostics)
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        let position = self.line_index.line_col(self.range.start());
        self.diagnostics.push(diagnostic.at(position));
    }

    pub(crate) fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Diagnostic::warning(code, message));
    }

    fn fail(&mut self, error: ExtractError) {
        if let ExtractError::ImportCollision { local, .. } = &error {
            if !self.collisions.insert(SmolStr::new(local)) {
                return;
            }
        }
        self.push(Diagnostic::from(error));
    }

    fn require(&mut self, binding: &ImportBinding, reexport: bool) {
        if let Err(error) = self.requirements.require(binding, reexport) {
            self.fail(error);
        }
    }

    /// Canonical dotted path of a name as written, for recognizing special
    /// forms such as `typing.Union`.
    pub(crate) fn canonical(&self, path: &str) -> String {
        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        let base = match self.imports.iter().rev().find(|b| b.local == first) {
            Some(binding) => binding.canonical(&self.module_path),
            None if self.options.policy.is_builtin(first) => format!("builtins.{first}"),
            None => first.to_string(),
        };
        match rest {
            Some(rest) => format!("{base}.{rest}"),
            None => base,
        }
    }

    /// Resolve a dotted name, requiring its import when it comes from one.
    pub(crate) fn resolve_path(&mut self, path: &str) -> TypeExpr {
        let root = path.split('.').next().unwrap_or(path);
        if self.options.policy.is_builtin(root)
            || self.scopes.iter().any(|scope| scope.contains(root))
            || self.module_names.contains(root)
        {
            return TypeExpr::Name(path.to_string());
        }

        let bindings: Vec<ImportBinding> = self.imports.iter().filter(|b| b.local == root).cloned().collect();
        if let Some(last) = bindings.last() {
            let object = last.origin.bound_object();
            if let Some(other) = bindings.iter().find(|b| b.origin.bound_object() != object) {
                self.fail(ExtractError::ImportCollision {
                    local: root.to_string(),
                    first: other.origin.bound_object(),
                    second: object,
                });
            }
            self.require(last, false);
            return TypeExpr::Name(path.to_string());
        }

        if self.has_star_imports {
            return TypeExpr::Name(path.to_string());
        }
        self.warn(
            DiagnosticCode::UnresolvedReference,
            format!("'{path}' is neither defined nor imported; rendering it as a forward reference"),
        );
        TypeExpr::ForwardRef(path.to_string())
    }

    fn with_scope<T>(&mut self, names: FxHashSet<SmolStr>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push(names);
        let result = f(self);
        self.scopes.pop();
        result
    }
}

#[cfg(test)]
mod tests;
