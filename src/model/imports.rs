//! Import bindings found in the source and imports the stub requires.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::diagnostics::ExtractError;

/// A local name bound by an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportBinding {
    pub local: SmolStr,
    pub origin: ImportOrigin,
    /// Written as `import x as x` or `from m import y as y`, or listed in
    /// `__all__`.
    pub reexported: bool,
    pub range: TextRange,
}

/// What an import binds a local name to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportOrigin {
    /// `import a.b` (local `a`) or `import a.b as c` (local `c`).
    Module { module: String, aliased: bool },
    /// `from m import name`; `module` keeps leading dots of relative imports.
    Member { module: String, name: String },
}

impl ImportOrigin {
    /// The object the local name refers to, for collision checks.
    pub fn bound_object(&self) -> String {
        match self {
            ImportOrigin::Module { module, aliased: true } => module.clone(),
            ImportOrigin::Module { module, aliased: false } => {
                module.split('.').next().unwrap_or(module).to_string()
            }
            ImportOrigin::Member { module, name } if module.ends_with('.') => format!("{module}{name}"),
            ImportOrigin::Member { module, name } => format!("{module}.{name}"),
        }
    }
}

impl ImportBinding {
    /// The dotted path `local` stands for, with relative modules made
    /// absolute against `module_path`.
    pub fn canonical(&self, module_path: &str) -> String {
        match &self.origin {
            ImportOrigin::Module { module, aliased: true } => module.clone(),
            ImportOrigin::Module { .. } => self.local.to_string(),
            ImportOrigin::Member { module, name } => {
                let module = resolve_relative(module_path, module);
                if module.is_empty() {
                    name.clone()
                } else {
                    format!("{module}.{name}")
                }
            }
        }
    }
}

/// Make a relative module (`..pkg`) absolute against the dotted path of the
/// importing module. Absolute modules are returned unchanged; a relative
/// module that climbs above the root keeps its dots.
pub fn resolve_relative(module_path: &str, module: &str) -> String {
    let level = module.chars().take_while(|&c| c == '.').count();
    if level == 0 {
        return module.to_string();
    }
    let rest = &module[level..];
    let segments: Vec<&str> = module_path.split('.').filter(|s| !s.is_empty()).collect();
    if module_path.is_empty() || level > segments.len() {
        return module.to_string();
    }
    let mut parts: Vec<&str> = segments[..segments.len() - level].to_vec();
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts.join(".")
}

/// One import line fragment the stub needs.
///
/// Ordering is by module, then name, with `import m` sorting before
/// `from m import ...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportRequirement {
    pub module: String,
    /// `None` for `import module`.
    pub name: Option<String>,
    /// `as` name, when it differs from what the import binds by default or
    /// marks a re-export.
    pub alias: Option<SmolStr>,
}

impl ImportRequirement {
    pub fn from_binding(binding: &ImportBinding, reexport: bool) -> Self {
        let alias = |default: &str| {
            if reexport || binding.local != default {
                Some(binding.local.clone())
            } else {
                None
            }
        };
        match &binding.origin {
            ImportOrigin::Module { module, aliased } => ImportRequirement {
                module: module.clone(),
                name: None,
                // `import a.b` has no `as` form binding `a`.
                alias: if *aliased || (reexport && !module.contains('.')) {
                    Some(binding.local.clone())
                } else {
                    None
                },
            },
            ImportOrigin::Member { module, name } => ImportRequirement {
                module: module.clone(),
                name: Some(name.clone()),
                alias: alias(name),
            },
        }
    }

    /// The local name this import binds.
    pub fn local(&self) -> &str {
        match (&self.alias, &self.name) {
            (Some(alias), _) => alias,
            (None, Some(name)) => name,
            (None, None) => self.module.split('.').next().unwrap_or(&self.module),
        }
    }
}

/// Deduplicated, sorted import requirements with collision detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRequirements {
    set: BTreeSet<ImportRequirement>,
    bound: FxHashMap<SmolStr, String>,
    stars: BTreeSet<String>,
}

impl ImportRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the import behind `binding`.
    ///
    /// Fails when the binding's local name is already required from a
    /// different origin.
    pub fn require(&mut self, binding: &ImportBinding, reexport: bool) -> Result<(), ExtractError> {
        let object = binding.origin.bound_object();
        match self.bound.get(&binding.local) {
            Some(existing) if *existing != object => {
                return Err(ExtractError::ImportCollision {
                    local: binding.local.to_string(),
                    first: existing.clone(),
                    second: object,
                });
            }
            Some(_) => {}
            None => {
                self.bound.insert(binding.local.clone(), object);
            }
        }
        let requirement = ImportRequirement::from_binding(binding, reexport);
        if reexport {
            // A re-export supersedes the plain form of the same import.
            let plain = ImportRequirement::from_binding(binding, false);
            self.set.remove(&plain);
        } else if self.set.contains(&ImportRequirement::from_binding(binding, true)) {
            return Ok(());
        }
        self.set.insert(requirement);
        Ok(())
    }

    pub fn require_star(&mut self, module: impl Into<String>) {
        self.stars.insert(module.into());
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.stars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportRequirement> {
        self.set.iter()
    }

    pub fn stars(&self) -> impl Iterator<Item = &String> {
        self.stars.iter()
    }

    /// Is `local` bound by a required import?
    pub fn binds(&self, local: &str) -> bool {
        self.bound.contains_key(local)
    }
}
