//! Pass 1: import bindings.

use smol_str::SmolStr;

use crate::model::{ImportBinding, ImportOrigin};
use crate::parser::{AstNode, AstToken, ImportFromStmt, ImportStmt};

use super::context::WalkContext;

impl WalkContext<'_> {
    pub(super) fn collect_import(&mut self, import: &ImportStmt) {
        for alias in import.aliases() {
            let Some(module) = alias.name().map(|n| n.text()) else {
                continue;
            };
            let binding = match alias.alias() {
                Some(local) => ImportBinding {
                    local: local.text().into(),
                    reexported: local.text() == module,
                    origin: ImportOrigin::Module {
                        module,
                        aliased: true,
                    },
                    range: alias.syntax().text_range(),
                },
                None => ImportBinding {
                    local: SmolStr::new(module.split('.').next().unwrap_or(&module)),
                    reexported: false,
                    origin: ImportOrigin::Module {
                        module,
                        aliased: false,
                    },
                    range: alias.syntax().text_range(),
                },
            };
            self.imports.push(binding);
        }
    }

    pub(super) fn collect_import_from(&mut self, import: &ImportFromStmt) {
        let mut module = ".".repeat(import.level());
        if let Some(name) = import.module() {
            module.push_str(&name.text());
        }
        if import.is_star() {
            self.star_imports.push(module);
            return;
        }
        for alias in import.aliases() {
            let Some(name) = alias.name().map(|n| n.text()) else {
                continue;
            };
            let local = alias.alias();
            self.imports.push(ImportBinding {
                local: local.as_ref().map_or(name.as_str(), |l| l.text()).into(),
                reexported: local.as_ref().is_some_and(|l| l.text() == name),
                origin: ImportOrigin::Member {
                    module: module.clone(),
                    name,
                },
                range: alias.syntax().text_range(),
            });
        }
    }
}
