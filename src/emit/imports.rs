//! Import block rendering.

use std::collections::BTreeMap;

use crate::model::ImportRequirements;

/// Lines for one origin module: `import` forms, then one `from` line, then a
/// star import.
#[derive(Default)]
struct ModuleLines {
    imports: Vec<String>,
    names: Vec<String>,
    star: bool,
}

/// Import lines sorted by module, then by imported name.
pub fn import_lines(requirements: &ImportRequirements) -> Vec<String> {
    let mut modules: BTreeMap<&str, ModuleLines> = BTreeMap::new();
    for requirement in requirements.iter() {
        let lines = modules.entry(requirement.module.as_str()).or_default();
        match (&requirement.name, &requirement.alias) {
            (None, None) => lines.imports.push(format!("import {}", requirement.module)),
            (None, Some(alias)) => lines.imports.push(format!("import {} as {alias}", requirement.module)),
            (Some(name), None) => lines.names.push(name.clone()),
            (Some(name), Some(alias)) => lines.names.push(format!("{name} as {alias}")),
        }
    }
    for module in requirements.stars() {
        modules.entry(module.as_str()).or_default().star = true;
    }

    let mut out = Vec::new();
    for (module, lines) in modules {
        out.extend(lines.imports);
        if !lines.names.is_empty() {
            out.push(format!("from {module} import {}", lines.names.join(", ")));
        }
        if lines.star {
            out.push(format!("from {module} import *"));
        }
    }
    out
}
