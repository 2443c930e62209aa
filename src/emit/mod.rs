//! Stub serializer.
//!
//! Renders a normalized [`SourceUnit`] as stub text:
//!
//! ```text
//! import lines          sorted by module, then name
//!
//! __all__ = [...]       when the module defines it
//!
//! values                variables, aliases, type variables
//!
//! definitions           functions and classes, in source order
//! ```
//!
//! The output is a pure function of the model, so extracting a stub from its
//! own output gives the same text.

mod imports;
mod signatures;

pub use imports::import_lines;

use std::fmt::Write;

use crate::model::{
    AliasDecl, AliasForm, ClassDecl, Declaration, DeclarationKind, FunctionDecl, PropertyDecl, SourceUnit,
    TypeVarDecl, VariableDecl, quote_str,
};

use signatures::{decorator_line, params, slot_text, slot_text_unquoted, type_params};

const INDENT: &str = "    ";

/// Render the stub text of a unit. Empty units render as an empty string.
pub fn serialize(unit: &SourceUnit) -> String {
    let mut ctx = SerializeContext::new();

    for line in import_lines(&unit.requirements) {
        ctx.line(&line);
    }
    if let Some(exports) = &unit.export_list {
        ctx.separate();
        let names: Vec<String> = exports.iter().map(|name| quote_str(name)).collect();
        ctx.line(&format!("__all__ = [{}]", names.join(", ")));
    }
    if !unit.declarations.is_empty() {
        ctx.separate();
        ctx.body(&unit.declarations);
    }

    ctx.output
}

/// Output buffer and the indentation of the block being written.
struct SerializeContext {
    output: String,
    indent_level: usize,
}

impl SerializeContext {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
        }
    }

    fn line(&mut self, text: &str) {
        let indent = INDENT.repeat(self.indent_level);
        // Writing into a String cannot fail.
        let _ = writeln!(self.output, "{indent}{text}");
    }

    fn blank_line(&mut self) {
        self.output.push('\n');
    }

    /// A blank line between top-level sections, once something precedes.
    fn separate(&mut self) {
        if !self.output.is_empty() {
            self.blank_line();
        }
    }

    /// Declarations of one scope: the value group, then the definition
    /// group, with classes that have a body set apart by blank lines.
    fn body(&mut self, declarations: &[Declaration]) {
        let mut previous: Option<(bool, bool)> = None;
        for declaration in declarations {
            let value = declaration.is_value();
            let spaced = matches!(&declaration.kind, DeclarationKind::Class(class) if !class.members.is_empty());
            if let Some((previous_value, previous_spaced)) = previous {
                if previous_value != value || previous_spaced || spaced {
                    self.blank_line();
                }
            }
            self.declaration(declaration);
            previous = Some((value, spaced));
        }
    }

    fn declaration(&mut self, declaration: &Declaration) {
        let name = declaration.name.as_str();
        match &declaration.kind {
            DeclarationKind::Class(class) => self.class(name, class),
            DeclarationKind::Function(function) => self.function(name, function),
            DeclarationKind::Variable(variable) => self.variable(name, variable),
            DeclarationKind::Property(property) => self.property(name, property),
            DeclarationKind::Alias(alias) => self.alias(name, alias),
            DeclarationKind::TypeVar(type_var) => self.type_var(name, type_var),
            DeclarationKind::Overloads(group) => {
                for signature in &group.signatures {
                    self.function(name, signature);
                }
            }
        }
    }

    fn class(&mut self, name: &str, class: &ClassDecl) {
        for decorator in &class.decorators {
            self.line(&decorator_line(decorator));
        }
        let mut header: Vec<String> = class.bases.iter().filter_map(slot_text_unquoted).collect();
        header.extend(
            class
                .keywords
                .iter()
                .filter_map(|keyword| Some(format!("{}={}", keyword.name, slot_text_unquoted(&keyword.value)?))),
        );
        let header = if header.is_empty() {
            String::new()
        } else {
            format!("({})", header.join(", "))
        };
        let signature = format!("class {name}{}{header}:", type_params(&class.type_params));

        if class.members.is_empty() {
            self.line(&format!("{signature} ..."));
            return;
        }
        self.line(&signature);
        self.indent_level += 1;
        self.body(&class.members);
        self.indent_level -= 1;
    }

    fn function(&mut self, name: &str, function: &FunctionDecl) {
        for decorator in &function.decorators {
            self.line(&decorator_line(decorator));
        }
        let returns = slot_text(&function.returns)
            .map(|ty| format!(" -> {ty}"))
            .unwrap_or_default();
        self.line(&format!(
            "{}def {name}{}({}){returns}: ...",
            if function.is_async { "async " } else { "" },
            type_params(&function.type_params),
            params(&function.params),
        ));
    }

    /// The getter as written; accessors are rebuilt around the getter's type.
    fn property(&mut self, name: &str, property: &PropertyDecl) {
        self.function(name, &property.getter);
        let receiver = |function: &FunctionDecl| {
            function
                .params
                .first()
                .map_or_else(|| "self".to_string(), |p| p.name.to_string())
        };
        if let Some(setter) = &property.setter {
            let value_type = slot_text(&property.getter.returns).or_else(|| {
                setter
                    .params
                    .get(1)
                    .and_then(|p| slot_text(&p.annotation))
            });
            let value = match value_type {
                Some(ty) => format!("value: {ty}"),
                None => "value".to_string(),
            };
            self.line(&format!("@{name}.setter"));
            self.line(&format!("def {name}({}, {value}) -> None: ...", receiver(setter)));
        }
        if let Some(deleter) = &property.deleter {
            self.line(&format!("@{name}.deleter"));
            self.line(&format!("def {name}({}) -> None: ...", receiver(deleter)));
        }
    }

    fn variable(&mut self, name: &str, variable: &VariableDecl) {
        match slot_text(&variable.annotation) {
            Some(ty) => self.line(&format!("{name}: {ty}")),
            None => self.line(&format!("{name} = ...")),
        }
    }

    fn alias(&mut self, name: &str, alias: &AliasDecl) {
        let line = match &alias.form {
            AliasForm::Assignment => {
                format!("{name} = {}", slot_text_unquoted(&alias.value).unwrap_or_else(|| "...".into()))
            }
            AliasForm::Annotated(marker) => format!(
                "{name}: {} = {}",
                slot_text(marker).unwrap_or_else(|| "TypeAlias".into()),
                slot_text(&alias.value).unwrap_or_else(|| "...".into())
            ),
            AliasForm::Statement => format!(
                "type {name}{} = {}",
                type_params(&alias.type_params),
                slot_text(&alias.value).unwrap_or_else(|| "...".into())
            ),
        };
        self.line(&line);
    }

    fn type_var(&mut self, name: &str, type_var: &TypeVarDecl) {
        let Some(factory) = slot_text_unquoted(&type_var.factory) else {
            self.line(&format!("{name} = ..."));
            return;
        };
        let mut args = vec![quote_str(&type_var.name_arg)];
        args.extend(type_var.args.iter().filter_map(slot_text));
        args.extend(
            type_var
                .keywords
                .iter()
                .filter_map(|keyword| Some(format!("{}={}", keyword.name, slot_text(&keyword.value)?))),
        );
        self.line(&format!("{name} = {factory}({})", args.join(", ")));
    }
}
