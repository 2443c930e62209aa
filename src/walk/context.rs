//! Walk context: bindings, the export list and diagnostics of the unit being walked.

use smol_str::SmolStr;
use text_size::TextRange;
use tracing::debug;

use crate::base::{LineCol, LineIndex};
use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::model::{Declaration, ImportBinding};
use crate::options::ExtractOptions;
use crate::parser::{AstNode, Expr, IfStmt, Stmt, SyntaxKind};

/// Where the statements being walked live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    Module,
    Class,
}

/// Branch selection for an `if` statement.
enum Branch {
    /// Whole chain
    All,
    /// `if TYPE_CHECKING:`
    Body,
    /// `if not TYPE_CHECKING:`
    Else,
}

/// Walk state passed through all walk functions.
pub(super) struct WalkContext<'a> {
    pub options: &'a ExtractOptions,
    pub line_index: LineIndex,
    /// Import bindings in source order
    pub imports: Vec<ImportBinding>,
    pub star_imports: Vec<String>,
    /// `__all__`, once the module assigns it
    pub exports: Option<Vec<SmolStr>>,
    pub diagnostics: Diagnostics,
}

impl<'a> WalkContext<'a> {
    pub fn new(options: &'a ExtractOptions, line_index: LineIndex) -> Self {
        Self {
            options,
            line_index,
            imports: Vec::new(),
            star_imports: Vec::new(),
            exports: None,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn position(&self, range: TextRange) -> LineCol {
        self.line_index.line_col(range.start())
    }

    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, range: TextRange) {
        let diagnostic = Diagnostic::warning(code, message).at(self.position(range));
        self.diagnostics.push(diagnostic);
    }

    pub fn ignore(&self, what: &str, range: TextRange) {
        let position = self.position(range);
        debug!(line = position.line + 1, what, "ignoring statement");
    }

    /// Canonical dotted path of a name as written.
    ///
    /// The first segment goes through the latest import binding of that name;
    /// unbound builtins get a `builtins.` prefix.
    pub fn canonicalize(&self, path: &str) -> String {
        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        let base = match self.imports.iter().rev().find(|b| b.local == first) {
            Some(binding) => binding.canonical(&self.options.module_path),
            None if self.options.policy.is_builtin(first) => format!("builtins.{first}"),
            None => first.to_string(),
        };
        match rest {
            Some(rest) => format!("{base}.{rest}"),
            None => base,
        }
    }

    fn is_type_checking(&self, expr: &Expr) -> bool {
        let Some(path) = expr.dotted_path() else {
            return false;
        };
        let policy = &self.options.policy;
        if policy.is_type_checking_flag(&self.canonicalize(&path)) {
            return true;
        }
        // A bare, unbound `TYPE_CHECKING` is taken to be the typing flag.
        !path.contains('.')
            && !self.imports.iter().any(|b| b.local == path)
            && policy.is_type_checking_flag(&format!("typing.{path}"))
    }

    fn branch(&self, if_stmt: &IfStmt) -> Branch {
        let Some(condition) = if_stmt.condition().and_then(Expr::unparenthesized) else {
            return Branch::All;
        };
        if self.is_type_checking(&condition) {
            return Branch::Body;
        }
        match &condition {
            Expr::Unary(unary) if unary.op() == Some(SyntaxKind::NOT_KW) => {
                match unary.operand().and_then(Expr::unparenthesized) {
                    Some(operand) if self.is_type_checking(&operand) => Branch::Else,
                    _ => Branch::All,
                }
            }
            _ => Branch::All,
        }
    }

    /// The statements a walk visits, with `if` and `try` blocks flattened.
    ///
    /// With `collect_imports`, import statements are recorded as bindings when
    /// reached, so later `TYPE_CHECKING` tests see earlier imports.
    pub fn visible(&mut self, statements: impl Iterator<Item = Stmt>, collect_imports: bool) -> Vec<Stmt> {
        let mut out = Vec::new();
        self.flatten(statements, collect_imports, &mut out);
        out
    }

    fn flatten(&mut self, statements: impl Iterator<Item = Stmt>, collect_imports: bool, out: &mut Vec<Stmt>) {
        for stmt in statements {
            match stmt {
                Stmt::If(if_stmt) => {
                    let body = if_stmt.body();
                    let elifs = if_stmt.elif_clauses();
                    let orelse = if_stmt.else_clause().and_then(|e| e.body());
                    match self.branch(&if_stmt) {
                        Branch::Body => {
                            if let Some(body) = body {
                                self.flatten(body.statements(), collect_imports, out);
                            }
                        }
                        Branch::Else => {
                            if let Some(orelse) = orelse {
                                self.flatten(orelse.statements(), collect_imports, out);
                            }
                        }
                        Branch::All => {
                            let blocks = body
                                .into_iter()
                                .chain(elifs.iter().filter_map(|e| e.body()))
                                .chain(orelse);
                            for block in blocks {
                                self.flatten(block.statements(), collect_imports, out);
                            }
                        }
                    }
                }
                Stmt::Try(try_stmt) => {
                    let blocks = try_stmt
                        .body()
                        .into_iter()
                        .chain(try_stmt.else_clause().and_then(|e| e.body()))
                        .chain(try_stmt.finally_clause().and_then(|f| f.body()));
                    for block in blocks {
                        self.flatten(block.statements(), collect_imports, out);
                    }
                }
                Stmt::Import(import) if collect_imports => self.collect_import(&import),
                Stmt::ImportFrom(import) if collect_imports => self.collect_import_from(&import),
                other => out.push(other),
            }
        }
    }

    /// Pass 2: build the declarations of one scope.
    pub fn declarations(&mut self, statements: &[Stmt], scope: Scope) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        for stmt in statements {
            let order = declarations.len();
            match stmt {
                Stmt::FunctionDef(func) => declarations.extend(self.function(func, order)),
                Stmt::ClassDef(class) => declarations.extend(self.class(class, order)),
                Stmt::Assign(assign) => self.assignment(assign, scope, &mut declarations),
                Stmt::AnnAssign(assign) => self.annotated_assignment(assign, scope, &mut declarations),
                Stmt::AugAssign(assign) => self.augmented_assignment(assign, scope),
                Stmt::TypeAlias(alias) => declarations.extend(self.type_alias(alias, order)),
                Stmt::Expr(expr) => self.expression_statement(expr, scope),
                Stmt::Import(_) | Stmt::ImportFrom(_) => self.ignore("import outside module scope", stmt.syntax().text_range()),
                Stmt::Other(node) if node.kind() == SyntaxKind::PASS_STMT => {}
                Stmt::Other(node) => self.ignore(&format!("{:?}", node.kind()), node.text_range()),
                Stmt::If(_) | Stmt::Try(_) => {}
            }
        }
        for (order, declaration) in declarations.iter_mut().enumerate() {
            declaration.order = order;
        }
        declarations
    }
}
