use super::*;

// ============================================================================
// Root and blocks
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    children_method!(statements, Stmt);
}

ast_node!(Block, BLOCK);

impl Block {
    children_method!(statements, Stmt);
}

// ============================================================================
// Statements
// ============================================================================

/// Any statement in a module, class body or block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Import(ImportStmt),
    ImportFrom(ImportFromStmt),
    Assign(AssignStmt),
    AnnAssign(AnnAssignStmt),
    AugAssign(AugAssignStmt),
    TypeAlias(TypeAliasStmt),
    Expr(ExprStmt),
    If(IfStmt),
    Try(TryStmt),
    /// `pass`, loops, `with`, `match`, `return`, ... (nothing to declare)
    Other(SyntaxNode),
}

impl AstNode for Stmt {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::FUNCTION_DEF
                | SyntaxKind::CLASS_DEF
                | SyntaxKind::IMPORT_STMT
                | SyntaxKind::IMPORT_FROM_STMT
                | SyntaxKind::ASSIGN_STMT
                | SyntaxKind::ANN_ASSIGN_STMT
                | SyntaxKind::AUG_ASSIGN_STMT
                | SyntaxKind::TYPE_ALIAS_STMT
                | SyntaxKind::EXPR_STMT
                | SyntaxKind::IF_STMT
                | SyntaxKind::TRY_STMT
                | SyntaxKind::PASS_STMT
                | SyntaxKind::BREAK_STMT
                | SyntaxKind::CONTINUE_STMT
                | SyntaxKind::RETURN_STMT
                | SyntaxKind::RAISE_STMT
                | SyntaxKind::DEL_STMT
                | SyntaxKind::GLOBAL_STMT
                | SyntaxKind::NONLOCAL_STMT
                | SyntaxKind::ASSERT_STMT
                | SyntaxKind::WHILE_STMT
                | SyntaxKind::FOR_STMT
                | SyntaxKind::WITH_STMT
                | SyntaxKind::MATCH_STMT
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FUNCTION_DEF => Some(Self::FunctionDef(FunctionDef(node))),
            SyntaxKind::CLASS_DEF => Some(Self::ClassDef(ClassDef(node))),
            SyntaxKind::IMPORT_STMT => Some(Self::Import(ImportStmt(node))),
            SyntaxKind::IMPORT_FROM_STMT => Some(Self::ImportFrom(ImportFromStmt(node))),
            SyntaxKind::ASSIGN_STMT => Some(Self::Assign(AssignStmt(node))),
            SyntaxKind::ANN_ASSIGN_STMT => Some(Self::AnnAssign(AnnAssignStmt(node))),
            SyntaxKind::AUG_ASSIGN_STMT => Some(Self::AugAssign(AugAssignStmt(node))),
            SyntaxKind::TYPE_ALIAS_STMT => Some(Self::TypeAlias(TypeAliasStmt(node))),
            SyntaxKind::EXPR_STMT => Some(Self::Expr(ExprStmt(node))),
            SyntaxKind::IF_STMT => Some(Self::If(IfStmt(node))),
            SyntaxKind::TRY_STMT => Some(Self::Try(TryStmt(node))),
            kind if Self::can_cast(kind) => Some(Self::Other(node)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::FunctionDef(n) => n.syntax(),
            Self::ClassDef(n) => n.syntax(),
            Self::Import(n) => n.syntax(),
            Self::ImportFrom(n) => n.syntax(),
            Self::Assign(n) => n.syntax(),
            Self::AnnAssign(n) => n.syntax(),
            Self::AugAssign(n) => n.syntax(),
            Self::TypeAlias(n) => n.syntax(),
            Self::Expr(n) => n.syntax(),
            Self::If(n) => n.syntax(),
            Self::Try(n) => n.syntax(),
            Self::Other(n) => n,
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

ast_node!(Decorator, DECORATOR);

impl Decorator {
    first_child_method!(expr, Expr);
}

ast_node!(FunctionDef, FUNCTION_DEF);

impl FunctionDef {
    children_vec_method!(decorators, Decorator);
    has_token_method!(is_async, ASYNC_KW, "async def f(): ...");
    first_child_method!(type_params, TypeParamList);
    first_child_method!(param_list, ParamList);
    first_child_method!(body, Block);
    wrapped_expr_method!(return_type, RETURN_TYPE, "Get the return annotation (`-> int`).");

    pub fn name(&self) -> Option<Name> {
        find_name(&self.0)
    }
}

ast_node!(ClassDef, CLASS_DEF);

impl ClassDef {
    children_vec_method!(decorators, Decorator);
    first_child_method!(type_params, TypeParamList);
    first_child_method!(arg_list, ArgList);
    first_child_method!(body, Block);

    pub fn name(&self) -> Option<Name> {
        find_name(&self.0)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    children_vec_method!(params, Param);
}

/// The leading marker of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamMarker {
    /// `/`
    Slash,
    /// `*` or `*args`
    Star,
    /// `**kwargs`
    DoubleStar,
}

ast_node!(Param, PARAM);

impl Param {
    token_to_enum_method!(marker, ParamMarker, [
        SLASH => Slash,
        STAR => Star,
        STAR_STAR => DoubleStar,
    ]);
    wrapped_expr_method!(annotation, ANNOTATION, "Get the annotation (`x: int`).");
    wrapped_expr_method!(default, DEFAULT_VALUE, "Get the default value (`x=1`).");

    pub fn name(&self) -> Option<Name> {
        find_name(&self.0)
    }

    pub fn has_default(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::DEFAULT_VALUE)
    }
}

ast_node!(TypeParamList, TYPE_PARAM_LIST);

impl TypeParamList {
    children_vec_method!(params, TypeParam);
}

ast_node!(TypeParam, TYPE_PARAM);

impl TypeParam {
    find_token_kind_method!(marker, [STAR, STAR_STAR], "Get the `*`/`**` marker of a variadic type parameter.");
    wrapped_expr_method!(bound, ANNOTATION, "Get the bound or constraints (`T: int`).");
    wrapped_expr_method!(default, DEFAULT_VALUE, "Get the default (`T = int`).");

    pub fn name(&self) -> Option<Name> {
        find_name(&self.0)
    }
}

// ============================================================================
// Imports
// ============================================================================

ast_node!(ImportStmt, IMPORT_STMT);

impl ImportStmt {
    children_vec_method!(aliases, ImportAlias);
}

ast_node!(ImportFromStmt, IMPORT_FROM_STMT);

impl ImportFromStmt {
    first_child_method!(module, DottedName);
    children_vec_method!(aliases, ImportAlias);
    has_token_method!(is_star, STAR, "from m import *");

    /// Number of leading dots of a relative import.
    pub fn level(&self) -> usize {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| match t.kind() {
                SyntaxKind::DOT => 1,
                SyntaxKind::ELLIPSIS => 3,
                _ => 0,
            })
            .sum()
    }
}

ast_node!(ImportAlias, IMPORT_ALIAS);

impl ImportAlias {
    first_child_method!(name, DottedName);

    /// The `as` binding, if present.
    pub fn alias(&self) -> Option<Name> {
        find_name(&self.0)
    }
}

ast_node!(DottedName, DOTTED_NAME);

impl DottedName {
    pub fn segments(&self) -> Vec<String> {
        tokens_of_kind(&self.0, SyntaxKind::IDENT)
            .map(|t| t.text().to_string())
            .collect()
    }

    pub fn text(&self) -> String {
        self.segments().join(".")
    }
}

// ============================================================================
// Assignments
// ============================================================================

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    children_vec_method!(exprs, Expr);

    /// Every target of a (possibly chained) assignment.
    pub fn targets(&self) -> Vec<Expr> {
        let mut exprs = self.exprs();
        exprs.pop();
        exprs
    }

    pub fn value(&self) -> Option<Expr> {
        let mut exprs = self.exprs();
        if exprs.len() < 2 {
            return None;
        }
        exprs.pop()
    }
}

ast_node!(AnnAssignStmt, ANN_ASSIGN_STMT);

impl AnnAssignStmt {
    first_child_method!(target, Expr);
    wrapped_expr_method!(annotation, ANNOTATION, "Get the annotation (`x: int`).");

    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(AugAssignStmt, AUG_ASSIGN_STMT);

impl AugAssignStmt {
    first_child_method!(target, Expr);

    pub fn op(&self) -> Option<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .find(|k| k.is_augmented_assign())
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(TypeAliasStmt, TYPE_ALIAS_STMT);

impl TypeAliasStmt {
    first_child_method!(type_params, TypeParamList);
    first_child_method!(value, Expr);

    /// The alias name (the IDENT after the `type` soft keyword).
    pub fn name(&self) -> Option<Name> {
        tokens_of_kind(&self.0, SyntaxKind::IDENT)
            .nth(1)
            .and_then(Name::cast)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    first_child_method!(expr, Expr);
}

// ============================================================================
// Control flow that can contain declarations
// ============================================================================

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    first_child_method!(condition, Expr);
    first_child_method!(body, Block);
    children_vec_method!(elif_clauses, ElifClause);
    first_child_method!(else_clause, ElseClause);
}

ast_node!(ElifClause, ELIF_CLAUSE);

impl ElifClause {
    first_child_method!(condition, Expr);
    first_child_method!(body, Block);
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    first_child_method!(body, Block);
}

ast_node!(TryStmt, TRY_STMT);

impl TryStmt {
    first_child_method!(body, Block);
    first_child_method!(else_clause, ElseClause);
    first_child_method!(finally_clause, FinallyClause);
}

ast_node!(FinallyClause, FINALLY_CLAUSE);

impl FinallyClause {
    first_child_method!(body, Block);
}
