//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Node kinds follow the statement/expression structure of the Python grammar.

/// All syntax kinds (tokens and nodes) of Python source
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation, layout).
/// Nodes are composite (statements, expressions, parameter lists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,
    /// Newline that does not end a logical line (blank line, inside brackets)
    NL,
    /// Backslash-newline joining two physical lines
    LINE_CONTINUATION,

    // =========================================================================
    // LAYOUT (synthesized by the layout pass)
    // =========================================================================
    NEWLINE,
    INDENT,
    DEDENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    INT_NUMBER,   // 42, 0x2A, 1_000
    FLOAT_NUMBER, // 3.14, 1e10
    IMAG_NUMBER,  // 2j
    STRING,       // any prefix, any quoting, f-strings included

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,   // (
    R_PAREN,   // )
    L_BRACKET, // [
    R_BRACKET, // ]
    L_BRACE,   // {
    R_BRACE,   // }
    COLON,     // :
    COMMA,     // ,
    SEMICOLON, // ;
    DOT,       // .
    ELLIPSIS,  // ...
    ARROW,     // ->
    EQ,        // =
    COLON_EQ,  // :=
    AT,        // @

    // =========================================================================
    // OPERATORS
    // =========================================================================
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    STAR_STAR,   // **
    SLASH,       // /
    SLASH_SLASH, // //
    PERCENT,     // %
    LT_LT,       // <<
    GT_GT,       // >>
    AMP,         // &
    PIPE,        // |
    CARET,       // ^
    TILDE,       // ~
    LT,          // <
    GT,          // >
    LT_EQ,       // <=
    GT_EQ,       // >=
    EQ_EQ,       // ==
    BANG_EQ,     // !=

    // Augmented assignment
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    STAR_STAR_EQ,
    SLASH_EQ,
    SLASH_SLASH_EQ,
    PERCENT_EQ,
    AT_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    LT_LT_EQ,
    GT_GT_EQ,

    // =========================================================================
    // KEYWORDS (hard keywords only; `match`, `case`, `type` and `_` stay IDENT)
    // =========================================================================
    FALSE_KW,
    NONE_KW,
    TRUE_KW,
    AND_KW,
    AS_KW,
    ASSERT_KW,
    ASYNC_KW,
    AWAIT_KW,
    BREAK_KW,
    CLASS_KW,
    CONTINUE_KW,
    DEF_KW,
    DEL_KW,
    ELIF_KW,
    ELSE_KW,
    EXCEPT_KW,
    FINALLY_KW,
    FOR_KW,
    FROM_KW,
    GLOBAL_KW,
    IF_KW,
    IMPORT_KW,
    IN_KW,
    IS_KW,
    LAMBDA_KW,
    NONLOCAL_KW,
    NOT_KW,
    OR_KW,
    PASS_KW,
    RAISE_KW,
    RETURN_KW,
    TRY_KW,
    WHILE_KW,
    WITH_KW,
    YIELD_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,

    // =========================================================================
    // NODES - Module structure
    // =========================================================================
    SOURCE_FILE,
    BLOCK,
    DECORATOR,

    // Definitions
    FUNCTION_DEF,
    CLASS_DEF,
    PARAM_LIST,
    PARAM,
    ANNOTATION,
    DEFAULT_VALUE,
    RETURN_TYPE,
    TYPE_PARAM_LIST,
    TYPE_PARAM,
    ARG_LIST,
    ARG,

    // Imports
    IMPORT_STMT,
    IMPORT_FROM_STMT,
    IMPORT_ALIAS,
    DOTTED_NAME,

    // Simple statements
    EXPR_STMT,
    ASSIGN_STMT,
    ANN_ASSIGN_STMT,
    AUG_ASSIGN_STMT,
    TYPE_ALIAS_STMT,
    PASS_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    RETURN_STMT,
    RAISE_STMT,
    DEL_STMT,
    GLOBAL_STMT,
    NONLOCAL_STMT,
    ASSERT_STMT,

    // Compound statements
    IF_STMT,
    ELIF_CLAUSE,
    ELSE_CLAUSE,
    WHILE_STMT,
    FOR_STMT,
    TRY_STMT,
    EXCEPT_CLAUSE,
    FINALLY_CLAUSE,
    WITH_STMT,
    WITH_ITEM,
    MATCH_STMT,
    CASE_CLAUSE,
    GUARD,
    PATTERN,

    // =========================================================================
    // NODES - Expressions
    // =========================================================================
    NAME_EXPR,
    LITERAL_EXPR,
    STRING_EXPR,
    ATTRIBUTE_EXPR,
    SUBSCRIPT_EXPR,
    SLICE_EXPR,
    CALL_EXPR,
    TUPLE_EXPR,
    PAREN_EXPR,
    LIST_EXPR,
    SET_EXPR,
    DICT_EXPR,
    DICT_ENTRY,
    COMP_CLAUSE,
    BIN_EXPR,
    BOOL_EXPR,
    COMPARE_EXPR,
    UNARY_EXPR,
    LAMBDA_EXPR,
    TERNARY_EXPR,
    STARRED_EXPR,
    DOUBLE_STARRED_EXPR,
    YIELD_EXPR,
    AWAIT_EXPR,
    NAMED_EXPR,

    // Must be last
    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, comment, or non-logical newline)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::COMMENT | Self::NL | Self::LINE_CONTINUATION
        )
    }

    /// Check if this is a hard keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::FALSE_KW as u16) && (self as u16) <= (Self::YIELD_KW as u16)
    }

    /// Check if this is an augmented assignment operator (`+=`, `|=`, ...)
    pub fn is_augmented_assign(self) -> bool {
        (self as u16) >= (Self::PLUS_EQ as u16) && (self as u16) <= (Self::GT_GT_EQ as u16)
    }

    /// Check if this is a literal number token
    pub fn is_number(self) -> bool {
        matches!(self, Self::INT_NUMBER | Self::FLOAT_NUMBER | Self::IMAG_NUMBER)
    }

    /// Human-readable name used in "expected ..." syntax errors
    pub fn display_name(self) -> &'static str {
        match self {
            Self::NEWLINE => "newline",
            Self::INDENT => "indented block",
            Self::DEDENT => "dedent",
            Self::IDENT => "identifier",
            Self::STRING => "string",
            Self::L_PAREN => "'('",
            Self::R_PAREN => "')'",
            Self::L_BRACKET => "'['",
            Self::R_BRACKET => "']'",
            Self::L_BRACE => "'{'",
            Self::R_BRACE => "'}'",
            Self::COLON => "':'",
            Self::COMMA => "','",
            Self::EQ => "'='",
            Self::DOT => "'.'",
            Self::ARROW => "'->'",
            Self::AS_KW => "'as'",
            Self::IN_KW => "'in'",
            Self::ELSE_KW => "'else'",
            Self::IMPORT_KW => "'import'",
            _ => "token",
        }
    }

    /// Check if this is an expression node kind
    pub fn is_expr(self) -> bool {
        (self as u16) >= (Self::NAME_EXPR as u16) && (self as u16) <= (Self::NAMED_EXPR as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PythonLanguage {}

impl rowan::Language for PythonLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<PythonLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<PythonLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<PythonLanguage>;
