use super::*;

// ============================================================================
// Expression
// ============================================================================

/// Any expression node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Name(NameExpr),
    Literal(LiteralExpr),
    String(StringExpr),
    Attribute(AttributeExpr),
    Subscript(SubscriptExpr),
    Call(CallExpr),
    Tuple(TupleExpr),
    List(ListExpr),
    Paren(ParenExpr),
    Bin(BinExpr),
    Unary(UnaryExpr),
    Starred(StarredExpr),
    /// Lambdas, comprehensions, comparisons, ... (never a type)
    Other(SyntaxNode),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_expr() && !matches!(kind, SyntaxKind::DICT_ENTRY | SyntaxKind::COMP_CLAUSE)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NAME_EXPR => Some(Self::Name(NameExpr(node))),
            SyntaxKind::LITERAL_EXPR => Some(Self::Literal(LiteralExpr(node))),
            SyntaxKind::STRING_EXPR => Some(Self::String(StringExpr(node))),
            SyntaxKind::ATTRIBUTE_EXPR => Some(Self::Attribute(AttributeExpr(node))),
            SyntaxKind::SUBSCRIPT_EXPR => Some(Self::Subscript(SubscriptExpr(node))),
            SyntaxKind::CALL_EXPR => Some(Self::Call(CallExpr(node))),
            SyntaxKind::TUPLE_EXPR => Some(Self::Tuple(TupleExpr(node))),
            SyntaxKind::LIST_EXPR => Some(Self::List(ListExpr(node))),
            SyntaxKind::PAREN_EXPR => Some(Self::Paren(ParenExpr(node))),
            SyntaxKind::BIN_EXPR => Some(Self::Bin(BinExpr(node))),
            SyntaxKind::UNARY_EXPR => Some(Self::Unary(UnaryExpr(node))),
            SyntaxKind::STARRED_EXPR => Some(Self::Starred(StarredExpr(node))),
            kind if Self::can_cast(kind) => Some(Self::Other(node)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Name(n) => n.syntax(),
            Self::Literal(n) => n.syntax(),
            Self::String(n) => n.syntax(),
            Self::Attribute(n) => n.syntax(),
            Self::Subscript(n) => n.syntax(),
            Self::Call(n) => n.syntax(),
            Self::Tuple(n) => n.syntax(),
            Self::List(n) => n.syntax(),
            Self::Paren(n) => n.syntax(),
            Self::Bin(n) => n.syntax(),
            Self::Unary(n) => n.syntax(),
            Self::Starred(n) => n.syntax(),
            Self::Other(n) => n,
        }
    }
}

impl Expr {
    /// Dotted form of a name or attribute chain (`a.b.c`), if that is all it is.
    pub fn dotted_path(&self) -> Option<String> {
        match self {
            Self::Name(name) => name.text(),
            Self::Attribute(attr) => {
                let base = attr.base()?.dotted_path()?;
                Some(format!("{base}.{}", attr.attr()?.text()))
            }
            _ => None,
        }
    }

    /// Strip any number of redundant parentheses.
    pub fn unparenthesized(self) -> Option<Expr> {
        match self {
            Self::Paren(paren) => paren.inner()?.unparenthesized(),
            other => Some(other),
        }
    }
}

/// The first non-trivia direct token of a node.
fn first_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())
}

ast_node!(NameExpr, NAME_EXPR);

impl NameExpr {
    pub fn name(&self) -> Option<Name> {
        find_name(&self.0)
    }

    pub fn text(&self) -> Option<String> {
        self.name().map(|n| n.text().to_string())
    }
}

ast_node!(LiteralExpr, LITERAL_EXPR);

impl LiteralExpr {
    /// Kind of the literal token (`INT_NUMBER`, `NONE_KW`, `ELLIPSIS`, ...)
    pub fn kind(&self) -> Option<SyntaxKind> {
        first_significant_token(&self.0).map(|t| t.kind())
    }

    pub fn text(&self) -> String {
        first_significant_token(&self.0)
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }
}

// ============================================================================
// Strings
// ============================================================================

ast_node!(StringExpr, STRING_EXPR);

impl StringExpr {
    /// The literal tokens, in order (implicit concatenation yields several).
    pub fn pieces(&self) -> Vec<SyntaxToken> {
        tokens_of_kind(&self.0, SyntaxKind::STRING).collect()
    }

    pub fn is_bytes(&self) -> bool {
        self.pieces()
            .iter()
            .any(|t| string_prefix(t.text()).contains(['b', 'B']))
    }

    pub fn is_fstring(&self) -> bool {
        self.pieces()
            .iter()
            .any(|t| string_prefix(t.text()).contains(['f', 'F']))
    }

    /// Decoded value of a plain (non-bytes, non-f) string literal.
    pub fn value(&self) -> Option<String> {
        if self.is_bytes() || self.is_fstring() {
            return None;
        }
        let mut out = String::new();
        for piece in self.pieces() {
            out.push_str(&decode_string_token(piece.text())?);
        }
        Some(out)
    }
}

fn string_prefix(text: &str) -> &str {
    let end = text.find(['"', '\'']).unwrap_or(0);
    &text[..end]
}

/// Decode one string token, including its prefix and quotes.
pub fn decode_string_token(text: &str) -> Option<String> {
    let prefix = string_prefix(text);
    let raw = prefix.contains(['r', 'R']);
    let rest = &text[prefix.len()..];
    let quote = rest.chars().next()?;
    let triple: String = std::iter::repeat_n(quote, 3).collect();
    let body = if rest.len() >= 6 && rest.starts_with(&triple) && rest.ends_with(&triple) {
        &rest[3..rest.len() - 3]
    } else if rest.len() >= 2 && rest.ends_with(quote) {
        &rest[1..rest.len() - 1]
    } else {
        return None;
    };
    if raw {
        return Some(body.to_string());
    }
    Some(unescape(body))
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0C'),
            'v' => out.push('\x0B'),
            'x' | 'u' | 'U' => {
                let width = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..width).filter_map(|_| chars.next()).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(escaped);
                        out.push_str(&digits);
                    }
                }
            }
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

// ============================================================================
// Trailers
// ============================================================================

ast_node!(AttributeExpr, ATTRIBUTE_EXPR);

impl AttributeExpr {
    first_child_method!(base, Expr);

    pub fn attr(&self) -> Option<Name> {
        find_name(&self.0)
    }
}

ast_node!(SubscriptExpr, SUBSCRIPT_EXPR);

impl SubscriptExpr {
    first_child_method!(base, Expr);

    /// The index expression; several comma-separated items form a tuple.
    pub fn index(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    first_child_method!(callee, Expr);
    first_child_method!(arg_list, ArgList);

    pub fn args(&self) -> Vec<Arg> {
        self.arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    children_method!(args, Arg);
}

ast_node!(Arg, ARG);

impl Arg {
    first_child_method!(value, Expr);
    find_token_kind_method!(unpack, [STAR, STAR_STAR], "Get the `*`/`**` unpacking marker.");

    /// The keyword of a `name=value` argument.
    pub fn keyword(&self) -> Option<Name> {
        find_name(&self.0)
    }

    /// Any comprehension makes this a bare generator argument.
    pub fn is_generator(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::COMP_CLAUSE)
    }
}

// ============================================================================
// Displays and operators
// ============================================================================

ast_node!(TupleExpr, TUPLE_EXPR);

impl TupleExpr {
    children_vec_method!(elements, Expr);
}

ast_node!(ListExpr, LIST_EXPR);

impl ListExpr {
    children_vec_method!(elements, Expr);

    pub fn is_comprehension(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::COMP_CLAUSE)
    }
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    first_child_method!(inner, Expr);

    pub fn is_generator(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::COMP_CLAUSE)
    }
}

ast_node!(BinExpr, BIN_EXPR);

impl BinExpr {
    first_child_method!(lhs, Expr);

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn op(&self) -> Option<SyntaxKind> {
        first_significant_token(&self.0).map(|t| t.kind())
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    first_child_method!(operand, Expr);

    pub fn op(&self) -> Option<SyntaxKind> {
        first_significant_token(&self.0).map(|t| t.kind())
    }
}

ast_node!(StarredExpr, STARRED_EXPR);

impl StarredExpr {
    first_child_method!(inner, Expr);
}
