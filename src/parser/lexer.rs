//! Logos-based lexer for Python source
//!
//! Produces raw physical tokens. Indentation and logical-line structure are
//! added afterwards by the layout pass in [`super::layout`].

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl<'a> Token<'a> {
    /// A zero-width token synthesized by the layout pass (NEWLINE at EOF, INDENT, DEDENT).
    pub fn synthetic(kind: SyntaxKind, offset: TextSize) -> Self {
        Self {
            kind,
            text: "",
            offset,
        }
    }

    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Describe why the lexer produced an ERROR token.
pub fn describe_error_token(text: &str) -> &'static str {
    let quote_at = text.find(['"', '\'']);
    match quote_at {
        Some(pos) if pos <= 2 && is_string_prefix(&text[..pos]) => "unterminated string literal",
        _ if text.starts_with(|c: char| !c.is_ascii()) => "invalid character in identifier",
        _ => "invalid character",
    }
}

const STRING_PREFIXES: &[&str] = &["", "r", "u", "b", "br", "rb", "f", "fr", "rf"];

fn is_string_prefix(prefix: &str) -> bool {
    STRING_PREFIXES.contains(&prefix.to_ascii_lowercase().as_str())
}

/// Identifiers may contain any Unicode XID characters; the regex over-approximates
/// and this callback rejects what the language does not allow.
fn validate_ident(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let mut chars = lex.slice().chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || unicode_ident::is_xid_start(first))
        && chars.all(unicode_ident::is_xid_continue)
}

/// Consume a string literal body after its prefix and opening quote.
fn lex_string(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let slice = lex.slice();
    let quote = slice.as_bytes()[slice.len() - 1];
    let prefix = &slice[..slice.len() - 1];
    if !is_string_prefix(prefix) {
        return false;
    }
    let is_fstring = prefix.contains(['f', 'F']);
    let rest = lex.remainder().as_bytes();
    let triple = rest.len() >= 2 && rest[0] == quote && rest[1] == quote;
    match scan_string_body(rest, quote, triple, is_fstring) {
        Ok(len) => {
            lex.bump(len);
            true
        }
        Err(len) => {
            lex.bump(len);
            false
        }
    }
}

/// Returns the length of the body including the closing quote(s), or the
/// length consumed before giving up on an unterminated literal.
///
/// Only ASCII bytes are inspected, so every returned length falls on a char boundary.
fn scan_string_body(bytes: &[u8], quote: u8, triple: bool, fstring: bool) -> Result<usize, usize> {
    let mut i = if triple { 2 } else { 0 };
    // Nesting of `{...}` replacement fields in f-strings.
    let mut depth = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\\' => {
                i += 2;
                continue;
            }
            b'\n' | b'\r' if !triple && depth == 0 => return Err(i),
            b'{' if fstring => {
                if depth == 0 && bytes.get(i + 1) == Some(&b'{') {
                    i += 2;
                    continue;
                }
                depth += 1;
            }
            b'}' if fstring && depth > 0 => depth -= 1,
            b'\'' | b'"' if depth > 0 => {
                // A nested literal inside a replacement field.
                let inner = b;
                i += 1;
                while i < bytes.len() && bytes[i] != inner {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ if b == quote && depth == 0 => {
                if !triple {
                    return Ok(i + 1);
                }
                if bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote) {
                    return Ok(i + 3);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(bytes.len())
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    #[regex(r"\\(\r\n|\n|\r)")]
    LineContinuation,

    /// Physical newline; the layout pass decides whether it ends a logical line.
    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"#[^\r\n]*")]
    Comment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*", validate_ident)]
    Ident,

    #[regex(r"[0-9](_?[0-9])*|0[xX](_?[0-9a-fA-F])+|0[oO](_?[0-7])+|0[bB](_?[01])+")]
    Int,

    #[regex(r"[0-9](_?[0-9])*\.([0-9](_?[0-9])*)?([eE][+-]?[0-9](_?[0-9])*)?")]
    #[regex(r"\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?")]
    #[regex(r"[0-9](_?[0-9])*[eE][+-]?[0-9](_?[0-9])*")]
    Float,

    #[regex(r"([0-9](_?[0-9])*(\.([0-9](_?[0-9])*)?)?([eE][+-]?[0-9](_?[0-9])*)?|\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?)[jJ]")]
    Imag,

    /// Prefix and opening quote; the callback consumes the rest of the literal.
    #[regex(r#"[rRuUbBfF]{0,2}["']"#, lex_string)]
    String,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("False")]
    FalseKw,
    #[token("None")]
    NoneKw,
    #[token("True")]
    TrueKw,
    #[token("and")]
    And,
    #[token("as")]
    As,
    #[token("assert")]
    Assert,
    #[token("async")]
    Async,
    #[token("await")]
    Await,
    #[token("break")]
    Break,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("def")]
    Def,
    #[token("del")]
    Del,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("except")]
    Except,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("from")]
    From,
    #[token("global")]
    Global,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("lambda")]
    Lambda,
    #[token("nonlocal")]
    Nonlocal,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("pass")]
    Pass,
    #[token("raise")]
    Raise,
    #[token("return")]
    Return,
    #[token("try")]
    Try,
    #[token("while")]
    While,
    #[token("with")]
    With,
    #[token("yield")]
    Yield,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token(":=")]
    ColonEq,
    #[token("**=")]
    StarStarEq,
    #[token("//=")]
    SlashSlashEq,
    #[token("<<=")]
    LtLtEq,
    #[token(">>=")]
    GtGtEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("@=")]
    AtEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("**")]
    StarStar,
    #[token("//")]
    SlashSlash,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("@")]
    At,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineContinuation => SyntaxKind::LINE_CONTINUATION,
            Newline => SyntaxKind::NEWLINE,
            Comment => SyntaxKind::COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            Int => SyntaxKind::INT_NUMBER,
            Float => SyntaxKind::FLOAT_NUMBER,
            Imag => SyntaxKind::IMAG_NUMBER,
            String => SyntaxKind::STRING,

            // Keywords
            FalseKw => SyntaxKind::FALSE_KW,
            NoneKw => SyntaxKind::NONE_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            And => SyntaxKind::AND_KW,
            As => SyntaxKind::AS_KW,
            Assert => SyntaxKind::ASSERT_KW,
            Async => SyntaxKind::ASYNC_KW,
            Await => SyntaxKind::AWAIT_KW,
            Break => SyntaxKind::BREAK_KW,
            Class => SyntaxKind::CLASS_KW,
            Continue => SyntaxKind::CONTINUE_KW,
            Def => SyntaxKind::DEF_KW,
            Del => SyntaxKind::DEL_KW,
            Elif => SyntaxKind::ELIF_KW,
            Else => SyntaxKind::ELSE_KW,
            Except => SyntaxKind::EXCEPT_KW,
            Finally => SyntaxKind::FINALLY_KW,
            For => SyntaxKind::FOR_KW,
            From => SyntaxKind::FROM_KW,
            Global => SyntaxKind::GLOBAL_KW,
            If => SyntaxKind::IF_KW,
            Import => SyntaxKind::IMPORT_KW,
            In => SyntaxKind::IN_KW,
            Is => SyntaxKind::IS_KW,
            Lambda => SyntaxKind::LAMBDA_KW,
            Nonlocal => SyntaxKind::NONLOCAL_KW,
            Not => SyntaxKind::NOT_KW,
            Or => SyntaxKind::OR_KW,
            Pass => SyntaxKind::PASS_KW,
            Raise => SyntaxKind::RAISE_KW,
            Return => SyntaxKind::RETURN_KW,
            Try => SyntaxKind::TRY_KW,
            While => SyntaxKind::WHILE_KW,
            With => SyntaxKind::WITH_KW,
            Yield => SyntaxKind::YIELD_KW,

            // Multi-character punctuation
            Ellipsis => SyntaxKind::ELLIPSIS,
            Arrow => SyntaxKind::ARROW,
            ColonEq => SyntaxKind::COLON_EQ,
            StarStarEq => SyntaxKind::STAR_STAR_EQ,
            SlashSlashEq => SyntaxKind::SLASH_SLASH_EQ,
            LtLtEq => SyntaxKind::LT_LT_EQ,
            GtGtEq => SyntaxKind::GT_GT_EQ,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusEq => SyntaxKind::MINUS_EQ,
            StarEq => SyntaxKind::STAR_EQ,
            SlashEq => SyntaxKind::SLASH_EQ,
            PercentEq => SyntaxKind::PERCENT_EQ,
            AtEq => SyntaxKind::AT_EQ,
            AmpEq => SyntaxKind::AMP_EQ,
            PipeEq => SyntaxKind::PIPE_EQ,
            CaretEq => SyntaxKind::CARET_EQ,
            StarStar => SyntaxKind::STAR_STAR,
            SlashSlash => SyntaxKind::SLASH_SLASH,
            LtLt => SyntaxKind::LT_LT,
            GtGt => SyntaxKind::GT_GT,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,

            // Single-character punctuation
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Semicolon => SyntaxKind::SEMICOLON,
            Dot => SyntaxKind::DOT,
            Eq => SyntaxKind::EQ,
            At => SyntaxKind::AT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
            Tilde => SyntaxKind::TILDE,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
        }
    }
}
