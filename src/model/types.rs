//! Type expressions before and after normalization.

use std::fmt;

use smol_str::SmolStr;

/// An annotation as written, before name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawExpr {
    Name(SmolStr),
    Attribute(Box<RawExpr>, SmolStr),
    /// `base[items]`; a tuple index is flattened into `items`.
    Subscript(Box<RawExpr>, Vec<RawExpr>),
    /// A parenthesized tuple, only meaningful as `tuple[()]`.
    Tuple(Vec<RawExpr>),
    /// `[a, b]` inside generic arguments (`Callable[[int], str]`).
    List(Vec<RawExpr>),
    BitOr(Box<RawExpr>, Box<RawExpr>),
    /// Decoded string literal; a string annotation or a `Literal` value.
    Str(String),
    /// A bytes literal, kept as its source token.
    Bytes(String),
    /// Numeric literal text, including any leading `-`.
    Number(String),
    Const(Constant),
    /// Anything else, described for diagnostics.
    Unsupported(&'static str),
}

/// Keyword constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    None,
    True,
    False,
    Ellipsis,
}

impl Constant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Constant::None => "None",
            Constant::True => "True",
            Constant::False => "False",
            Constant::Ellipsis => "...",
        }
    }
}

impl RawExpr {
    /// `a.b.c` for plain names and attribute chains.
    pub fn dotted_path(&self) -> Option<String> {
        match self {
            RawExpr::Name(name) => Some(name.to_string()),
            RawExpr::Attribute(base, attr) => Some(format!("{}.{attr}", base.dotted_path()?)),
            _ => None,
        }
    }

    /// The first segment of a dotted path.
    pub fn root_name(&self) -> Option<&SmolStr> {
        match self {
            RawExpr::Name(name) => Some(name),
            RawExpr::Attribute(base, _) => base.root_name(),
            _ => None,
        }
    }
}

/// Kinds of literal values whose type is obvious from syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Bool,
    Int,
    Str,
    None,
}

impl LiteralKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            LiteralKind::Bool => "bool",
            LiteralKind::Int => "int",
            LiteralKind::Str => "str",
            LiteralKind::None => "None",
        }
    }
}

/// Where a declaration's type stands in the pipeline.
///
/// `Absent` (nothing written) and `Unknown` (inference gave up) render the
/// same way but are kept apart for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeSlot {
    #[default]
    Absent,
    Raw(RawExpr),
    Inferred(LiteralKind),
    Resolved(TypeExpr),
    Unknown,
}

impl TypeSlot {
    pub fn resolved(&self) -> Option<&TypeExpr> {
        match self {
            TypeSlot::Resolved(ty) => Some(ty),
            _ => None,
        }
    }

    /// Written in the source (as opposed to inferred or missing).
    pub fn is_declared(&self) -> bool {
        matches!(self, TypeSlot::Raw(_) | TypeSlot::Resolved(_))
    }
}

/// A normalized type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A resolvable name, dotted as written (`int`, `typing.Any`, `np.ndarray`).
    Name(String),
    /// `base[args]`
    Generic { base: String, args: Vec<TypeExpr> },
    /// `a | b`, flattened, order preserving, without duplicates.
    Union(Vec<TypeExpr>),
    /// `Literal[...]` with rendered values.
    Literal { base: String, values: Vec<String> },
    /// `Callable[[params], returns]`; `None` params means `...`.
    Callable {
        base: String,
        params: Option<Vec<TypeExpr>>,
        returns: Box<TypeExpr>,
    },
    /// A name that could not be resolved, rendered as a string.
    ForwardRef(String),
    Ellipsis,
    /// `[a, b]` as a generic argument.
    List(Vec<TypeExpr>),
    /// `(a, b)`, only as `tuple[()]`.
    Tuple(Vec<TypeExpr>),
    /// A literal value in keyword position (`covariant=True`, `total=False`).
    Constant(String),
}

impl TypeExpr {
    pub fn none() -> Self {
        TypeExpr::Name("None".to_string())
    }

    /// Rendering with forward references unquoted, used for nesting inside a
    /// forward reference.
    pub fn unquoted(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write(&mut out, false);
        out
    }

    fn write(&self, f: &mut impl fmt::Write, quote: bool) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => f.write_str(name),
            TypeExpr::Generic { base, args } => {
                write!(f, "{base}[")?;
                write_list(f, args, quote)?;
                f.write_str("]")
            }
            TypeExpr::Union(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    item.write(f, quote)?;
                }
                Ok(())
            }
            TypeExpr::Literal { base, values } => write!(f, "{base}[{}]", values.join(", ")),
            TypeExpr::Callable { base, params, returns } => {
                write!(f, "{base}[")?;
                match params {
                    Some(params) => {
                        f.write_str("[")?;
                        write_list(f, params, quote)?;
                        f.write_str("]")?;
                    }
                    None => f.write_str("...")?,
                }
                f.write_str(", ")?;
                returns.write(f, quote)?;
                f.write_str("]")
            }
            TypeExpr::ForwardRef(text) if quote => write!(f, "\"{text}\""),
            TypeExpr::ForwardRef(text) => f.write_str(text),
            TypeExpr::Ellipsis => f.write_str("..."),
            TypeExpr::List(items) => {
                f.write_str("[")?;
                write_list(f, items, quote)?;
                f.write_str("]")
            }
            TypeExpr::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items, quote)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            TypeExpr::Constant(text) => f.write_str(text),
        }
    }
}

fn write_list(f: &mut impl fmt::Write, items: &[TypeExpr], quote: bool) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.write(f, quote)?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, true)
    }
}

/// Render a string value as a double-quoted literal.
pub fn quote_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
