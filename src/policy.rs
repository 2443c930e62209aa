//! Visibility and decorator policy tables.
//!
//! Every name-based decision the walker and resolver make is looked up here,
//! so the tables can be audited and extended without touching traversal code.
//! Decorator and factory names are canonical dotted paths (`typing.overload`,
//! `builtins.property`); the walker canonicalizes what it reads through the
//! unit's import bindings before asking.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::model::{Role, Visibility};

/// Dunder names that are part of the public surface.
pub const PUBLIC_DUNDERS: &[&str] = &[
    // Construction and lifecycle
    "__init__",
    "__new__",
    "__post_init__",
    "__init_subclass__",
    "__class_getitem__",
    "__del__",
    // Representation
    "__repr__",
    "__str__",
    "__bytes__",
    "__format__",
    "__hash__",
    "__bool__",
    "__sizeof__",
    // Comparison
    "__eq__",
    "__ne__",
    "__lt__",
    "__le__",
    "__gt__",
    "__ge__",
    // Attribute access
    "__getattr__",
    "__getattribute__",
    "__setattr__",
    "__delattr__",
    "__dir__",
    "__get__",
    "__set__",
    "__delete__",
    "__set_name__",
    "__slots__",
    "__match_args__",
    // Containers and iteration
    "__len__",
    "__length_hint__",
    "__getitem__",
    "__setitem__",
    "__delitem__",
    "__missing__",
    "__iter__",
    "__next__",
    "__reversed__",
    "__contains__",
    // Calls and context managers
    "__call__",
    "__enter__",
    "__exit__",
    "__await__",
    "__aiter__",
    "__anext__",
    "__aenter__",
    "__aexit__",
    // Numbers
    "__add__",
    "__radd__",
    "__iadd__",
    "__sub__",
    "__rsub__",
    "__isub__",
    "__mul__",
    "__rmul__",
    "__imul__",
    "__matmul__",
    "__rmatmul__",
    "__imatmul__",
    "__truediv__",
    "__rtruediv__",
    "__itruediv__",
    "__floordiv__",
    "__rfloordiv__",
    "__ifloordiv__",
    "__mod__",
    "__rmod__",
    "__imod__",
    "__divmod__",
    "__rdivmod__",
    "__pow__",
    "__rpow__",
    "__ipow__",
    "__lshift__",
    "__rlshift__",
    "__ilshift__",
    "__rshift__",
    "__rrshift__",
    "__irshift__",
    "__and__",
    "__rand__",
    "__iand__",
    "__xor__",
    "__rxor__",
    "__ixor__",
    "__or__",
    "__ror__",
    "__ior__",
    "__neg__",
    "__pos__",
    "__abs__",
    "__invert__",
    "__complex__",
    "__int__",
    "__float__",
    "__index__",
    "__round__",
    "__trunc__",
    "__floor__",
    "__ceil__",
    // Pickling and copying
    "__reduce__",
    "__reduce_ex__",
    "__getstate__",
    "__setstate__",
    "__getnewargs__",
    "__getnewargs_ex__",
    "__copy__",
    "__deepcopy__",
    // Module level
    "__version__",
];

/// Decorators that mark an overload signature.
pub const OVERLOAD_DECORATORS: &[&str] = &["typing.overload", "typing_extensions.overload"];

/// Decorators that turn a method into a property getter.
pub const PROPERTY_DECORATORS: &[&str] = &[
    "builtins.property",
    "functools.cached_property",
    "abc.abstractproperty",
];

/// `@<name>.<suffix>` accessor decorators of an existing property.
pub const ACCESSOR_SUFFIXES: &[(&str, Role)] = &[
    ("getter", Role::Getter),
    ("setter", Role::Setter),
    ("deleter", Role::Deleter),
];

/// Decorators that change a declaration's interface and so appear in stubs.
pub const PRESERVED_DECORATORS: &[&str] = &[
    "builtins.staticmethod",
    "builtins.classmethod",
    "builtins.property",
    "functools.cached_property",
    "functools.total_ordering",
    "abc.abstractmethod",
    "abc.abstractproperty",
    "typing.overload",
    "typing.final",
    "typing.override",
    "typing.type_check_only",
    "typing.runtime_checkable",
    "typing.dataclass_transform",
    "typing.no_type_check",
    "typing_extensions.overload",
    "typing_extensions.final",
    "typing_extensions.override",
    "typing_extensions.deprecated",
    "typing_extensions.runtime_checkable",
    "typing_extensions.dataclass_transform",
    "warnings.deprecated",
    "dataclasses.dataclass",
    "enum.unique",
];

/// Calls whose result declares a type variable or a new type.
pub const TYPE_VAR_FACTORIES: &[&str] = &[
    "typing.TypeVar",
    "typing.ParamSpec",
    "typing.TypeVarTuple",
    "typing.NewType",
    "typing_extensions.TypeVar",
    "typing_extensions.ParamSpec",
    "typing_extensions.TypeVarTuple",
    "typing_extensions.NewType",
];

/// Names whose truth means "only a type checker is running".
pub const TYPE_CHECKING_FLAGS: &[&str] = &["typing.TYPE_CHECKING", "typing_extensions.TYPE_CHECKING"];

/// Annotations that mark an explicit type alias (`X: TypeAlias = ...`).
pub const TYPE_ALIAS_MARKERS: &[&str] = &["typing.TypeAlias", "typing_extensions.TypeAlias"];

/// Names that resolve without an import.
pub const BUILTIN_NAMES: &[&str] = &[
    "object",
    "type",
    "bool",
    "int",
    "float",
    "complex",
    "str",
    "bytes",
    "bytearray",
    "memoryview",
    "list",
    "tuple",
    "dict",
    "set",
    "frozenset",
    "range",
    "slice",
    "enumerate",
    "zip",
    "map",
    "filter",
    "reversed",
    "property",
    "staticmethod",
    "classmethod",
    "super",
    "None",
    "Ellipsis",
    "NotImplemented",
    "BaseException",
    "BaseExceptionGroup",
    "Exception",
    "ExceptionGroup",
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "EOFError",
    "ImportError",
    "IndexError",
    "KeyError",
    "LookupError",
    "MemoryError",
    "ModuleNotFoundError",
    "NameError",
    "NotImplementedError",
    "OSError",
    "OverflowError",
    "RecursionError",
    "RuntimeError",
    "StopIteration",
    "StopAsyncIteration",
    "SyntaxError",
    "SystemExit",
    "TimeoutError",
    "TypeError",
    "UnicodeError",
    "ValueError",
    "ZeroDivisionError",
    "FileNotFoundError",
    "PermissionError",
    "KeyboardInterrupt",
    "GeneratorExit",
    "Warning",
    "UserWarning",
    "DeprecationWarning",
    "RuntimeWarning",
];

fn table(names: &[&str]) -> FxHashSet<SmolStr> {
    names.iter().map(|&n| SmolStr::new(n)).collect()
}

/// Configuration data for visibility and decorator recognition.
#[derive(Debug, Clone)]
pub struct Policy {
    pub builtins: FxHashSet<SmolStr>,
    pub public_dunders: FxHashSet<SmolStr>,
    pub overload_decorators: FxHashSet<SmolStr>,
    pub property_decorators: FxHashSet<SmolStr>,
    pub accessor_suffixes: Vec<(SmolStr, Role)>,
    pub preserved_decorators: FxHashSet<SmolStr>,
    pub type_var_factories: FxHashSet<SmolStr>,
    pub type_checking_flags: FxHashSet<SmolStr>,
    pub type_alias_markers: FxHashSet<SmolStr>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            builtins: table(BUILTIN_NAMES),
            public_dunders: table(PUBLIC_DUNDERS),
            overload_decorators: table(OVERLOAD_DECORATORS),
            property_decorators: table(PROPERTY_DECORATORS),
            accessor_suffixes: ACCESSOR_SUFFIXES
                .iter()
                .map(|&(suffix, role)| (SmolStr::new(suffix), role))
                .collect(),
            preserved_decorators: table(PRESERVED_DECORATORS),
            type_var_factories: table(TYPE_VAR_FACTORIES),
            type_checking_flags: table(TYPE_CHECKING_FLAGS),
            type_alias_markers: table(TYPE_ALIAS_MARKERS),
        }
    }
}

impl Policy {
    /// Visibility by naming convention alone.
    pub fn visibility(&self, name: &str) -> Visibility {
        if self.public_dunders.contains(name) || !name.starts_with('_') {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }

    /// Role implied by one canonical decorator path on function `name`.
    pub fn decorator_role(&self, name: &str, decorator: &str) -> Option<Role> {
        if self.overload_decorators.contains(decorator) {
            return Some(Role::OverloadCandidate);
        }
        if self.property_decorators.contains(decorator) {
            return Some(Role::Getter);
        }
        let (owner, suffix) = decorator.rsplit_once('.')?;
        if owner != name {
            return None;
        }
        self.accessor_suffixes
            .iter()
            .find(|(s, _)| s == suffix)
            .map(|&(_, role)| role)
    }

    /// Is the decorator kept in the stub?
    ///
    /// Property accessors of the declaration itself are always kept.
    pub fn preserves_decorator(&self, name: &str, decorator: &str) -> bool {
        self.preserved_decorators.contains(decorator)
            || matches!(
                self.decorator_role(name, decorator),
                Some(Role::Getter | Role::Setter | Role::Deleter)
            )
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }

    pub fn is_type_var_factory(&self, callee: &str) -> bool {
        self.type_var_factories.contains(callee)
    }

    pub fn is_type_checking_flag(&self, name: &str) -> bool {
        self.type_checking_flags.contains(name)
    }

    pub fn is_type_alias_marker(&self, name: &str) -> bool {
        self.type_alias_markers.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("public", Visibility::Public)]
    #[case("_private", Visibility::Private)]
    #[case("__mangled", Visibility::Private)]
    #[case("__init__", Visibility::Public)]
    #[case("__repr__", Visibility::Public)]
    #[case("__custom__", Visibility::Private)]
    fn test_visibility(#[case] name: &str, #[case] expected: Visibility) {
        assert_eq!(Policy::default().visibility(name), expected);
    }

    #[rstest]
    #[case("f", "typing.overload", Some(Role::OverloadCandidate))]
    #[case("f", "builtins.property", Some(Role::Getter))]
    #[case("f", "f.setter", Some(Role::Setter))]
    #[case("f", "f.deleter", Some(Role::Deleter))]
    #[case("f", "g.setter", None)]
    #[case("f", "builtins.staticmethod", None)]
    fn test_decorator_role(#[case] name: &str, #[case] decorator: &str, #[case] expected: Option<Role>) {
        assert_eq!(Policy::default().decorator_role(name, decorator), expected);
    }

    #[test]
    fn test_tables_are_extensible() {
        let mut policy = Policy::default();
        assert_eq!(policy.visibility("__custom__"), Visibility::Private);
        policy.public_dunders.insert("__custom__".into());
        assert_eq!(policy.visibility("__custom__"), Visibility::Public);

        assert!(!policy.preserves_decorator("f", "mylib.traced"));
        policy.preserved_decorators.insert("mylib.traced".into());
        assert!(policy.preserves_decorator("f", "mylib.traced"));
    }
}
