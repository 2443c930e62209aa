//! Common source fixtures for tests.

pub const ADD: &str = "def add(x: int, y: int = 0) -> int: return x + y\n";

pub const HELPER_ONLY_CLASS: &str = r#"
class Worker:
    def _helper(self):
        return 42
"#;

pub const OVERLOADED: &str = r#"
from typing import overload

@overload
def f(x: int) -> int: ...
@overload
def f(x: str) -> str: ...
@overload
def f(x: bytes) -> bytes: ...
def f(x):
    return x
"#;

pub const ZETA_ALPHA: &str = r#"
from zeta import Last
from alpha import First

def pair(a: First, b: Last) -> tuple[First, Last]:
    return a, b
"#;

pub const SERVICE_MODULE: &str = r#"
"""Service helpers."""
from __future__ import annotations

import os
from typing import Optional, TYPE_CHECKING

if TYPE_CHECKING:
    from collections.abc import Iterator

DEFAULT_TIMEOUT = 30
_registry = {}


class Client:
    """A client."""

    retries: int = 3

    def __init__(self, root: os.PathLike, timeout: Optional[float] = None) -> None:
        self._root = root

    def _connect(self):
        pass

    def paths(self) -> Iterator[str]:
        yield from ()


def _private_helper():
    return 1


def open_client(root: str) -> Client:
    return Client(root)
"#;

pub const SERVICE_STUB: &str = "\
from collections.abc import Iterator
import os

DEFAULT_TIMEOUT: int

class Client:
    retries: int

    def __init__(self, root: os.PathLike, timeout: float | None = ...) -> None: ...
    def paths(self) -> Iterator[str]: ...

def open_client(root: str) -> Client: ...
";
