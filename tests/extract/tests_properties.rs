//! Idempotence and determinism over generated modules.

use proptest::prelude::*;
use stub_extractor::extract_stub;

/// Statement templates; `{n}` is replaced with the snippet's position so
/// names never collide.
const TEMPLATES: &[&str] = &[
    "def func_{n}(a: int, b: str = 'x') -> bool:\n    return True\n",
    "class Class_{n}:\n    attr: int = 0\n\n    def method(self, value: float) -> None:\n        self.value = value\n",
    "CONST_{n} = {n}\n",
    "alias_{n} = list[int]\n",
    "_hidden_{n} = object()\n",
    "async def fetch_{n}(*args, **kwargs):\n    pass\n",
    "class Empty_{n}:\n    def _private(self):\n        pass\n",
    "from typing import Optional\n\ndef maybe_{n}(x: Optional[int] = None) -> Optional[str]:\n    return None\n",
    "def typed_{n}(items: dict[str, list[int]], /, *, flag: bool) -> tuple[int, ...]:\n    return ()\n",
    "def forward_{n}(x: 'Class_0') -> None:\n    pass\n",
    "import os\n\ndef cwd_{n}() -> os.PathLike:\n    return os.getcwd()\n",
    "from typing import TypeVar\n\nT_{n} = TypeVar('T_{n}', bound=int)\n",
    "class Derived_{n}(Exception):\n    code: str = 'E{n}'\n",
    "if True:\n    guarded_{n} = None\n",
    "import sys\n\nversion_{n} = sys.version[:3]\n",
];

fn module() -> impl Strategy<Value = String> {
    prop::collection::vec(0..TEMPLATES.len(), 0..10).prop_map(|picks| {
        picks
            .iter()
            .enumerate()
            .map(|(n, &i)| TEMPLATES[i].replace("{n}", &n.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

proptest! {
    #[test]
    fn stub_of_a_stub_is_itself(source in module()) {
        let stub = extract_stub(&source).map_err(|d| TestCaseError::fail(d.to_string()))?;
        let again = extract_stub(&stub.text).map_err(|d| TestCaseError::fail(d.to_string()))?;
        prop_assert_eq!(again.text, stub.text);
    }

    #[test]
    fn extraction_is_deterministic(source in module()) {
        let first = extract_stub(&source).map_err(|d| TestCaseError::fail(d.to_string()))?;
        let second = extract_stub(&source).map_err(|d| TestCaseError::fail(d.to_string()))?;
        prop_assert_eq!(first, second);
    }
}
