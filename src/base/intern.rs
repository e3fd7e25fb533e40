use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

/// An interned, cheaply-clonable identifier (schema/statement name, prefix,
/// namespace URI). Backed by `SmolStr` so short names (the overwhelming
/// majority of YANG identifiers) never allocate.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_str(), f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0.as_str(), f)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::borrow::Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

/// Deduplicating string interner, keyed on content.
///
/// Namespace URIs repeat on every node of a module's tree, so interning
/// them once and passing a small copyable `Name` around avoids the
/// per-node allocation a `String` would cost.
#[derive(Default)]
pub struct Interner {
    map: FxHashMap<SmolStr, Name>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: impl AsRef<str>) -> Name {
        let s = s.as_ref();
        if let Some(existing) = self.map.get(s) {
            return existing.clone();
        }
        let name = Name::new(s);
        self.map.insert(SmolStr::new(s), name.clone());
        name
    }
}
