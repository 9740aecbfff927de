//! Defines the [`Mapping`] and [`Context`] types: the content collected by the
//! markdown and partials passes, and the bindings templates are rendered
//! against. Both are built once and then only read.

use std::collections::BTreeMap;

/// File name to text, as collected from one source directory. Keys are base
/// names with their extension (e.g., `intro.md`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping(BTreeMap<String, String>);

impl Mapping {
    /// Stores `text` under `name`, replacing any earlier value. Only the
    /// collectors in this crate write to a mapping.
    pub(crate) fn insert(&mut self, name: &str, text: String) {
        self.0.insert(name.to_owned(), text);
    }

    /// Returns the text stored for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, text)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The rendering context shared by every template in a build. Templates see
/// the rendered markdown as `.md` and the raw partials as `.partials`.
#[derive(Clone, Debug, Default)]
pub struct Context {
    /// Rendered HTML keyed by markdown file name.
    pub md: Mapping,

    /// Raw partial contents keyed by file name.
    pub partials: Mapping,
}

impl Context {
    /// Takes ownership of both finished mappings.
    pub fn new(md: Mapping, partials: Mapping) -> Context {
        Context { md, partials }
    }
}
