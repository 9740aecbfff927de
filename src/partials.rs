//! Defines the [`PartialCollector`], which keeps raw HTML fragments for
//! templates to inline.

use crate::context::Mapping;
use crate::walk::{FileEntry, Visitor};
use std::convert::Infallible;

/// Collects partial files verbatim by name.
#[derive(Default)]
pub struct PartialCollector {
    contents: Mapping,
}

impl PartialCollector {
    pub fn new() -> PartialCollector {
        PartialCollector::default()
    }

    /// Consumes the collector, returning raw contents keyed by file name.
    pub fn into_mapping(self) -> Mapping {
        self.contents
    }
}

impl Visitor for PartialCollector {
    type Error = Infallible;

    fn visit(&mut self, entry: &FileEntry) -> Result<(), Infallible> {
        self.contents.insert(&entry.name, entry.text().into_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::iterate_dir;
    use std::fs;

    #[test]
    fn test_partials_are_kept_verbatim() -> std::io::Result<()> {
        let footer = "<footer>\r\n  {{ not a template }} &amp; ünïcödé\n</footer>";
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("footer.html"), footer)?;
        fs::write(dir.path().join("empty.html"), "")?;
        fs::create_dir(dir.path().join("drafts"))?;
        fs::write(dir.path().join("drafts").join("header.html"), "<header>")?;

        let mut collector = PartialCollector::new();
        iterate_dir(dir.path(), &mut collector).unwrap();
        let partials = collector.into_mapping();

        assert_eq!(2, partials.len());
        assert_eq!(footer.as_bytes(), partials.get("footer.html").unwrap().as_bytes());
        assert_eq!(Some(""), partials.get("empty.html"));
        assert_eq!(None, partials.get("header.html"));
        Ok(())
    }
}
