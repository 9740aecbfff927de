//! Defines the [`TemplateCompiler`], the visitor for the final pass of a
//! build: it parses each template file, renders it against the collected
//! markdown and partials, and writes the result to the output directory under
//! the template's own file name.

use crate::context::Context;
use crate::walk::{FileEntry, Visitor};
use gtmpl::{Template, Value};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Renders template files to HTML pages.
pub struct TemplateCompiler {
    /// The rendering context, converted once and shared by every template.
    context: gtmpl::Context,

    /// The directory receiving one output file per template.
    output_directory: PathBuf,
}

impl TemplateCompiler {
    /// Takes ownership of the finished [`Context`] and prepares it for
    /// rendering. Pages are written to `output_directory`, which must exist.
    pub fn new(context: Context, output_directory: &Path) -> Result<TemplateCompiler> {
        let value = Value::from(&context);
        Ok(TemplateCompiler {
            context: gtmpl::Context::from(value).map_err(Error::Context)?,
            output_directory: output_directory.to_owned(),
        })
    }

    /// Renders a single template source and writes it to
    /// `{output_directory}/{name}`. The template is parsed before the output
    /// file is opened, so a syntax error leaves any previous page untouched.
    pub fn compile(&self, name: &str, source: &[u8]) -> Result<PathBuf> {
        let source = std::str::from_utf8(source).map_err(|err| Error::Encoding {
            name: name.to_owned(),
            err,
        })?;
        let mut template = Template::default();
        template
            .parse(source)
            .map_err(|err| Error::ParseTemplate {
                name: name.to_owned(),
                err,
            })?;

        let path = self.output_directory.join(name);
        let file = File::create(&path).map_err(|err| Error::CreateOutput {
            path: path.clone(),
            err,
        })?;
        let mut writer = BufWriter::new(file);

        if let Err(err) = template.execute(&mut writer, &self.context) {
            // The execution error is the one worth reporting; a failure to
            // flush what was rendered so far is only logged.
            if let Err(flush_err) = writer.flush() {
                warn!(path = %path.display(), error = %flush_err, "flushing partial output");
            }
            return Err(Error::Execute {
                name: name.to_owned(),
                err,
            });
        }
        writer.flush().map_err(|err| Error::Write {
            path: path.clone(),
            err,
        })?;

        debug!(path = %path.display(), "wrote page");
        Ok(path)
    }
}

impl Visitor for TemplateCompiler {
    type Error = Error;

    fn visit(&mut self, entry: &FileEntry) -> Result<()> {
        self.compile(&entry.name, &entry.contents).map(|_| ())
    }
}

/// The result of a fallible template operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error compiling a template into a page.
#[derive(Debug)]
pub enum Error {
    /// Returned when the collected content can't be turned into a template
    /// context.
    Context(String),

    /// Returned when a template file isn't valid UTF-8.
    Encoding {
        name: String,
        err: std::str::Utf8Error,
    },

    /// Returned when a template file has a syntax error.
    ParseTemplate { name: String, err: String },

    /// Returned when the output file can't be created or truncated.
    CreateOutput { path: PathBuf, err: io::Error },

    /// Returned when rendering fails, e.g. on an invalid field access.
    Execute { name: String, err: String },

    /// Returned when the rendered page can't be written out.
    Write { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Context(err) => write!(f, "Building template context: {}", err),
            Error::Encoding { name, err } => {
                write!(f, "Decoding template '{}': {}", name, err)
            }
            Error::ParseTemplate { name, err } => {
                write!(f, "Parsing template '{}': {}", name, err)
            }
            Error::CreateOutput { path, err } => {
                write!(f, "Creating output file '{}': {}", path.display(), err)
            }
            Error::Execute { name, err } => {
                write!(f, "Executing template '{}': {}", name, err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing output file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Context(_) => None,
            Error::Encoding { name: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::CreateOutput { path: _, err } => Some(err),
            Error::Execute { .. } => None,
            Error::Write { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Mapping;
    use std::fs;

    fn fixture_context() -> Context {
        let mut md = Mapping::default();
        md.insert("a.md", String::from("<h1 id=\"a\">A</h1>\n"));
        let mut partials = Mapping::default();
        partials.insert("footer.html", String::from("<footer></footer>"));
        Context::new(md, partials)
    }

    fn fixture(source: &str) -> (tempfile::TempDir, Result<PathBuf>) {
        let out = tempfile::tempdir().unwrap();
        let compiler = TemplateCompiler::new(fixture_context(), out.path()).unwrap();
        let result = compiler.compile("page.html", source.as_bytes());
        (out, result)
    }

    #[test]
    fn test_compile_inlines_partial() -> std::io::Result<()> {
        let (out, result) = fixture("{{ index .partials \"footer.html\" }}");
        let path = result.unwrap();
        assert_eq!(out.path().join("page.html"), path);
        assert_eq!("<footer></footer>", fs::read_to_string(path)?);
        Ok(())
    }

    #[test]
    fn test_compile_inlines_markdown() -> std::io::Result<()> {
        let (out, result) = fixture("<main>{{ index .md \"a.md\" }}</main>");
        result.unwrap();
        assert_eq!(
            "<main><h1 id=\"a\">A</h1>\n</main>",
            fs::read_to_string(out.path().join("page.html"))?
        );
        Ok(())
    }

    #[test]
    fn test_compile_plain_text_passes_through() -> std::io::Result<()> {
        let (out, result) = fixture("<!doctype html>\n<p>static</p>\n");
        result.unwrap();
        assert_eq!(
            "<!doctype html>\n<p>static</p>\n",
            fs::read_to_string(out.path().join("page.html"))?
        );
        Ok(())
    }

    #[test]
    fn test_compile_truncates_existing_page() -> std::io::Result<()> {
        let out = tempfile::tempdir()?;
        fs::write(out.path().join("page.html"), "a much longer page than the new one")?;
        let compiler = TemplateCompiler::new(fixture_context(), out.path()).unwrap();
        compiler.compile("page.html", b"short").unwrap();
        assert_eq!("short", fs::read_to_string(out.path().join("page.html"))?);
        Ok(())
    }

    #[test]
    fn test_compile_syntax_error_leaves_output_untouched() -> std::io::Result<()> {
        let out = tempfile::tempdir()?;
        fs::write(out.path().join("page.html"), "previous build")?;
        let compiler = TemplateCompiler::new(fixture_context(), out.path()).unwrap();

        match compiler.compile("page.html", b"{{ if .md }}never closed") {
            Err(Error::ParseTemplate { name, err: _ }) => assert_eq!("page.html", name),
            other => panic!("wanted a parse error; found {:?}", other),
        }
        assert_eq!("previous build", fs::read_to_string(out.path().join("page.html"))?);
        Ok(())
    }

    #[test]
    fn test_compile_missing_key_fails() {
        let (_out, result) = fixture("{{ index .md \"missing.md\" }}");
        match result {
            Err(Error::Execute { name, err: _ }) => assert_eq!("page.html", name),
            other => panic!("wanted an execution error; found {:?}", other),
        }
    }

    #[test]
    fn test_compile_rejects_invalid_utf8() {
        let out = tempfile::tempdir().unwrap();
        let compiler = TemplateCompiler::new(fixture_context(), out.path()).unwrap();
        match compiler.compile("page.html", &[0xc3, 0x28]) {
            Err(Error::Encoding { name, err: _ }) => assert_eq!("page.html", name),
            other => panic!("wanted an encoding error; found {:?}", other),
        }
        assert!(!out.path().join("page.html").exists());
    }

    #[test]
    fn test_compile_missing_output_directory() {
        let out = tempfile::tempdir().unwrap();
        let missing = out.path().join("missing");
        let compiler = TemplateCompiler::new(fixture_context(), &missing).unwrap();
        match compiler.compile("page.html", b"hello") {
            Err(Error::CreateOutput { path, err: _ }) => {
                assert_eq!(missing.join("page.html"), path)
            }
            other => panic!("wanted a create error; found {:?}", other),
        }
    }
}
