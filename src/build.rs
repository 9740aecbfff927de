//! Exports the [`build_site`] function which stitches together the three
//! passes of a build: collecting rendered markdown ([`crate::markdown`]),
//! collecting raw partials ([`crate::partials`]), and compiling every template
//! against both ([`crate::compile`]).

use crate::compile::{Error as CompileError, TemplateCompiler};
use crate::config::Config;
use crate::context::Context;
use crate::markdown::MarkdownCollector;
use crate::partials::PartialCollector;
use crate::walk::{iterate_dir, Error as WalkError};
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// The phases of a build, in the order they run. Each phase is one full pass
/// over a source directory and must finish before the next begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    CollectingMarkdown,
    CollectingPartials,
    Compiling,
}

impl fmt::Display for Phase {
    /// Describes the phase the way it's reported to users.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Phase::CollectingMarkdown => "parsing markdown",
            Phase::CollectingPartials => "parsing partials",
            Phase::Compiling => "compiling HTML",
        })
    }
}

/// What a successful build processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// The number of markdown files rendered.
    pub markdown: usize,

    /// The number of partials collected.
    pub partials: usize,

    /// The number of pages written to the output directory.
    pub pages: usize,
}

/// Builds the site from a [`Config`] object. The first error in any phase
/// aborts the build; pages written before the failure are left on disk.
pub fn build_site(config: &Config) -> Result<Summary> {
    info!(phase = %Phase::CollectingMarkdown, dir = %config.markdown_directory.display(), "starting");
    let mut markdown = MarkdownCollector::new();
    let md_count =
        iterate_dir(&config.markdown_directory, &mut markdown).map_err(Error::Markdown)?;

    info!(phase = %Phase::CollectingPartials, dir = %config.partials_directory.display(), "starting");
    let mut partials = PartialCollector::new();
    let partials_count =
        iterate_dir(&config.partials_directory, &mut partials).map_err(Error::Partials)?;

    // Both mappings are complete; from here on they are only read.
    let context = Context::new(markdown.into_mapping(), partials.into_mapping());

    info!(phase = %Phase::Compiling, dir = %config.template_directory.display(), "starting");
    std::fs::create_dir_all(&config.output_directory).map_err(|err| {
        Error::CreateOutputDirectory {
            path: config.output_directory.clone(),
            err,
        }
    })?;
    let mut compiler = TemplateCompiler::new(context, &config.output_directory)
        .map_err(|err| Error::Compile(WalkError::Visit(err)))?;
    let pages = iterate_dir(&config.template_directory, &mut compiler).map_err(Error::Compile)?;

    let summary = Summary {
        markdown: md_count,
        partials: partials_count,
        pages,
    };
    info!(
        markdown = summary.markdown,
        partials = summary.partials,
        pages = summary.pages,
        output = %config.output_directory.display(),
        "build finished"
    );
    Ok(summary)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Every variant belongs to exactly one
/// [`Phase`], which is named when the error is displayed.
#[derive(Debug)]
pub enum Error {
    /// Returned when the markdown directory can't be read.
    Markdown(WalkError<Infallible>),

    /// Returned when the partials directory can't be read.
    Partials(WalkError<Infallible>),

    /// Returned when the output directory can't be created.
    CreateOutputDirectory { path: PathBuf, err: std::io::Error },

    /// Returned when the template directory can't be read or a template
    /// fails to compile.
    Compile(WalkError<CompileError>),
}

impl Error {
    /// The phase the build failed in.
    pub fn phase(&self) -> Phase {
        match self {
            Error::Markdown(_) => Phase::CollectingMarkdown,
            Error::Partials(_) => Phase::CollectingPartials,
            Error::CreateOutputDirectory { .. } | Error::Compile(_) => Phase::Compiling,
        }
    }
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "error {}: ", self.phase())?;
        match self {
            Error::Markdown(err) => err.fmt(f),
            Error::Partials(err) => err.fmt(f),
            Error::CreateOutputDirectory { path, err } => {
                write!(f, "Creating output directory '{}': {}", path.display(), err)
            }
            Error::Compile(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Markdown(err) => Some(err),
            Error::Partials(err) => Some(err),
            Error::CreateOutputDirectory { path: _, err } => Some(err),
            Error::Compile(err) => Some(err),
        }
    }
}
