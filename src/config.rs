//! Defines the [`Config`] for a build and the ways to load it: from a
//! `docs-builder.yaml` project file, from command-line [`Overrides`], or both.

use anyhow::{anyhow, Context as _, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "docs-builder.yaml";

/// The on-disk shape of a project file. Every key is optional here so that
/// command-line overrides can fill the gaps; [`Config`] requires all four.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct Project {
    markdown_directory: Option<PathBuf>,
    partials_directory: Option<PathBuf>,
    template_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
}

/// Directories given on the command line. Each one takes precedence over the
/// project file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub markdown_directory: Option<PathBuf>,
    pub partials_directory: Option<PathBuf>,
    pub template_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
}

/// Everything a build needs to know. All four directories are required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Markdown sources, rendered and exposed to templates as `.md`.
    pub markdown_directory: PathBuf,

    /// Raw HTML fragments, exposed to templates as `.partials`.
    pub partials_directory: PathBuf,

    /// Page templates; one output page is written per file.
    pub template_directory: PathBuf,

    /// Where compiled pages are written. Created if missing.
    pub output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a [`PROJECT_FILE`] and loads the
    /// first one found. Without a project file, `overrides` must name every
    /// directory.
    pub fn from_directory(dir: &Path, overrides: &Overrides) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            return Config::from_project_file(&path, overrides)
                .with_context(|| format!("Loading configuration from `{}`", path.display()));
        }
        match dir.parent() {
            Some(parent) => Config::from_directory(parent, overrides),
            None => Config::from_overrides(overrides),
        }
    }

    /// Loads a project file. Relative directories in the file are resolved
    /// against the file's own directory.
    pub fn from_project_file(path: &Path, overrides: &Overrides) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)
            .with_context(|| format!("Parsing project file `{}`", path.display()))?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Config::resolve(project, project_root, overrides),
        }
    }

    /// Builds a config from command-line overrides alone. This is what
    /// [`Config::from_directory`] falls back to when no project file exists.
    pub fn from_overrides(overrides: &Overrides) -> Result<Config> {
        Config::resolve(Project::default(), Path::new(""), overrides)
    }

    fn resolve(project: Project, project_root: &Path, overrides: &Overrides) -> Result<Config> {
        let pick = |flag: &str, key: &str, over: &Option<PathBuf>, file: Option<PathBuf>| {
            match (over, file) {
                (Some(dir), _) => Ok(dir.clone()),
                (None, Some(dir)) => Ok(project_root.join(dir)),
                (None, None) => Err(anyhow!(
                    "Missing `{}`: set it in `{}` or pass `--{}`",
                    key,
                    PROJECT_FILE,
                    flag
                )),
            }
        };

        Ok(Config {
            markdown_directory: pick(
                "markdown",
                "markdown_directory",
                &overrides.markdown_directory,
                project.markdown_directory,
            )?,
            partials_directory: pick(
                "partials",
                "partials_directory",
                &overrides.partials_directory,
                project.partials_directory,
            )?,
            template_directory: pick(
                "templates",
                "template_directory",
                &overrides.template_directory,
                project.template_directory,
            )?,
            output_directory: pick(
                "output",
                "output_directory",
                &overrides.output_directory,
                project.output_directory,
            )?,
        })
    }
}
