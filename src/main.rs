use clap::{crate_version, App, Arg, ArgMatches};
use docs_builder::build::build_site;
use docs_builder::config::{Config, Overrides, PROJECT_FILE};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let config_help = format!(
        "Project file to load (default: the nearest {})",
        PROJECT_FILE
    );
    let matches = App::new("docs-builder")
        .version(crate_version!())
        .about("Compiles markdown and HTML partials into pages through Go-style templates")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help(&config_help),
        )
        .arg(dir_arg("markdown", "Directory of markdown sources"))
        .arg(dir_arg("partials", "Directory of raw HTML partials"))
        .arg(dir_arg("templates", "Directory of page templates"))
        .arg(dir_arg("output", "Directory compiled pages are written to"))
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log progress (-v) or every file (-vv)"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error loading configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    match build_site(&config) {
        Ok(_) => println!("documentation compiled"),
        Err(e) => {
            error!(phase = %e.phase(), "build failed");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn dir_arg<'a>(name: &'a str, help: &'a str) -> Arg<'a, 'a> {
    Arg::with_name(name)
        .long(name)
        .value_name("DIR")
        .takes_value(true)
        .help(help)
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let overrides = Overrides {
        markdown_directory: matches.value_of("markdown").map(PathBuf::from),
        partials_directory: matches.value_of("partials").map(PathBuf::from),
        template_directory: matches.value_of("templates").map(PathBuf::from),
        output_directory: matches.value_of("output").map(PathBuf::from),
    };
    match matches.value_of("config") {
        Some(path) => Config::from_project_file(&PathBuf::from(path), &overrides),
        None => Config::from_directory(&std::env::current_dir()?, &overrides),
    }
}

// `-v` and `-vv` win over `RUST_LOG`; otherwise `RUST_LOG` applies and
// defaults to warnings only.
fn init_logging(verbosity: u64) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
