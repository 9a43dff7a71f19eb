use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::Parser;
use react_route_sitemap::config::{
    self, BaseUrlSources, RecognizedElementSet, RouteClassMap, SitemapConfig,
};
use react_route_sitemap::{generate_sitemap, logging, project, Error, GenerateReport, UnresolvedPolicy};

const TAG: &str = "(react-route-sitemap)";

#[derive(Parser, Debug)]
#[command(name = "react-route-sitemap", version)]
#[command(about = "Generate a sitemap for Ionic React and React apps", long_about = None)]
struct Cli {
    /// Base URL for your app
    #[arg(short, long)]
    url: Option<String>,

    /// Path to your app's main entry file
    #[arg(short, long)]
    app_path: Option<PathBuf>,

    /// Directory sitemap.xml is written to
    #[arg(short, long)]
    build_path: Option<PathBuf>,

    /// Route classes as pairs: a typed table's element type, then its URL prefix
    /// (e.g. `-p AppPage page`)
    #[arg(short, long, num_args = 1.., value_name = "CLASS PREFIX")]
    paths: Option<Vec<String>>,

    /// JSX elements that declare routes [default: Route IonRoute Redirect]
    #[arg(short, long, num_args = 1.., value_name = "ELEMENT")]
    elements: Option<Vec<String>>,

    /// Include a <lastmod> tag in every entry
    #[arg(short = 't', long, action = clap::ArgAction::Set, default_value_t = true)]
    last_mod: bool,

    /// What to do with dynamic routes that have no page table to expand them
    #[arg(long, value_enum, default_value_t = UnresolvedPolicy::Drop)]
    unresolved: UnresolvedPolicy,

    /// Never ask for the base URL on stdin
    #[arg(long)]
    no_prompt: bool,

    /// Log extraction details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logging(logging::default_filter(cli.verbose));

    match run(cli) {
        Ok(report) => {
            println!(
                "\n{TAG} Sitemap generated successfully at {} ({} urls from {} files)",
                report.output_path.display(),
                report.entries,
                report.files_scanned
            );
            if report.dropped_dynamic > 0 {
                println!(
                    "{TAG} {} dynamic route(s) left out; pass --unresolved keep to emit them as-is",
                    report.dropped_dynamic
                );
            }
        }
        Err(err) => {
            eprintln!("{TAG} Error generating sitemap: {err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<GenerateReport, Error> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::config(format!("unable to determine the current directory: {e}")))?;

    let app_path = config::resolve_app_path(cli.app_path.as_deref(), &cwd)?;
    let route_classes = match &cli.paths {
        Some(values) => RouteClassMap::from_pairs(values)?,
        None => RouteClassMap::default(),
    };
    let elements = match &cli.elements {
        Some(names) => RecognizedElementSet::from_names(names.iter().cloned()),
        None => RecognizedElementSet::default(),
    };
    let build_path = config::absolutize(
        cli.build_path
            .as_deref()
            .unwrap_or(Path::new(config::DEFAULT_BUILD_PATH)),
        &cwd,
    );

    let root = project::find_project_root(&app_path);
    let mut sources = BaseUrlSources {
        answer: None,
        configured: cli.url.clone(),
        homepage: project::read_homepage(&root),
    };
    if cli.url.is_none() && !cli.no_prompt && io::stdin().is_terminal() {
        let default = sources.resolve();
        sources.answer = config::prompt_base_url(&mut io::stdin().lock(), &mut io::stdout(), &default)
            .map_err(|e| Error::config(format!("unable to read the base URL: {e}")))?;
    }

    let mut settings = SitemapConfig::new(&sources.resolve(), app_path, build_path);
    settings.route_classes = route_classes;
    settings.elements = elements;
    settings.include_last_modified = cli.last_mod;
    settings.unresolved = cli.unresolved;

    tracing::debug!(?settings, "resolved configuration");
    generate_sitemap(&settings)
}
