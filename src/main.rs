use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use treesite::{Site, build, config, output, serve};

#[derive(Parser)]
#[command(name = "treesite")]
#[command(about = "File-tree static site generator")]
#[command(long_about = "\
File-tree static site generator

The directory tree is the site. Every public file answers one URL route,
served live by the dev server or exported as static files.

Site structure:

  site/
  ├── .treesite.toml               # Optional config (run 'treesite gen-config')
  ├── index.html                   # /
  ├── about.md                     # /about
  ├── blog/
  │   ├── index.j2                 # /blog
  │   └── first-post.md            # /blog/first-post
  ├── assets/
  │   └── style.css                # /assets/style.css (served as-is)
  ├── _theme/                      # Template layouts, never published
  │   └── base.html
  └── _site/                       # Build output, never published

Pages: .html is served verbatim; .md and .j2 are rendered as templates
with the navigation tree in scope as `tree`. Everything else is an asset.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log progress at info level (otherwise RUST_LOG applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export every route into the output directory
    Build {
        /// Output directory (default: output_dir from config, under the root)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the development server
    Serve {
        /// Host to bind (default: serve.host from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: serve.port from config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List every public route and its source file
    Routes {
        /// Print a JSON object of route → source path
        #[arg(long)]
        json: bool,
    },
    /// Resolve and render every route without writing anything
    Check,
    /// Print a stock .treesite.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site = Site::open(&cli.root)?;

    match cli.command {
        Command::Build { output: out } => {
            let output_dir = out.unwrap_or_else(|| site.default_output_dir());
            let summary = build::build(&site, &output_dir)?;
            output::print_build_summary(&summary);
        }
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| site.config().serve.host.clone());
            let port = port.unwrap_or(site.config().serve.port);
            println!("Serving {} at http://{host}:{port}/", site.root().display());
            serve::serve(&site, &host, port)?;
        }
        Command::Routes { json } => {
            let mut entries = Vec::new();
            for route in site.routes() {
                let route = route?;
                let entry = site.resolve(&route)?;
                entries.push((route, entry));
            }
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            if json {
                let map: BTreeMap<&str, String> = entries
                    .iter()
                    .map(|(route, entry)| (route.as_str(), entry.path.display().to_string()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                output::print_routes(site.root(), &entries);
            }
        }
        Command::Check => {
            let mut checked = 0;
            let mut failures = Vec::new();
            for route in site.routes() {
                let route = route?;
                checked += 1;
                if let Err(err) = site.serve(&route) {
                    failures.push((route, err.to_string()));
                }
            }
            output::print_check(checked, &failures);
            if !failures.is_empty() {
                return Err(format!("{} route(s) failed to render", failures.len()).into());
            }
        }
        Command::GenConfig => unreachable!("handled before the site is opened"),
    }

    Ok(())
}
