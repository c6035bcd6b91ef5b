//! CLI for `apim-rest-openapi`.
//!
//! Inspects the protected-resource index the way a running control plane
//! would build it.
//!
//! # Subcommands
//!
//! ```text
//! # List every protected resource of the publisher API
//! apim-rest-openapi resources --surface publisher
//!
//! # Which resource guards a request?
//! apim-rest-openapi match --surface store GET /api/am/store/v0.11/applications/42
//!
//! # Scope declarations, read from an on-disk document
//! apim-rest-openapi scopes --surface publisher --definition api/publisher-api.json
//!
//! # Point both surfaces at on-disk documents
//! apim-rest-openapi resources --surface store --config api/index.yaml
//! ```

#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use apim_rest_openapi::{ApiSurface, IndexConfig, ResourceMapIndex};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Protected-resource index inspector for API-management REST APIs.
#[derive(Parser)]
#[command(name = "apim-rest-openapi", version, about)]
enum Cli {
    /// List the protected resources of a surface in declaration order.
    Resources(SurfaceArgs),

    /// Print the first resource guarding a request, or `unprotected`.
    Match(MatchArgs),

    /// List the scope declarations of a surface.
    Scopes(SurfaceArgs),
}

#[derive(Parser)]
struct SurfaceArgs {
    /// API surface: `store` or `publisher`.
    #[arg(short, long)]
    surface: ApiSurface,

    /// Path to an index config YAML file.
    ///
    /// Provides definition document paths and the default log filter.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Definition document for `--surface`.
    /// Overrides the path from the config file.
    #[arg(short, long)]
    definition: Option<PathBuf>,
}

#[derive(Parser)]
struct MatchArgs {
    #[command(flatten)]
    target: SurfaceArgs,

    /// HTTP method of the request (case-insensitive).
    method: String,

    /// Request path, optionally with base path and query string.
    path: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Resources(args) => run_resources(&args),
        Cli::Match(args) => run_match(&args),
        Cli::Scopes(args) => run_scopes(&args),
    }
}

/// Load config (if provided), install logging, apply CLI overrides.
fn setup(args: &SurfaceArgs) -> anyhow::Result<ResourceMapIndex> {
    let mut config = match &args.config {
        Some(path) => IndexConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => IndexConfig::default(),
    };

    init_tracing(&config);

    if let Some(definition) = &args.definition {
        match args.surface {
            ApiSurface::Store => config.store_definition = Some(definition.clone()),
            ApiSurface::Publisher => config.publisher_definition = Some(definition.clone()),
        }
    }

    match config.definition(args.surface) {
        Some(path) => eprintln!("Using {} definition: {}", args.surface, path.display()),
        None => eprintln!("Using bundled {} definition", args.surface),
    }

    Ok(ResourceMapIndex::new(config.source()))
}

/// `RUST_LOG` wins over the config's `log_filter`.
fn init_tracing(config: &IndexConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_resources(args: &SurfaceArgs) -> anyhow::Result<()> {
    let index = setup(args)?;
    let resources = index
        .try_get_index(args.surface)
        .with_context(|| format!("Failed to build {} index", args.surface))?;

    if let Some(base) = resources.base_path() {
        println!("basePath: {base}");
    }
    for resource in &resources {
        println!("{resource}");
    }
    eprintln!("{} protected resources", resources.len());

    Ok(())
}

fn run_match(args: &MatchArgs) -> anyhow::Result<()> {
    let index = setup(&args.target)?;
    let resources = index
        .try_get_index(args.target.surface)
        .with_context(|| format!("Failed to build {} index", args.target.surface))?;

    match resources.find(&args.method, &args.path) {
        Some(resource) => println!("{resource}"),
        None => println!("unprotected"),
    }

    Ok(())
}

fn run_scopes(args: &SurfaceArgs) -> anyhow::Result<()> {
    let index = setup(args)?;
    let scopes = index.scopes(args.surface);

    for scope in &scopes {
        println!(
            "{}\t{}\t{}\t{}",
            scope.key,
            scope.name,
            scope.roles.join(","),
            scope.description
        );
    }
    eprintln!("{} scopes", scopes.len());

    Ok(())
}
