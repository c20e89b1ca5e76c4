//! docparams CLI - apply parameter values to a YAML or JSON document

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use docparams::{
    collect_refs, to_bool, Config, DocumentValue, FixSuggestion, OutputFormat, ParamError,
    Parameters, Substitutor, TracingSink,
};

#[derive(Parser)]
#[command(name = "docparams")]
#[command(about = "Apply {{ parameter }} values to structured documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Substitute parameters into a document and print the result
    Render {
        /// Path to the YAML or JSON document
        document: PathBuf,

        /// Parameter file (YAML or JSON mapping of name: value)
        #[arg(short, long)]
        params: PathBuf,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Path to a docparams config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum container nesting (overrides config and environment)
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// List placeholder names referenced by a document
    Refs {
        /// Path to the YAML or JSON document
        document: PathBuf,
    },

    /// Coerce one parameter to a strict boolean
    Bool {
        /// Parameter name
        name: String,

        /// Parameter file (YAML or JSON mapping of name: value)
        #[arg(short, long)]
        params: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    // Initialize tracing (stderr, so rendered documents stay clean on stdout)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            document,
            params,
            format,
            config,
            max_depth,
        } => render(&document, &params, format, config.as_deref(), max_depth),
        Commands::Refs { document } => list_refs(&document),
        Commands::Bool { name, params } => coerce_bool(&name, &params),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load_document(path: &Path) -> Result<DocumentValue, ParamError> {
    let text = std::fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_yaml::from_str(&text)?)
    }
}

fn render(
    document: &Path,
    params: &Path,
    format: Option<FormatArg>,
    config: Option<&Path>,
    max_depth: Option<usize>,
) -> Result<(), ParamError> {
    let mut config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_env_overrides()?;
    if let Some(depth) = max_depth {
        config.max_depth = Some(depth);
    }
    if let Some(format) = format {
        config.output = format.into();
    }

    let doc = load_document(document)?;
    let params = Parameters::load(params)?;
    tracing::debug!(
        document = %document.display(),
        params = params.len(),
        max_depth = ?config.max_depth,
        "rendering document"
    );

    let engine = Substitutor::from_config(&config).with_sink(&TracingSink);
    let output = engine.substitute_value(&doc, &params)?;

    match config.output {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&output)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn list_refs(document: &Path) -> Result<(), ParamError> {
    let doc = load_document(document)?;
    for name in collect_refs(&doc) {
        println!("{}", name);
    }
    Ok(())
}

fn coerce_bool(name: &str, params: &Path) -> Result<(), ParamError> {
    let params = Parameters::load(params)?;
    let value = to_bool(params.get(name))?;
    println!("{}", value);
    Ok(())
}
