use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vista_compiler::CompilerConfig;
use vista_compiler::config::DEFAULT_PREFIX;

#[derive(Parser)]
#[command(name = "vista", version, about = "Vista template compiler")]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CompileOpts {
    /// Attribute prefix that marks a directive
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,
    /// Report unknown directives
    #[arg(long)]
    diagnostics: bool,
}

impl CompileOpts {
    fn config(&self) -> CompilerConfig {
        CompilerConfig::default()
            .with_prefix(self.prefix.clone())
            .with_diagnostics(self.diagnostics)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and compile a template, then summarize.
    Check {
        input: PathBuf,
        #[command(flatten)]
        opts: CompileOpts,
    },
    /// Bind a template against JSON data and print the markup.
    Render {
        input: PathBuf,
        /// JSON object used as view-model data
        #[arg(long)]
        data: Option<PathBuf>,
        #[command(flatten)]
        opts: CompileOpts,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        1 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Check { input, opts } => {
            let report = vista_cli::check_cmd(&input, opts.config())?;
            println!("{report}");
        }
        Commands::Render { input, data, opts } => {
            let markup = vista_cli::render_cmd(&input, data.as_deref(), opts.config())?;
            println!("{markup}");
        }
    }
    Ok(())
}
