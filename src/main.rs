use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use stock_dashboard::render::{renderer, OutputFormat};
use stock_dashboard::{server, DashboardConfig, Pipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Stock price dashboard from an uploaded CSV")]
struct Cli {
    /// YAML dashboard configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the dashboard for one CSV file
    Render {
        csv: PathBuf,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the upload form and render dashboards for uploaded files
    Serve {
        /// Overrides `server.bind` from the config
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Command::Render {
            csv,
            format,
            output,
        } => {
            let bytes =
                fs::read(&csv).with_context(|| format!("Failed to read {}", csv.display()))?;
            let dashboard = Pipeline::new(&config).run(&bytes);

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(io::stdout().lock()),
            };
            renderer(format).render(&dashboard, &mut *out)?;
            out.flush()?;

            if let Some(error) = dashboard.error() {
                bail!("{}", error);
            }
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
    }

    Ok(())
}
