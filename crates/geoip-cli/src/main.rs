use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "geoip",
    about = "Decode raw GeoIP lookup replies",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a captured lookup reply (status line, headers and body).
    ///
    /// Exits non-zero unless the reply decodes successfully.
    Parse {
        /// File holding the raw reply bytes, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        path: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Decoder settings (geoip.toml). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Manage geoip.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a geoip.toml with default decoder settings
    Init {
        #[arg(short, long, default_value = "geoip.toml")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("geoip=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { path, format, config } => {
            let success = commands::parse::parse(&path, &format, config.as_deref())?;
            if !success {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { path } => commands::config::init(&path),
        },
    }
}
