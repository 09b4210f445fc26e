mod cli;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use unigate::StartupError;
use unigate::server;

use crate::cli::{Cli, Command, LogFormat};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.log_format);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, format: LogFormat) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let path = cli
        .global
        .config
        .clone()
        .unwrap_or_else(unigate_config::config_path);
    debug!(path = %path.display(), "loading config");

    let config = unigate_config::load_settings(Some(&path))
        .and_then(unigate_config::Settings::validate)
        .map_err(|source| StartupError::Config {
            path: path.display().to_string(),
            source,
        })?;

    match cli.command {
        Command::Check => {
            print!("{config}");
            Ok(())
        }
        Command::Serve(args) => {
            let mut config = config;
            if let Some(listen) = args.listen {
                config.listen = listen;
            }
            server::serve(&config).await
        }
    }
}
