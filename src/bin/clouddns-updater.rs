mod cli;

use std::{fs::File, io, process::ExitCode, time::Duration};

use clap::Parser;
use env_logger::{Builder, Target};
use log::info;
use thiserror::Error;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use clouddns_updater::{
    app::{self, Job},
    config::{Config, ConfigError, LoadedConfig},
    ipv4source::{HttpSource, HttpSourceConfig, SourceError},
    provider::{CloudflareProvider, CloudflareProviderConfig, ProviderError},
    schedule::Schedule,
    updater::Updater,
};

use cli::{Cli, Mode};

type CloudflareUpdater = Updater<CloudflareProvider, HttpSource>;

#[derive(Error, Debug)]
enum SetupError {
    #[error("Unable to create provider: {0}")]
    Provider(#[from] ProviderError),
    #[error("Unable to create address source: {0}")]
    Source(#[from] SourceError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.loglevel.into())
        .target(Target::Stdout)
        .init();

    let job = match cli.mode {
        Some(Mode::Check) => Job::Check,
        None if cli.run_once => Job::Update(Schedule::Once),
        None => Job::Update(Schedule::Every(Duration::from_secs(cli.interval))),
    };

    let cancel = CancellationToken::new();
    if let Job::Update(_) = job {
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Interrupted, stopping after the current update");
                interrupt.cancel();
            }
        });
    }

    let source_config = HttpSourceConfig {
        url: cli.ip_endpoint.to_owned(),
    };
    app::start(load_config(&cli), job, cancel, move |config| {
        build_updater(config, &source_config)
    })
    .await
    .into()
}

fn load_config(cli: &Cli) -> Result<LoadedConfig, ConfigError> {
    match &cli.config {
        Some(path) => LoadedConfig::from_reader(File::open(path)?),
        None => LoadedConfig::from_reader(io::stdin().lock()),
    }
}

fn build_updater(
    config: &Config,
    source_config: &HttpSourceConfig,
) -> Result<CloudflareUpdater, SetupError> {
    let provider = CloudflareProvider::from_config(&CloudflareProviderConfig {
        credentials: &config.credentials,
        proxied: config.proxied,
    })?;
    let source = HttpSource::from_config(source_config)?;
    Ok(Updater::new(provider, source, config))
}
