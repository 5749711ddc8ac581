//! Startup sequence of the updater binary and the exit status it ends with.
//!
//! The binary only parses arguments, reads the configuration and builds the concrete clients.
//! Everything from the dummy-config check to the final exit status happens in [`start()`].

use std::{fmt::Display, process::ExitCode, sync::Arc};

use log::{error, info, trace};
use tokio::task;
use tokio_util::sync::CancellationToken;

use crate::{
    config::{Config, ConfigError, LoadedConfig},
    ipv4source::Ipv4Source,
    provider::Provider,
    schedule::{Schedule, Scheduler},
    updater::Updater,
};

/// What the application should do once it is set up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    /// Validate credentials and zone access, then exit
    Check,
    /// Keep records up-to-date according to the schedule
    Update(Schedule),
}

/// Final status of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exit {
    Success,
    Failure,
}
impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

/// Run the application with an already loaded configuration.
///
/// `build` creates the updater from the configuration. It is only called for a real (non-dummy)
/// configuration and runs on the blocking thread pool, as do all update cycles.
/// `cancel` stops the update loop between two cycles.
pub async fn start<P, S, E, B>(
    config: Result<LoadedConfig, ConfigError>,
    job: Job,
    cancel: CancellationToken,
    build: B,
) -> Exit
where
    P: Provider + Send + Sync + 'static,
    S: Ipv4Source + Send + Sync + 'static,
    E: Display + Send + 'static,
    B: FnOnce(&Config) -> Result<Updater<P, S>, E> + Send + 'static,
{
    let config = match config {
        Ok(LoadedConfig::Ready(c)) => c,
        Ok(LoadedConfig::Dummy) => {
            info!("Found dummy config. Exiting.");
            return Exit::Success;
        }
        Err(e) => {
            error!("{}", e);
            return Exit::Failure;
        }
    };

    // The provider and source use blocking HTTP clients, which must live outside of the async context
    let updater = match task::spawn_blocking(move || build(&config)).await {
        Ok(Ok(u)) => Arc::new(u),
        Ok(Err(e)) => {
            error!("{}", e);
            return Exit::Failure;
        }
        Err(e) => {
            error!("Setup task failed: {}", e);
            return Exit::Failure;
        }
    };
    info!("Connected to provider");

    let exit = match job {
        Job::Check => check(Arc::clone(&updater)).await,
        Job::Update(schedule) => update(Arc::clone(&updater), schedule, cancel).await,
    };

    if task::spawn_blocking(move || drop(updater)).await.is_err() {
        error!("Failed to shut down HTTP clients cleanly");
    }
    exit
}

async fn check<P, S>(updater: Arc<Updater<P, S>>) -> Exit
where
    P: Provider + Send + Sync + 'static,
    S: Ipv4Source + Send + Sync + 'static,
{
    match task::spawn_blocking(move || updater.validate()).await {
        Ok(Ok(())) => Exit::Success,
        Ok(Err(e)) => {
            error!("Configuration check failed: {}", e);
            Exit::Failure
        }
        Err(e) => {
            error!("Configuration check did not complete: {}", e);
            Exit::Failure
        }
    }
}

async fn update<P, S>(
    updater: Arc<Updater<P, S>>,
    schedule: Schedule,
    cancel: CancellationToken,
) -> Exit
where
    P: Provider + Send + Sync + 'static,
    S: Ipv4Source + Send + Sync + 'static,
{
    let abort = cancel.clone();
    let last = Scheduler::new(schedule, cancel)
        .run(|| {
            let updater = Arc::clone(&updater);
            let abort = abort.clone();
            async move {
                trace!("Starting worker thread");
                match task::spawn_blocking(move || updater.run()).await {
                    Ok(r) => Some(r),
                    Err(e) => {
                        error!("Update task panicked, aborting: {}", e);
                        abort.cancel();
                        None
                    }
                }
            }
        })
        .await;

    let run_once = schedule == Schedule::Once;
    match last {
        // worker panicked
        Some(None) => Exit::Failure,
        Some(Some(Ok(report))) if run_once && !report.is_success() => Exit::Failure,
        Some(Some(Err(_))) if run_once => Exit::Failure,
        _ => Exit::Success,
    }
}
