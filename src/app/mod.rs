use crate::api::{ApiServer, ApiState};
use crate::cli::ServeArgs;
use crate::config::Config;
use crate::launcher::ProcessLauncher;
use crate::operation::OperationStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run_service(config: Config, args: ServeArgs) -> Result<()> {
    info!("Starting Nightfall service");

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    if let Some(dir) = &config.launcher.work_dir {
        if !dir.is_dir() {
            warn!("Launcher work_dir {:?} does not exist", dir);
        }
    }
    if config.agents.profiles.is_empty() {
        warn!("No agent profiles configured; /start will fail until one is added");
    }

    let store = OperationStore::default();
    let launcher = Arc::new(ProcessLauncher::new(&config.launcher, &config.notify));
    let state = ApiState::new(store, launcher, config);

    let server = ApiServer::new(host, port, state);

    tokio::select! {
        result = server.start() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down Nightfall");
            Ok(())
        }
    }
}
