//! External process orchestration for an operation.
//!
//! A launch runs in three steps:
//! 1. Recreate the container service (blocking, fails the launch on error)
//! 2. After a short delay, spawn the meeting client (detached, a spawn failure is only logged)
//! 3. Notify a third-party URL with the target link (detached, best effort)

pub mod client;
pub mod container;
pub mod notify;

use crate::config::{AgentProfile, LauncherConfig, NotifyConfig};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub use client::ClientProcess;
pub use container::ContainerService;
pub use notify::Notifier;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Command not found: {program}. Make sure it is installed and on PATH.")]
    MissingExecutable { program: String },
    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Container failed to start: {stderr}")]
    ContainerStart { stderr: String },
}

/// Everything a launcher needs to act on one start request.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub target_link: String,
    pub agent_id: String,
    pub agent: AgentProfile,
    pub notify_url: Option<String>,
}

/// Brings up the external collaborators for an operation.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, plan: &LaunchPlan) -> Result<(), LaunchError>;
}

/// Resolves `program` on PATH (or as a path), mapping absence to [`LaunchError::MissingExecutable`].
pub(crate) fn resolve_program(program: &str) -> Result<PathBuf, LaunchError> {
    which::which(program).map_err(|_| LaunchError::MissingExecutable {
        program: program.to_string(),
    })
}

/// Launcher backed by real subprocesses and an HTTP client.
pub struct ProcessLauncher {
    container: ContainerService,
    client: ClientProcess,
    notifier: Notifier,
    startup_delay: Duration,
}

impl ProcessLauncher {
    pub fn new(config: &LauncherConfig, notify: &NotifyConfig) -> Self {
        Self {
            container: ContainerService::new(config),
            client: ClientProcess::new(config),
            notifier: Notifier::new(Duration::from_secs(notify.timeout_secs)),
            startup_delay: Duration::from_millis(config.startup_delay_ms),
        }
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, plan: &LaunchPlan) -> Result<(), LaunchError> {
        // Fail fast on a missing client runner before the container is touched.
        self.client.check_available()?;

        self.container.recreate().await?;

        tokio::time::sleep(self.startup_delay).await;

        info!("Starting {} (agent {})", plan.agent.name, plan.agent_id);
        info!("   Using prompt: {}", plan.agent.prompt_file);
        // The container is already up; the operation stays active without a client.
        if let Err(e) = self.client.spawn_detached(&plan.target_link, &plan.agent) {
            warn!("Meeting client failed to start: {}", e);
        }

        if let Some(url) = plan.notify_url.as_deref() {
            self.notifier
                .spawn_notify(url.to_string(), plan.target_link.clone());
        }

        Ok(())
    }
}
