//! Meeting client process, run detached from the request that started it.

use super::{resolve_program, LaunchError};
use crate::config::{AgentProfile, LauncherConfig};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

pub struct ClientProcess {
    runner: String,
    package: String,
    env_file: String,
    llm_provider: String,
    llm_model: String,
    stt: String,
    tts: String,
    extra_args: Vec<String>,
    work_dir: Option<PathBuf>,
}

impl ClientProcess {
    pub fn new(config: &LauncherConfig) -> Self {
        Self {
            runner: config.client_runner.clone(),
            package: config.client_package.clone(),
            env_file: config.env_file.clone(),
            llm_provider: config.llm_provider.clone(),
            llm_model: config.llm_model.clone(),
            stt: config.stt.clone(),
            tts: config.tts.clone(),
            extra_args: config.extra_args.clone(),
            work_dir: config.work_dir.clone(),
        }
    }

    pub fn check_available(&self) -> Result<(), LaunchError> {
        resolve_program(&self.runner).map(|_| ())
    }

    /// Arguments passed to the runner, package name first.
    pub fn args(&self, target_link: &str, agent: &AgentProfile) -> Vec<String> {
        let mut args = vec![
            self.package.clone(),
            "--env-file".to_string(),
            self.env_file.clone(),
            "--name".to_string(),
            agent.bot_name.clone(),
            "--llm-provider".to_string(),
            self.llm_provider.clone(),
            "--llm-model".to_string(),
            self.llm_model.clone(),
            "--prompt-file".to_string(),
            agent.prompt_file.clone(),
            "--stt".to_string(),
            self.stt.clone(),
            "--tts".to_string(),
            self.tts.clone(),
            target_link.to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Spawns the client and returns immediately. Output and exit status only reach the logs.
    pub fn spawn_detached(&self, target_link: &str, agent: &AgentProfile) -> Result<(), LaunchError> {
        let program = resolve_program(&self.runner)?;

        let mut cmd = Command::new(&program);
        cmd.args(self.args(target_link, agent))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| LaunchError::Io {
            program: self.runner.clone(),
            source,
        })?;

        info!("Meeting client started, joining: {}", target_link);

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_output("client stdout", stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_output("client stderr", stderr));
        }

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => info!("Meeting client exited"),
                Ok(status) => warn!("Meeting client exited with status {}", status),
                Err(e) => warn!("Failed to wait for meeting client: {}", e),
            }
        });

        Ok(())
    }
}

async fn forward_output<R>(label: &'static str, reader: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => debug!("{}: {}", label, line),
            Ok(None) => break,
            Err(e) => {
                debug!("{} closed: {}", label, e);
                break;
            }
        }
    }
}
