//! Container service lifecycle (`docker rm -f` then `docker run -d`).

use super::{resolve_program, LaunchError};
use crate::config::LauncherConfig;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

pub struct ContainerService {
    program: String,
    name: String,
    image: String,
    port_binding: String,
    env_file: String,
    work_dir: Option<PathBuf>,
}

impl ContainerService {
    pub fn new(config: &LauncherConfig) -> Self {
        Self {
            program: config.docker_program.clone(),
            name: config.container_name.clone(),
            image: config.image.clone(),
            port_binding: config.port_binding.clone(),
            env_file: config.env_file.clone(),
            work_dir: config.work_dir.clone(),
        }
    }

    pub fn remove_args(&self) -> Vec<String> {
        vec!["rm".to_string(), "-f".to_string(), self.name.clone()]
    }

    pub fn run_args(&self) -> Vec<String> {
        vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            self.name.clone(),
            "-p".to_string(),
            self.port_binding.clone(),
            "--env-file".to_string(),
            self.env_file.clone(),
            self.image.clone(),
        ]
    }

    /// Removes any stale container with the same name, then starts a fresh one.
    pub async fn recreate(&self) -> Result<(), LaunchError> {
        let program = resolve_program(&self.program)?;

        info!("Starting container service {}...", self.name);

        // Removal fails when no such container exists; that is fine.
        let removed = self.command(&program, self.remove_args()).output().await;
        match removed {
            Ok(output) => debug!("Container removal exited with {}", output.status),
            Err(e) => debug!("Container removal failed to run: {}", e),
        }

        let output = self
            .command(&program, self.run_args())
            .output()
            .await
            .map_err(|source| self.io_error(source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(LaunchError::ContainerStart { stderr });
        }

        info!("Container service {} started", self.name);
        Ok(())
    }

    fn command(&self, program: &Path, args: Vec<String>) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn io_error(&self, source: std::io::Error) -> LaunchError {
        if source.kind() == std::io::ErrorKind::NotFound {
            LaunchError::MissingExecutable {
                program: self.program.clone(),
            }
        } else {
            LaunchError::Io {
                program: self.program.clone(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_from_config() {
        let service = ContainerService::new(&LauncherConfig::default());
        assert_eq!(service.remove_args(), vec!["rm", "-f", "joinly-server"]);
        assert_eq!(
            service.run_args(),
            vec![
                "run",
                "-d",
                "--name",
                "joinly-server",
                "-p",
                "8000:8000",
                "--env-file",
                ".env",
                "ghcr.io/joinly-ai/joinly:latest",
            ]
        );
    }

    #[tokio::test]
    async fn test_recreate_nonzero_exit_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-docker");
        std::fs::write(
            &script,
            "#!/bin/sh\nif [ \"$1\" = \"run\" ]; then echo 'port is already allocated' >&2; exit 125; fi\nexit 0\n",
        )
        .unwrap();
        set_executable(&script);

        let config = LauncherConfig {
            docker_program: script.to_string_lossy().to_string(),
            ..LauncherConfig::default()
        };
        let err = ContainerService::new(&config).recreate().await.unwrap_err();
        match err {
            LaunchError::ContainerStart { stderr } => {
                assert_eq!(stderr, "port is already allocated")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_recreate_ignores_failed_removal() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-docker");
        std::fs::write(
            &script,
            "#!/bin/sh\nif [ \"$1\" = \"rm\" ]; then exit 1; fi\nexit 0\n",
        )
        .unwrap();
        set_executable(&script);

        let config = LauncherConfig {
            docker_program: script.to_string_lossy().to_string(),
            work_dir: Some(dir.path().to_path_buf()),
            ..LauncherConfig::default()
        };
        assert!(ContainerService::new(&config).recreate().await.is_ok());
    }

    #[tokio::test]
    async fn test_recreate_missing_program() {
        let config = LauncherConfig {
            docker_program: "no-such-docker-binary-xyz".to_string(),
            ..LauncherConfig::default()
        };
        let err = ContainerService::new(&config).recreate().await.unwrap_err();
        assert!(matches!(err, LaunchError::MissingExecutable { .. }));
    }

    fn set_executable(path: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).unwrap();
    }
}
