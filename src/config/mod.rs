use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub launcher: LauncherConfig,
    pub notify: NotifyConfig,
    pub stream: StreamConfig,
    pub demo: DemoConfig,
    pub agents: AgentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for the container service and the meeting client process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Working directory for every spawned process. Relative paths below resolve against it.
    pub work_dir: Option<PathBuf>,
    pub docker_program: String,
    pub container_name: String,
    pub image: String,
    /// `host:container` port mapping passed to `docker run -p`
    pub port_binding: String,
    pub env_file: String,
    /// Delay between container start and client spawn
    pub startup_delay_ms: u64,
    /// Program used to run the client package (e.g. `uvx`)
    pub client_runner: String,
    pub client_package: String,
    pub llm_provider: String,
    pub llm_model: String,
    pub stt: String,
    pub tts: String,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Used when a start request does not name its own notification URL
    pub default_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub poll_interval_ms: u64,
    pub keep_alive_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub target_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub default_agent: String,
    pub profiles: BTreeMap<String, AgentProfile>,
}

/// Persona selection for the meeting client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub prompt_file: String,
    pub bot_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            // 8000 is taken by the container service
            port: 8080,
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            work_dir: None,
            docker_program: "docker".to_string(),
            container_name: "joinly-server".to_string(),
            image: "ghcr.io/joinly-ai/joinly:latest".to_string(),
            port_binding: "8000:8000".to_string(),
            env_file: ".env".to_string(),
            startup_delay_ms: 2000,
            client_runner: "uvx".to_string(),
            client_package: "joinly-client".to_string(),
            llm_provider: "openai".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            stt: "whisper".to_string(),
            tts: "elevenlabs".to_string(),
            extra_args: vec!["-vv".to_string()],
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            default_url: None,
            timeout_secs: 10,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            keep_alive_secs: 15,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            target_link: "https://meet.google.com/demo-xxx-xxx".to_string(),
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "1".to_string(),
            AgentProfile {
                name: "Agent 1 - CEO Emergency".to_string(),
                prompt_file: "prompt_1.txt".to_string(),
                bot_name: "Hermetica Hack Agent".to_string(),
            },
        );
        profiles.insert(
            "2".to_string(),
            AgentProfile {
                name: "Agent 2 - CEO Enhanced".to_string(),
                prompt_file: "prompt_2.txt".to_string(),
                bot_name: "Hermetica Hack Agent".to_string(),
            },
        );
        Self {
            default_agent: "2".to_string(),
            profiles,
        }
    }
}

impl AgentsConfig {
    /// Looks up a profile by id, falling back to the default agent for unknown or missing ids.
    pub fn resolve(&self, agent_id: Option<&str>) -> Option<(&str, &AgentProfile)> {
        agent_id
            .and_then(|id| self.profiles.get_key_value(id))
            .or_else(|| self.profiles.get_key_value(self.default_agent.as_str()))
            .or_else(|| self.profiles.iter().next())
            .map(|(id, profile)| (id.as_str(), profile))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = global::config_file()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}
