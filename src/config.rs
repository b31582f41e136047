use std::path::Path;

use serde::Deserialize;

use crate::error::{CourirError, Result};

/// Where to point users who still need a consumer key.
const CONSUMER_KEY_HELP: &str =
    "consumer_key missing. Create one in the RunAbove console and add it to the config file";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub application_key: String,
    pub application_secret: String,
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    pub ssh_user: String,
    /// Candidate SSH ports, tried in order.
    pub ssh_ports: Vec<String>,
    #[serde(default = "default_key_path")]
    pub key_path: String,
}

fn default_region() -> String {
    "SBG-1".to_string()
}

fn default_key_path() -> String {
    "~/.ssh".to_string()
}

impl AppConfig {
    /// Load and validate the config file (default `~/.courir`).
    pub fn load(path: &str) -> Result<Self> {
        let path = shellexpand::tilde(path).to_string();

        if !Path::new(&path).exists() {
            return Err(CourirError::Config(format!("{} config file not found", path)));
        }

        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| CourirError::Config(format!("{} in config file {}", e, path)))?;

        config.validate(&path)?;

        Ok(config)
    }

    fn validate(&self, path: &str) -> Result<()> {
        if self.application_key.is_empty() {
            return Err(CourirError::Config(format!(
                "application_key not found in {}",
                path
            )));
        }

        if self.application_secret.is_empty() {
            return Err(CourirError::Config(format!(
                "application_secret not found in {}",
                path
            )));
        }

        match &self.consumer_key {
            Some(key) if !key.is_empty() => {}
            _ => {
                return Err(CourirError::Config(format!(
                    "{}: {}",
                    CONSUMER_KEY_HELP, path
                )))
            }
        }

        if self.ssh_user.is_empty() {
            return Err(CourirError::Config(format!("ssh_user not found in {}", path)));
        }

        if self.ssh_ports.is_empty() {
            return Err(CourirError::Config(format!(
                "ssh_ports must list at least one port in {}",
                path
            )));
        }

        self.ssh_ports()?;

        Ok(())
    }

    /// Candidate ports parsed to numbers, preserving config order.
    pub fn ssh_ports(&self) -> Result<Vec<u16>> {
        self.ssh_ports
            .iter()
            .map(|p| {
                p.trim().parse::<u16>().map_err(|_| {
                    CourirError::Config(format!("invalid ssh port '{}' in config", p))
                })
            })
            .collect()
    }

    pub fn consumer_key(&self) -> &str {
        // validate() guarantees the key is present
        self.consumer_key.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const VALID: &str = r#"
application_key: ak
application_secret: as
consumer_key: ck
ssh_user: admin
ssh_ports: ["2222", "22"]
"#;

    #[test]
    fn test_load_valid_config() {
        let file = write_config(VALID);
        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.ssh_user, "admin");
        assert_eq!(config.region, "SBG-1");
        assert_eq!(config.key_path, "~/.ssh");
        assert_eq!(config.ssh_ports().unwrap(), vec![2222, 22]);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/.courir").unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_missing_consumer_key() {
        let file = write_config(
            "application_key: ak\napplication_secret: as\nssh_user: admin\nssh_ports: [\"22\"]\n",
        );
        let err = AppConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("consumer_key"));
    }

    #[test]
    fn test_empty_port_list() {
        let file = write_config(
            "application_key: ak\napplication_secret: as\nconsumer_key: ck\nssh_user: admin\nssh_ports: []\n",
        );
        let err = AppConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("at least one port"));
    }

    #[test]
    fn test_bad_port_string() {
        let file = write_config(
            "application_key: ak\napplication_secret: as\nconsumer_key: ck\nssh_user: admin\nssh_ports: [\"ssh\"]\n",
        );
        let err = AppConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("invalid ssh port"));
    }
}
