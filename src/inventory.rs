//! RunAbove instance inventory.
//!
//! Thin read-only client over the instance listing endpoint. The rest of the
//! program only consumes the `Instance` shape it returns.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::{CourirError, Result};

const DEFAULT_API_BASE: &str = "https://api.runabove.com/1.0";

/// One compute instance as seen by the provider.
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub ip: String,
    /// Name of the SSH key registered for this instance.
    pub ssh_key_name: String,
}

/// Source of instance records, injectable for tests.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// All instances whose name matches exactly, in discovery order.
    async fn instances_by_name(&self, name: &str) -> Result<Vec<Instance>>;
}

pub struct RunaboveClient {
    client: Client,
    base_url: String,
    application_key: String,
    consumer_key: String,
    region: String,
}

impl RunaboveClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_base_url(config, DEFAULT_API_BASE)
    }

    pub fn with_base_url(config: &AppConfig, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            application_key: config.application_key.clone(),
            consumer_key: config.consumer_key().to_string(),
            region: config.region.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct InstanceData {
    #[serde(rename = "instanceId")]
    instance_id: String,
    name: String,
    #[serde(rename = "ipv4", default)]
    ip: String,
    #[serde(rename = "sshKey")]
    ssh_key: Option<SshKeyRef>,
}

#[derive(Debug, Deserialize)]
struct SshKeyRef {
    name: String,
}

#[async_trait]
impl Inventory for RunaboveClient {
    async fn instances_by_name(&self, name: &str) -> Result<Vec<Instance>> {
        let url = format!("{}/instance", self.base_url);

        tracing::debug!("listing instances in {} from {}", self.region, url);

        let response = self
            .client
            .get(&url)
            .query(&[("region", self.region.as_str())])
            .header("X-Ra-Application", &self.application_key)
            .header("X-Ra-Consumer", &self.consumer_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CourirError::Config(format!(
                "inventory request failed with status {}",
                response.status()
            )));
        }

        let instances: Vec<InstanceData> = response.json().await?;

        Ok(instances
            .into_iter()
            .filter(|i| i.name == name)
            .map(|i| Instance {
                id: i.instance_id,
                name: i.name,
                ip: i.ip,
                ssh_key_name: i.ssh_key.map(|k| k.name).unwrap_or_default(),
            })
            .collect())
    }
}
