use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub fcm_project_id: String,

    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,

    /// Static bearer token; when unset, credentials come from gcp_auth.
    #[serde(default)]
    pub fcm_access_token: Option<String>,

    #[serde(default = "default_multicast_concurrency")]
    pub multicast_concurrency: usize,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn default_fcm_base_url() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_multicast_concurrency() -> usize {
    16
}

fn default_server_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;

        if config.multicast_concurrency == 0 {
            return Err(anyhow!("MULTICAST_CONCURRENCY must be at least 1"));
        }

        Ok(config)
    }

    pub fn fcm_send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.fcm_base_url.trim_end_matches('/'),
            self.fcm_project_id
        )
    }
}
