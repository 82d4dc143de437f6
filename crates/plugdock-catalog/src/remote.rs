use std::time::Duration;

use anyhow::{Context, Result};
use plugdock_core::ReleaseChannel;

pub trait RemoteSource: Send + Sync {
    fn fetch_catalog(&self) -> Result<String>;

    fn fetch_manifest(&self, channel: ReleaseChannel, internal_name: &str) -> Result<String>;

    fn download_artifact(
        &self,
        internal_name: &str,
        is_update: bool,
        channel: ReleaseChannel,
    ) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct HttpRemoteSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRemoteSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn get_text(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("request failed: {url}"))?
            .text()
            .with_context(|| format!("failed reading response body: {url}"))
    }
}

impl RemoteSource for HttpRemoteSource {
    fn fetch_catalog(&self) -> Result<String> {
        self.get_text(&format!("{}/plugins/catalog", self.base_url))
    }

    fn fetch_manifest(&self, channel: ReleaseChannel, internal_name: &str) -> Result<String> {
        self.get_text(&format!(
            "{}/plugins/{}/manifest?channel={}",
            self.base_url,
            internal_name,
            channel.as_str()
        ))
    }

    fn download_artifact(
        &self,
        internal_name: &str,
        is_update: bool,
        channel: ReleaseChannel,
    ) -> Result<Vec<u8>> {
        let url = format!(
            "{}/plugins/{}/package?update={}&testing={}",
            self.base_url,
            internal_name,
            is_update,
            channel.is_testing()
        );
        let bytes = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("request failed: {url}"))?
            .bytes()
            .with_context(|| format!("failed reading artifact body: {url}"))?;
        Ok(bytes.to_vec())
    }
}
