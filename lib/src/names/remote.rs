use super::NameSource;
use crate::error::{NomenError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use tracing::debug;

#[derive(Deserialize)]
struct NameResponse {
    name: String,
}

/// Names fetched one at a time from an external service.
///
/// No uniqueness is enforced here; if the service repeats itself, the
/// repeat is passed through and the later pairing overwrites the earlier
/// one in the store.
#[derive(Clone, Debug)]
pub struct RemoteNames {
    client: Client,
    url: String,
}

impl RemoteNames {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        RemoteNames {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the service for one name.
    pub async fn request_name(&self) -> Result<String> {
        let (client, url) = (self.client.clone(), self.url.clone());
        // the request runs as its own task so the caller only waits on the handle
        tokio::spawn(fetch_name(client, url))
            .await
            .map_err(|e| NomenError::SourceUnavailable(format!("name request task failed: {}", e)))?
    }
}

async fn fetch_name(client: Client, url: String) -> Result<String> {
    debug!("requesting name from {}", url);
    let response = client.get(&url).send().await?.error_for_status()?;
    let payload: NameResponse = response.json().await?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(NomenError::SourceUnavailable(format!(
            "{} answered with an empty name",
            url
        )));
    }
    Ok(name.to_owned())
}

impl NameSource for RemoteNames {
    fn next_name(&mut self) -> impl Future<Output = Result<String>> + Send {
        let source = self.clone();
        async move { source.request_name().await }
    }
}
