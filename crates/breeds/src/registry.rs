#![forbid(unsafe_code)]

use crate::BreedError;
use serde::Deserialize;
use std::time::Duration;

/// Authoritative source of breed names.
pub trait BreedRegistry: Send + Sync {
    fn fetch_breeds(&self) -> Result<Vec<String>, BreedError>;
}

/// Fetches the full breed list over HTTP on every call.
#[derive(Debug, Clone)]
pub struct HttpBreedRegistry {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpBreedRegistry {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, BreedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl BreedRegistry for HttpBreedRegistry {
    fn fetch_breeds(&self) -> Result<Vec<String>, BreedError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(BreedError::Registry(format!("unexpected status {status}")));
        }
        let body = response.text()?;
        let names = parse_breed_names(&body)?;
        tracing::debug!(url = %self.url, breeds = names.len(), "breed registry fetched");
        Ok(names)
    }
}

#[derive(Deserialize)]
struct BreedRecord {
    #[serde(default)]
    name: Option<serde_json::Value>,
}

/// Decodes a JSON array of breed objects, keeping every string `name` field.
/// Objects without a string name are skipped.
pub fn parse_breed_names(body: &str) -> Result<Vec<String>, BreedError> {
    let records: Vec<BreedRecord> = serde_json::from_str(body)
        .map_err(|err| BreedError::Registry(format!("malformed breed list: {err}")))?;
    Ok(records
        .into_iter()
        .filter_map(|record| match record.name {
            Some(serde_json::Value::String(name)) => Some(name),
            _ => None,
        })
        .collect())
}
