use clouddev_core::ResourceKind;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::debug;

use crate::traits::LogIndex;
use crate::{OperationError, Result};

const INDEX_PATTERN_PATH: &str = "api/index_patterns/index_pattern";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexPattern<'a> {
    title: &'a str,
    time_field_name: &'a str,
}

#[derive(Serialize)]
struct CreateIndexPattern<'a> {
    index_pattern: IndexPattern<'a>,
}

/// Creates index patterns through the Kibana HTTP API.
pub struct KibanaLogIndex {
    client: Client,
    base_url: String,
    user: String,
    password: String,
}

impl KibanaLogIndex {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(kibana_host: &str, user: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: format!("https://{}", kibana_host.trim_end_matches('/')),
            user: user.into(),
            password: password.into(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl LogIndex for KibanaLogIndex {
    fn create_index(&self, pattern: &str) -> Result<()> {
        let url = format!("{}/{INDEX_PATTERN_PATH}", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("kbn-xsrf", "true")
            .basic_auth(&self.user, Some(&self.password))
            .json(&CreateIndexPattern {
                index_pattern: IndexPattern {
                    title: pattern,
                    time_field_name: "@timestamp",
                },
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OperationError::Provider {
                resource: ResourceKind::LogIndex,
                message: format!("Kibana answered {status} for pattern '{pattern}'"),
            });
        }
        debug!(pattern, "index pattern created");
        Ok(())
    }
}
