use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use tracing::info;

use crate::Result;
use crate::traits::{HealthProbe, ProbeOutcome};

/// Single GET after a fixed warm-up; redirects are reported, not followed.
pub struct HttpsHealthProbe {
    client: Client,
    warmup: Duration,
    scheme: &'static str,
}

impl HttpsHealthProbe {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(warmup: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().redirect(Policy::none()).build()?,
            warmup,
            scheme: "https",
        })
    }

    #[cfg(test)]
    fn plain_http(mut self) -> Self {
        self.scheme = "http";
        self
    }
}

impl HealthProbe for HttpsHealthProbe {
    fn probe(&self, domain: &str, path: &str) -> Result<ProbeOutcome> {
        if !self.warmup.is_zero() {
            info!(seconds = self.warmup.as_secs(), "waiting for the deployment to settle");
            thread::sleep(self.warmup);
        }
        let url = format!("{}://{domain}/{}", self.scheme, path.trim_start_matches('/'));
        let response = self.client.get(&url).send()?;
        let status = response.status().as_u16();
        info!(url = %url, status, "health probe answered");
        Ok(ProbeOutcome { url, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::serve_once;

    #[test]
    fn reports_the_status_and_requested_path() -> anyhow::Result<()> {
        let (addr, server) = serve_once("200 OK")?;
        let probe = HttpsHealthProbe::new(Duration::ZERO)?.plain_http();

        let outcome = probe.probe(&addr, "health")?;

        assert_eq!(outcome.status, 200);
        assert!(outcome.is_healthy());
        assert_eq!(outcome.url, format!("http://{addr}/health"));
        let request = server.join().map_err(|_| anyhow::anyhow!("server panicked"))?;
        assert!(request.starts_with("GET /health HTTP/1.1"));
        Ok(())
    }

    #[test]
    fn redirects_are_observed_not_followed() -> anyhow::Result<()> {
        let (addr, server) = serve_once("301 Moved Permanently\r\nlocation: http://127.0.0.1:9/elsewhere")?;
        let probe = HttpsHealthProbe::new(Duration::ZERO)?.plain_http();

        let outcome = probe.probe(&addr, "/")?;
        server.join().map_err(|_| anyhow::anyhow!("server panicked"))?;

        assert_eq!(outcome.status, 301);
        assert!(outcome.is_healthy());
        Ok(())
    }

    #[test]
    fn server_errors_are_unhealthy() -> anyhow::Result<()> {
        let (addr, server) = serve_once("503 Service Unavailable")?;
        let probe = HttpsHealthProbe::new(Duration::ZERO)?.plain_http();

        let outcome = probe.probe(&addr, "health")?;
        server.join().map_err(|_| anyhow::anyhow!("server panicked"))?;

        assert_eq!(outcome.status, 503);
        assert!(!outcome.is_healthy());
        Ok(())
    }
}
