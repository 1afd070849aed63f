use crate::Result;

/// Statuses that count as a healthy deployment.
pub const HEALTHY_STATUSES: [u16; 4] = [200, 201, 301, 302];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub url: String,
    pub status: u16,
}

impl ProbeOutcome {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        HEALTHY_STATUSES.contains(&self.status)
    }
}

pub trait HealthProbe: Send + Sync {
    /// Waits for the deployment to settle, then requests `https://{domain}/{path}` once.
    ///
    /// # Errors
    ///
    /// Returns an error if no response is received at all.
    fn probe(&self, domain: &str, path: &str) -> Result<ProbeOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: u16) -> ProbeOutcome {
        ProbeOutcome {
            url: "https://jane-billing.dev.acme.io/health".to_string(),
            status,
        }
    }

    #[test]
    fn every_listed_status_is_healthy() {
        for status in HEALTHY_STATUSES {
            assert!(outcome(status).is_healthy(), "{status} should be healthy");
        }
    }

    #[test]
    fn other_statuses_are_unhealthy() {
        for status in [202, 204, 304, 404, 500, 502, 503] {
            assert!(!outcome(status).is_healthy(), "{status} should be unhealthy");
        }
    }
}
