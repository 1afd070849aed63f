use std::ops::RangeInclusive;

use rand::Rng;

/// Priorities reserved for host rules on the HTTPS listener.
pub const HTTPS_PRIORITY_RANGE: RangeInclusive<u16> = 1..=1000;

/// Priorities reserved for redirect rules on the HTTP listener.
pub const HTTP_PRIORITY_RANGE: RangeInclusive<u16> = 1001..=2000;

/// Listener-rule priorities for one `create` run.
///
/// The two ranges are disjoint, so an HTTPS priority can never land in the
/// HTTP range or the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerPriorities {
    pub https: u16,
    pub http: u16,
}

impl ListenerPriorities {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            https: rng.gen_range(HTTPS_PRIORITY_RANGE),
            http: rng.gen_range(HTTP_PRIORITY_RANGE),
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::draw(&mut rand::thread_rng())
    }
}
