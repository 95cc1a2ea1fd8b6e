use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use uuid::Uuid;

use folio_core::{Environment, SecurityEvent, SecurityLogger};

use crate::error::{ApiError, ApiResult};

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

const fn nonzero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(v) => v,
        None => panic!("limit must be non-zero"),
    }
}

/// One named limit: `max` requests per `window`, tracked per key.
struct LimitScope {
    name: &'static str,
    max: NonZeroU32,
    window: Duration,
    limiter: KeyedLimiter,
}

impl LimitScope {
    fn new(name: &'static str, max: NonZeroU32, window: Duration) -> Self {
        // governor replenishes continuously rather than in fixed windows:
        // one permit every window/max, with the full budget available as burst.
        let quota = Quota::with_period(window / max.get())
            .expect("replenish period is non-zero")
            .allow_burst(max);
        Self {
            name,
            max,
            window,
            limiter: RateLimiter::keyed(quota),
        }
    }

    fn check(&self, key: &str, ip: &str) -> ApiResult<()> {
        if self.limiter.check_key(&key.to_string()).is_err() {
            SecurityLogger::log_event(SecurityEvent::RateLimitExceeded {
                scope: self.name,
                key: key.to_string(),
                ip_address: ip.to_string(),
            });
            return Err(ApiError::RateLimited {
                scope: self.name,
                limit: self.max.get(),
                retry_after_secs: self.window.as_secs(),
            });
        }
        Ok(())
    }
}

/// The four limit scopes, mirroring the brute-force and abuse policies:
///
/// * global: 100 requests / 15 min per IP, skipped in development
/// * auth:   5 requests / 15 min per IP, never skipped
/// * admin:  300 requests / 15 min per authenticated user, skipped in development
/// * strict: 3 requests / hour per IP, for sensitive operations
pub struct RateLimitManager {
    environment: Environment,
    global: LimitScope,
    auth: LimitScope,
    admin: LimitScope,
    strict: LimitScope,
}

const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);
const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

impl RateLimitManager {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            global: LimitScope::new("global", nonzero(100), FIFTEEN_MINUTES),
            auth: LimitScope::new("auth", nonzero(5), FIFTEEN_MINUTES),
            admin: LimitScope::new("admin", nonzero(300), FIFTEEN_MINUTES),
            strict: LimitScope::new("strict", nonzero(3), ONE_HOUR),
        }
    }

    pub fn check_global(&self, ip: &str) -> ApiResult<()> {
        if self.environment.is_development() {
            return Ok(());
        }
        self.global.check(ip, ip)
    }

    /// Login attempts are limited even in development so the policy stays
    /// testable.
    pub fn check_auth(&self, ip: &str) -> ApiResult<()> {
        self.auth.check(ip, ip)
    }

    /// Keyed by user rather than IP: an authenticated admin behind a shared
    /// proxy should not be throttled by unrelated traffic.
    pub fn check_admin(&self, user_id: Uuid, ip: &str) -> ApiResult<()> {
        if self.environment.is_development() {
            return Ok(());
        }
        self.admin.check(&user_id.to_string(), ip)
    }

    pub fn check_strict(&self, ip: &str) -> ApiResult<()> {
        self.strict.check(ip, ip)
    }
}
