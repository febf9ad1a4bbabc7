use chrono_tz::Tz;
use std::env;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_TIMEZONE: &str = "America/Toronto";
const DEFAULT_SUGGESTION_LIMIT: u32 = 5;
const DEFAULT_VOTE_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Zone in which quota days roll over; fixed per deployment, never the
    /// request's timezone.
    pub quota_timezone: Tz,
    pub daily_suggestion_limit: Option<u32>,
    pub daily_vote_limit: Option<u32>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| {
            tracing::info!("BIND_ADDR not set, using default: {DEFAULT_BIND_ADDR}");
            DEFAULT_BIND_ADDR.to_string()
        });

        let quota_timezone = match env::var("QUOTA_TIMEZONE") {
            Ok(raw) => raw.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!("Invalid QUOTA_TIMEZONE {raw:?}, using {DEFAULT_TIMEZONE}");
                DEFAULT_TIMEZONE.parse().unwrap()
            }),
            Err(_) => DEFAULT_TIMEZONE.parse().unwrap(),
        };

        Self {
            database_url,
            bind_addr,
            quota_timezone,
            daily_suggestion_limit: parse_limit(
                env::var("DAILY_SUGGESTION_LIMIT").ok().as_deref(),
                DEFAULT_SUGGESTION_LIMIT,
            ),
            daily_vote_limit: parse_limit(
                env::var("DAILY_VOTE_LIMIT").ok().as_deref(),
                DEFAULT_VOTE_LIMIT,
            ),
        }
    }
}

/// `None` means enforcement is disabled for that action. Accepts a number,
/// or `disabled`/`none`/`off`.
fn parse_limit(raw: Option<&str>, default: u32) -> Option<u32> {
    match raw {
        None => Some(default),
        Some(s) if matches!(s.to_ascii_lowercase().as_str(), "disabled" | "none" | "off") => None,
        Some(s) => match s.parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::warn!("Invalid daily limit {s:?}, using default {default}");
                Some(default)
            }
        },
    }
}
