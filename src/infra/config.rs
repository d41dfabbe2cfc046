use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;
use secrecy::SecretString;

fn get_env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

fn get_env_default<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub cors_origin: HeaderValue,
    /// User-facing app origin, used for links in emails (pricing, scheduler).
    pub frontend_url: String,
    pub resend_api_key: SecretString,
    pub email_from: String,
    /// How often the reminder dispatcher looks for due slots.
    pub reminder_poll_seconds: u64,
    /// Spacing between weekly summary sends.
    pub weekly_summary_interval_seconds: u64,
    /// Install the default plan catalog at startup.
    pub seed_plans: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let frontend_url: String =
            get_env_default("FRONTEND_URL", String::from("http://localhost:3000"));
        let resend_api_key = SecretString::new(get_env("RESEND_API_KEY").into());
        let email_from: String =
            get_env_default("EMAIL_FROM", String::from("Polypost <hello@polypost.app>"));
        let reminder_poll_seconds: u64 = get_env_default("REMINDER_POLL_SECONDS", 60);
        let weekly_summary_interval_seconds: u64 =
            get_env_default("WEEKLY_SUMMARY_INTERVAL_SECONDS", 7 * 24 * 3600);
        let seed_plans: bool = get_env_default("SEED_PLANS", true);

        Self {
            bind_addr,
            database_url,
            cors_origin,
            frontend_url,
            resend_api_key,
            email_from,
            reminder_poll_seconds,
            weekly_summary_interval_seconds,
            seed_plans,
        }
    }
}
