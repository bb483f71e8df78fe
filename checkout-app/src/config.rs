//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use anyhow::Context;
use checkout_types::CurrencyCode;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://checkout.db?mode=rwc";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub stripe: StripeSettings,
}

/// Stripe settings read from `STRIPE_*` variables.
pub struct StripeSettings {
    pub secret_key: String,
    /// Currency for orders created without an explicit one
    pub currency: CurrencyCode,
    pub charge_and_capture_in_one_step: bool,
    pub api_base: Option<String>,
    pub timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let secret_key = lookup("STRIPE_SECRET_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("STRIPE_SECRET_KEY environment variable is required"))?;

        let currency: CurrencyCode = lookup("STRIPE_CURRENCY")
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
            .parse()
            .context("STRIPE_CURRENCY must be a three-letter currency code")?;

        let charge_and_capture_in_one_step = match lookup("STRIPE_CHARGE_AND_CAPTURE_IN_ONE_STEP")
        {
            Some(flag) => parse_flag(&flag)
                .context("STRIPE_CHARGE_AND_CAPTURE_IN_ONE_STEP must be true or false")?,
            None => false,
        };

        let timeout = match lookup("STRIPE_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse()
                .context("STRIPE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            database_url,
            stripe: StripeSettings {
                secret_key,
                currency,
                charge_and_capture_in_one_step,
                api_base: lookup("STRIPE_API_BASE"),
                timeout: Duration::from_secs(timeout),
            },
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid flag value '{}'", other),
    }
}
