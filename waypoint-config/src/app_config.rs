use serde::Deserialize;
use std::env;

pub const BOOKING_CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const TICKET_CODE_ALPHABET: &str = "ABCDEFGHIJ123456789";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub catalog: CatalogSettings,
    pub booking: BookingSettings,
    pub random: RandomSettings,
}

/// Simulated stage latency and outcome odds
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineSettings {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub availability_probability: f64,
    pub reservation_success_probability: f64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 1000,
            availability_probability: 0.5,
            reservation_success_probability: 0.9,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogSettings {
    pub min_options: u32,
    pub max_options: u32,
    pub min_price: u32,
    pub max_price: u32,
    pub min_seats: u32,
    pub max_seats: u32,
    pub ticket_code_length: usize,
    pub ticket_code_alphabet: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            min_options: 2,
            max_options: 4,
            min_price: 100,
            max_price: 500,
            min_seats: 1,
            max_seats: 5,
            ticket_code_length: 10,
            ticket_code_alphabet: TICKET_CODE_ALPHABET.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BookingSettings {
    pub code_length: usize,
    pub code_alphabet: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            code_length: 8,
            code_alphabet: BOOKING_CODE_ALPHABET.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RandomSettings {
    /// Fixed seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,
}

impl Settings {
    /// Load from `config/` relative to the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Built-in defaults apply when no file is present
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{dir}/local")).required(false))
            // e.g. `WAYPOINT__PIPELINE__MIN_DELAY_MS=0`
            .add_source(
                config::Environment::with_prefix("WAYPOINT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(?settings, %run_mode, "Loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let p = &self.pipeline;
        if p.min_delay_ms > p.max_delay_ms {
            return Err(invalid(format!(
                "pipeline.min_delay_ms ({}) exceeds pipeline.max_delay_ms ({})",
                p.min_delay_ms, p.max_delay_ms
            )));
        }
        check_probability("pipeline.availability_probability", p.availability_probability)?;
        check_probability(
            "pipeline.reservation_success_probability",
            p.reservation_success_probability,
        )?;

        let c = &self.catalog;
        check_bounds("catalog options", c.min_options, c.max_options)?;
        check_bounds("catalog price", c.min_price, c.max_price)?;
        check_bounds("catalog seats", c.min_seats, c.max_seats)?;
        if c.ticket_code_alphabet.is_empty() {
            return Err(invalid("catalog.ticket_code_alphabet must not be empty".into()));
        }

        let b = &self.booking;
        if b.code_length == 0 {
            return Err(invalid("booking.code_length must be positive".into()));
        }
        if b.code_alphabet.is_empty() {
            return Err(invalid("booking.code_alphabet must not be empty".into()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> config::ConfigError {
    config::ConfigError::Message(message)
}

fn check_bounds(what: &str, min: u32, max: u32) -> Result<(), config::ConfigError> {
    if min > max {
        return Err(invalid(format!("{what}: min {min} exceeds max {max}")));
    }
    Ok(())
}

fn check_probability(key: &str, value: f64) -> Result<(), config::ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{key} must be within [0, 1], got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.pipeline.min_delay_ms, 500);
        assert_eq!(settings.pipeline.max_delay_ms, 1000);
        assert_eq!(settings.catalog.ticket_code_length, 10);
        assert_eq!(settings.booking.code_length, 8);
        assert!(settings.random.seed.is_none());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let settings = from_toml(
            r#"
            [pipeline]
            min_delay_ms = 0
            max_delay_ms = 0

            [random]
            seed = 99
            "#,
        );

        assert_eq!(settings.pipeline.min_delay_ms, 0);
        assert_eq!(settings.pipeline.reservation_success_probability, 0.9);
        assert_eq!(settings.catalog.max_price, 500);
        assert_eq!(settings.random.seed, Some(99));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_inverted_delay_rejected() {
        let mut settings = Settings::default();
        settings.pipeline.min_delay_ms = 2000;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut settings = Settings::default();
        settings.pipeline.reservation_success_probability = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        let mut settings = Settings::default();
        settings.catalog.ticket_code_alphabet.clear();
        assert!(settings.validate().is_err());
    }
}
