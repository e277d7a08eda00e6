use chrono_tz::Tz;
use std::env;

/// Smallest walk cap that still reaches every weekday once
pub const MIN_WALK_DAYS: u32 = 7;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Timezone applied to calendars that don't name their own
    pub default_timezone: Tz,
    /// Upper bound on calendar days a single business-hours walk may visit
    pub max_walk_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timezone: Tz::UTC,
            max_walk_days: 3650,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let default_timezone = match env::var("SLA_DEFAULT_TIMEZONE") {
            Ok(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            Err(_) => Tz::UTC,
        };

        let max_walk_days = env::var("SLA_MAX_WALK_DAYS")
            .unwrap_or_else(|_| "3650".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidMaxWalkDays)?;

        Self::new(default_timezone, max_walk_days)
    }

    pub fn new(default_timezone: Tz, max_walk_days: u32) -> Result<Self, ConfigError> {
        if max_walk_days < MIN_WALK_DAYS {
            return Err(ConfigError::InvalidMaxWalkDays);
        }

        Ok(EngineConfig {
            default_timezone,
            max_walk_days,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SLA_DEFAULT_TIMEZONE is not a known IANA timezone: {0}")]
    InvalidTimezone(String),

    #[error("SLA_MAX_WALK_DAYS must be an integer of at least 7")]
    InvalidMaxWalkDays,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_utc_ten_years() {
        let config = EngineConfig::default();
        assert_eq!(config.default_timezone, Tz::UTC);
        assert_eq!(config.max_walk_days, 3650);
    }

    #[test]
    fn test_from_env_reads_and_validates() {
        env::set_var("SLA_DEFAULT_TIMEZONE", "Europe/Madrid");
        env::set_var("SLA_MAX_WALK_DAYS", "400");
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.default_timezone, chrono_tz::Europe::Madrid);
        assert_eq!(config.max_walk_days, 400);

        env::set_var("SLA_DEFAULT_TIMEZONE", "Nowhere/Special");
        assert!(matches!(
            EngineConfig::from_env(),
            Err(ConfigError::InvalidTimezone(_))
        ));

        env::set_var("SLA_DEFAULT_TIMEZONE", "UTC");
        env::set_var("SLA_MAX_WALK_DAYS", "many");
        assert!(matches!(
            EngineConfig::from_env(),
            Err(ConfigError::InvalidMaxWalkDays)
        ));

        env::remove_var("SLA_DEFAULT_TIMEZONE");
        env::remove_var("SLA_MAX_WALK_DAYS");
    }

    #[test]
    fn test_walk_cap_below_one_week_rejected() {
        assert!(EngineConfig::new(Tz::UTC, 6).is_err());
        assert!(EngineConfig::new(Tz::UTC, 7).is_ok());
    }
}
