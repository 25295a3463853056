use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Default GitHub GraphQL endpoint
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// User agent sent with every request
pub const USER_AGENT: &str = "package-prune";

/// Maximum number of packages fetched per repository (single page)
pub const PACKAGES_PAGE_SIZE: u32 = 100;

/// Maximum number of versions fetched per package (single page)
pub const VERSIONS_PAGE_SIZE: u32 = 100;

/// Package type used when the input is left empty
pub const DEFAULT_PACKAGE_TYPE: &str = "docker";

// =============================================================================
// Duration units (milliseconds)
// =============================================================================

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = SECOND_MS * 60.0;
const HOUR_MS: f64 = MINUTE_MS * 60.0;
const DAY_MS: f64 = HOUR_MS * 24.0;
const WEEK_MS: f64 = DAY_MS * 7.0;
const YEAR_MS: f64 = DAY_MS * 365.25;

/// `<number><optional space><optional unit>`, e.g. `30d`, `1.5 hours`, `500`
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(\d*\.?\d+) *(milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$",
    )
    .unwrap()
});

/// Leading decimal digits, e.g. `12` in `12abc` or `5` in `5.0`
static LEADING_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Input \"token\" not set. Is this running in a GitHub Actions environment?")]
    MissingToken,

    #[error("Input \"{0}\" is required")]
    MissingInput(&'static str),

    #[error("Invalid minimum age: {0:?}")]
    InvalidMinAge(String),
}

/// Retention criteria for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSettings {
    pub owner: String,
    pub repo: String,
    /// Versions whose last file update is more recent than this are kept
    pub min_age: TimeDelta,
    /// Compared case-insensitively against the registry's package type
    pub package_type: String,
    /// Versions downloaded more often than this are kept
    pub max_downloads: u64,
}

/// Raw action inputs, as read from flags or `INPUT_*` variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionInputs {
    pub owner: String,
    pub repo: String,
    pub min_age: String,
    pub max_downloads: Option<String>,
    pub package_type: Option<String>,
}

impl ActionInputs {
    /// Validates the inputs and converts them into settings
    pub fn into_settings(self) -> Result<ActionSettings, ConfigError> {
        let owner = required(self.owner, "owner")?;
        let repo = required(self.repo, "repo")?;
        let min_age = parse_min_age(&required(self.min_age, "minAge")?)?;

        let package_type = self
            .package_type
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PACKAGE_TYPE.to_string());

        Ok(ActionSettings {
            owner,
            repo,
            min_age,
            package_type,
            max_downloads: parse_max_downloads(self.max_downloads.as_deref()),
        })
    }
}

fn required(value: String, name: &'static str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::MissingInput(name))
    } else {
        Ok(value.to_string())
    }
}

/// Resolves the API token, failing when it is absent or blank
pub fn resolve_token(token: Option<String>) -> Result<String, ConfigError> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ConfigError::MissingToken)
}

/// Parses a human-readable duration such as `30d`, `12h` or `1.5 days`.
///
/// A bare number is read as milliseconds. Years are 365.25 days.
pub fn parse_min_age(input: &str) -> Result<TimeDelta, ConfigError> {
    let invalid = || ConfigError::InvalidMinAge(input.to_string());

    let captures = DURATION_RE.captures(input.trim()).ok_or_else(invalid)?;
    let amount: f64 = captures[1].parse().map_err(|_| invalid())?;

    let unit = captures
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let factor = match unit.as_str() {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND_MS,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE_MS,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR_MS,
        "d" | "day" | "days" => DAY_MS,
        "w" | "week" | "weeks" => WEEK_MS,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR_MS,
        _ => return Err(invalid()),
    };

    let millis = (amount * factor).round();
    if !millis.is_finite() || millis > i64::MAX as f64 {
        return Err(invalid());
    }

    TimeDelta::try_milliseconds(millis as i64).ok_or_else(invalid)
}

/// Parses the download threshold from its leading digits
///
/// Input without leading digits (empty, negative, words) falls back to 0,
/// meaning only never-downloaded versions are deleted. Values too large for
/// `u64` saturate.
pub fn parse_max_downloads(input: Option<&str>) -> u64 {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };

    let Some(digits) = LEADING_DIGITS_RE.find(raw) else {
        warn!("Ignoring invalid maxDownloads {:?}, using 0", raw);
        return 0;
    };

    if digits.end() < raw.len() {
        warn!("Reading maxDownloads {:?} as {}", raw, digits.as_str());
    }

    digits.as_str().parse().unwrap_or(u64::MAX)
}
