//! Semantic validation for enumerated and ranged setting values.

use crate::config::SettingKey;
use crate::error::ValidationError;

/// Accepted log levels.
pub const LOG_LEVELS: &[&str] = &["Trace", "Debug", "Info", "Warning", "Error"];

/// Accepted wall playback modes.
pub const WALL_PLAYBACK_MODES: &[&str] = &["video", "animation", "image"];

/// Accepted DLNA sort orders.
pub const DLNA_SORT_ORDERS: &[&str] = &["title", "date", "created_at", "updated_at", "random"];

/// Validates that a value is one of the accepted options.
pub fn validate_choice(
    key: SettingKey,
    value: &str,
    options: &[&str],
) -> Result<(), ValidationError> {
    if options.contains(&value) {
        return Ok(());
    }

    Err(ValidationError::InvalidValue {
        key,
        value: value.to_string(),
        suggestion: Some(match find_similar(value, options) {
            Some(similar) => format!("did you mean '{}'?", similar),
            None => format!("expected one of: {}", options.join(", ")),
        }),
    })
}

/// Validates that an integer lies within an inclusive range.
pub fn validate_range(
    key: SettingKey,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }

    Err(ValidationError::InvalidValue {
        key,
        value: value.to_string(),
        suggestion: Some(format!("must be between {} and {}", min, max)),
    })
}

/// Validates that a float is finite and not negative.
pub fn validate_non_negative(key: SettingKey, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }

    Err(ValidationError::InvalidValue {
        key,
        value: value.to_string(),
        suggestion: Some("must be zero or greater".to_string()),
    })
}

/// Finds the closest option by case-insensitive Levenshtein distance.
fn find_similar<'a>(input: &str, options: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();

    options
        .iter()
        .map(|option| (strsim::levenshtein(&input_lower, &option.to_lowercase()), *option))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, option)| option)
}
