//! Standard rules for each recipe field.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldError;
use crate::types::FieldValue;

pub const NAME_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;
pub const PREP_TIME_RANGE: (i64, i64) = (1, 999);
pub const SERVINGS_RANGE: (i64, i64) = (1, 99);
pub const DIFFICULTY_RANGE: (i32, i32) = (1, 5);
pub const CALORIES_RANGE: (i64, i64) = (1, 9999);
pub const MAX_TAGS: usize = 4;

/// Accepted extensions when image URLs are checked strictly.
static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|bmp|webp|svg)$").expect("image extension pattern is valid")
});

pub fn name(value: FieldValue<'_>) -> Option<FieldError> {
    let text = value.as_text();
    if text.trim().is_empty() {
        return Some(FieldError::Required);
    }
    max_length(text, NAME_MAX_LENGTH)
}

pub fn description(value: FieldValue<'_>) -> Option<FieldError> {
    max_length(value.as_text(), DESCRIPTION_MAX_LENGTH)
}

pub fn prep_time(value: FieldValue<'_>) -> Option<FieldError> {
    required_int(value.as_text(), PREP_TIME_RANGE)
}

pub fn servings(value: FieldValue<'_>) -> Option<FieldError> {
    required_int(value.as_text(), SERVINGS_RANGE)
}

pub fn difficulty(value: FieldValue<'_>) -> Option<FieldError> {
    let (min, max) = DIFFICULTY_RANGE;
    match value.as_rating() {
        None => Some(FieldError::Required),
        Some(v) if v < min => Some(FieldError::Required),
        Some(v) if v > max => Some(FieldError::AboveMax { max: max.into() }),
        Some(_) => None,
    }
}

pub fn calories(value: FieldValue<'_>) -> Option<FieldError> {
    let text = value.as_text();
    if text.trim().is_empty() {
        return None;
    }
    bounded_int(text, CALORIES_RANGE)
}

/// Optional URL: blank passes, otherwise it must be absolute and well-formed.
pub fn image_url(value: FieldValue<'_>) -> Option<FieldError> {
    let text = value.as_text().trim();
    if text.is_empty() {
        return None;
    }
    match url::Url::parse(text) {
        Ok(_) => None,
        Err(_) => Some(FieldError::InvalidUrl),
    }
}

/// Like [`image_url`], additionally requiring an image file extension.
pub fn strict_image_url(value: FieldValue<'_>) -> Option<FieldError> {
    if let Some(err) = image_url(value) {
        return Some(err);
    }
    let text = value.as_text().trim();
    if text.is_empty() || IMAGE_EXTENSION.is_match(text) {
        None
    } else {
        Some(FieldError::InvalidImageType)
    }
}

pub fn tags(value: FieldValue<'_>) -> Option<FieldError> {
    if value.as_count() > MAX_TAGS {
        Some(FieldError::TooMany { max: MAX_TAGS })
    } else {
        None
    }
}

/// Ingredients and steps: at least one entry.
pub fn non_empty_list(value: FieldValue<'_>) -> Option<FieldError> {
    if value.as_count() == 0 {
        Some(FieldError::Required)
    } else {
        None
    }
}

pub(crate) fn max_length(text: &str, max: usize) -> Option<FieldError> {
    if text.chars().count() > max {
        Some(FieldError::TooLong { max })
    } else {
        None
    }
}

fn required_int(text: &str, range: (i64, i64)) -> Option<FieldError> {
    if text.trim().is_empty() {
        return Some(FieldError::Required);
    }
    bounded_int(text, range)
}

fn bounded_int(text: &str, (min, max): (i64, i64)) -> Option<FieldError> {
    match parse_leading_int(text) {
        None => Some(FieldError::NotANumber),
        Some(n) if n < min => Some(FieldError::BelowMin { min }),
        Some(n) if n > max => Some(FieldError::AboveMax { max }),
        Some(_) => None,
    }
}

/// Reads the integer at the start of `text`: leading whitespace, an optional
/// sign, then digits. Anything after the digits is ignored ("12 min" is 12).
/// Returns `None` when no digit follows. Values too large for `i64` saturate.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
