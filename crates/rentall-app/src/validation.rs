// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;

use crate::model::{CarDraft, CarField};

pub const BRAND_LEN: (usize, usize) = (2, 50);
pub const MODEL_LEN: (usize, usize) = (1, 50);
pub const COLOR_LEN: (usize, usize) = (2, 30);
pub const LICENSE_PLATE_LEN: (usize, usize) = (5, 10);
pub const MIN_YEAR: i32 = 1900;
pub const MAX_DAILY_RATE: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Empty(CarField),
    TooShort { field: CarField, min: usize },
    TooLong { field: CarField, max: usize },
    YearTooEarly,
    YearInFuture,
    PlateCharacters,
    RateNotFinite,
    RateNotPositive,
    RateTooHigh,
}

impl ValidationError {
    pub const fn field(self) -> CarField {
        match self {
            Self::Empty(field) | Self::TooShort { field, .. } | Self::TooLong { field, .. } => {
                field
            }
            Self::YearTooEarly | Self::YearInFuture => CarField::Year,
            Self::PlateCharacters => CarField::LicensePlate,
            Self::RateNotFinite | Self::RateNotPositive | Self::RateTooHigh => CarField::DailyRate,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{} cannot be empty", field.label()),
            Self::TooShort { field, min } => {
                let unit = if *min == 1 { "character" } else { "characters" };
                write!(f, "{} must be at least {min} {unit}", field.label())
            }
            Self::TooLong { field, max } => {
                write!(f, "{} must be at most {max} characters", field.label())
            }
            Self::YearTooEarly => write!(f, "Year must be {MIN_YEAR} or later"),
            Self::YearInFuture => f.write_str("Year cannot be in the future"),
            Self::PlateCharacters => {
                f.write_str("License plate can only contain letters, numbers, and hyphens")
            }
            Self::RateNotFinite => f.write_str("Daily rate must be a finite number"),
            Self::RateNotPositive => f.write_str("Daily rate must be greater than 0"),
            Self::RateTooHigh => f.write_str("Daily rate cannot exceed $10,000"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = std::result::Result<(), ValidationError>;

pub fn validate_brand(brand: &str) -> ValidationResult {
    validate_text(CarField::Brand, brand, BRAND_LEN)
}

pub fn validate_model(model: &str) -> ValidationResult {
    validate_text(CarField::Model, model, MODEL_LEN)
}

pub fn validate_year(year: i32) -> ValidationResult {
    validate_year_at(year, current_year())
}

pub fn validate_year_at(year: i32, current_year: i32) -> ValidationResult {
    if year < MIN_YEAR {
        return Err(ValidationError::YearTooEarly);
    }
    if year > current_year.saturating_add(1) {
        return Err(ValidationError::YearInFuture);
    }
    Ok(())
}

pub fn validate_color(color: &str) -> ValidationResult {
    validate_text(CarField::Color, color, COLOR_LEN)
}

pub fn validate_license_plate(license_plate: &str) -> ValidationResult {
    validate_text(CarField::LicensePlate, license_plate, LICENSE_PLATE_LEN)?;
    let allowed = license_plate
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
    if !allowed {
        return Err(ValidationError::PlateCharacters);
    }
    Ok(())
}

pub fn validate_daily_rate(daily_rate: f64) -> ValidationResult {
    if !daily_rate.is_finite() {
        return Err(ValidationError::RateNotFinite);
    }
    if daily_rate <= 0.0 {
        return Err(ValidationError::RateNotPositive);
    }
    if daily_rate > MAX_DAILY_RATE {
        return Err(ValidationError::RateTooHigh);
    }
    Ok(())
}

/// Checks brand, model, year, color, plate and rate in that order and
/// reports the first failure.
pub fn validate_all(
    brand: &str,
    model: &str,
    year: i32,
    color: &str,
    license_plate: &str,
    daily_rate: f64,
) -> ValidationResult {
    validate_all_at(
        brand,
        model,
        year,
        color,
        license_plate,
        daily_rate,
        current_year(),
    )
}

pub fn validate_all_at(
    brand: &str,
    model: &str,
    year: i32,
    color: &str,
    license_plate: &str,
    daily_rate: f64,
    current_year: i32,
) -> ValidationResult {
    validate_brand(brand)?;
    validate_model(model)?;
    validate_year_at(year, current_year)?;
    validate_color(color)?;
    validate_license_plate(license_plate)?;
    validate_daily_rate(daily_rate)
}

impl CarDraft {
    pub fn validate(&self) -> ValidationResult {
        validate_all(
            &self.brand,
            &self.model,
            self.year,
            &self.color,
            &self.license_plate,
            self.daily_rate,
        )
    }
}

pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

pub fn format_daily_rate(daily_rate: f64) -> String {
    let cents = (daily_rate * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", comma_format(cents / 100), cents % 100)
}

fn validate_text(field: CarField, value: &str, (min, max): (usize, usize)) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn comma_format(value: u64) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{
        ValidationError, format_daily_rate, validate_all_at, validate_brand, validate_color,
        validate_daily_rate, validate_license_plate, validate_model, validate_year_at,
    };
    use crate::CarField;

    #[test]
    fn license_plate_accepts_hyphenated_alphanumerics() {
        assert!(validate_license_plate("AB-123").is_ok());
        assert!(validate_license_plate("abc1234").is_ok());
        assert!(validate_license_plate("0123456789").is_ok());
    }

    #[test]
    fn license_plate_rejects_space_and_short_values() {
        assert_eq!(
            validate_license_plate("AB 123"),
            Err(ValidationError::PlateCharacters)
        );
        assert_eq!(
            validate_license_plate("AB"),
            Err(ValidationError::TooShort {
                field: CarField::LicensePlate,
                min: 5
            })
        );
        assert_eq!(
            validate_license_plate("ABCDEFGHIJK"),
            Err(ValidationError::TooLong {
                field: CarField::LicensePlate,
                max: 10
            })
        );
    }

    #[test]
    fn license_plate_rejects_punctuation_and_unicode() {
        for plate in ["AB_123", "AB.123", "ÁB-123", "AB-12!"] {
            assert_eq!(
                validate_license_plate(plate),
                Err(ValidationError::PlateCharacters),
                "plate {plate}"
            );
        }
    }

    #[test]
    fn text_bounds_follow_field_limits() {
        assert_eq!(
            validate_brand("   "),
            Err(ValidationError::Empty(CarField::Brand))
        );
        assert!(validate_brand("A").is_err());
        assert!(validate_brand("VW").is_ok());
        assert!(validate_brand(&"x".repeat(51)).is_err());
        assert!(validate_model("3").is_ok());
        assert!(validate_model(&"m".repeat(50)).is_ok());
        assert!(validate_color("R").is_err());
        assert!(validate_color(&"c".repeat(31)).is_err());
    }

    #[test]
    fn year_bounds_use_current_year() {
        assert_eq!(validate_year_at(1899, 2026), Err(ValidationError::YearTooEarly));
        assert!(validate_year_at(1900, 2026).is_ok());
        assert!(validate_year_at(2027, 2026).is_ok());
        assert_eq!(validate_year_at(2028, 2026), Err(ValidationError::YearInFuture));
    }

    #[test]
    fn daily_rate_bounds() {
        assert_eq!(validate_daily_rate(0.0), Err(ValidationError::RateNotPositive));
        assert_eq!(validate_daily_rate(-5.0), Err(ValidationError::RateNotPositive));
        assert!(validate_daily_rate(0.01).is_ok());
        assert!(validate_daily_rate(10_000.0).is_ok());
        assert_eq!(validate_daily_rate(10_000.01), Err(ValidationError::RateTooHigh));
        assert_eq!(validate_daily_rate(f64::NAN), Err(ValidationError::RateNotFinite));
    }

    #[test]
    fn validate_all_reports_first_failing_field() {
        let result = validate_all_at("Ford", "Focus", 1800, "X", "AB-123", 40.0, 2026);
        assert_eq!(result, Err(ValidationError::YearTooEarly));

        let result = validate_all_at("F", "", 1800, "X", "AB", -1.0, 2026);
        assert_eq!(result, Err(ValidationError::TooShort {
            field: CarField::Brand,
            min: 2
        }));

        let result = validate_all_at("Ford", "Focus", 2020, "Red", "AB-123", 0.0, 2026);
        assert_eq!(result, Err(ValidationError::RateNotPositive));

        assert!(validate_all_at("Ford", "Focus", 2020, "Red", "AB-123", 40.0, 2026).is_ok());
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            ValidationError::Empty(CarField::Brand).to_string(),
            "Brand cannot be empty"
        );
        assert_eq!(
            ValidationError::TooShort {
                field: CarField::Model,
                min: 1
            }
            .to_string(),
            "Model must be at least 1 character"
        );
        assert_eq!(
            ValidationError::TooShort {
                field: CarField::LicensePlate,
                min: 5
            }
            .to_string(),
            "License plate must be at least 5 characters"
        );
        assert_eq!(
            ValidationError::RateTooHigh.to_string(),
            "Daily rate cannot exceed $10,000"
        );
        assert_eq!(ValidationError::YearInFuture.field(), CarField::Year);
    }

    #[test]
    fn format_daily_rate_groups_thousands() {
        assert_eq!(format_daily_rate(8999.99), "8,999.99");
        assert_eq!(format_daily_rate(50.0), "50.00");
        assert_eq!(format_daily_rate(10_000.0), "10,000.00");
        assert_eq!(format_daily_rate(0.0), "0.00");
    }
}
