// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

use crate::{
    BatchEdit, CarDraft, CarField, CarRecord, validate_brand, validate_color,
    validate_daily_rate, validate_license_plate, validate_model, validate_year,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CarField,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", first_message(.errors))]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

fn first_message(errors: &[FieldError]) -> &str {
    errors
        .first()
        .map_or("form is invalid", |error| error.message.as_str())
}

impl FormErrors {
    pub fn message_for(&self, field: CarField) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

/// Raw text as typed into the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarFormInput {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub license_plate: String,
    pub daily_rate: String,
    pub is_rented: bool,
    pub notes: String,
}

impl CarFormInput {
    pub fn from_record(car: &CarRecord) -> Self {
        Self {
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year.to_string(),
            color: car.color.clone(),
            license_plate: car.license_plate.clone(),
            daily_rate: car.daily_rate.to_string(),
            is_rented: car.is_rented,
            notes: car.notes.clone(),
        }
    }

    pub fn text_mut(&mut self, field: CarField) -> Option<&mut String> {
        match field {
            CarField::Brand => Some(&mut self.brand),
            CarField::Model => Some(&mut self.model),
            CarField::Year => Some(&mut self.year),
            CarField::Color => Some(&mut self.color),
            CarField::LicensePlate => Some(&mut self.license_plate),
            CarField::DailyRate => Some(&mut self.daily_rate),
            CarField::Notes => Some(&mut self.notes),
            CarField::IsRented => None,
        }
    }

    pub fn text(&self, field: CarField) -> String {
        match field {
            CarField::Brand => self.brand.clone(),
            CarField::Model => self.model.clone(),
            CarField::Year => self.year.clone(),
            CarField::Color => self.color.clone(),
            CarField::LicensePlate => self.license_plate.clone(),
            CarField::DailyRate => self.daily_rate.clone(),
            CarField::Notes => self.notes.clone(),
            CarField::IsRented => if self.is_rented { "yes" } else { "no" }.to_owned(),
        }
    }

    /// Checks every field and reports all failures so each input can show
    /// its own message.
    pub fn parse(&self) -> Result<CarDraft, FormErrors> {
        let mut errors = Vec::new();
        let mut push = |field: CarField, message: String| {
            errors.push(FieldError { field, message });
        };

        let brand = self.brand.trim();
        let model = self.model.trim();
        let color = self.color.trim();
        let license_plate = self.license_plate.trim().to_uppercase();

        if let Err(error) = validate_brand(brand) {
            push(CarField::Brand, error.to_string());
        }
        if let Err(error) = validate_model(model) {
            push(CarField::Model, error.to_string());
        }
        let year = self.year.trim().parse::<i32>().ok();
        match year {
            None => push(CarField::Year, "Please enter a valid year".to_owned()),
            Some(year) => {
                if let Err(error) = validate_year(year) {
                    push(CarField::Year, error.to_string());
                }
            }
        }
        if let Err(error) = validate_color(color) {
            push(CarField::Color, error.to_string());
        }
        if let Err(error) = validate_license_plate(&license_plate) {
            push(CarField::LicensePlate, error.to_string());
        }
        let daily_rate = parse_rate(&self.daily_rate);
        match daily_rate {
            None => push(CarField::DailyRate, "Please enter a valid rate".to_owned()),
            Some(rate) => {
                if let Err(error) = validate_daily_rate(rate) {
                    push(CarField::DailyRate, error.to_string());
                }
            }
        }

        match (year, daily_rate) {
            (Some(year), Some(daily_rate)) if errors.is_empty() => Ok(CarDraft {
                brand: brand.to_owned(),
                model: model.to_owned(),
                year,
                color: color.to_owned(),
                license_plate,
                daily_rate,
                is_rented: self.is_rented,
                notes: self.notes.trim().to_owned(),
            }),
            _ => Err(FormErrors { errors }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RentalChoice {
    #[default]
    NoChange,
    Available,
    Rented,
}

impl RentalChoice {
    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::NoChange => None,
            Self::Available => Some(false),
            Self::Rented => Some(true),
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::NoChange => Self::Available,
            Self::Available => Self::Rented,
            Self::Rented => Self::NoChange,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoChange => "no change",
            Self::Available => "available",
            Self::Rented => "rented",
        }
    }
}

/// Raw batch edit input; blank text leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchEditForm {
    pub daily_rate: String,
    pub color: String,
    pub rental: RentalChoice,
}

impl BatchEditForm {
    pub fn parse(&self) -> Result<BatchEdit, FormErrors> {
        let mut errors = Vec::new();

        let daily_rate = if self.daily_rate.trim().is_empty() {
            None
        } else {
            match parse_rate(&self.daily_rate) {
                None => {
                    errors.push(FieldError {
                        field: CarField::DailyRate,
                        message: "Please enter a valid rate".to_owned(),
                    });
                    None
                }
                Some(rate) => match validate_daily_rate(rate) {
                    Ok(()) => Some(rate),
                    Err(error) => {
                        errors.push(FieldError {
                            field: CarField::DailyRate,
                            message: error.to_string(),
                        });
                        None
                    }
                },
            }
        };

        let color = if self.color.trim().is_empty() {
            None
        } else {
            match validate_color(self.color.trim()) {
                Ok(()) => Some(self.color.trim().to_owned()),
                Err(error) => {
                    errors.push(FieldError {
                        field: CarField::Color,
                        message: error.to_string(),
                    });
                    None
                }
            }
        };

        if !errors.is_empty() {
            return Err(FormErrors { errors });
        }
        Ok(BatchEdit {
            daily_rate,
            is_rented: self.rental.as_option(),
            color,
        })
    }
}

fn parse_rate(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{BatchEditForm, CarFormInput, RentalChoice};
    use crate::{CarField, CarId, CarRecord};

    fn valid_input() -> CarFormInput {
        CarFormInput {
            brand: " Toyota ".to_owned(),
            model: "Camry".to_owned(),
            year: "2023".to_owned(),
            color: "Silver".to_owned(),
            license_plate: "abc-1234".to_owned(),
            daily_rate: "100".to_owned(),
            is_rented: false,
            notes: " quiet sedan ".to_owned(),
        }
    }

    #[test]
    fn parse_normalizes_valid_input() {
        let draft = valid_input().parse().expect("valid form");
        assert_eq!(draft.brand, "Toyota");
        assert_eq!(draft.license_plate, "ABC-1234");
        assert_eq!(draft.year, 2023);
        assert_eq!(draft.daily_rate, 100.0);
        assert_eq!(draft.notes, "quiet sedan");
    }

    #[test]
    fn parse_collects_every_field_error() {
        let input = CarFormInput {
            brand: String::new(),
            year: "twenty".to_owned(),
            daily_rate: "cheap".to_owned(),
            ..valid_input()
        };

        let errors = input.parse().expect_err("invalid form");
        assert_eq!(errors.errors.len(), 3);
        assert_eq!(
            errors.message_for(CarField::Brand),
            Some("Brand cannot be empty")
        );
        assert_eq!(
            errors.message_for(CarField::Year),
            Some("Please enter a valid year")
        );
        assert_eq!(
            errors.message_for(CarField::DailyRate),
            Some("Please enter a valid rate")
        );
        assert_eq!(errors.to_string(), "Brand cannot be empty");
    }

    #[test]
    fn from_record_round_trips_through_parse() {
        let car = CarRecord {
            id: CarId::new(5),
            brand: "Chevrolet".to_owned(),
            model: "Suburban".to_owned(),
            year: 2023,
            color: "Black".to_owned(),
            license_plate: "SUV-7890".to_owned(),
            daily_rate: 199.0,
            is_rented: true,
            notes: "family trips".to_owned(),
        };

        let draft = CarFormInput::from_record(&car)
            .parse()
            .expect("record form is valid");
        assert_eq!(car.with_draft(draft), car);
    }

    #[test]
    fn batch_form_skips_blank_fields() {
        let form = BatchEditForm {
            daily_rate: "  ".to_owned(),
            color: String::new(),
            rental: RentalChoice::Rented,
        };

        let edit = form.parse().expect("valid batch");
        assert_eq!(edit.daily_rate, None);
        assert_eq!(edit.color, None);
        assert_eq!(edit.is_rented, Some(true));
    }

    #[test]
    fn batch_form_validates_supplied_values() {
        let form = BatchEditForm {
            daily_rate: "20000".to_owned(),
            color: "X".to_owned(),
            rental: RentalChoice::NoChange,
        };

        let errors = form.parse().expect_err("invalid batch");
        assert_eq!(
            errors.message_for(CarField::DailyRate),
            Some("Daily rate cannot exceed $10,000")
        );
        assert_eq!(
            errors.message_for(CarField::Color),
            Some("Color must be at least 2 characters")
        );
    }
}
