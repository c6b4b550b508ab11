// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::CarId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarField {
    Brand,
    Model,
    Year,
    Color,
    LicensePlate,
    DailyRate,
    IsRented,
    Notes,
}

impl CarField {
    pub const ALL: [Self; 8] = [
        Self::Brand,
        Self::Model,
        Self::Year,
        Self::Color,
        Self::LicensePlate,
        Self::DailyRate,
        Self::IsRented,
        Self::Notes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Model => "Model",
            Self::Year => "Year",
            Self::Color => "Color",
            Self::LicensePlate => "License plate",
            Self::DailyRate => "Daily rate",
            Self::IsRented => "Rented",
            Self::Notes => "Notes",
        }
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Model => "model",
            Self::Year => "year",
            Self::Color => "color",
            Self::LicensePlate => "license_plate",
            Self::DailyRate => "daily_rate",
            Self::IsRented => "is_rented",
            Self::Notes => "notes",
        }
    }
}

/// Which rental state a listing is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CarFilter {
    #[default]
    All,
    Available,
    Rented,
}

impl CarFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Available, Self::Rented];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Available => "available",
            Self::Rented => "rented",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "available" => Some(Self::Available),
            "rented" => Some(Self::Rented),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all cars",
            Self::Available => "available only",
            Self::Rented => "rented only",
        }
    }

    pub const fn matches(self, is_rented: bool) -> bool {
        match self {
            Self::All => true,
            Self::Available => !is_rented,
            Self::Rented => is_rented,
        }
    }

    pub fn next(self) -> Self {
        rotate(&Self::ALL, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    Brand,
    Year,
    DailyRate,
    RentalStatus,
}

impl SortOption {
    pub const ALL: [Self; 4] = [
        Self::Brand,
        Self::Year,
        Self::DailyRate,
        Self::RentalStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Year => "year",
            Self::DailyRate => "daily_rate",
            Self::RentalStatus => "rental_status",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "brand" => Some(Self::Brand),
            "year" => Some(Self::Year),
            "daily_rate" => Some(Self::DailyRate),
            "rental_status" => Some(Self::RentalStatus),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Year => "year (newest)",
            Self::DailyRate => "daily rate (highest)",
            Self::RentalStatus => "rented first",
        }
    }

    pub fn next(self) -> Self {
        rotate(&Self::ALL, self)
    }
}

fn rotate<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let index = all.iter().position(|item| *item == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}

/// Field values of a car that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
    pub daily_rate: f64,
    pub is_rented: bool,
    pub notes: String,
}

impl CarDraft {
    /// Trims every text field and upper-cases the plate.
    pub fn normalized(&self) -> Self {
        Self {
            brand: self.brand.trim().to_owned(),
            model: self.model.trim().to_owned(),
            year: self.year,
            color: self.color.trim().to_owned(),
            license_plate: self.license_plate.trim().to_uppercase(),
            daily_rate: self.daily_rate,
            is_rented: self.is_rented,
            notes: self.notes.trim().to_owned(),
        }
    }
}

/// A persisted car. Changes produce a new value that is written back under
/// the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
    pub daily_rate: f64,
    pub is_rented: bool,
    pub notes: String,
}

impl CarRecord {
    pub fn from_draft(id: CarId, draft: CarDraft) -> Self {
        Self {
            id,
            brand: draft.brand,
            model: draft.model,
            year: draft.year,
            color: draft.color,
            license_plate: draft.license_plate,
            daily_rate: draft.daily_rate,
            is_rented: draft.is_rented,
            notes: draft.notes,
        }
    }

    pub fn draft(&self) -> CarDraft {
        CarDraft {
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: self.year,
            color: self.color.clone(),
            license_plate: self.license_plate.clone(),
            daily_rate: self.daily_rate,
            is_rented: self.is_rented,
            notes: self.notes.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    pub fn with_draft(&self, draft: CarDraft) -> Self {
        Self::from_draft(self.id, draft)
    }

    pub fn with_rented(&self, is_rented: bool) -> Self {
        Self {
            is_rented,
            ..self.clone()
        }
    }

    pub fn with_daily_rate(&self, daily_rate: f64) -> Self {
        Self {
            daily_rate,
            ..self.clone()
        }
    }

    pub fn with_color(&self, color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..self.clone()
        }
    }

    /// Replaces only the fields the edit supplies.
    pub fn apply_batch(&self, edit: &BatchEdit) -> Self {
        let mut next = self.clone();
        if let Some(daily_rate) = edit.daily_rate {
            next = next.with_daily_rate(daily_rate);
        }
        if let Some(is_rented) = edit.is_rented {
            next = next.with_rented(is_rented);
        }
        if let Some(color) = edit.color.as_deref()
            && !color.trim().is_empty()
        {
            next = next.with_color(color.trim());
        }
        next
    }
}

/// Partial update applied to every selected car.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchEdit {
    pub daily_rate: Option<f64>,
    pub is_rented: Option<bool>,
    pub color: Option<String>,
}

impl BatchEdit {
    pub fn is_empty(&self) -> bool {
        self.daily_rate.is_none()
            && self.is_rented.is_none()
            && self
                .color
                .as_deref()
                .is_none_or(|color| color.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetStats {
    pub total: usize,
    pub available: usize,
    pub rented: usize,
    pub daily_revenue: f64,
}

/// Mutating commands the UI hands to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum FleetAction {
    AddCar(CarDraft),
    UpdateCar(CarRecord),
    DeleteCar(CarRecord),
    DeleteSelected,
    DeleteAll,
    UpdateSelected(BatchEdit),
    ToggleRental(CarRecord),
}

impl FleetAction {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AddCar(_) => "add car",
            Self::UpdateCar(_) => "update car",
            Self::DeleteCar(_) => "delete car",
            Self::DeleteSelected => "delete cars",
            Self::DeleteAll => "delete all cars",
            Self::UpdateSelected(_) => "update cars",
            Self::ToggleRental(_) => "update rental status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchEdit, CarDraft, CarFilter, CarRecord, SortOption};
    use crate::CarId;

    fn civic() -> CarRecord {
        CarRecord {
            id: CarId::new(3),
            brand: "Honda".to_owned(),
            model: "Civic".to_owned(),
            year: 2024,
            color: "Blue".to_owned(),
            license_plate: "DEF-9012".to_owned(),
            daily_rate: 89.99,
            is_rented: false,
            notes: String::new(),
        }
    }

    #[test]
    fn normalized_trims_and_uppercases_plate() {
        let draft = CarDraft {
            brand: "  Honda ".to_owned(),
            model: " Civic".to_owned(),
            year: 2024,
            color: "Blue  ".to_owned(),
            license_plate: " def-9012 ".to_owned(),
            daily_rate: 89.99,
            is_rented: false,
            notes: "  compact  ".to_owned(),
        };

        let normalized = draft.normalized();
        assert_eq!(normalized.brand, "Honda");
        assert_eq!(normalized.model, "Civic");
        assert_eq!(normalized.color, "Blue");
        assert_eq!(normalized.license_plate, "DEF-9012");
        assert_eq!(normalized.notes, "compact");
    }

    #[test]
    fn apply_batch_only_touches_supplied_fields() {
        let car = civic();
        let edit = BatchEdit {
            daily_rate: Some(50.0),
            is_rented: None,
            color: None,
        };

        let updated = car.apply_batch(&edit);
        assert_eq!(updated.daily_rate, 50.0);
        assert_eq!(updated.is_rented, car.is_rented);
        assert_eq!(updated.color, car.color);
        assert_eq!(updated.id, car.id);
    }

    #[test]
    fn apply_batch_ignores_blank_color() {
        let car = civic();
        let edit = BatchEdit {
            daily_rate: None,
            is_rented: Some(true),
            color: Some("   ".to_owned()),
        };

        let updated = car.apply_batch(&edit);
        assert!(updated.is_rented);
        assert_eq!(updated.color, "Blue");
        assert!(BatchEdit::default().is_empty());
        assert!(!edit.is_empty());
    }

    #[test]
    fn with_draft_keeps_id() {
        let car = civic();
        let mut draft = car.draft();
        draft.model = "Accord".to_owned();

        let updated = car.with_draft(draft);
        assert_eq!(updated.id, CarId::new(3));
        assert_eq!(updated.model, "Accord");
    }

    #[test]
    fn filter_and_sort_cycle_and_parse() {
        assert_eq!(CarFilter::All.next(), CarFilter::Available);
        assert_eq!(CarFilter::Rented.next(), CarFilter::All);
        assert_eq!(SortOption::RentalStatus.next(), SortOption::Brand);
        for filter in CarFilter::ALL {
            assert_eq!(CarFilter::parse(filter.as_str()), Some(filter));
        }
        for sort in SortOption::ALL {
            assert_eq!(SortOption::parse(sort.as_str()), Some(sort));
        }
        assert_eq!(SortOption::parse("price"), None);
    }
}
