// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rentall_app::{CarDraft, CarId, CarRecord};
use std::path::PathBuf;

const MAKES: [(&str, &[&str]); 10] = [
    ("Toyota", &["Corolla", "Camry", "RAV4", "Prius"]),
    ("Honda", &["Civic", "Accord", "CR-V", "Jazz"]),
    ("Ford", &["Focus", "Mustang", "Fiesta", "Kuga"]),
    ("Volkswagen", &["Golf", "Passat", "Polo", "Tiguan"]),
    ("Skoda", &["Octavia", "Fabia", "Superb", "Kodiaq"]),
    ("Tesla", &["Model 3", "Model Y", "Model S"]),
    ("BMW", &["320i", "X3", "i4"]),
    ("Audi", &["A3", "A4", "Q5"]),
    ("Kia", &["Rio", "Ceed", "Sportage"]),
    ("Mazda", &["2", "3", "CX-5", "MX-5"]),
];

const COLORS: [&str; 10] = [
    "White", "Black", "Silver", "Grey", "Red", "Blue", "Green", "Orange", "Beige", "Brown",
];

const NOTES: [&str; 8] = [
    "",
    "",
    "Recently serviced",
    "Winter tyres fitted",
    "Child seat available",
    "Minor scratch on rear bumper",
    "Automatic transmission",
    "Roof rack included",
];

const PLATE_LETTERS: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Produces valid, reproducible cars for a given seed.
#[derive(Debug, Clone)]
pub struct FleetFaker {
    rng: DeterministicRng,
}

impl FleetFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn car_draft(&mut self) -> CarDraft {
        let (brand, models) = MAKES[self.rng.int_n(MAKES.len())];
        let model = models[self.rng.int_n(models.len())];
        // 1 in 3 cars is out on rent.
        let is_rented = self.rng.int_n(3) == 0;

        CarDraft {
            brand: brand.to_owned(),
            model: model.to_owned(),
            year: self.int_range_i32(2008, 2025),
            color: self.pick(&COLORS).to_owned(),
            license_plate: self.license_plate(),
            daily_rate: self.daily_rate(),
            is_rented,
            notes: self.pick(&NOTES).to_owned(),
        }
    }

    pub fn car_record(&mut self, id: i64) -> CarRecord {
        let draft = self.car_draft();
        CarRecord::from_draft(CarId::new(id), draft)
    }

    pub fn fleet(&mut self, count: usize) -> Vec<CarDraft> {
        (0..count).map(|_| self.car_draft()).collect()
    }

    /// Three letters, a hyphen and three or four digits.
    pub fn license_plate(&mut self) -> String {
        let mut plate = String::with_capacity(8);
        for _ in 0..3 {
            plate.push(char::from(PLATE_LETTERS[self.rng.int_n(PLATE_LETTERS.len())]));
        }
        plate.push('-');
        let digits = 3 + self.rng.int_n(2);
        for _ in 0..digits {
            plate.push(char::from(b'0' + self.rng.int_n(10) as u8));
        }
        plate
    }

    /// Between 25.00 and 500.00, whole cents.
    pub fn daily_rate(&mut self) -> f64 {
        let cents = self.int_range_i32(2_500, 50_000);
        f64::from(cents) / 100.0
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("rentall.db");
    Ok((dir, db_path))
}

/// A fixed, valid draft for tests that need one specific car.
pub fn civic_draft() -> CarDraft {
    CarDraft {
        brand: "Honda".to_owned(),
        model: "Civic".to_owned(),
        year: 2024,
        color: "Blue".to_owned(),
        license_plate: "DEF-9012".to_owned(),
        daily_rate: 89.99,
        is_rented: false,
        notes: "Reliable compact car".to_owned(),
    }
}

pub fn draft(brand: &str, model: &str, daily_rate: f64, is_rented: bool) -> CarDraft {
    CarDraft {
        brand: brand.to_owned(),
        model: model.to_owned(),
        daily_rate,
        is_rented,
        ..civic_draft()
    }
}

#[cfg(test)]
mod tests {
    use super::{FleetFaker, civic_draft, draft, temp_db_path};
    use anyhow::Result;
    use rentall_app::validate_license_plate;

    #[test]
    fn same_seed_same_fleet() {
        let mut left = FleetFaker::new(42);
        let mut right = FleetFaker::new(42);

        assert_eq!(left.fleet(10), right.fleet(10));
    }

    #[test]
    fn zero_seed_is_normalized() {
        let mut zero = FleetFaker::new(0);
        let mut one = FleetFaker::new(1);

        assert_eq!(zero.car_draft(), one.car_draft());
    }

    #[test]
    fn generated_cars_validate() {
        let mut faker = FleetFaker::new(7);
        for draft in faker.fleet(200) {
            assert_eq!(draft.validate(), Ok(()), "{draft:?}");
        }
    }

    #[test]
    fn license_plates_have_expected_shape() {
        let mut faker = FleetFaker::new(3);
        for _ in 0..100 {
            let plate = faker.license_plate();
            assert!(plate.len() == 7 || plate.len() == 8, "{plate}");
            assert_eq!(plate.as_bytes()[3], b'-');
            assert_eq!(validate_license_plate(&plate), Ok(()));
        }
    }

    #[test]
    fn daily_rate_stays_in_range() {
        let mut faker = FleetFaker::new(11);
        for _ in 0..200 {
            let rate = faker.daily_rate();
            assert!((25.0..=500.0).contains(&rate), "{rate}");
        }
    }

    #[test]
    fn car_record_keeps_requested_id() {
        let mut faker = FleetFaker::new(5);
        assert_eq!(faker.car_record(17).id.get(), 17);
    }

    #[test]
    fn fixtures_are_valid() {
        assert_eq!(civic_draft().validate(), Ok(()));
        let rented = draft("Ford", "Mustang", 250.0, true);
        assert!(rented.is_rented);
        assert_eq!(rented.license_plate, "DEF-9012");
    }

    #[test]
    fn temp_db_path_lives_in_temp_dir() -> Result<()> {
        let (dir, path) = temp_db_path()?;
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.file_name().and_then(|name| name.to_str()), Some("rentall.db"));
        Ok(())
    }

    #[test]
    fn int_n() {
        let mut faker = FleetFaker::new(42);
        for _ in 0..100 {
            assert!(faker.int_n(5) < 5);
        }
    }
}
