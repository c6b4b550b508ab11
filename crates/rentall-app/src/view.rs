// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{CarFilter, CarRecord, SortOption};

/// Builds the displayed list: rental filter, then search, then a stable sort.
pub fn derive_cars(
    cars: &[CarRecord],
    filter: CarFilter,
    sort: SortOption,
    search_query: &str,
) -> Vec<CarRecord> {
    let needle = search_query.to_lowercase();
    let searching = !search_query.trim().is_empty();

    let mut derived = cars
        .iter()
        .filter(|car| filter.matches(car.is_rented))
        .filter(|car| !searching || matches_search(car, &needle))
        .cloned()
        .collect::<Vec<_>>();

    sort_cars(&mut derived, sort);
    derived
}

/// `needle` must already be lower-cased.
pub fn matches_search(car: &CarRecord, needle: &str) -> bool {
    [&car.brand, &car.model, &car.license_plate]
        .into_iter()
        .any(|value| value.to_lowercase().contains(needle))
}

pub fn sort_cars(cars: &mut [CarRecord], sort: SortOption) {
    match sort {
        SortOption::Brand => cars.sort_by_cached_key(|car| car.brand.to_lowercase()),
        SortOption::Year => cars.sort_by(|left, right| right.year.cmp(&left.year)),
        SortOption::DailyRate => {
            cars.sort_by(|left, right| right.daily_rate.total_cmp(&left.daily_rate));
        }
        SortOption::RentalStatus => {
            cars.sort_by(|left, right| right.is_rented.cmp(&left.is_rented));
        }
    }
}
