// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use rentall_app::{CarFilter, CarId};
use rentall_db::{SAMPLE_BOOTSTRAP_ID, Store, sample_fleet, validate_db_path};
use rentall_testkit::{FleetFaker, civic_draft, draft, temp_db_path};

fn bootstrapped() -> Result<Store> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    Ok(store)
}

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path(":memory:").is_ok());
    assert!(validate_db_path("/tmp/rentall.db").is_ok());
}

#[test]
fn insert_then_get_round_trips_every_field() -> Result<()> {
    let store = bootstrapped()?;
    let draft = civic_draft().normalized();

    let car_id = store.insert_car(&draft)?;
    let stored = store.get_car(car_id)?.expect("inserted car should exist");

    assert_eq!(stored.id, car_id);
    assert_eq!(stored.draft(), draft);
    Ok(())
}

#[test]
fn get_car_reports_missing_as_none() -> Result<()> {
    let store = bootstrapped()?;
    assert_eq!(store.get_car(CarId::new(404))?, None);
    Ok(())
}

#[test]
fn list_orders_by_brand_then_model_and_filters_rentals() -> Result<()> {
    let store = bootstrapped()?;
    store.insert_car(&draft("Toyota", "Yaris", 60.0, false))?;
    store.insert_car(&draft("Audi", "Q5", 180.0, true))?;
    store.insert_car(&draft("Audi", "A4", 150.0, false))?;

    let names = |filter| -> Result<Vec<String>> {
        Ok(store
            .list_cars(filter)?
            .iter()
            .map(|car| car.display_name())
            .collect())
    };

    assert_eq!(names(CarFilter::All)?, ["Audi A4", "Audi Q5", "Toyota Yaris"]);
    assert_eq!(names(CarFilter::Available)?, ["Audi A4", "Toyota Yaris"]);
    assert_eq!(names(CarFilter::Rented)?, ["Audi Q5"]);
    Ok(())
}

#[test]
fn update_of_missing_id_is_a_silent_no_op() -> Result<()> {
    let store = bootstrapped()?;
    let car_id = store.insert_car(&civic_draft())?;
    let mut ghost = store.get_car(car_id)?.expect("car exists");
    ghost.id = CarId::new(car_id.get() + 100);
    ghost.color = "Purple".to_owned();

    assert!(!store.update_car(&ghost)?);
    assert_eq!(store.count_cars(CarFilter::All)?, 1);
    assert_eq!(store.get_car(ghost.id)?, None);
    let untouched = store.get_car(car_id)?.expect("car exists");
    assert_eq!(untouched.color, "Blue");
    Ok(())
}

#[test]
fn update_replaces_fields_under_same_id() -> Result<()> {
    let store = bootstrapped()?;
    let car_id = store.insert_car(&civic_draft())?;
    let car = store.get_car(car_id)?.expect("car exists");

    assert!(store.update_car(&car.with_rented(true).with_daily_rate(120.0))?);

    let stored = store.get_car(car_id)?.expect("car exists");
    assert!(stored.is_rented);
    assert_eq!(stored.daily_rate, 120.0);
    assert_eq!(stored.license_plate, car.license_plate);
    Ok(())
}

#[test]
fn batch_update_and_delete_count_matches() -> Result<()> {
    let store = bootstrapped()?;
    let mut faker = FleetFaker::new(9);
    for draft in faker.fleet(4) {
        store.insert_car(&draft)?;
    }
    let cars = store.list_cars(CarFilter::All)?;

    let recolored = cars
        .iter()
        .take(2)
        .map(|car| car.with_color("Teal"))
        .collect::<Vec<_>>();
    assert_eq!(store.update_cars(&recolored)?, 2);
    let teal = store
        .list_cars(CarFilter::All)?
        .into_iter()
        .filter(|car| car.color == "Teal")
        .count();
    assert_eq!(teal, 2);

    let ids = [cars[0].id, cars[1].id, CarId::new(999)];
    assert_eq!(store.delete_cars(&ids)?, 2);
    assert_eq!(store.count_cars(CarFilter::All)?, 2);

    assert_eq!(store.delete_all_cars()?, 2);
    assert_eq!(store.count_cars(CarFilter::All)?, 0);
    Ok(())
}

#[test]
fn revenue_is_none_until_something_is_rented() -> Result<()> {
    let store = bootstrapped()?;
    store.insert_car(&draft("Kia", "Rio", 45.0, false))?;
    assert_eq!(store.total_daily_revenue()?, None);
    assert_eq!(store.fleet_stats()?.daily_revenue, 0.0);

    store.insert_car(&draft("Ford", "Mustang", 250.0, true))?;
    store.insert_car(&draft("Audi", "A4", 150.5, true))?;
    assert_eq!(store.total_daily_revenue()?, Some(400.5));

    let stats = store.fleet_stats()?;
    assert_eq!((stats.total, stats.available, stats.rented), (3, 1, 2));
    Ok(())
}

#[test]
fn sample_fleet_seeds_once() -> Result<()> {
    let store = bootstrapped()?;

    assert!(store.seed_sample_fleet()?);
    assert_eq!(store.count_cars(CarFilter::All)?, sample_fleet().len());
    assert!(store.get_car(CarId::new(SAMPLE_BOOTSTRAP_ID))?.is_some());
    assert_eq!(store.count_cars(CarFilter::Rented)?, 2);

    assert!(!store.seed_sample_fleet()?);
    assert_eq!(store.count_cars(CarFilter::All)?, 5);
    Ok(())
}

#[test]
fn emptied_fleet_is_not_reseeded() -> Result<()> {
    let store = bootstrapped()?;
    store.seed_sample_fleet()?;
    store.delete_all_cars()?;

    assert!(!store.seed_sample_fleet()?);
    assert_eq!(store.count_cars(CarFilter::All)?, 0);
    Ok(())
}

#[test]
fn bootstrap_recreates_table_from_other_schema() -> Result<()> {
    let store = Store::open_memory()?;
    store.raw_connection().execute_batch(
        "
        CREATE TABLE car_items (
          id INTEGER PRIMARY KEY,
          brand TEXT NOT NULL,
          model TEXT NOT NULL
        );
        INSERT INTO car_items (brand, model) VALUES ('Lada', 'Niva');
        ",
    )?;

    store.bootstrap()?;

    assert_eq!(store.count_cars(CarFilter::All)?, 0);
    let car_id = store.insert_car(&civic_draft())?;
    assert!(store.get_car(car_id)?.is_some());
    Ok(())
}

#[test]
fn bootstrap_keeps_rows_of_current_schema() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    {
        let store = Store::open(&path)?;
        store.bootstrap()?;
        store.insert_car(&civic_draft())?;
    }

    let reopened = Store::open(&path)?;
    reopened.bootstrap()?;
    assert_eq!(reopened.count_cars(CarFilter::All)?, 1);
    Ok(())
}

#[test]
fn bootstrap_creates_required_indexes() -> Result<()> {
    let store = bootstrapped()?;
    let count: i64 = store.raw_connection().query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_car_items_%'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(count, 2);
    Ok(())
}
