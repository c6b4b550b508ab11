// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod gateway;

pub use gateway::{FleetSnapshot, Gateway, Live};

use anyhow::{Context, Result, anyhow, bail};
use rentall_app::{CarDraft, CarField, CarFilter, CarId, CarRecord, FleetStats};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::iter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const APP_NAME: &str = "rentall";
pub const SCHEMA_VERSION: i64 = 1;
/// Seeding only runs while no car with this id exists.
pub const SAMPLE_BOOTSTRAP_ID: i64 = 1;

const CAR_TABLE: &str = "car_items";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[
    RequiredIndex {
        name: "idx_car_items_brand_model",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_car_items_brand_model ON car_items (brand, model);",
    },
    RequiredIndex {
        name: "idx_car_items_is_rented",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_car_items_is_rented ON car_items (is_rented);",
    },
];

const SELECT_CARS: &str = "
    SELECT id, brand, model, year, color, license_plate, daily_rate, is_rented, notes
    FROM car_items
";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the car table, replacing one left behind by an incompatible
    /// schema. Stored rows do not survive a replacement.
    pub fn bootstrap(&self) -> Result<()> {
        if table_exists(&self.conn, CAR_TABLE)? && !schema_is_current(&self.conn)? {
            warn!(
                table = CAR_TABLE,
                expected_version = SCHEMA_VERSION,
                "car table does not match the current schema; recreating it"
            );
            self.conn
                .execute_batch("DROP TABLE car_items;")
                .context("drop outdated car table")?;
        }

        self.conn
            .execute_batch(include_str!("sql/schema.sql"))
            .context("create schema")?;
        ensure_required_indexes(&self.conn)?;
        Ok(())
    }

    /// Inserts the sample fleet into a table that has never held a car.
    /// Returns whether anything was inserted.
    pub fn seed_sample_fleet(&self) -> Result<bool> {
        if self.get_car(CarId::new(SAMPLE_BOOTSTRAP_ID))?.is_some()
            || has_insert_history(&self.conn)?
        {
            debug!("sample fleet already seeded");
            return Ok(false);
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin sample fleet transaction")?;
        let fleet = sample_fleet();
        for draft in &fleet {
            insert_draft(&tx, draft)?;
        }
        tx.commit().context("commit sample fleet")?;
        info!(count = fleet.len(), "seeded sample fleet");
        Ok(true)
    }

    /// Cars ordered by brand then model.
    pub fn list_cars(&self, filter: CarFilter) -> Result<Vec<CarRecord>> {
        let sql = format!(
            "{SELECT_CARS}{}ORDER BY brand ASC, model ASC, id ASC",
            rental_clause(filter)
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare cars query")?;
        let rows = stmt.query_map([], car_from_row).context("query cars")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect cars")
    }

    pub fn get_car(&self, car_id: CarId) -> Result<Option<CarRecord>> {
        self.conn
            .query_row(
                &format!("{SELECT_CARS}WHERE id = ?"),
                params![car_id.get()],
                car_from_row,
            )
            .optional()
            .with_context(|| format!("load car {car_id}"))
    }

    pub fn insert_car(&self, draft: &CarDraft) -> Result<CarId> {
        insert_draft(&self.conn, draft)
    }

    /// Rewrites every column of the car stored under `car.id`. Returns
    /// false when no such car exists; nothing is written in that case.
    pub fn update_car(&self, car: &CarRecord) -> Result<bool> {
        update_record(&self.conn, car)
    }

    /// Applies every update in one transaction and returns how many rows
    /// matched.
    pub fn update_cars(&self, cars: &[CarRecord]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin batch update")?;
        let mut matched = 0;
        for car in cars {
            if update_record(&tx, car)? {
                matched += 1;
            }
        }
        tx.commit().context("commit batch update")?;
        Ok(matched)
    }

    pub fn delete_car(&self, car_id: CarId) -> Result<bool> {
        delete_record(&self.conn, car_id)
    }

    pub fn delete_cars(&self, car_ids: &[CarId]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin batch delete")?;
        let mut deleted = 0;
        for car_id in car_ids {
            if delete_record(&tx, *car_id)? {
                deleted += 1;
            }
        }
        tx.commit().context("commit batch delete")?;
        Ok(deleted)
    }

    pub fn delete_all_cars(&self) -> Result<usize> {
        self.conn
            .execute("DELETE FROM car_items", [])
            .context("delete all cars")
    }

    pub fn count_cars(&self, filter: CarFilter) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM car_items {}", rental_clause(filter)),
                [],
                |row| row.get(0),
            )
            .with_context(|| format!("count {} cars", filter.as_str()))?;
        usize::try_from(count).with_context(|| format!("car count {count} out of range"))
    }

    /// Sum of daily rates over rented cars; `None` when nothing is rented.
    pub fn total_daily_revenue(&self) -> Result<Option<f64>> {
        self.conn
            .query_row(
                "SELECT SUM(daily_rate) FROM car_items WHERE is_rented = 1",
                [],
                |row| row.get::<_, Option<f64>>(0),
            )
            .context("sum rented daily rates")
    }

    pub fn fleet_stats(&self) -> Result<FleetStats> {
        Ok(FleetStats {
            total: self.count_cars(CarFilter::All)?,
            available: self.count_cars(CarFilter::Available)?,
            rented: self.count_cars(CarFilter::Rented)?,
            daily_revenue: self.total_daily_revenue()?.unwrap_or(0.0),
        })
    }
}

/// The five cars a fresh database starts with.
pub fn sample_fleet() -> Vec<CarDraft> {
    let car = |brand: &str,
               model: &str,
               year: i32,
               color: &str,
               license_plate: &str,
               daily_rate: f64,
               is_rented: bool,
               notes: &str| CarDraft {
        brand: brand.to_owned(),
        model: model.to_owned(),
        year,
        color: color.to_owned(),
        license_plate: license_plate.to_owned(),
        daily_rate,
        is_rented,
        notes: notes.to_owned(),
    };

    vec![
        car(
            "Toyota",
            "Camry",
            2023,
            "Silver",
            "ABC-1234",
            100.0,
            false,
            "Fuel-efficient sedan, ideal for city driving",
        ),
        car(
            "Ford",
            "Mustang",
            2022,
            "Red",
            "XYZ-5678",
            250.0,
            true,
            "Sports car with a V8 engine",
        ),
        car(
            "Honda",
            "Civic",
            2024,
            "Blue",
            "DEF-9012",
            89.99,
            false,
            "Reliable compact car",
        ),
        car(
            "Tesla",
            "Model 3",
            2023,
            "White",
            "ELE-2024",
            320.99,
            false,
            "Electric, long range",
        ),
        car(
            "Chevrolet",
            "Suburban",
            2023,
            "Black",
            "SUV-7890",
            199.0,
            true,
            "Large SUV for family trips",
        ),
    ]
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("RENTALL_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let app_dir = data_dir()?;
    Ok(app_dir.join("rentall.db"))
}

/// `<data_local_dir>/rentall`, created on demand.
pub fn data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set RENTALL_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn rental_clause(filter: CarFilter) -> &'static str {
    match filter {
        CarFilter::All => "",
        CarFilter::Available => "WHERE is_rented = 0\n",
        CarFilter::Rented => "WHERE is_rented = 1\n",
    }
}

fn car_from_row(row: &Row<'_>) -> rusqlite::Result<CarRecord> {
    Ok(CarRecord {
        id: CarId::new(row.get(0)?),
        brand: row.get(1)?,
        model: row.get(2)?,
        year: row.get(3)?,
        color: row.get(4)?,
        license_plate: row.get(5)?,
        daily_rate: row.get(6)?,
        is_rented: row.get(7)?,
        notes: row.get(8)?,
    })
}

fn insert_draft(conn: &Connection, draft: &CarDraft) -> Result<CarId> {
    conn.execute(
        "
        INSERT INTO car_items (
          brand, model, year, color, license_plate, daily_rate, is_rented, notes
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
        params![
            draft.brand,
            draft.model,
            draft.year,
            draft.color,
            draft.license_plate,
            draft.daily_rate,
            draft.is_rented,
            draft.notes,
        ],
    )
    .with_context(|| format!("insert car {}", draft.license_plate))?;

    Ok(CarId::new(conn.last_insert_rowid()))
}

fn update_record(conn: &Connection, car: &CarRecord) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "
            UPDATE car_items
            SET
              brand = ?,
              model = ?,
              year = ?,
              color = ?,
              license_plate = ?,
              daily_rate = ?,
              is_rented = ?,
              notes = ?
            WHERE id = ?
            ",
            params![
                car.brand,
                car.model,
                car.year,
                car.color,
                car.license_plate,
                car.daily_rate,
                car.is_rented,
                car.notes,
                car.id.get(),
            ],
        )
        .with_context(|| format!("update car {}", car.id))?;
    Ok(rows_affected > 0)
}

fn delete_record(conn: &Connection, car_id: CarId) -> Result<bool> {
    let rows_affected = conn
        .execute("DELETE FROM car_items WHERE id = ?", params![car_id.get()])
        .with_context(|| format!("delete car {car_id}"))?;
    Ok(rows_affected > 0)
}

fn schema_is_current(conn: &Connection) -> Result<bool> {
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("read schema version")?;
    if version != SCHEMA_VERSION {
        return Ok(false);
    }

    let columns = table_columns(conn, CAR_TABLE)?;
    let missing = car_columns()
        .filter(|column| !columns.contains(*column))
        .count();
    Ok(missing == 0)
}

fn car_columns() -> impl Iterator<Item = &'static str> {
    iter::once("id").chain(CarField::ALL.into_iter().map(CarField::column))
}

fn has_insert_history(conn: &Connection) -> Result<bool> {
    let seen = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_sequence WHERE name = ?)",
            params![CAR_TABLE],
            |row| row.get::<_, i64>(0),
        )
        .context("check car insert history")?;
    Ok(seen == 1)
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }

    let existing_indexes = index_names(conn)?;
    let missing = REQUIRED_INDEXES
        .iter()
        .filter(|index| !existing_indexes.contains(index.name))
        .map(|index| index.name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!(
            "database is missing required indexes: {}; delete the database file to rebuild it",
            missing.join(", ")
        );
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn index_names(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(
            "
            SELECT name
            FROM sqlite_master
            WHERE type = 'index'
              AND name NOT LIKE 'sqlite_%'
            ORDER BY name ASC
            ",
        )
        .context("prepare index names query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query index names")?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .context("collect index names")
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}
