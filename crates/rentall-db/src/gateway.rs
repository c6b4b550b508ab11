// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use rentall_app::{CarDraft, CarFilter, CarId, CarRecord, FleetStats};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info};

use crate::Store;

/// Everything the screen shows, read in one pass after each write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSnapshot {
    /// Ordered by brand then model.
    pub cars: Vec<CarRecord>,
    pub total: usize,
    pub available: usize,
    pub rented: usize,
    pub daily_revenue: Option<f64>,
}

impl FleetSnapshot {
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self {
            cars: store.list_cars(CarFilter::All)?,
            total: store.count_cars(CarFilter::All)?,
            available: store.count_cars(CarFilter::Available)?,
            rented: store.count_cars(CarFilter::Rented)?,
            daily_revenue: store.total_daily_revenue()?,
        })
    }

    pub fn cars_matching(&self, filter: CarFilter) -> Vec<CarRecord> {
        self.cars
            .iter()
            .filter(|car| filter.matches(car.is_rented))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> FleetStats {
        FleetStats {
            total: self.total,
            available: self.available,
            rented: self.rented,
            daily_revenue: self.daily_revenue.unwrap_or(0.0),
        }
    }
}

/// A value projected out of the latest snapshot that follows every
/// subsequent write.
pub struct Live<T> {
    receiver: watch::Receiver<Arc<FleetSnapshot>>,
    project: fn(&FleetSnapshot) -> T,
}

impl<T> Live<T> {
    fn new(receiver: watch::Receiver<Arc<FleetSnapshot>>, project: fn(&FleetSnapshot) -> T) -> Self {
        Self { receiver, project }
    }

    pub fn current(&self) -> T {
        let snapshot = self.receiver.borrow();
        (self.project)(&**snapshot)
    }

    /// Waits for the next published snapshot. Returns `None` once every
    /// gateway handle is gone.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let snapshot = self.receiver.borrow_and_update();
        Some((self.project)(&**snapshot))
    }

    /// Yields the current value first, then one value per published
    /// snapshot. Intermediate snapshots may be skipped by slow consumers.
    pub fn into_stream(self) -> impl Stream<Item = T> + Unpin {
        let project = self.project;
        WatchStream::new(self.receiver).map(move |snapshot| project(&snapshot))
    }
}

/// Asynchronous, observable access to the car store. Clones share one
/// connection and one snapshot channel.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<Mutex<Store>>,
    snapshots: Arc<watch::Sender<Arc<FleetSnapshot>>>,
}

impl Gateway {
    /// Takes ownership of a bootstrapped store and publishes its contents.
    pub fn new(store: Store) -> Result<Self> {
        let initial = FleetSnapshot::load(&store).context("load initial fleet")?;
        info!(count = initial.total, "fleet gateway ready");
        let (sender, _) = watch::channel(Arc::new(initial));
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            snapshots: Arc::new(sender),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<FleetSnapshot>> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> Arc<FleetSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn observe_all(&self) -> Live<Vec<CarRecord>> {
        Live::new(self.subscribe(), |snapshot| snapshot.cars.clone())
    }

    pub fn observe_available(&self) -> Live<Vec<CarRecord>> {
        Live::new(self.subscribe(), |snapshot| {
            snapshot.cars_matching(CarFilter::Available)
        })
    }

    pub fn observe_rented(&self) -> Live<Vec<CarRecord>> {
        Live::new(self.subscribe(), |snapshot| {
            snapshot.cars_matching(CarFilter::Rented)
        })
    }

    pub fn observe_count(&self) -> Live<usize> {
        Live::new(self.subscribe(), |snapshot| snapshot.total)
    }

    pub fn observe_available_count(&self) -> Live<usize> {
        Live::new(self.subscribe(), |snapshot| snapshot.available)
    }

    pub fn observe_rented_count(&self) -> Live<usize> {
        Live::new(self.subscribe(), |snapshot| snapshot.rented)
    }

    /// `None` while no car is rented.
    pub fn observe_total_daily_revenue(&self) -> Live<Option<f64>> {
        Live::new(self.subscribe(), |snapshot| snapshot.daily_revenue)
    }

    pub async fn get_by_id(&self, car_id: CarId) -> Result<Option<CarRecord>> {
        self.read(move |store| store.get_car(car_id)).await
    }

    pub async fn insert(&self, draft: CarDraft) -> Result<CarId> {
        let car_id = self.write(move |store| store.insert_car(&draft)).await?;
        debug!(car_id = car_id.get(), "inserted car");
        Ok(car_id)
    }

    /// Replaces the stored car with the same id. A missing id is not an
    /// error; nothing is written and `false` is returned.
    pub async fn update(&self, car: CarRecord) -> Result<bool> {
        let car_id = car.id;
        let matched = self.write(move |store| store.update_car(&car)).await?;
        if matched {
            debug!(car_id = car_id.get(), "updated car");
        } else {
            debug!(car_id = car_id.get(), "update matched no stored car");
        }
        Ok(matched)
    }

    pub async fn delete(&self, car: CarRecord) -> Result<bool> {
        let car_id = car.id;
        let deleted = self.write(move |store| store.delete_car(car_id)).await?;
        debug!(car_id = car_id.get(), deleted, "deleted car");
        Ok(deleted)
    }

    pub async fn delete_batch(&self, cars: Vec<CarRecord>) -> Result<usize> {
        let ids = cars.iter().map(|car| car.id).collect::<Vec<_>>();
        let deleted = self.write(move |store| store.delete_cars(&ids)).await?;
        debug!(requested = cars.len(), deleted, "deleted car batch");
        Ok(deleted)
    }

    pub async fn delete_all(&self) -> Result<usize> {
        let deleted = self.write(Store::delete_all_cars).await?;
        info!(deleted, "deleted all cars");
        Ok(deleted)
    }

    pub async fn update_batch(&self, cars: Vec<CarRecord>) -> Result<usize> {
        let requested = cars.len();
        let matched = self.write(move |store| store.update_cars(&cars)).await?;
        debug!(requested, matched, "updated car batch");
        Ok(matched)
    }

    /// Re-reads the store and publishes the result, for writes made
    /// outside this gateway.
    pub async fn refresh(&self) -> Result<()> {
        self.write(|_| Ok(())).await
    }

    async fn read<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let store = store.lock().map_err(|_| anyhow!("store lock poisoned"))?;
            operation(&store)
        })
        .await
        .context("join store task")?
    }

    /// Runs `operation` and publishes a fresh snapshot from the same
    /// blocking task, so both finish even if the caller stops waiting.
    async fn write<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let snapshots = Arc::clone(&self.snapshots);
        tokio::task::spawn_blocking(move || {
            let store = store.lock().map_err(|_| anyhow!("store lock poisoned"))?;
            let value = operation(&store)?;
            let snapshot = FleetSnapshot::load(&store).context("reload fleet")?;
            snapshots.send_replace(Arc::new(snapshot));
            Ok(value)
        })
        .await
        .context("join store task")?
    }
}
