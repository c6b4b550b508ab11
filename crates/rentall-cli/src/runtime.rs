// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rentall_app::{CarFilter, CarId, CarRecord, FleetAction, FleetStats, SortOption, ViewState};
use tokio::runtime::Runtime;

use crate::controller::FleetController;

/// Drives the async controller from the synchronous terminal loop.
pub struct DbRuntime<'a> {
    runtime: &'a Runtime,
    controller: FleetController,
}

impl<'a> DbRuntime<'a> {
    pub fn new(runtime: &'a Runtime, controller: FleetController) -> Self {
        Self {
            runtime,
            controller,
        }
    }
}

impl rentall_tui::AppRuntime for DbRuntime<'_> {
    fn view_state(&self) -> &ViewState {
        self.controller.state()
    }

    fn cars(&mut self) -> Vec<CarRecord> {
        self.controller.cars()
    }

    fn stats(&mut self) -> FleetStats {
        self.controller.stats()
    }

    fn set_filter(&mut self, filter: CarFilter) {
        self.controller.set_filter(filter);
    }

    fn set_sort(&mut self, sort: SortOption) {
        self.controller.set_sort(sort);
    }

    fn set_search_query(&mut self, query: String) {
        self.controller.set_search_query(query);
    }

    fn toggle_selection(&mut self, car_id: CarId) {
        self.controller.toggle_selection(car_id);
    }

    fn select_all(&mut self) {
        self.controller.select_all();
    }

    fn deselect_all(&mut self) {
        self.controller.deselect_all();
    }

    fn toggle_multi_select_mode(&mut self) {
        self.controller.toggle_multi_select_mode();
    }

    fn exit_multi_select_mode(&mut self) {
        self.controller.exit_multi_select_mode();
    }

    fn execute(&mut self, action: FleetAction) -> bool {
        self.runtime.block_on(self.controller.execute(action))
    }

    fn take_error_message(&mut self) -> Option<String> {
        self.controller.take_error_message()
    }

    fn take_success_message(&mut self) -> Option<String> {
        self.controller.take_success_message()
    }
}

#[cfg(test)]
mod tests {
    use super::DbRuntime;
    use crate::controller::FleetController;
    use anyhow::Result;
    use rentall_app::{CarFilter, FleetAction, ViewState};
    use rentall_db::{Gateway, Store};
    use rentall_testkit::{civic_draft, draft};
    use rentall_tui::AppRuntime;
    use tokio::runtime::{Builder, Runtime};

    fn test_runtime() -> Result<Runtime> {
        Ok(Builder::new_current_thread().enable_all().build()?)
    }

    fn controller() -> Result<FleetController> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        Ok(FleetController::new(
            Gateway::new(store)?,
            ViewState::default(),
        ))
    }

    #[test]
    fn execute_adds_car_and_reports_success() -> Result<()> {
        let tokio = test_runtime()?;
        let mut runtime = DbRuntime::new(&tokio, controller()?);

        assert!(runtime.execute(FleetAction::AddCar(civic_draft())));

        let cars = runtime.cars();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].display_name(), "Honda Civic");
        assert_eq!(runtime.stats().available, 1);
        assert_eq!(
            runtime.take_success_message().as_deref(),
            Some("Car added successfully!")
        );
        assert_eq!(runtime.take_success_message(), None);
        Ok(())
    }

    #[test]
    fn invalid_car_leaves_error_message() -> Result<()> {
        let tokio = test_runtime()?;
        let mut runtime = DbRuntime::new(&tokio, controller()?);

        assert!(!runtime.execute(FleetAction::AddCar(draft("K", "Rio", 45.0, false))));

        assert!(runtime.cars().is_empty());
        assert_eq!(
            runtime.take_error_message().as_deref(),
            Some("Brand must be at least 2 characters")
        );
        Ok(())
    }

    #[test]
    fn filter_narrows_the_displayed_cars() -> Result<()> {
        let tokio = test_runtime()?;
        let mut runtime = DbRuntime::new(&tokio, controller()?);
        runtime.execute(FleetAction::AddCar(draft("Kia", "Rio", 45.0, false)));
        runtime.execute(FleetAction::AddCar(draft("Ford", "Mustang", 250.0, true)));

        runtime.set_filter(CarFilter::Rented);

        let cars = runtime.cars();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].brand, "Ford");
        assert_eq!(runtime.view_state().filter, CarFilter::Rented);
        assert_eq!(runtime.stats().total, 2);

        runtime.toggle_multi_select_mode();
        runtime.select_all();
        assert_eq!(runtime.view_state().selected.len(), 1);
        assert!(runtime.view_state().is_selected(cars[0].id));
        Ok(())
    }
}
