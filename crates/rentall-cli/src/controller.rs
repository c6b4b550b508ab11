// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::future::Future;

use anyhow::Result;
use rentall_app::{
    BatchEdit, CarDraft, CarFilter, CarId, CarRecord, FleetAction, FleetStats, SortOption,
    ValidationError, ViewCommand, ViewEvent, ViewState,
};
use rentall_db::Gateway;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Failed to {action}: {cause:#}")]
    Persistence {
        action: &'static str,
        cause: anyhow::Error,
    },
}

/// Owns the screen's view state and turns user commands into gateway
/// calls. Failures end up in the one-shot error message, never in the
/// caller.
pub struct FleetController {
    gateway: Gateway,
    state: ViewState,
}

impl FleetController {
    pub fn new(gateway: Gateway, state: ViewState) -> Self {
        Self { gateway, state }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The displayed list, derived from the latest published snapshot.
    pub fn cars(&self) -> Vec<CarRecord> {
        self.state.derive(&self.gateway.snapshot().cars)
    }

    pub fn stats(&self) -> FleetStats {
        self.gateway.snapshot().stats()
    }

    fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        self.state.dispatch(command)
    }

    pub fn set_filter(&mut self, filter: CarFilter) {
        self.dispatch(ViewCommand::SetFilter(filter));
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.dispatch(ViewCommand::SetSort(sort));
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(ViewCommand::SetSearchQuery(query.into()));
    }

    pub fn toggle_selection(&mut self, car_id: CarId) {
        self.dispatch(ViewCommand::ToggleSelection(car_id));
    }

    /// Selects every car currently on screen.
    pub fn select_all(&mut self) {
        let ids = self.cars().iter().map(|car| car.id).collect();
        self.dispatch(ViewCommand::SelectAll(ids));
    }

    pub fn deselect_all(&mut self) {
        self.dispatch(ViewCommand::DeselectAll);
    }

    pub fn toggle_multi_select_mode(&mut self) {
        self.dispatch(ViewCommand::ToggleMultiSelectMode);
    }

    pub fn exit_multi_select_mode(&mut self) {
        self.dispatch(ViewCommand::ExitMultiSelectMode);
    }

    pub fn clear_error_message(&mut self) {
        self.dispatch(ViewCommand::ClearError);
    }

    pub fn clear_success_message(&mut self) {
        self.dispatch(ViewCommand::ClearSuccess);
    }

    /// Reads the pending error message and clears it.
    pub fn take_error_message(&mut self) -> Option<String> {
        let message = self.state.error_message.clone();
        self.clear_error_message();
        message
    }

    pub fn take_success_message(&mut self) -> Option<String> {
        let message = self.state.success_message.clone();
        self.clear_success_message();
        message
    }

    /// Runs one mutating command. Returns whether it succeeded.
    pub async fn execute(&mut self, action: FleetAction) -> bool {
        match action {
            FleetAction::AddCar(draft) => self.add_car(draft).await,
            FleetAction::UpdateCar(car) => self.update_car(car).await,
            FleetAction::DeleteCar(car) => self.delete_car(car).await,
            FleetAction::DeleteSelected => self.delete_selected_cars().await,
            FleetAction::DeleteAll => self.delete_all_cars().await,
            FleetAction::UpdateSelected(edit) => self.update_selected_cars(edit).await,
            FleetAction::ToggleRental(car) => self.toggle_car_rental_status(car).await,
        }
    }

    pub async fn add_car(&mut self, draft: CarDraft) -> bool {
        let draft = draft.normalized();
        if let Err(error) = draft.validate() {
            self.report(error.into());
            return false;
        }

        let gateway = self.gateway.clone();
        let added = self
            .command("add car", async move { gateway.insert(draft).await })
            .await;
        match added {
            Some(car_id) => {
                debug!(car_id = car_id.get(), "car added");
                self.state.set_success("Car added successfully!");
                true
            }
            None => false,
        }
    }

    pub async fn update_car(&mut self, car: CarRecord) -> bool {
        let draft = car.draft().normalized();
        if let Err(error) = draft.validate() {
            self.report(error.into());
            return false;
        }

        let gateway = self.gateway.clone();
        let car = car.with_draft(draft);
        let updated = self
            .command("update car", async move { gateway.update(car).await })
            .await;
        if updated.is_none() {
            return false;
        }
        self.state.set_success("Car updated successfully!");
        true
    }

    pub async fn delete_car(&mut self, car: CarRecord) -> bool {
        let gateway = self.gateway.clone();
        let deleted = self
            .command("delete car", async move { gateway.delete(car).await })
            .await;
        if deleted.is_none() {
            return false;
        }
        self.state.set_success("Car deleted successfully!");
        true
    }

    /// Deletes the selected cars that are on screen, then leaves
    /// multi-select mode.
    pub async fn delete_selected_cars(&mut self) -> bool {
        let targets = self.state.selected_from(&self.cars());
        let count = targets.len();

        let gateway = self.gateway.clone();
        let deleted = self
            .command("delete cars", async move { gateway.delete_batch(targets).await })
            .await;
        if deleted.is_none() {
            return false;
        }
        self.state
            .set_success(format!("{count} car(s) deleted successfully!"));
        self.state.dispatch(ViewCommand::ExitMultiSelectMode);
        true
    }

    pub async fn delete_all_cars(&mut self) -> bool {
        let gateway = self.gateway.clone();
        let deleted = self
            .command("delete all cars", async move { gateway.delete_all().await })
            .await;
        if deleted.is_none() {
            return false;
        }
        self.state.set_success("All cars deleted successfully!");
        self.state.dispatch(ViewCommand::ExitMultiSelectMode);
        true
    }

    /// Applies the supplied fields of `edit` to every selected car on
    /// screen, then leaves multi-select mode.
    pub async fn update_selected_cars(&mut self, edit: BatchEdit) -> bool {
        let targets = self
            .state
            .selected_from(&self.cars())
            .iter()
            .map(|car| car.apply_batch(&edit))
            .collect::<Vec<_>>();
        if let Some(error) = targets
            .iter()
            .find_map(|car| car.draft().validate().err())
        {
            self.report(error.into());
            return false;
        }
        let count = targets.len();

        let gateway = self.gateway.clone();
        let updated = self
            .command("update cars", async move { gateway.update_batch(targets).await })
            .await;
        if updated.is_none() {
            return false;
        }
        self.state
            .set_success(format!("{count} car(s) updated successfully!"));
        self.state.dispatch(ViewCommand::ExitMultiSelectMode);
        true
    }

    pub async fn toggle_car_rental_status(&mut self, car: CarRecord) -> bool {
        let toggled = car.with_rented(!car.is_rented);
        let is_rented = toggled.is_rented;

        let gateway = self.gateway.clone();
        let updated = self
            .command("update rental status", async move {
                gateway.update(toggled).await
            })
            .await;
        if updated.is_none() {
            return false;
        }
        self.state.set_success(if is_rented {
            "Car marked as rented"
        } else {
            "Car marked as available"
        });
        true
    }

    async fn command<T, F>(&mut self, action: &'static str, operation: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.state.is_loading = true;
        let result = operation.await;
        self.state.is_loading = false;

        match result {
            Ok(value) => Some(value),
            Err(cause) => {
                self.report(CommandError::Persistence { action, cause });
                None
            }
        }
    }

    fn report(&mut self, error: CommandError) {
        warn!(error = %error, "fleet command failed");
        self.state.set_error(error.to_string());
    }
}
