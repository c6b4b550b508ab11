// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{CarFilter, CarId, CarRecord, SortOption, derive_cars};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub filter: CarFilter,
    pub sort: SortOption,
    pub search_query: String,
    pub multi_select: bool,
    pub selected: BTreeSet<CarId>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SetFilter(CarFilter),
    SetSort(SortOption),
    SetSearchQuery(String),
    ToggleSelection(CarId),
    /// Carries the ids of the list currently on screen.
    SelectAll(Vec<CarId>),
    DeselectAll,
    ToggleMultiSelectMode,
    ExitMultiSelectMode,
    ClearError,
    ClearSuccess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    FilterChanged(CarFilter),
    SortChanged(SortOption),
    SearchChanged(String),
    SelectionChanged(usize),
    MultiSelectChanged(bool),
    ErrorCleared,
    SuccessCleared,
}

impl ViewState {
    pub fn with_defaults(filter: CarFilter, sort: SortOption) -> Self {
        Self {
            filter,
            sort,
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SetFilter(filter) => {
                self.filter = filter;
                vec![ViewEvent::FilterChanged(filter)]
            }
            ViewCommand::SetSort(sort) => {
                self.sort = sort;
                vec![ViewEvent::SortChanged(sort)]
            }
            ViewCommand::SetSearchQuery(query) => {
                self.search_query = query.clone();
                vec![ViewEvent::SearchChanged(query)]
            }
            ViewCommand::ToggleSelection(id) => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
                vec![self.selection_changed()]
            }
            ViewCommand::SelectAll(ids) => {
                self.selected = ids.into_iter().collect();
                vec![self.selection_changed()]
            }
            ViewCommand::DeselectAll => {
                self.selected.clear();
                vec![self.selection_changed()]
            }
            ViewCommand::ToggleMultiSelectMode => {
                if self.multi_select {
                    self.exit_multi_select()
                } else {
                    self.multi_select = true;
                    vec![ViewEvent::MultiSelectChanged(true)]
                }
            }
            ViewCommand::ExitMultiSelectMode => self.exit_multi_select(),
            ViewCommand::ClearError => {
                self.error_message = None;
                vec![ViewEvent::ErrorCleared]
            }
            ViewCommand::ClearSuccess => {
                self.success_message = None;
                vec![ViewEvent::SuccessCleared]
            }
        }
    }

    pub fn derive(&self, cars: &[CarRecord]) -> Vec<CarRecord> {
        derive_cars(cars, self.filter, self.sort, &self.search_query)
    }

    pub fn is_selected(&self, id: CarId) -> bool {
        self.selected.contains(&id)
    }

    /// Cars from `derived` whose id is selected, in display order.
    pub fn selected_from(&self, derived: &[CarRecord]) -> Vec<CarRecord> {
        derived
            .iter()
            .filter(|car| self.selected.contains(&car.id))
            .cloned()
            .collect()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.success_message = Some(message.into());
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.error_message.take()
    }

    pub fn take_success(&mut self) -> Option<String> {
        self.success_message.take()
    }

    fn exit_multi_select(&mut self) -> Vec<ViewEvent> {
        self.multi_select = false;
        self.selected.clear();
        vec![
            ViewEvent::MultiSelectChanged(false),
            ViewEvent::SelectionChanged(0),
        ]
    }

    fn selection_changed(&self) -> ViewEvent {
        ViewEvent::SelectionChanged(self.selected.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewCommand, ViewEvent, ViewState};
    use crate::{CarFilter, CarId, SortOption};

    #[test]
    fn defaults_match_initial_screen() {
        let state = ViewState::default();
        assert_eq!(state.filter, CarFilter::All);
        assert_eq!(state.sort, SortOption::Brand);
        assert!(state.search_query.is_empty());
        assert!(!state.multi_select);
        assert!(state.selected.is_empty());
        assert!(!state.is_loading);
    }

    #[test]
    fn toggle_selection_is_symmetric() {
        let mut state = ViewState::default();

        let events = state.dispatch(ViewCommand::ToggleSelection(CarId::new(4)));
        assert_eq!(events, vec![ViewEvent::SelectionChanged(1)]);
        assert!(state.is_selected(CarId::new(4)));

        state.dispatch(ViewCommand::ToggleSelection(CarId::new(4)));
        assert!(state.selected.is_empty());
    }

    #[test]
    fn entering_multi_select_keeps_selection_and_exiting_clears_it() {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::ToggleSelection(CarId::new(1)));

        let entered = state.dispatch(ViewCommand::ToggleMultiSelectMode);
        assert_eq!(entered, vec![ViewEvent::MultiSelectChanged(true)]);
        assert_eq!(state.selected.len(), 1);

        let exited = state.dispatch(ViewCommand::ToggleMultiSelectMode);
        assert!(!state.multi_select);
        assert!(state.selected.is_empty());
        assert_eq!(
            exited,
            vec![
                ViewEvent::MultiSelectChanged(false),
                ViewEvent::SelectionChanged(0)
            ]
        );
    }

    #[test]
    fn select_all_replaces_selection() {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::ToggleSelection(CarId::new(9)));

        state.dispatch(ViewCommand::SelectAll(vec![CarId::new(1), CarId::new(2)]));
        assert_eq!(state.selected.len(), 2);
        assert!(!state.is_selected(CarId::new(9)));

        state.dispatch(ViewCommand::DeselectAll);
        assert!(state.selected.is_empty());
    }

    #[test]
    fn setters_assign_fields() {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::SetFilter(CarFilter::Rented));
        state.dispatch(ViewCommand::SetSort(SortOption::DailyRate));
        state.dispatch(ViewCommand::SetSearchQuery("civ".to_owned()));

        assert_eq!(state.filter, CarFilter::Rented);
        assert_eq!(state.sort, SortOption::DailyRate);
        assert_eq!(state.search_query, "civ");
    }

    #[test]
    fn messages_are_consumed_once() {
        let mut state = ViewState::default();
        state.set_success("Car added successfully!");
        state.set_error("Brand cannot be empty");

        assert_eq!(state.take_success().as_deref(), Some("Car added successfully!"));
        assert_eq!(state.take_success(), None);

        state.dispatch(ViewCommand::ClearError);
        assert_eq!(state.error_message, None);
    }
}
