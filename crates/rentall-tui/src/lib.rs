// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use rentall_app::{
    BatchEditForm, CarField, CarFilter, CarFormInput, CarId, CarRecord, FieldError, FleetAction,
    FleetStats, SortOption, ViewState, format_daily_rate,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

const DEFAULT_STATUS_CLEAR: Duration = Duration::from_secs(4);
const IDLE_HINT: &str = "n add | e edit | r rent/return | d delete | f filter | s sort | / search | v select | ? help";

/// What the screen needs from the layer that owns the fleet.
pub trait AppRuntime {
    fn view_state(&self) -> &ViewState;
    /// The displayed list: filtered, searched and sorted.
    fn cars(&mut self) -> Vec<CarRecord>;
    fn stats(&mut self) -> FleetStats;
    fn set_filter(&mut self, filter: CarFilter);
    fn set_sort(&mut self, sort: SortOption);
    fn set_search_query(&mut self, query: String);
    fn toggle_selection(&mut self, car_id: CarId);
    /// Selects every car in the displayed list.
    fn select_all(&mut self);
    fn deselect_all(&mut self);
    fn toggle_multi_select_mode(&mut self);
    fn exit_multi_select_mode(&mut self);
    /// Runs a mutating command; `false` means it failed and left an
    /// error message behind.
    fn execute(&mut self, action: FleetAction) -> bool;
    fn take_error_message(&mut self) -> Option<String>;
    fn take_success_message(&mut self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub status_clear_after: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            status_clear_after: DEFAULT_STATUS_CLEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusLine {
    kind: StatusKind,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
enum FormTarget {
    Add,
    Edit(CarRecord),
}

#[derive(Debug, Clone, PartialEq)]
struct FormUiState {
    target: FormTarget,
    input: CarFormInput,
    field: usize,
    errors: Vec<FieldError>,
}

impl FormUiState {
    fn focused(&self) -> CarField {
        CarField::ALL[self.field]
    }

    fn title(&self) -> &'static str {
        match self.target {
            FormTarget::Add => "add car",
            FormTarget::Edit(_) => "edit car",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchField {
    DailyRate,
    Color,
    Rental,
}

const BATCH_FIELDS: [BatchField; 3] = [BatchField::DailyRate, BatchField::Color, BatchField::Rental];

#[derive(Debug, Clone, PartialEq, Default)]
struct BatchUiState {
    form: BatchEditForm,
    field: usize,
    errors: Vec<FieldError>,
}

impl BatchUiState {
    fn focused(&self) -> BatchField {
        BATCH_FIELDS[self.field]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Overlay {
    #[default]
    Hidden,
    Help,
    Search,
    Form(FormUiState),
    Batch(BatchUiState),
    Confirm(FleetAction),
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    cars: Vec<CarRecord>,
    stats: FleetStats,
    cursor: usize,
    overlay: Overlay,
    status: Option<StatusLine>,
    status_token: u64,
    status_clear_after: Duration,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        Self {
            cars: Vec::new(),
            stats: FleetStats::default(),
            cursor: 0,
            overlay: Overlay::Hidden,
            status: None,
            status_token: 0,
            status_clear_after: options.status_clear_after,
        }
    }

    fn current_car(&self) -> Option<&CarRecord> {
        self.cars.get(self.cursor)
    }
}

pub fn run_app<R: AppRuntime>(runtime: &mut R, options: UiOptions) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();
    refresh_view_data(runtime, &mut view_data);

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view_data, &internal_rx);

        let state = runtime.view_state();
        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(false) => continue,
            Ok(true) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if handle_key_event(runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn refresh_view_data<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) {
    view_data.cars = runtime.cars();
    view_data.stats = runtime.stats();
    view_data.cursor = view_data.cursor.min(view_data.cars.len().saturating_sub(1));
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: StatusKind,
    text: impl Into<String>,
) {
    view_data.status = Some(StatusLine {
        kind,
        text: text.into(),
    });
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(
        internal_tx,
        view_data.status_token,
        view_data.status_clear_after,
    );
}

/// Moves pending one-shot messages into the status line, consuming them.
fn collect_messages<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let success = runtime.take_success_message();
    if let Some(error) = runtime.take_error_message() {
        emit_status(view_data, internal_tx, StatusKind::Error, error);
    } else if let Some(success) = success {
        emit_status(view_data, internal_tx, StatusKind::Success, success);
    }
}

fn run_action<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: FleetAction,
) -> bool {
    let label = action.label();
    let succeeded = runtime.execute(action);
    debug!(action = label, succeeded, "fleet action finished");
    refresh_view_data(runtime, view_data);
    collect_messages(runtime, view_data, internal_tx);
    succeeded
}

/// Returns true when the app should quit.
fn handle_key_event<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match std::mem::take(&mut view_data.overlay) {
        Overlay::Hidden => handle_list_key(runtime, view_data, internal_tx, key),
        Overlay::Help => {
            if !matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                view_data.overlay = Overlay::Help;
            }
        }
        Overlay::Search => handle_search_key(runtime, view_data, key),
        Overlay::Form(form) => handle_form_key(runtime, view_data, internal_tx, form, key),
        Overlay::Batch(batch) => handle_batch_key(runtime, view_data, internal_tx, batch, key),
        Overlay::Confirm(action) => {
            handle_confirm_key(runtime, view_data, internal_tx, action, key);
        }
    }
    false
}

fn handle_list_key<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let state = runtime.view_state();
    let multi_select = state.multi_select;
    let has_selection = !state.selected.is_empty();
    let filter = state.filter;
    let sort = state.sort;
    let searching = !state.search_query.is_empty();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if view_data.cursor + 1 < view_data.cars.len() {
                view_data.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.cursor = view_data.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => view_data.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.cursor = view_data.cars.len().saturating_sub(1);
        }
        KeyCode::Char('n') => {
            view_data.overlay = Overlay::Form(FormUiState {
                target: FormTarget::Add,
                input: CarFormInput::default(),
                field: 0,
                errors: Vec::new(),
            });
        }
        KeyCode::Char('e') => match view_data.current_car() {
            Some(car) => {
                view_data.overlay = Overlay::Form(FormUiState {
                    target: FormTarget::Edit(car.clone()),
                    input: CarFormInput::from_record(car),
                    field: 0,
                    errors: Vec::new(),
                });
            }
            None => emit_status(view_data, internal_tx, StatusKind::Info, "no car to edit"),
        },
        KeyCode::Char('r') => {
            if let Some(car) = view_data.current_car().cloned() {
                run_action(runtime, view_data, internal_tx, FleetAction::ToggleRental(car));
            }
        }
        KeyCode::Char('d') => {
            if let Some(car) = view_data.current_car().cloned() {
                view_data.overlay = Overlay::Confirm(FleetAction::DeleteCar(car));
            }
        }
        KeyCode::Char('D') => {
            if view_data.stats.total == 0 {
                emit_status(view_data, internal_tx, StatusKind::Info, "fleet is already empty");
            } else {
                view_data.overlay = Overlay::Confirm(FleetAction::DeleteAll);
            }
        }
        KeyCode::Char('f') => {
            let next = filter.next();
            runtime.set_filter(next);
            refresh_view_data(runtime, view_data);
            emit_status(
                view_data,
                internal_tx,
                StatusKind::Info,
                format!("showing {}", next.label()),
            );
        }
        KeyCode::Char('s') => {
            let next = sort.next();
            runtime.set_sort(next);
            refresh_view_data(runtime, view_data);
            emit_status(
                view_data,
                internal_tx,
                StatusKind::Info,
                format!("sorted by {}", next.label()),
            );
        }
        KeyCode::Char('/') => view_data.overlay = Overlay::Search,
        KeyCode::Char('v') => {
            runtime.toggle_multi_select_mode();
            refresh_view_data(runtime, view_data);
            let text = if multi_select {
                "multi-select off"
            } else {
                "multi-select on: space marks, a all, b edit, x delete"
            };
            emit_status(view_data, internal_tx, StatusKind::Info, text);
        }
        KeyCode::Char(' ') => {
            if !multi_select {
                emit_status(
                    view_data,
                    internal_tx,
                    StatusKind::Info,
                    "press v to start selecting cars",
                );
            } else if let Some(car_id) = view_data.current_car().map(|car| car.id) {
                runtime.toggle_selection(car_id);
                refresh_view_data(runtime, view_data);
            }
        }
        KeyCode::Char('a') if multi_select => {
            runtime.select_all();
            refresh_view_data(runtime, view_data);
        }
        KeyCode::Char('A') if multi_select => {
            runtime.deselect_all();
            refresh_view_data(runtime, view_data);
        }
        KeyCode::Char('b') | KeyCode::Char('x') if !multi_select || !has_selection => {
            emit_status(
                view_data,
                internal_tx,
                StatusKind::Info,
                "select cars first: v, then space",
            );
        }
        KeyCode::Char('b') => view_data.overlay = Overlay::Batch(BatchUiState::default()),
        KeyCode::Char('x') => view_data.overlay = Overlay::Confirm(FleetAction::DeleteSelected),
        KeyCode::Esc => {
            if multi_select {
                runtime.exit_multi_select_mode();
                refresh_view_data(runtime, view_data);
            } else if searching {
                runtime.set_search_query(String::new());
                refresh_view_data(runtime, view_data);
            }
        }
        KeyCode::Char('?') => view_data.overlay = Overlay::Help,
        _ => {}
    }
}

fn handle_search_key<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData, key: KeyEvent) {
    let mut query = runtime.view_state().search_query.clone();
    match key.code {
        KeyCode::Enter => return,
        KeyCode::Esc => {
            runtime.set_search_query(String::new());
            refresh_view_data(runtime, view_data);
            return;
        }
        KeyCode::Backspace => {
            query.pop();
        }
        KeyCode::Char(ch) => query.push(ch),
        _ => {}
    }
    view_data.cursor = 0;
    runtime.set_search_query(query);
    refresh_view_data(runtime, view_data);
    view_data.overlay = Overlay::Search;
}

fn handle_form_key<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mut form: FormUiState,
    key: KeyEvent,
) {
    let field_count = CarField::ALL.len();
    match key.code {
        KeyCode::Esc => {
            emit_status(view_data, internal_tx, StatusKind::Info, "form canceled");
            return;
        }
        KeyCode::Tab | KeyCode::Down => form.field = (form.field + 1) % field_count,
        KeyCode::BackTab | KeyCode::Up => {
            form.field = (form.field + field_count - 1) % field_count;
        }
        KeyCode::Enter => match form.input.parse() {
            Err(errors) => {
                emit_status(
                    view_data,
                    internal_tx,
                    StatusKind::Error,
                    errors.to_string(),
                );
                form.errors = errors.errors;
            }
            Ok(draft) => {
                let action = match &form.target {
                    FormTarget::Add => FleetAction::AddCar(draft),
                    FormTarget::Edit(car) => FleetAction::UpdateCar(car.with_draft(draft)),
                };
                if run_action(runtime, view_data, internal_tx, action) {
                    return;
                }
            }
        },
        KeyCode::Char(' ') if form.focused() == CarField::IsRented => {
            form.input.is_rented = !form.input.is_rented;
        }
        KeyCode::Char(ch) => {
            let focused = form.focused();
            if let Some(text) = form.input.text_mut(focused) {
                text.push(ch);
                form.errors.retain(|error| error.field != focused);
            }
        }
        KeyCode::Backspace => {
            let focused = form.focused();
            if let Some(text) = form.input.text_mut(focused) {
                text.pop();
            }
        }
        _ => {}
    }
    view_data.overlay = Overlay::Form(form);
}

fn handle_batch_key<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mut batch: BatchUiState,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            emit_status(view_data, internal_tx, StatusKind::Info, "batch edit canceled");
            return;
        }
        KeyCode::Tab | KeyCode::Down => batch.field = (batch.field + 1) % BATCH_FIELDS.len(),
        KeyCode::BackTab | KeyCode::Up => {
            batch.field = (batch.field + BATCH_FIELDS.len() - 1) % BATCH_FIELDS.len();
        }
        KeyCode::Enter => match batch.form.parse() {
            Err(errors) => {
                emit_status(
                    view_data,
                    internal_tx,
                    StatusKind::Error,
                    errors.to_string(),
                );
                batch.errors = errors.errors;
            }
            Ok(edit) if edit.is_empty() => {
                emit_status(view_data, internal_tx, StatusKind::Info, "nothing to change");
            }
            Ok(edit) => {
                if run_action(runtime, view_data, internal_tx, FleetAction::UpdateSelected(edit)) {
                    return;
                }
            }
        },
        KeyCode::Char(' ') if batch.focused() == BatchField::Rental => {
            batch.form.rental = batch.form.rental.next();
        }
        KeyCode::Char(ch) => match batch.focused() {
            BatchField::DailyRate => batch.form.daily_rate.push(ch),
            BatchField::Color => batch.form.color.push(ch),
            BatchField::Rental => {}
        },
        KeyCode::Backspace => match batch.focused() {
            BatchField::DailyRate => {
                batch.form.daily_rate.pop();
            }
            BatchField::Color => {
                batch.form.color.pop();
            }
            BatchField::Rental => {}
        },
        _ => {}
    }
    view_data.overlay = Overlay::Batch(batch);
}

fn handle_confirm_key<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: FleetAction,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            run_action(runtime, view_data, internal_tx, action);
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            emit_status(view_data, internal_tx, StatusKind::Info, "canceled");
        }
        _ => view_data.overlay = Overlay::Confirm(action),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &ViewState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(format!(
        "{}\n{}",
        stats_line(&view_data.stats),
        controls_line(state)
    ))
    .block(Block::default().title("rentall").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let (status, color) = status_text(view_data);
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    let overlay = match &view_data.overlay {
        Overlay::Hidden => None,
        Overlay::Help => Some(("help", help_overlay_text().to_owned(), (70, 70))),
        Overlay::Search => Some(("search", search_overlay_text(state), (50, 20))),
        Overlay::Form(form) => Some((form.title(), form_overlay_text(form), (60, 70))),
        Overlay::Batch(batch) => Some((
            "edit selected",
            batch_overlay_text(batch, state.selected.len()),
            (55, 45),
        )),
        Overlay::Confirm(action) => Some((
            "confirm",
            confirm_text(action, state, &view_data.stats),
            (50, 20),
        )),
    };
    if let Some((title, body, (percent_x, percent_y))) = overlay {
        let area = centered_rect(percent_x, percent_y, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(body).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(widget, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &ViewState,
    view_data: &ViewData,
) {
    let header = Row::new(["", "Car", "Year", "Color", "Plate", "Rate/day", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = view_data.cars.iter().enumerate().map(|(index, car)| {
        let cells = car_row_cells(car, state).map(Cell::from);
        let mut style = if car.is_rented {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        if index == view_data.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Row::new(cells).style(style)
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Min(18),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
    ];
    let title = if view_data.cars.is_empty() {
        "no cars match".to_owned()
    } else {
        format!("{} shown", view_data.cars.len())
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn car_row_cells(car: &CarRecord, state: &ViewState) -> [String; 7] {
    let mark = match (state.multi_select, state.is_selected(car.id)) {
        (false, _) => "",
        (true, true) => "[x]",
        (true, false) => "[ ]",
    };
    [
        mark.to_owned(),
        car.display_name(),
        car.year.to_string(),
        car.color.clone(),
        car.license_plate.clone(),
        format!("${}", format_daily_rate(car.daily_rate)),
        if car.is_rented { "rented" } else { "available" }.to_owned(),
    ]
}

fn stats_line(stats: &FleetStats) -> String {
    format!(
        "{} cars • {} available • {} rented • ${}/day",
        stats.total,
        stats.available,
        stats.rented,
        format_daily_rate(stats.daily_revenue)
    )
}

fn controls_line(state: &ViewState) -> String {
    let search = if state.search_query.is_empty() {
        "-".to_owned()
    } else {
        format!("{:?}", state.search_query)
    };
    let mode = if state.multi_select {
        format!("multi-select: {} selected", state.selected.len())
    } else {
        "browse".to_owned()
    };
    format!(
        "filter: {} | sort: {} | search: {search} | {mode}",
        state.filter.label(),
        state.sort.label()
    )
}

fn status_text(view_data: &ViewData) -> (String, Color) {
    match &view_data.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::Yellow,
                StatusKind::Success => Color::Green,
                StatusKind::Error => Color::Red,
            };
            (status.text.clone(), color)
        }
        None => (IDLE_HINT.to_owned(), Color::Gray),
    }
}

fn search_overlay_text(state: &ViewState) -> String {
    format!(
        "{}_\n\nmatches brand, model or plate\nenter keep | esc clear",
        state.search_query
    )
}

fn form_overlay_text(form: &FormUiState) -> String {
    let mut lines = Vec::with_capacity(CarField::ALL.len() * 2 + 2);
    for (index, field) in CarField::ALL.iter().copied().enumerate() {
        let marker = if index == form.field { ">" } else { " " };
        let value = match field {
            CarField::IsRented => {
                if form.input.is_rented {
                    "[x] rented".to_owned()
                } else {
                    "[ ] rented".to_owned()
                }
            }
            _ => form.input.text(field),
        };
        lines.push(format!("{marker} {:<14} {value}", field.label()));
        for error in form.errors.iter().filter(|error| error.field == field) {
            lines.push(format!("    ! {}", error.message));
        }
    }
    lines.push(String::new());
    lines.push("tab/shift+tab field | space toggle rented | enter save | esc cancel".to_owned());
    lines.join("\n")
}

fn batch_overlay_text(batch: &BatchUiState, selected: usize) -> String {
    let mut lines = vec![
        format!("{selected} car(s) selected; blank fields stay unchanged"),
        String::new(),
    ];
    for (index, field) in BATCH_FIELDS.iter().copied().enumerate() {
        let marker = if index == batch.field { ">" } else { " " };
        let (label, value, car_field) = match field {
            BatchField::DailyRate => (
                "Daily rate",
                batch.form.daily_rate.clone(),
                Some(CarField::DailyRate),
            ),
            BatchField::Color => ("Color", batch.form.color.clone(), Some(CarField::Color)),
            BatchField::Rental => ("Status", batch.form.rental.label().to_owned(), None),
        };
        lines.push(format!("{marker} {label:<12} {value}"));
        if let Some(car_field) = car_field {
            for error in batch.errors.iter().filter(|error| error.field == car_field) {
                lines.push(format!("    ! {}", error.message));
            }
        }
    }
    lines.push(String::new());
    lines.push("tab field | space cycle status | enter apply | esc cancel".to_owned());
    lines.join("\n")
}

fn confirm_text(action: &FleetAction, state: &ViewState, stats: &FleetStats) -> String {
    let question = match action {
        FleetAction::DeleteCar(car) => {
            format!("Delete {} ({})?", car.display_name(), car.license_plate)
        }
        FleetAction::DeleteAll => format!("Delete all {} cars?", stats.total),
        FleetAction::DeleteSelected => {
            format!("Delete {} selected car(s)?", state.selected.len())
        }
        other => format!("Run {}?", other.label()),
    };
    format!("{question}\n\ny confirm | n cancel")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
list: j/k move | g/G first/last | f filter | s sort | / search | esc clear search\n\
edit: n add | e edit | r rent/return | d delete | D delete all\n\
select: v multi-select | space mark | a all | A none | b edit marked | x delete marked | esc leave\n\
form: tab/shift+tab field | type to edit | space toggle rented | enter save | esc cancel"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
