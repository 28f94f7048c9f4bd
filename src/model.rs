use std::path::PathBuf;
use std::time::Instant;

use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{error, info, trace};

use crate::domain::{CastError, Config, HELP_TEXT, Message, Person};
use crate::engine::{self, DerivedView, SortDirection, ViewState};
use crate::inputter::{InputUpdate, SearchInput};
use crate::source;
use crate::ui::COLUMN_WIDTH_MARGIN;

#[derive(Debug, PartialEq)]
pub enum Status {
    LOADING,
    READY,
    FAILED,
    QUITTING,
}

#[derive(Debug, Clone, Copy)]
enum Modus {
    TABLE,
    SEARCH,
    POPUP,
}

/// One rendered column: header, render width and the visible cell strings.
#[derive(Clone, Default)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

/// Snapshot handed to the renderer. Rebuilt by the model on every change,
/// the UI never reaches back into model internals.
#[derive(Clone, Default)]
pub struct UiData {
    pub title: String,
    pub columns: Vec<ColumnView>,
    pub total_filtered: usize,
    pub total_people: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
    pub search_text: String,
    pub page_size: usize,
    pub sort_indicator: &'static str,
    pub show_popup: bool,
    pub popup_message: String,
    pub search_active: bool,
    pub search_input: InputUpdate,
    pub status_message: String,
    pub last_status_message_update: Option<Instant>,
}

pub struct Model {
    config: Config,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    source_name: String,
    people: Vec<Person>,
    view_state: ViewState,
    uidata: UiData,
    failure: Option<String>,
    popup_message: String,
    clipboard: Option<Clipboard>,
    input: SearchInput,
    last_input: InputUpdate,
    status_message: String,
    last_status_message_update: Option<Instant>,
}

impl Model {
    pub fn init(config: &Config) -> Result<Self, CastError> {
        let mut model = Self {
            config: config.clone(),
            status: Status::LOADING,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            source_name: String::new(),
            people: Vec::new(),
            view_state: ViewState::new(config.default_page_size),
            uidata: UiData::default(),
            failure: None,
            popup_message: String::new(),
            clipboard: Clipboard::new().ok(),
            input: SearchInput::default(),
            last_input: InputUpdate::default(),
            status_message: String::new(),
            last_status_message_update: None,
        };
        model.refresh();
        model.set_status_message("Loading ...");
        Ok(model)
    }

    /// Load cast records from disk. A failure is a terminal display state,
    /// not a crash: the UI keeps running and renders the failure screen.
    pub fn load_data_file(&mut self, path: PathBuf) {
        self.status = Status::LOADING;
        self.source_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();
        match source::load_people(path) {
            Ok(people) => {
                // Records arriving means a fresh view with default controls.
                self.view_state = ViewState::new(self.config.default_page_size);
                self.replace_people(people);
                self.set_status_message(format!("Loaded {} cast records", self.people.len()));
            }
            Err(e) => {
                error!("Loading cast records failed: {e:?}");
                self.failure = Some(format!("{e:?}"));
                self.status = Status::FAILED;
            }
        }
    }

    /// A re-queried record list is a full replacement: the view state is
    /// kept but reconciled against the new filtered page count.
    pub fn replace_people(&mut self, people: Vec<Person>) {
        self.people = people;
        self.status = Status::READY;
        self.refresh();
    }

    pub fn get_uidata(&self) -> &UiData {
        &self.uidata
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// While the search line is active every key goes to the line editor.
    pub fn raw_keyevents(&self) -> bool {
        matches!(self.modus, Modus::SEARCH)
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), CastError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::NextPage => self.next_page(),
                Message::PrevPage => self.prev_page(),
                Message::FirstPage => self.first_page(),
                Message::LastPage => self.last_page(),
                Message::ToggleSort => self.toggle_sort(),
                Message::SortAscending => self.sort_by_name(SortDirection::Ascending),
                Message::SortDescending => self.sort_by_name(SortDirection::Descending),
                Message::CyclePageSize => self.cycle_page_size(),
                Message::Search => self.enter_search(),
                Message::Reset => self.reset_view(),
                Message::CopyPage => self.copy_visible_page(),
                Message::Help => self.show_help(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::SEARCH => match msg {
                Message::Quit => self.quit(),
                Message::RawKey(key) => self.search_input(key),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn next_page(&mut self) {
        let page = self.view_state.current_page + 1;
        self.view_state.go_to_page(page, self.uidata.total_pages);
        self.refresh();
    }

    fn prev_page(&mut self) {
        let page = self.view_state.current_page.saturating_sub(1);
        self.view_state.go_to_page(page, self.uidata.total_pages);
        self.refresh();
    }

    fn first_page(&mut self) {
        self.view_state.go_to_first();
        self.refresh();
    }

    fn last_page(&mut self) {
        self.view_state.go_to_last(self.uidata.total_pages);
        self.refresh();
    }

    fn toggle_sort(&mut self) {
        self.view_state.toggle_sort();
        self.refresh();
        self.set_status_message(format!(
            "Sorted by name {}",
            self.view_state.sort_direction.indicator()
        ));
    }

    fn sort_by_name(&mut self, direction: SortDirection) {
        self.view_state.set_sort_direction(direction);
        self.refresh();
        self.set_status_message(format!("Sorted by name {}", direction.indicator()));
    }

    fn cycle_page_size(&mut self) {
        let sizes = &self.config.page_sizes;
        if sizes.is_empty() {
            return;
        }
        let next = match sizes.iter().position(|&s| s == self.view_state.page_size) {
            Some(idx) => sizes[(idx + 1) % sizes.len()],
            None => sizes[0],
        };
        self.view_state.set_page_size(next, sizes);
        self.refresh();
        self.set_status_message(format!("Page size {next}"));
    }

    fn reset_view(&mut self) {
        self.view_state.reset(self.config.default_page_size);
        self.refresh();
        self.set_status_message("View reset");
    }

    fn enter_search(&mut self) {
        trace!("Entering search mode ...");
        self.previous_modus = self.modus;
        self.modus = Modus::SEARCH;
        self.input.seed(&self.view_state.search_text);
        self.last_input = self.input.get();
        self.refresh();
    }

    fn search_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.canceled {
            self.view_state.set_search_text("");
            self.modus = self.previous_modus;
            self.previous_modus = Modus::SEARCH;
            self.refresh();
            self.set_status_message("Search cleared");
        } else if self.last_input.finished {
            self.modus = self.previous_modus;
            self.previous_modus = Modus::SEARCH;
            self.refresh();
            self.set_status_message(format!("{} matching records", self.uidata.total_filtered));
        } else {
            // Applied live: every keystroke narrows the table immediately
            // and snaps back to the first page.
            self.view_state.set_search_text(self.last_input.text.clone());
            self.refresh();
        }
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.popup_message = HELP_TEXT.to_string();
        self.refresh();
    }

    fn close_popup(&mut self) {
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
        self.popup_message.clear();
        self.refresh();
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!("UI was resized! w:{width}, h:{height}");
        self.refresh();
    }

    fn copy_visible_page(&mut self) {
        let view = engine::derive_view(&self.people, &self.view_state);
        let lines: Vec<String> = view
            .visible_rows
            .iter()
            .map(|&idx| {
                let p = &self.people[idx];
                [
                    p.name.clone(),
                    p.show.clone(),
                    p.actor.clone(),
                    p.date_of_birth.clone(),
                    p.movie_titles.join("; "),
                ]
                .iter()
                .map(Self::wrap_cell_content)
                .collect::<Vec<String>>()
                .join(",")
            })
            .collect();
        let count = lines.len();
        let content = lines.join("\n");

        match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(content) {
                Ok(_) => {
                    info!("Copied {count} visible records to clipboard.");
                    self.set_status_message(format!("Copied {count} records"));
                }
                Err(e) => {
                    error!("Error copying to clipboard: {e:?}");
                    self.set_status_message("Copy failed");
                }
            },
            None => self.set_status_message("Clipboard unavailable"),
        }
    }

    fn wrap_cell_content(c: &String) -> String {
        let needs_escaping = c.chars().any(|c| c == '"');
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace("\"", "\"\"");
        }
        if needs_wrapping || needs_escaping {
            out = format!("\"{out}\"");
        }
        out
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Some(Instant::now());
        self.uidata.status_message = self.status_message.clone();
        self.uidata.last_status_message_update = self.last_status_message_update;
    }

    // ------------------------- View derivation ---------------------------- //

    /// Re-derive the whole view from `(people, view_state)` and rebuild the
    /// render snapshot. Reconciliation happens here, after every transition.
    fn refresh(&mut self) {
        let view = engine::derive_view(&self.people, &self.view_state);
        self.view_state.reconcile(view.total_pages);
        self.update_uidata(&view);
    }

    fn update_uidata(&mut self, view: &DerivedView) {
        self.uidata = UiData {
            title: self.source_name.clone(),
            columns: self.build_columns(view),
            total_filtered: view.total_filtered,
            total_people: self.people.len(),
            current_page: view.current_page,
            total_pages: view.total_pages,
            start_index: view.start_index,
            end_index: view.end_index,
            first_enabled: view.prev_enabled,
            prev_enabled: view.prev_enabled,
            next_enabled: view.next_enabled,
            last_enabled: view.next_enabled,
            search_text: self.view_state.search_text.clone(),
            page_size: self.view_state.page_size,
            sort_indicator: self.view_state.sort_direction.indicator(),
            show_popup: matches!(self.modus, Modus::POPUP),
            popup_message: self.popup_message.clone(),
            search_active: matches!(self.modus, Modus::SEARCH),
            search_input: self.last_input.clone(),
            status_message: self.status_message.clone(),
            last_status_message_update: self.last_status_message_update,
        };
    }

    fn build_columns(&self, view: &DerivedView) -> Vec<ColumnView> {
        let visible: Vec<&Person> = view.visible_rows.iter().map(|&i| &self.people[i]).collect();
        vec![
            self.column_view("Name", visible.iter().map(|p| p.name.clone()).collect()),
            self.column_view("Show", visible.iter().map(|p| p.show.clone()).collect()),
            self.column_view(
                "Actor/Actress",
                visible.iter().map(|p| p.actor.clone()).collect(),
            ),
            self.column_view(
                "Date of birth",
                visible.iter().map(|p| p.date_of_birth.clone()).collect(),
            ),
            // Titles are joined here, at the presentation boundary. The
            // engine itself only ever hands out the title sequence.
            self.column_view(
                "Movies",
                visible
                    .iter()
                    .map(|p| p.movie_titles.join(", "))
                    .collect(),
            ),
        ]
    }

    fn column_view(&self, header: &str, cells: Vec<String>) -> ColumnView {
        let content_width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        let width = (content_width.max(header.chars().count()) + COLUMN_WIDTH_MARGIN)
            .min(self.config.max_column_width);
        ColumnView {
            name: header.to_string(),
            width,
            data: cells,
        }
    }
}
