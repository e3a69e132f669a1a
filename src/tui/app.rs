use std::time::{Duration, Instant};

use anyhow::Result;

use crate::debounce::Debouncer;
use crate::model::{Draft, Kind, Status, Task};
use crate::storage::Storage;
use crate::store::{FilterState, TaskStore};

/// A row of the visible list: the id it resolves to plus display fields.
/// Actions on a row always go through the id, never the row's position, so
/// a filtered or reordered view cannot hit the wrong task.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: u64,
    pub name: String,
    pub kind: Option<Kind>,
    pub duration_minutes: u32,
    pub status: Status,
    pub done: bool,
}

impl From<&Task> for Row {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            kind: task.kind,
            duration_minutes: task.duration_minutes,
            status: task.status,
            done: task.done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
    Add,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Name,
    Kind,
    Minutes,
}

pub struct AddForm {
    pub name: String,
    pub kind: String,
    pub minutes: String,
    pub focused: AddField,
    pub error: Option<String>,
}

impl AddForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            minutes: String::new(),
            focused: AddField::Name,
            error: None,
        }
    }

    pub fn focused_buf_mut(&mut self) -> &mut String {
        match self.focused {
            AddField::Name => &mut self.name,
            AddField::Kind => &mut self.kind,
            AddField::Minutes => &mut self.minutes,
        }
    }

    pub fn next_field(&mut self) {
        self.focused = match self.focused {
            AddField::Name => AddField::Kind,
            AddField::Kind => AddField::Minutes,
            AddField::Minutes => AddField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        self.focused = match self.focused {
            AddField::Name => AddField::Minutes,
            AddField::Kind => AddField::Name,
            AddField::Minutes => AddField::Kind,
        };
    }

    /// Build a draft from the form, or record why it cannot be built.
    pub fn validate(&mut self) -> Option<Draft> {
        if self.name.is_empty() {
            self.error = Some("Name must not be empty".into());
            return None;
        }
        let kind = if self.kind.is_empty() {
            None
        } else {
            match Kind::parse(&self.kind) {
                Ok(k) => Some(k),
                Err(e) => {
                    self.error = Some(e.to_string());
                    return None;
                }
            }
        };
        let minutes = if self.minutes.is_empty() {
            None
        } else {
            match self.minutes.parse::<u32>() {
                Ok(m) => Some(m),
                Err(_) => {
                    self.error = Some(format!("invalid minutes '{}'", self.minutes));
                    return None;
                }
            }
        };
        self.error = None;
        Some(Draft {
            name: Some(self.name.clone()),
            kind,
            duration_minutes: minutes,
            status: None,
        })
    }
}

pub struct App<S> {
    pub store: TaskStore<S>,
    pub filter: FilterState,
    pub debounce: Debouncer<String>,
    pub mode: Mode,
    pub rows: Vec<Row>,
    pub cursor: usize,
    pub add_form: Option<AddForm>,
}

impl<S: Storage> App<S> {
    pub fn new(store: TaskStore<S>, debounce_delay: Duration) -> Self {
        let mut app = Self {
            store,
            filter: FilterState::default(),
            debounce: Debouncer::new(debounce_delay),
            mode: Mode::Normal,
            rows: Vec::new(),
            cursor: 0,
            add_form: None,
        };
        app.refresh();
        app
    }

    /// Recompute the visible rows from the store's filtered view.
    pub fn refresh(&mut self) {
        self.rows = self
            .store
            .filtered_view(self.filter.status_filter, &self.filter.settled_search_term)
            .map(Row::from)
            .collect();
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.rows.get(self.cursor).map(|r| r.id)
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn search_push(&mut self, c: char, now: Instant) {
        self.filter.search_term.push(c);
        self.debounce.input(self.filter.search_term.clone(), now);
    }

    pub fn search_pop(&mut self, now: Instant) {
        self.filter.search_term.pop();
        self.debounce.input(self.filter.search_term.clone(), now);
    }

    /// Adopt the settled search term once the debounce delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(term) = self.debounce.poll(now) {
            if term != self.filter.settled_search_term {
                self.filter.settled_search_term = term;
                self.refresh();
            }
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter.status_filter = self.filter.status_filter.cycle();
        self.refresh();
    }

    pub fn toggle_selected(&mut self) -> Result<()> {
        if let Some(id) = self.selected_id() {
            self.store.toggle_done(id)?;
            self.refresh();
        }
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<()> {
        if let Some(id) = self.selected_id() {
            self.store.remove(id)?;
            self.refresh();
        }
        Ok(())
    }

    pub fn open_add_form(&mut self) {
        self.add_form = Some(AddForm::new());
        self.mode = Mode::Add;
    }

    pub fn cancel_add_form(&mut self) {
        self.add_form = None;
        self.mode = Mode::Normal;
    }

    /// Submit the add form. Returns false (form stays open with its error
    /// shown) when the form does not validate.
    pub fn submit_add(&mut self) -> Result<bool> {
        let Some(form) = self.add_form.as_mut() else {
            return Ok(true);
        };
        let Some(draft) = form.validate() else {
            return Ok(false);
        };
        self.store.create(draft)?;
        self.add_form = None;
        self.mode = Mode::Normal;
        self.refresh();
        Ok(true)
    }

    /// Re-read the collection after an external change to the storage.
    pub fn reload(&mut self) -> Result<()> {
        self.store.reload()?;
        self.refresh();
        Ok(())
    }
}
