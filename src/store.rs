use anyhow::Result;

use crate::model::{Draft, Status, Task};
use crate::storage::Storage;

/// Storage key holding the serialized task collection.
pub const TASKS_KEY: &str = "tasks";

/// Status filter for filtered_view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => anyhow::bail!("invalid filter '{s}': must be all, pending, or completed"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => task.status == Status::Pending,
            Self::Completed => task.status == Status::Completed,
        }
    }
}

/// Per-session search and filter state. Never persisted; created with
/// defaults at session start and discarded at exit.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Raw search text, as typed.
    pub search_term: String,
    /// Last value the debouncer let through; this is what views filter on.
    pub settled_search_term: String,
    pub status_filter: StatusFilter,
}

/// Single authority over the task collection.
///
/// Every mutation is a synchronous read-modify-persist-refresh cycle: the
/// whole collection is written back to storage as one blob, then the
/// in-memory copy is rebuilt from what storage now holds. Memory is always
/// derived from the last successful write, so the two cannot silently
/// diverge. Consumers only ever get read views, never the collection
/// itself.
pub struct TaskStore<S> {
    storage: S,
    tasks: Vec<Task>,
}

impl<S: Storage> TaskStore<S> {
    /// Read the persisted collection. Absent or unparsable data loads as
    /// the empty collection rather than failing.
    pub fn load(storage: S) -> Result<Self> {
        let tasks = read_collection(&storage)?;
        Ok(Self { storage, tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a new task. Requires a non-empty name; otherwise the draft is
    /// rejected and nothing changes. Returns the assigned id.
    pub fn create(&mut self, draft: Draft) -> Result<Option<u64>> {
        let name = match draft.name {
            Some(n) if !n.is_empty() => n,
            _ => return Ok(None),
        };
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            name,
            kind: draft.kind,
            duration_minutes: draft.duration_minutes.unwrap_or(0),
            status: draft.status.unwrap_or_default(),
            done: false,
        });
        self.persist()?;
        Ok(Some(id))
    }

    /// Merge `draft` into the task with this id, leaving unset fields
    /// untouched. A draft that would blank the name is rejected whole.
    /// Returns false (and changes nothing) when the id is unknown.
    pub fn update(&mut self, id: u64, draft: Draft) -> Result<bool> {
        if matches!(draft.name.as_deref(), Some("")) {
            return Ok(false);
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if let Some(name) = draft.name {
            task.name = name;
        }
        if let Some(kind) = draft.kind {
            task.kind = Some(kind);
        }
        if let Some(minutes) = draft.duration_minutes {
            task.duration_minutes = minutes;
        }
        if let Some(status) = draft.status {
            task.status = status;
        }
        self.persist()?;
        Ok(true)
    }

    /// Remove the task with this id. Idempotent: an unknown id leaves the
    /// collection unchanged.
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Flip the checkmark on the task with this id. Does not touch
    /// `status` or any other field.
    pub fn toggle_done(&mut self, id: u64) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.done = !task.done;
        self.persist()?;
        Ok(true)
    }

    /// Read-only, order-preserving view of the collection: status must
    /// match the filter and the name must contain `term` case-insensitively
    /// (empty term matches everything). Recomputed from scratch on every
    /// call; holds no cursor state.
    pub fn filtered_view<'a>(
        &'a self,
        filter: StatusFilter,
        term: &str,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        let needle = term.to_lowercase();
        self.tasks.iter().filter(move |t| {
            filter.matches(t) && (needle.is_empty() || t.name.to_lowercase().contains(&needle))
        })
    }

    /// Rebuild the in-memory collection from storage. Used when the
    /// persisted data may have changed behind the store's back.
    pub fn reload(&mut self) -> Result<()> {
        self.tasks = read_collection(&self.storage)?;
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().map_or(1, |m| m + 1)
    }

    fn persist(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.tasks)?;
        self.storage.set(TASKS_KEY, &blob)?;
        self.tasks = read_collection(&self.storage)?;
        Ok(())
    }
}

fn read_collection<S: Storage>(storage: &S) -> Result<Vec<Task>> {
    Ok(match storage.get(TASKS_KEY)? {
        Some(blob) => serde_json::from_str(&blob).unwrap_or_default(),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;
    use crate::storage::MemStorage;

    fn store() -> TaskStore<MemStorage> {
        TaskStore::load(MemStorage::default()).unwrap()
    }

    fn draft(name: &str) -> Draft {
        Draft {
            name: Some(name.to_string()),
            ..Draft::default()
        }
    }

    fn view_names(store: &TaskStore<MemStorage>, filter: StatusFilter, term: &str) -> Vec<String> {
        store
            .filtered_view(filter, term)
            .map(|t| t.name.clone())
            .collect()
    }

    #[test]
    fn create_assigns_distinct_ids() {
        let mut store = store();
        let a = store.create(draft("a")).unwrap().unwrap();
        let b = store.create(draft("b")).unwrap().unwrap();
        let c = store.create(draft("c")).unwrap().unwrap();
        assert!(store.remove(b).unwrap());
        let d = store.create(draft("d")).unwrap().unwrap();
        let ids = [a, c, d];
        for (i, x) in ids.iter().enumerate() {
            for y in &ids[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn create_with_empty_name_is_a_noop() {
        let mut store = store();
        assert!(store.create(Draft::default()).unwrap().is_none());
        assert!(store.create(draft("")).unwrap().is_none());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn create_grows_collection_by_one() {
        let mut store = store();
        store.create(draft("Buy milk")).unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].name, "Buy milk");
    }

    #[test]
    fn create_defaults() {
        let mut store = store();
        let id = store.create(draft("t")).unwrap().unwrap();
        let task = store.get(id).unwrap();
        assert!(task.kind.is_none());
        assert_eq!(task.duration_minutes, 0);
        assert_eq!(task.status, Status::Pending);
        assert!(!task.done);
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut store = store();
        let id = store.create(draft("Write report")).unwrap().unwrap();
        let changed = store
            .update(
                id,
                Draft {
                    duration_minutes: Some(45),
                    kind: Some(Kind::Work),
                    ..Draft::default()
                },
            )
            .unwrap();
        assert!(changed);
        let task = store.get(id).unwrap();
        assert_eq!(task.name, "Write report");
        assert_eq!(task.duration_minutes, 45);
        assert_eq!(task.kind, Some(Kind::Work));
        assert_eq!(task.status, Status::Pending);
    }

    #[test]
    fn update_unknown_id_is_a_noop() {
        let mut store = store();
        store.create(draft("t")).unwrap();
        let snapshot = store.tasks().to_vec();
        assert!(!store.update(999, draft("other")).unwrap());
        assert_eq!(store.tasks(), &snapshot[..]);
    }

    #[test]
    fn update_rejecting_empty_name_keeps_other_fields() {
        let mut store = store();
        let id = store.create(draft("t")).unwrap().unwrap();
        let changed = store
            .update(
                id,
                Draft {
                    name: Some(String::new()),
                    duration_minutes: Some(30),
                    ..Draft::default()
                },
            )
            .unwrap();
        assert!(!changed);
        let task = store.get(id).unwrap();
        assert_eq!(task.name, "t");
        assert_eq!(task.duration_minutes, 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = store();
        let id = store.create(draft("t")).unwrap().unwrap();
        store.create(draft("keep")).unwrap();
        assert!(store.remove(id).unwrap());
        assert!(!store.remove(id).unwrap());
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].name, "keep");
    }

    #[test]
    fn toggle_flips_done_and_nothing_else() {
        let mut store = store();
        let id = store
            .create(Draft {
                name: Some("Clean desk".into()),
                kind: Some(Kind::Cleaning),
                duration_minutes: Some(10),
                status: Some(Status::Pending),
            })
            .unwrap()
            .unwrap();
        let other = store.create(draft("other")).unwrap().unwrap();

        assert!(store.toggle_done(id).unwrap());
        let task = store.get(id).unwrap();
        assert!(task.done);
        assert_eq!(task.name, "Clean desk");
        assert_eq!(task.kind, Some(Kind::Cleaning));
        assert_eq!(task.duration_minutes, 10);
        assert_eq!(task.status, Status::Pending);
        assert!(!store.get(other).unwrap().done);

        assert!(store.toggle_done(id).unwrap());
        assert!(!store.get(id).unwrap().done);
    }

    #[test]
    fn toggle_unknown_id_is_a_noop() {
        let mut store = store();
        assert!(!store.toggle_done(7).unwrap());
    }

    #[test]
    fn storage_round_trips_after_every_mutation() {
        let mem = MemStorage::default();
        let mut store = TaskStore::load(mem.clone()).unwrap();

        let id = store.create(draft("a")).unwrap().unwrap();
        assert_eq!(TaskStore::load(mem.clone()).unwrap().tasks(), store.tasks());

        store.update(id, draft("renamed")).unwrap();
        assert_eq!(TaskStore::load(mem.clone()).unwrap().tasks(), store.tasks());

        store.toggle_done(id).unwrap();
        assert_eq!(TaskStore::load(mem.clone()).unwrap().tasks(), store.tasks());

        store.remove(id).unwrap();
        assert_eq!(TaskStore::load(mem.clone()).unwrap().tasks(), store.tasks());
    }

    #[test]
    fn load_absent_key_yields_empty_collection() {
        assert!(store().tasks().is_empty());
    }

    #[test]
    fn load_malformed_blob_yields_empty_collection() {
        let store = TaskStore::load(MemStorage::seeded(TASKS_KEY, "not json")).unwrap();
        assert!(store.tasks().is_empty());
        let store = TaskStore::load(MemStorage::seeded(TASKS_KEY, r#"{"id": 1}"#)).unwrap();
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn filter_by_status_and_search_term() {
        let mut store = store();
        store.create(draft("Write report")).unwrap();
        let id = store.create(draft("Clean desk")).unwrap().unwrap();
        store
            .update(
                id,
                Draft {
                    status: Some(Status::Completed),
                    ..Draft::default()
                },
            )
            .unwrap();

        assert_eq!(
            view_names(&store, StatusFilter::Completed, ""),
            vec!["Clean desk"]
        );
        assert_eq!(
            view_names(&store, StatusFilter::All, "report"),
            vec!["Write report"]
        );
        assert!(view_names(&store, StatusFilter::All, "ZZZ").is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut store = store();
        store.create(draft("Write REPORT")).unwrap();
        assert_eq!(
            view_names(&store, StatusFilter::All, "report"),
            vec!["Write REPORT"]
        );
        assert_eq!(
            view_names(&store, StatusFilter::All, "WRITE"),
            vec!["Write REPORT"]
        );
    }

    #[test]
    fn view_preserves_insertion_order_and_restarts() {
        let mut store = store();
        for name in ["one", "two", "three"] {
            store.create(draft(name)).unwrap();
        }
        let first: Vec<_> = view_names(&store, StatusFilter::All, "");
        assert_eq!(first, vec!["one", "two", "three"]);
        // recomputed per call, no cursor carried over
        assert_eq!(view_names(&store, StatusFilter::All, ""), first);
    }

    #[test]
    fn filter_parse_and_cycle() {
        assert_eq!(StatusFilter::parse("all").unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("pending").unwrap(),
            StatusFilter::Pending
        );
        assert_eq!(
            StatusFilter::parse("completed").unwrap(),
            StatusFilter::Completed
        );
        assert!(StatusFilter::parse("open").is_err());
        assert_eq!(StatusFilter::All.cycle(), StatusFilter::Pending);
        assert_eq!(StatusFilter::Completed.cycle(), StatusFilter::All);
    }
}
