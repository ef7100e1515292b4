//! Task ownership and deduplication

use std::collections::{BTreeMap, HashMap};

use crate::task::{Source, Task, TaskId, TaskKind};

/// Owns every task by id and remembers which canonical resource each
/// plugin task was created for.
pub(crate) struct TaskRegistry {
    tasks: BTreeMap<TaskId, Task>,
    /// (kind name, cache key) -> task
    keys: HashMap<(String, String), TaskId>,
    next_id: u64,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            keys: HashMap::new(),
            next_id: 1,
        }
    }

    /// Create and store a dormant task with the next id
    pub fn create(&mut self, source: Source, kind: TaskKind) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        self.tasks.insert(id, Task::new(id, source, kind));
        id
    }

    /// Task previously stored under `key` for `kind`
    pub fn lookup(&self, kind: &str, key: &str) -> Option<TaskId> {
        if key.is_empty() {
            return None;
        }
        self.keys.get(&(kind.to_string(), key.to_string())).copied()
    }

    /// Remember `id` as the task for `key`; empty keys are never cached
    pub fn remember(&mut self, key: &str, id: TaskId) {
        if key.is_empty() {
            return;
        }
        if let Some(task) = self.tasks.get(&id) {
            self.keys
                .insert((task.kind.name().to_string(), key.to_string()), id);
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Tasks in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks from the most recently created to the oldest
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().rev()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js() -> TaskKind {
        TaskKind::Plugin("js".to_string())
    }

    #[test]
    fn test_ids_increase() {
        let mut tasks = TaskRegistry::new();
        let a = tasks.create(Source::None, TaskKind::Series);
        let b = tasks.create(Source::None, TaskKind::Parallel);
        assert!(a < b);
        assert_eq!(a.get(), 1);
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_lookup_by_kind_and_key() {
        let mut tasks = TaskRegistry::new();
        let id = tasks.create(Source::Text("http://x/a.js".into()), js());
        tasks.remember("http://x/a.js", id);

        assert_eq!(tasks.lookup("js", "http://x/a.js"), Some(id));
        assert_eq!(tasks.lookup("css", "http://x/a.js"), None);
        assert_eq!(tasks.lookup("js", "http://x/b.js"), None);
    }

    #[test]
    fn test_empty_key_is_never_cached() {
        let mut tasks = TaskRegistry::new();
        let id = tasks.create(Source::None, js());
        tasks.remember("", id);
        assert_eq!(tasks.lookup("js", ""), None);
    }

    #[test]
    fn test_newest_first() {
        let mut tasks = TaskRegistry::new();
        let a = tasks.create(Source::None, js());
        let b = tasks.create(Source::None, js());
        let order: Vec<_> = tasks.iter_newest_first().map(|t| t.id).collect();
        assert_eq!(order, vec![b, a]);
        assert!(tasks.contains(a));
    }
}
