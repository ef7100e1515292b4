//! Everything a caller may pass where a task is expected

use std::fmt;
use std::sync::Arc;

use crate::group::GroupHandle;
use crate::orchestrator::Orchestrator;
use crate::task::{Callable, TaskId};

/// A reference to work, resolved to a task at the orchestrator boundary
#[derive(Clone)]
pub enum Specifier {
    /// An existing task, used unchanged
    Task(TaskId),
    /// A series or parallel group built earlier
    Group(GroupHandle),
    /// Nested list, run as a parallel group
    List(Vec<Specifier>),
    /// String handed to the loader chain
    Text(String),
    /// Inline body handed to the callable loader
    Callable(Callable),
}

impl Specifier {
    /// Wrap a closure as a callable specifier
    pub fn callable<F>(body: F) -> Self
    where
        F: Fn(&Orchestrator) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(body))
    }

    /// Nested list from anything convertible
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Specifier>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// String payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short human-readable description for logs and errors
    pub fn describe(&self) -> String {
        match self {
            Self::Task(id) => id.to_string(),
            Self::Group(handle) => format!("{} {}", handle.kind, handle.id),
            Self::List(items) => format!(
                "[{}]",
                items.iter().map(Self::describe).collect::<Vec<_>>().join(", ")
            ),
            Self::Text(text) => text.clone(),
            Self::Callable(_) => "<callable>".to_string(),
        }
    }

    /// Expand nested lists in place, depth first
    pub(crate) fn flatten(items: Vec<Specifier>) -> Vec<Specifier> {
        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Self::List(nested) => flat.extend(Self::flatten(nested)),
                other => flat.push(other),
            }
        }
        flat
    }
}

impl fmt::Debug for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Specifier({})", self.describe())
    }
}

impl From<&str> for Specifier {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Specifier {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for Specifier {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<TaskId> for Specifier {
    fn from(id: TaskId) -> Self {
        Self::Task(id)
    }
}

impl From<GroupHandle> for Specifier {
    fn from(handle: GroupHandle) -> Self {
        Self::Group(handle)
    }
}

impl<S: Into<Specifier>> From<Vec<S>> for Specifier {
    fn from(items: Vec<S>) -> Self {
        Self::list(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupKind;

    #[test]
    fn test_conversions() {
        assert_eq!(Specifier::from("a.js").as_text(), Some("a.js"));
        assert_eq!(Specifier::from(String::from("b.css")).as_text(), Some("b.css"));
        assert!(matches!(Specifier::from(TaskId::new(3)), Specifier::Task(id) if id.get() == 3));
        assert!(matches!(Specifier::from(vec!["a", "b"]), Specifier::List(items) if items.len() == 2));
    }

    #[test]
    fn test_flatten_nested_lists() {
        let items = vec![
            Specifier::from("a"),
            Specifier::list(vec![Specifier::from("b"), Specifier::list(vec!["c"])]),
            Specifier::from("d"),
        ];
        let flat: Vec<_> = Specifier::flatten(items)
            .iter()
            .map(Specifier::describe)
            .collect();
        assert_eq!(flat, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_describe() {
        let handle = GroupHandle {
            id: TaskId::new(2),
            kind: GroupKind::Series,
        };
        assert_eq!(Specifier::from(handle).describe(), "series #2");
        assert_eq!(Specifier::callable(|_| Ok(())).describe(), "<callable>");
        assert_eq!(Specifier::from(vec!["a", "b"]).describe(), "[a, b]");
        assert_eq!(format!("{:?}", Specifier::from("x")), "Specifier(x)");
    }
}
