//! Task list source
//!
//! Lists come either from static configuration or from a local markdown
//! file with `Goals`, `Must` and `Optional` sections. Never touches the
//! network.

use async_trait::async_trait;
use inkdash_core::{DataSource, SourceMetadata, Unavailable};
use inkdash_types::{ids, DataPoint, FieldMetadata, FieldType};
use std::path::PathBuf;

/// The three task lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskLists {
    pub goals: Vec<String>,
    pub must: Vec<String>,
    pub optional: Vec<String>,
}

impl TaskLists {
    fn into_points(self) -> Vec<DataPoint> {
        vec![
            DataPoint::new(ids::TODO_GOALS, self.goals),
            DataPoint::new(ids::TODO_MUST, self.must),
            DataPoint::new(ids::TODO_OPTIONAL, self.optional),
        ]
    }
}

/// Task source settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskConfig {
    pub lists: TaskLists,
    /// Markdown file that replaces the static lists when set
    pub todo_file: Option<PathBuf>,
}

#[derive(Clone, Copy)]
enum Section {
    Goals,
    Must,
    Optional,
}

/// Parse a markdown task file.
///
/// A `#` heading containing "goal", "must" or "opt" (case-insensitive)
/// starts a section; `- ` and `* ` lines inside it are items. A leading
/// `[ ]`/`[x]` checkbox is stripped. Other headings leave the current
/// section unchanged.
pub fn parse_markdown(content: &str) -> TaskLists {
    let mut lists = TaskLists::default();
    let mut current = None;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            let lower = line.to_lowercase();
            if lower.contains("goal") {
                current = Some(Section::Goals);
            } else if lower.contains("must") {
                current = Some(Section::Must);
            } else if lower.contains("opt") {
                current = Some(Section::Optional);
            }
            continue;
        }

        let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) else {
            continue;
        };
        let mut item = item.trim();
        for checkbox in ["[ ]", "[x]", "[X]"] {
            if let Some(rest) = item.strip_prefix(checkbox) {
                item = rest.trim();
                break;
            }
        }
        if item.is_empty() {
            continue;
        }

        let target = match current {
            Some(Section::Goals) => &mut lists.goals,
            Some(Section::Must) => &mut lists.must,
            Some(Section::Optional) => &mut lists.optional,
            None => continue,
        };
        target.push(item.to_string());
    }

    log::debug!(
        "Parsed task file: {} goals, {} must, {} optional",
        lists.goals.len(),
        lists.must.len(),
        lists.optional.len()
    );
    lists
}

pub struct TaskSource {
    metadata: SourceMetadata,
    config: TaskConfig,
}

impl TaskSource {
    pub fn new(config: TaskConfig) -> Self {
        Self {
            metadata: SourceMetadata::new("tasks", "Tasks", "Goals, must-do and optional task lists"),
            config,
        }
    }
}

#[async_trait]
impl DataSource for TaskSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![
            FieldMetadata::new(ids::TODO_GOALS, "Goals", "Long-term goals", FieldType::List),
            FieldMetadata::new(ids::TODO_MUST, "Must", "Tasks that must be done", FieldType::List),
            FieldMetadata::new(ids::TODO_OPTIONAL, "Optional", "Nice-to-have tasks", FieldType::List),
        ]
    }

    async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable> {
        let lists = match &self.config.todo_file {
            Some(path) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| Unavailable::Io(format!("{}: {}", path.display(), e)))?;
                parse_markdown(&content)
            }
            None => self.config.lists.clone(),
        };
        Ok(lists.into_points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdash_types::FieldValue;

    const SAMPLE: &str = "\
# My week

## Goals
- Learn Rust
- [ ] Run a marathon

## Must
* [x] Pay rent
- [X]   File taxes
-
- [ ]

## Optinal
- Read a book
not a list item
";

    #[test]
    fn test_parse_markdown() {
        let lists = parse_markdown(SAMPLE);
        assert_eq!(lists.goals, vec!["Learn Rust", "Run a marathon"]);
        assert_eq!(lists.must, vec!["Pay rent", "File taxes"]);
        assert_eq!(lists.optional, vec!["Read a book"]);
    }

    #[test]
    fn test_items_before_any_section_are_ignored() {
        let lists = parse_markdown("- orphan\n## Must\n- kept\n");
        assert!(lists.goals.is_empty());
        assert_eq!(lists.must, vec!["kept"]);
    }

    #[tokio::test]
    async fn test_static_lists() {
        let source = TaskSource::new(TaskConfig {
            lists: TaskLists {
                goals: vec!["a".into()],
                must: vec![],
                optional: vec!["b".into(), "c".into()],
            },
            todo_file: None,
        });
        let points = source.fetch().await.unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].value, FieldValue::List(vec!["a".into()]));
        assert_eq!(points[1].value, FieldValue::List(vec![]));
    }

    #[tokio::test]
    async fn test_file_overrides_static_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.md");
        std::fs::write(&path, SAMPLE).unwrap();

        let source = TaskSource::new(TaskConfig {
            lists: TaskLists {
                goals: vec!["ignored".into()],
                ..Default::default()
            },
            todo_file: Some(path),
        });
        let points = source.fetch().await.unwrap();
        assert_eq!(
            points[0].value,
            FieldValue::List(vec!["Learn Rust".into(), "Run a marathon".into()])
        );
    }

    #[tokio::test]
    async fn test_unreadable_file_is_unavailable() {
        let source = TaskSource::new(TaskConfig {
            todo_file: Some(PathBuf::from("/nonexistent/inkdash/todo.md")),
            ..Default::default()
        });
        assert!(matches!(source.fetch().await, Err(Unavailable::Io(_))));
    }
}
