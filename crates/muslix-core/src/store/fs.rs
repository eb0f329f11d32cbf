//! File-backed note store
//!
//! Notes live as markdown files with a YAML frontmatter header holding
//! id, title and tags:
//!
//! ```markdown
//! ---
//! id: n-20240117-abc
//! title: Ausflug Köln
//! tags: [koeln, nordrheinwestfalen]
//! ---
//! body text ...
//! ```
//!
//! Tags have no storage of their own; a tag exists by being referenced
//! from a note's frontmatter, and its id equals its title.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{MuslixError, Result};
use crate::store::{Note, NoteStore, Tag};

/// Frontmatter header of a stored note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteFrontmatter {
    /// Unique note identifier (required)
    pub id: String,
    /// Note title (required)
    pub title: String,
    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Last update timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    /// Tags for categorization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Containing folder id, when the note collection mirrors folders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Parse YAML frontmatter from markdown content
fn parse_frontmatter(content: &str, path: &Path) -> Result<(NoteFrontmatter, String)> {
    let content = content.trim_start();

    if !content.starts_with("---") {
        return Err(MuslixError::InvalidFrontmatter {
            path: path.to_path_buf(),
            reason: "missing frontmatter delimiter (---)".to_string(),
        });
    }

    let after_first = &content[3..];
    let end_pos = after_first
        .find("\n---")
        .ok_or_else(|| MuslixError::InvalidFrontmatter {
            path: path.to_path_buf(),
            reason: "missing closing frontmatter delimiter (---)".to_string(),
        })?;

    let yaml_content = &after_first[..end_pos];
    let body_start = 3 + end_pos + 4; // skip first ---, yaml, \n---
    let body = if body_start < content.len() {
        content[body_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    let frontmatter: NoteFrontmatter =
        serde_yaml::from_str(yaml_content).map_err(|e| MuslixError::InvalidFrontmatter {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if frontmatter.id.is_empty() {
        return Err(MuslixError::InvalidFrontmatter {
            path: path.to_path_buf(),
            reason: "missing required field: id".to_string(),
        });
    }
    if frontmatter.title.is_empty() {
        return Err(MuslixError::InvalidFrontmatter {
            path: path.to_path_buf(),
            reason: "missing required field: title".to_string(),
        });
    }

    Ok((frontmatter, body))
}

fn render_note(frontmatter: &NoteFrontmatter, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

/// A `NoteStore` over a directory of markdown files
pub struct FsStore {
    root: PathBuf,
    paths: HashMap<String, PathBuf>,
}

impl FsStore {
    /// Open a store rooted at `root`, indexing every `.md` file by its
    /// frontmatter id. Files without valid frontmatter are skipped with
    /// a warning.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(MuslixError::StoreNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut paths = HashMap::new();
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let content = fs::read_to_string(path)?;
            match parse_frontmatter(&content, path) {
                Ok((frontmatter, _)) => {
                    if let Some(previous) = paths.insert(frontmatter.id.clone(), path.to_path_buf())
                    {
                        warn!(id = %frontmatter.id, ?previous, current = ?path, "duplicate_note_id");
                    }
                }
                Err(err) => warn!(?path, error = %err, "skipping_unparseable_note"),
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            paths,
        })
    }

    /// Root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, id: &str) -> Result<(PathBuf, NoteFrontmatter, String)> {
        let path = self
            .paths
            .get(id)
            .ok_or_else(|| MuslixError::NoteNotFound { id: id.to_string() })?;
        let content = fs::read_to_string(path)?;
        let (frontmatter, body) = parse_frontmatter(&content, path)?;
        Ok((path.clone(), frontmatter, body))
    }

    fn write(&self, path: &Path, frontmatter: &NoteFrontmatter, body: &str) -> Result<()> {
        let mut frontmatter = frontmatter.clone();
        frontmatter.updated = Some(Utc::now());
        fs::write(path, render_note(&frontmatter, body)?)?;
        Ok(())
    }
}

impl NoteStore for FsStore {
    fn note(&self, id: &str) -> Result<Note> {
        let (_, frontmatter, body) = self.read(id)?;
        Ok(Note {
            id: frontmatter.id,
            title: frontmatter.title,
            body,
            parent_id: frontmatter.parent,
        })
    }

    fn note_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.paths.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn update_note_body(&mut self, id: &str, body: &str) -> Result<()> {
        let (path, frontmatter, _) = self.read(id)?;
        self.write(&path, &frontmatter, body)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        let mut titles = BTreeSet::new();
        for id in self.paths.keys() {
            let (_, frontmatter, _) = self.read(id)?;
            titles.extend(frontmatter.tags);
        }
        Ok(titles
            .into_iter()
            .map(|title| Tag {
                id: title.clone(),
                title,
            })
            .collect())
    }

    fn create_tag(&mut self, title: &str) -> Result<Tag> {
        // A tag exists by being referenced; its identity is its title
        Ok(Tag {
            id: title.to_string(),
            title: title.to_string(),
        })
    }

    fn note_tags(&self, note_id: &str) -> Result<Vec<Tag>> {
        let (_, frontmatter, _) = self.read(note_id)?;
        Ok(frontmatter
            .tags
            .into_iter()
            .map(|title| Tag {
                id: title.clone(),
                title,
            })
            .collect())
    }

    fn link_tag(&mut self, note_id: &str, tag_id: &str) -> Result<()> {
        let (path, mut frontmatter, body) = self.read(note_id)?;
        if !frontmatter.tags.iter().any(|t| t == tag_id) {
            frontmatter.tags.push(tag_id.to_string());
            self.write(&path, &frontmatter, &body)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_note(dir: &Path, file: &str, id: &str, title: &str, tags: &str, body: &str) {
        let content = format!(
            "---\nid: {}\ntitle: {}\ntags: [{}]\n---\n\n{}",
            id, title, tags, body
        );
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_open_and_fetch() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "a.md", "n1", "Erste Notiz", "", "Hallo Welt");
        write_note(dir.path(), "b.md", "n2", "Zweite Notiz", "koeln", "Inhalt");

        let store = FsStore::open(dir.path()).unwrap();
        assert_eq!(store.note_ids().unwrap(), vec!["n1", "n2"]);

        let note = store.note("n1").unwrap();
        assert_eq!(note.title, "Erste Notiz");
        assert_eq!(note.body, "Hallo Welt");
    }

    #[test]
    fn test_missing_root() {
        let result = FsStore::open(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(MuslixError::StoreNotFound { .. })));
    }

    #[test]
    fn test_update_body_preserves_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "a.md", "n1", "Titel", "bayern", "alt");

        let mut store = FsStore::open(dir.path()).unwrap();
        store.update_note_body("n1", "neu").unwrap();

        let note = store.note("n1").unwrap();
        assert_eq!(note.body, "neu");
        assert_eq!(
            store
                .note_tags("n1")
                .unwrap()
                .iter()
                .map(|t| t.title.clone())
                .collect::<Vec<_>>(),
            vec!["bayern"]
        );
    }

    #[test]
    fn test_link_tag_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "a.md", "n1", "Titel", "", "text");

        let mut store = FsStore::open(dir.path()).unwrap();
        let tag = store.create_tag("muenchen").unwrap();
        store.link_tag("n1", &tag.id).unwrap();
        store.link_tag("n1", &tag.id).unwrap();

        assert_eq!(store.note_tags("n1").unwrap().len(), 1);
        assert_eq!(store.tags().unwrap().len(), 1);
    }

    #[test]
    fn test_unparseable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "good.md", "n1", "Titel", "", "text");
        fs::write(dir.path().join("bad.md"), "no frontmatter here").unwrap();

        let store = FsStore::open(dir.path()).unwrap();
        assert_eq!(store.note_ids().unwrap(), vec!["n1"]);
    }
}
