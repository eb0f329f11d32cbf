//! In-memory note store

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MuslixError, Result};
use crate::store::{Note, NoteStore, Tag};

/// A `NoteStore` backed by plain maps. Used by tests and by embedders
/// that sync notes from elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: BTreeMap<String, Note>,
    tags: BTreeMap<String, Tag>,
    note_tags: BTreeMap<String, BTreeSet<String>>,
    next_tag_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a note
    pub fn add_note(&mut self, note: Note) {
        self.notes.insert(note.id.clone(), note);
    }

    /// Convenience constructor for a note without a folder
    pub fn add_simple_note(&mut self, id: &str, title: &str, body: &str) {
        self.add_note(Note {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            parent_id: None,
        });
    }
}

impl NoteStore for MemoryStore {
    fn note(&self, id: &str) -> Result<Note> {
        self.notes
            .get(id)
            .cloned()
            .ok_or_else(|| MuslixError::NoteNotFound { id: id.to_string() })
    }

    fn note_ids(&self) -> Result<Vec<String>> {
        Ok(self.notes.keys().cloned().collect())
    }

    fn update_note_body(&mut self, id: &str, body: &str) -> Result<()> {
        let note = self
            .notes
            .get_mut(id)
            .ok_or_else(|| MuslixError::NoteNotFound { id: id.to_string() })?;
        note.body = body.to_string();
        Ok(())
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.values().cloned().collect())
    }

    fn create_tag(&mut self, title: &str) -> Result<Tag> {
        self.next_tag_id += 1;
        let tag = Tag {
            id: format!("tag-{}", self.next_tag_id),
            title: title.to_string(),
        };
        self.tags.insert(tag.id.clone(), tag.clone());
        Ok(tag)
    }

    fn note_tags(&self, note_id: &str) -> Result<Vec<Tag>> {
        let ids = self.note_tags.get(note_id);
        Ok(ids
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.tags.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn link_tag(&mut self, note_id: &str, tag_id: &str) -> Result<()> {
        if !self.notes.contains_key(note_id) {
            return Err(MuslixError::NoteNotFound {
                id: note_id.to_string(),
            });
        }
        if !self.tags.contains_key(tag_id) {
            return Err(MuslixError::TagNotFound {
                title: tag_id.to_string(),
            });
        }
        self.note_tags
            .entry(note_id.to_string())
            .or_default()
            .insert(tag_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_roundtrip() {
        let mut store = MemoryStore::new();
        store.add_simple_note("n1", "First", "body text");

        let note = store.note("n1").unwrap();
        assert_eq!(note.title, "First");

        store.update_note_body("n1", "new body").unwrap();
        assert_eq!(store.note("n1").unwrap().body, "new body");

        assert!(matches!(
            store.note("missing"),
            Err(MuslixError::NoteNotFound { .. })
        ));
    }

    #[test]
    fn test_tag_create_and_link() {
        let mut store = MemoryStore::new();
        store.add_simple_note("n1", "First", "");

        let tag = store.create_tag("koeln").unwrap();
        store.link_tag("n1", &tag.id).unwrap();
        // Linking twice keeps a single association
        store.link_tag("n1", &tag.id).unwrap();

        let linked = store.note_tags("n1").unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].title, "koeln");
    }

    #[test]
    fn test_link_unknown_tag_fails() {
        let mut store = MemoryStore::new();
        store.add_simple_note("n1", "First", "");
        assert!(store.link_tag("n1", "tag-99").is_err());
    }
}
