//! Note store abstraction
//!
//! The host application owns notes and tags; this crate consumes a
//! narrow interface: fetch a note, rewrite its body, resolve and create
//! tags, link tags to notes. [`FsStore`] keeps notes as markdown files
//! with YAML frontmatter; [`MemoryStore`] backs tests and embedders that
//! bring their own persistence.

pub mod fs;
pub mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use serde::Serialize;

use crate::error::Result;

/// A note as seen by this crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Id of the containing folder, when the store has folders
    pub parent_id: Option<String>,
}

/// A tag with its store identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: String,
    pub title: String,
}

/// Storage operations consumed by analysis and change application.
///
/// Mutations take `&mut self`; one batch owns the store for its whole
/// run, which is what keeps tag creation race-free within a batch.
pub trait NoteStore {
    /// Fetch a note by id
    fn note(&self, id: &str) -> Result<Note>;

    /// All note ids in the store, in stable order
    fn note_ids(&self) -> Result<Vec<String>>;

    /// Replace a note's body text
    fn update_note_body(&mut self, id: &str, body: &str) -> Result<()>;

    /// All known tags
    fn tags(&self) -> Result<Vec<Tag>>;

    /// Create a tag by title, returning its identity
    fn create_tag(&mut self, title: &str) -> Result<Tag>;

    /// Tags currently linked to a note
    fn note_tags(&self, note_id: &str) -> Result<Vec<Tag>>;

    /// Link a tag to a note. Idempotency is the caller's responsibility;
    /// implementations may either ignore or reject duplicate links.
    fn link_tag(&mut self, note_id: &str, tag_id: &str) -> Result<()>;
}
