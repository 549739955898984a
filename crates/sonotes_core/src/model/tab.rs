//! Tab: a named, ordered collection of notes.
//!
//! # Responsibility
//! - Own note content keyed by title, in user-visible order.
//! - Validate note commands before touching the order.
//!
//! # Invariants
//! - Titles are unique within a tab.
//! - Order changes only via append, remove, or explicit reorder; renaming and
//!   content updates keep the note where it is.

use crate::model::error::{NameField, WorkspaceError, WorkspaceResult};
use crate::model::note::{lookup_key, normalize_name, Note, NoteView};
use crate::model::ordered_map::OrderedMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    name: String,
    notes: OrderedMap<String, String>,
}

impl Tab {
    /// Creates an empty tab. The name is stored as given.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: OrderedMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains_note(&self, title: &str) -> bool {
        self.notes.contains_key(self.key(title))
    }

    /// Title -> content map in display order.
    pub fn ordered_notes(&self) -> &OrderedMap<String, String> {
        &self.notes
    }

    pub fn note_titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.notes.ordered_keys().map(String::as_str)
    }

    pub fn notes(&self) -> impl Iterator<Item = NoteView<'_>> + '_ {
        self.notes.ordered_entries().map(|(title, content)| NoteView {
            title: title.as_str(),
            content: content.as_str(),
        })
    }

    pub fn note(&self, title: &str) -> Option<NoteView<'_>> {
        let index = self.note_index(title)?;
        self.note_at(index)
    }

    pub fn note_at(&self, index: usize) -> Option<NoteView<'_>> {
        self.notes
            .get_index(index)
            .map(|(title, content)| NoteView {
                title: title.as_str(),
                content: content.as_str(),
            })
    }

    pub fn note_index(&self, title: &str) -> Option<usize> {
        self.notes.index_of(self.key(title))
    }

    /// Returns note content by title.
    pub fn content(&self, title: &str) -> WorkspaceResult<&str> {
        let title = self.key(title);
        self.notes
            .get(title)
            .map(String::as_str)
            .map_err(|err| WorkspaceError::from_note_map(err, &self.name, title))
    }

    /// Appends a note at the end of the order and returns its position.
    ///
    /// # Errors
    /// - `InvalidName` when the title is blank.
    /// - `DuplicateTitle` when the title is already used in this tab.
    pub fn add_note(
        &mut self,
        title: &str,
        content: impl Into<String>,
    ) -> WorkspaceResult<usize> {
        let title =
            normalize_name(title).ok_or(WorkspaceError::InvalidName(NameField::NoteTitle))?;
        self.append(Note::new(title, content))
    }

    /// Renames a note in place.
    ///
    /// Renaming to the current title succeeds without changes.
    pub fn rename_note(&mut self, old_title: &str, new_title: &str) -> WorkspaceResult<()> {
        let new_title =
            normalize_name(new_title).ok_or(WorkspaceError::InvalidName(NameField::NoteTitle))?;
        let old_title = self.key(old_title);
        if !self.notes.contains_key(old_title) {
            return Err(self.note_not_found(old_title));
        }
        let name = &self.name;
        self.notes
            .replace_key(old_title, new_title.clone())
            .map_err(|err| WorkspaceError::from_note_map(err, name, &new_title))
    }

    /// Removes a note and returns it.
    pub fn delete_note(&mut self, title: &str) -> WorkspaceResult<Note> {
        let title = self.key(title);
        let name = &self.name;
        let (title, content) = self
            .notes
            .remove_entry(title)
            .map_err(|err| WorkspaceError::from_note_map(err, name, title))?;
        Ok(Note { title, content })
    }

    /// Moves the note at `from` to `to`, shifting the notes in between.
    pub fn reorder_note(&mut self, from: usize, to: usize) -> WorkspaceResult<()> {
        let name = &self.name;
        self.notes
            .reposition(from, to)
            .map_err(|err| WorkspaceError::from_note_map(err, name, ""))
    }

    /// Replaces note content without moving the note.
    pub fn update_content(
        &mut self,
        title: &str,
        content: impl Into<String>,
    ) -> WorkspaceResult<()> {
        let title = self.key(title);
        let name = &self.name;
        let slot = self
            .notes
            .get_mut(title)
            .map_err(|err| WorkspaceError::from_note_map(err, name, title))?;
        *slot = content.into();
        Ok(())
    }

    /// Appends an already-validated note.
    pub(crate) fn append(&mut self, note: Note) -> WorkspaceResult<usize> {
        let Note { title, content } = note;
        if self.notes.contains_key(&title) {
            return Err(WorkspaceError::DuplicateTitle {
                tab: self.name.clone(),
                title,
            });
        }
        let name = &self.name;
        self.notes
            .insert_at_end(title.clone(), content)
            .map_err(|err| WorkspaceError::from_note_map(err, name, &title))
    }

    /// Appends a note read from durable state.
    ///
    /// Stored titles are kept verbatim. Returns `false` when the title is empty
    /// or already present, in which case the note is skipped.
    pub(crate) fn push_loaded(&mut self, title: String, content: String) -> bool {
        if title.is_empty() {
            return false;
        }
        self.notes.insert_at_end(title, content).is_ok()
    }

    fn key<'a>(&self, title: &'a str) -> &'a str {
        lookup_key(&self.notes, title)
    }

    fn note_not_found(&self, title: &str) -> WorkspaceError {
        WorkspaceError::NoteNotFound {
            tab: self.name.clone(),
            title: title.to_string(),
        }
    }
}
