//! Workspace: ordered tabs plus the active-tab pointer.
//!
//! # Responsibility
//! - Own every tab and, through them, every note.
//! - Apply tab/note commands all-or-nothing.
//!
//! # Invariants
//! - Tab names are unique.
//! - The active index is `None` exactly when there are no tabs, and otherwise
//!   points at an existing tab.
//! - A command that returns `Err` leaves the workspace unchanged.

use crate::model::error::{NameField, WorkspaceError, WorkspaceResult};
use crate::model::note::{lookup_key, normalize_name, Note};
use crate::model::ordered_map::OrderedMap;
use crate::model::tab::Tab;

/// Raw active index used when no tab exists.
pub const NO_ACTIVE_TAB: i64 = -1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    tabs: OrderedMap<String, Tab>,
    active: Option<usize>,
}

impl Workspace {
    /// Creates a workspace with no tabs.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab(&self, name: &str) -> Option<&Tab> {
        self.tabs.get(self.key(name)).ok()
    }

    pub fn tab_at(&self, index: usize) -> Option<&Tab> {
        self.tabs.get_index(index).map(|(_, tab)| tab)
    }

    pub fn tab_index(&self, name: &str) -> Option<usize> {
        self.tabs.index_of(self.key(name))
    }

    /// Tabs in display order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> + '_ {
        self.tabs.ordered_values()
    }

    pub fn tab_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tabs.ordered_keys().map(String::as_str)
    }

    /// Name -> tab map in display order.
    pub fn ordered_tabs(&self) -> &OrderedMap<String, Tab> {
        &self.tabs
    }

    /// Active position, `None` when there are no tabs.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Active position as stored on disk: `-1` when there are no tabs.
    pub fn active_tab_index(&self) -> i64 {
        self.active
            .and_then(|index| i64::try_from(index).ok())
            .unwrap_or(NO_ACTIVE_TAB)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|index| self.tab_at(index))
    }

    /// Total number of notes across all tabs.
    pub fn note_count(&self) -> usize {
        self.tabs().map(Tab::len).sum()
    }

    /// Appends an empty tab and returns its position.
    ///
    /// The first tab created becomes active.
    ///
    /// # Errors
    /// - `InvalidName` when the name is blank.
    /// - `DuplicateTab` when the name is taken.
    pub fn create_tab(&mut self, name: &str) -> WorkspaceResult<usize> {
        let name = normalize_name(name).ok_or(WorkspaceError::InvalidName(NameField::TabName))?;
        let index = self
            .tabs
            .insert_at_end(name.clone(), Tab::new(name.clone()))
            .map_err(|err| WorkspaceError::from_tab_map(err, &name))?;
        if self.active.is_none() {
            self.active = Some(0);
        }
        Ok(index)
    }

    /// Removes a tab with all its notes and returns it.
    ///
    /// Deleting the active tab re-pins the selection to the tab that now
    /// occupies the same position, or the new last tab; deleting a tab before
    /// the active one keeps the same tab active.
    pub fn delete_tab(&mut self, name: &str) -> WorkspaceResult<Tab> {
        let name = self.key(name);
        let index = self.require_tab_index(name)?;
        let tab = self
            .tabs
            .remove(name)
            .map_err(|err| WorkspaceError::from_tab_map(err, name))?;
        let remaining = self.tabs.len();
        self.active = match self.active {
            _ if remaining == 0 => None,
            Some(active) if active == index => Some(active.min(remaining - 1)),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Ok(tab)
    }

    /// Renames a tab in place. The active index is untouched.
    ///
    /// Renaming to the current name succeeds without changes.
    pub fn rename_tab(&mut self, old_name: &str, new_name: &str) -> WorkspaceResult<()> {
        let new_name =
            normalize_name(new_name).ok_or(WorkspaceError::InvalidName(NameField::TabName))?;
        let old_name = self.key(old_name);
        self.require_tab_index(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        self.tabs
            .replace_key(old_name, new_name.clone())
            .map_err(|err| WorkspaceError::from_tab_map(err, &new_name))?;
        self.tab_mut(&new_name)?.set_name(new_name.clone());
        Ok(())
    }

    /// Moves the tab at `from` to `to`, shifting the tabs in between.
    ///
    /// The active index follows the tab that was active before the move.
    pub fn reorder_tab(&mut self, from: usize, to: usize) -> WorkspaceResult<()> {
        self.tabs
            .reposition(from, to)
            .map_err(|err| WorkspaceError::from_tab_map(err, ""))?;
        self.active = self.active.map(|active| match active {
            _ if active == from => to,
            _ if from < active && active <= to => active - 1,
            _ if to <= active && active < from => active + 1,
            _ => active,
        });
        Ok(())
    }

    /// Selects the active tab by raw index.
    ///
    /// `-1` is accepted only when the workspace has no tabs.
    pub fn set_active_tab(&mut self, index: i64) -> WorkspaceResult<()> {
        let len = self.tabs.len();
        if index == NO_ACTIVE_TAB && len == 0 {
            self.active = None;
            return Ok(());
        }
        match usize::try_from(index) {
            Ok(position) if position < len => {
                self.active = Some(position);
                Ok(())
            }
            _ => Err(WorkspaceError::IndexOutOfRange { index, len }),
        }
    }

    /// Adds a note at the end of a tab.
    ///
    /// # Errors
    /// - `TabNotFound`, `InvalidName`, `DuplicateTitle`.
    /// - `EmptyContent` when `content` is empty.
    pub fn add_note(&mut self, tab: &str, title: &str, content: &str) -> WorkspaceResult<usize> {
        let target = self.tab_mut(tab)?;
        if normalize_name(title).is_none() {
            return Err(WorkspaceError::InvalidName(NameField::NoteTitle));
        }
        if content.is_empty() {
            return Err(WorkspaceError::EmptyContent);
        }
        target.add_note(title, content)
    }

    pub fn rename_note(
        &mut self,
        tab: &str,
        old_title: &str,
        new_title: &str,
    ) -> WorkspaceResult<()> {
        self.tab_mut(tab)?.rename_note(old_title, new_title)
    }

    pub fn delete_note(&mut self, tab: &str, title: &str) -> WorkspaceResult<Note> {
        self.tab_mut(tab)?.delete_note(title)
    }

    pub fn reorder_note(&mut self, tab: &str, from: usize, to: usize) -> WorkspaceResult<()> {
        self.tab_mut(tab)?.reorder_note(from, to)
    }

    pub fn update_note_content(
        &mut self,
        tab: &str,
        title: &str,
        content: &str,
    ) -> WorkspaceResult<()> {
        self.tab_mut(tab)?.update_content(title, content)
    }

    /// Moves one note from `source` to the end of `target`.
    ///
    /// The note's position in `source` is not carried over. Moving a note onto
    /// its own tab reports `DuplicateTitle`.
    ///
    /// # Errors
    /// - `TabNotFound` when either tab is missing.
    /// - `NoteNotFound` when `source` has no such note.
    /// - `DuplicateTitle` when `target` already has the title.
    pub fn move_note(&mut self, source: &str, target: &str, title: &str) -> WorkspaceResult<()> {
        let source = self.key(source);
        let target = self.key(target);
        let source_tab = self.require_tab(source)?;
        let target_tab = self.require_tab(target)?;
        let title = lookup_key(source_tab.ordered_notes(), title);
        if !source_tab.contains_note(title) {
            return Err(WorkspaceError::NoteNotFound {
                tab: source.to_string(),
                title: title.to_string(),
            });
        }
        if target_tab.contains_note(title) {
            return Err(WorkspaceError::DuplicateTitle {
                tab: target.to_string(),
                title: title.to_string(),
            });
        }

        let note = self.tab_mut(source)?.delete_note(title)?;
        self.tab_mut(target)?.append(note)?;
        Ok(())
    }

    /// Appends a tab read from durable state. Returns `false` when skipped.
    pub(crate) fn push_loaded_tab(&mut self, tab: Tab) -> bool {
        if tab.name().is_empty() {
            return false;
        }
        let name = tab.name().to_string();
        self.tabs.insert_at_end(name, tab).is_ok()
    }

    /// Applies a stored active index, falling back to the first tab (or none)
    /// when it is out of range.
    pub(crate) fn pin_loaded_active(&mut self, raw: i64) {
        let len = self.tabs.len();
        self.active = match usize::try_from(raw) {
            _ if len == 0 => None,
            Ok(index) if index < len => Some(index),
            _ => Some(0),
        };
    }

    fn key<'a>(&self, name: &'a str) -> &'a str {
        lookup_key(&self.tabs, name)
    }

    fn require_tab(&self, name: &str) -> WorkspaceResult<&Tab> {
        let name = self.key(name);
        self.tabs
            .get(name)
            .map_err(|err| WorkspaceError::from_tab_map(err, name))
    }

    fn require_tab_index(&self, name: &str) -> WorkspaceResult<usize> {
        let name = self.key(name);
        self.tabs
            .index_of(name)
            .ok_or_else(|| WorkspaceError::TabNotFound(name.to_string()))
    }

    fn tab_mut(&mut self, name: &str) -> WorkspaceResult<&mut Tab> {
        let name = self.key(name);
        self.tabs
            .get_mut(name)
            .map_err(|err| WorkspaceError::from_tab_map(err, name))
    }
}
