use sonotes_core::{ErrorKind, NameField, Note, Workspace, WorkspaceError};

fn workspace_with_tabs(names: &[&str]) -> Workspace {
    let mut workspace = Workspace::new();
    for name in names {
        workspace.create_tab(name).unwrap();
    }
    workspace
}

fn titles(workspace: &Workspace, tab: &str) -> Vec<String> {
    workspace
        .tab(tab)
        .unwrap()
        .note_titles()
        .map(str::to_string)
        .collect()
}

fn tab_names(workspace: &Workspace) -> Vec<String> {
    workspace.tab_names().map(str::to_string).collect()
}

#[test]
fn first_created_tab_becomes_active() {
    let mut workspace = Workspace::new();
    assert_eq!(workspace.active_tab_index(), -1);

    workspace.create_tab("Work").unwrap();
    assert_eq!(workspace.active_tab_index(), 0);

    workspace.create_tab("Personal").unwrap();
    assert_eq!(workspace.active_tab_index(), 0);
    assert_eq!(tab_names(&workspace), ["Work", "Personal"]);
}

#[test]
fn create_tab_rejects_duplicate_and_blank_names() {
    let mut workspace = workspace_with_tabs(&["Work"]);

    let err = workspace.create_tab("Work").unwrap_err();
    assert_eq!(err, WorkspaceError::DuplicateTab("Work".to_string()));
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);

    assert_eq!(
        workspace.create_tab("  ").unwrap_err(),
        WorkspaceError::InvalidName(NameField::TabName)
    );
    assert_eq!(workspace.tab_count(), 1);
}

#[test]
fn deleting_last_active_tab_clears_active_index() {
    let mut workspace = workspace_with_tabs(&["Only"]);
    workspace.delete_tab("Only").unwrap();
    assert_eq!(workspace.active_tab_index(), -1);
    assert!(workspace.is_empty());
}

#[test]
fn deleting_active_middle_tab_keeps_position() {
    let mut workspace = workspace_with_tabs(&["a", "b", "c"]);
    workspace.set_active_tab(1).unwrap();

    workspace.delete_tab("b").unwrap();

    assert_eq!(workspace.active_tab_index(), 1);
    assert_eq!(workspace.active_tab().unwrap().name(), "c");
}

#[test]
fn deleting_active_trailing_tab_moves_to_new_last() {
    let mut workspace = workspace_with_tabs(&["a", "b", "c"]);
    workspace.set_active_tab(2).unwrap();

    workspace.delete_tab("c").unwrap();

    assert_eq!(workspace.active_tab_index(), 1);
    assert_eq!(workspace.active_tab().unwrap().name(), "b");
}

#[test]
fn deleting_tab_before_active_keeps_same_tab_active() {
    let mut workspace = workspace_with_tabs(&["a", "b", "c"]);
    workspace.set_active_tab(2).unwrap();

    workspace.delete_tab("a").unwrap();

    assert_eq!(workspace.active_tab().unwrap().name(), "c");
    assert_eq!(workspace.active_tab_index(), 1);
}

#[test]
fn delete_missing_tab_is_key_not_found() {
    let mut workspace = workspace_with_tabs(&["a"]);
    let err = workspace.delete_tab("zzz").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    assert_eq!(workspace.tab_count(), 1);
}

#[test]
fn rename_tab_keeps_position_notes_and_active_index() {
    let mut workspace = workspace_with_tabs(&["a", "b", "c"]);
    workspace.add_note("b", "t1", "c1").unwrap();
    workspace.set_active_tab(1).unwrap();

    workspace.rename_tab("b", "Bee").unwrap();

    assert_eq!(tab_names(&workspace), ["a", "Bee", "c"]);
    assert_eq!(workspace.active_tab_index(), 1);
    let tab = workspace.active_tab().unwrap();
    assert_eq!(tab.name(), "Bee");
    assert_eq!(tab.content("t1").unwrap(), "c1");
    assert!(workspace.tab("b").is_none());
}

#[test]
fn rename_tab_errors_leave_workspace_unchanged() {
    let mut workspace = workspace_with_tabs(&["a", "b"]);
    let before = workspace.clone();

    assert_eq!(
        workspace.rename_tab("a", "b").unwrap_err(),
        WorkspaceError::DuplicateTab("b".to_string())
    );
    assert_eq!(
        workspace.rename_tab("x", "y").unwrap_err(),
        WorkspaceError::TabNotFound("x".to_string())
    );
    workspace.rename_tab("a", "a").unwrap();
    assert_eq!(workspace, before);
}

#[test]
fn reorder_tab_moves_active_tab_with_it() {
    let mut workspace = workspace_with_tabs(&["A", "B", "C", "D", "E"]);
    workspace.set_active_tab(0).unwrap();

    workspace.reorder_tab(0, 3).unwrap();

    assert_eq!(tab_names(&workspace), ["B", "C", "D", "A", "E"]);
    assert_eq!(workspace.active_tab_index(), 3);
    assert_eq!(workspace.active_tab().unwrap().name(), "A");
}

#[test]
fn reorder_tab_out_of_range_is_rejected() {
    let mut workspace = workspace_with_tabs(&["A", "B"]);
    let err = workspace.reorder_tab(0, 2).unwrap_err();
    assert_eq!(err, WorkspaceError::IndexOutOfRange { index: 2, len: 2 });
    assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    assert_eq!(tab_names(&workspace), ["A", "B"]);
}

#[test]
fn set_active_tab_validates_range() {
    let mut empty = Workspace::new();
    empty.set_active_tab(-1).unwrap();
    assert!(empty.set_active_tab(0).is_err());

    let mut workspace = workspace_with_tabs(&["a", "b"]);
    assert_eq!(
        workspace.set_active_tab(-1).unwrap_err(),
        WorkspaceError::IndexOutOfRange { index: -1, len: 2 }
    );
    assert!(workspace.set_active_tab(2).is_err());
    workspace.set_active_tab(1).unwrap();
    assert_eq!(workspace.active_tab_index(), 1);
}

#[test]
fn add_duplicate_note_leaves_tab_unchanged() {
    let mut workspace = workspace_with_tabs(&["Work"]);
    workspace.add_note("Work", "t1", "c1").unwrap();
    workspace.add_note("Work", "t2", "c2").unwrap();

    let err = workspace.add_note("Work", "t1", "other").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    assert_eq!(titles(&workspace, "Work"), ["t1", "t2"]);
    assert_eq!(workspace.tab("Work").unwrap().content("t1").unwrap(), "c1");
}

#[test]
fn add_note_requires_title_content_and_tab() {
    let mut workspace = workspace_with_tabs(&["Work"]);
    assert_eq!(
        workspace.add_note("Work", "t1", "").unwrap_err(),
        WorkspaceError::EmptyContent
    );
    assert_eq!(
        workspace.add_note("Work", " ", "c").unwrap_err(),
        WorkspaceError::InvalidName(NameField::NoteTitle)
    );
    assert_eq!(
        workspace.add_note("Nope", "t1", "c").unwrap_err(),
        WorkspaceError::TabNotFound("Nope".to_string())
    );
    assert!(workspace.tab("Work").unwrap().is_empty());
}

#[test]
fn move_note_appends_to_end_of_target() {
    let mut workspace = workspace_with_tabs(&["Work", "Personal"]);
    for title in ["t1", "t2", "t3"] {
        workspace.add_note("Work", title, "w").unwrap();
    }
    for title in ["p1", "p2"] {
        workspace.add_note("Personal", title, "p").unwrap();
    }

    workspace.move_note("Work", "Personal", "t1").unwrap();

    assert_eq!(titles(&workspace, "Work"), ["t2", "t3"]);
    assert_eq!(titles(&workspace, "Personal"), ["p1", "p2", "t1"]);
    assert_eq!(workspace.tab("Personal").unwrap().content("t1").unwrap(), "w");
}

#[test]
fn move_note_failures_are_atomic() {
    let mut workspace = workspace_with_tabs(&["Work", "Personal"]);
    workspace.add_note("Work", "t1", "w").unwrap();
    workspace.add_note("Personal", "t1", "p").unwrap();
    let before = workspace.clone();

    assert!(matches!(
        workspace.move_note("Work", "Personal", "t1").unwrap_err(),
        WorkspaceError::DuplicateTitle { tab, .. } if tab == "Personal"
    ));
    assert!(matches!(
        workspace.move_note("Work", "Personal", "missing").unwrap_err(),
        WorkspaceError::NoteNotFound { tab, .. } if tab == "Work"
    ));
    assert_eq!(
        workspace.move_note("Work", "Nowhere", "t1").unwrap_err(),
        WorkspaceError::TabNotFound("Nowhere".to_string())
    );
    assert_eq!(
        workspace.move_note("Nowhere", "Work", "t1").unwrap_err(),
        WorkspaceError::TabNotFound("Nowhere".to_string())
    );
    assert!(workspace.move_note("Work", "Work", "t1").is_err());
    assert_eq!(workspace, before);
}

#[test]
fn rename_delete_and_update_note_keep_order() {
    let mut workspace = workspace_with_tabs(&["Work"]);
    for title in ["a", "b", "c", "d"] {
        workspace.add_note("Work", title, title).unwrap();
    }

    workspace.rename_note("Work", "b", "bee").unwrap();
    workspace.update_note_content("Work", "c", "changed").unwrap();
    let removed = workspace.delete_note("Work", "a").unwrap();

    assert_eq!(removed, Note::new("a", "a"));
    assert_eq!(titles(&workspace, "Work"), ["bee", "c", "d"]);
    assert_eq!(workspace.tab("Work").unwrap().content("c").unwrap(), "changed");
}

#[test]
fn mixed_note_commands_track_reference_order() {
    let mut workspace = workspace_with_tabs(&["Work"]);
    let mut expected: Vec<String> = Vec::new();

    // Deterministic mix of appends, removals and moves checked against a Vec.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for step in 0..200 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        match seed % 3 {
            0 => {
                let title = format!("note-{step}");
                workspace.add_note("Work", &title, "body").unwrap();
                expected.push(title);
            }
            1 if !expected.is_empty() => {
                let index = (seed as usize / 3) % expected.len();
                let title = expected.remove(index);
                workspace.delete_note("Work", &title).unwrap();
            }
            2 if !expected.is_empty() => {
                let from = (seed as usize / 3) % expected.len();
                let to = (seed as usize / 7) % expected.len();
                let moved = expected.remove(from);
                expected.insert(to, moved);
                workspace.reorder_note("Work", from, to).unwrap();
            }
            _ => {}
        }
        assert_eq!(titles(&workspace, "Work"), expected);
    }
}
