mod common;

use chordline_core::keymap::{action_for_key, KeyCode, KeyEvent, Modifiers};
use chordline_core::Editor;
use common::{editor, layout, CountingRedraw, RecordingTrigger};

fn press(ed: &mut Editor<'_>, key: KeyCode, modifiers: Modifiers) -> bool {
    match action_for_key(&KeyEvent::new(key, modifiers)) {
        Some(action) => ed.dispatch(&action),
        None => false,
    }
}

#[test]
fn test_shortcut_session() {
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();
    let mut ed = editor(&redraw, &audio);

    // hover at beat 2, lane 1 and type a note
    ed.pointer_move(160.0, 100.0);
    assert!(press(&mut ed, KeyCode::Char('e'), Modifiers::none()));
    assert_eq!(layout(&ed), vec![("E4n".to_string(), 2.0, 1.0, 1)]);
    assert_eq!(ed.selection().len(), 1);

    press(&mut ed, KeyCode::Char('c'), Modifiers::ctrl());
    assert_eq!(ed.clipboard().contents().len(), 1);

    ed.pointer_move(400.0, 40.0);
    assert!(press(&mut ed, KeyCode::Char('v'), Modifiers::ctrl()));
    assert_eq!(ed.blocks()[1].position, 5.0);
    assert_eq!(ed.blocks()[1].track, 0);

    assert!(press(&mut ed, KeyCode::Char('z'), Modifiers::ctrl()));
    assert_eq!(ed.blocks().len(), 1);
    assert!(press(&mut ed, KeyCode::Char('Z'), Modifiers::ctrl_shift()));
    assert_eq!(ed.blocks().len(), 2);

    press(&mut ed, KeyCode::Char('a'), Modifiers::ctrl());
    assert_eq!(ed.selection().len(), 2);
    assert!(press(&mut ed, KeyCode::Delete, Modifiers::none()));
    assert!(ed.blocks().is_empty());

    assert!(!press(&mut ed, KeyCode::Char('y'), Modifiers::ctrl()));
    assert!(press(&mut ed, KeyCode::Char('z'), Modifiers::ctrl()));
    assert_eq!(ed.blocks().len(), 2);
}

#[test]
fn test_octave_setting_applies_to_note_keys() {
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();
    let mut ed = editor(&redraw, &audio);

    ed.set_octave(3);
    press(&mut ed, KeyCode::Char('b'), Modifiers::none());
    assert_eq!(ed.blocks()[0].token, "B3n");
}

#[test]
fn test_typing_in_a_text_field_does_nothing() {
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();
    let mut ed = editor(&redraw, &audio);

    for key in [KeyCode::Char('a'), KeyCode::Delete] {
        let ev = KeyEvent::new(key, Modifiers::none()).in_text_field();
        if let Some(action) = action_for_key(&ev) {
            ed.dispatch(&action);
        }
    }
    assert!(ed.blocks().is_empty());
}
