mod common;

use chordline_core::state::ProjectError;
use chordline_types::PitchClass;
use common::{block, editor, layout, CountingRedraw, RecordingTrigger};

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.json");
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();

    let mut ed = editor(&redraw, &audio);
    ed.set_bpm(90);
    ed.set_key(PitchClass::D);
    ed.add_block(block("Dm", 0.0, 2.0, 0));
    ed.add_block(block("C4n,E4n,G4n", 2.5, 1.5, 2));
    assert!(ed.is_dirty());
    ed.save_to_path(&path).unwrap();
    assert!(!ed.is_dirty());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"chord\""));
    assert!(text.contains("\"version\": \"1.0\""));

    let mut other = editor(&redraw, &audio);
    other.add_block(block("X", 9.0, 1.0, 0));
    other.load_from_path(&path).unwrap();
    assert_eq!(layout(&other), layout(&ed));
    assert_eq!(other.bpm(), 90);
    assert_eq!(other.key(), PitchClass::D);
    assert!(!other.can_undo());
    assert!(other.selection().is_empty());
}

#[test]
fn test_failed_load_leaves_song_intact() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();

    let mut ed = editor(&redraw, &audio);
    ed.add_block(block("G", 1.0, 1.0, 0));
    ed.set_bpm(133);
    let before = layout(&ed);

    assert!(matches!(ed.load_from_path(&bad), Err(ProjectError::Parse(_))));
    assert!(matches!(
        ed.load_from_path(&dir.path().join("missing.json")),
        Err(ProjectError::Io(_))
    ));
    assert_eq!(layout(&ed), before);
    assert_eq!(ed.bpm(), 133);
    assert!(ed.can_undo());
}

#[test]
fn test_missing_fields_take_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.json");
    std::fs::write(&path, r#"{"blocks":[{"chord":"Am","position":2}]}"#).unwrap();
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();

    let mut ed = editor(&redraw, &audio);
    ed.set_bpm(150);
    ed.set_key(PitchClass::E);
    ed.load_from_path(&path).unwrap();
    assert_eq!(ed.bpm(), 100);
    assert_eq!(ed.key(), PitchClass::C);
    assert_eq!(layout(&ed), vec![("Am".to_string(), 2.0, 1.0, 0)]);
}

#[test]
fn test_loaded_song_is_editable_and_undoable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.json");
    std::fs::write(
        &path,
        r#"{"version":"1.0","bpm":120,"key":"G","blocks":[
            {"chord":"G","position":0,"duration":4,"track":0},
            {"chord":"D","position":4,"duration":4,"track":0}
        ]}"#,
    )
    .unwrap();
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();

    let mut ed = editor(&redraw, &audio);
    ed.load_from_path(&path).unwrap();
    ed.add_block(block("Em", 8.0, 4.0, 0));
    assert_eq!(ed.blocks().len(), 3);
    ed.undo();
    assert_eq!(ed.blocks().len(), 2);
    assert!(!ed.undo());
}

#[test]
fn test_key_is_saved_as_written() {
    let dir = tempfile::tempdir().unwrap();
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();

    for (written, pitch) in [("Bb", PitchClass::As), ("Am", PitchClass::C), ("Eb", PitchClass::Ds)] {
        let src = dir.path().join("in.json");
        let out = dir.path().join("out.json");
        std::fs::write(
            &src,
            format!(r#"{{"bpm":100,"key":"{}","blocks":[{{"chord":"C","position":0}}]}}"#, written),
        )
        .unwrap();

        let mut ed = editor(&redraw, &audio);
        ed.load_from_path(&src).unwrap();
        assert_eq!(ed.key(), pitch);
        assert_eq!(ed.key_name(), written);
        ed.save_to_path(&out).unwrap();

        let saved = chordline_core::state::load_project(&out).unwrap();
        assert_eq!(saved.key, written);
    }
}

#[test]
fn test_set_key_replaces_written_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.json");
    std::fs::write(&path, r#"{"key":"Bb","blocks":[]}"#).unwrap();
    let redraw = CountingRedraw::default();
    let audio = RecordingTrigger::default();

    let mut ed = editor(&redraw, &audio);
    ed.load_from_path(&path).unwrap();
    ed.set_key(PitchClass::G);
    assert_eq!(ed.to_project().key, "G");
}
