//! Token vocabulary: chord names, single notes and composite note groups.
//!
//! A token is the textual label carried by a block. Tokens are resolved to
//! concrete pitches for playback and mapped to a display color for
//! rendering. Anything that fails to parse is `Token::Unknown`, which plays
//! nothing and renders gray.

use serde::{Deserialize, Serialize};

use crate::music::{letter_index, letter_semitone, ChordQuality, PitchClass};

/// Chord names offered by the palette alongside the twelve notes.
pub const CHORD_PALETTE: [&str; 10] = [
    "C", "Dm", "Em", "F", "G", "Am", "Bdim", "G7", "Cmaj7", "Fmaj7",
];

/// A concrete pitch in scientific notation (C4 is middle C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayableNote {
    pub pitch: PitchClass,
    pub octave: i32,
}

impl PlayableNote {
    pub fn new(pitch: PitchClass, octave: i32) -> Self {
        Self { pitch, octave }
    }

    /// Build from semitones above C0, carrying into the octave.
    fn from_absolute(semitones: i32) -> Self {
        Self {
            pitch: PitchClass::from_semitone(semitones),
            octave: semitones.div_euclid(12),
        }
    }

    pub fn midi(&self) -> i32 {
        (self.octave + 1) * 12 + self.pitch.semitone()
    }

    /// Equal-tempered frequency relative to the given A4 reference.
    pub fn frequency(&self, a4: f64) -> f64 {
        a4 * 2f64.powf((self.midi() - 69) as f64 / 12.0)
    }
}

impl std::fmt::Display for PlayableNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.pitch.name(), self.octave)
    }
}

/// Parsed form of a token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `[A-G][#b]?<digit>n`, e.g. `C4n`, `F#3n`
    Note(PlayableNote),
    /// Root plus quality suffix, e.g. `Am`, `G7`, `Bbmaj7`
    Chord {
        root: PitchClass,
        letter: char,
        quality: ChordQuality,
    },
    /// Comma-separated single notes, e.g. `C4n,E4n`
    Composite(Vec<PlayableNote>),
    Unknown,
}

/// Note as written: natural letter, accidental and octave digit.
struct Spelling {
    letter: char,
    offset: i32,
    octave: i32,
}

impl Spelling {
    fn note(&self) -> Option<PlayableNote> {
        let base = letter_semitone(self.letter)?;
        Some(PlayableNote::from_absolute(self.octave * 12 + base + self.offset))
    }
}

fn parse_spelling(s: &str) -> Option<Spelling> {
    let body = s.strip_suffix('n')?;
    let mut chars = body.chars();
    let letter = chars.next()?;
    letter_semitone(letter)?;
    let rest = chars.as_str();
    let (offset, digits) = if let Some(d) = rest.strip_prefix('#') {
        (1, d)
    } else if let Some(d) = rest.strip_prefix('b') {
        (-1, d)
    } else {
        (0, rest)
    };
    let mut digit_chars = digits.chars();
    let octave = digit_chars.next()?.to_digit(10)? as i32;
    if digit_chars.next().is_some() {
        return None;
    }
    Some(Spelling {
        letter,
        offset,
        octave,
    })
}

fn parse_chord(s: &str) -> Option<Token> {
    let mut chars = s.chars();
    let letter = chars.next()?;
    let base = letter_semitone(letter)?;
    let rest = chars.as_str();
    let (offset, suffix) = if let Some(r) = rest.strip_prefix('#') {
        (1, r)
    } else if let Some(r) = rest.strip_prefix('b') {
        (-1, r)
    } else {
        (0, rest)
    };
    let quality = ChordQuality::from_suffix(suffix)?;
    Some(Token::Chord {
        root: PitchClass::from_semitone(base + offset),
        letter,
        quality,
    })
}

impl Token {
    pub fn parse(s: &str) -> Token {
        let s = s.trim();
        if s.contains(',') {
            let notes: Vec<PlayableNote> = s
                .split(',')
                .filter_map(|part| parse_spelling(part.trim()).and_then(|sp| sp.note()))
                .collect();
            return if notes.is_empty() {
                Token::Unknown
            } else {
                Token::Composite(notes)
            };
        }
        if let Some(note) = parse_spelling(s).and_then(|sp| sp.note()) {
            return Token::Note(note);
        }
        parse_chord(s).unwrap_or(Token::Unknown)
    }

    /// Pitches to sound for this token.
    pub fn notes(&self) -> Vec<PlayableNote> {
        match self {
            Token::Note(n) => vec![*n],
            Token::Composite(notes) => notes.clone(),
            Token::Chord { root, quality, .. } => {
                let base = quality.root_octave() * 12 + root.semitone();
                quality
                    .intervals()
                    .iter()
                    .map(|i| PlayableNote::from_absolute(base + i))
                    .collect()
            }
            Token::Unknown => Vec::new(),
        }
    }
}

/// Resolve a token string to the pitches it sounds. Unknown tokens yield
/// an empty list.
pub fn resolve_to_playable_notes(token: &str) -> Vec<PlayableNote> {
    Token::parse(token).notes()
}

/// True for a lone `[A-G][#b]?<digit>n` note, never for composites.
pub fn is_single_note(token: &str) -> bool {
    !token.contains(',') && matches!(Token::parse(token), Token::Note(_))
}

/// Merge two single-note tokens into a composite by comma-joining.
pub fn join_tokens(existing: &str, added: &str) -> String {
    format!("{},{}", existing, added)
}

/// Token for a natural note letter in the given octave, e.g. `E4n`.
pub fn note_token(letter: char, octave: i32) -> String {
    format!("{}{}n", letter.to_ascii_uppercase(), octave)
}

/// Palette offered to the user: twelve chromatic notes in `octave`
/// followed by the common chords.
pub fn palette(octave: i32) -> Vec<String> {
    PitchClass::ALL
        .iter()
        .map(|pc| format!("{}{}n", pc.name(), octave))
        .chain(CHORD_PALETTE.iter().map(|c| c.to_string()))
        .collect()
}

/// RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const UNKNOWN: Color = Color::from_hex(0x888888);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// `#RRGGBB`
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

// Per-family colors indexed by root letter C D E F G A B.
const MAJOR: [u32; 7] = [0xFF6B6B, 0xFF8C42, 0xFFA726, 0xFFA07A, 0x98D8C8, 0xF7DC6F, 0xFFD93D];
const MINOR: [u32; 7] = [0x4ECDC4, 0x45B7D1, 0x5DADE2, 0x85C1E2, 0x7FB3D5, 0x6FA3D8, 0x5499C7];
const DOMINANT7: [u32; 7] = [0xE74C3C, 0xEC7063, 0xF1948A, 0xF5B7B1, 0xD98880, 0xCD6155, 0xC0392B];
const MAJOR7: [u32; 7] = [0xBB8FCE, 0xC39BD3, 0xD7BDE2, 0xE8DAEF, 0xAF7AC5, 0xA569BD, 0x9B59B6];
const MINOR7: [u32; 7] = [0x17A589, 0x1ABC9C, 0x48C9B0, 0x76D7C4, 0x45B39D, 0x138D75, 0x0E6655];
const SUS2: [u32; 7] = [0xF4D03F, 0xF9E79F, 0xF8B739, 0xEB984E, 0xDC7633, 0xCA6F1E, 0xB9770E];
const SUS4: [u32; 7] = [0xF7DC6F, 0xFAD7A0, 0xF5B041, 0xE59866, 0xD68910, 0xBA4A00, 0xA04000];
const NINTH: [u32; 7] = [0xFF69B4, 0xFF1493, 0xDB7093, 0xC71585, 0xD02090, 0xFF00FF, 0xE75480];
const MINOR9: [u32; 7] = [0x8B008B, 0x9400D3, 0x9932CC, 0xA050C8, 0xBA55D3, 0xC17FD6, 0xDA70D6];
const SIXTH: [u32; 7] = [0xFFE4B5, 0xFFDAB9, 0xFFEFD5, 0xFFEBCD, 0xFFEAA7, 0xFDCB6E, 0xF8C471];
const MINOR6: [u32; 7] = [0x87CEEB, 0x87CEFA, 0x00BFFF, 0x3CB4F0, 0x1E90FF, 0x4682B4, 0x5F9EA0];
const ADD9: [u32; 7] = [0xFFDAB9, 0xFFB347, 0xFF9966, 0xFF8C69, 0xFFA07A, 0xFF7F50, 0xFA8072];
const POWER: [u32; 7] = [0x8B0000, 0xA52A2A, 0xB22222, 0xDC143C, 0xCD5C5C, 0xE9967A, 0xC0392B];
const DIMINISHED: [u32; 7] = [0x7F8C8D, 0x95A5A6, 0xBDC3C7, 0xAAB7B8, 0x99A3A4, 0x85929E, 0x717D7E];
const AUGMENTED: [u32; 7] = [0xE67E22, 0xD68910, 0xCA6F1E, 0xBA4A00, 0xA04000, 0x873600, 0x6E2C00];

fn family(quality: ChordQuality) -> &'static [u32; 7] {
    match quality {
        ChordQuality::Major => &MAJOR,
        ChordQuality::Minor => &MINOR,
        ChordQuality::Dominant7 => &DOMINANT7,
        ChordQuality::Major7 => &MAJOR7,
        ChordQuality::Minor7 => &MINOR7,
        ChordQuality::Sus2 => &SUS2,
        ChordQuality::Sus4 => &SUS4,
        ChordQuality::Dominant9 => &NINTH,
        ChordQuality::Minor9 => &MINOR9,
        ChordQuality::Sixth => &SIXTH,
        ChordQuality::Minor6 => &MINOR6,
        ChordQuality::Add9 => &ADD9,
        ChordQuality::Power => &POWER,
        ChordQuality::Diminished => &DIMINISHED,
        ChordQuality::Augmented => &AUGMENTED,
    }
}

/// Cyan shade for a single note, darkening toward blue as pitch rises.
fn note_color(spelling: &Spelling) -> Color {
    let idx = letter_index(spelling.letter).unwrap_or(0) as i32 + (spelling.octave - 4) * 7;
    let green = (0xFF - 0x11 * idx).clamp(0, 0xFF) as u8;
    Color::new(0x00, green, 0xFF)
}

/// Display color for a token. Composites take the color of their first part.
pub fn color_of(token: &str) -> Color {
    let token = token.trim();
    if let Some((first, _)) = token.split_once(',') {
        return color_of(first);
    }
    if let Some(spelling) = parse_spelling(token) {
        return note_color(&spelling);
    }
    match parse_chord(token) {
        Some(Token::Chord {
            letter, quality, ..
        }) => {
            let idx = letter_index(letter).unwrap_or(0);
            Color::from_hex(family(quality)[idx])
        }
        _ => Color::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(token: &str) -> Vec<String> {
        resolve_to_playable_notes(token)
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn major_and_minor_triads_voice_in_octave_four() {
        assert_eq!(names("C"), ["C4", "E4", "G4"]);
        assert_eq!(names("Am"), ["A4", "C5", "E5"]);
        assert_eq!(names("B"), ["B4", "D#5", "F#5"]);
    }

    #[test]
    fn extended_qualities() {
        assert_eq!(names("G7"), ["G4", "B4", "D5", "F5"]);
        assert_eq!(names("Cmaj7"), ["C4", "E4", "G4", "B4"]);
        assert_eq!(names("D9"), ["D4", "F#4", "A4", "C5", "E5"]);
        assert_eq!(names("Bdim"), ["B4", "D5", "F5"]);
        assert_eq!(names("Caug"), ["C4", "E4", "G#4"]);
        assert_eq!(names("Fadd9"), ["F4", "A4", "C5", "G5"]);
    }

    #[test]
    fn power_chord_is_root_fifth_octave_from_three() {
        assert_eq!(names("C5"), ["C3", "G3", "C4"]);
        assert_eq!(names("E5"), ["E3", "B3", "E4"]);
    }

    #[test]
    fn flat_roots_resolve_enharmonically() {
        assert_eq!(names("Bb"), ["A#4", "D5", "F5"]);
        assert_eq!(names("Ebm"), ["D#4", "F#4", "A#4"]);
    }

    #[test]
    fn single_notes_and_composites() {
        assert_eq!(names("E4n"), ["E4"]);
        assert_eq!(names("F#3n"), ["F#3"]);
        assert_eq!(names("B#4n"), ["C5"]);
        assert_eq!(names("C4n,E4n,G4n"), ["C4", "E4", "G4"]);
    }

    #[test]
    fn unknown_tokens_resolve_to_nothing() {
        assert!(names("Xyz").is_empty());
        assert!(names("").is_empty());
        assert!(names("C10n").is_empty());
        assert!(names("Cmin").is_empty());
        assert_eq!(Token::parse("H7"), Token::Unknown);
    }

    #[test]
    fn single_note_predicate_excludes_composites_and_chords() {
        assert!(is_single_note("C4n"));
        assert!(is_single_note("Db5n"));
        assert!(!is_single_note("C"));
        assert!(!is_single_note("C4n,E4n"));
        assert!(!is_single_note("C4"));
    }

    #[test]
    fn midi_and_frequency() {
        let a4 = PlayableNote::new(PitchClass::A, 4);
        assert_eq!(a4.midi(), 69);
        assert!((a4.frequency(440.0) - 440.0).abs() < 1e-9);
        let c4 = PlayableNote::new(PitchClass::C, 4);
        assert_eq!(c4.midi(), 60);
        assert!((c4.frequency(440.0) - 261.6256).abs() < 1e-3);
        assert!((a4.frequency(432.0) - 432.0).abs() < 1e-9);
    }

    #[test]
    fn chord_colors_follow_family_and_root() {
        assert_eq!(color_of("C").hex(), "#FF6B6B");
        assert_eq!(color_of("G").hex(), "#98D8C8");
        assert_eq!(color_of("Cm").hex(), "#4ECDC4");
        assert_eq!(color_of("Bm").hex(), "#5499C7");
        assert_eq!(color_of("Xyz"), Color::UNKNOWN);
        assert_eq!(color_of("Xyz").hex(), "#888888");
    }

    #[test]
    fn note_colors_darken_with_pitch() {
        assert_eq!(color_of("C4n"), Color::new(0x00, 0xFF, 0xFF));
        assert_eq!(color_of("D4n"), Color::new(0x00, 0xEE, 0xFF));
        assert_eq!(color_of("C5n"), Color::new(0x00, 0xFF - 7 * 0x11, 0xFF));
        assert_eq!(color_of("C2n"), Color::new(0x00, 0xFF, 0xFF));
    }

    #[test]
    fn composite_takes_first_part_color() {
        assert_eq!(color_of("D4n,F4n"), color_of("D4n"));
    }

    #[test]
    fn palette_lists_notes_then_chords() {
        let p = palette(4);
        assert_eq!(p.len(), 22);
        assert_eq!(p[0], "C4n");
        assert_eq!(p[1], "C#4n");
        assert_eq!(p[11], "B4n");
        assert_eq!(p[12], "C");
        assert_eq!(p[21], "Fmaj7");
        assert!(p.iter().all(|t| !resolve_to_playable_notes(t).is_empty()));
    }

    #[test]
    fn note_token_uppercases_letter() {
        assert_eq!(note_token('e', 4), "E4n");
        assert_eq!(join_tokens("C4n", "E4n"), "C4n,E4n");
    }
}
