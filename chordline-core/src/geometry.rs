//! Pixel/beat coordinate mapping and block hit-testing.
//!
//! All coordinates are content coordinates: pointer position within the
//! container plus the current scroll offset.

use chordline_types::{BlockId, ChordBlock};

/// Vertical gap between a lane edge and the block drawn in it.
pub const BLOCK_MARGIN: f64 = 5.0;
/// Horizontal gap trimmed from a block's right side.
pub const BLOCK_INNER_MARGIN: f64 = 4.0;
/// Half-width of the resize band used on pointer press.
pub const RESIZE_BAND: f64 = 8.0;
/// Half-width of the resize band used for the hover cursor.
pub const HOVER_BAND: f64 = 10.0;

/// Snap a beat value to the nearest quarter beat.
pub fn snap_quarter(beats: f64) -> f64 {
    (beats * 4.0).round() / 4.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && self.spans_y(y)
    }

    fn spans_y(&self, y: f64) -> bool {
        y >= self.y && y <= self.bottom()
    }
}

/// Part of a block under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    LeftEdge,
    RightEdge,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: BlockId,
    pub zone: HitZone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Pixels per beat.
    pub beat_width: f64,
    /// Pixels per lane.
    pub track_height: f64,
    /// Pixels above lane 0.
    pub header_height: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            beat_width: 80.0,
            track_height: 60.0,
            header_height: 25.0,
        }
    }
}

impl Geometry {
    pub fn beat_to_x(&self, beat: f64) -> f64 {
        beat * self.beat_width
    }

    pub fn x_to_beat(&self, x: f64) -> f64 {
        x / self.beat_width
    }

    pub fn track_to_y(&self, track: u32) -> f64 {
        self.header_height + f64::from(track) * self.track_height
    }

    /// Lane index under `y`. Negative above lane 0.
    pub fn y_to_track(&self, y: f64) -> i64 {
        ((y - self.header_height) / self.track_height).floor() as i64
    }

    /// Lane under `y`, with the header area counting as lane 0.
    pub fn track_at(&self, y: f64) -> u32 {
        self.y_to_track(y).clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Beat under `x`, snapped to a quarter and never negative.
    pub fn snapped_beat_at(&self, x: f64) -> f64 {
        snap_quarter(self.x_to_beat(x)).max(0.0)
    }

    pub fn block_rect(&self, block: &ChordBlock) -> Rect {
        Rect {
            x: self.beat_to_x(block.position),
            y: self.track_to_y(block.track) + BLOCK_MARGIN,
            width: block.duration * self.beat_width - BLOCK_INNER_MARGIN,
            height: self.track_height - 2.0 * BLOCK_MARGIN,
        }
    }

    /// Classify a point against one block. Edges win over the body, and the
    /// left edge wins when both bands overlap on a narrow block.
    pub fn zone_at(&self, block: &ChordBlock, x: f64, y: f64, band: f64) -> Option<HitZone> {
        let rect = self.block_rect(block);
        if !rect.spans_y(y) {
            return None;
        }
        if (x - rect.x).abs() <= band {
            Some(HitZone::LeftEdge)
        } else if (x - rect.right()).abs() <= band {
            Some(HitZone::RightEdge)
        } else if rect.contains(x, y) {
            Some(HitZone::Body)
        } else {
            None
        }
    }

    /// Topmost block under the point, checking newest blocks first.
    pub fn hit_test(&self, blocks: &[ChordBlock], x: f64, y: f64) -> Option<Hit> {
        blocks.iter().rev().find_map(|b| {
            self.zone_at(b, x, y, RESIZE_BAND)
                .map(|zone| Hit { id: b.id, zone })
        })
    }

    /// Topmost block whose body contains the point, ignoring resize bands.
    pub fn block_at(&self, blocks: &[ChordBlock], x: f64, y: f64) -> Option<BlockId> {
        blocks
            .iter()
            .rev()
            .find(|b| self.block_rect(b).contains(x, y))
            .map(|b| b.id)
    }

    /// Whether the point sits on any block's resize band, using the wider
    /// hover band.
    pub fn over_resize_handle(&self, blocks: &[ChordBlock], x: f64, y: f64) -> bool {
        blocks.iter().any(|b| {
            matches!(
                self.zone_at(b, x, y, HOVER_BAND),
                Some(HitZone::LeftEdge | HitZone::RightEdge)
            )
        })
    }
}
