//! Timeline extent and scroll window.

use crate::geometry::Geometry;

/// Smallest allowed beat width / track height, in pixels.
pub const MIN_ZOOM: f64 = 40.0;
/// Largest allowed beat width / track height, in pixels.
pub const MAX_ZOOM: f64 = 150.0;
/// Lanes shown even when no block uses them.
pub const MIN_VISIBLE_TRACKS: u32 = 3;
/// Extra pixels below the last lane.
pub const FOOTER_HEIGHT: f64 = 40.0;

/// Grow when the furthest block ends within this many beats of the extent.
const BLOCK_GUARD_BEATS: f64 = 100.0;
/// Grow when the visible window reaches within this many pixels of the end.
const VIEWPORT_GUARD_PX: f64 = 200.0;
/// Minimum growth step, in beats.
const GROWTH_BEATS: u32 = 200;
/// Pixels of lookahead past the visible window when sizing for scroll.
const VIEWPORT_LOOKAHEAD_PX: f64 = 800.0;

/// Distance from the container edge at which a gesture auto-scrolls.
const AUTOSCROLL_EDGE: f64 = 80.0;
const AUTOSCROLL_STEP: f64 = 18.0;

pub fn clamp_zoom(value: f64) -> f64 {
    value.clamp(MIN_ZOOM, MAX_ZOOM)
}

fn round_up_hundred(beats: f64) -> f64 {
    (beats / 100.0).ceil() * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Declared timeline length in beats.
    pub timeline_beats: u32,
    /// Rendering-surface width cap, in pixels.
    pub max_canvas_width: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub container_width: f64,
    pub container_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            timeline_beats: 200,
            max_canvas_width: 60_000.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            container_width: 0.0,
            container_height: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(timeline_beats: u32, max_canvas_width: f64) -> Self {
        Self {
            timeline_beats,
            max_canvas_width,
            ..Default::default()
        }
    }

    pub fn rendered_width(&self, geo: &Geometry) -> f64 {
        (f64::from(self.timeline_beats) * geo.beat_width).min(self.max_canvas_width)
    }

    pub fn track_count(max_track: Option<u32>) -> u32 {
        max_track
            .map_or(0, |t| t.saturating_add(1))
            .max(MIN_VISIBLE_TRACKS)
    }

    pub fn rendered_height(&self, geo: &Geometry, max_track: Option<u32>) -> f64 {
        geo.header_height + f64::from(Self::track_count(max_track)) * geo.track_height + FOOTER_HEIGHT
    }

    pub fn max_scroll_x(&self, geo: &Geometry) -> f64 {
        (self.rendered_width(geo) - self.container_width).max(0.0)
    }

    /// Scroll horizontally, clamped to the rendered width. Returns true if the
    /// offset changed.
    pub fn scroll_by(&mut self, dx: f64, geo: &Geometry) -> bool {
        let next = (self.scroll_x + dx).clamp(0.0, self.max_scroll_x(geo));
        let changed = next != self.scroll_x;
        self.scroll_x = next;
        changed
    }

    /// Pull the scroll offset back inside the rendered width, e.g. after
    /// zooming out.
    pub fn clamp_scroll(&mut self, geo: &Geometry) {
        self.scroll_x = self.scroll_x.clamp(0.0, self.max_scroll_x(geo));
    }

    /// Scroll a step when a gesture's pointer (content x) nears the left or
    /// right edge of the container.
    pub fn autoscroll(&mut self, pointer_x: f64, geo: &Geometry) -> bool {
        if self.container_width <= 0.0 {
            return false;
        }
        let local = pointer_x - self.scroll_x;
        if local > self.container_width - AUTOSCROLL_EDGE {
            self.scroll_by(AUTOSCROLL_STEP, geo)
        } else if local < AUTOSCROLL_EDGE && self.scroll_x > 0.0 {
            self.scroll_by(-AUTOSCROLL_STEP, geo)
        } else {
            false
        }
    }

    /// Grow the timeline when the furthest block or the visible window nears
    /// the end. The scroll offset is left untouched. Returns the new length if
    /// it grew.
    pub fn grow_if_needed(&mut self, max_end: f64, geo: &Geometry) -> Option<u32> {
        let current = f64::from(self.timeline_beats);
        let visible_end = self.scroll_x + self.container_width;
        let near_block_end = max_end > current - BLOCK_GUARD_BEATS;
        let near_viewport_end = visible_end > self.rendered_width(geo) - VIEWPORT_GUARD_PX;
        if !near_block_end && !near_viewport_end {
            return None;
        }

        let from_blocks = round_up_hundred(max_end + f64::from(GROWTH_BEATS));
        let from_viewport =
            round_up_hundred((visible_end + VIEWPORT_LOOKAHEAD_PX) / geo.beat_width);
        let wanted = (current + f64::from(GROWTH_BEATS))
            .max(from_blocks)
            .max(from_viewport);
        let cap = (self.max_canvas_width / geo.beat_width).floor() - 1.0;
        let target = wanted.min(cap);

        if target <= current {
            return None;
        }
        self.timeline_beats = target as u32;
        log::debug!(
            target: "extent",
            "timeline grown to {} beats (max end {:.2})",
            self.timeline_beats,
            max_end
        );
        Some(self.timeline_beats)
    }
}
