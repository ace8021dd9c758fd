//! Playback state: frame sequence snapshot, cursor, speed.

use radar_common::parse_instant;
use tracing::debug;

/// Animation speeds the `a` key cycles through, in milliseconds per frame.
pub const SPEED_STEPS_MS: [u64; 3] = [500, 1000, 2000];

/// Default animation speed.
pub const DEFAULT_SPEED_MS: u64 = 1000;

/// Current playback state.
///
/// The frame list is an immutable snapshot replaced wholesale on each
/// capabilities refresh; the cursor indexes into it. All transitions are
/// synchronous and owned by the coordinator task, so no locking is
/// involved.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    frames: Vec<String>,
    cursor: Option<usize>,
    playing: bool,
    speed_ms: u64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            cursor: None,
            playing: false,
            speed_ms: DEFAULT_SPEED_MS,
        }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Currently selected timestamp, if any.
    pub fn current_time(&self) -> Option<&str> {
        self.cursor.and_then(|i| self.frames.get(i)).map(String::as_str)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    /// Advance to the next speed step, returning the new value.
    pub fn cycle_speed(&mut self) -> u64 {
        let next = SPEED_STEPS_MS
            .iter()
            .position(|&s| s == self.speed_ms)
            .map(|i| (i + 1) % SPEED_STEPS_MS.len())
            .unwrap_or(0);
        self.speed_ms = SPEED_STEPS_MS[next];
        self.speed_ms
    }

    /// Replace the frame snapshot and reconcile the cursor.
    ///
    /// If nothing was selected yet the cursor jumps to the latest frame.
    /// A still-present selection is kept. A selection no longer
    /// advertised snaps to the nearest available frame by absolute time
    /// distance, ties breaking toward the later frame. An empty sequence
    /// clears the selection.
    pub fn apply_sequence(&mut self, frames: Vec<String>) {
        let previous = self.current_time().map(str::to_string);
        self.frames = frames;

        self.cursor = if self.frames.is_empty() {
            None
        } else {
            match previous {
                None => Some(self.frames.len() - 1),
                Some(t) => match self.frames.iter().position(|f| *f == t) {
                    Some(i) => Some(i),
                    None => {
                        let nearest = self.nearest_index(&t);
                        debug!(
                            previous = %t,
                            nearest = ?nearest.and_then(|i| self.frames.get(i)),
                            "Selected frame no longer available, snapping to nearest"
                        );
                        nearest.or(Some(self.frames.len() - 1))
                    }
                },
            }
        };
    }

    /// Index of the frame closest in time to `target`. Later frames win
    /// ties. Falls back to `None` only when the target or every frame is
    /// unparseable.
    fn nearest_index(&self, target: &str) -> Option<usize> {
        let target = parse_instant(target).ok()?;
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(i, f)| {
                let dt = parse_instant(f).ok()?;
                Some((i, (dt - target).num_milliseconds().abs()))
            })
            // min_by_key keeps the first minimum; reversed iteration makes
            // that the later of two equidistant frames
            .rev()
            .min_by_key(|&(_, dist)| dist)
            .map(|(i, _)| i)
    }

    /// Advance one frame, wrapping after the last. Used by the playback
    /// timer; a cleared cursor restarts at the first frame.
    pub fn advance(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.cursor = Some(
            self.cursor
                .map(|i| (i + 1) % self.frames.len())
                .unwrap_or(0),
        );
    }

    /// Step back one frame; no wrap, a no-op at the first frame.
    pub fn step_back(&mut self) {
        if let Some(i) = self.cursor {
            if i > 0 {
                self.cursor = Some(i - 1);
            }
        }
    }

    /// Place the cursor on an exact timestamp, e.g. from a scrub
    /// request. Returns false when the timestamp is not in the current
    /// sequence.
    pub fn select_time(&mut self, time: &str) -> bool {
        match self.frames.iter().position(|f| f == time) {
            Some(i) => {
                self.cursor = Some(i);
                true
            }
            None => false,
        }
    }

    /// Step forward one frame; no wrap, a no-op at the last frame. With
    /// no selection yet, selects the first frame.
    pub fn step_forward(&mut self) {
        match self.cursor {
            Some(i) if i + 1 < self.frames.len() => self.cursor = Some(i + 1),
            None if !self.frames.is_empty() => self.cursor = Some(0),
            _ => {}
        }
    }
}
