//! Playback timeline tracking
//!
//! Reconstructs whether a stream is still playing, and for how long it will
//! play, purely from wall-clock timestamps. The engine is never asked.
//!
//! **Model:**
//! - One pass of a sound lasts `base_duration / rate` ms
//! - A stream plays `loop_count + 1` passes (`-1` = forever)
//! - Time spent paused is accumulated in `non_played_ms` and excluded from
//!   played time
//! - `end_time` is the projected finish of the whole loop sequence
//!
//! **Lazy expiry:** there is no timer. Every query and every mutation first
//! runs [`StreamEntry::reconcile`], which moves a stream whose projected end
//! has passed into the stopped state.
//!
//! All operations take the current time explicitly so the state machine can
//! be exercised without a clock.

use crate::handle::{SoundId, StreamId};

/// Slowest accepted playback rate
pub const MIN_RATE: f32 = 0.5;

/// Fastest accepted playback rate
pub const MAX_RATE: f32 = 2.0;

/// Loop count meaning "repeat until stopped"
pub const LOOP_FOREVER: i32 = -1;

/// Clamp a playback rate to [`MIN_RATE`, `MAX_RATE`]
///
/// NaN is treated as normal speed.
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        return 1.0;
    }
    rate.clamp(MIN_RATE, MAX_RATE)
}

/// Clamp a loop count; anything below -1 means "forever"
pub fn clamp_loop(loop_count: i32) -> i32 {
    loop_count.max(LOOP_FOREVER)
}

/// Total projected duration: `base / rate * (loop + 1)`, truncated
///
/// Returns 0 for endless loops.
pub fn projected_duration(base_duration_ms: u32, loop_count: i32, rate: f32) -> i64 {
    if loop_count < 0 {
        return 0;
    }
    (base_duration_ms as f64 / rate as f64 * (loop_count as f64 + 1.0)) as i64
}

/// Length of one pass at `rate`, truncated to whole milliseconds
fn single_run_duration(base_duration_ms: u32, rate: f32) -> i64 {
    (base_duration_ms as f64 / rate as f64) as i64
}

/// Derived playback state of one engine stream
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    stream: StreamId,
    sound: SoundId,
    base_duration_ms: u32,
    playing: bool,
    /// Start of the current play segment
    start_time: Option<i64>,
    /// Projected end of the loop sequence; `None` when open-ended or stopped
    end_time: Option<i64>,
    /// Start of the pause in progress
    pause_time: Option<i64>,
    /// Cumulative paused time since the last `play`
    non_played_ms: i64,
    loop_count: i32,
    rate: f32,
}

impl StreamEntry {
    /// Create an entry in the stopped state
    pub fn new(stream: StreamId, sound: SoundId, base_duration_ms: u32) -> Self {
        Self {
            stream,
            sound,
            base_duration_ms,
            playing: false,
            start_time: None,
            end_time: None,
            pause_time: None,
            non_played_ms: 0,
            loop_count: 0,
            rate: 1.0,
        }
    }

    pub fn stream(&self) -> StreamId {
        self.stream
    }

    pub fn sound(&self) -> SoundId {
        self.sound
    }

    pub fn base_duration_ms(&self) -> u32 {
        self.base_duration_ms
    }

    pub fn loop_count(&self) -> i32 {
        self.loop_count
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn end_time(&self) -> Option<i64> {
        self.end_time
    }

    /// Paused and resumable
    pub fn is_paused(&self) -> bool {
        !self.playing && self.pause_time.is_some()
    }

    /// Expire the stream if its projected end has passed
    ///
    /// Returns true when this call moved the entry to the stopped state.
    pub fn reconcile(&mut self, now: i64) -> bool {
        if !self.playing || self.loop_count == LOOP_FOREVER {
            return false;
        }
        match self.end_time {
            Some(end) if now < end => false,
            _ => {
                self.stop();
                true
            }
        }
    }

    /// Begin a new play segment
    ///
    /// An entry that is still playing is stopped first.
    pub fn play(&mut self, now: i64, loop_count: i32, rate: f32) {
        if self.is_playing(now) {
            self.stop();
        }

        self.loop_count = clamp_loop(loop_count);
        self.rate = clamp_rate(rate);
        self.non_played_ms = 0;
        self.pause_time = None;
        self.start_time = Some(now);
        self.end_time = if self.loop_count >= 0 {
            Some(now + self.duration())
        } else {
            None
        };
        self.playing = true;
    }

    /// Whether the stream is advancing right now
    pub fn is_playing(&mut self, now: i64) -> bool {
        self.reconcile(now);
        self.playing
    }

    /// Reset to the stopped baseline
    ///
    /// `non_played_ms` survives until the next `play`.
    pub fn stop(&mut self) {
        self.playing = false;
        self.rate = 1.0;
        self.loop_count = 0;
        self.start_time = None;
        self.end_time = None;
        self.pause_time = None;
    }

    /// Pause a playing stream; returns false if it was not playing
    pub fn pause(&mut self, now: i64) -> bool {
        if !self.is_playing(now) {
            return false;
        }
        self.playing = false;
        self.pause_time = Some(now);
        true
    }

    /// Resume a paused stream; returns false if it was not paused
    ///
    /// The projected end moves forward by exactly the paused interval.
    pub fn resume(&mut self, now: i64) -> bool {
        if self.is_playing(now) {
            return false;
        }
        let Some(paused_at) = self.pause_time else {
            return false;
        };
        if self.start_time.is_none() {
            return false;
        }

        let paused_for = (now - paused_at).max(0);
        self.non_played_ms += paused_for;
        if self.loop_count >= 0 {
            self.end_time = self.end_time.map(|end| end + paused_for);
        }
        self.pause_time = None;
        self.playing = true;
        true
    }

    /// Change the loop count mid-flight
    pub fn set_loop(&mut self, now: i64, loop_count: i32) {
        self.reconcile(now);
        let new_loop = clamp_loop(loop_count);
        self.end_time = self.recalc_end_time(now, new_loop, self.rate);
        self.loop_count = new_loop;
    }

    /// Change the playback rate mid-flight
    pub fn set_rate(&mut self, now: i64, rate: f32) {
        self.reconcile(now);
        let new_rate = clamp_rate(rate);
        self.end_time = self.recalc_end_time(now, self.loop_count, new_rate);
        self.rate = new_rate;
    }

    /// Total projected duration under the current rate and loop count
    pub fn duration(&self) -> i64 {
        projected_duration(self.base_duration_ms, self.loop_count, self.rate)
    }

    /// Play time elapsed in the current segment, excluding pauses
    pub fn played_ms(&self, now: i64) -> Option<i64> {
        let start = self.start_time?;
        let anchor = self.pause_time.unwrap_or(now);
        Some((anchor - start - self.non_played_ms).max(0))
    }

    /// Play time left until the projected end
    ///
    /// `None` for endless, stopped or expired streams.
    pub fn remaining_ms(&mut self, now: i64) -> Option<i64> {
        self.reconcile(now);
        let end = self.end_time?;
        if self.loop_count == LOOP_FOREVER {
            return None;
        }
        let anchor = self.pause_time.unwrap_or(now);
        Some((end - anchor).max(0))
    }

    /// Project the end time after a loop or rate change
    ///
    /// Progress is measured under the current (pre-change) parameters. A
    /// loop change lets the in-progress pass finish; a rate change keeps the
    /// same fractional position within the current pass. While paused,
    /// progress is frozen at the pause instant and the projection is
    /// anchored there, so the following `resume` shifts it correctly.
    fn recalc_end_time(&self, now: i64, new_loop: i32, new_rate: f32) -> Option<i64> {
        if new_loop == self.loop_count && new_rate == self.rate {
            return self.end_time;
        }
        if new_loop == LOOP_FOREVER {
            return None;
        }
        let start = self.start_time?;

        let single_run = single_run_duration(self.base_duration_ms, self.rate);
        if single_run <= 0 {
            return None;
        }

        let anchor = self.pause_time.unwrap_or(now);
        let played = (anchor - start - self.non_played_ms).max(0);
        let loops_played = played / single_run;
        let current_run_played = played - loops_played * single_run;

        let remaining = if new_loop != self.loop_count {
            let new_loops_count = new_loop as i64 + 1;
            let current_run_left = single_run - current_run_played;

            if loops_played >= new_loops_count {
                current_run_left
            } else {
                (new_loops_count - loops_played) * single_run + current_run_left
            }
        } else {
            let loop_count = self.loop_count as i64 + 1;
            let new_single_run = single_run_duration(self.base_duration_ms, new_rate);

            let current_run_part = current_run_played as f64 / single_run as f64;
            let new_current_run_played = (current_run_part * new_single_run as f64) as i64;

            // A prior loop cut can leave fewer passes than already played;
            // the in-progress pass still finishes
            let passes_left = (loop_count - loops_played).max(1);
            (passes_left * new_single_run - new_current_run_played).max(0)
        };

        Some(anchor + remaining)
    }
}
