//! Per-phase timing of the simulation tick.

use std::fmt::Display;
use std::time::{Duration, Instant};

use circular_buffer::CircularBuffer;
use parking_lot::Mutex;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use thousands::Separable;

/// The number of profiled phases.
const MAX_SYSTEMS: usize = SystemId::COUNT;
/// The number of durations kept per phase.
const TIMING_WINDOW_SIZE: usize = 60;

/// A rolling window of durations for one phase.
///
/// Ticks in which the phase did not run are recorded as zero durations, so
/// the statistics always describe the last window of ticks.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
    last_tick: u64,
}

impl TimingBuffer {
    /// Records the duration of the phase on `tick`.
    ///
    /// # Panics
    ///
    /// Panics if `tick` is older than the last recorded one.
    pub fn add_timing(&mut self, duration: Duration, tick: u64) {
        assert!(
            tick >= self.last_tick,
            "Time went backwards: tick {tick} < last tick {}",
            self.last_tick
        );

        if tick > self.last_tick && !self.buffer.is_empty() {
            for _ in 0..(tick - self.last_tick - 1).min(TIMING_WINDOW_SIZE as u64) {
                self.buffer.push_back(Duration::ZERO);
            }
        }

        self.buffer.push_back(duration);
        self.last_tick = tick;
    }

    pub fn most_recent(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Mean and sample standard deviation over the window, using Welford's algorithm.
    pub fn stats(&self) -> (Duration, Duration) {
        let mut count = 0u32;
        let mut mean = 0.0f64;
        let mut sum_squared_diff = 0.0f64;

        for duration in self.buffer.iter() {
            let secs = duration.as_secs_f64();
            count += 1;
            let diff = secs - mean;
            mean += diff / count as f64;
            sum_squared_diff += diff * (secs - mean);
        }

        if count == 0 {
            return (Duration::ZERO, Duration::ZERO);
        }

        let variance = if count > 1 {
            sum_squared_diff / (count - 1) as f64
        } else {
            0.0
        };
        (Duration::from_secs_f64(mean), Duration::from_secs_f64(variance.sqrt()))
    }
}

/// The timed phases of one simulation tick.
#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SystemId {
    Total,
    Input,
    Player,
    Ghosts,
    Respawn,
    Collision,
    Effects,
}

impl Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Into::<&'static str>::into(self).to_ascii_lowercase())
    }
}

#[derive(Debug)]
pub struct SystemTimings {
    timings: micromap::Map<SystemId, Mutex<TimingBuffer>, MAX_SYSTEMS>,
}

impl Default for SystemTimings {
    fn default() -> Self {
        let mut timings = micromap::Map::new();
        for id in SystemId::iter() {
            timings.insert(id, Mutex::new(TimingBuffer::default()));
        }
        Self { timings }
    }
}

impl SystemTimings {
    fn buffer(&self, id: SystemId) -> &Mutex<TimingBuffer> {
        self.timings
            .get(&id)
            .expect("SystemId not found in pre-populated map - this is a bug")
    }

    pub fn add_timing(&self, id: SystemId, duration: Duration, tick: u64) {
        self.buffer(id).lock().add_timing(duration, tick);
    }

    /// Runs `phase`, recording how long it took under `id`.
    pub fn time<T>(&self, id: SystemId, tick: u64, phase: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = phase();
        self.add_timing(id, start.elapsed(), tick);
        result
    }

    pub fn stats(&self, id: SystemId) -> (Duration, Duration) {
        self.buffer(id).lock().stats()
    }

    pub fn most_recent(&self, id: SystemId) -> Duration {
        self.buffer(id).lock().most_recent()
    }

    /// One line summarizing every phase, slowest first, led by the effective tick rate.
    pub fn summary(&self) -> String {
        let (total, _) = self.stats(SystemId::Total);
        let rate = match total.as_secs_f64() {
            secs if secs <= 0.0 => "-- tps".to_string(),
            secs => format!("{} tps", ((1.0 / secs) as u64).separate_with_commas()),
        };

        let mut phases: Vec<(SystemId, Duration, Duration)> = SystemId::iter()
            .filter(|id| *id != SystemId::Total)
            .map(|id| {
                let (mean, deviation) = self.stats(id);
                (id, mean, deviation)
            })
            .collect();
        phases.sort_by(|a, b| b.1.cmp(&a.1));

        let mut line = rate;
        for (id, mean, deviation) in phases {
            line.push_str(&format!(" | {id} {mean:.1?}±{deviation:.1?}"));
        }
        line
    }
}
