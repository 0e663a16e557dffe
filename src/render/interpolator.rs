use std::cmp::Ordering;
use std::time::Instant;

use crate::propagator::{is_positionable, PositionBuffer, RenderPosition};

struct BufferPair {
    last: PositionBuffer,
    next: PositionBuffer,
    received_at: Instant,
}

impl BufferPair {
    fn alpha(&self, now: Instant) -> f32 {
        let interval = self.next.tick_interval().as_secs_f64();
        if interval <= 0.0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.received_at).as_secs_f64();
        (elapsed / interval).clamp(0.0, 1.0) as f32
    }
}

/// Double-buffered linear interpolation between the two most recent
/// propagation ticks.
///
/// Buffers are swapped as whole handles; a buffer is never modified after it
/// arrives. Buffers from an older generation than the one held are ignored,
/// and a newer generation replaces both slots.
#[derive(Default)]
pub struct Interpolator {
    pair: Option<BufferPair>,
}

impl Interpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a freshly published buffer. Returns `false` if it was discarded
    /// as stale.
    pub fn on_new_buffer(&mut self, buffer: PositionBuffer, received_at: Instant) -> bool {
        let held = self.pair.as_ref().map(|pair| &pair.next);

        match held.map(|next| (buffer.generation().cmp(&next.generation()), next.count())) {
            Some((Ordering::Less, _)) => {
                log::debug!("Ignoring buffer from old generation {}", buffer.generation());
                return false;
            }
            Some((Ordering::Equal, count)) if count == buffer.count() => {
                if let Some(pair) = self.pair.as_mut() {
                    pair.last = std::mem::replace(&mut pair.next, buffer);
                    pair.received_at = received_at;
                }
            }
            Some((Ordering::Equal, count)) => {
                log::warn!(
                    "Buffer length changed within generation {} ({} -> {}), resetting",
                    buffer.generation(),
                    count,
                    buffer.count()
                );
                self.reset(buffer, received_at);
            }
            _ => self.reset(buffer, received_at),
        }

        true
    }

    fn reset(&mut self, buffer: PositionBuffer, received_at: Instant) {
        self.pair = Some(BufferPair {
            last: buffer.clone(),
            next: buffer,
            received_at,
        });
    }

    pub fn generation(&self) -> Option<u64> {
        self.pair.as_ref().map(|pair| pair.next.generation())
    }

    pub fn len(&self) -> usize {
        self.pair.as_ref().map_or(0, |pair| pair.next.count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.pair.as_ref().and_then(|pair| pair.next.name(index))
    }

    /// Interpolated position of object `index` at `now`, or `None` when it is
    /// not positionable in either held buffer.
    pub fn sample(&self, index: usize, now: Instant) -> Option<RenderPosition> {
        let pair = self.pair.as_ref()?;
        let last = pair.last.get(index)?;
        let next = pair.next.get(index)?;

        if !is_positionable(&last) || !is_positionable(&next) {
            return None;
        }

        let alpha = pair.alpha(now);
        let keep = 1.0 - alpha;
        Some([
            last[0] * keep + next[0] * alpha,
            last[1] * keep + next[1] * alpha,
            last[2] * keep + next[2] * alpha,
        ])
    }
}
