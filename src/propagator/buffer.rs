use std::sync::Arc;
use std::time::Duration;

pub type RenderPosition = [f32; 3];

/// Written in place of a position the propagator could not compute.
pub const INVALID_POSITION: RenderPosition = [f32::NAN; 3];

pub fn is_positionable(position: &RenderPosition) -> bool {
    position.iter().all(|c| c.is_finite())
}

/// Positions of one tracked-set generation at one propagation tick.
///
/// Index-aligned with the tracked set it was produced from. Never mutated
/// after construction; clones share the same storage.
#[derive(Debug, Clone)]
pub struct PositionBuffer {
    generation: u64,
    tick_interval: Duration,
    names: Arc<[String]>,
    positions: Arc<[RenderPosition]>,
}

impl PositionBuffer {
    pub fn new(
        generation: u64,
        tick_interval: Duration,
        names: Arc<[String]>,
        positions: Vec<RenderPosition>,
    ) -> Self {
        debug_assert_eq!(names.len(), positions.len());
        Self {
            generation,
            tick_interval,
            names,
            positions: positions.into(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn get(&self, index: usize) -> Option<RenderPosition> {
        self.positions.get(index).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn positions(&self) -> &[RenderPosition] {
        &self.positions
    }

    /// `count * 3` values, x/y/z per object.
    pub fn to_flat(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_view_keeps_sentinel_triplets() {
        let names: Arc<[String]> = vec!["a".to_string(), "b".to_string()].into();
        let buffer = PositionBuffer::new(
            1,
            Duration::from_millis(200),
            names,
            vec![[1.0, 2.0, 3.0], INVALID_POSITION],
        );

        let flat = buffer.to_flat();
        assert_eq!(flat.len(), buffer.count() * 3);
        assert_eq!(&flat[..3], &[1.0, 2.0, 3.0]);
        assert!(flat[3..].iter().all(|v| v.is_nan()));
        assert!(!is_positionable(&buffer.get(1).unwrap()));
        assert_eq!(buffer.name(1), Some("b"));
    }
}
