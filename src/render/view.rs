use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::propagator::{PositionReceiver, RenderPosition};
use crate::render::interpolator::Interpolator;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ObjectSample {
    pub name: String,
    /// `None` when the object cannot be positioned this frame.
    #[schema(value_type = Option<Vec<f32>>)]
    pub position: Option<RenderPosition>,
}

/// Frame-side consumer of the propagator's output.
///
/// Call [`SceneView::refresh`] once per frame, then sample. Neither call
/// waits on the propagator.
pub struct SceneView {
    receiver: PositionReceiver,
    interpolator: Interpolator,
}

impl SceneView {
    pub fn new(receiver: PositionReceiver) -> Self {
        Self {
            receiver,
            interpolator: Interpolator::new(),
        }
    }

    pub fn refresh(&mut self, now: Instant) {
        if !matches!(self.receiver.has_changed(), Ok(true)) {
            return;
        }

        let latest = self.receiver.borrow_and_update().clone();
        if let Some(buffer) = latest {
            self.interpolator.on_new_buffer(buffer, now);
        }
    }

    pub fn generation(&self) -> Option<u64> {
        self.interpolator.generation()
    }

    pub fn len(&self) -> usize {
        self.interpolator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpolator.is_empty()
    }

    pub fn position(&self, index: usize, now: Instant) -> Option<RenderPosition> {
        self.interpolator.sample(index, now)
    }

    pub fn objects(&self, now: Instant) -> Vec<ObjectSample> {
        (0..self.len())
            .map(|index| ObjectSample {
                name: self.interpolator.name(index).unwrap_or_default().to_string(),
                position: self.interpolator.sample(index, now),
            })
            .collect()
    }
}

/// Refresh `scene` as each buffer is published. Returns once the propagator
/// is gone.
pub async fn follow(scene: Arc<Mutex<SceneView>>, mut published: PositionReceiver) {
    while published.changed().await.is_ok() {
        scene.lock().await.refresh(Instant::now());
    }
    log::debug!("Propagator output closed, scene no longer follows");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagator::{PositionBuffer, INVALID_POSITION};
    use std::time::Duration;
    use tokio::sync::watch;

    fn buffer(generation: u64, positions: Vec<RenderPosition>) -> Option<PositionBuffer> {
        let names: Arc<[String]> = vec!["ISS".to_string(), "HST".to_string()].into();
        Some(PositionBuffer::new(
            generation,
            Duration::from_millis(100),
            names,
            positions,
        ))
    }

    #[test]
    fn empty_until_first_publish() {
        let (_tx, rx) = watch::channel(None);
        let mut view = SceneView::new(rx);
        view.refresh(Instant::now());
        assert!(view.is_empty());
        assert_eq!(view.generation(), None);
        assert!(view.objects(Instant::now()).is_empty());
    }

    #[test]
    fn samples_latest_published_buffer() {
        let (tx, rx) = watch::channel(None);
        let mut view = SceneView::new(rx);
        let start = Instant::now();

        tx.send_replace(buffer(1, vec![[1.0, 0.0, 0.0], INVALID_POSITION]));
        view.refresh(start);

        let objects = view.objects(start);
        assert_eq!(
            objects,
            vec![
                ObjectSample {
                    name: "ISS".to_string(),
                    position: Some([1.0, 0.0, 0.0]),
                },
                ObjectSample {
                    name: "HST".to_string(),
                    position: None,
                },
            ]
        );

        tx.send_replace(buffer(1, vec![[2.0, 0.0, 0.0], [0.0, 1.0, 0.0]]));
        view.refresh(start);
        assert_eq!(view.position(0, start + Duration::from_millis(100)), Some([2.0, 0.0, 0.0]));
        assert_eq!(view.position(1, start), None);
    }

    #[test]
    fn refresh_without_new_buffer_keeps_timing() {
        let (tx, rx) = watch::channel(None);
        let mut view = SceneView::new(rx);
        let start = Instant::now();

        tx.send_replace(buffer(1, vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]));
        view.refresh(start);
        tx.send_replace(buffer(1, vec![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]));
        view.refresh(start);

        let halfway = start + Duration::from_millis(50);
        view.refresh(halfway);
        let [x, _, _] = view.position(0, halfway).unwrap();
        assert!((x - 0.5).abs() < 1e-5);
    }

    #[tokio::test]
    async fn follower_keeps_up_between_samples() {
        let (tx, rx) = watch::channel(None);
        let scene = Arc::new(Mutex::new(SceneView::new(rx.clone())));
        let follower = tokio::spawn(follow(scene.clone(), rx));

        for x in 1..=50 {
            tx.send_replace(buffer(1, vec![[x as f32, 0.0, 0.0], [0.0, 0.0, 0.0]]));
            tokio::task::yield_now().await;
        }

        let settled = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let far = Instant::now() + Duration::from_secs(60);
                if scene.lock().await.position(0, far) == Some([50.0, 0.0, 0.0]) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(settled.is_ok());

        // Nothing left for a late sampler to pick up.
        let mut view = scene.lock().await;
        view.refresh(Instant::now() + Duration::from_secs(10));
        let far = Instant::now() + Duration::from_secs(60);
        assert_eq!(view.position(0, far), Some([50.0, 0.0, 0.0]));
        drop(view);

        drop(tx);
        follower.await.unwrap();
    }
}
