use std::sync::Arc;
use tokio::sync::Mutex;

use crate::feed::{HttpFeed, TleCache};
use crate::propagator::PropagatorHandle;
use crate::render::SceneView;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<TleCache<HttpFeed>>,
    pub propagator: Arc<PropagatorHandle>,
    pub scene: Arc<Mutex<SceneView>>,
}
