use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::panel::Panel;
use crate::sync::{RecordingRenderer, RecordingTimeRange, TrackSyncController};

pub type SharedPanel = Arc<Mutex<Panel<RecordingRenderer, RecordingTimeRange>>>;

/// The panel lock delivers host events one at a time.
#[derive(Clone)]
pub struct AppState {
    pub panel: SharedPanel,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let controller = TrackSyncController::new(
            RecordingRenderer::view_only(),
            RecordingTimeRange::last_only(),
            config.panel.clone(),
        );
        Self {
            panel: Arc::new(Mutex::new(Panel::new(controller))),
        }
    }
}
