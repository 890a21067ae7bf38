use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::sync::{PanelOptions, SeriesData, TimeRangeSetter, TrackRenderer, TrackSyncController};
use crate::track::{LatLngBounds, TimeRange, TrackError};

#[derive(Debug)]
struct RedrawHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Owns a controller together with its deferred redraw work.
pub struct Panel<R, T> {
    controller: Arc<StdMutex<TrackSyncController<R, T>>>,
    redraw: Option<RedrawHandle>,
    torn_down: bool,
}

impl<R, T> Panel<R, T>
where
    R: TrackRenderer + Send + 'static,
    T: TimeRangeSetter + Send + 'static,
{
    pub fn new(controller: TrackSyncController<R, T>) -> Self {
        Self {
            controller: Arc::new(StdMutex::new(controller)),
            redraw: None,
            torn_down: false,
        }
    }

    pub fn data_received(&mut self, series: &[SeriesData]) -> Result<(), TrackError> {
        if self.ignored("data-received") {
            return Ok(());
        }
        self.lock().on_data_received(series)
    }

    pub fn hover(&mut self, cursor_x: f64) {
        if !self.ignored("graph-hover") {
            self.lock().on_hover(cursor_x);
        }
    }

    pub fn hover_clear(&mut self) {
        if !self.ignored("graph-hover-clear") {
            self.lock().on_hover_clear();
        }
    }

    pub fn box_select(&mut self, bounds: &LatLngBounds) -> Option<TimeRange> {
        if self.ignored("map-box-select") {
            return None;
        }
        self.lock().on_box_selection(bounds)
    }

    /// Applies new options and redraws after their configured delay.
    pub async fn set_options(&mut self, options: PanelOptions) {
        if self.ignored("options") {
            return;
        }
        let delay = options.redraw_delay();
        self.lock().set_options(options);
        self.schedule_redraw(delay).await;
    }

    /// Replaces any pending redraw with one that fires after `delay`.
    pub async fn schedule_redraw(&mut self, delay: Duration) {
        self.cancel_redraw().await;
        if self.torn_down {
            return;
        }

        let controller = self.controller.clone();
        let (stop_tx, stop_rx) = oneshot::channel();

        let join = tokio::spawn(async move {
            tokio::select! {
                _ = sleep(delay) => {
                    controller
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .redraw();
                }
                _ = stop_rx => {
                    log::debug!("Pending redraw cancelled");
                }
            }
        });

        self.redraw = Some(RedrawHandle { stop_tx, join });
    }

    /// Waits for a pending redraw to fire.
    pub async fn flush_redraw(&mut self) {
        if let Some(handle) = self.redraw.take() {
            let _ = handle.join.await;
        }
    }

    #[cfg(test)]
    pub fn is_redraw_pending(&self) -> bool {
        self.redraw
            .as_ref()
            .is_some_and(|handle| !handle.join.is_finished())
    }

    /// Cancels pending work. Later events are ignored.
    pub async fn teardown(&mut self) {
        self.cancel_redraw().await;
        self.torn_down = true;
        log::info!("Panel torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn with_controller<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&mut TrackSyncController<R, T>) -> O,
    {
        f(&mut self.lock())
    }

    async fn cancel_redraw(&mut self) {
        if let Some(handle) = self.redraw.take() {
            let _ = handle.stop_tx.send(());
            let _ = handle.join.await;
        }
    }

    fn ignored(&self, event: &str) -> bool {
        if self.torn_down {
            log::warn!("Ignoring {} after teardown", event);
        }
        self.torn_down
    }

    fn lock(&self) -> MutexGuard<'_, TrackSyncController<R, T>> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{RecordingRenderer, RecordingTimeRange, RenderOp, SyncState};

    fn panel() -> Panel<RecordingRenderer, RecordingTimeRange> {
        Panel::new(TrackSyncController::new(
            RecordingRenderer::new(),
            RecordingTimeRange::new(),
            PanelOptions::default(),
        ))
    }

    fn track() -> Vec<SeriesData> {
        vec![
            SeriesData::from_pairs("lat", &[(1.0, 100.0), (2.0, 200.0)]),
            SeriesData::from_pairs("lon", &[(10.0, 100.0), (20.0, 200.0)]),
        ]
    }

    fn render_count(panel: &Panel<RecordingRenderer, RecordingTimeRange>) -> usize {
        panel.with_controller(|c| {
            c.renderer()
                .ops()
                .iter()
                .filter(|op| matches!(op, RenderOp::RenderTrack { .. }))
                .count()
        })
    }

    #[tokio::test]
    async fn deferred_redraw_fires() {
        let mut panel = panel();
        panel.data_received(&track()).unwrap();
        assert_eq!(render_count(&panel), 1);

        panel.schedule_redraw(Duration::from_millis(1)).await;
        panel.flush_redraw().await;
        assert_eq!(render_count(&panel), 2);
    }

    #[tokio::test]
    async fn teardown_cancels_pending_redraw() {
        let mut panel = panel();
        panel.data_received(&track()).unwrap();

        panel.schedule_redraw(Duration::from_secs(3600)).await;
        assert!(panel.is_redraw_pending());

        panel.teardown().await;
        assert!(!panel.is_redraw_pending());
        assert_eq!(render_count(&panel), 1);
    }

    #[tokio::test]
    async fn newer_redraw_replaces_pending_one() {
        let mut panel = panel();
        panel.data_received(&track()).unwrap();

        panel.schedule_redraw(Duration::from_secs(3600)).await;
        panel.schedule_redraw(Duration::from_millis(1)).await;
        panel.flush_redraw().await;
        assert_eq!(render_count(&panel), 2);
    }

    #[tokio::test]
    async fn options_restyle_after_delay() {
        let mut panel = panel();
        panel.data_received(&track()).unwrap();
        panel
            .set_options(PanelOptions {
                point_color: "orange".into(),
                ..PanelOptions::default()
            })
            .await;
        panel.flush_redraw().await;

        panel.with_controller(|c| {
            assert_eq!(c.renderer().view().point_color, "orange");
        });
        assert_eq!(render_count(&panel), 2);
    }

    #[tokio::test]
    async fn events_after_teardown_are_ignored() {
        let mut panel = panel();
        panel.teardown().await;
        panel.data_received(&track()).unwrap();
        panel.hover(100.0);

        assert!(panel.is_torn_down());
        panel.with_controller(|c| {
            assert_eq!(c.state(), SyncState::Idle);
            assert!(c.renderer().ops().is_empty());
        });

        panel.schedule_redraw(Duration::from_millis(1)).await;
        assert!(!panel.is_redraw_pending());
    }
}
