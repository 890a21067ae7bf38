use serde::Serialize;

use super::parser::{Script, Step};
use crate::panel::Panel;
use crate::sync::{
    PanelOptions, RecordingRenderer, RecordingTimeRange, RenderOp, TrackSyncController,
};
use crate::track::TimeRange;

/// What one replayed step asked of the collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: &'static str,
    pub ops: Vec<RenderOp>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub time_ranges: Vec<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct Runner {
    pub script: Script,
    pub options: PanelOptions,
}

impl Runner {
    pub fn new(script: Script, options: PanelOptions) -> Self {
        Self { script, options }
    }

    /// Replays every step in order. Rejected data is reported, not fatal.
    pub async fn run(self) -> Vec<StepReport> {
        let mut panel = Panel::new(TrackSyncController::new(
            RecordingRenderer::new(),
            RecordingTimeRange::new(),
            self.options,
        ));
        let mut reports = Vec::with_capacity(self.script.steps.len());

        for (index, step) in self.script.steps.into_iter().enumerate() {
            let name = step.name();
            let mut error = None;

            match step {
                Step::Data(payload) => {
                    if let Err(e) = panel.data_received(&payload.series) {
                        error = Some(e.to_string());
                    }
                }
                Step::Hover(expr) => {
                    let start =
                        panel.with_controller(|c| c.positions().first().map(|s| s.timestamp));
                    match expr.resolve(start) {
                        Some(x) => panel.hover(x),
                        None => {
                            log::warn!("Step {}: relative hover without a track", index);
                            error = Some("relative hover time needs a track".into());
                        }
                    }
                }
                Step::Clear => panel.hover_clear(),
                Step::BoxSelect(bounds) => {
                    panel.box_select(&bounds);
                }
                Step::Options(options) => {
                    panel.set_options(options).await;
                    panel.flush_redraw().await;
                }
                Step::Teardown => panel.teardown().await,
            }

            let (ops, time_ranges) = panel.with_controller(|c| {
                (
                    c.renderer_mut().take_ops(),
                    c.time_range_setter_mut().take_requests(),
                )
            });

            reports.push(StepReport {
                index,
                step: name,
                ops,
                time_ranges,
                error,
            });
        }

        reports
    }
}
