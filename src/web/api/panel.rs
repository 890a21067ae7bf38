use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::sync::{DataPayload, HoverEvent, HoverState, PanelOptions, SyncState, ViewState};
use crate::track::{LatLngBounds, TimeRange};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimeRangeResponse {
    pub from: f64,
    pub to: f64,
    pub from_utc: Option<DateTime<Utc>>,
    pub to_utc: Option<DateTime<Utc>>,
}

impl From<TimeRange> for TimeRangeResponse {
    fn from(range: TimeRange) -> Self {
        let utc = range.to_utc();
        TimeRangeResponse {
            from: range.from,
            to: range.to,
            from_utc: utc.map(|(from, _)| from),
            to_utc: utc.map(|(_, to)| to),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PanelStatus {
    pub state: SyncState,
    pub hover: HoverState,
    pub positions: usize,
    pub headings: usize,
    pub torn_down: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoxSelectResponse {
    /// Absent when the box encloses no sample.
    pub range: Option<TimeRangeResponse>,
}

#[utoipa::path(
    post,
    path = "/api/panel/data",
    request_body = DataPayload,
    responses(
        (status = 200, description = "Track rebuilt", body = ViewState),
        (status = 400, description = "Samples out of order", body = ErrorResponse),
        (status = 410, description = "Panel torn down", body = ErrorResponse)
    ),
    tag = "panel"
)]
pub async fn data(
    State(state): State<AppState>,
    Json(payload): Json<DataPayload>,
) -> ApiResult<Json<ViewState>> {
    let mut panel = state.panel.lock().await;
    if panel.is_torn_down() {
        return Err(ApiError::Gone);
    }
    panel.data_received(&payload.series)?;
    Ok(Json(panel.with_controller(|c| c.renderer().view().clone())))
}

#[utoipa::path(
    post,
    path = "/api/panel/hover",
    request_body = HoverEvent,
    responses(
        (status = 200, description = "Hover marker updated", body = ViewState),
        (status = 410, description = "Panel torn down", body = ErrorResponse)
    ),
    tag = "panel"
)]
pub async fn hover(
    State(state): State<AppState>,
    Json(event): Json<HoverEvent>,
) -> ApiResult<Json<ViewState>> {
    let mut panel = state.panel.lock().await;
    if panel.is_torn_down() {
        return Err(ApiError::Gone);
    }
    panel.hover(event.pos.x);
    Ok(Json(panel.with_controller(|c| c.renderer().view().clone())))
}

#[utoipa::path(
    post,
    path = "/api/panel/hover/clear",
    responses(
        (status = 200, description = "Hover marker hidden", body = ViewState),
        (status = 410, description = "Panel torn down", body = ErrorResponse)
    ),
    tag = "panel"
)]
pub async fn hover_clear(State(state): State<AppState>) -> ApiResult<Json<ViewState>> {
    let mut panel = state.panel.lock().await;
    if panel.is_torn_down() {
        return Err(ApiError::Gone);
    }
    panel.hover_clear();
    Ok(Json(panel.with_controller(|c| c.renderer().view().clone())))
}

#[utoipa::path(
    post,
    path = "/api/panel/box-select",
    request_body = LatLngBounds,
    responses(
        (status = 200, description = "Time range enclosed by the box", body = BoxSelectResponse),
        (status = 410, description = "Panel torn down", body = ErrorResponse)
    ),
    tag = "panel"
)]
pub async fn box_select(
    State(state): State<AppState>,
    Json(bounds): Json<LatLngBounds>,
) -> ApiResult<Json<BoxSelectResponse>> {
    let mut panel = state.panel.lock().await;
    if panel.is_torn_down() {
        return Err(ApiError::Gone);
    }
    let range = panel.box_select(&bounds).map(TimeRangeResponse::from);
    Ok(Json(BoxSelectResponse { range }))
}

#[utoipa::path(
    get,
    path = "/api/panel/view",
    responses(
        (status = 200, description = "Current map view", body = ViewState)
    ),
    tag = "panel"
)]
pub async fn view(State(state): State<AppState>) -> ApiResult<Json<ViewState>> {
    let panel = state.panel.lock().await;
    Ok(Json(panel.with_controller(|c| c.renderer().view().clone())))
}

#[utoipa::path(
    get,
    path = "/api/panel/status",
    responses(
        (status = 200, description = "Controller state and series sizes", body = PanelStatus)
    ),
    tag = "panel"
)]
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<PanelStatus>> {
    let panel = state.panel.lock().await;
    let torn_down = panel.is_torn_down();
    Ok(Json(panel.with_controller(|c| PanelStatus {
        state: c.state(),
        hover: c.hover(),
        positions: c.positions().len(),
        headings: c.headings().len(),
        torn_down,
    })))
}

#[utoipa::path(
    get,
    path = "/api/panel/time-range",
    responses(
        (status = 200, description = "Last requested time range", body = Option<TimeRangeResponse>)
    ),
    tag = "panel"
)]
pub async fn time_range(
    State(state): State<AppState>,
) -> ApiResult<Json<Option<TimeRangeResponse>>> {
    let panel = state.panel.lock().await;
    let last = panel.with_controller(|c| c.time_range_setter().last());
    Ok(Json(last.map(TimeRangeResponse::from)))
}

#[utoipa::path(
    put,
    path = "/api/panel/options",
    request_body = PanelOptions,
    responses(
        (status = 200, description = "Options applied, redraw scheduled", body = PanelOptions),
        (status = 410, description = "Panel torn down", body = ErrorResponse)
    ),
    tag = "panel"
)]
pub async fn options(
    State(state): State<AppState>,
    Json(options): Json<PanelOptions>,
) -> ApiResult<Json<PanelOptions>> {
    let mut panel = state.panel.lock().await;
    if panel.is_torn_down() {
        return Err(ApiError::Gone);
    }
    panel.set_options(options).await;
    Ok(Json(panel.with_controller(|c| c.options().clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sync::{CursorPos, SeriesData};
    use crate::track::Position;

    fn payload() -> DataPayload {
        DataPayload {
            series: vec![
                SeriesData::from_pairs(
                    "lat",
                    &[(1.0, 1_700_000_000_000.0), (2.0, 1_700_000_060_000.0)],
                ),
                SeriesData::from_pairs(
                    "lon",
                    &[(10.0, 1_700_000_000_000.0), (20.0, 1_700_000_060_000.0)],
                ),
            ],
        }
    }

    #[tokio::test]
    async fn data_then_hover() {
        let state = AppState::new(&Config::default());

        let Json(view) = data(State(state.clone()), Json(payload())).await.unwrap();
        assert_eq!(view.track.len(), 2);

        let event = HoverEvent {
            pos: CursorPos {
                x: 1_700_000_030_000.0,
            },
        };
        let Json(view) = hover(State(state.clone()), Json(event)).await.unwrap();
        assert_eq!(view.hover.map(|m| m.position), Some(Position::new(1.0, 10.0)));

        let Json(view) = hover_clear(State(state.clone())).await.unwrap();
        assert_eq!(view.hover, None);

        let Json(status) = status(State(state)).await.unwrap();
        assert_eq!(status.state, SyncState::Ready);
        assert_eq!(status.positions, 2);
        assert!(!status.hover.active);
    }

    #[tokio::test]
    async fn box_select_reports_range() {
        let state = AppState::new(&Config::default());
        data(State(state.clone()), Json(payload())).await.unwrap();

        let Json(response) = box_select(
            State(state.clone()),
            Json(LatLngBounds::new(0.0, 0.0, 5.0, 50.0)),
        )
        .await
        .unwrap();
        let range = response.range.unwrap();
        assert_eq!(range.from, 1_700_000_000_000.0);
        assert_eq!(range.to, 1_700_000_060_000.0);
        assert_eq!(
            range.to_utc.map(|t| t.timestamp_millis()),
            Some(1_700_000_060_000)
        );

        let Json(last) = time_range(State(state)).await.unwrap();
        assert_eq!(last.map(|r| r.from), Some(1_700_000_000_000.0));
    }

    #[tokio::test]
    async fn repeated_hovers_keep_no_event_log() {
        let state = AppState::new(&Config::default());
        data(State(state.clone()), Json(payload())).await.unwrap();
        for i in 0..1_000 {
            let event = HoverEvent {
                pos: CursorPos {
                    x: 1_700_000_000_000.0 + i as f64,
                },
            };
            hover(State(state.clone()), Json(event)).await.unwrap();
        }

        let panel = state.panel.lock().await;
        let logged = panel.with_controller(|c| c.renderer().ops().len());
        assert_eq!(logged, 0);
    }

    #[tokio::test]
    async fn out_of_order_data_is_bad_request() {
        let state = AppState::new(&Config::default());
        let mut body = payload();
        body.series[0].datapoints.reverse();

        let err = data(State(state), Json(body)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn torn_down_panel_is_gone() {
        let state = AppState::new(&Config::default());
        state.panel.lock().await.teardown().await;

        let err = data(State(state), Json(payload())).await.unwrap_err();
        assert!(matches!(err, ApiError::Gone));
    }
}
