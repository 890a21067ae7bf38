use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::panel::{BoxSelectResponse, PanelStatus, TimeRangeResponse};
use crate::sync::{
    CursorPos, DataPayload, HoverEvent, HoverState, Marker, PanelOptions, SeriesData, SyncState,
    ViewState,
};
use crate::track::{LatLngBounds, Position};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::panel::data,
        super::api::panel::hover,
        super::api::panel::hover_clear,
        super::api::panel::box_select,
        super::api::panel::view,
        super::api::panel::status,
        super::api::panel::time_range,
        super::api::panel::options,
    ),
    components(
        schemas(
            DataPayload,
            SeriesData,
            HoverEvent,
            CursorPos,
            LatLngBounds,
            Position,
            Marker,
            ViewState,
            PanelOptions,
            BoxSelectResponse,
            PanelStatus,
            SyncState,
            HoverState,
            TimeRangeResponse,
            ErrorResponse,
        )
    ),
    info(
        title = "Trackmap Panel API",
        description = "Host events in, map view out",
        version = "0.1.0"
    ),
    tags(
        (name = "panel", description = "Track and cursor synchronisation")
    )
)]
pub struct ApiDoc;
