use super::options::PanelOptions;
use super::render::{TimeRangeSetter, TrackRenderer};
use super::types::{HoverState, Marker, SeriesData, SyncState};
use crate::track::{
    map_bounds_to_range, nearest_at_or_before, parse_datapoints, truncate_to_recent, Heading,
    LatLngBounds, Position, RawPoint, SampleSeries, TimeRange, TrackError,
};

const LAT_CHANNEL: usize = 0;
const LNG_CHANNEL: usize = 1;
const HEADING_CHANNEL: usize = 2;

/// Keeps a map track and its markers in step with an external time cursor.
///
/// Every handler runs to completion; callers must deliver events one at a
/// time.
pub struct TrackSyncController<R, T> {
    renderer: R,
    time_range: T,
    options: PanelOptions,
    positions: SampleSeries<Position>,
    headings: SampleSeries<Heading>,
    state: SyncState,
    hover: HoverState,
    degraded: bool,
}

impl<R: TrackRenderer, T: TimeRangeSetter> TrackSyncController<R, T> {
    pub fn new(renderer: R, time_range: T, options: PanelOptions) -> Self {
        Self {
            renderer,
            time_range,
            options,
            positions: SampleSeries::empty(),
            headings: SampleSeries::empty(),
            state: SyncState::Idle,
            hover: HoverState::default(),
            degraded: false,
        }
    }

    /// Rebuilds both series from `series` (latitude, longitude, optional
    /// heading) and redraws. Fewer than two channels, or out-of-order input,
    /// leaves an empty track and shows the world view.
    pub fn on_data_received(&mut self, series: &[SeriesData]) -> Result<(), TrackError> {
        self.clear_hover();
        self.state = SyncState::Ready;

        if series.len() < 2 {
            log::info!(
                "Received {} channel(s), need latitude and longitude",
                series.len()
            );
            self.enter_degraded();
            return Ok(());
        }
        if series.len() > 3 {
            log::debug!("Ignoring {} extra channel(s)", series.len() - 3);
        }

        let max = self.options.max_data_points;
        let channel = |index: usize| -> Vec<RawPoint> {
            series
                .get(index)
                .map(|s| parse_datapoints(&s.datapoints))
                .unwrap_or_default()
        };

        // Rows pair by index: cut to the common prefix before keeping the tail.
        let mut lats = channel(LAT_CHANNEL);
        let mut lngs = channel(LNG_CHANNEL);
        let rows = lats.len().min(lngs.len());
        lats.truncate(rows);
        lngs.truncate(rows);
        let lats = truncate_to_recent(lats, max);
        let lngs = truncate_to_recent(lngs, max);
        let headings = truncate_to_recent(channel(HEADING_CHANNEL), max);

        let built = SampleSeries::build_positions(&lats, &lngs).and_then(|positions| {
            let headings = SampleSeries::build_headings(&headings)?;
            Ok((positions, headings))
        });

        match built {
            Ok((positions, headings)) => {
                log::info!(
                    "Track rebuilt with {} positions and {} headings",
                    positions.len(),
                    headings.len()
                );
                self.positions = positions;
                self.headings = headings;
                self.degraded = false;
                self.draw();
                Ok(())
            }
            Err(e) => {
                log::error!("Rejecting data update: {}", e);
                self.enter_degraded();
                Err(e)
            }
        }
    }

    /// Moves the hover marker to the sample at or before the cursor time.
    pub fn on_hover(&mut self, cursor_x: f64) {
        if !cursor_x.is_finite() {
            log::debug!("Ignoring hover at non-finite cursor {}", cursor_x);
            return;
        }
        if self.state == SyncState::Idle || self.positions.is_empty() {
            return;
        }

        let query = cursor_x.floor();
        if self.options.dedupe_hover
            && self.hover.active
            && self.hover.query_timestamp == Some(query)
        {
            return;
        }

        self.hover = HoverState {
            active: true,
            query_timestamp: Some(query),
        };
        self.state = SyncState::Hovering;

        let Some(position) = nearest_at_or_before(&self.positions, query)
            .and_then(|found| self.positions.get(found.index))
            .map(|s| s.value)
        else {
            return;
        };
        let heading = nearest_at_or_before(&self.headings, query)
            .and_then(|found| self.headings.get(found.index))
            .map(|s| s.value);

        self.renderer
            .set_hover_marker(Some(Marker { position, heading }));
    }

    pub fn on_hover_clear(&mut self) {
        self.clear_hover();
        if self.state == SyncState::Hovering {
            self.state = SyncState::Ready;
        }
    }

    /// Requests the time range spanned by the samples inside `bounds`. Nothing
    /// is requested when no sample falls inside.
    pub fn on_box_selection(&mut self, bounds: &LatLngBounds) -> Option<TimeRange> {
        let range = map_bounds_to_range(bounds, &self.positions)?;
        match range.to_utc() {
            Some((from, to)) => log::info!("Box selection covers {} .. {}", from, to),
            None => log::info!("Box selection covers {} .. {} ms", range.from, range.to),
        }
        self.time_range.set_time_range(range);
        Some(range)
    }

    /// Re-emits the track, last-position marker and viewport.
    pub fn redraw(&mut self) {
        if self.state == SyncState::Idle {
            return;
        }
        if self.degraded {
            self.renderer.show_world_view();
        } else {
            self.draw();
        }
    }

    pub fn set_options(&mut self, options: PanelOptions) {
        self.renderer
            .set_style(&options.line_color, &options.point_color);
        self.options = options;
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn positions(&self) -> &SampleSeries<Position> {
        &self.positions
    }

    pub fn headings(&self) -> &SampleSeries<Heading> {
        &self.headings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn time_range_setter(&self) -> &T {
        &self.time_range
    }

    pub fn time_range_setter_mut(&mut self) -> &mut T {
        &mut self.time_range
    }

    fn clear_hover(&mut self) {
        self.hover = HoverState::default();
        self.renderer.set_hover_marker(None);
    }

    fn enter_degraded(&mut self) {
        self.positions = SampleSeries::empty();
        self.headings = SampleSeries::empty();
        self.degraded = true;
        self.renderer.show_world_view();
    }

    fn draw(&mut self) {
        self.renderer
            .set_style(&self.options.line_color, &self.options.point_color);
        self.renderer.render_track(&self.positions.positions());

        let last = self.positions.last().map(|s| Marker {
            position: s.value,
            heading: self.headings.last().map(|h| h.value),
        });
        self.renderer.set_last_position_marker(last);

        if self.options.auto_zoom {
            if let Some(bounds) = LatLngBounds::enclosing(self.positions.iter().map(|s| &s.value))
            {
                self.renderer.set_viewport(bounds);
            }
        }
    }
}
