//! Session state and the destination-selection state machine.
//!
//! The session is the only writer of the map layers. Every redraw is a
//! clear-then-redraw of the affected layer so markers never pile up.
//!
//! Route computations and location lookups are asynchronous and are not
//! cancelled; instead each request carries a sequence number in its
//! [`RouteTicket`] or [`LocationTicket`] and only the latest one may complete.

use shared::{Coordinate, Metrics};

use crate::config::TrackerConfig;
use crate::error::SessionError;
use crate::instructions::derive_instructions;
use crate::location::LocationFix;
use crate::metrics::daily_progress_percent;
use crate::resolver::ResolvedRoute;
use crate::surface::{Layer, MapSurface, MarkerStyle, PathStyle};

/// Handle for one in-flight route computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTicket {
    pub seq: u64,
    pub start: Coordinate,
    pub end: Coordinate,
}

/// Handle for one in-flight location lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationTicket {
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedRoute {
    pub destination: Coordinate,
    pub route: ResolvedRoute,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum RouteState {
    Empty,
    Pending(RouteTicket),
    Displayed(DisplayedRoute),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoLocation,
    LocationKnown,
    SelectingDestination,
    /// A route request is in flight.
    Resolving,
    RouteDisplayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Locating,
    ReadyToPick,
    Selecting,
    Resolving,
    RouteShown,
}

impl Status {
    pub fn message(self) -> &'static str {
        match self {
            Status::Locating => "Detecting your location...",
            Status::ReadyToPick => "Press the blue button to choose a destination",
            Status::Selecting => "🗺️ Click on the map to choose your destination",
            Status::Resolving => "Calculating route...",
            Status::RouteShown => "Route ready, follow the highlighted path",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    zoom: u8,
    fit_padding_px: u32,
    location: Option<LocationFix>,
    selecting: bool,
    route: RouteState,
    last_seq: u64,
    last_location_seq: u64,
}

impl Session {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            zoom: config.zoom,
            fit_padding_px: config.fit_padding_px,
            location: None,
            selecting: false,
            route: RouteState::Empty,
            last_seq: 0,
            last_location_seq: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.location.is_none() {
            return Phase::NoLocation;
        }
        if self.selecting {
            return Phase::SelectingDestination;
        }
        match self.route {
            RouteState::Empty => Phase::LocationKnown,
            RouteState::Pending(_) => Phase::Resolving,
            RouteState::Displayed(_) => Phase::RouteDisplayed,
        }
    }

    /// Fallback and device fixes produce the same status.
    pub fn status(&self) -> Status {
        match self.phase() {
            Phase::NoLocation => Status::Locating,
            Phase::LocationKnown => Status::ReadyToPick,
            Phase::SelectingDestination => Status::Selecting,
            Phase::Resolving => Status::Resolving,
            Phase::RouteDisplayed => Status::RouteShown,
        }
    }

    pub fn location(&self) -> Option<LocationFix> {
        self.location
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.displayed().map(|d| d.destination)
    }

    pub fn route(&self) -> Option<&ResolvedRoute> {
        self.displayed().map(|d| &d.route)
    }

    /// Metrics of the route on screen, zero when there is none.
    pub fn metrics(&self) -> Metrics {
        self.route().map(|r| r.metrics).unwrap_or_default()
    }

    pub fn instructions(&self) -> &[String] {
        self.displayed()
            .map(|d| d.instructions.as_slice())
            .unwrap_or_default()
    }

    /// Today's progress. Each new route replaces the previous one.
    pub fn daily_progress_percent(&self, goal_km: f64) -> f64 {
        daily_progress_percent(self.metrics().distance_km, goal_km)
    }

    pub fn pending_ticket(&self) -> Option<RouteTicket> {
        match self.route {
            RouteState::Pending(ticket) => Some(ticket),
            _ => None,
        }
    }

    fn displayed(&self) -> Option<&DisplayedRoute> {
        match &self.route {
            RouteState::Displayed(displayed) => Some(displayed),
            _ => None,
        }
    }

    /// Destination of the route on screen or in flight.
    fn target(&self) -> Option<Coordinate> {
        match &self.route {
            RouteState::Empty => None,
            RouteState::Pending(ticket) => Some(ticket.end),
            RouteState::Displayed(displayed) => Some(displayed.destination),
        }
    }

    /// Starts a location lookup. Only the fix delivered with the most recent
    /// ticket is applied by [`Session::update_location`].
    pub fn begin_location_request(&mut self) -> LocationTicket {
        self.last_location_seq += 1;
        LocationTicket {
            seq: self.last_location_seq,
        }
    }

    /// Records a new position and recenters the map on it.
    ///
    /// Fixes answering a superseded lookup are dropped. When a destination
    /// exists the route is recomputed from the new position; the returned
    /// ticket must then be resolved.
    pub fn update_location<S>(
        &mut self,
        ticket: LocationTicket,
        fix: LocationFix,
        surface: &mut S,
    ) -> Option<RouteTicket>
    where
        S: MapSurface + ?Sized,
    {
        if ticket.seq != self.last_location_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.last_location_seq,
                "stale location fix dropped"
            );
            return None;
        }
        tracing::info!(
            lat = fix.coordinate.lat,
            lon = fix.coordinate.lon,
            source = ?fix.source,
            "location updated"
        );
        self.location = Some(fix);
        surface.set_view(fix.coordinate, self.zoom);

        match self.target() {
            Some(destination) => Some(self.begin_route(fix.coordinate, destination, surface)),
            None => {
                self.redraw_markers(None, surface);
                None
            }
        }
    }

    /// Enters selection mode, provided the location is known.
    pub fn request_selection(&mut self) -> Result<(), SessionError> {
        if self.location.is_none() {
            tracing::warn!("destination selection requested before location is known");
            return Err(SessionError::LocationUnknown);
        }
        self.selecting = true;
        tracing::debug!("selection mode on");
        Ok(())
    }

    /// Handles a map click; ignored unless selection mode is on.
    pub fn on_map_click<S>(&mut self, coord: Coordinate, surface: &mut S) -> Option<RouteTicket>
    where
        S: MapSurface + ?Sized,
    {
        if !self.selecting {
            return None;
        }
        self.selecting = false;

        if !(coord.lat.is_finite() && coord.lon.is_finite()) {
            tracing::warn!(?coord, "ignoring click with non-finite coordinate");
            return None;
        }
        let start = self.location?.coordinate;
        Some(self.begin_route(start, coord.wrapped(), surface))
    }

    fn begin_route<S>(&mut self, start: Coordinate, end: Coordinate, surface: &mut S) -> RouteTicket
    where
        S: MapSurface + ?Sized,
    {
        self.last_seq += 1;
        let ticket = RouteTicket {
            seq: self.last_seq,
            start,
            end,
        };
        tracing::debug!(seq = ticket.seq, ?start, ?end, "route requested");

        self.route = RouteState::Pending(ticket);
        surface.clear_layer(Layer::Route);
        self.redraw_markers(Some(end), surface);
        ticket
    }

    /// Shows `resolved` if `ticket` is still the latest request.
    ///
    /// Returns `false` when the result was discarded.
    pub fn complete_route<S>(
        &mut self,
        ticket: RouteTicket,
        resolved: ResolvedRoute,
        surface: &mut S,
    ) -> bool
    where
        S: MapSurface + ?Sized,
    {
        if self.pending_ticket() != Some(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.last_seq,
                "discarding stale route"
            );
            return false;
        }

        surface.clear_layer(Layer::Route);
        let handle = surface.draw_path(&resolved.path, PathStyle::from(resolved.kind));
        surface.fit_bounds(handle, self.fit_padding_px);

        self.route = RouteState::Displayed(DisplayedRoute {
            destination: ticket.end,
            instructions: derive_instructions(&resolved.metrics),
            route: resolved,
        });
        true
    }

    /// Drops the route and destination, leaving only the user marker.
    pub fn reset<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        // Bumping the sequence invalidates any request still in flight.
        self.last_seq += 1;
        self.route = RouteState::Empty;
        self.selecting = false;

        surface.clear_layer(Layer::Route);
        self.redraw_markers(None, surface);
        if let Some(fix) = self.location {
            surface.set_view(fix.coordinate, self.zoom);
        }
        tracing::debug!("route cleared");
    }

    fn redraw_markers<S>(&self, destination: Option<Coordinate>, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        surface.clear_layer(Layer::Markers);
        if let Some(fix) = self.location {
            surface.add_marker(fix.coordinate, MarkerStyle::User);
        }
        if let Some(destination) = destination {
            surface.add_marker(destination, MarkerStyle::Destination);
        }
    }
}
