//! Draft search state and the transitions driven by user input

use crate::airports::{AirportDirectory, AirportRecord};
use crate::config::FormConfig;
use crate::pointer::{ClickTarget, ElementId};
use crate::submission::SubmittedSearch;
use crate::{Adjustment, FlightClass, FlightFormError, PassengerCategory, PassengerCounts, TripType};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Element that wraps the trip, passenger and class dropdowns. Pointer-downs
/// outside of it close whichever dropdown is open.
pub const DEFAULT_DROPDOWN_REGION: &str = "search-options";

/// Dropdowns of the form; at most one is open at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dropdown {
    Trip,
    Passenger,
    Class,
}

/// Which location input an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationField {
    From,
    To,
}

/// Contents of a location input: whatever was typed, or an airport picked
/// from the suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Location {
    Raw(String),
    Resolved(AirportRecord),
}

impl Default for Location {
    fn default() -> Self {
        Location::Raw(String::new())
    }
}

impl Location {
    pub fn is_empty(&self) -> bool {
        matches!(self, Location::Raw(text) if text.is_empty())
    }

    pub fn airport(&self) -> Option<&AirportRecord> {
        match self {
            Location::Resolved(airport) => Some(airport),
            Location::Raw(_) => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Raw(text) => f.write_str(text),
            Location::Resolved(airport) => write!(f, "{} - {}", airport.iata, airport.name),
        }
    }
}

/// The search being edited
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchQuery {
    pub trip_type: TripType,
    pub from_location: Location,
    pub to_location: Location,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub flight_class: FlightClass,
    pub passengers: PassengerCounts,
}

/// Flight search form controller.
///
/// Owns the draft [`SearchQuery`] plus UI-only state (open dropdown, current
/// suggestions) and the latest [`SubmittedSearch`]. Every mutator is total;
/// the only rejected input is a date before the picker's lower bound.
#[derive(Debug, Clone)]
pub struct FlightSearchForm {
    directory: AirportDirectory,
    config: FormConfig,
    dropdown_region: ElementId,
    query: SearchQuery,
    open_dropdown: Option<Dropdown>,
    suggestions: Vec<AirportRecord>,
    submitted: Option<SubmittedSearch>,
}

impl FlightSearchForm {
    pub fn new(directory: AirportDirectory) -> Self {
        Self::with_config(directory, FormConfig::default())
    }

    pub fn with_config(directory: AirportDirectory, config: FormConfig) -> Self {
        Self {
            directory,
            config,
            dropdown_region: ElementId::new(DEFAULT_DROPDOWN_REGION),
            query: SearchQuery::default(),
            open_dropdown: None,
            suggestions: Vec::new(),
            submitted: None,
        }
    }

    /// Use a different element as the dropdown region for outside-click detection
    pub fn with_dropdown_region(mut self, region: ElementId) -> Self {
        self.dropdown_region = region;
        self
    }

    // Accessors

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn trip_type(&self) -> TripType {
        self.query.trip_type
    }

    pub fn flight_class(&self) -> FlightClass {
        self.query.flight_class
    }

    pub fn passengers(&self) -> &PassengerCounts {
        &self.query.passengers
    }

    pub fn location(&self, field: LocationField) -> &Location {
        match field {
            LocationField::From => &self.query.from_location,
            LocationField::To => &self.query.to_location,
        }
    }

    pub fn from_location(&self) -> &Location {
        &self.query.from_location
    }

    pub fn to_location(&self) -> &Location {
        &self.query.to_location
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.query.departure_date
    }

    /// Stored return date, kept even while the trip type hides it
    pub fn return_date(&self) -> Option<NaiveDate> {
        self.query.return_date
    }

    pub fn return_date_visible(&self) -> bool {
        self.query.trip_type.has_return_leg()
    }

    pub fn open_dropdown(&self) -> Option<Dropdown> {
        self.open_dropdown
    }

    pub fn is_open(&self, dropdown: Dropdown) -> bool {
        self.open_dropdown == Some(dropdown)
    }

    pub fn dropdown_region(&self) -> &ElementId {
        &self.dropdown_region
    }

    pub fn suggestions(&self) -> &[AirportRecord] {
        &self.suggestions
    }

    pub fn submitted(&self) -> Option<&SubmittedSearch> {
        self.submitted.as_ref()
    }

    pub fn directory(&self) -> &AirportDirectory {
        &self.directory
    }

    /// First selectable departure date (today, inclusive)
    pub fn min_departure_date(&self) -> NaiveDate {
        self.config.today()
    }

    /// First selectable return date: the departure date, when one is set
    pub fn min_return_date(&self) -> Option<NaiveDate> {
        self.query.departure_date
    }

    // Trip options

    /// Set the trip type. A stored return date survives a switch to one-way or
    /// multi-city; it is only hidden.
    pub fn set_trip_type(&mut self, trip_type: TripType) {
        debug!(from = %self.query.trip_type, to = %trip_type, "Trip type changed");
        self.query.trip_type = trip_type;
    }

    /// Pick a trip type from the trip menu, which closes the menu
    pub fn select_trip_type(&mut self, trip_type: TripType) {
        self.set_trip_type(trip_type);
        self.close_dropdown();
    }

    /// Pick a cabin class; closes the class dropdown
    pub fn set_flight_class(&mut self, flight_class: FlightClass) {
        debug!(from = %self.query.flight_class, to = %flight_class, "Flight class changed");
        self.query.flight_class = flight_class;
        self.close_dropdown();
    }

    pub fn adjust_passengers(&mut self, category: PassengerCategory, adjustment: Adjustment) {
        self.query.passengers.adjust(category, adjustment);
        debug!(
            ?category,
            ?adjustment,
            count = self.query.passengers.get(category),
            "Passenger count adjusted"
        );
    }

    // Dropdowns

    /// Open `dropdown`, or close it if it is already the open one
    pub fn toggle_dropdown(&mut self, dropdown: Dropdown) {
        self.open_dropdown = if self.open_dropdown == Some(dropdown) {
            None
        } else {
            Some(dropdown)
        };
        debug!(open = ?self.open_dropdown, "Dropdown toggled");
    }

    /// Close any open dropdown (passenger panel Cancel/Done, menu selection)
    pub fn close_dropdown(&mut self) {
        if self.open_dropdown.take().is_some() {
            debug!("Dropdown closed");
        }
    }

    /// Pointer-down handler: closes the open dropdown unless `target` lies
    /// inside the dropdown region.
    pub fn close_dropdown_if_outside(&mut self, target: &ClickTarget) {
        if !target.is_within(&self.dropdown_region) {
            self.close_dropdown();
        }
    }

    // Locations

    /// Store typed text in a location field and refresh suggestions: non-empty
    /// text runs the matcher, empty text clears the list.
    pub fn set_location(&mut self, field: LocationField, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.clear_suggestions();
        } else {
            self.fetch_suggestions(&text);
        }
        *self.location_mut(field) = Location::Raw(text);
    }

    pub fn set_from_location(&mut self, text: impl Into<String>) {
        self.set_location(LocationField::From, text);
    }

    pub fn set_to_location(&mut self, text: impl Into<String>) {
        self.set_location(LocationField::To, text);
    }

    /// Replace the current suggestions with matches for `text`
    pub fn fetch_suggestions(&mut self, text: &str) {
        self.suggestions = self
            .directory
            .suggest_with_limit(text, self.config.suggestion_limit);
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    /// Accept a suggestion into a location field and clear the list
    pub fn select_suggestion(&mut self, field: LocationField, airport: AirportRecord) {
        debug!(?field, iata = %airport.iata, "Suggestion selected");
        *self.location_mut(field) = Location::Resolved(airport);
        self.clear_suggestions();
    }

    /// Swap origin and destination as they are, empty or not
    pub fn switch_locations(&mut self) {
        std::mem::swap(&mut self.query.from_location, &mut self.query.to_location);
        debug!("Locations switched");
    }

    fn location_mut(&mut self, field: LocationField) -> &mut Location {
        match field {
            LocationField::From => &mut self.query.from_location,
            LocationField::To => &mut self.query.to_location,
        }
    }

    // Dates

    /// Set or clear the departure date. Dates before today are refused and
    /// leave the field unchanged.
    pub fn set_departure_date(&mut self, date: Option<NaiveDate>) -> Result<(), FlightFormError> {
        if let Some(date) = date {
            let min = self.min_departure_date();
            if date < min {
                warn!(%date, %min, "Departure date before first selectable date");
                return Err(FlightFormError::DateBeforeMinimum { date, min });
            }
        }

        self.query.departure_date = date;
        Ok(())
    }

    /// Set or clear the return date. With a departure date set, earlier dates
    /// are refused and leave the field unchanged.
    pub fn set_return_date(&mut self, date: Option<NaiveDate>) -> Result<(), FlightFormError> {
        if let (Some(date), Some(min)) = (date, self.min_return_date()) {
            if date < min {
                warn!(%date, %min, "Return date before departure date");
                return Err(FlightFormError::DateBeforeMinimum { date, min });
            }
        }

        self.query.return_date = date;
        Ok(())
    }

    // Submission

    /// Snapshot the draft as the latest submission, replacing any earlier one.
    /// Nothing is validated.
    pub fn submit(&mut self) -> &SubmittedSearch {
        let snapshot = SubmittedSearch::new(self.query.clone());
        info!(
            trip_type = %snapshot.query().trip_type,
            from = %snapshot.query().from_location,
            to = %snapshot.query().to_location,
            passengers = snapshot.query().passengers.total(),
            "Flight search submitted"
        );
        self.submitted.insert(snapshot)
    }
}
