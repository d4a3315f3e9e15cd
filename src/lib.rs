//! # Flight Form
//!
//! State and behaviour of a flight search form: trip type, cabin class,
//! passenger counts, origin/destination autosuggest backed by a static airport
//! list, date pickers with minimum bounds, and a submitted-search snapshot.
//! Rendering is left to the caller; everything here is synchronous and in-process.
//!
//! # Example
//! ```rust
//! use flight_form::{AirportDirectory, FlightSearchForm, LocationField, TripType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = AirportDirectory::bundled()?;
//! let mut form = FlightSearchForm::new(directory);
//!
//! form.set_trip_type(TripType::OneWay);
//! form.set_location(LocationField::From, "lax");
//! let first = form.suggestions()[0].clone();
//! form.select_suggestion(LocationField::From, first);
//!
//! let submitted = form.submit();
//! assert_eq!(submitted.query().from_location.to_string(), "LAX - Los Angeles International Airport");
//! assert!(!submitted.shows_return_date());
//! # Ok(())
//! # }
//! ```

pub mod airports;
pub mod config;
pub mod form;
pub mod pointer;
pub mod submission;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// Re-export main types for convenience
pub use airports::{suggest_airports, AirportDirectory, AirportRecord, SUGGESTION_LIMIT};
pub use config::FormConfig;
pub use form::{Dropdown, FlightSearchForm, Location, LocationField, SearchQuery};
pub use pointer::{ClickTarget, Document, ElementId, ListenerGuard, MountedForm};
pub use submission::SubmittedSearch;

/// Error types for the flight form library
#[derive(Error, Debug)]
pub enum FlightFormError {
    #[error("Failed to read airport data from {path}: {source}")]
    AirportDataIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Airport data is malformed: {0}")]
    AirportDataJson(#[from] serde_json::Error),

    #[error("Airport data contains no records")]
    EmptyAirportList,

    #[error("None of the {0} airport records has an IATA code or a name")]
    UnusableAirportList(usize),

    #[error("Parsing failed: {0}")]
    ParseError(String),

    #[error("Invalid date format: {0}")]
    DateParseError(String),

    #[error("Date {date} is earlier than the first selectable date {min}")]
    DateBeforeMinimum { date: NaiveDate, min: NaiveDate },
}

/// Parse a `YYYY-MM-DD` date as entered in a date picker. Empty input means no date.
pub fn parse_date(value: &str) -> Result<Option<NaiveDate>, FlightFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| FlightFormError::DateParseError(format!("{}: {}", value, e)))
}

/// Lower-cases a label and drops separators so "Round trip", "round-trip" and
/// "round_trip" all compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Trip type enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    #[default]
    RoundTrip,
    OneWay,
    MultiCity,
}

impl TripType {
    pub const ALL: [TripType; 3] = [TripType::RoundTrip, TripType::OneWay, TripType::MultiCity];

    /// Whether the return date is shown and relevant for this trip type.
    pub fn has_return_leg(self) -> bool {
        matches!(self, TripType::RoundTrip)
    }

    pub fn label(self) -> &'static str {
        match self {
            TripType::RoundTrip => "Round trip",
            TripType::OneWay => "One way",
            TripType::MultiCity => "Multi-city",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TripType {
    type Err = FlightFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "roundtrip" => Ok(TripType::RoundTrip),
            "oneway" => Ok(TripType::OneWay),
            "multicity" => Ok(TripType::MultiCity),
            _ => Err(FlightFormError::ParseError(format!("Invalid trip type: {}", s))),
        }
    }
}

/// Cabin class enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl FlightClass {
    pub const ALL: [FlightClass; 4] = [
        FlightClass::Economy,
        FlightClass::PremiumEconomy,
        FlightClass::Business,
        FlightClass::First,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FlightClass::Economy => "Economy",
            FlightClass::PremiumEconomy => "Premium economy",
            FlightClass::Business => "Business",
            FlightClass::First => "First",
        }
    }
}

impl fmt::Display for FlightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FlightClass {
    type Err = FlightFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "economy" => Ok(FlightClass::Economy),
            "premiumeconomy" => Ok(FlightClass::PremiumEconomy),
            "business" => Ok(FlightClass::Business),
            "first" => Ok(FlightClass::First),
            _ => Err(FlightFormError::ParseError(format!("Invalid flight class: {}", s))),
        }
    }
}

/// Passenger category adjusted by the +/- buttons of the passenger dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassengerCategory {
    Adults,
    Children,
    InfantsInSeat,
    InfantsOnLap,
}

impl PassengerCategory {
    /// Lowest count the category may reach.
    pub fn floor(self) -> u32 {
        match self {
            PassengerCategory::Adults => 1,
            _ => 0,
        }
    }
}

impl FromStr for PassengerCategory {
    type Err = FlightFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "adults" | "adult" => Ok(PassengerCategory::Adults),
            "children" | "child" => Ok(PassengerCategory::Children),
            "infantsseat" | "infantsinseat" => Ok(PassengerCategory::InfantsInSeat),
            "infantslap" | "infantsonlap" => Ok(PassengerCategory::InfantsOnLap),
            _ => Err(FlightFormError::ParseError(format!("Invalid passenger category: {}", s))),
        }
    }
}

/// Direction of a passenger count change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Increment,
    Decrement,
}

impl FromStr for Adjustment {
    type Err = FlightFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "increment" | "inc" | "+" => Ok(Adjustment::Increment),
            "decrement" | "dec" => Ok(Adjustment::Decrement),
            _ => Err(FlightFormError::ParseError(format!("Invalid adjustment: {}", s))),
        }
    }
}

/// Passenger configuration.
///
/// Counts only change through [`PassengerCounts::adjust`], which keeps adults at
/// one or more and every other category at zero or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassengerCounts {
    adults: u32,
    children: u32,
    infants_in_seat: u32,
    infants_on_lap: u32,
}

impl Default for PassengerCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants_in_seat: 0,
            infants_on_lap: 0,
        }
    }
}

impl PassengerCounts {
    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn infants_in_seat(&self) -> u32 {
        self.infants_in_seat
    }

    pub fn infants_on_lap(&self) -> u32 {
        self.infants_on_lap
    }

    pub fn get(&self, category: PassengerCategory) -> u32 {
        match category {
            PassengerCategory::Adults => self.adults,
            PassengerCategory::Children => self.children,
            PassengerCategory::InfantsInSeat => self.infants_in_seat,
            PassengerCategory::InfantsOnLap => self.infants_on_lap,
        }
    }

    /// Sum shown on the passenger dropdown button.
    pub fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.children)
            .saturating_add(self.infants_in_seat)
            .saturating_add(self.infants_on_lap)
    }

    /// Increment or decrement one category. Decrements saturate at the
    /// category floor; increments have no cap.
    pub fn adjust(&mut self, category: PassengerCategory, adjustment: Adjustment) {
        let floor = category.floor();
        let count = match category {
            PassengerCategory::Adults => &mut self.adults,
            PassengerCategory::Children => &mut self.children,
            PassengerCategory::InfantsInSeat => &mut self.infants_in_seat,
            PassengerCategory::InfantsOnLap => &mut self.infants_on_lap,
        };

        *count = match adjustment {
            Adjustment::Increment => count.saturating_add(1),
            Adjustment::Decrement => count.saturating_sub(1).max(floor),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_type_parsing() {
        assert_eq!("round-trip".parse::<TripType>().unwrap(), TripType::RoundTrip);
        assert_eq!("Round trip".parse::<TripType>().unwrap(), TripType::RoundTrip);
        assert_eq!("one-way".parse::<TripType>().unwrap(), TripType::OneWay);
        assert_eq!("One way".parse::<TripType>().unwrap(), TripType::OneWay);
        assert_eq!("multi-city".parse::<TripType>().unwrap(), TripType::MultiCity);
        assert_eq!("Multi-city".parse::<TripType>().unwrap(), TripType::MultiCity);
        assert!("invalid".parse::<TripType>().is_err());
    }

    #[test]
    fn test_trip_type_labels_round_trip_through_parse() {
        for trip in TripType::ALL {
            assert_eq!(trip.to_string().parse::<TripType>().unwrap(), trip);
        }
        assert_eq!(TripType::OneWay.to_string(), "One way");
    }

    #[test]
    fn test_only_round_trip_has_return_leg() {
        assert!(TripType::RoundTrip.has_return_leg());
        assert!(!TripType::OneWay.has_return_leg());
        assert!(!TripType::MultiCity.has_return_leg());
    }

    #[test]
    fn test_flight_class_parsing() {
        assert_eq!("economy".parse::<FlightClass>().unwrap(), FlightClass::Economy);
        assert_eq!("premium-economy".parse::<FlightClass>().unwrap(), FlightClass::PremiumEconomy);
        assert_eq!("premium_economy".parse::<FlightClass>().unwrap(), FlightClass::PremiumEconomy);
        assert_eq!("Premium economy".parse::<FlightClass>().unwrap(), FlightClass::PremiumEconomy);
        assert_eq!("business".parse::<FlightClass>().unwrap(), FlightClass::Business);
        assert_eq!("First".parse::<FlightClass>().unwrap(), FlightClass::First);
        assert!("invalid".parse::<FlightClass>().is_err());
    }

    #[test]
    fn test_passenger_category_parsing() {
        assert_eq!("adults".parse::<PassengerCategory>().unwrap(), PassengerCategory::Adults);
        assert_eq!("infantsSeat".parse::<PassengerCategory>().unwrap(), PassengerCategory::InfantsInSeat);
        assert_eq!("infants-on-lap".parse::<PassengerCategory>().unwrap(), PassengerCategory::InfantsOnLap);
        assert!("pets".parse::<PassengerCategory>().is_err());
        assert_eq!("decrement".parse::<Adjustment>().unwrap(), Adjustment::Decrement);
        assert!("sideways".parse::<Adjustment>().is_err());
    }

    #[test]
    fn test_passengers_default() {
        let passengers = PassengerCounts::default();
        assert_eq!(passengers.adults(), 1);
        assert_eq!(passengers.children(), 0);
        assert_eq!(passengers.infants_in_seat(), 0);
        assert_eq!(passengers.infants_on_lap(), 0);
        assert_eq!(passengers.total(), 1);
    }

    #[test]
    fn test_passenger_decrements_saturate_at_floor() {
        let mut passengers = PassengerCounts::default();
        let categories = [
            PassengerCategory::Adults,
            PassengerCategory::Children,
            PassengerCategory::InfantsInSeat,
            PassengerCategory::InfantsOnLap,
        ];

        for category in categories {
            for _ in 0..3 {
                passengers.adjust(category, Adjustment::Increment);
            }
            for _ in 0..10 {
                passengers.adjust(category, Adjustment::Decrement);
                assert!(passengers.get(category) >= category.floor());
            }
            assert_eq!(passengers.get(category), category.floor());
        }
    }

    #[test]
    fn test_passenger_increment_has_no_cap() {
        let mut passengers = PassengerCounts::default();
        for _ in 0..20 {
            passengers.adjust(PassengerCategory::Children, Adjustment::Increment);
        }
        assert_eq!(passengers.children(), 20);
        assert_eq!(passengers.total(), 21);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("").unwrap(), None);
        assert_eq!(parse_date("  ").unwrap(), None);
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert!(matches!(parse_date("06/01/2025"), Err(FlightFormError::DateParseError(_))));
    }
}
