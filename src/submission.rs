//! Submitted search snapshot and its summary rendering

use crate::form::SearchQuery;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Copy of the draft taken when the form is submitted. Later edits to the
/// form never reach it; the next submission replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmittedSearch {
    query: SearchQuery,
}

impl SubmittedSearch {
    pub(crate) fn new(query: SearchQuery) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Whether a summary shows the return date (round trips only)
    pub fn shows_return_date(&self) -> bool {
        self.query.trip_type.has_return_leg()
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

impl fmt::Display for SubmittedSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = &self.query;
        let passengers = &query.passengers;

        writeln!(f, "Flight Search Details")?;
        writeln!(f, "Trip Type: {}", query.trip_type)?;
        writeln!(f, "From: {}", query.from_location)?;
        writeln!(f, "To: {}", query.to_location)?;
        writeln!(f, "Departure Date: {}", format_date(query.departure_date))?;
        if self.shows_return_date() {
            writeln!(f, "Return Date: {}", format_date(query.return_date))?;
        }
        writeln!(f, "Flight Class: {}", query.flight_class)?;
        writeln!(f, "Passengers:")?;
        writeln!(f, "  Adults: {}", passengers.adults())?;
        writeln!(f, "  Children: {}", passengers.children())?;
        writeln!(f, "  Infants in Seat: {}", passengers.infants_in_seat())?;
        write!(f, "  Infants on Lap: {}", passengers.infants_on_lap())
    }
}
