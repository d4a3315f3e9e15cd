//! Static airport reference data and the autosuggest matcher
//!
//! The directory is loaded once at startup, either from the list bundled into the
//! binary or from a JSON file in the `airports-json` layout, and is read-only
//! afterwards. Cloning an [`AirportDirectory`] shares the same records.

use crate::FlightFormError;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Maximum number of suggestions offered for one input.
pub const SUGGESTION_LIMIT: usize = 5;

const BUNDLED_AIRPORTS: &str = include_str!("airports.json");

/// One airport of the reference list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AirportRecord {
    #[serde(deserialize_with = "null_as_empty")]
    pub iata: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub country: String,
}

// Public airport datasets leave `iata` or `city` null for small fields. The key
// itself must still be present.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl AirportRecord {
    pub fn new(
        iata: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            iata: iata.into(),
            name: name.into(),
            city: city.into(),
            country: country.into(),
        }
    }

    /// Text written into a location field once the airport is chosen: `LAX - Los Angeles Intl`
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.iata, self.name)
    }

    /// Line rendered in the suggestion list: `LAX - Los Angeles Intl (Los Angeles, US)`
    pub fn suggestion_label(&self) -> String {
        format!("{} - {} ({}, {})", self.iata, self.name, self.city, self.country)
    }

    /// `needle` must already be trimmed and lower-cased.
    fn matches(&self, needle: &str) -> bool {
        self.iata.to_lowercase().starts_with(needle)
            || self.name.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
    }
}

/// Accepted file layouts: `{"airports": [...]}` as shipped by `airports-json`, or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum AirportData {
    Wrapped { airports: Vec<AirportRecord> },
    Bare(Vec<AirportRecord>),
}

impl From<AirportData> for Vec<AirportRecord> {
    fn from(data: AirportData) -> Self {
        match data {
            AirportData::Wrapped { airports } => airports,
            AirportData::Bare(airports) => airports,
        }
    }
}

/// Match free text against an airport list.
///
/// A record matches when its IATA code starts with the input, or its name or
/// city contains it, all compared case-insensitively after trimming the input.
/// Matches keep the order of `airports` and are cut off after `limit`. Blank
/// input returns nothing without scanning.
#[instrument(level = "debug", skip(airports), fields(candidates = airports.len()))]
pub fn suggest_airports(input: &str, airports: &[AirportRecord], limit: usize) -> Vec<AirportRecord> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let matches: Vec<AirportRecord> = airports
        .iter()
        .filter(|airport| airport.matches(&needle))
        .take(limit)
        .cloned()
        .collect();

    debug!(found = matches.len(), "Airport suggestions computed");
    matches
}

/// Immutable, shareable airport reference list
#[derive(Debug, Clone)]
pub struct AirportDirectory {
    airports: Arc<[AirportRecord]>,
}

impl AirportDirectory {
    /// Build a directory from records. An empty list, or one where no record
    /// carries an IATA code or a name, is rejected: every lookup would come
    /// back empty and look like "no match".
    pub fn from_records(records: Vec<AirportRecord>) -> Result<Self, FlightFormError> {
        if records.is_empty() {
            return Err(FlightFormError::EmptyAirportList);
        }
        if records.iter().all(|a| a.iata.is_empty() && a.name.is_empty()) {
            return Err(FlightFormError::UnusableAirportList(records.len()));
        }

        Ok(Self {
            airports: records.into(),
        })
    }

    /// Parse airport JSON in either accepted layout
    pub fn from_json(json: &str) -> Result<Self, FlightFormError> {
        let data: AirportData = serde_json::from_str(json)?;
        let directory = Self::from_records(data.into())?;
        debug!(airports = directory.len(), "Parsed airport data");
        Ok(directory)
    }

    /// Load airport JSON from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlightFormError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FlightFormError::AirportDataIo {
            path: path.to_path_buf(),
            source,
        })?;

        let directory = Self::from_json(&json)?;
        info!(path = %path.display(), airports = directory.len(), "Loaded airport directory");
        Ok(directory)
    }

    /// The airport list compiled into the crate
    pub fn bundled() -> Result<Self, FlightFormError> {
        let directory = Self::from_json(BUNDLED_AIRPORTS)?;
        info!(airports = directory.len(), "Loaded bundled airport directory");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn records(&self) -> &[AirportRecord] {
        &self.airports
    }

    /// Find an airport by exact IATA code (case-insensitive)
    pub fn find_by_iata(&self, iata: &str) -> Option<&AirportRecord> {
        self.airports.iter().find(|a| a.iata.eq_ignore_ascii_case(iata))
    }

    /// Suggestions for `input`, capped at [`SUGGESTION_LIMIT`]
    pub fn suggest(&self, input: &str) -> Vec<AirportRecord> {
        self.suggest_with_limit(input, SUGGESTION_LIMIT)
    }

    pub fn suggest_with_limit(&self, input: &str, limit: usize) -> Vec<AirportRecord> {
        suggest_airports(input, &self.airports, limit)
    }
}
