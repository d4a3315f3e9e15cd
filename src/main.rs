//! CLI interface for flight-form

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flight_form::{
    parse_date, Adjustment, AirportDirectory, FlightClass, FlightSearchForm, FormConfig,
    LocationField, PassengerCategory, TripType,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "flight-form")]
#[command(about = "Flight search form with airport autosuggest")]
#[command(version)]
pub struct Cli {
    /// Airport data file ({"airports": [...]} or a bare array); defaults to the bundled list
    #[arg(long, global = true)]
    pub airports: Option<PathBuf>,
    /// Write JSON logs to daily files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List airport suggestions for a partial code, name or city
    Suggest {
        /// Text as typed into a location field
        query: String,
        /// Maximum number of suggestions
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Fill in the search form and print the submitted search
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Origin text
    #[arg(short, long, default_value = "")]
    pub from: String,
    /// Destination text
    #[arg(short, long, default_value = "")]
    pub to: String,
    /// Replace origin and destination with their first suggestion
    #[arg(long)]
    pub resolve: bool,
    /// Departure date (YYYY-MM-DD)
    #[arg(short, long, default_value = "")]
    pub date: String,
    /// Return date (YYYY-MM-DD)
    #[arg(short, long, default_value = "")]
    pub return_date: String,
    /// Number of adults
    #[arg(long, default_value = "1")]
    pub adults: u32,
    /// Number of children
    #[arg(long, default_value = "0")]
    pub children: u32,
    /// Number of infants in seat
    #[arg(long, default_value = "0")]
    pub infants_in_seat: u32,
    /// Number of infants on lap
    #[arg(long, default_value = "0")]
    pub infants_on_lap: u32,
    /// Flight class (economy, premium-economy, business, first)
    #[arg(long, default_value = "economy")]
    pub class: String,
    /// Trip type (round-trip, one-way, multi-city)
    #[arg(long, default_value = "round-trip")]
    pub trip_type: String,
    /// Treat this date as today for the departure lower bound
    #[arg(long)]
    pub today: Option<String>,
    /// Print the submission as JSON
    #[arg(long)]
    pub json: bool,
    /// Output file for JSON results
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Stderr logging filtered by RUST_LOG, plus JSON files when a log directory is given
fn init_logging(log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "flight-form.log");
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn load_directory(path: Option<&Path>) -> Result<AirportDirectory> {
    let directory = match path {
        Some(path) => AirportDirectory::load(path)?,
        None => AirportDirectory::bundled()?,
    };
    Ok(directory)
}

/// Type into a location field the way a user would, optionally accepting the top suggestion
fn enter_location(form: &mut FlightSearchForm, field: LocationField, text: &str, resolve: bool) {
    form.set_location(field, text);
    if resolve {
        if let Some(first) = form.suggestions().first().cloned() {
            form.select_suggestion(field, first);
        }
    }
}

/// Click "+" until the category reaches `count` (adults start at one)
fn set_passenger_count(form: &mut FlightSearchForm, category: PassengerCategory, count: u32) {
    while form.passengers().get(category) < count {
        form.adjust_passengers(category, Adjustment::Increment);
    }
}

/// One suggestion label per line, or a notice when nothing matches
fn run_suggest(directory: &AirportDirectory, query: &str, limit: usize) -> String {
    let suggestions = directory.suggest_with_limit(query, limit);
    if suggestions.is_empty() {
        return format!("No airports match '{}'", query.trim());
    }
    suggestions
        .iter()
        .map(|airport| airport.suggestion_label())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fill in a form session from the flags and submit it. Returns the text to print:
/// the summary, the JSON snapshot, or where the JSON was written.
fn run_search(directory: AirportDirectory, args: SearchArgs) -> Result<String> {
    let mut config = FormConfig::default();
    if let Some(today) = args.today.as_deref().map(parse_date).transpose()?.flatten() {
        config = config.with_today(today);
    }

    let mut form = FlightSearchForm::with_config(directory, config);
    form.set_trip_type(args.trip_type.parse::<TripType>()?);
    form.set_flight_class(args.class.parse::<FlightClass>()?);

    enter_location(&mut form, LocationField::From, &args.from, args.resolve);
    enter_location(&mut form, LocationField::To, &args.to, args.resolve);

    form.set_departure_date(parse_date(&args.date)?)?;
    form.set_return_date(parse_date(&args.return_date)?)?;

    set_passenger_count(&mut form, PassengerCategory::Adults, args.adults);
    set_passenger_count(&mut form, PassengerCategory::Children, args.children);
    set_passenger_count(&mut form, PassengerCategory::InfantsInSeat, args.infants_in_seat);
    set_passenger_count(&mut form, PassengerCategory::InfantsOnLap, args.infants_on_lap);
    debug!(query = ?form.query(), "Form filled in");

    let submitted = form.submit();
    if !args.json && args.output.is_none() {
        return Ok(submitted.to_string());
    }

    let json = serde_json::to_string_pretty(submitted)?;
    match args.output {
        Some(output_file) => {
            fs::write(&output_file, &json)
                .with_context(|| format!("writing {}", output_file.display()))?;
            info!(path = %output_file.display(), "Search saved");
            Ok(format!("Search saved to {}", output_file.display()))
        }
        None => Ok(json),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_dir.as_deref())?;

    // The form cannot offer suggestions without airport data, so stop here
    let directory = load_directory(cli.airports.as_deref()).context("loading airport data")?;
    info!(airports = directory.len(), "Airport directory ready");

    let output = match cli.command {
        Commands::Suggest { query, limit } => run_suggest(&directory, &query, limit),
        Commands::Search(args) => run_search(directory, args)?,
    };
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flight_form::{AirportRecord, FlightFormError};

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "flight-form",
            "search",
            "--from", "LAX",
            "--to", "JFK",
            "--date", "2025-06-01",
            "--trip-type", "one-way",
        ]);

        assert!(cli.is_ok());

        if let Ok(Cli { command: Commands::Search(args), .. }) = cli {
            assert_eq!(args.from, "LAX");
            assert_eq!(args.to, "JFK");
            assert_eq!(args.date, "2025-06-01");
            assert_eq!(args.trip_type, "one-way");
            assert!(!args.resolve);
            assert!(args.output.is_none());
        }
    }

    #[test]
    fn test_suggest_parsing_with_global_flags() {
        let cli = Cli::try_parse_from(["flight-form", "suggest", "lon", "--airports", "data.json"]).unwrap();
        assert_eq!(cli.airports, Some(PathBuf::from("data.json")));
        match cli.command {
            Commands::Suggest { query, limit } => {
                assert_eq!(query, "lon");
                assert_eq!(limit, 5);
            }
            _ => panic!("expected suggest"),
        }
    }

    #[test]
    fn test_enter_location_resolves_first_suggestion() {
        let mut form = FlightSearchForm::new(AirportDirectory::bundled().unwrap());
        enter_location(&mut form, LocationField::From, "heathrow", true);
        assert_eq!(form.from_location().to_string(), "LHR - Heathrow Airport");

        enter_location(&mut form, LocationField::To, "nowhere-at-all", true);
        assert_eq!(form.to_location().to_string(), "nowhere-at-all");
    }

    #[test]
    fn test_set_passenger_count() {
        let mut form = FlightSearchForm::new(AirportDirectory::bundled().unwrap());
        set_passenger_count(&mut form, PassengerCategory::Adults, 3);
        set_passenger_count(&mut form, PassengerCategory::InfantsOnLap, 2);
        // zero adults is not reachable; the count stays at its floor
        set_passenger_count(&mut form, PassengerCategory::Children, 0);
        assert_eq!(form.passengers().adults(), 3);
        assert_eq!(form.passengers().infants_on_lap(), 2);
        assert_eq!(form.passengers().total(), 5);
    }

    fn search_args(flags: &[&str]) -> SearchArgs {
        let argv = ["flight-form", "search"].iter().chain(flags.iter()).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Search(args) => args,
            _ => panic!("expected search"),
        }
    }

    fn lax_jfk_directory() -> AirportDirectory {
        AirportDirectory::from_records(vec![
            AirportRecord::new("LAX", "Los Angeles Intl", "Los Angeles", "US"),
            AirportRecord::new("JFK", "John F Kennedy Intl", "New York", "US"),
        ])
        .unwrap()
    }

    #[test]
    fn test_search_prints_summary() {
        let args = search_args(&[
            "--from", "la",
            "--to", "kennedy",
            "--resolve",
            "--today", "2025-05-01",
            "--date", "2025-06-01",
            "--return-date", "2025-06-08",
            "--adults", "2",
            "--class", "business",
        ]);

        let summary = run_search(lax_jfk_directory(), args).unwrap();
        assert!(summary.starts_with("Flight Search Details"));
        assert!(summary.contains("LAX - Los Angeles Intl"));
        assert!(summary.contains("JFK - John F Kennedy Intl"));
        assert!(summary.contains("Departure Date: 2025-06-01"));
        assert!(summary.contains("Return Date: 2025-06-08"));
    }

    #[test]
    fn test_search_refuses_departure_before_today() {
        let args = search_args(&["--today", "2025-05-01", "--date", "2025-04-30"]);

        let err = run_search(lax_jfk_directory(), args).unwrap_err();
        match err.downcast_ref::<FlightFormError>() {
            Some(FlightFormError::DateBeforeMinimum { min, .. }) => {
                assert_eq!(*min, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
            }
            other => panic!("expected a date bound error, got {:?}", other),
        }
    }

    #[test]
    fn test_search_rejects_unknown_class() {
        let args = search_args(&["--class", "steerage"]);
        assert!(run_search(lax_jfk_directory(), args).is_err());
    }

    #[test]
    fn test_search_json_output() {
        let args = search_args(&["--trip-type", "one-way", "--from", "york", "--json"]);

        let json = run_search(lax_jfk_directory(), args).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["trip_type"], "one-way");
        assert_eq!(value["from_location"]["value"], "york");
    }

    #[test]
    fn test_search_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        let path_arg = path.to_string_lossy().into_owned();
        let args = search_args(&["--from", "lax", "--resolve", "--output", &path_arg]);

        let message = run_search(lax_jfk_directory(), args).unwrap();
        assert_eq!(message, format!("Search saved to {}", path.display()));

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["from_location"]["kind"], "resolved");
        assert_eq!(written["from_location"]["value"]["iata"], "LAX");
    }

    #[test]
    fn test_suggest_prints_labels() {
        let directory = AirportDirectory::bundled().unwrap();
        let output = run_suggest(&directory, "london", 5);
        let expected: Vec<String> = directory
            .suggest("london")
            .iter()
            .map(|airport| airport.suggestion_label())
            .collect();
        assert_eq!(output.lines().collect::<Vec<_>>(), expected);
        assert_eq!(output.lines().count(), 4);

        assert_eq!(run_suggest(&directory, "  zzzz ", 5), "No airports match 'zzzz'");
    }
}
