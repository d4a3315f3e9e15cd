//! Form session example
//!
//! Drives the form the way a page would: mounts it on a document, types into
//! the location fields, picks suggestions, sets dates and passengers, then
//! submits and prints the summary.

use chrono::{Duration, Utc};
use flight_form::{
    Adjustment, AirportDirectory, ClickTarget, Document, Dropdown, FlightClass, FlightSearchForm,
    LocationField, PassengerCategory, TripType,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let directory = AirportDirectory::bundled()?;
    println!("Loaded {} airports", directory.len());

    let document = Document::new();
    let mounted = FlightSearchForm::new(directory).mount(&document);

    {
        let mut form = mounted.form_mut();

        form.set_from_location("heathrow");
        println!("\nSuggestions for 'heathrow':");
        for airport in form.suggestions() {
            println!("  {}", airport.suggestion_label());
        }
        let origin = form.suggestions().first().cloned().ok_or("no airport matches 'heathrow'")?;
        form.select_suggestion(LocationField::From, origin);

        form.set_to_location("new york");
        println!("\nSuggestions for 'new york':");
        for airport in form.suggestions() {
            println!("  {}", airport.suggestion_label());
        }
        let destination = form.suggestions().first().cloned().ok_or("no airport matches 'new york'")?;
        form.select_suggestion(LocationField::To, destination);

        let departure = Utc::now().date_naive() + Duration::days(14);
        form.set_departure_date(Some(departure))?;
        form.set_return_date(Some(departure + Duration::days(7)))?;

        form.toggle_dropdown(Dropdown::Passenger);
        form.adjust_passengers(PassengerCategory::Adults, Adjustment::Increment);
        form.adjust_passengers(PassengerCategory::Children, Adjustment::Increment);

        form.toggle_dropdown(Dropdown::Class);
        form.set_flight_class(FlightClass::PremiumEconomy);
        form.set_trip_type(TripType::RoundTrip);
        form.toggle_dropdown(Dropdown::Trip);
    }

    // A click elsewhere on the page closes the trip menu
    document.dispatch_pointer_down(&ClickTarget::new(["page", "results"]));
    println!("\nOpen dropdown after outside click: {:?}", mounted.form().open_dropdown());

    let mut form = mounted.unmount();
    let submitted = form.submit();
    println!("\n{}", submitted);
    println!("\n{}", serde_json::to_string_pretty(submitted)?);

    Ok(())
}
