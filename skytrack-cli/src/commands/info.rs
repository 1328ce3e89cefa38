//! `skytrack info` - summary of a flight.

use clap::Args;
use console::style;
use skytrack::augmentation::analytics::path_distance;
use skytrack::config::ConfigFile;
use skytrack::persistence::FlightRepository;
use skytrack::{Aircraft, Flight};

use super::common::{format_duration, load_flight, repository, FlightLocation};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Flight document path or stored flight id; omit to list stored flights
    pub flight: Option<FlightLocation>,
}

pub fn run(args: InfoArgs, config: &ConfigFile) -> Result<(), CliError> {
    match args.flight {
        Some(location) => {
            let flight = load_flight(&location, config)?;
            print_flight(&flight);
        }
        None => list_stored(config)?,
    }
    Ok(())
}

fn list_stored(config: &ConfigFile) -> Result<(), CliError> {
    let repository = repository(config);
    let ids = repository.list()?;
    if ids.is_empty() {
        println!(
            "No stored flights in {}",
            repository.directory().display()
        );
        return Ok(());
    }

    println!("{}", style("Stored flights").bold());
    for id in ids {
        match repository.load(id) {
            Ok(flight) => println!(
                "  {:>4}  {}  {}  {}",
                id,
                flight.info().creation_time.format("%Y-%m-%d %H:%M"),
                format_duration(flight.total_duration()),
                flight.info().title
            ),
            Err(e) => println!("  {:>4}  {}", id, style(e).red()),
        }
    }
    Ok(())
}

fn print_flight(flight: &Flight) {
    let info = flight.info();
    let title = if info.title.is_empty() {
        "(untitled)"
    } else {
        info.title.as_str()
    };
    println!("{}", style(title).bold());
    if !info.description.is_empty() {
        println!("{}", info.description);
    }
    println!();
    println!("  Created:  {}", info.creation_time.to_rfc3339());
    println!("  Duration: {}", format_duration(flight.total_duration()));
    println!("  Aircraft: {}", flight.aircraft_count());

    for (index, aircraft) in flight.aircraft().iter().enumerate() {
        println!();
        let marker = if index == flight.user_aircraft_index() {
            " (user)"
        } else {
            ""
        };
        println!("  {}", style(format!("Aircraft {}{}", aircraft.id(), marker)).cyan());
        print_aircraft(aircraft);
    }
}

fn print_aircraft(aircraft: &Aircraft) {
    let info = aircraft.info();
    if !info.type_name.is_empty() {
        println!("    Type:        {}", info.type_name);
    }
    if !info.tail_number.is_empty() {
        println!("    Tail number: {}", info.tail_number);
    }
    if info.time_offset != 0 {
        println!("    Time offset: {} ms", info.time_offset);
    }
    println!("    Duration:    {}", format_duration(aircraft.duration()));
    println!(
        "    Distance:    {:.1} km",
        path_distance(aircraft.position()) / 1_000.0
    );
    println!(
        "    Samples:     {} position, {} engine, {} primary, {} secondary, {} handle, {} light",
        aircraft.position().len(),
        aircraft.engine().len(),
        aircraft.primary_flight_control().len(),
        aircraft.secondary_flight_control().len(),
        aircraft.aircraft_handle().len(),
        aircraft.light().len()
    );
}
