use std::fmt::Debug;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use octranspo::domain::Trip;
use octranspo::gtfs::{GtfsQuery, GtfsTable};
use octranspo::{Connection, ConnectionConfig, Error, RateLimit};

const USAGE: &str = "usage: octranspo <stop_no> [route_no]
       octranspo gtfs <table> [<column> <value>]

tables: agency calendar calendar_dates routes stops stop_times trips";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Agency,
    Calendar,
    CalendarDates,
    Routes,
    Stops,
    StopTimes,
    Trips,
}

impl Table {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "agency" => Table::Agency,
            "calendar" => Table::Calendar,
            "calendar_dates" => Table::CalendarDates,
            "routes" => Table::Routes,
            "stops" => Table::Stops,
            "stop_times" => Table::StopTimes,
            "trips" => Table::Trips,
            _ => return None,
        })
    }
}

/// What to fetch.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    NextTrips {
        stop_no: String,
        route_no: Option<String>,
    },
    Gtfs {
        table: Table,
        query: GtfsQuery,
    },
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        match args {
            [cmd, table] if cmd == "gtfs" => Some(Command::Gtfs {
                table: Table::from_name(table)?,
                query: GtfsQuery::new(),
            }),
            [cmd, table, column, value] if cmd == "gtfs" => Some(Command::Gtfs {
                table: Table::from_name(table)?,
                query: GtfsQuery::new().column_and_value(column, value),
            }),
            [cmd, ..] if cmd == "gtfs" => None,
            [stop_no] => Some(Command::NextTrips {
                stop_no: stop_no.clone(),
                route_no: None,
            }),
            [stop_no, route_no] => Some(Command::NextTrips {
                stop_no: stop_no.clone(),
                route_no: Some(route_no.clone()),
            }),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let mut config = match ConnectionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    // Stay polite by default: one call a second.
    if config.rate_limit == RateLimit::Unlimited {
        config = config.with_rate_limit(1.0, 1);
    }

    let connection = match Connection::new(config) {
        Ok(connection) => connection,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let run = run(&connection, command);
    let result = tokio::select! {
        result = run => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            return ExitCode::from(130);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(connection: &Connection, command: Command) -> Result<(), Error> {
    match command {
        Command::NextTrips { stop_no, route_no } => {
            next_trips(connection, &stop_no, route_no.as_deref()).await
        }
        Command::Gtfs { table, query } => gtfs_table(connection, table, &query).await,
    }
}

async fn gtfs_table(connection: &Connection, table: Table, query: &GtfsQuery) -> Result<(), Error> {
    match table {
        Table::Agency => print_table(connection.get_gtfs_agency(query).await?),
        Table::Calendar => print_table(connection.get_gtfs_calendar(query).await?),
        Table::CalendarDates => print_table(connection.get_gtfs_calendar_dates(query).await?),
        Table::Routes => print_table(connection.get_gtfs_routes(query).await?),
        Table::Stops => print_table(connection.get_gtfs_stops(query).await?),
        Table::StopTimes => print_table(connection.get_gtfs_stop_times(query).await?),
        Table::Trips => print_table(connection.get_gtfs_trips(query).await?),
    }
    Ok(())
}

fn print_table<R: Debug>(table: GtfsTable<R>) {
    println!("{} rows from {}", table.rows.len(), table.query.table);
    for row in &table.rows {
        println!("{row:#?}");
    }
}

async fn next_trips(
    connection: &Connection,
    stop_no: &str,
    route_no: Option<&str>,
) -> Result<(), Error> {
    match route_no {
        Some(route_no) => {
            let next = connection.get_next_trips_for_stop(route_no, stop_no).await?;
            println!("{} {}", next.stop_no, next.stop_label);
            for direction in &next.route_directions {
                println!(
                    "  {} {} ({}), as of {}",
                    direction.route_no,
                    direction.route_label,
                    direction.direction,
                    direction.request_processing_time.format("%H:%M:%S")
                );
                for trip in &direction.trips {
                    print_trip(trip);
                }
            }
        }
        None => {
            let next = connection.get_next_trips_for_stop_all_routes(stop_no).await?;
            println!("{} {}", next.stop_no, next.stop_description);
            for route in &next.routes {
                println!(
                    "  {} {} ({})",
                    route.route_no, route.route_heading, route.direction
                );
                for trip in &route.trips {
                    print_trip(trip);
                }
            }
        }
    }
    Ok(())
}

fn print_trip(trip: &Trip) {
    let source = if trip.is_live() { "GPS" } else { "scheduled" };
    print!(
        "    {:>3} min  to {} ({source})",
        trip.adjusted_schedule_time, trip.trip_destination
    );
    if let (Some(lat), Some(lon)) = (trip.latitude, trip.longitude) {
        print!("  at {lat:.5},{lon:.5}");
    }
    println!();
}
