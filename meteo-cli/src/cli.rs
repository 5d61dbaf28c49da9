use anyhow::{Context, Result, bail};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use meteo_core::{
    AcquisitionService, Config, ObservationStore, SqliteObservationStore, service_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather acquisition CLI")]
pub struct Cli {
    /// Without a subcommand the interactive menu is shown.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch current weather for a coordinate; stored when a database is configured.
    Fetch {
        latitude: f64,
        longitude: f64,

        /// Language hint for the condition text and country name, e.g. "fr".
        #[arg(long)]
        lang: Option<String>,

        /// Print the station as JSON instead of the formatted report.
        #[arg(long)]
        json: bool,
    },

    /// List the station names stored in the database.
    Stations,

    /// List stored observation timestamps for a station.
    Dates { station: String },

    /// Show the stored observation for a station at a timestamp.
    Show {
        station: String,

        /// RFC 3339 timestamp, e.g. 2026-08-06T12:34:56Z.
        timestamp: DateTime<Utc>,
    },

    /// Fetch fresh weather for a station already in the database.
    Refetch {
        station: String,

        #[arg(long)]
        lang: Option<String>,
    },

    /// Interactively set the API key, service URLs and database path.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(command) => command.run().await,
            None => interactive_menu().await,
        }
    }
}

impl Command {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self {
            Command::Fetch { latitude, longitude, lang, json } => {
                let service = service_from_config(&config)?;
                let lang = lang.or_else(|| config.lang.clone());
                fetch(&service, latitude, longitude, lang.as_deref(), json).await
            }
            Command::Stations => list_stations(&open_store(&config)?),
            Command::Dates { station } => list_dates(&open_store(&config)?, &station),
            Command::Show { station, timestamp } => {
                show_observation(&open_store(&config)?, &station, timestamp)
            }
            Command::Refetch { station, lang } => {
                let service = service_from_config(&config)?;
                let lang = lang.or_else(|| config.lang.clone());
                refetch(&service, &station, lang.as_deref()).await
            }
            Command::Configure => configure(config),
        }
    }
}

async fn fetch(
    service: &AcquisitionService,
    latitude: f64,
    longitude: f64,
    lang: Option<&str>,
    json: bool,
) -> Result<()> {
    let station = service.acquire_and_process(latitude, longitude, lang).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&station)?);
    } else {
        render::station_report(&station);
    }
    Ok(())
}

async fn refetch(service: &AcquisitionService, station: &str, lang: Option<&str>) -> Result<()> {
    let acquisition = service.acquire_for_known_station(station, lang).await?;
    render::station_report(&acquisition.station);
    Ok(())
}

/// The browse commands only need the database, not the API credentials.
fn open_store(config: &Config) -> Result<SqliteObservationStore> {
    let Some(path) = &config.database else {
        bail!(
            "No database configured.\n\
             Hint: run `meteo configure` and set a database path."
        );
    };
    SqliteObservationStore::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))
}

fn list_stations(store: &SqliteObservationStore) -> Result<()> {
    let names = store.station_names()?;
    if names.is_empty() {
        println!("No stations stored yet.");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn list_dates(store: &SqliteObservationStore, station: &str) -> Result<()> {
    let timestamps = store.timestamps(station)?;
    if timestamps.is_empty() {
        println!("No observations stored for {station}.");
        return Ok(());
    }
    for timestamp in timestamps {
        println!("{}", timestamp.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    Ok(())
}

fn show_observation(
    store: &SqliteObservationStore,
    station: &str,
    timestamp: DateTime<Utc>,
) -> Result<()> {
    match store.find_observation(station, timestamp)? {
        Some(observation) => {
            println!(
                "Observation for {station} at {}:",
                observation.measured_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            );
            render::observation_report(&observation);
        }
        None => println!("No observation stored for {station} at {timestamp}."),
    }
    Ok(())
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = inquire::Text::new("OpenWeatherMap API key:")
        .with_initial_value(config.weather.api_key.as_deref().unwrap_or(""))
        .prompt()?;
    config.weather.api_key =
        if api_key.trim().is_empty() { None } else { Some(api_key.trim().to_string()) };

    config.weather.base_url = inquire::Text::new("Weather service URL:")
        .with_initial_value(&config.weather.base_url)
        .prompt()?;

    config.country.base_url = inquire::Text::new("Country service URL:")
        .with_initial_value(&config.country.base_url)
        .prompt()?;

    let current_db = config.database.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
    let database = inquire::Text::new("Database path (empty to disable persistence):")
        .with_initial_value(&current_db)
        .prompt()?;
    config.database = {
        let trimmed = database.trim();
        if trimmed.is_empty() { None } else { Some(PathBuf::from(trimmed)) }
    };

    let lang = inquire::Text::new("Default language (e.g. fr, en):")
        .with_initial_value(config.lang.as_deref().unwrap_or("fr"))
        .prompt()?;
    config.lang = if lang.trim().is_empty() { None } else { Some(lang.trim().to_string()) };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

const MENU_FETCH: &str = "Fetch weather for coordinates";
const MENU_STATIONS: &str = "List saved stations";
const MENU_HISTORY: &str = "Browse observation history";
const MENU_REFETCH: &str = "Refetch a saved station";
const MENU_CONFIGURE: &str = "Configure";
const MENU_QUIT: &str = "Quit";

async fn interactive_menu() -> Result<()> {
    loop {
        let choice = inquire::Select::new(
            "meteo",
            vec![MENU_FETCH, MENU_STATIONS, MENU_HISTORY, MENU_REFETCH, MENU_CONFIGURE, MENU_QUIT],
        )
        .prompt()?;

        if choice == MENU_QUIT {
            return Ok(());
        }

        // A failed action reports and returns to the menu.
        if let Err(err) = run_menu_choice(choice).await {
            eprintln!("Error: {err:#}");
        }
    }
}

async fn run_menu_choice(choice: &str) -> Result<()> {
    let config = Config::load()?;

    match choice {
        MENU_FETCH => {
            let latitude = inquire::CustomType::<f64>::new("Latitude:").prompt()?;
            let longitude = inquire::CustomType::<f64>::new("Longitude:").prompt()?;
            let service = service_from_config(&config)?;
            fetch(&service, latitude, longitude, config.lang.as_deref(), false).await
        }
        MENU_STATIONS => list_stations(&open_store(&config)?),
        MENU_HISTORY => browse_history(&open_store(&config)?),
        MENU_REFETCH => {
            let store = open_store(&config)?;
            let names = store.station_names()?;
            if names.is_empty() {
                println!("No stations stored yet.");
                return Ok(());
            }
            let station = inquire::Select::new("Station:", names).prompt()?;
            let service = service_from_config(&config)?;
            refetch(&service, &station, config.lang.as_deref()).await
        }
        MENU_CONFIGURE => configure(config),
        _ => Ok(()),
    }
}

fn browse_history(store: &SqliteObservationStore) -> Result<()> {
    let names = store.station_names()?;
    if names.is_empty() {
        println!("No stations stored yet.");
        return Ok(());
    }
    let station = inquire::Select::new("Station:", names).prompt()?;

    let timestamps = store.timestamps(&station)?;
    if timestamps.is_empty() {
        println!("No observations stored for {station}.");
        return Ok(());
    }

    let rendered: Vec<String> = timestamps
        .iter()
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .collect();
    let picked = inquire::Select::new("Observation:", rendered).raw_prompt()?;

    show_observation(store, &station, timestamps[picked.index])
}
