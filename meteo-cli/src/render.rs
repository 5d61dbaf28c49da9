//! Console rendering of stations and observations.
//!
//! Every measurement is optional; an absent field is simply not printed,
//! never shown as zero or as an error.

use meteo_core::{Observation, Station};

pub fn station_report(station: &Station) {
    let Some(observation) = station.observations.first() else {
        println!("No weather data available.");
        return;
    };

    println!();
    println!("=== Current weather ===");

    let place = if station.name.is_empty() { "Unknown" } else { &station.name };
    match &station.country {
        Some(country) => println!("Location: {place} ({})", country.label()),
        None => println!("Location: {place}"),
    }
    if let (Some(lat), Some(lon)) = (station.latitude, station.longitude) {
        println!("Coordinates: {lat:.4}, {lon:.4}");
    }

    println!("-----------------------");
    observation_report(observation);
    println!("=======================");
    println!();
}

pub fn observation_report(observation: &Observation) {
    if let Some(temperature) = observation.temperature {
        println!("Temperature: {temperature:.1} °C");
    }
    if let Some(humidity) = observation.humidity {
        println!("Humidity: {humidity:.0} %");
    }
    if let Some(pressure) = observation.pressure {
        println!("Pressure: {pressure:.0} hPa");
    }
    if let Some(visibility) = observation.visibility_m {
        // The provider reports meters.
        println!("Visibility: {:.1} km", visibility as f64 / 1000.0);
    }
    if let Some(precipitation) = observation.precipitation_mm {
        println!("Precipitation: {precipitation:.1} mm");
    }
    if let Some(condition) = &observation.condition {
        println!("Conditions: {}", capitalize(condition));
    }
}

/// Uppercase the first letter, leave the rest alone.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_only_touches_the_first_letter() {
        assert_eq!(capitalize("couvert"), "Couvert");
        assert_eq!(capitalize("ciel dégagé"), "Ciel dégagé");
        assert_eq!(capitalize(""), "");
    }
}
