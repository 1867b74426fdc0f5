use log::debug;

use crate::{Coordinate, PinError, Result};

/// Parses a coordinate argument of the form "lat,lng".
pub fn parse_coordinate(input: &str) -> Result<Coordinate> {
    let mut parts = input.splitn(2, ',');
    let latitude = parts.next().unwrap_or("").trim();
    let longitude = parts.next().unwrap_or("").trim();

    if latitude.is_empty() || longitude.is_empty() {
        return Err(PinError::InvalidCoordinate {
            message: format!("expected \"lat,lng\", got \"{}\"", input),
        });
    }

    let latitude: f64 = latitude.parse().map_err(|_| PinError::InvalidCoordinate {
        message: format!("latitude \"{}\" is not a number", latitude),
    })?;
    let longitude: f64 = longitude.parse().map_err(|_| PinError::InvalidCoordinate {
        message: format!("longitude \"{}\" is not a number", longitude),
    })?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(PinError::InvalidCoordinate {
            message: format!("latitude {} is out of range", latitude),
        });
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(PinError::InvalidCoordinate {
            message: format!("longitude {} is out of range", longitude),
        });
    }

    debug!("Parsed coordinate ({}, {})", latitude, longitude);
    Ok(Coordinate::new(latitude, longitude))
}

/// Normalizes a color argument to uppercase "#RRGGBB" form.
pub fn normalize_hex_color(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PinError::InvalidColor {
            value: value.to_string(),
        });
    }

    Ok(format!("#{}", digits.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_spaced_coordinates() {
        let coord = parse_coordinate("37.5665,126.9780").unwrap();
        assert_eq!(coord.latitude, 37.5665);
        assert_eq!(coord.longitude, 126.978);

        let coord = parse_coordinate(" -33.86 , 151.21 ").unwrap();
        assert_eq!(coord.latitude, -33.86);
        assert_eq!(coord.longitude, 151.21);
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(parse_coordinate("37.5").is_err());
        assert!(parse_coordinate("north,south").is_err());
        assert!(parse_coordinate("").is_err());
        assert!(parse_coordinate("91.0,0.0").is_err());
        assert!(parse_coordinate("0.0,181.0").is_err());
    }

    #[test]
    fn normalizes_hex_colors() {
        assert_eq!(normalize_hex_color("#ff0000").unwrap(), "#FF0000");
        assert_eq!(normalize_hex_color("00ff00").unwrap(), "#00FF00");
        assert_eq!(normalize_hex_color(" #ABCDEF ").unwrap(), "#ABCDEF");
    }

    #[test]
    fn rejects_invalid_colors() {
        assert!(normalize_hex_color("#fff").is_err());
        assert!(normalize_hex_color("#GGGGGG").is_err());
        assert!(normalize_hex_color("red").is_err());
    }
}
