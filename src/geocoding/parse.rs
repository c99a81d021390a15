use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::GeoPoint;

const NUMBER: &str = r"[-+]?\d+(?:\.\d+)?";

/// `6.1319, 1.2228` and nothing else
static COORDINATE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\s*({NUMBER})\s*,\s*({NUMBER})\s*$"))
        .expect("Invalid coordinate pair regex")
});

/// `.../@6.1319,1.2228,17z/...` as found in map share links
static MAP_LINK_AT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"@({NUMBER}),\s*({NUMBER})")).expect("Invalid map link regex")
});

/// `?q=6.1319,1.2228` / `&ll=...` query forms of the same links
static MAP_LINK_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"[?&](?:q|query|ll)=({NUMBER})(?:,|%2C)\s*({NUMBER})"))
        .expect("Invalid map link query regex")
});

fn capture_point(re: &Regex, input: &str) -> Option<GeoPoint> {
    let caps = re.captures(input)?;
    let latitude = caps.get(1)?.as_str().parse().ok()?;
    let longitude = caps.get(2)?.as_str().parse().ok()?;
    Some(GeoPoint::new(latitude, longitude))
}

/// Input that is exactly a `lat, lon` pair
pub fn parse_coordinates(input: &str) -> Option<GeoPoint> {
    capture_point(&COORDINATE_PAIR, input)
}

/// Coordinates embedded in a map share link
pub fn parse_map_link(input: &str) -> Option<GeoPoint> {
    capture_point(&MAP_LINK_AT, input).or_else(|| capture_point(&MAP_LINK_QUERY, input))
}
