use serde::Deserialize;

/// One hit from the Nominatim `/search` endpoint.
/// Nominatim serialises coordinates as strings
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
}

/// Response of the timeapi.io coordinate lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateTimezone {
    /// IANA timezone name, e.g. `Europe/Moscow`
    pub time_zone: String,
}
