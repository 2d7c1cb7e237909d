use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid terminal record: {0}")]
    InvalidRecord(String),

    #[error("could not get terminal info by id {id} (response code {status})")]
    Fetch { id: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding failed for \"{query}\": {reason}")]
    Geocode { query: String, reason: String },

    #[error("timezone lookup failed at ({lat}, {lng}): {reason}")]
    TimezoneLookup { lat: f64, lng: f64, reason: String },

    #[error("unknown timezone \"{0}\"")]
    UnknownTimezone(String),

    #[error("malformed working hours: {0}")]
    MalformedSchedule(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
