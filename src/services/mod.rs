pub mod directory;
pub mod geocode;
pub mod timezone;
pub mod traits;
pub mod types;

pub use directory::DirectoryClient;
pub use geocode::NominatimGeocoder;
pub use timezone::TimeApiTimezoneLookup;
pub use traits::{Geocoder, TerminalDirectory, TimezoneLookup};
