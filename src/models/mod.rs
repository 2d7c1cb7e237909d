use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TerminalError;

/// Terminal identifier as published by the directory (numeric or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TerminalId {
    Number(i64),
    Text(String),
}

impl TerminalId {
    /// Any JSON value is accepted; non-integers keep their JSON text.
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(n) => TerminalId::Number(n),
                None => TerminalId::Text(n.to_string()),
            },
            Value::String(s) => TerminalId::Text(s.clone()),
            other => TerminalId::Text(other.to_string()),
        }
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalId::Number(n) => write!(f, "{n}"),
            TerminalId::Text(s) => f.write_str(s),
        }
    }
}

/// Geographic position of a terminal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One weekday's opening window, as published.
///
/// Values are kept untyped; a broken entry is reported when the
/// schedule is actually consulted, not when the record is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingHoursEntry {
    pub dow: Option<Value>,
    pub time_open: Option<Value>,
    pub time_close: Option<Value>,
}

impl WorkingHoursEntry {
    fn from_value(value: &Value) -> Self {
        Self {
            dow: present(value.get("dow")),
            time_open: present(value.get("time_open")),
            time_close: present(value.get("time_close")),
        }
    }

    /// True when `dow` is the number `day`; `2.0` matches 2, `"2"` does not
    pub fn is_day(&self, day: u8) -> bool {
        self.dow
            .as_ref()
            .and_then(Value::as_f64)
            .is_some_and(|dow| dow == f64::from(day))
    }
}

/// Outcome of an "is it open now" check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Availability {
    Open,
    Closed,
    /// No working-hours data published for the terminal
    Unknown,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Availability::Open => "OPEN",
            Availability::Closed => "CLOSED",
            Availability::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Validated view over a terminal record fetched from the directory.
///
/// Only presence is checked. Values of an unexpected type are kept as
/// they are and only matter when something reads them.
#[derive(Debug, Clone)]
pub struct TerminalRecord {
    id: TerminalId,
    status_code: Option<Value>,
    status: Option<Value>,
    address: String,
    address_struct: Value,
    name: String,
    kind: Option<Value>,
    lat: Option<f64>,
    lng: Option<f64>,
    working_hours: Option<Value>,
    raw: Value,
}

impl TerminalRecord {
    /// Build a record from the JSON body returned by the directory.
    ///
    /// Fails with [`TerminalError::MissingField`] when `id`, `address`,
    /// `address_struct` or `name` is absent (or null).
    pub fn from_value(raw: Value) -> Result<Self, TerminalError> {
        let fields = raw
            .as_object()
            .ok_or_else(|| TerminalError::InvalidRecord("expected a JSON object".to_string()))?;

        let id = TerminalId::from_value(required(fields, "id")?);
        let address = text(required(fields, "address")?);
        let address_struct = required(fields, "address_struct")?.clone();
        let name = text(required(fields, "name")?);

        Ok(Self {
            id,
            address,
            address_struct,
            name,
            status_code: present(fields.get("status_code")),
            status: present(fields.get("status")),
            kind: present(fields.get("type")),
            lat: fields.get("lat").and_then(Value::as_f64),
            lng: fields.get("lng").and_then(Value::as_f64),
            working_hours: present(fields.get("working_hours")),
            raw,
        })
    }

    pub fn id(&self) -> &TerminalId {
        &self.id
    }

    pub fn status_code(&self) -> Option<&Value> {
        self.status_code.as_ref()
    }

    pub fn status(&self) -> Option<&Value> {
        self.status.as_ref()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn address_struct(&self) -> &Value {
        &self.address_struct
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<&Value> {
        self.kind.as_ref()
    }

    /// Latitude, if published as a number
    pub fn lat(&self) -> Option<f64> {
        self.lat
    }

    /// Longitude, if published as a number
    pub fn lng(&self) -> Option<f64> {
        self.lng
    }

    /// `working_hours` exactly as published
    pub fn working_hours(&self) -> Option<&Value> {
        self.working_hours.as_ref()
    }

    /// Working hours as entries, `None` when none are published.
    ///
    /// A `working_hours` value that is not a list is a
    /// [`TerminalError::MalformedSchedule`].
    pub fn schedule(&self) -> Option<Result<Vec<WorkingHoursEntry>, TerminalError>> {
        let hours = self.working_hours.as_ref()?;
        Some(match hours.as_array() {
            Some(entries) => Ok(entries.iter().map(WorkingHoursEntry::from_value).collect()),
            None => Err(TerminalError::MalformedSchedule(format!(
                "expected a list of entries, got {hours}"
            ))),
        })
    }

    /// The untouched JSON record this view was built from
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Both coordinates, or nothing if either is missing
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    /// `address_struct.city_name`, when it is a non-empty string
    pub fn city_name(&self) -> Option<&str> {
        self.address_struct
            .get("city_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a Value, TerminalError> {
    fields
        .get(key)
        .filter(|value| !value.is_null())
        .ok_or(TerminalError::MissingField(key))
}

fn present(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> Value {
        json!({
            "id": 1042,
            "status_code": 1,
            "status": "active",
            "address": "Tverskaya st. 7",
            "address_struct": { "city_name": "Moscow", "street": "Tverskaya" },
            "name": "Tverskaya kiosk",
            "type": "kiosk",
            "lat": 55.7575,
            "lng": 37.6135,
            "working_hours": [
                { "dow": 0, "time_open": "09:00", "time_close": "18:00" },
                { "dow": 2, "time_open": "10:00", "time_close": "20:00" }
            ]
        })
    }

    #[test]
    fn parses_every_field() {
        let record = TerminalRecord::from_value(full_record()).unwrap();

        assert_eq!(record.id(), &TerminalId::Number(1042));
        assert_eq!(record.status_code(), Some(&json!(1)));
        assert_eq!(record.status(), Some(&json!("active")));
        assert_eq!(record.address(), "Tverskaya st. 7");
        assert_eq!(record.name(), "Tverskaya kiosk");
        assert_eq!(record.kind(), Some(&json!("kiosk")));
        assert_eq!(
            record.coordinates(),
            Some(Coordinates {
                lat: 55.7575,
                lng: 37.6135
            })
        );
        assert_eq!(record.city_name(), Some("Moscow"));

        let hours = record.schedule().unwrap().unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[1].dow, Some(json!(2)));
        assert_eq!(hours[1].time_open, Some(json!("10:00")));
        assert!(hours[1].is_day(2));
        assert_eq!(record.raw(), &full_record());
    }

    #[test]
    fn accepts_string_ids() {
        let mut raw = full_record();
        raw["id"] = json!("T-17");
        let record = TerminalRecord::from_value(raw).unwrap();
        assert_eq!(record.id(), &TerminalId::Text("T-17".to_string()));
        assert_eq!(record.id().to_string(), "T-17");
    }

    #[test]
    fn rejects_records_missing_required_fields() {
        for field in ["id", "address", "address_struct", "name"] {
            let mut raw = full_record();
            raw.as_object_mut().unwrap().remove(field);

            match TerminalRecord::from_value(raw) {
                Err(TerminalError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("expected MissingField({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let raw = json!({
            "id": 7,
            "address": "Somewhere 1",
            "address_struct": {},
            "name": "Bare terminal"
        });
        let record = TerminalRecord::from_value(raw).unwrap();

        assert!(record.status_code().is_none());
        assert!(record.status().is_none());
        assert!(record.kind().is_none());
        assert!(record.lat().is_none());
        assert!(record.lng().is_none());
        assert!(record.coordinates().is_none());
        assert!(record.working_hours().is_none());
        assert!(record.schedule().is_none());
        assert!(record.city_name().is_none());
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let mut raw = full_record();
        raw["name"] = Value::Null;
        assert!(matches!(
            TerminalRecord::from_value(raw),
            Err(TerminalError::MissingField("name"))
        ));
    }

    #[test]
    fn non_object_record_is_invalid() {
        assert!(matches!(
            TerminalRecord::from_value(json!(["not", "a", "record"])),
            Err(TerminalError::InvalidRecord(_))
        ));
    }

    #[test]
    fn non_numeric_coordinates_count_as_absent() {
        let mut raw = full_record();
        raw["lat"] = json!("55.75");
        let record = TerminalRecord::from_value(raw).unwrap();

        assert!(record.lat().is_none());
        assert_eq!(record.lng(), Some(37.6135));
        assert!(record.coordinates().is_none());
    }

    #[test]
    fn mistyped_dow_is_kept_for_evaluation() {
        let mut raw = full_record();
        raw["working_hours"] = json!([
            { "dow": "5", "time_open": "09:00", "time_close": "18:00" },
            { "dow": 2.0, "time_open": "09:00", "time_close": "18:00" }
        ]);
        let record = TerminalRecord::from_value(raw).unwrap();
        let hours = record.schedule().unwrap().unwrap();

        assert_eq!(hours[0].dow, Some(json!("5")));
        assert!(!hours[0].is_day(5));
        assert!(hours[1].is_day(2));
    }

    #[test]
    fn mistyped_required_fields_are_accepted() {
        let mut raw = full_record();
        raw["id"] = json!(12.5);
        raw["address"] = json!(42);
        raw["address_struct"] = json!("Moscow, Tverskaya 7");
        raw["name"] = json!(true);
        let record = TerminalRecord::from_value(raw).unwrap();

        assert_eq!(record.id().to_string(), "12.5");
        assert_eq!(record.address(), "42");
        assert_eq!(record.name(), "true");
        assert!(record.city_name().is_none());
    }

    #[test]
    fn working_hours_that_are_not_a_list_fail_on_use() {
        let mut raw = full_record();
        raw["working_hours"] = json!("09:00-18:00");
        let record = TerminalRecord::from_value(raw).unwrap();

        assert_eq!(record.working_hours(), Some(&json!("09:00-18:00")));
        assert!(matches!(
            record.schedule(),
            Some(Err(TerminalError::MalformedSchedule(_)))
        ));
    }

    #[test]
    fn coordinates_need_both_components() {
        let mut raw = full_record();
        raw.as_object_mut().unwrap().remove("lng");
        let record = TerminalRecord::from_value(raw).unwrap();

        assert_eq!(record.lat(), Some(55.7575));
        assert!(record.coordinates().is_none());
    }

    #[test]
    fn incomplete_schedule_entries_are_kept() {
        let mut raw = full_record();
        raw["working_hours"] = json!([{ "time_open": "09:00" }]);
        let record = TerminalRecord::from_value(raw).unwrap();

        let hours = record.schedule().unwrap().unwrap();
        assert_eq!(hours[0].dow, None);
        assert_eq!(hours[0].time_close, None);
    }

    #[test]
    fn blank_city_name_counts_as_missing() {
        let mut raw = full_record();
        raw["address_struct"] = json!({ "city_name": "  " });
        let record = TerminalRecord::from_value(raw).unwrap();
        assert!(record.city_name().is_none());
    }

    #[test]
    fn availability_labels() {
        assert_eq!(Availability::Open.to_string(), "OPEN");
        assert_eq!(Availability::Closed.to_string(), "CLOSED");
        assert_eq!(Availability::Unknown.to_string(), "UNKNOWN");
    }
}
