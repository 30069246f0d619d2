use isahc::http::StatusCode;
use serde::Deserialize;

use crate::Error;

use super::state::LookupResult;

pub trait ResponseParser: Send + Sync {
    fn parse(&self, status: StatusCode, body: &str) -> Result<LookupResult, Error>;
}

#[derive(Deserialize, Debug)]
struct Located {
    ip: String,
    isp: String,
    location: Location,
}

#[derive(Deserialize, Debug)]
struct Location {
    city: String,
    timezone: String,
    lat: f64,
    lng: f64,
}

#[derive(Deserialize, Debug)]
struct Rejected {
    messages: Messages,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl From<Messages> for String {
    fn from(messages: Messages) -> Self {
        match messages {
            Messages::One(message) => message,
            Messages::Many(messages) => messages.join(","),
        }
    }
}

impl From<Located> for LookupResult {
    fn from(located: Located) -> Self {
        let Located { ip, isp, location } = located;
        Self {
            ip,
            isp,
            region: location.city,
            timezone: format!("UTC{}", location.timezone),
            lat: location.lat,
            lng: location.lng,
        }
    }
}

/// Parser for the ipify geolocation API (`country,city` product).
#[derive(Default, Clone, Copy)]
pub struct IpifyParser;

impl IpifyParser {
    /// A JSON body carrying `messages` becomes that message. Other JSON
    /// gives an API error without a reason; anything else is malformed.
    fn rejection(status: StatusCode, body: &str) -> Error {
        let value = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value,
            Err(err) => return err.into(),
        };
        match serde_json::from_value::<Rejected>(value) {
            Ok(rejected) => Error::api(status, Some(rejected.messages.into())),
            Err(_) => Error::api(status, None),
        }
    }
}

impl ResponseParser for IpifyParser {
    fn parse(&self, status: StatusCode, body: &str) -> Result<LookupResult, Error> {
        if status != StatusCode::OK {
            return Err(Self::rejection(status, body));
        }
        match serde_json::from_str::<Located>(body) {
            Ok(located) => Ok(located.into()),
            Err(_) => Err(Self::rejection(status, body)),
        }
    }
}
