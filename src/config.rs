use std::{borrow::Cow, fmt};

use config::{Config as ConfigLoader, Environment};
use once_cell::sync::Lazy;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{Error, tracker::address::sanitize};

const PREFIX: &str = "IPTRACKER";

pub static CONFIG: Lazy<Config> = Lazy::new(|| init_config());

#[derive(Debug, Default)]
pub enum LogStyle {
    #[default]
    Auto,
    Always,
    Never,
}

impl LogStyle {
    /// `is_terminal` is the answer for the stream being written.
    pub fn is_color(&self, is_terminal: bool) -> bool {
        match self {
            LogStyle::Auto => is_terminal,
            LogStyle::Always => true,
            LogStyle::Never => false,
        }
    }
}

impl<'de> Deserialize<'de> for LogStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?.to_lowercase();
        match s.as_str() {
            "auto" => Ok(LogStyle::Auto),
            "always" => Ok(LogStyle::Always),
            "never" => Ok(LogStyle::Never),
            _ => Err(serde::de::Error::unknown_field(
                &s,
                &["auto", "always", "never"],
            )),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Log {
    pub level: String,
    pub style: LogStyle,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: Self::level(),
            style: LogStyle::default(),
        }
    }
}

impl Log {
    fn level() -> String {
        String::from("ip_tracker=info")
    }
}

#[derive(Deserialize, Validate)]
#[serde(default)]
pub struct Api {
    #[validate(url)]
    pub endpoint: String,
    #[validate(length(min = 1, message = "IPTRACKER_API_KEY must be set"))]
    pub key: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://geo.ipify.org/api/v2/country,city"),
            key: String::new(),
        }
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("endpoint", &self.endpoint)
            .field("key_set", &!self.key.is_empty())
            .finish()
    }
}

#[derive(Deserialize, Validate, Debug)]
#[serde(default)]
pub struct Map {
    #[validate(range(max = 19))]
    pub zoom: u8,
    #[validate(custom(function = "validate_tiles"))]
    pub tiles: String,
    pub popup: String,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            zoom: 13,
            tiles: String::from("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"),
            popup: String::from("A pretty CSS3 popup. Easily customizable."),
        }
    }
}

fn validate_tiles(url: &str) -> Result<(), ValidationError> {
    let missing: Vec<_> = ["{z}", "{x}", "{y}"]
        .into_iter()
        .filter(|p| !url.contains(*p))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let mut error = ValidationError::new("tiles");
    error.message = Some(Cow::Owned(format!(
        "tile url template is missing {}",
        missing.join(", ")
    )));
    Err(error)
}

fn validate_default_address(address: &str) -> Result<(), ValidationError> {
    if sanitize(address) == address {
        return Ok(());
    }
    let mut error = ValidationError::new("default_address");
    error.message = Some(Cow::Borrowed("may only contain digits and dots"));
    Err(error)
}

#[derive(Deserialize, Validate, Debug)]
#[serde(default)]
pub struct Config {
    pub log: Log,
    #[validate(nested)]
    pub api: Api,
    #[validate(nested)]
    pub map: Map,
    #[validate(custom(function = "validate_default_address"))]
    pub default_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log: Log::default(),
            api: Api::default(),
            map: Map::default(),
            default_address: Self::default_address(),
        }
    }
}

impl Config {
    fn default_address() -> String {
        String::from("4.4.4.4")
    }

    pub fn load() -> Result<Self, Error> {
        let config = ConfigLoader::builder()
            .add_source(
                Environment::with_prefix(PREFIX)
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::with_prefix(PREFIX)
                    .separator("__")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()
            .and_then(|cfg| cfg.try_deserialize::<Config>())
            .map_err(|e| Error::config(e.to_string()))?;
        config
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;
        Ok(config)
    }
}

pub fn init_config() -> Config {
    match Config::load() {
        Ok(config) => {
            eprintln!("{:#?}", config);
            config
        }
        Err(err) => {
            panic!("{}", err);
        }
    }
}
