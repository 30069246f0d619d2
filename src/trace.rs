use chrono::{Local, SecondsFormat};
use is_terminal::IsTerminal;
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, time},
    prelude::*,
};

use crate::{Error, config::Log};

/// Installs the stderr subscriber. stdout belongs to the rendered view,
/// whose colour is decided separately in `ui::init_color`.
pub fn init(log: &Log) -> Result<(), Error> {
    let color = log.style.is_color(std::io::stderr().is_terminal());
    let filter = targets(&log.level)?;
    let format = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(LocalTime)
        .with_ansi(color)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .try_init()
        .map_err(|e| Error::config(e.to_string()))
}

fn targets(level: &str) -> Result<Targets, Error> {
    level
        .parse()
        .map_err(|e| Error::config(format!("log level {:?} did not parse: {}", level, e)))
}

struct LocalTime;

impl time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
        )
    }
}
