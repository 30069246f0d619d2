use std::io::{self, Write};

use is_terminal::IsTerminal;
use yansi::Paint;

use crate::{
    Error,
    config::LogStyle,
    tracker::{address::sanitize, state::ViewState},
};

pub const TITLE: &str = "IP Address Tracker";
pub const PLACEHOLDER: &str = "Search for any IP address or domain";

/// The address field. Its content is always sanitized.
#[derive(Debug)]
pub struct InputField {
    text: String,
}

impl InputField {
    pub fn new(initial: &str) -> Self {
        Self {
            text: sanitize(initial),
        }
    }

    /// Replaces the content with `raw`, filtered. Returns true when characters were dropped.
    pub fn edit(&mut self, raw: &str) -> bool {
        self.text = sanitize(raw);
        self.text != raw
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Styling is process wide, so it follows stdout, where the view is drawn.
pub fn init_color(style: &LogStyle) {
    if !view_color(style, io::stdout().is_terminal()) {
        yansi::disable();
    }
}

fn view_color(style: &LogStyle, stdout_is_terminal: bool) -> bool {
    style.is_color(stdout_is_terminal)
}

pub fn render_banner<W: Write>(out: &mut W) -> Result<(), Error> {
    writeln!(out)?;
    writeln!(out, "=================== {} ===================", TITLE.bold())?;
    writeln!(out, "{}", PLACEHOLDER.dim())?;
    writeln!(out, "{}", "Enter submits the field, `quit` or Ctrl-D leaves.".dim())?;
    Ok(())
}

pub fn render_state<W: Write>(out: &mut W, state: &ViewState) -> Result<(), Error> {
    writeln!(out)?;
    if let Some(message) = state.error_message() {
        writeln!(out, "  {}", message.red())?;
    }
    let result = state.result();
    for (label, value) in [
        ("IP Address", &result.ip),
        ("Location", &result.region),
        ("TimeZone", &result.timezone),
        ("ISP", &result.isp),
    ] {
        writeln!(out, "  {:<11} {}", label.dim(), value.bold())?;
    }
    Ok(())
}

pub fn render_prompt<W: Write>(out: &mut W, field: &InputField, in_flight: usize) -> Result<(), Error> {
    if in_flight > 0 {
        write!(out, "{} ", format!("({} pending)", in_flight).yellow())?;
    }
    write!(out, "{} ", format!("[{}] >", field.text()).cyan())?;
    out.flush()?;
    Ok(())
}

pub fn render_echo<W: Write>(out: &mut W, field: &InputField) -> Result<(), Error> {
    writeln!(out, "  {} {}", "using".dim(), field.text())?;
    Ok(())
}
