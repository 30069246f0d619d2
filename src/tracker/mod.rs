use std::io::{self, Write};

use futures_util::{StreamExt, stream::FuturesUnordered};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub mod address;
mod geolocation;
mod http_client;
pub mod lookup;
mod parser;
pub mod state;

pub use crate::Error;

use crate::{
    config::Config,
    map::{LatLng, MapView, TerminalMap},
    ui::{self, InputField},
};

use self::{
    geolocation::{Geolocate, GeolocationClient},
    state::ViewState,
};

const QUIT: &str = "quit";

pub async fn launch(config: &Config) -> Result<(), Error> {
    info!("IP tracker start");
    ui::init_color(&config.log.style);
    let client = GeolocationClient::from_config(&config.api)?;
    let map = TerminalMap::new(io::stdout(), config.map.tiles.as_str());
    let worker = TrackerWorker::new(&client, io::stdout(), map, config);
    worker.run(BufReader::new(tokio::io::stdin())).await?;
    info!("IP tracker stop");
    Ok(())
}

/// Owns the view state and is its only writer. Lookups run concurrently and
/// are applied in the order they complete.
struct TrackerWorker<'a, G, W, M> {
    geolocator: &'a G,
    out: W,
    map: M,
    state: ViewState,
    field: InputField,
    zoom: u8,
    popup: &'a str,
}

impl<'a, G, W, M> TrackerWorker<'a, G, W, M>
where
    G: Geolocate,
    W: Write,
    M: MapView,
{
    fn new(geolocator: &'a G, out: W, map: M, config: &'a Config) -> Self {
        Self {
            geolocator,
            out,
            map,
            state: ViewState::default(),
            field: InputField::new(&config.default_address),
            zoom: config.map.zoom,
            popup: &config.map.popup,
        }
    }

    async fn run<R>(mut self, input: R) -> Result<(), Error>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut in_flight = FuturesUnordered::new();
        let mut closed = false;
        ui::render_banner(&mut self.out)?;
        self.render()?;
        loop {
            if !closed {
                ui::render_prompt(&mut self.out, &self.field, in_flight.len())?;
            }
            tokio::select! {
                biased;
                Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                    lookup::complete(&mut self.state, outcome);
                    self.render()?;
                },
                line = lines.next_line(), if !closed => {
                    let Some(line) = line? else {
                        closed = true;
                        continue;
                    };
                    let line = line.trim();
                    if line == QUIT {
                        break;
                    }
                    if !line.is_empty() && self.field.edit(line) {
                        ui::render_echo(&mut self.out, &self.field)?;
                    }
                    match lookup::begin(&mut self.state, self.field.text()) {
                        Some(address) => {
                            debug!("submit {}", address);
                            let geolocator = self.geolocator;
                            in_flight.push(async move { geolocator.locate(&address).await });
                        }
                        None => self.render()?,
                    }
                },
                else => break,
            }
        }
        if !in_flight.is_empty() {
            debug!("dropping {} pending lookups", in_flight.len());
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn render(&mut self) -> Result<(), Error> {
        ui::render_state(&mut self.out, &self.state)?;
        let center: LatLng = self.state.result().center().into();
        self.map.set_view(center, self.zoom)?;
        self.map.place_marker(center, self.popup)?;
        Ok(())
    }
}
