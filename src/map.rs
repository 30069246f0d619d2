use std::{f64::consts::PI, io::Write};

use yansi::Paint;

use crate::Error;

const MAX_LATITUDE: f64 = 85.051_128_78;
const ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// The map pane. Implementations re-render when centre or zoom changes.
pub trait MapView {
    fn set_view(&mut self, center: LatLng, zoom: u8) -> Result<(), Error>;
    fn place_marker(&mut self, position: LatLng, popup: &str) -> Result<(), Error>;
}

/// Slippy-map tile containing `center` at `zoom`.
pub fn tile(center: LatLng, zoom: u8) -> (u32, u32) {
    let n = f64::from(1u32 << zoom.min(31));
    let lat = center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (center.lng + 180.0) / 360.0 * n;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n;
    let max = n - 1.0;
    (x.floor().clamp(0.0, max) as u32, y.floor().clamp(0.0, max) as u32)
}

/// Renders the map as a tile reference plus a browsable openstreetmap.org link.
pub struct TerminalMap<W> {
    out: W,
    tile_url: String,
    view: Option<(LatLng, u8)>,
    marker: Option<LatLng>,
}

impl<W: Write> TerminalMap<W> {
    pub fn new(out: W, tile_url: impl Into<String>) -> Self {
        Self {
            out,
            tile_url: tile_url.into(),
            view: None,
            marker: None,
        }
    }

    fn tile_url(&self, center: LatLng, zoom: u8) -> String {
        let (x, y) = tile(center, zoom);
        self.tile_url
            .replace("{s}", "a")
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MapView for TerminalMap<W> {
    fn set_view(&mut self, center: LatLng, zoom: u8) -> Result<(), Error> {
        if self.view == Some((center, zoom)) {
            return Ok(());
        }
        self.view = Some((center, zoom));
        self.marker = None;
        let link = format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}",
            lat = center.lat,
            lng = center.lng,
        );
        writeln!(self.out, "  {} {}", "Map".bold(), link.underline())?;
        writeln!(self.out, "  {} {}", "Tile".dim(), self.tile_url(center, zoom).dim())?;
        writeln!(self.out, "  {}", ATTRIBUTION.dim())?;
        Ok(())
    }

    fn place_marker(&mut self, position: LatLng, popup: &str) -> Result<(), Error> {
        if self.marker == Some(position) {
            return Ok(());
        }
        self.marker = Some(position);
        writeln!(
            self.out,
            "  {} {:.4}, {:.4}  {}",
            "Marker".bold(),
            position.lat,
            position.lng,
            popup.italic()
        )?;
        Ok(())
    }
}
