use std::path::PathBuf;

use clap::Parser;

use crate::map::Viewport;

pub const DEFAULT_DATASET: &str = "assets/LinearInfrastructure.json";
pub const DEFAULT_CENTER_LAT: f64 = 22.397307;
pub const DEFAULT_CENTER_LON: f64 = 78.482909;
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Command-line options. Nothing is persisted between sessions.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "casualty-map",
    about = "Map of animal casualties along roads, railways and canals"
)]
pub struct Config {
    /// JSON array of casualty records
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: PathBuf,

    /// Directory holding Natural Earth GeoJSON files for the base map
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Latitude of the initial map center
    #[arg(long, default_value_t = DEFAULT_CENTER_LAT, allow_negative_numbers = true)]
    pub center_lat: f64,

    /// Longitude of the initial map center
    #[arg(long, default_value_t = DEFAULT_CENTER_LON, allow_negative_numbers = true)]
    pub center_lon: f64,

    /// Initial zoom as a web map zoom level
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: f64,

    /// Write log output here instead of the terminal
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            data_dir: PathBuf::from("data"),
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            zoom: DEFAULT_ZOOM,
            log_file: None,
        }
    }
}

impl Config {
    /// Starting viewport for a canvas of `width` x `height` dots
    pub fn initial_viewport(&self, width: usize, height: usize) -> Viewport {
        Viewport::from_web_zoom(self.center_lon, self.center_lat, self.zoom, width, height)
    }
}
