use std::sync::Arc;

use ratatui::layout::Rect;

use crate::casualty::{Feature, FeatureCollection, FeatureStore};
use crate::config::Config;
use crate::error::LoadError;
use crate::filter::{Dimension, FilterChange, FilterSelection};
use crate::map::{CasualtyLayer, Layer, Lod, MapRenderer, Viewport};
use crate::overlay::{FilterControls, Legend, Overlay};
use crate::style::MarkerStyle;
use crate::ui;

/// Where the dataset load stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Detail card for a clicked casualty
#[derive(Debug, Clone)]
pub struct Popup {
    pub feature: Arc<Feature>,
}

impl Popup {
    pub fn animal_type(&self) -> &str {
        self.feature.properties.animal_type_general().unwrap_or_default()
    }

    pub fn infrastructure(&self) -> &str {
        self.feature
            .properties
            .linear_infrastructure_type()
            .unwrap_or_default()
    }

    pub fn heading(&self) -> &str {
        self.feature.properties.short_heading().unwrap_or_default()
    }

    pub fn source(&self) -> &str {
        self.feature.properties.source().unwrap_or_default()
    }
}

/// Terminal cells to braille dots, accounting for the one-cell map border
fn cell_to_dot(col: u16, row: u16) -> (i32, i32) {
    (
        col.saturating_sub(1) as i32 * 2,
        row.saturating_sub(1) as i32 * 4,
    )
}

/// Dot size of the map area inside a terminal of `width` x `height` cells
fn map_dots(width: usize, height: usize) -> (usize, usize) {
    // 2 columns of border; 2 rows of border plus the status bar
    (width.saturating_sub(2) * 2, height.saturating_sub(3) * 4)
}

/// Application state
pub struct App {
    pub viewport: Viewport,
    initial_viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub store: FeatureStore,
    pub selection: FilterSelection,
    pub layer: CasualtyLayer,
    pub controls: FilterControls,
    pub legend: Legend,
    pub popup: Option<Popup>,
    pub load_state: LoadState,
    pub should_quit: bool,
    /// Terminal area in cells
    area: Rect,
    /// Last mouse position while the left button is held
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    dragged: bool,
}

impl App {
    pub fn new(config: &Config, width: usize, height: usize) -> Self {
        let (dots_w, dots_h) = map_dots(width, height);
        let viewport = config.initial_viewport(dots_w, dots_h);

        Self {
            initial_viewport: viewport.clone(),
            viewport,
            map_renderer: MapRenderer::new(),
            store: FeatureStore::new(),
            selection: FilterSelection::default(),
            layer: CasualtyLayer::new(MarkerStyle::DEFAULT),
            controls: FilterControls::new(),
            legend: Legend::new(),
            popup: None,
            load_state: LoadState::Loading,
            should_quit: false,
            area: Rect::new(0, 0, width as u16, height as u16),
            last_mouse: None,
            mouse_pos: None,
            dragged: false,
        }
    }

    /// Take the one-time dataset result. Controls and legend are only
    /// wired once features are on the map.
    pub fn on_dataset_loaded(&mut self, result: Result<FeatureCollection, LoadError>) {
        match result {
            Ok(features) => {
                log::info!("dataset loaded: {} features", features.len());
                self.store.replace_original(features, &self.selection);
                self.layer.render(self.store.current());
                self.controls.mount();
                self.legend.mount();
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                log::error!("dataset unavailable, map stays empty: {}", e);
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Apply a control change: update the selection, refilter, rebuild the layer
    pub fn on_filter_change(&mut self, change: FilterChange) {
        match self.selection.updated(&change) {
            Ok(selection) => {
                self.selection = selection;
                let current = self.store.refilter(&self.selection);
                self.layer.render(current);
                // the popup belonged to the old layer
                self.popup = None;
                log::debug!(
                    "{} = {}: showing {} of {}",
                    change.dimension,
                    change.value,
                    self.store.current().len(),
                    self.store.original().len()
                );
            }
            Err(e) => log::warn!("ignoring filter change: {}", e),
        }
    }

    /// Step a filter control; no-op until the controls are mounted
    pub fn cycle_filter(&mut self, dimension: Dimension, forward: bool) {
        if let Some(change) = self.controls.cycle(dimension, forward) {
            self.on_filter_change(change);
        }
    }

    /// Left click at a terminal cell: a control row, a panel, a marker, or
    /// empty map. Panels swallow their clicks.
    pub fn click_at(&mut self, col: u16, row: u16) {
        if self.controls.is_mounted() {
            if let Some(dimension) = ui::control_row_at(col, row) {
                self.cycle_filter(dimension, true);
                return;
            }
        }
        if ui::panel_at(self, self.area, col, row) {
            return;
        }

        let (px, py) = cell_to_dot(col, row);
        self.popup = self
            .layer
            .hit_test(&self.viewport, px, py)
            .map(|feature| Popup {
                feature: Arc::clone(feature),
            });
    }

    pub fn close_popup(&mut self) -> bool {
        self.popup.take().is_some()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.area = Rect::new(0, 0, width as u16, height as u16);
        let (dots_w, dots_h) = map_dots(width, height);
        self.viewport.width = dots_w;
        self.viewport.height = dots_h;
        self.initial_viewport.width = dots_w;
        self.initial_viewport.height = dots_h;
    }

    /// Back to the starting view. Filters and data are kept.
    pub fn reset_view(&mut self) {
        self.viewport = self.initial_viewport.clone();
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_dot(col, row);
        self.viewport.zoom_in_at(px, py);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_dot(col, row);
        self.viewport.zoom_out_at(px, py);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn press(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Pan along with a left-button drag
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = last_col as i32 - col as i32;
            let dy = last_row as i32 - row as i32;
            if dx != 0 || dy != 0 {
                self.dragged = true;
                // one cell is 2x4 dots
                self.pan(dx * 2, dy * 4);
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Button released: a press without movement counts as a click
    pub fn release(&mut self, col: u16, row: u16) {
        let clicked = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if clicked {
            self.click_at(col, row);
        }
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| cell_to_dot(col, row))
    }

    pub fn zoom_level(&self) -> String {
        format!("z{:.1}", self.viewport.web_zoom())
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.2}°{}, {:.2}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn lod_level(&self) -> &'static str {
        Lod::from_zoom(self.viewport.zoom).label()
    }

    /// "shown/total" feature counts
    pub fn feature_counts(&self) -> (usize, usize) {
        (self.store.current().len(), self.store.original().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casualty::parse_records;
    use crate::filter::{AnimalFilter, InfrastructureFilter};

    const DATASET: &str = r#"[
        {"Latitude": 9999, "Longitude": 80, "State": "X"},
        {"Latitude": 22.4, "Longitude": 78.5, "State": "Madhya Pradesh",
         "AnimalTypeGeneral": "Tiger", "LinearInfrastructureType": "Road",
         "ShortHeading": "Tigress killed crossing highway",
         "Source": "https://example.org/tigress"},
        {"Latitude": 26.1, "Longitude": 91.7, "State": "Assam",
         "AnimalTypeGeneral": "Elephant", "LinearInfrastructureType": "Railway",
         "ShortHeading": "Elephants hit by train", "Source": "https://example.org/rail"}
    ]"#;

    /// Top-left corner of the filter panel
    const CONTROLS_BORDER: (u16, u16) = (2, 1);

    fn app() -> App {
        App::new(&Config::default(), 120, 40)
    }

    fn loaded_app() -> App {
        let mut app = app();
        let features = parse_records(&mut DATASET.as_bytes().to_vec());
        app.on_dataset_loaded(features);
        app
    }

    /// Terminal cell over a geographic point
    fn cell_of(app: &App, lon: f64, lat: f64) -> (u16, u16) {
        let (px, py) = app.viewport.project(lon, lat);
        ((px / 2 + 1) as u16, (py / 4 + 1) as u16)
    }

    #[test]
    fn test_initial_state() {
        let app = app();
        assert_eq!(app.load_state, LoadState::Loading);
        assert!(!app.controls.is_mounted());
        assert!(!app.legend.is_mounted());
        assert!(app.layer.is_empty());
        assert_eq!(app.viewport.width, 236);
        assert_eq!(app.viewport.height, 148);
    }

    #[test]
    fn test_load_success_wires_controls() {
        let app = loaded_app();
        assert_eq!(app.load_state, LoadState::Ready);
        assert_eq!(app.feature_counts(), (2, 2));
        assert_eq!(app.layer.len(), 2);
        assert!(app.controls.is_mounted());
        assert!(app.legend.is_mounted());
    }

    #[test]
    fn test_load_failure_leaves_blank_map() {
        let mut app = app();
        app.on_dataset_loaded(Err(LoadError::Disconnected));
        assert!(matches!(app.load_state, LoadState::Failed(_)));
        assert!(app.layer.is_empty());
        assert!(!app.controls.is_mounted());

        // filters are unusable
        app.cycle_filter(Dimension::Animal, true);
        assert_eq!(app.selection, FilterSelection::default());
    }

    #[test]
    fn test_filter_change_rebuilds_layer() {
        let mut app = loaded_app();
        app.cycle_filter(Dimension::Animal, true);
        assert_eq!(app.selection.animal, AnimalFilter::Elephant);
        assert_eq!(app.feature_counts(), (1, 2));
        assert_eq!(app.layer.len(), 1);

        app.on_filter_change(FilterChange::new(Dimension::Infrastructure, "Road"));
        assert_eq!(app.selection.infrastructure, InfrastructureFilter::Road);
        assert!(app.layer.is_empty());

        app.on_filter_change(FilterChange::new(Dimension::Animal, "All"));
        assert_eq!(app.layer.len(), 1);
    }

    #[test]
    fn test_unknown_filter_value_ignored() {
        let mut app = loaded_app();
        app.on_filter_change(FilterChange::new(Dimension::Animal, "Dodo"));
        assert_eq!(app.selection, FilterSelection::default());
        assert_eq!(app.layer.len(), 2);
    }

    #[test]
    fn test_click_marker_opens_popup() {
        let mut app = loaded_app();
        let (col, row) = cell_of(&app, 78.5, 22.4);
        app.press(col, row);
        app.release(col, row);

        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.animal_type(), "Tiger");
        assert_eq!(popup.infrastructure(), "Road");
        assert_eq!(popup.heading(), "Tigress killed crossing highway");
        assert_eq!(popup.source(), "https://example.org/tigress");

        // clicking empty map closes it
        app.click_at(col + 30, row + 10);
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut app = loaded_app();
        let (col, row) = cell_of(&app, 78.5, 22.4);
        let before = app.viewport.center_lon;
        app.press(col + 5, row);
        app.handle_drag(col, row);
        app.release(col, row);
        assert!(app.popup.is_none());
        assert!(app.viewport.center_lon > before);
    }

    #[test]
    fn test_filter_change_closes_popup() {
        let mut app = loaded_app();
        let (col, row) = cell_of(&app, 78.5, 22.4);
        app.click_at(col, row);
        assert!(app.popup.is_some());
        app.cycle_filter(Dimension::Infrastructure, true);
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_click_control_row_cycles_filter() {
        let mut app = loaded_app();
        let (col, row) = ui::control_row_origin(Dimension::Infrastructure);
        app.click_at(col, row);
        assert_eq!(app.selection.infrastructure, InfrastructureFilter::Railway);
        assert_eq!(app.feature_counts(), (1, 2));
    }

    #[test]
    fn test_legend_click_does_not_reach_marker_beneath() {
        // a casualty placed right under a legend row
        let (col, row) = (5, 8);
        let (px, py) = cell_to_dot(col, row);
        let (lon, lat) = app().viewport.unproject(px, py);
        let json = format!(
            r#"[{{"Latitude": {}, "Longitude": {}, "State": "Kerala",
                 "AnimalTypeGeneral": "Elephant", "ShortHeading": "hidden"}},
                {{"Latitude": 22.4, "Longitude": 78.5, "State": "Madhya Pradesh",
                 "AnimalTypeGeneral": "Tiger", "ShortHeading": "visible"}}]"#,
            lat, lon
        );
        let mut app = app();
        app.on_dataset_loaded(parse_records(&mut json.into_bytes()));
        assert!(app.layer.hit_test(&app.viewport, px, py).is_some());

        app.click_at(col, row);
        assert!(app.popup.is_none());

        let (tiger_col, tiger_row) = cell_of(&app, 78.5, 22.4);
        app.click_at(tiger_col, tiger_row);
        app.click_at(col, row);
        assert_eq!(app.popup.as_ref().unwrap().heading(), "visible");

        // filter panel border
        app.click_at(CONTROLS_BORDER.0, CONTROLS_BORDER.1);
        assert_eq!(app.popup.as_ref().unwrap().heading(), "visible");
        assert_eq!(app.selection, FilterSelection::default());
    }

    #[test]
    fn test_click_inside_popup_keeps_it_open() {
        let mut app = loaded_app();
        let (col, row) = cell_of(&app, 78.5, 22.4);
        app.click_at(col, row);
        assert!(app.popup.is_some());

        // 120x40 terminal: popup spans columns 24..96, rows 30..38
        app.click_at(30, 33);
        assert!(app.popup.is_some());

        app.close_popup();
        app.click_at(30, 33);
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_reset_view() {
        let mut app = loaded_app();
        app.pan(40, 12);
        app.zoom_in();
        app.reset_view();
        assert_eq!(app.viewport, app.initial_viewport);
    }
}
