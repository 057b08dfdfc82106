use crate::braille::BrailleCanvas;
use crate::map::geometry::draw_line;
use crate::map::projection::Viewport;

/// A geographic polyline as (lon, lat) pairs
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for coastline data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m
    Medium, // 50m
    High,   // 10m
}

impl Lod {
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }
}

/// Base map layer toggles
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub show_borders: bool,
    pub show_states: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_borders: true,
            show_states: true,
        }
    }
}

/// Rasterised base map, one canvas per color
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub states: BrailleCanvas,
}

/// Vector base map drawn under the casualty markers
#[derive(Default)]
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders: Vec<LineString>,
    states: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finest coastline set at or below the requested LOD that has data
    fn coastlines(&self, lod: Lod) -> &[LineString] {
        let by_detail = [
            &self.coastlines_high,
            &self.coastlines_medium,
            &self.coastlines_low,
        ];
        let skip = match lod {
            Lod::High => 0,
            Lod::Medium => 1,
            Lod::Low => 2,
        };
        by_detail
            .into_iter()
            .skip(skip)
            .map(|lines| lines.as_slice())
            .find(|lines| !lines.is_empty())
            .unwrap_or(&[])
    }

    /// Draw the base map into fresh canvases of `width` x `height` cells
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport) -> MapLayers {
        let mut layers = MapLayers {
            coastlines: BrailleCanvas::new(width, height),
            borders: BrailleCanvas::new(width, height),
            states: BrailleCanvas::new(width, height),
        };

        for line in self.coastlines(Lod::from_zoom(viewport.zoom)) {
            draw_linestring(&mut layers.coastlines, line, viewport);
        }

        if self.settings.show_borders {
            for line in &self.borders {
                draw_linestring(&mut layers.borders, line, viewport);
            }
        }

        // State outlines only make sense once zoomed past country level
        if self.settings.show_states && viewport.zoom >= 4.0 {
            for line in &self.states {
                draw_linestring(&mut layers.states, line, viewport);
            }
        }

        layers
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    pub fn add_border(&mut self, line: LineString) {
        self.borders.push(line);
    }

    pub fn add_state(&mut self, line: LineString) {
        self.states.push(line);
    }

    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_states(&mut self) {
        self.settings.show_states = !self.settings.show_states;
    }
}

/// Draw a polyline, skipping segments that wrap the antimeridian or lie off-screen
fn draw_linestring(canvas: &mut BrailleCanvas, line: &[(f64, f64)], viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let p = viewport.project(lon, lat);
        if let Some(q) = prev {
            let span = ((p.0 - q.0).abs() + (p.1 - q.1).abs()) as usize;
            if span < viewport.width && viewport.line_might_be_visible(q, p) {
                draw_line(canvas, q.0, q.1, p.0, p.1);
            }
        }
        prev = Some(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::from_web_zoom(78.0, 22.0, 5.0, 80, 40)
    }

    #[test]
    fn test_coastline_lod_fallback() {
        let mut renderer = MapRenderer::new();
        assert!(!renderer.has_data());
        renderer.add_coastline(vec![(70.0, 20.0), (80.0, 25.0)], Lod::Low);
        assert!(renderer.has_data());
        assert_eq!(renderer.coastlines(Lod::High).len(), 1);

        renderer.add_coastline(vec![(70.0, 20.0), (75.0, 22.0), (80.0, 25.0)], Lod::Medium);
        assert_eq!(renderer.coastlines(Lod::High)[0].len(), 3);
        assert_eq!(renderer.coastlines(Lod::Low)[0].len(), 2);
    }

    #[test]
    fn test_render_draws_visible_lines() {
        let mut renderer = MapRenderer::new();
        renderer.add_coastline(vec![(76.0, 20.0), (80.0, 24.0)], Lod::Medium);
        let layers = renderer.render(40, 10, &viewport());
        assert!(!layers.coastlines.is_empty());
        assert!(layers.borders.is_empty());
    }

    #[test]
    fn test_toggles_hide_layers() {
        let mut renderer = MapRenderer::new();
        renderer.add_border(vec![(76.0, 20.0), (80.0, 24.0)]);
        renderer.add_state(vec![(76.0, 24.0), (80.0, 20.0)]);
        let layers = renderer.render(40, 10, &viewport());
        assert!(!layers.borders.is_empty());
        assert!(!layers.states.is_empty());

        renderer.toggle_borders();
        renderer.toggle_states();
        let layers = renderer.render(40, 10, &viewport());
        assert!(layers.borders.is_empty());
        assert!(layers.states.is_empty());
    }
}
