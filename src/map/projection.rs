use std::f64::consts::PI;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 256.0;
const ZOOM_STEP: f64 = 1.5;

/// Normalized Web-Mercator x in [0, 1)
#[inline]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Normalized Web-Mercator y, 0 at the north edge
#[inline]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

#[inline]
fn mercator_lon(x: f64) -> f64 {
    x * 360.0 - 180.0
}

#[inline]
fn mercator_lat(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}

/// Visible map area in braille dots, Web-Mercator projected.
/// At `zoom == 1.0` the whole world is one canvas wide.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    /// Canvas width in dots
    pub width: usize,
    /// Canvas height in dots
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat: center_lat.clamp(-85.0, 85.0),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Build from a slippy-map zoom level. Level `z` shows about as much of
    /// the world as a browser map of ~1000px at the same level: `2^(z-2)`.
    pub fn from_web_zoom(center_lon: f64, center_lat: f64, level: f64, width: usize, height: usize) -> Self {
        Self::new(center_lon, center_lat, 2f64.powf(level - 2.0), width, height)
    }

    /// Slippy-map zoom level equivalent to the current zoom factor
    pub fn web_zoom(&self) -> f64 {
        self.zoom.log2() + 2.0
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Move the center to normalized Mercator (x, y), wrapping longitude
    fn set_center_mercator(&mut self, x: f64, y: f64) {
        let mut lon = mercator_lon(x);
        if lon > 180.0 {
            lon -= 360.0;
        } else if lon < -180.0 {
            lon += 360.0;
        }
        self.center_lon = lon;
        self.center_lat = mercator_lat(y).clamp(-85.0, 85.0);
    }

    /// Pan by a delta in dots
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.scale();
        self.set_center_mercator(
            mercator_x(self.center_lon) + dx as f64 / scale,
            mercator_y(self.center_lat) + dy as f64 / scale,
        );
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in keeping the point under (px, py) fixed
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Re-center so (lon, lat) lands back under the cursor
        let scale = self.scale();
        self.set_center_mercator(
            mercator_x(lon) - (px as f64 - self.width as f64 / 2.0) / scale,
            mercator_y(lat) - (py as f64 - self.height as f64 / 2.0) / scale,
        );
    }

    /// Geographic (lon, lat) to dot coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let scale = self.scale();
        let x = (mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0;
        let y = (mercator_y(lat) - mercator_y(self.center_lat)) * scale + self.height as f64 / 2.0;
        (x as i32, y as i32)
    }

    /// Dot coordinates back to geographic (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.scale();
        let x = (px as f64 - self.width as f64 / 2.0) / scale + mercator_x(self.center_lon);
        let y = (py as f64 - self.height as f64 / 2.0) / scale + mercator_y(self.center_lat);

        (mercator_lon(x), mercator_lat(y))
    }

    /// Whether a dot is on (or just off) the canvas
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Rough bounding-box test for a segment
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        p1.0.max(p2.0) >= 0
            && p1.0.min(p2.0) < self.width as i32
            && p1.1.max(p2.1) >= 0
            && p1.1.min(p2.1) < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_initial_view_centers_on_india() {
        let vp = Viewport::from_web_zoom(78.482909, 22.397307, 5.0, 200, 120);
        assert_eq!(vp.zoom, 8.0);
        assert!((vp.web_zoom() - 5.0).abs() < 1e-9);
        assert_eq!(vp.project(78.482909, 22.397307), (100, 60));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::from_web_zoom(78.0, 22.0, 5.0, 400, 200);
        let (px, py) = vp.project(80.0, 20.0);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon - 80.0).abs() < 0.25);
        assert!((lat - 20.0).abs() < 0.25);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
        vp.pan(0, -1000);
        assert_eq!(vp.center_lat, 85.0);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut vp = Viewport::from_web_zoom(78.0, 22.0, 5.0, 400, 200);
        let before = vp.unproject(300, 50);
        vp.zoom_in_at(300, 50);
        let after = vp.unproject(300, 50);
        assert!((before.0 - after.0).abs() < 0.5);
        assert!((before.1 - after.1).abs() < 0.5);
    }

    #[test]
    fn test_zoom_out_at_keeps_anchor_latitude() {
        let mut vp = Viewport::from_web_zoom(78.0, 22.0, 5.0, 400, 200);
        let before = vp.unproject(20, 180);
        vp.zoom_out_at(20, 180);
        let after = vp.unproject(20, 180);
        assert!((before.0 - after.0).abs() < 0.5);
        assert!((before.1 - after.1).abs() < 0.5);
    }

    #[test]
    fn test_pan_moves_point_by_dots() {
        let mut vp = Viewport::from_web_zoom(78.0, 22.0, 5.0, 400, 200);
        let (px, py) = vp.project(80.0, 30.0);
        vp.pan(0, 40);
        let (qx, qy) = vp.project(80.0, 30.0);
        assert!((qx - px).abs() <= 1);
        assert!((py - 40 - qy).abs() <= 1);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::new(0.0, 0.0, MIN_ZOOM, 100, 100);
        vp.zoom_out();
        assert_eq!(vp.zoom, MIN_ZOOM);
    }
}
