use std::sync::Arc;

use crate::braille::BrailleCanvas;
use crate::casualty::{Feature, FeatureCollection};
use crate::map::geometry::draw_circle;
use crate::map::projection::Viewport;
use crate::style::{resolve_color, ColorResolution, MarkerStyle};

/// Something drawn on the map from a feature collection. Rendering
/// replaces whatever the layer held before.
pub trait Layer {
    fn render(&mut self, collection: &FeatureCollection);
    fn dispose(&mut self);
}

/// A feature paired with its resolved fill
#[derive(Debug, Clone)]
pub struct Marker {
    pub feature: Arc<Feature>,
    pub fill: ColorResolution,
}

/// Circle markers for the currently displayed casualties
#[derive(Debug, Default)]
pub struct CasualtyLayer {
    markers: Vec<Marker>,
    style: MarkerStyle,
}

impl Layer for CasualtyLayer {
    fn render(&mut self, collection: &FeatureCollection) {
        self.dispose();
        self.markers.extend(collection.iter().map(|feature| Marker {
            fill: resolve_color(feature.properties.animal_type_general()),
            feature: Arc::clone(feature),
        }));
    }

    fn dispose(&mut self) {
        self.markers.clear();
    }
}

impl CasualtyLayer {
    pub fn new(style: MarkerStyle) -> Self {
        Self {
            markers: Vec::new(),
            style,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Rasterise markers into one canvas per fill, ordered by first
    /// appearance so later groups paint over earlier ones
    pub fn rasterize(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
    ) -> Vec<(ColorResolution, BrailleCanvas)> {
        let radius = self.style.dot_radius();
        let mut groups: Vec<(ColorResolution, BrailleCanvas)> = Vec::new();

        for marker in &self.markers {
            let (px, py) = viewport.project(marker.feature.lon(), marker.feature.lat());
            if !viewport.is_visible(px, py) {
                continue;
            }

            let idx = match groups.iter().position(|(fill, _)| *fill == marker.fill) {
                Some(idx) => idx,
                None => {
                    groups.push((marker.fill, BrailleCanvas::new(width, height)));
                    groups.len() - 1
                }
            };
            draw_circle(&mut groups[idx].1, px, py, radius);
        }

        groups
    }

    /// Feature under the dot (px, py): the closest marker within its
    /// radius, preferring the one drawn last on ties. Only markers that
    /// `rasterize` would draw can be hit.
    pub fn hit_test(&self, viewport: &Viewport, px: i32, py: i32) -> Option<&Arc<Feature>> {
        let reach = i64::from(self.style.dot_radius() + 1);
        let reach2 = reach * reach;

        self.markers
            .iter()
            .rev()
            .filter_map(|marker| {
                let (mx, my) = viewport.project(marker.feature.lon(), marker.feature.lat());
                if !viewport.is_visible(mx, my) {
                    return None;
                }
                let dx = i64::from(mx) - i64::from(px);
                let dy = i64::from(my) - i64::from(py);
                let d2 = dx * dx + dy * dy;
                (d2 <= reach2).then_some((d2, &marker.feature))
            })
            .fold(None, |best: Option<(i64, &Arc<Feature>)>, hit| match best {
                Some(b) if b.0 <= hit.0 => Some(b),
                _ => Some(hit),
            })
            .map(|(_, feature)| feature)
    }
}
