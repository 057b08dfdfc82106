//! Base map loading from Natural Earth GeoJSON files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};

use crate::map::{LineString, Lod, MapRenderer};

/// Which base map layer a file feeds
#[derive(Debug, Clone, Copy)]
enum Target {
    Coastline(Lod),
    Border,
    State,
}

const BASEMAP_FILES: [(&str, Target); 6] = [
    ("ne_110m_coastline.json", Target::Coastline(Lod::Low)),
    ("ne_50m_coastline.json", Target::Coastline(Lod::Medium)),
    ("ne_10m_coastline.json", Target::Coastline(Lod::High)),
    ("ne_50m_borders.json", Target::Border),
    ("ne_10m_borders.json", Target::Border),
    ("ne_10m_states.json", Target::State),
];

/// Load every base map file present in `data_dir`. A file that fails to
/// parse is logged and skipped. Returns the number of files loaded.
pub fn load_basemap(renderer: &mut MapRenderer, data_dir: &Path) -> usize {
    let mut loaded = 0;
    for (filename, target) in BASEMAP_FILES {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                log::debug!("{}: {} lines", filename, lines.len());
                for line in lines {
                    match target {
                        Target::Coastline(lod) => renderer.add_coastline(line, lod),
                        Target::Border => renderer.add_border(line),
                        Target::State => renderer.add_state(line),
                    }
                }
                loaded += 1;
            }
            Err(e) => log::warn!("skipping base map file {}: {:#}", filename, e),
        }
    }
    loaded
}

fn read_lines(path: &Path) -> Result<Vec<LineString>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = content.parse()?;
    Ok(collect_lines(&geojson))
}

/// Flatten any GeoJSON into polylines. Polygons contribute their exterior ring.
pub fn collect_lines(geojson: &GeoJson) -> Vec<LineString> {
    let mut lines = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                geometry_lines(geometry, &mut lines);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(geometry) = &f.geometry {
                geometry_lines(geometry, &mut lines);
            }
        }
        GeoJson::Geometry(geometry) => geometry_lines(geometry, &mut lines),
    }
    lines
}

fn to_line(coords: &[Vec<f64>]) -> LineString {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

fn geometry_lines(geometry: &Geometry, out: &mut Vec<LineString>) {
    match &geometry.value {
        Value::LineString(coords) => out.push(to_line(coords)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(|l| to_line(l))),
        Value::Polygon(rings) => out.extend(rings.first().map(|r| to_line(r))),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| rings.first()).map(|r| to_line(r)))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                geometry_lines(g, out);
            }
        }
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

/// Coarse outline of South Asia and its neighbours, drawn when no base map
/// files are available
pub fn fallback_outline(renderer: &mut MapRenderer) {
    // Indian subcontinent, Pakistan coast to the Bay of Bengal
    renderer.add_coastline(
        vec![
            (61.6, 25.2), (66.6, 25.4), (67.4, 23.9), (68.8, 23.0),
            (70.2, 22.6), (69.0, 22.3), (70.8, 20.7), (72.6, 21.3),
            (72.8, 19.0), (73.4, 16.0), (74.4, 14.0), (74.9, 12.8),
            (75.8, 11.3), (76.6, 8.9), (77.5, 8.1), (78.2, 8.9),
            (79.0, 10.3), (79.9, 10.3), (79.9, 12.1), (80.3, 13.0),
            (80.2, 15.1), (81.3, 16.4), (82.3, 17.0), (84.2, 18.3),
            (86.9, 20.5), (87.0, 21.5), (88.9, 21.6), (90.3, 21.8),
            (91.8, 22.3), (92.3, 20.7), (94.2, 18.0), (94.5, 16.0),
            (97.6, 16.5), (98.2, 13.2),
        ],
        Lod::Low,
    );

    // Sri Lanka
    renderer.add_coastline(
        vec![
            (79.9, 9.8), (79.8, 8.0), (80.1, 6.2), (81.2, 6.2),
            (81.9, 7.5), (81.3, 8.6), (80.1, 9.8), (79.9, 9.8),
        ],
        Lod::Low,
    );

    // Arabian peninsula
    renderer.add_coastline(
        vec![
            (56.3, 26.4), (56.4, 24.9), (58.7, 23.6), (59.8, 22.5),
            (57.8, 19.0), (55.3, 17.2), (52.2, 15.9), (48.7, 14.0),
            (43.5, 12.6), (42.7, 16.0), (39.2, 21.5), (35.0, 28.0),
        ],
        Lod::Low,
    );

    // Southeast Asian mainland to south China
    renderer.add_coastline(
        vec![
            (98.2, 13.2), (98.5, 8.4), (100.3, 6.4), (101.3, 2.9),
            (103.5, 1.3), (104.2, 1.4), (103.4, 4.9), (102.2, 6.2),
            (100.3, 8.3), (99.2, 10.0), (100.0, 13.4), (100.9, 12.6),
            (102.6, 12.2), (104.8, 10.5), (106.7, 9.0), (109.2, 11.7),
            (108.8, 15.3), (106.7, 17.4), (105.7, 19.1), (107.4, 21.3),
            (110.4, 21.2), (113.6, 22.2), (117.4, 23.7), (119.6, 25.9),
            (121.9, 30.9),
        ],
        Lod::Low,
    );

    // Rough land boundary between the subcontinent and the Himalaya
    renderer.add_border(vec![
        (61.6, 25.2), (62.5, 29.4), (66.3, 29.9), (69.3, 31.9),
        (71.3, 34.0), (74.6, 37.0), (77.8, 35.5), (78.9, 32.5),
        (80.5, 30.3), (84.0, 28.6), (88.1, 27.9), (92.0, 26.9),
        (95.2, 27.8), (97.3, 28.2), (96.6, 25.6), (94.6, 24.5),
        (93.3, 22.0), (92.3, 20.7),
    ]);
}
