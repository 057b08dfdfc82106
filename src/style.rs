use ratatui::style::Color;

/// Fill colors used for casualty markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerColor {
    Green,
    Red,
    Gray,
    Orange,
    Yellow,
    ReddishOrange,
    Pink,
    Black,
}

impl MarkerColor {
    /// CSS form of the color
    pub fn css(self) -> &'static str {
        match self {
            MarkerColor::Green => "green",
            MarkerColor::Red => "red",
            MarkerColor::Gray => "#808080",
            MarkerColor::Orange => "#d6952d",
            MarkerColor::Yellow => "yellow",
            MarkerColor::ReddishOrange => "#d6572d",
            MarkerColor::Pink => "pink",
            MarkerColor::Black => "black",
        }
    }

    /// Terminal color with the same RGB value as [`css`](Self::css)
    pub fn to_tui(self) -> Color {
        match self {
            MarkerColor::Green => Color::Rgb(0x00, 0x80, 0x00),
            MarkerColor::Red => Color::Rgb(0xff, 0x00, 0x00),
            MarkerColor::Gray => Color::Rgb(0x80, 0x80, 0x80),
            MarkerColor::Orange => Color::Rgb(0xd6, 0x95, 0x2d),
            MarkerColor::Yellow => Color::Rgb(0xff, 0xff, 0x00),
            MarkerColor::ReddishOrange => Color::Rgb(0xd6, 0x57, 0x2d),
            MarkerColor::Pink => Color::Rgb(0xff, 0xc0, 0xcb),
            MarkerColor::Black => Color::Rgb(0x00, 0x00, 0x00),
        }
    }
}

/// Outcome of the animal-type color lookup. `Unresolved` is a real
/// outcome: a non-empty type matching no rule gets no fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorResolution {
    Resolved(MarkerColor),
    Unresolved,
}

impl ColorResolution {
    pub fn color(self) -> Option<MarkerColor> {
        match self {
            ColorResolution::Resolved(c) => Some(c),
            ColorResolution::Unresolved => None,
        }
    }
}

/// Ordered substring rules; first match wins
const RULES: [(&str, MarkerColor); 7] = [
    (",", MarkerColor::Red),
    ("Elephant", MarkerColor::Gray),
    ("Leopard", MarkerColor::Orange),
    ("Lion", MarkerColor::Yellow),
    ("Tiger", MarkerColor::ReddishOrange),
    ("Other", MarkerColor::Pink),
    ("n.a", MarkerColor::Black),
];

/// Fill color for a feature's `AnimalTypeGeneral`
pub fn resolve_color(animal_type: Option<&str>) -> ColorResolution {
    let animal_type = match animal_type {
        None | Some("") => return ColorResolution::Resolved(MarkerColor::Green),
        Some(s) => s,
    };

    RULES
        .iter()
        .find(|(needle, _)| animal_type.contains(needle))
        .map_or(ColorResolution::Unresolved, |&(_, color)| {
            ColorResolution::Resolved(color)
        })
}

/// Circle marker parameters shared by every casualty point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Radius in screen pixels
    pub radius: u32,
    pub stroke: MarkerColor,
    pub weight: u32,
    pub opacity: f32,
    pub fill_opacity: f32,
}

impl MarkerStyle {
    pub const DEFAULT: MarkerStyle = MarkerStyle {
        radius: 8,
        stroke: MarkerColor::Black,
        weight: 1,
        opacity: 1.0,
        fill_opacity: 0.8,
    };

    /// Radius in braille dots. A braille dot is roughly four screen pixels.
    pub fn dot_radius(&self) -> i32 {
        (self.radius as i32 / 4).max(1)
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Legend rows, top to bottom
pub const LEGEND: [(&str, MarkerColor); 6] = [
    ("Elephant", MarkerColor::Gray),
    ("Leopard", MarkerColor::Orange),
    ("Lion", MarkerColor::Yellow),
    ("Tiger", MarkerColor::ReddishOrange),
    ("Multiple", MarkerColor::Red),
    ("Others", MarkerColor::Pink),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(s: &str) -> Option<MarkerColor> {
        resolve_color(Some(s)).color()
    }

    #[test]
    fn test_empty_or_absent_is_green() {
        assert_eq!(resolve_color(None), ColorResolution::Resolved(MarkerColor::Green));
        assert_eq!(resolved(""), Some(MarkerColor::Green));
    }

    #[test]
    fn test_comma_wins() {
        assert_eq!(resolved("Elephant,Tiger"), Some(MarkerColor::Red));
        assert_eq!(resolved("Other, n.a"), Some(MarkerColor::Red));
    }

    #[test]
    fn test_single_types() {
        assert_eq!(resolved("Elephant"), Some(MarkerColor::Gray));
        assert_eq!(resolved("Leopard"), Some(MarkerColor::Orange));
        assert_eq!(resolved("Lion"), Some(MarkerColor::Yellow));
        assert_eq!(resolved("Tiger"), Some(MarkerColor::ReddishOrange));
        assert_eq!(resolved("Other"), Some(MarkerColor::Pink));
        assert_eq!(resolved("n.a"), Some(MarkerColor::Black));
        assert_eq!(resolved("Tiger").unwrap().css(), "#d6572d");
    }

    #[test]
    fn test_earlier_rule_wins_without_comma() {
        // "Elephant" is checked before "Tiger"
        assert_eq!(resolved("Elephant and Tiger"), Some(MarkerColor::Gray));
    }

    #[test]
    fn test_case_sensitive_and_unmatched() {
        assert_eq!(resolve_color(Some("tiger")), ColorResolution::Unresolved);
        assert_eq!(resolve_color(Some("Deer")), ColorResolution::Unresolved);
        assert_eq!(resolve_color(Some("Deer")).color(), None);
    }

    #[test]
    fn test_legend_matches_rules() {
        let multiple = LEGEND.iter().find(|(label, _)| *label == "Multiple").unwrap();
        assert_eq!(Some(multiple.1), resolved("Lion,Tiger"));
        for (label, color) in &LEGEND[..4] {
            assert_eq!(resolved(label), Some(*color));
        }
    }

    #[test]
    fn test_dot_radius() {
        assert_eq!(MarkerStyle::DEFAULT.dot_radius(), 2);
        let tiny = MarkerStyle { radius: 1, ..MarkerStyle::DEFAULT };
        assert_eq!(tiny.dot_radius(), 1);
    }
}
