//! Panels drawn over the map: the color legend and the filter controls.

use strum::VariantArray;

use crate::filter::{AnimalFilter, Dimension, FilterChange, InfrastructureFilter};
use crate::style::{MarkerColor, LEGEND};

/// A panel that can be attached to and detached from the map
pub trait Overlay {
    fn mount(&mut self);
    fn unmount(&mut self);
    fn is_mounted(&self) -> bool;
}

/// Static list of the marker color categories
#[derive(Debug, Default)]
pub struct Legend {
    mounted: bool,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &'static [(&'static str, MarkerColor)] {
        &LEGEND
    }
}

impl Overlay for Legend {
    fn mount(&mut self) {
        self.mounted = true;
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

/// Step through `options` from `current`, wrapping at both ends
fn step<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let len = options.len();
    let idx = options.iter().position(|&o| o == current).unwrap_or(0);
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    options[next]
}

/// The Animal and Infrastructure pickers. Each holds its own selected
/// option and reports changes as [`FilterChange`]s.
#[derive(Debug, Default)]
pub struct FilterControls {
    mounted: bool,
    animal: AnimalFilter,
    infrastructure: InfrastructureFilter,
}

impl FilterControls {
    /// Dimensions with a control, in display order
    pub const ROWS: [Dimension; 2] = [Dimension::Animal, Dimension::Infrastructure];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn animal(&self) -> AnimalFilter {
        self.animal
    }

    pub fn infrastructure(&self) -> InfrastructureFilter {
        self.infrastructure
    }

    /// Label of the option currently shown for `dimension`
    pub fn shown(&self, dimension: Dimension) -> Option<&'static str> {
        match dimension {
            Dimension::Animal => Some(self.animal.label()),
            Dimension::Infrastructure => Some(self.infrastructure.label()),
            Dimension::State => None,
        }
    }

    /// Move a control to its next (or previous) option. Nothing happens
    /// while unmounted or for a dimension without a control.
    pub fn cycle(&mut self, dimension: Dimension, forward: bool) -> Option<FilterChange> {
        if !self.mounted {
            return None;
        }
        let value = match dimension {
            Dimension::Animal => {
                self.animal = step(AnimalFilter::VARIANTS, self.animal, forward);
                self.animal.to_string()
            }
            Dimension::Infrastructure => {
                self.infrastructure =
                    step(InfrastructureFilter::VARIANTS, self.infrastructure, forward);
                self.infrastructure.to_string()
            }
            Dimension::State => return None,
        };
        Some(FilterChange::new(dimension, value))
    }
}

impl Overlay for FilterControls {
    fn mount(&mut self) {
        self.mounted = true;
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmounted_controls_emit_nothing() {
        let mut controls = FilterControls::new();
        assert!(controls.cycle(Dimension::Animal, true).is_none());
        assert_eq!(controls.animal(), AnimalFilter::All);
    }

    #[test]
    fn test_cycle_emits_option_values() {
        let mut controls = FilterControls::new();
        controls.mount();
        let change = controls.cycle(Dimension::Animal, true).unwrap();
        assert_eq!(change, FilterChange::new(Dimension::Animal, "Elephant"));

        let change = controls.cycle(Dimension::Animal, false).unwrap();
        assert_eq!(change.value, "All");

        // wraps backwards to the last option
        let change = controls.cycle(Dimension::Animal, false).unwrap();
        assert_eq!(change.value, "n.a");
        assert_eq!(controls.shown(Dimension::Animal), Some("NA"));
    }

    #[test]
    fn test_infrastructure_wraps_forward() {
        let mut controls = FilterControls::new();
        controls.mount();
        let values: Vec<_> = (0..5)
            .map(|_| controls.cycle(Dimension::Infrastructure, true).unwrap().value)
            .collect();
        assert_eq!(values, vec!["Railway", "Electric", "Road", "Canal", "All"]);
    }

    #[test]
    fn test_no_state_control() {
        let mut controls = FilterControls::new();
        controls.mount();
        assert!(controls.cycle(Dimension::State, true).is_none());
        assert_eq!(controls.shown(Dimension::State), None);
        assert!(!FilterControls::ROWS.contains(&Dimension::State));
    }

    #[test]
    fn test_legend_mounting() {
        let mut legend = Legend::new();
        assert!(!legend.is_mounted());
        legend.mount();
        assert!(legend.is_mounted());
        assert_eq!(legend.entries().len(), 6);
        legend.unmount();
        assert!(!legend.is_mounted());
    }
}
