use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::LapTimeSeriesPoint;

/// Number of drivers selected when the user has not picked any
pub const DEFAULT_DRIVER_COUNT: usize = 5;

/// An ordered set of driver identifiers. Duplicates collapse onto their first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSelection {
    drivers: Vec<String>,
}

impl DriverSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, driver: &str) -> bool {
        self.drivers.iter().any(|d| d == driver)
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().map(String::as_str)
    }

    /// Adds or removes `driver`
    pub fn set(&mut self, driver: &str, selected: bool) {
        if selected {
            if !self.contains(driver) {
                self.drivers.push(driver.to_string());
            }
        } else {
            self.drivers.retain(|d| d != driver);
        }
    }

    /// Drops any driver that is not in `available`
    pub fn restrict_to(&self, available: &[String]) -> Self {
        Self {
            drivers: self
                .drivers
                .iter()
                .filter(|d| available.contains(*d))
                .cloned()
                .collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for DriverSelection {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            drivers: iter.into_iter().map(Into::<String>::into).unique().collect(),
        }
    }
}

/// Distinct drivers in order of first appearance
pub fn distinct_drivers(points: &[LapTimeSeriesPoint]) -> Vec<String> {
    points
        .iter()
        .map(|p| p.driver.as_str())
        .unique()
        .map(str::to_string)
        .collect()
}

/// The first `DEFAULT_DRIVER_COUNT` drivers to appear in `points`
pub fn default_selection(points: &[LapTimeSeriesPoint]) -> DriverSelection {
    distinct_drivers(points)
        .into_iter()
        .take(DEFAULT_DRIVER_COUNT)
        .collect()
}

/// Points whose driver is part of `selection`. An empty selection yields nothing.
pub fn filter_drivers(
    points: &[LapTimeSeriesPoint],
    selection: &DriverSelection,
) -> Vec<LapTimeSeriesPoint> {
    points
        .iter()
        .filter(|p| selection.contains(&p.driver))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(driver: &str, lap_number: u32) -> LapTimeSeriesPoint {
        LapTimeSeriesPoint {
            driver: driver.to_string(),
            lap_number,
            lap_time_seconds: 80.0 + lap_number as f64,
        }
    }

    #[test]
    fn test_default_selection_uses_first_appearance() {
        let points: Vec<_> = ["SAI", "ALB", "SAI", "VER", "HAM", "ALB", "NOR", "LEC", "PIA"]
            .iter()
            .enumerate()
            .map(|(i, d)| point(d, i as u32))
            .collect();

        let selection = default_selection(&points);
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec!["SAI", "ALB", "VER", "HAM", "NOR"]
        );
    }

    #[test]
    fn test_default_selection_with_few_drivers() {
        let points = vec![point("VER", 1), point("LEC", 1), point("VER", 2)];
        let selection = default_selection(&points);
        assert_eq!(selection.len(), 2);
        assert!(default_selection(&[]).is_empty());
    }

    #[test]
    fn test_empty_selection_filters_everything() {
        let points = vec![point("VER", 1), point("LEC", 1)];
        assert!(filter_drivers(&points, &DriverSelection::empty()).is_empty());
    }

    #[test]
    fn test_selection_set_and_restrict() {
        let mut selection: DriverSelection = ["VER", "VER", "LEC"].into_iter().collect();
        assert_eq!(selection.len(), 2);

        selection.set("NOR", true);
        selection.set("NOR", true);
        selection.set("VER", false);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["LEC", "NOR"]);

        let restricted = selection.restrict_to(&["NOR".to_string(), "PIA".to_string()]);
        assert_eq!(restricted.iter().collect::<Vec<_>>(), vec!["NOR"]);
    }

    fn arb_points() -> impl Strategy<Value = Vec<LapTimeSeriesPoint>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["VER", "PER", "LEC", "SAI", "HAM", "RUS", "NOR"]),
                1u32..60,
            )
                .prop_map(|(d, lap)| point(d, lap)),
            0..200,
        )
    }

    proptest! {
        #[test]
        fn prop_filter_returns_exact_subset(
            points in arb_points(),
            selected in prop::collection::vec(
                prop::sample::select(vec!["VER", "LEC", "HAM", "ALO"]),
                0..4,
            ),
        ) {
            let selection: DriverSelection = selected.into_iter().collect();
            let filtered = filter_drivers(&points, &selection);
            let expected: Vec<_> = points
                .iter()
                .filter(|p| selection.contains(&p.driver))
                .cloned()
                .collect();
            prop_assert_eq!(filtered, expected);
        }

        #[test]
        fn prop_default_selection_is_prefix_of_distinct(points in arb_points()) {
            let distinct = distinct_drivers(&points);
            let selection = default_selection(&points);
            prop_assert_eq!(selection.len(), distinct.len().min(DEFAULT_DRIVER_COUNT));
            for (selected, expected) in selection.iter().zip(distinct.iter()) {
                prop_assert_eq!(selected, expected.as_str());
            }
        }
    }
}
