// Lap-time chart model, independent of the drawing surface

use std::collections::HashMap;

use crate::laps::LapTimeSeriesPoint;

/// One driver's lap times as `[lap number, seconds]` pairs, ordered by lap.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub driver: String,
    pub points: Vec<[f64; 2]>,
}

impl ChartSeries {
    /// Runs of consecutive laps. A missing lap starts a new segment so the
    /// line shows a gap instead of bridging it.
    pub fn segments(&self) -> Vec<&[[f64; 2]]> {
        self.points
            .chunk_by(|prev, next| next[0] - prev[0] <= 1.0)
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LapChart {
    /// Series in order of the driver's first appearance in the input
    pub series: Vec<ChartSeries>,
}

impl LapChart {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series_for(&self, driver: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.driver == driver)
    }
}

/// Groups lap times into one series per driver, x = lap number, y = seconds.
/// Lap numbers are strictly increasing within a series.
pub fn render(points: &[LapTimeSeriesPoint]) -> LapChart {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<ChartSeries> = Vec::new();

    for point in points {
        let i = *index.entry(point.driver.as_str()).or_insert_with(|| {
            series.push(ChartSeries {
                driver: point.driver.clone(),
                points: Vec::new(),
            });
            series.len() - 1
        });
        series[i]
            .points
            .push([point.lap_number as f64, point.lap_time_seconds]);
    }

    // a lap reported twice keeps its first occurrence
    for s in series.iter_mut() {
        s.points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        s.points.dedup_by(|next, prev| next[0] == prev[0]);
    }
    LapChart { series }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(driver: &str, lap_number: u32, lap_time_seconds: f64) -> LapTimeSeriesPoint {
        LapTimeSeriesPoint {
            driver: driver.to_string(),
            lap_number,
            lap_time_seconds,
        }
    }

    #[test]
    fn test_render_groups_by_driver() {
        let points = vec![
            point("NOR", 2, 85.0),
            point("VER", 1, 86.0),
            point("NOR", 1, 87.0),
            point("VER", 2, 84.5),
        ];
        let chart = render(&points);

        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].driver, "NOR");
        assert_eq!(chart.series[0].points, vec![[1.0, 87.0], [2.0, 85.0]]);
        assert_eq!(
            chart.series_for("VER").unwrap().points,
            vec![[1.0, 86.0], [2.0, 84.5]]
        );
    }

    #[test]
    fn test_duplicate_laps_keep_first_occurrence() {
        let chart = render(&[
            point("SAI", 3, 86.0),
            point("SAI", 1, 88.0),
            point("SAI", 3, 99.0),
            point("SAI", 2, 87.0),
        ]);
        assert_eq!(
            chart.series[0].points,
            vec![[1.0, 88.0], [2.0, 87.0], [3.0, 86.0]]
        );
    }

    #[test]
    fn test_render_empty() {
        assert!(render(&[]).is_empty());
    }

    #[test]
    fn test_missing_laps_split_segments() {
        let chart = render(&[
            point("HAM", 1, 90.0),
            point("HAM", 2, 89.0),
            point("HAM", 5, 88.0),
            point("HAM", 6, 88.5),
            point("HAM", 8, 88.1),
        ]);
        let segments = chart.series[0].segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], &[[1.0, 90.0], [2.0, 89.0]]);
        assert_eq!(segments[1], &[[5.0, 88.0], [6.0, 88.5]]);
        assert_eq!(segments[2], &[[8.0, 88.1]]);
    }
}
