//! Grouped and whole-table means, packaged as chart series.

use crate::records::{HourlyRecord, RentalRecord, Season, WeatherSituation};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean of one group produced by [`mean_by`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: f64,
    pub count: usize,
}

/// Arithmetic mean of `value` per distinct `key`, ascending by key.
///
/// Only keys present in `rows` appear in the result.
pub fn mean_by<R, K, FK, FV>(rows: &[R], key: FK, value: FV) -> Vec<GroupMean<K>>
where
    K: Ord + Copy,
    FK: Fn(&R) -> K,
    FV: Fn(&R) -> f64,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();

    for row in rows {
        let entry = groups.entry(key(row)).or_insert((0.0, 0));
        entry.0 += value(row);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(key, (sum, count))| GroupMean {
            key,
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Whole-table mean of one column; `None` for an empty table
pub fn column_mean<R, FV>(rows: &[R], value: FV) -> Option<f64>
where
    FV: Fn(&R) -> f64,
{
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = rows.iter().map(value).sum();
    Some(sum / rows.len() as f64)
}

// ============================================================================
// FIXED DASHBOARD QUERIES
// ============================================================================

pub fn season_means<R: RentalRecord>(rows: &[R]) -> Vec<GroupMean<Season>> {
    mean_by(rows, |r| r.season(), |r| r.total() as f64)
}

pub fn weather_means<R: RentalRecord>(rows: &[R]) -> Vec<GroupMean<WeatherSituation>> {
    mean_by(rows, |r| r.weather(), |r| r.total() as f64)
}

pub fn hour_means(rows: &[HourlyRecord]) -> Vec<GroupMean<u8>> {
    mean_by(rows, |r| r.hr, |r| r.cnt as f64)
}

/// Mean casual, registered and total counts over the whole table.
///
/// Three independent column means, not a group-by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserTypeMeans {
    pub casual: f64,
    pub registered: f64,
    pub total: f64,
}

impl UserTypeMeans {
    pub fn compute<R: RentalRecord>(rows: &[R]) -> Option<Self> {
        Some(Self {
            casual: column_mean(rows, |r| r.casual() as f64)?,
            registered: column_mean(rows, |r| r.registered() as f64)?,
            total: column_mean(rows, |r| r.total() as f64)?,
        })
    }

    pub fn labelled(&self) -> [(&'static str, f64); 3] {
        [
            ("casual", self.casual),
            ("registered", self.registered),
            ("total", self.total),
        ]
    }
}

// ============================================================================
// CHART SERIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// A labelled series ready for a bar or line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    fn from_groups<K, L>(
        title: &'static str,
        x_label: &'static str,
        kind: ChartKind,
        groups: &[GroupMean<K>],
        label: L,
    ) -> Self
    where
        L: Fn(&K) -> String,
    {
        Self {
            title,
            x_label,
            y_label: "Average Rentals",
            kind,
            points: groups
                .iter()
                .map(|g| ChartPoint {
                    label: label(&g.key),
                    value: g.mean,
                })
                .collect(),
        }
    }

    pub fn seasonal<R: RentalRecord>(rows: &[R]) -> Self {
        Self::from_groups(
            "Average Bike Rentals per Season",
            "Season",
            ChartKind::Bar,
            &season_means(rows),
            |s| s.name().to_string(),
        )
    }

    pub fn weather<R: RentalRecord>(rows: &[R]) -> Self {
        Self::from_groups(
            "Average Bike Rentals by Weather Situation",
            "Weather Situation",
            ChartKind::Bar,
            &weather_means(rows),
            |w| w.name().to_string(),
        )
    }

    pub fn user_types<R: RentalRecord>(rows: &[R]) -> Self {
        let points = UserTypeMeans::compute(rows)
            .map(|means| {
                means
                    .labelled()
                    .iter()
                    .map(|(label, value)| ChartPoint {
                        label: label.to_string(),
                        value: *value,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: "Average Count of User Types",
            x_label: "User Type",
            y_label: "Average Count",
            kind: ChartKind::Bar,
            points,
        }
    }

    pub fn hourly(rows: &[HourlyRecord]) -> Self {
        Self::from_groups(
            "Average Bike Rentals by Hour",
            "Hour of Day",
            ChartKind::Line,
            &hour_means(rows),
            |h| h.to_string(),
        )
    }

    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Label of the highest point (first one on ties)
    pub fn peak(&self) -> Option<&ChartPoint> {
        self.points
            .iter()
            .fold(None, |best: Option<&ChartPoint>, p| match best {
                Some(b) if b.value >= p.value => Some(b),
                _ => Some(p),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::DailyRecord;

    fn daily(season: u8, weather: u8, casual: u32, registered: u32) -> DailyRecord {
        DailyRecord {
            instant: None,
            dteday: None,
            season: Season::try_from(season).unwrap(),
            yr: None,
            mnth: None,
            holiday: None,
            weekday: None,
            workingday: None,
            weathersit: WeatherSituation::try_from(weather).unwrap(),
            temp: None,
            atemp: None,
            hum: None,
            windspeed: None,
            casual,
            registered,
            cnt: casual + registered,
        }
    }

    fn hourly(hr: u8, cnt: u32) -> HourlyRecord {
        HourlyRecord {
            instant: None,
            dteday: None,
            season: Season::Spring,
            yr: None,
            mnth: None,
            hr,
            holiday: None,
            weekday: None,
            workingday: None,
            weathersit: WeatherSituation::Clear,
            temp: None,
            atemp: None,
            hum: None,
            windspeed: None,
            casual: 0,
            registered: cnt,
            cnt,
        }
    }

    #[test]
    fn test_season_means_example() {
        let rows = vec![daily(1, 1, 0, 10), daily(1, 1, 0, 20), daily(2, 1, 0, 30)];

        let means = season_means(&rows);
        assert_eq!(
            means,
            vec![
                GroupMean { key: Season::Spring, mean: 15.0, count: 2 },
                GroupMean { key: Season::Summer, mean: 30.0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_groups_sorted_and_only_present_keys() {
        let rows = vec![
            daily(4, 3, 1, 1),
            daily(2, 1, 2, 2),
            daily(4, 1, 3, 3),
            daily(2, 3, 4, 4),
        ];

        let seasons: Vec<Season> = season_means(&rows).iter().map(|g| g.key).collect();
        assert_eq!(seasons, vec![Season::Summer, Season::Winter]);

        let weather = weather_means(&rows);
        assert_eq!(weather.len(), 2);
        assert_eq!(weather[0].key, WeatherSituation::Clear);
        assert_eq!(weather[0].mean, 5.0);
        assert_eq!(weather[1].key, WeatherSituation::LightPrecipitation);
        assert_eq!(weather[1].mean, 5.0);
    }

    #[test]
    fn test_each_mean_is_sum_over_count() {
        let rows: Vec<DailyRecord> = (0..50u32)
            .map(|i| daily((i % 4 + 1) as u8, (i % 3 + 1) as u8, i, i * 3))
            .collect();

        for group in season_means(&rows) {
            let members: Vec<&DailyRecord> =
                rows.iter().filter(|r| r.season == group.key).collect();
            let sum: f64 = members.iter().map(|r| r.cnt as f64).sum();
            assert_eq!(group.count, members.len());
            assert!((group.mean - sum / members.len() as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hour_means_example() {
        let rows: Vec<HourlyRecord> = (0..24u8).map(|h| hourly(h, h as u32 * 10)).collect();

        let means = hour_means(&rows);
        assert_eq!(means.len(), 24);
        for (h, group) in means.iter().enumerate() {
            assert_eq!(group.key as usize, h);
            assert_eq!(group.mean, h as f64 * 10.0);
        }
    }

    #[test]
    fn test_user_type_means() {
        let rows = vec![daily(1, 1, 10, 30), daily(1, 1, 20, 60)];

        let means = UserTypeMeans::compute(&rows).unwrap();
        assert_eq!(means.casual, 15.0);
        assert_eq!(means.registered, 45.0);
        assert_eq!(means.total, 60.0);

        let series = ChartSeries::user_types(&rows);
        let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["casual", "registered", "total"]);
    }

    #[test]
    fn test_empty_table() {
        let rows: Vec<DailyRecord> = Vec::new();
        assert!(season_means(&rows).is_empty());
        assert_eq!(UserTypeMeans::compute(&rows), None);
        assert!(ChartSeries::user_types(&rows).points.is_empty());
        assert_eq!(column_mean(&rows, |r| r.cnt as f64), None);
    }

    #[test]
    fn test_series_labels_and_peak() {
        let rows = vec![daily(3, 1, 0, 500), daily(1, 2, 0, 100)];

        let series = ChartSeries::seasonal(&rows);
        assert_eq!(series.kind, ChartKind::Bar);
        assert_eq!(series.points[0].label, "Spring");
        assert_eq!(series.points[1].label, "Fall");
        assert_eq!(series.peak().map(|p| p.label.as_str()), Some("Fall"));
        assert_eq!(series.max_value(), 500.0);

        let hourly_series = ChartSeries::hourly(&[hourly(17, 40), hourly(8, 20)]);
        assert_eq!(hourly_series.kind, ChartKind::Line);
        assert_eq!(hourly_series.points[0].label, "8");
    }
}
