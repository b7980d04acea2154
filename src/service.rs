//! Dashboard Data Service
//!
//! Loads both datasets once and answers every view request from the
//! immutable in-memory tables. Aggregates are recomputed on each call.

use crate::aggregate::ChartSeries;
use crate::config::DataConfig;
use crate::loader::{load_daily, load_hourly, LoadError, Table};
use crate::pager::{clamp_page, page_count, PageWindow};
use crate::records::{DailyRecord, HourlyRecord};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which of the two datasets a request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Daily,
    Hourly,
}

/// The four fixed charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartId {
    Season,
    Weather,
    UserTypes,
    Hourly,
}

impl ChartId {
    pub const ALL: [ChartId; 4] = [
        ChartId::Season,
        ChartId::Weather,
        ChartId::UserTypes,
        ChartId::Hourly,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ChartId::Season => "season",
            ChartId::Weather => "weather",
            ChartId::UserTypes => "user-types",
            ChartId::Hourly => "hourly",
        }
    }
}

impl FromStr for ChartId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartId::ALL
            .into_iter()
            .find(|id| id.slug() == s)
            .ok_or_else(|| format!("unknown chart '{}'", s))
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Counts and column names shown on the Data Overview view
#[derive(Debug, Serialize)]
pub struct Overview<'a> {
    pub daily_records: usize,
    pub hourly_records: usize,
    pub daily_columns: &'a [String],
    pub hourly_columns: &'a [String],
}

pub struct DashboardService {
    daily: Table<DailyRecord>,
    hourly: Table<HourlyRecord>,
    page_size: usize,
}

impl DashboardService {
    pub fn new(daily: Table<DailyRecord>, hourly: Table<HourlyRecord>, page_size: usize) -> Self {
        Self {
            daily,
            hourly,
            page_size,
        }
    }

    /// Load both datasets. Either failing makes the dashboard unavailable.
    pub fn load(config: &DataConfig) -> Result<Self, LoadError> {
        let daily = load_daily(&config.daily_csv)?;
        let hourly = load_hourly(&config.hourly_csv)?;
        Ok(Self::new(daily, hourly, config.page_size))
    }

    pub fn daily(&self) -> &Table<DailyRecord> {
        &self.daily
    }

    pub fn hourly(&self) -> &Table<HourlyRecord> {
        &self.hourly
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn record_count(&self, dataset: Dataset) -> usize {
        match dataset {
            Dataset::Daily => self.daily.len(),
            Dataset::Hourly => self.hourly.len(),
        }
    }

    pub fn page_count(&self, dataset: Dataset) -> usize {
        page_count(self.record_count(dataset), self.page_size)
    }

    /// Clamp a requested page number for `dataset` into its valid range
    pub fn clamp_page(&self, dataset: Dataset, page_number: usize) -> usize {
        clamp_page(page_number, self.record_count(dataset), self.page_size)
    }

    pub fn daily_page(&self, page_number: usize) -> PageWindow<'_, DailyRecord> {
        tracing::debug!(page = page_number, "Daily page requested");
        PageWindow::new(self.daily.rows(), page_number, self.page_size)
    }

    pub fn hourly_page(&self, page_number: usize) -> PageWindow<'_, HourlyRecord> {
        tracing::debug!(page = page_number, "Hourly page requested");
        PageWindow::new(self.hourly.rows(), page_number, self.page_size)
    }

    pub fn overview(&self) -> Overview<'_> {
        Overview {
            daily_records: self.daily.len(),
            hourly_records: self.hourly.len(),
            daily_columns: self.daily.columns(),
            hourly_columns: self.hourly.columns(),
        }
    }

    pub fn chart(&self, id: ChartId) -> ChartSeries {
        tracing::debug!(chart = %id, "Computing chart series");
        match id {
            ChartId::Season => ChartSeries::seasonal(self.daily.rows()),
            ChartId::Weather => ChartSeries::weather(self.daily.rows()),
            ChartId::UserTypes => ChartSeries::user_types(self.daily.rows()),
            ChartId::Hourly => ChartSeries::hourly(self.hourly.rows()),
        }
    }

    /// All four charts in display order
    pub fn charts(&self) -> Vec<ChartSeries> {
        ChartId::ALL.iter().map(|id| self.chart(*id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Season, WeatherSituation};

    fn daily_row(season: Season, cnt: u32) -> DailyRecord {
        DailyRecord {
            instant: None,
            dteday: None,
            season,
            yr: None,
            mnth: None,
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

    fn hourly_row(hr: u8, cnt: u32) -> HourlyRecord {
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
            casual: cnt,
            registered: 0,
            cnt,
        }
    }

    fn service() -> DashboardService {
        let daily: Vec<DailyRecord> = (0..25).map(|i| daily_row(Season::Summer, i)).collect();
        let hourly: Vec<HourlyRecord> = (0..48).map(|i| hourly_row((i % 24) as u8, i)).collect();
        DashboardService::new(
            Table::new(vec!["season".into(), "cnt".into()], daily),
            Table::new(vec!["hr".into(), "cnt".into()], hourly),
            10,
        )
    }

    #[test]
    fn test_pages() {
        let svc = service();
        assert_eq!(svc.page_count(Dataset::Daily), 3);
        assert_eq!(svc.page_count(Dataset::Hourly), 5);

        let window = svc.daily_page(3);
        assert_eq!(window.rows.len(), 5);
        assert_eq!(window.rows[0].cnt, 20);
        assert!(svc.daily_page(4).rows.is_empty());

        assert_eq!(svc.clamp_page(Dataset::Hourly, 99), 5);
        assert_eq!(svc.clamp_page(Dataset::Daily, 0), 1);
    }

    #[test]
    fn test_overview() {
        let svc = service();
        let overview = svc.overview();
        assert_eq!(overview.daily_records, 25);
        assert_eq!(overview.hourly_records, 48);
        assert_eq!(overview.hourly_columns, &["hr".to_string(), "cnt".to_string()]);
    }

    #[test]
    fn test_charts_in_display_order() {
        let svc = service();
        let charts = svc.charts();
        assert_eq!(charts.len(), 4);
        assert_eq!(charts[0].x_label, "Season");
        assert_eq!(charts[3].points.len(), 24);
        // hour h appears with cnt h and h + 24
        assert_eq!(charts[3].points[5].value, 17.0);
    }

    #[test]
    fn test_chart_id_slugs() {
        for id in ChartId::ALL {
            assert_eq!(id.slug().parse::<ChartId>(), Ok(id));
        }
        assert!("pie".parse::<ChartId>().is_err());
    }
}
