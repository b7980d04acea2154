use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CATEGORICAL CODES
// ============================================================================

/// Season code as stored in the dataset (1..=4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn code(&self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl TryFrom<u8> for Season {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(format!("invalid season code {} (expected 1-4)", other)),
        }
    }
}

impl From<Season> for u8 {
    fn from(season: Season) -> Self {
        season.code()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weather situation, ordered by severity (1 = clear .. 4 = heavy precipitation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeatherSituation {
    Clear,
    Mist,
    LightPrecipitation,
    HeavyPrecipitation,
}

impl WeatherSituation {
    pub fn code(&self) -> u8 {
        match self {
            WeatherSituation::Clear => 1,
            WeatherSituation::Mist => 2,
            WeatherSituation::LightPrecipitation => 3,
            WeatherSituation::HeavyPrecipitation => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeatherSituation::Clear => "Clear",
            WeatherSituation::Mist => "Mist",
            WeatherSituation::LightPrecipitation => "Light precipitation",
            WeatherSituation::HeavyPrecipitation => "Heavy precipitation",
        }
    }
}

impl TryFrom<u8> for WeatherSituation {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(WeatherSituation::Clear),
            2 => Ok(WeatherSituation::Mist),
            3 => Ok(WeatherSituation::LightPrecipitation),
            4 => Ok(WeatherSituation::HeavyPrecipitation),
            other => Err(format!("invalid weathersit code {} (expected 1-4)", other)),
        }
    }
}

impl From<WeatherSituation> for u8 {
    fn from(weather: WeatherSituation) -> Self {
        weather.code()
    }
}

impl fmt::Display for WeatherSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One row per calendar day.
///
/// Only `season`, `weathersit`, `casual`, `registered` and `cnt` are typed and
/// required. The remaining columns are display-only and kept verbatim, so a
/// file that writes `weekday` as `Saturday` or `yr` as `2011` still loads.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dteday: Option<String>,

    pub season: Season,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workingday: Option<String>,

    pub weathersit: WeatherSituation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atemp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hum: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windspeed: Option<String>,

    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

/// One row per (date, hour) pair
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HourlyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dteday: Option<String>,

    pub season: Season,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnth: Option<String>,

    pub hr: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workingday: Option<String>,

    pub weathersit: WeatherSituation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atemp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hum: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windspeed: Option<String>,

    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

// ============================================================================
// SHARED ACCESSORS
// ============================================================================

/// Columns shared by both granularities; the aggregator works against this.
pub trait RentalRecord {
    fn date(&self) -> Option<&str>;
    fn season(&self) -> Season;
    fn weather(&self) -> WeatherSituation;
    fn casual(&self) -> u32;
    fn registered(&self) -> u32;
    fn total(&self) -> u32;
}

impl RentalRecord for DailyRecord {
    fn date(&self) -> Option<&str> {
        self.dteday.as_deref()
    }

    fn season(&self) -> Season {
        self.season
    }

    fn weather(&self) -> WeatherSituation {
        self.weathersit
    }

    fn casual(&self) -> u32 {
        self.casual
    }

    fn registered(&self) -> u32 {
        self.registered
    }

    fn total(&self) -> u32 {
        self.cnt
    }
}

impl RentalRecord for HourlyRecord {
    fn date(&self) -> Option<&str> {
        self.dteday.as_deref()
    }

    fn season(&self) -> Season {
        self.season
    }

    fn weather(&self) -> WeatherSituation {
        self.weathersit
    }

    fn casual(&self) -> u32 {
        self.casual
    }

    fn registered(&self) -> u32 {
        self.registered
    }

    fn total(&self) -> u32 {
        self.cnt
    }
}

/// A row that violates one of the record invariants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowViolation {
    InconsistentTotal { casual: u32, registered: u32, total: u32 },
    HourOutOfRange { hour: u8 },
}

/// Schema of a CSV-backed record type: the header columns it needs and
/// the per-row invariants checked at load time.
pub trait CsvRecord: RentalRecord + serde::de::DeserializeOwned {
    const REQUIRED_COLUMNS: &'static [&'static str];

    fn check(&self) -> Result<(), RowViolation> {
        check_total(self)
    }
}

fn check_total<R: RentalRecord + ?Sized>(row: &R) -> Result<(), RowViolation> {
    // u64 so a corrupt file with huge counts can't overflow the sum
    if row.casual() as u64 + row.registered() as u64 != row.total() as u64 {
        return Err(RowViolation::InconsistentTotal {
            casual: row.casual(),
            registered: row.registered(),
            total: row.total(),
        });
    }
    Ok(())
}

impl CsvRecord for DailyRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["season", "weathersit", "casual", "registered", "cnt"];
}

impl CsvRecord for HourlyRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["season", "hr", "weathersit", "casual", "registered", "cnt"];

    fn check(&self) -> Result<(), RowViolation> {
        if self.hr > 23 {
            return Err(RowViolation::HourOutOfRange { hour: self.hr });
        }
        check_total(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(casual: u32, registered: u32, cnt: u32) -> DailyRecord {
        DailyRecord {
            instant: None,
            dteday: None,
            season: Season::Spring,
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
            casual,
            registered,
            cnt,
        }
    }

    #[test]
    fn test_season_codes() {
        assert_eq!(Season::try_from(1), Ok(Season::Spring));
        assert_eq!(Season::try_from(4), Ok(Season::Winter));
        assert!(Season::try_from(0).is_err());
        assert!(Season::try_from(5).is_err());
        assert_eq!(u8::from(Season::Fall), 3);
    }

    #[test]
    fn test_category_order_follows_codes() {
        assert!(Season::Spring < Season::Summer);
        assert!(Season::Fall < Season::Winter);
        assert!(WeatherSituation::Clear < WeatherSituation::Mist);
        assert!(WeatherSituation::LightPrecipitation < WeatherSituation::HeavyPrecipitation);
    }

    #[test]
    fn test_total_invariant() {
        assert!(daily(10, 20, 30).check().is_ok());
        assert_eq!(
            daily(10, 20, 31).check(),
            Err(RowViolation::InconsistentTotal { casual: 10, registered: 20, total: 31 })
        );
    }

    #[test]
    fn test_hour_range() {
        let mut row = HourlyRecord {
            instant: None,
            dteday: None,
            season: Season::Summer,
            yr: None,
            mnth: None,
            hr: 23,
            holiday: None,
            weekday: None,
            workingday: None,
            weathersit: WeatherSituation::Mist,
            temp: None,
            atemp: None,
            hum: None,
            windspeed: None,
            casual: 1,
            registered: 2,
            cnt: 3,
        };
        assert!(row.check().is_ok());

        row.hr = 24;
        assert_eq!(row.check(), Err(RowViolation::HourOutOfRange { hour: 24 }));
    }

    #[test]
    fn test_serialize_codes_as_numbers() {
        let json = serde_json::to_value(daily(1, 2, 3)).unwrap();
        assert_eq!(json["season"], 1);
        assert_eq!(json["weathersit"], 1);
        assert!(json.get("dteday").is_none());
    }
}
