// Static dashboard copy: the home blurb and the key insights summary.

use serde::Serialize;

pub const DASHBOARD_TITLE: &str = "Bike Sharing Data Analysis Dashboard";

pub const WELCOME: &[&str] = &[
    "This interactive dashboard lets you explore bike sharing data.",
    "Records are split into daily and hourly datasets, covering user behaviour,",
    "seasonal trends, and the effect of weather on bike rentals.",
    "",
    "Use Data Overview to page through the raw records, Visualizations for",
    "the aggregate charts, and Key Insights for a summary of the findings.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub headline: &'static str,
    pub detail: &'static str,
}

pub const KEY_INSIGHTS: &[Insight] = &[
    Insight {
        headline: "Seasonal Influence",
        detail: "Average rentals peak in summer and fall, with higher usage during warmer months.",
    },
    Insight {
        headline: "Weather Conditions",
        detail: "Rentals drop sharply in poor weather, especially rain, so availability should follow the forecast.",
    },
    Insight {
        headline: "User Types",
        detail: "Registered users account for most rentals; converting casual users is the main growth lever.",
    },
    Insight {
        headline: "Hourly Patterns",
        detail: "Demand peaks in the evening commute between 5 PM and 7 PM.",
    },
    Insight {
        headline: "Further Analysis",
        detail: "External datasets such as public events or holidays could explain the remaining variation.",
    },
];
