//! Read-only JSON API over the dashboard service.
//!
//! # Endpoints
//! - `GET /api/health`
//! - `GET /api/overview`
//! - `GET /api/daily?page=N`, `GET /api/hourly?page=N`
//! - `GET /api/charts`, `GET /api/charts/:name`
//! - `GET /api/insights`

use crate::aggregate::ChartSeries;
use crate::insights::{Insight, KEY_INSIGHTS};
use crate::pager::PageWindow;
use crate::records::{DailyRecord, HourlyRecord};
use crate::service::{ChartId, DashboardService, Dataset, Overview};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state. The service is immutable, so no lock.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
}

impl AppState {
    pub fn new(service: DashboardService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::warn!(
            request_id = %request_id,
            status = status.as_u16(),
            error_message = %self,
            "API request failed"
        );

        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/overview
async fn get_overview(State(state): State<AppState>) -> Response {
    let overview: Overview<'_> = state.service.overview();
    Json(ApiResponse::ok(overview)).into_response()
}

/// GET /api/daily?page=N
async fn get_daily_page(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let page = state
        .service
        .clamp_page(Dataset::Daily, query.page.unwrap_or(1));
    let window: PageWindow<'_, DailyRecord> = state.service.daily_page(page);
    Ok(Json(ApiResponse::ok(window)).into_response())
}

/// GET /api/hourly?page=N
async fn get_hourly_page(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let page = state
        .service
        .clamp_page(Dataset::Hourly, query.page.unwrap_or(1));
    let window: PageWindow<'_, HourlyRecord> = state.service.hourly_page(page);
    Ok(Json(ApiResponse::ok(window)).into_response())
}

/// GET /api/charts
async fn get_charts(State(state): State<AppState>) -> Json<ApiResponse<Vec<ChartSeries>>> {
    Json(ApiResponse::ok(state.service.charts()))
}

/// GET /api/charts/:name
async fn get_chart(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<ChartSeries>>, ApiError> {
    let id: ChartId = name.parse().map_err(ApiError::NotFound)?;
    Ok(Json(ApiResponse::ok(state.service.chart(id))))
}

/// GET /api/insights
async fn get_insights() -> Json<ApiResponse<&'static [Insight]>> {
    Json(ApiResponse::ok(KEY_INSIGHTS))
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/overview", get(get_overview))
        .route("/daily", get(get_daily_page))
        .route("/hourly", get(get_hourly_page))
        .route("/charts", get(get_charts))
        .route("/charts/:name", get(get_chart))
        .route("/insights", get(get_insights))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Table;
    use crate::records::{Season, WeatherSituation};
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let daily: Vec<DailyRecord> = (0..15u32)
            .map(|i| DailyRecord {
                instant: Some((i + 1).to_string()),
                dteday: None,
                season: if i < 10 { Season::Spring } else { Season::Fall },
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
                casual: i,
                registered: i,
                cnt: 2 * i,
            })
            .collect();
        let hourly: Vec<HourlyRecord> = (0..24u8)
            .map(|h| HourlyRecord {
                instant: None,
                dteday: None,
                season: Season::Spring,
                yr: None,
                mnth: None,
                hr: h,
                holiday: None,
                weekday: None,
                workingday: None,
                weathersit: WeatherSituation::Mist,
                temp: None,
                atemp: None,
                hum: None,
                windspeed: None,
                casual: 0,
                registered: h as u32 * 10,
                cnt: h as u32 * 10,
            })
            .collect();

        let service = DashboardService::new(
            Table::new(vec!["instant".into()], daily),
            Table::new(vec!["hr".into()], hourly),
            10,
        );
        build_router(AppState::new(service))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(create_test_app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_overview() {
        let (status, body) = get_json(create_test_app(), "/api/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["daily_records"], 15);
        assert_eq!(body["data"]["hourly_records"], 24);
    }

    #[tokio::test]
    async fn test_daily_page_defaults_to_first() {
        let (_, body) = get_json(create_test_app(), "/api/daily").await;
        assert_eq!(body["data"]["page"], 1);
        assert_eq!(body["data"]["total_pages"], 2);
        assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_page_is_clamped() {
        let (_, body) = get_json(create_test_app(), "/api/daily?page=40").await;
        assert_eq!(body["data"]["page"], 2);
        let rows = body["data"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["instant"], "11");

        let (_, body) = get_json(create_test_app(), "/api/hourly?page=0").await;
        assert_eq!(body["data"]["page"], 1);
    }

    #[tokio::test]
    async fn test_invalid_page_is_json_error() {
        let (status, body) = get_json(create_test_app(), "/api/daily?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Bad request"));

        let (status, body) = get_json(create_test_app(), "/api/hourly?page=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_season_chart() {
        let (status, body) = get_json(create_test_app(), "/api/charts/season").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["kind"], "bar");
        let points = body["data"]["points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["label"], "Spring");
        assert_eq!(points[0]["value"], 9.0);
        assert_eq!(points[1]["label"], "Fall");
        assert_eq!(points[1]["value"], 24.0);
    }

    #[tokio::test]
    async fn test_weather_chart() {
        let (status, body) = get_json(create_test_app(), "/api/charts/weather").await;
        assert_eq!(status, StatusCode::OK);
        let points = body["data"]["points"].as_array().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["label"], "Clear");
        assert_eq!(points[0]["value"], 14.0);
    }

    #[tokio::test]
    async fn test_user_types_chart() {
        let (status, body) = get_json(create_test_app(), "/api/charts/user-types").await;
        assert_eq!(status, StatusCode::OK);
        let points = body["data"]["points"].as_array().unwrap();
        let labels: Vec<&str> = points.iter().map(|p| p["label"].as_str().unwrap()).collect();
        assert_eq!(labels, vec!["casual", "registered", "total"]);
        assert_eq!(points[0]["value"], 7.0);
        assert_eq!(points[1]["value"], 7.0);
        assert_eq!(points[2]["value"], 14.0);
    }

    #[tokio::test]
    async fn test_hourly_chart() {
        let (status, body) = get_json(create_test_app(), "/api/charts/hourly").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["kind"], "line");
        let points = body["data"]["points"].as_array().unwrap();
        assert_eq!(points.len(), 24);
        assert_eq!(points[17]["value"], 170.0);
    }

    #[tokio::test]
    async fn test_all_charts() {
        let (_, body) = get_json(create_test_app(), "/api/charts").await;
        let charts = body["data"].as_array().unwrap();
        assert_eq!(charts.len(), 4);
        assert_eq!(charts[0]["points"][0]["label"], "Spring");
        assert_eq!(charts[0]["points"][0]["value"], 9.0);
    }

    #[tokio::test]
    async fn test_unknown_chart() {
        let (status, body) = get_json(create_test_app(), "/api/charts/pie").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("pie"));
    }

    #[tokio::test]
    async fn test_insights() {
        let (_, body) = get_json(create_test_app(), "/api/insights").await;
        assert_eq!(body["data"].as_array().unwrap().len(), KEY_INSIGHTS.len());
    }
}
