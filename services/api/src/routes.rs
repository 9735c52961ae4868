use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use enrollment_analytics::analytics::{
    acquisition_ranking, active_courses, calculate_kpis, comparative, distribution_by, evolution,
    generate_insights, renewal_ranking, top_enrollment_dates, AcquisitionRankingRow,
    ComparativePoint, CourseGoal, Dataset, Dimension, DistributionSlice, EnrollmentDateCount,
    EvolutionPoint, FilterSpec, Insight, KpiSummary, RenewalRankingRow,
};
use enrollment_analytics::error::AppError;
use enrollment_analytics::import::EnrollmentImporter;
use enrollment_analytics::store::{GoalStore, RecordStore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

pub(crate) fn dashboard_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/units/:unit/records", post(import_records_endpoint))
        .route("/api/v1/units/:unit/goals", put(goals_endpoint))
        .route("/api/v1/dashboard", post(dashboard_endpoint))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) unit: String,
    pub(crate) imported: usize,
    pub(crate) periods: Vec<String>,
    pub(crate) current_period: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoalsRequest {
    pub(crate) period: String,
    pub(crate) goals: Vec<CourseGoal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DashboardRequest {
    pub(crate) unit: Option<String>,
    pub(crate) filter: FilterSpec,
    pub(crate) include_rankings: bool,
    /// Inline CSV override; when present the stored records are bypassed.
    pub(crate) csv: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DashboardDataSource {
    Inline,
    Stored,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankingsView {
    pub(crate) renewal: Vec<RenewalRankingRow>,
    pub(crate) acquisition: Vec<AcquisitionRankingRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) unit: Option<String>,
    pub(crate) data_source: DashboardDataSource,
    pub(crate) current_period: String,
    pub(crate) analysis_period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) branch_name: Option<String>,
    pub(crate) kpis: KpiSummary,
    pub(crate) evolution: Vec<EvolutionPoint>,
    pub(crate) comparative: Vec<ComparativePoint>,
    pub(crate) shift_distribution: Vec<DistributionSlice>,
    pub(crate) course_distribution: Vec<DistributionSlice>,
    pub(crate) term_distribution: Vec<DistributionSlice>,
    pub(crate) top_enrollment_dates: Vec<EnrollmentDateCount>,
    pub(crate) insights: Vec<Insight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rankings: Option<RankingsView>,
}

#[derive(Debug)]
pub(crate) enum DashboardError {
    MissingSource,
    NoRecords { unit: String },
    App(AppError),
}

impl From<AppError> for DashboardError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<enrollment_analytics::import::ImportError> for DashboardError {
    fn from(value: enrollment_analytics::import::ImportError) -> Self {
        Self::App(AppError::Import(value))
    }
}

impl From<enrollment_analytics::store::StoreError> for DashboardError {
    fn from(value: enrollment_analytics::store::StoreError) -> Self {
        Self::App(AppError::Store(value))
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Mirrors a unit's records from a CSV export: the previous batch is dropped
/// and the new one inserted wholesale.
pub(crate) async fn import_records_endpoint(
    Extension(state): Extension<AppState>,
    Path(unit): Path<String>,
    Json(payload): Json<ImportRequest>,
) -> Response {
    let dataset = match EnrollmentImporter::from_reader(Cursor::new(payload.csv.into_bytes())) {
        Ok(dataset) => dataset,
        Err(err) => return AppError::from(err).into_response(),
    };

    let periods = dataset.periods.clone();
    let current_period = dataset.current_period.clone();
    match state.records.replace_unit(&unit, dataset.records) {
        Ok(imported) => {
            tracing::info!(%unit, imported, "mirrored enrollment records");
            (
                StatusCode::OK,
                Json(ImportResponse {
                    unit,
                    imported,
                    periods,
                    current_period,
                }),
            )
                .into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn goals_endpoint(
    Extension(state): Extension<AppState>,
    Path(unit): Path<String>,
    Json(payload): Json<GoalsRequest>,
) -> Response {
    match state
        .goals
        .replace(&unit, &payload.period, payload.goals)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DashboardRequest>,
) -> Response {
    match build_dashboard(&state, payload) {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(DashboardError::MissingSource) => {
            let payload = json!({
                "error": "either a unit or an inline csv export is required",
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(DashboardError::NoRecords { unit }) => {
            let payload = json!({
                "error": format!("no records found for unit {unit}"),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(DashboardError::App(err)) => err.into_response(),
    }
}

/// Runs every aggregation over one snapshot of the unit's records. Pure
/// besides the store reads; each request recomputes from scratch.
pub(crate) fn build_dashboard(
    state: &AppState,
    request: DashboardRequest,
) -> Result<DashboardResponse, DashboardError> {
    let DashboardRequest {
        unit,
        filter,
        include_rankings,
        csv,
    } = request;

    let (dataset, data_source) = match csv {
        Some(csv) => {
            let dataset = EnrollmentImporter::from_reader(Cursor::new(csv.into_bytes()))?;
            (dataset, DashboardDataSource::Inline)
        }
        None => {
            let unit_id = unit.as_deref().ok_or(DashboardError::MissingSource)?;
            let records = state.records.fetch(unit_id)?;
            (Dataset::from_records(records), DashboardDataSource::Stored)
        }
    };

    if dataset.is_empty() {
        return Err(DashboardError::NoRecords {
            unit: unit.unwrap_or_default(),
        });
    }

    let analysis_period = filter.analysis_period(&dataset.current_period).to_string();
    let kpis = calculate_kpis(&dataset.records, &dataset.current_period, &filter);

    let rankings = if include_rankings {
        let goals = match unit.as_deref() {
            Some(unit_id) => state.goals.fetch(unit_id, &analysis_period)?,
            None => Vec::new(),
        };
        let courses = active_courses(&dataset.records, &analysis_period);
        Some(RankingsView {
            renewal: renewal_ranking(&dataset.records, &filter, &analysis_period, &courses, &goals),
            acquisition: acquisition_ranking(
                &dataset.records,
                &filter,
                &analysis_period,
                &courses,
                &goals,
            ),
        })
    } else {
        None
    };

    Ok(DashboardResponse {
        unit,
        data_source,
        current_period: dataset.current_period.clone(),
        analysis_period: analysis_period.clone(),
        branch_name: dataset.branch_name.clone(),
        evolution: evolution(&dataset.records, &filter),
        comparative: comparative(&dataset.records, &dataset.current_period, &filter),
        shift_distribution: distribution_by(
            &dataset.records,
            &filter,
            &dataset.current_period,
            Dimension::Shift,
        ),
        course_distribution: distribution_by(
            &dataset.records,
            &filter,
            &dataset.current_period,
            Dimension::Course,
        ),
        term_distribution: distribution_by(
            &dataset.records,
            &filter,
            &dataset.current_period,
            Dimension::AcademicTerm,
        ),
        top_enrollment_dates: top_enrollment_dates(
            &dataset.records,
            &filter,
            &dataset.current_period,
        ),
        insights: generate_insights(&dataset, &kpis, &filter),
        kpis,
        rankings,
    })
}
