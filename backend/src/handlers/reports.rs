//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::reports::{ReportQuery, ReportService};
use crate::state::AppState;

fn csv_response(csv: String) -> Response {
    ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response()
}

fn report_response<R: Serialize, T: Serialize>(
    report: R,
    rows: &[T],
    query: &ReportQuery,
) -> AppResult<Response> {
    if query.format.as_deref() == Some("csv") {
        Ok(csv_response(ReportService::export_to_csv(rows)?))
    } else {
        Ok(Json(report).into_response())
    }
}

/// Inventory valuation summary
pub async fn get_valuation_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    check_permission(&current_user.0, "reports", "read")?;
    let service = ReportService::new(state);
    let report = service.valuation(&query).await;
    let rows = report.rows.clone();
    report_response(report, &rows, &query)
}

/// Opening/import/export/closing movement report
pub async fn get_period_movement_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    check_permission(&current_user.0, "reports", "read")?;
    let service = ReportService::new(state);
    let report = service.period_movement(&query).await;
    let rows = report.rows.clone();
    report_response(report, &rows, &query)
}

/// Realized sales profit report
pub async fn get_sales_profit_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    check_permission(&current_user.0, "reports", "read")?;
    let service = ReportService::new(state);
    let report = service.sales_profit(&query).await;
    let rows = report.rows.clone();
    report_response(report, &rows, &query)
}
