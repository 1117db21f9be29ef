//! Handlers for `/dashboard`.

use std::collections::BTreeMap;

use adala_core::options::OptionKind;
use adala_db::models::dashboard::DashboardStats;
use adala_db::models::hearing::{HearingListItem, UpcomingQuery};
use adala_db::repositories::{DashboardRepo, HearingRepo};
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use super::hearing::{upcoming_days, UPCOMING_LIMIT};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::RequestLang;
use crate::response::DataResponse;
use crate::state::AppState;

/// Dashboard figures plus labels for the case statuses they mention.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub status_labels: BTreeMap<String, &'static str>,
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    RequestLang(lang): RequestLang,
) -> AppResult<Json<DataResponse<StatsResponse>>> {
    let stats = DashboardRepo::stats(&state.pool).await?;
    let status_labels = stats
        .cases_by_status
        .iter()
        .filter_map(|c| {
            OptionKind::CaseStatuses
                .label(&c.status, lang)
                .map(|label| (c.status.clone(), label))
        })
        .collect();
    Ok(Json(DataResponse {
        data: StatsResponse {
            stats,
            status_labels,
        },
    }))
}

/// GET /api/v1/dashboard/upcoming-hearings
///
/// Same window as `/hearings/upcoming`; `lawyer_id` narrows it to one
/// lawyer's calendar.
pub async fn upcoming_hearings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<UpcomingQuery>,
) -> AppResult<Json<DataResponse<Vec<HearingListItem>>>> {
    let hearings = HearingRepo::upcoming(
        &state.pool,
        upcoming_days(params.days),
        params.lawyer_id,
        UPCOMING_LIMIT,
    )
    .await?;
    Ok(Json(DataResponse { data: hearings }))
}
