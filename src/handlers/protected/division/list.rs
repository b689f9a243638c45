// handlers/protected/division/list.rs - GET /divisions handler

use axum::extract::State;
use serde::Serialize;

use crate::database::models::DivisionSummary;
use crate::handlers::QueryParams;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DivisionsData {
    pub divisions: Vec<DivisionSummary>,
}

pub async fn divisions_get(
    State(state): State<AppState>,
    query: QueryParams,
) -> ApiResult<DivisionsData> {
    let page = state
        .divisions
        .list(query.get("name"), query.get("page"))
        .await?;

    Ok(ApiResponse::paginated(
        "Divisions retrieved successfully",
        DivisionsData { divisions: page.items },
        page.meta,
    ))
}
