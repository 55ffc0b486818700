use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::services::sqlite_store::COMPANY_LIST_LIMIT;
use crate::types::Company;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies))
        .route("/search", get(search_company))
}

/// GET /api/companies
async fn list_companies(State(state): State<AppState>) -> Result<Json<Vec<Company>>> {
    let companies = state.store.list_companies(COMPANY_LIST_LIMIT)?;
    Ok(Json(companies))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

/// GET /api/companies/search?name=
async fn search_company(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Company>> {
    let name = query.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    state
        .store
        .find_company_by_name(name)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
}
