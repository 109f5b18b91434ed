//! Handlers for the `/units` resource. Back-office only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stowage_core::error::CoreError;
use stowage_core::status::UnitStatus;
use stowage_core::types::DbId;
use stowage_db::models::unit::{CreateUnit, TimelineEntry, Unit, UpdateUnit};
use stowage_db::repositories::UnitRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /units`.
#[derive(Debug, Deserialize)]
pub struct UnitListQuery {
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn parse_status(raw: Option<&str>) -> Result<Option<UnitStatus>, CoreError> {
    raw.map(str::parse).transpose()
}

fn validate_rate(rate: f64) -> Result<(), CoreError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "monthlyRate must be a non-negative number".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/units
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<UnitListQuery>,
) -> AppResult<Json<DataResponse<Vec<Unit>>>> {
    let status = parse_status(params.status.as_deref())?;
    let units = UnitRepo::list(&state.pool, status).await?;
    Ok(Json(DataResponse { data: units }))
}

/// GET /api/v1/units/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Unit>>> {
    let unit = UnitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", id))?;
    Ok(Json(DataResponse { data: unit }))
}

/// POST /api/v1/units
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUnit>,
) -> AppResult<(StatusCode, Json<DataResponse<Unit>>)> {
    if input.unit_type.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Missing required fields: type".into(),
        )));
    }
    validate_rate(input.monthly_rate)?;
    parse_status(input.status.as_deref())?;

    let unit = UnitRepo::create(&state.pool, &input, Some(user.user_id)).await?;
    tracing::info!(unit_id = unit.id, user_id = user.user_id, "Unit created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: unit })))
}

/// PUT /api/v1/units/{id}
///
/// Partial update. Setting `status` to `available` also detaches the client.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateUnit>,
) -> AppResult<Json<DataResponse<Unit>>> {
    if let Some(rate) = input.monthly_rate {
        validate_rate(rate)?;
    }
    parse_status(input.status.as_deref())?;

    let unit = UnitRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", id))?;
    tracing::info!(unit_id = id, user_id = user.user_id, status = %unit.status, "Unit updated");
    Ok(Json(DataResponse { data: unit }))
}

/// DELETE /api/v1/units/{id}
///
/// Units still referenced by a contract or payment are refused with 409.
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if UnitRepo::delete(&state.pool, id).await? {
        tracing::info!(unit_id = id, user_id = user.user_id, "Unit deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Unit", id))
    }
}

/// GET /api/v1/units/{id}/timeline
///
/// Payments, contracts and client notifications for the unit, newest first.
pub async fn timeline(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TimelineEntry>>>> {
    if UnitRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("Unit", id));
    }
    let entries = UnitRepo::timeline(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_filter_is_optional_but_checked() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some("rented")).unwrap(), Some(UnitStatus::Rented));
        assert_matches!(parse_status(Some("sold")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn negative_or_nan_rate_is_rejected() {
        assert!(validate_rate(0.0).is_ok());
        assert!(validate_rate(150.0).is_ok());
        assert_matches!(validate_rate(-1.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_rate(f64::NAN), Err(CoreError::Validation(_)));
    }
}
