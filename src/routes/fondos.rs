use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use sea_orm::sea_query::{Expr, ExprTrait};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{fondo, Fondo};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, starting at 1 (default: 1)
    #[serde(default = "default_page")]
    #[param(required = false)]
    page: u64,
    /// Records per page (default: 10)
    #[serde(default = "default_limit")]
    #[param(required = false)]
    limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    /// Total number of records across all pages
    pub total: u64,
    /// Page that was returned
    pub page: u64,
    /// Page size that was applied
    pub limit: u64,
    /// Total number of pages at this page size
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FondoListResponse {
    /// One page of fund records, ordered by id
    pub data: Vec<fondo::Model>,
    pub pagination: Pagination,
}

/// List funds, paginated
#[utoipa::path(
    get,
    path = "/fondos",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of funds plus pagination metadata", body = FondoListResponse),
        (status = 500, description = "Database failure")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_fondos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Zero would make the page size degenerate; clamp both to at least 1.
    let page = query.page.max(1);
    let limit = query.limit.max(1);

    let paginator = Fondo::find()
        .order_by_asc(fondo::Column::Id)
        .paginate(state.db.as_ref(), limit);

    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(page - 1).await?;

    Ok(Json(FondoListResponse {
        data,
        pagination: Pagination {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        },
    }))
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Exact platform name to match
    #[param(required = false)]
    plataforma: Option<String>,
    /// Inclusive lower bound on the open date (fechainicio)
    #[param(required = false)]
    fecha_desde: Option<String>,
    /// Inclusive upper bound on the open date (fechainicio)
    #[param(required = false)]
    fecha_hasta: Option<String>,
}

/// Search funds by platform and/or open-date range
#[utoipa::path(
    get,
    path = "/fondos/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Funds matching every supplied filter", body = Vec<fondo::Model>),
        (status = 400, description = "Unparseable date filter"),
        (status = 500, description = "Database failure")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn search_fondos(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Empty conjunction is trivially true, so absent filters add nothing.
    let mut condition = Condition::all();

    if let Some(plataforma) = &query.plataforma {
        condition = condition.add(fondo::Column::Plataforma.eq(plataforma.clone()));
    }
    if let Some(raw) = &query.fecha_desde {
        let desde = parse_fecha(raw)
            .ok_or_else(|| AppError::InvalidRequest(format!("unparseable fecha_desde: {}", raw)))?;
        condition = condition.add(fondo::Column::Fechainicio.gte(desde));
    }
    if let Some(raw) = &query.fecha_hasta {
        let hasta = parse_fecha(raw)
            .ok_or_else(|| AppError::InvalidRequest(format!("unparseable fecha_hasta: {}", raw)))?;
        condition = condition.add(fondo::Column::Fechainicio.lte(hasta));
    }

    let fondos = Fondo::find()
        .filter(condition)
        .order_by_asc(fondo::Column::Id)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(fondos))
}

/// Get a single fund by id
#[utoipa::path(
    get,
    path = "/fondos/{id}",
    params(("id" = i32, Path, description = "Fund id")),
    responses(
        (status = 200, description = "The requested fund", body = fondo::Model),
        (status = 404, description = "No fund with that id"),
        (status = 500, description = "Database failure")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_fondo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let fondo = Fondo::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or(AppError::FundNotFound(id))?;

    Ok(Json(fondo))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFondo {
    /// Fund name
    nombre: Option<String>,
    /// Link to the fund's page on its platform
    url: Option<String>,
    /// Platform hosting the fund
    plataforma: Option<String>,
    /// Open date, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    fechainicio: Option<String>,
    /// Close date, same formats as fechainicio
    fechacierre: Option<String>,
}

/// Create a fund
#[utoipa::path(
    post,
    path = "/fondos",
    request_body = CreateFondo,
    responses(
        (status = 201, description = "Fund created, counter starts at 0", body = fondo::Model),
        (status = 400, description = "Missing or unparseable fields"),
        (status = 500, description = "Database failure")
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn create_fondo(
    State(state): State<AppState>,
    Json(input): Json<CreateFondo>,
) -> Result<impl IntoResponse, AppError> {
    // A field that is absent or an empty string is equally useless; both
    // count as missing.
    let mut missing = Vec::new();
    if !presente(&input.nombre) {
        missing.push("nombre");
    }
    if !presente(&input.url) {
        missing.push("url");
    }
    if !presente(&input.plataforma) {
        missing.push("plataforma");
    }
    if !presente(&input.fechainicio) {
        missing.push("fechainicio");
    }
    if !presente(&input.fechacierre) {
        missing.push("fechacierre");
    }

    let (Some(nombre), Some(url), Some(plataforma), Some(inicio_raw), Some(cierre_raw)) = (
        input.nombre,
        input.url,
        input.plataforma,
        input.fechainicio,
        input.fechacierre,
    ) else {
        return Err(AppError::MissingFields(missing));
    };
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let fechainicio = parse_fecha(&inicio_raw).ok_or_else(|| {
        AppError::InvalidRequest(format!("unparseable fechainicio: {}", inicio_raw))
    })?;
    let fechacierre = parse_fecha(&cierre_raw).ok_or_else(|| {
        AppError::InvalidRequest(format!("unparseable fechacierre: {}", cierre_raw))
    })?;

    let nuevo = fondo::ActiveModel {
        nombre: Set(nombre),
        url: Set(url),
        plataforma: Set(plataforma),
        fechainicio: Set(fechainicio),
        fechacierre: Set(fechacierre),
        // Counter always starts at zero, whatever the client sent.
        contador: Set(0),
        ..Default::default()
    };

    let creado = nuevo.insert(state.db.as_ref()).await?;
    tracing::info!(id = creado.id, "fund created");

    Ok((StatusCode::CREATED, Json(creado)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFondo {
    nombre: String,
    url: String,
    plataforma: String,
    /// Open date, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    fechainicio: String,
    /// Close date, same formats as fechainicio
    fechacierre: String,
}

/// Replace the editable fields of a fund
#[utoipa::path(
    put,
    path = "/fondos/{id}",
    params(("id" = i32, Path, description = "Fund id")),
    request_body = UpdateFondo,
    responses(
        (status = 200, description = "The updated fund", body = fondo::Model),
        (status = 400, description = "Unparseable date field"),
        (status = 404, description = "No fund with that id"),
        (status = 422, description = "Body missing a required field"),
        (status = 500, description = "Database failure")
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn update_fondo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateFondo>,
) -> Result<impl IntoResponse, AppError> {
    let fechainicio = parse_fecha(&input.fechainicio).ok_or_else(|| {
        AppError::InvalidRequest(format!("unparseable fechainicio: {}", input.fechainicio))
    })?;
    let fechacierre = parse_fecha(&input.fechacierre).ok_or_else(|| {
        AppError::InvalidRequest(format!("unparseable fechacierre: {}", input.fechacierre))
    })?;

    // Single UPDATE ... RETURNING, so a concurrent delete yields a clean 404
    // instead of a failed save.
    let activo = fondo::ActiveModel {
        nombre: Set(input.nombre),
        url: Set(input.url),
        plataforma: Set(input.plataforma),
        fechainicio: Set(fechainicio),
        fechacierre: Set(fechacierre),
        ..Default::default()
    };

    let actualizados = Fondo::update_many()
        .set(activo)
        .filter(fondo::Column::Id.eq(id))
        .exec_with_returning(state.db.as_ref())
        .await?;

    let actualizado = actualizados
        .into_iter()
        .next()
        .ok_or(AppError::FundNotFound(id))?;

    Ok(Json(actualizado))
}

/// Increment a fund's hit counter
#[utoipa::path(
    patch,
    path = "/fondos/{id}/incrementar",
    params(("id" = i32, Path, description = "Fund id")),
    responses(
        (status = 200, description = "The fund with its counter incremented", body = fondo::Model),
        (status = 404, description = "No fund with that id"),
        (status = 500, description = "Database failure")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn increment_fondo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    // Single UPDATE ... RETURNING, so concurrent increments never lose one.
    let actualizados = Fondo::update_many()
        .col_expr(
            fondo::Column::Contador,
            Expr::col(fondo::Column::Contador).add(1),
        )
        .filter(fondo::Column::Id.eq(id))
        .exec_with_returning(state.db.as_ref())
        .await?;

    let fondo = actualizados
        .into_iter()
        .next()
        .ok_or(AppError::FundNotFound(id))?;

    Ok(Json(fondo))
}

/// Delete a fund
#[utoipa::path(
    delete,
    path = "/fondos/{id}",
    params(("id" = i32, Path, description = "Fund id")),
    responses(
        (status = 204, description = "Fund deleted"),
        (status = 404, description = "No fund with that id"),
        (status = 500, description = "Database failure")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_fondo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let resultado = Fondo::delete_by_id(id).exec(state.db.as_ref()).await?;

    if resultado.rows_affected == 0 {
        return Err(AppError::FundNotFound(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn presente(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Parse a date field, with or without a time component. A bare date means
/// midnight.
pub fn parse_fecha(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
