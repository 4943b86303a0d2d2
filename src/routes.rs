use crate::errors::ApiError;
use crate::models::{ChangeStatusRequest, GridRequest, RequestParams, SelectedOrders};
use crate::security::{AccessGuard, AccessMode, AdminResource};
use crate::service::OrderManagerService;
use crate::templates;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{RawQuery, Request, State},
    http::{HeaderMap, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const BASE_PATH: &str = "/admin/easy-order-manager";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderManagerService>,
    pub guard: Arc<dyn AccessGuard>,
}

impl AppState {
    pub fn new(service: OrderManagerService, guard: impl AccessGuard + 'static) -> Self {
        Self {
            service: Arc::new(service),
            guard: Arc::new(guard),
        }
    }
}

/// Every order manager route, nested under [`BASE_PATH`] and guarded by
/// order update access.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/list", get(list).post(list))
        .route("/list/csv", get(list_csv).post(list_csv))
        .route("/delete-selected", post(delete_selected))
        .route("/change-status-selected", post(change_status_selected))
        .route("/get-status-selected", post(get_status_selected))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_order_access))
        .with_state(state);

    Router::new().nest(BASE_PATH, routes)
}

async fn require_order_access(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state
        .guard
        .is_granted(request.headers(), AdminResource::Order, AccessMode::Update)
    {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "Order manager access denied");
        Err(ApiError::forbidden("Access denied"))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn is_xml_http_request(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// Query string first, then the form or JSON body; body values win.
fn request_params(
    headers: &HeaderMap,
    query: Option<&str>,
    body: &[u8],
) -> Result<RequestParams, ApiError> {
    let mut params = query
        .map(|query| RequestParams::from_urlencoded(query.as_bytes()))
        .unwrap_or_default();

    if !body.is_empty() {
        if is_json(headers) {
            let value: Value = serde_json::from_slice(body)?;
            params.extend(RequestParams::from_json(&value)?);
        } else {
            params.extend(RequestParams::from_urlencoded(body));
        }
    }
    Ok(params)
}

fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

fn query_locale(state: &AppState, query: Option<&str>) -> String {
    let params = query
        .map(|query| RequestParams::from_urlencoded(query.as_bytes()))
        .unwrap_or_default();
    state
        .service
        .locale(params.get("locale").filter(|locale| !locale.is_empty()))
        .to_string()
}

async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = GridRequest::from_params(request_params(&headers, query.as_deref(), &body)?)?;

    if is_xml_http_request(&headers) {
        let response = state.service.grid(&request).await?;
        return Ok(Json(response).into_response());
    }

    let locale = state.service.locale(request.locale.as_deref());
    let page = state.service.list_page(locale);
    let markup = templates::list_page(
        &page,
        &format!("{BASE_PATH}/list"),
        &format!("{BASE_PATH}/list/csv"),
    );
    Ok(Html(markup.into_string()).into_response())
}

async fn list_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = GridRequest::from_params(request_params(&headers, query.as_deref(), &body)?)?;
    let export = state.service.export_csv(&request).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (header::CONTENT_DISPOSITION, export.content_disposition()),
        ],
        export.body,
    )
        .into_response())
}

async fn delete_selected(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    let selected: SelectedOrders = json_body(&body)?;
    let locale = query_locale(&state, query.as_deref());
    let response = state
        .service
        .delete_selected(&selected.order_ids, &locale)
        .await?;
    Ok(Json(response).into_response())
}

async fn change_status_selected(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ChangeStatusRequest = json_body(&body)?;
    let response = state
        .service
        .change_status_selected(&request.order_ids, request.status_id)
        .await?;
    Ok(Json(response).into_response())
}

async fn get_status_selected(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    let selected: SelectedOrders = json_body(&body)?;
    let locale = query_locale(&state, query.as_deref());
    let response = state
        .service
        .get_status_selected(&selected.order_ids, &locale)
        .await?;
    Ok(Json(response).into_response())
}
