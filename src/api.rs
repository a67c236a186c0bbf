//! HTTP surface for the storefront and the admin back-office.

use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, FromRequest, FromRequestParts, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::color::ColorResolver;
use crate::domain::aggregates::{Cart, CartError, CartItem, Order, OrderError, OrderFlags};
use crate::domain::value_objects::{ColorInput, ColorLabel, Language, Money, ProgressPercent, Quantity, UnitKey};
use crate::progress::{NotificationStatus, ProgressError, ProgressTracker};
use crate::store::{OrderStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub tracker: ProgressTracker,
    pub resolver: Arc<ColorResolver>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "boutique-fulfillment"})) }))
        .route("/api/v1/colors/resolve", post(resolve_color))
        .route("/api/v1/orders", get(list_orders).post(create_order))
        .route("/api/v1/orders/:id", get(get_order).patch(patch_order).delete(delete_order))
        .route("/api/v1/orders/:id/lines/:index/remove", post(remove_units))
        .route("/api/v1/orders/:id/units", get(list_units))
        .route("/api/v1/orders/:id/progress", put(commit_progress))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::NotFound(format!("order {id}")),
            StoreError::Conflict { .. } => Self::Conflict(e.to_string()),
            other => Self::Storage(other),
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(e: ProgressError) -> Self {
        match e {
            ProgressError::UnknownOrder(id) => Self::NotFound(format!("order {id}")),
            ProgressError::Persistence(store) => store.into(),
            ProgressError::Regression { .. } => Self::Conflict(e.to_string()),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self { Self::BadRequest(e.to_string()) }
}

impl From<CartError> for ApiError {
    fn from(e: CartError) -> Self { Self::BadRequest(e.to_string()) }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self { Self::BadRequest(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Don't expose storage details to clients
        let message = match &self {
            Self::Storage(e) => {
                tracing::error!(error = %e, "request failed on storage");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// `Json` whose rejections answer with the `{"error": ..}` body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Path` whose rejections answer with the `{"error": ..}` body.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

// =============================================================================
// Colors
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ResolveColorRequest {
    pub input: ColorInput,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveColorResponse {
    /// `None` when the color is not recognized.
    pub label: Option<String>,
    pub labels: Option<ColorLabel>,
    /// Text to show: the resolved label, else the input as given.
    pub display: String,
}

async fn resolve_color(State(s): State<AppState>, AppJson(r): AppJson<ResolveColorRequest>) -> Json<ResolveColorResponse> {
    Json(ResolveColorResponse {
        label: s.resolver.resolve_to_language(&r.input, r.language),
        labels: s.resolver.resolve_all_languages(&r.input),
        display: r.input.display_in(&s.resolver, r.language),
    })
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub total: Money,
    /// Mean unit progress in percent.
    pub completion: u8,
}

impl OrderView {
    fn new(order: Order, lang: Language) -> Self {
        Self { total: order.total(), completion: order.completion(lang), order }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub email: Option<String>,
}

async fn list_orders(State(s): State<AppState>, Query(p): Query<ListOrdersParams>) -> ApiResult<Json<Vec<OrderView>>> {
    let orders = match p.email {
        Some(email) => s.store.fetch_by_email(&email).await?,
        None => s.store.fetch_all().await?,
    };
    let lang = s.tracker.key_language();
    Ok(Json(orders.into_iter().map(|o| OrderView::new(o, lang)).collect()))
}

async fn get_order(State(s): State<AppState>, AppPath(id): AppPath<Uuid>) -> ApiResult<Json<OrderView>> {
    let order = fetch_order(&s, id).await?;
    Ok(Json(OrderView::new(order, s.tracker.key_language())))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[validate(length(min = 1, max = 50))]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 1, max = 100))]
    pub quantity: u32,
    pub color: ColorInput,
    pub image: Option<String>,
    pub unit_price: Decimal,
}

fn default_currency() -> String { "DZD".to_string() }

async fn create_order(State(s): State<AppState>, AppJson(r): AppJson<CreateOrderRequest>) -> ApiResult<(StatusCode, Json<OrderView>)> {
    r.validate()?;
    let mut cart = Cart::new(&r.currency);
    for item in r.items {
        item.validate()?;
        cart.add_item(CartItem {
            quantity: Quantity::new(item.quantity).map_err(|e| ApiError::BadRequest(e.to_string()))?,
            color_name: item.color.to_label(&s.resolver),
            unit_price: Money::new(item.unit_price, &r.currency),
            product_id: item.product_id,
            title: item.title,
            image: item.image,
        })?;
    }
    tracing::debug!(cart_id = %cart.id(), lines = cart.item_count(), subtotal = %cart.subtotal().amount(), currency = cart.currency(), "checking out cart");
    let mut order = Order::from_cart(r.email, cart)?;
    let created = s.store.create(&order).await?;
    for event in order.take_events() {
        event.log();
    }
    Ok((StatusCode::CREATED, Json(OrderView::new(created, s.tracker.key_language()))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrderRequest {
    #[serde(flatten)]
    pub flags: OrderFlags,
    pub expected_version: Option<u64>,
}

async fn patch_order(State(s): State<AppState>, AppPath(id): AppPath<Uuid>, AppJson(r): AppJson<PatchOrderRequest>) -> ApiResult<Json<OrderView>> {
    let mut order = fetch_order(&s, id).await?;
    let expected = r.expected_version.unwrap_or(order.version());
    order.apply_flags(r.flags);
    let saved = s.store.replace(&order, expected).await?;
    for event in order.take_events() {
        event.log();
    }
    Ok(Json(OrderView::new(saved, s.tracker.key_language())))
}

async fn delete_order(State(s): State<AppState>, AppPath(id): AppPath<Uuid>) -> ApiResult<StatusCode> {
    if !s.store.delete(id).await? {
        return Err(ApiError::NotFound(format!("order {id}")));
    }
    tracing::info!(order_id = %id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUnitsRequest {
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub expected_version: Option<u64>,
}

async fn remove_units(
    State(s): State<AppState>,
    AppPath((id, index)): AppPath<(Uuid, usize)>,
    AppJson(r): AppJson<RemoveUnitsRequest>,
) -> ApiResult<Json<OrderView>> {
    r.validate()?;
    let mut order = fetch_order(&s, id).await?;
    let expected = r.expected_version.unwrap_or(order.version());
    let lang = s.tracker.key_language();
    order.remove_quantity(index, r.quantity, lang)?;
    let saved = s.store.replace(&order, expected).await?;
    for event in order.take_events() {
        event.log();
    }
    Ok(Json(OrderView::new(saved, lang)))
}

// =============================================================================
// Progress
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitView {
    pub key: UnitKey,
    pub product_id: String,
    pub color_name: String,
    pub occurrence: u32,
    pub progress: ProgressPercent,
}

async fn list_units(State(s): State<AppState>, AppPath(id): AppPath<Uuid>) -> ApiResult<Json<Vec<UnitView>>> {
    let order = fetch_order(&s, id).await?;
    let units = s
        .tracker
        .units(&order)
        .into_iter()
        .map(|(key, progress)| UnitView {
            product_id: key.product_id.clone(),
            color_name: key.color_name.clone(),
            occurrence: key.occurrence,
            key,
            progress,
        })
        .collect();
    Ok(Json(units))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitProgressRequest {
    pub unit: UnitKey,
    pub progress: ProgressPercent,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CommitProgressResponse {
    pub order: OrderView,
    pub notification: NotificationStatus,
}

async fn commit_progress(
    State(s): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(r): AppJson<CommitProgressRequest>,
) -> ApiResult<Json<CommitProgressResponse>> {
    let outcome = s.tracker.commit_progress(id, &r.unit, r.progress, r.expected_version).await?;
    Ok(Json(CommitProgressResponse {
        order: OrderView::new(outcome.order, s.tracker.key_language()),
        notification: outcome.notification,
    }))
}

async fn fetch_order(s: &AppState, id: Uuid) -> ApiResult<Order> {
    s.store.fetch(id).await?.ok_or_else(|| ApiError::NotFound(format!("order {id}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::notify::{Notifier, NotifyError, ProgressNotice};
    use crate::store::InMemoryOrderStore;

    #[derive(Default)]
    struct Outbox(Mutex<Vec<ProgressNotice>>);

    #[async_trait]
    impl Notifier for Outbox {
        async fn notify(&self, notice: &ProgressNotice) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    fn app() -> (Router, Arc<Outbox>) {
        let store: Arc<dyn OrderStore> = Arc::new(InMemoryOrderStore::new());
        let outbox = Arc::new(Outbox::default());
        let tracker = ProgressTracker::new(store.clone(), outbox.clone());
        let state = AppState { store, tracker, resolver: Arc::new(ColorResolver::new()) };
        (router(state), outbox)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    async fn create(app: &Router) -> Value {
        let (status, order) = call(app, "POST", "/api/v1/orders", Some(json!({
            "email": "client@example.com",
            "items": [
                {"productId": "P1", "title": "Robe", "quantity": 2, "color": "navy blue", "unitPrice": "4500"},
                {"productId": "P1", "title": "Robe", "quantity": 1, "color": {"en": "Navy", "fr": "Bleu marine", "ar": "كحلي"}, "unitPrice": "4500"},
                {"productId": "P2", "title": "Foulard", "quantity": 1, "color": "arc-en-ciel", "unitPrice": "900"}
            ]
        }))).await;
        assert_eq!(status, StatusCode::CREATED);
        order
    }

    #[tokio::test]
    async fn test_resolve_color_endpoint() {
        let (app, _) = app();
        let (status, body) = call(&app, "POST", "/api/v1/colors/resolve", Some(json!({"input": "Bleu marine", "language": "ar"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "كحلي");
        assert_eq!(body["labels"]["en"], "Navy");

        let (_, body) = call(&app, "POST", "/api/v1/colors/resolve", Some(json!({"input": "zxqv"}))).await;
        assert_eq!(body["label"], Value::Null);
        assert_eq!(body["display"], "zxqv");
    }

    #[tokio::test]
    async fn test_checkout_merges_identical_colors() {
        let (app, _) = app();
        let order = create(&app).await;
        let lines = order["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["quantity"], 3);
        assert_eq!(lines[0]["colorName"]["ar"], "كحلي");
        assert_eq!(lines[1]["colorName"], json!({"en": "arc-en-ciel", "fr": "arc-en-ciel", "ar": "arc-en-ciel"}));
        assert_eq!(order["total"]["amount"], "14400");
        assert_eq!(order["version"], 1);
    }

    #[tokio::test]
    async fn test_progress_flow_over_http() {
        let (app, outbox) = app();
        let order = create(&app).await;
        let id = order["id"].as_str().unwrap();

        let (_, units) = call(&app, "GET", &format!("/api/v1/orders/{id}/units"), None).await;
        let keys: Vec<&str> = units.as_array().unwrap().iter().map(|u| u["key"].as_str().unwrap()).collect();
        assert_eq!(keys, vec!["P1|Bleu marine|0", "P1|Bleu marine|1", "P1|Bleu marine|2", "P2|arc-en-ciel|0"]);

        let uri = format!("/api/v1/orders/{id}/progress");
        let (status, body) = call(&app, "PUT", &uri, Some(json!({"unit": "P1|Bleu marine|1", "progress": 40}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notification"]["status"], "not_required");

        let (_, body) = call(&app, "PUT", &uri, Some(json!({"unit": "P1|Bleu marine|1", "progress": 100, "expectedVersion": 2}))).await;
        assert_eq!(body["notification"]["status"], "sent");
        assert_eq!(body["order"]["productProgress"]["P1|Bleu marine|1"], 100);
        assert_eq!(body["order"]["completion"], 25);
        assert_eq!(outbox.0.lock().unwrap()[0].product_key, "P1|Bleu marine");

        let (status, _) = call(&app, "PUT", &uri, Some(json!({"unit": "P1|Bleu marine|0", "progress": 20, "expectedVersion": 1}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, body) = call(&app, "PUT", &uri, Some(json!({"unit": "P1|Bleu marine|0", "progress": 50}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("0, 20, 40, 60, 80, 100"));
        let (status, _) = call(&app, "PUT", &uri, Some(json!({"unit": "P1|Bleu marine|7", "progress": 20}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_partial_removal_prunes_progress() {
        let (app, _) = app();
        let order = create(&app).await;
        let id = order["id"].as_str().unwrap();
        call(&app, "PUT", &format!("/api/v1/orders/{id}/progress"), Some(json!({"unit": "P1|Bleu marine|2", "progress": 60}))).await;

        let (status, body) = call(&app, "POST", &format!("/api/v1/orders/{id}/lines/0/remove"), Some(json!({"quantity": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lines"][0]["quantity"], 2);
        assert_eq!(body["productProgress"], json!({}));

        let (status, _) = call(&app, "POST", &format!("/api/v1/orders/{id}/lines/5/remove"), Some(json!({"quantity": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_flags_listing_and_delete() {
        let (app, _) = app();
        let order = create(&app).await;
        let id = order["id"].as_str().unwrap();

        let (status, body) = call(&app, "PATCH", &format!("/api/v1/orders/{id}"), Some(json!({"isPaid": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isPaid"], true);
        assert_eq!(body["isDelivered"], false);

        let (_, list) = call(&app, "GET", "/api/v1/orders?email=CLIENT@example.com", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, "DELETE", &format!("/api/v1/orders/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "GET", &format!("/api/v1/orders/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_invalid_checkout() {
        let (app, _) = app();
        let (status, body) = call(&app, "POST", "/api/v1/orders", Some(json!({"email": "not-an-email", "items": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let item = json!({"productId": "P1", "title": "Robe", "quantity": 1, "color": "rouge", "unitPrice": "100"});
        let items: Vec<Value> = (0..51).map(|_| item.clone()).collect();
        let (status, _) = call(&app, "POST", "/api/v1/orders", Some(json!({"email": "client@example.com", "items": items}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_requests_answer_with_json_errors() {
        let (app, _) = app();
        let (status, body) = call(&app, "GET", "/api/v1/orders/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = call(&app, "POST", "/api/v1/colors/resolve", Some(json!({"language": "fr"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("input"));
    }
}
