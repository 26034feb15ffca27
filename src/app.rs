use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::AnalyticsStore;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Dependencies shared by every handler, injected at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnalyticsStore>,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(store: Arc<dyn AnalyticsStore>, verifier: TokenVerifier) -> Self {
        Self { store, verifier }
    }
}

impl FromRef<AppState> for TokenVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

/// Full router: public routes, token-gated API routes, and global layers
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{analytics, data};

    Router::new()
        // Raw table inspection
        .route("/api/fetch_table", get(data::fetch_table))
        // Customer analytics
        .route("/api/customers/avg-tenure", get(analytics::avg_tenure))
        .route("/api/customers/monthly-joins", get(analytics::monthly_joins))
        // Company analytics
        .route("/api/companies/by-sector-country", get(analytics::by_sector_country))
        .route("/api/companies/currency-distribution", get(analytics::currency_distribution))
        // Stock price analytics
        .route("/api/stocks/price-trend", get(analytics::price_trend))
        .route("/api/stocks/volatility", get(analytics::volatility))
        // Runs before every route above; short-circuits with 401/403
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}
