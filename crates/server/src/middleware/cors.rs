//! CORS policy for the till and cart web clients.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer.
///
/// An empty `origins` list allows any origin. Origins that are not valid
/// header values are skipped with a warning.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| tracing::warn!(origin = %origin, error = %e, "Ignoring CORS origin"))
                .ok()
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
