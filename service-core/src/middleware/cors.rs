use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// CORS policy for public intake endpoints: any origin may call.
pub fn any_origin_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(super::tracing::REQUEST_ID_HEADER),
        ])
}
