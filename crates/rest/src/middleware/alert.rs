//! Error alert middleware.
//!
//! Handlers and extractors fail with [`RestError`](crate::error::RestError),
//! which cannot see the application name. Its response carries an
//! [`ErrorKey`] extension instead, and this middleware turns that into the
//! `X-{app}-error: error.{key}` header.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ErrorKey;
use crate::responses::ResponseHeaders;

/// Middleware function adding the error alert header.
///
/// Use with `axum::middleware::from_fn_with_state`, passing the application
/// name as state.
pub async fn error_alert_middleware(
    State(application_name): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if let Some(ErrorKey(key)) = response.extensions().get::<ErrorKey>().cloned() {
        debug!(error_key = %key, status = response.status().as_u16(), "Adding error alert");
        let headers = ResponseHeaders::new()
            .with_error(&application_name, &key)
            .into_header_map();
        response.headers_mut().extend(headers);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    use crate::error::RestError;

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route(
                "/fail",
                get(|| async { Err::<(), _>(RestError::bad_request("idnull", "Invalid id")) }),
            )
            .layer(middleware::from_fn_with_state(
                Arc::<str>::from("contentApp"),
                error_alert_middleware,
            ))
    }

    #[tokio::test]
    async fn test_error_header_added() {
        let response = app()
            .oneshot(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["x-contentapp-error"], "error.idnull");
    }

    #[tokio::test]
    async fn test_success_untouched() {
        let response = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-contentapp-error"));
    }
}
