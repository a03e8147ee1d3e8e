//! Response header generation.
//!
//! Provides a builder for the headers the content API attaches to its
//! responses:
//!
//! - `Location` for created entities
//! - `X-Total-Count` and `Link` (`next`, `prev`, `last`, `first`) for pages
//! - `X-{app}-alert` / `X-{app}-params` on create, update and delete
//! - `X-{app}-error` on failed requests

use bon_content_persistence::types::Page;
use http::{HeaderMap, HeaderName, HeaderValue, Uri, header};

/// Header carrying the total number of matching elements.
pub static X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

/// Entity change announced through alert headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Entity created.
    Created,
    /// Entity updated.
    Updated,
    /// Entity deleted.
    Deleted,
}

impl AlertAction {
    /// Returns the action as used in alert keys.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertAction::Created => "created",
            AlertAction::Updated => "updated",
            AlertAction::Deleted => "deleted",
        }
    }
}

/// Builder for content API response headers.
///
/// Values that cannot be represented as header values are skipped.
#[derive(Debug, Default)]
pub struct ResponseHeaders {
    headers: HeaderMap,
}

impl ResponseHeaders {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(location) {
            self.headers.insert(header::LOCATION, value);
        }
        self
    }

    /// Sets `X-{app}-alert` and `X-{app}-params` for an entity change.
    pub fn with_alert(mut self, app: &str, entity: &str, action: AlertAction, param: &str) -> Self {
        let message = format!("{}.{}.{}", app, entity, action.as_str());
        self.insert_app_header(app, "alert", &message);
        self.insert_app_header(app, "params", param);
        self
    }

    /// Sets `X-{app}-error` for a failed request.
    pub fn with_error(mut self, app: &str, error_key: &str) -> Self {
        self.insert_app_header(app, "error", &format!("error.{}", error_key));
        self
    }

    /// Sets `X-Total-Count` and the `Link` header for a page.
    ///
    /// Links reuse the request path and query (criteria and sort included),
    /// replacing only `page` and `size`.
    pub fn with_pagination<T>(mut self, base_url: &str, uri: &Uri, page: &Page<T>) -> Self {
        self.headers
            .insert(X_TOTAL_COUNT.clone(), HeaderValue::from(page.total_elements));
        let link = link_header(base_url, uri, page);
        if let Ok(value) = HeaderValue::from_str(&link) {
            self.headers.insert(header::LINK, value);
        }
        self
    }

    fn insert_app_header(&mut self, app: &str, suffix: &str, value: &str) {
        let name = HeaderName::try_from(format!("x-{}-{}", app, suffix));
        if let (Ok(name), Ok(value)) = (name, HeaderValue::from_str(value)) {
            self.headers.insert(name, value);
        }
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        self.headers.clone()
    }

    /// Consumes the builder, returning the headers.
    pub fn into_header_map(self) -> HeaderMap {
        self.headers
    }
}

/// Builds the RFC 5988 `Link` value for a page.
fn link_header<T>(base_url: &str, uri: &Uri, page: &Page<T>) -> String {
    let last = page.total_pages().saturating_sub(1);
    let number = u64::from(page.number);

    let mut links = Vec::with_capacity(4);
    if number < last {
        links.push(link(base_url, uri, number + 1, page.size, "next"));
    }
    if number > 0 {
        links.push(link(base_url, uri, number - 1, page.size, "prev"));
    }
    links.push(link(base_url, uri, last, page.size, "last"));
    links.push(link(base_url, uri, 0, page.size, "first"));
    links.join(",")
}

fn link(base_url: &str, uri: &Uri, page: u64, size: u32, rel: &str) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(existing) = uri.query() {
        for (key, value) in url::form_urlencoded::parse(existing.as_bytes()) {
            if key != "page" && key != "size" {
                query.append_pair(&key, &value);
            }
        }
    }
    query.append_pair("page", &page.to_string());
    query.append_pair("size", &size.to_string());

    format!(
        "<{}{}?{}>; rel=\"{}\"",
        base_url.trim_end_matches('/'),
        uri.path(),
        query.finish(),
        rel
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bon_content_persistence::types::PageRequest;

    fn page(number: u32, size: u32, total: u64) -> Page<u8> {
        Page::new(Vec::new(), &PageRequest::new(number, size), total)
    }

    #[test]
    fn test_alert_headers() {
        let map = ResponseHeaders::new()
            .with_alert("contentApp", "bonContentServiceTag", AlertAction::Created, "7")
            .into_header_map();

        assert_eq!(
            map["x-contentapp-alert"],
            "contentApp.bonContentServiceTag.created"
        );
        assert_eq!(map["x-contentapp-params"], "7");
    }

    #[test]
    fn test_error_header() {
        let map = ResponseHeaders::new()
            .with_error("contentApp", "idexists")
            .into_header_map();
        assert_eq!(map["x-contentapp-error"], "error.idexists");
    }

    #[test]
    fn test_location() {
        let map = ResponseHeaders::new()
            .with_location("/api/tags/3")
            .to_header_map();
        assert_eq!(map[header::LOCATION], "/api/tags/3");
    }

    #[test]
    fn test_middle_page_links() {
        let uri: Uri = "/api/tags?name.contains=a&page=1&size=10&sort=name,desc"
            .parse()
            .unwrap();
        let map = ResponseHeaders::new()
            .with_pagination("http://localhost:8080/", &uri, &page(1, 10, 35))
            .into_header_map();

        assert_eq!(map[&X_TOTAL_COUNT], "35");
        let link = map[header::LINK].to_str().unwrap();
        assert_eq!(
            link,
            "<http://localhost:8080/api/tags?name.contains=a&sort=name%2Cdesc&page=2&size=10>; rel=\"next\",\
             <http://localhost:8080/api/tags?name.contains=a&sort=name%2Cdesc&page=0&size=10>; rel=\"prev\",\
             <http://localhost:8080/api/tags?name.contains=a&sort=name%2Cdesc&page=3&size=10>; rel=\"last\",\
             <http://localhost:8080/api/tags?name.contains=a&sort=name%2Cdesc&page=0&size=10>; rel=\"first\""
        );
    }

    #[test]
    fn test_single_page_links() {
        let uri: Uri = "/api/stories".parse().unwrap();
        let link = link_header("http://localhost", &uri, &page(0, 20, 0));
        assert!(!link.contains("rel=\"next\""));
        assert!(!link.contains("rel=\"prev\""));
        assert!(link.contains("<http://localhost/api/stories?page=0&size=20>; rel=\"last\""));
        assert!(link.contains("rel=\"first\""));
    }
}
