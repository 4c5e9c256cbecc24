//! Renders a [`Pageable`] operation result as one HTTP page.
//!
//! The interceptor owns the request-facing half of pagination: it refuses
//! anything but GET, turns the `start` / `limit` query parameters into a
//! [`PageWindow`], materializes that window and computes the `Link` header
//! pointing at the following window.

use crate::errors::PagingError;
use crate::metrics_defs::{PAGE_SERVED, PAGE_SIZE};
use crate::pageable::Pageable;
use crate::window::PageWindow;
use axum::Json;
use axum::http::{Method, Uri, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use shared::{counter, histogram};

/// One materialized window plus its continuation link.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
    pub next_link: String,
}

impl<T> Page<T> {
    /// Value of the `Link` response header.
    pub fn link_header(&self) -> String {
        format!("<{}>; rel=\"next\"", self.next_link)
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let link = self.link_header();
        ([(header::LINK, link)], Json(self.items)).into_response()
    }
}

/// Invokes `operation` for a GET request and renders the requested window.
///
/// The continuation link is produced for every page, including the last one.
pub fn intercept<T: 'static, P, F>(method: &Method, uri: &Uri, operation: F) -> Result<Page<T>, PagingError>
where
    P: Pageable<T>,
    F: FnOnce() -> Result<P, PagingError>,
{
    if method != Method::GET {
        return Err(PagingError::UnsupportedMethod(method.clone()));
    }

    let pageable = operation()?;
    let window = PageWindow::from_query(uri.query());
    let items: Vec<T> = pageable.window(window).collect();
    let next_link = next_link(uri, window);

    tracing::debug!(
        start = window.start,
        limit = window.limit,
        returned = items.len(),
        "served page"
    );
    counter!(PAGE_SERVED).increment(1);
    histogram!(PAGE_SIZE).record(items.len() as f64);

    Ok(Page {
        items,
        window,
        next_link,
    })
}

/// The request path and query with `start` / `limit` replaced by those of
/// the window following `window`. Other parameters are kept verbatim.
pub fn next_link(uri: &Uri, window: PageWindow) -> String {
    let next = window.next();
    let retained: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| {
            let name = pair.split_once('=').map_or(*pair, |(name, _)| name);
            !pair.is_empty() && name != "start" && name != "limit"
        })
        .collect();

    let separator = if retained.is_empty() { '?' } else { '&' };
    let mut link = uri.path().to_string();
    if !retained.is_empty() {
        link.push('?');
        link.push_str(&retained.join("&"));
    }
    link.push_str(&format!(
        "{separator}start={}&limit={}",
        next.start, next.limit
    ));
    link
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    fn letters() -> Result<Vec<char>, PagingError> {
        Ok(('a'..='z').collect())
    }

    #[test]
    fn test_default_window() {
        let page = intercept(&Method::GET, &uri("/activities"), letters).unwrap();
        assert_eq!(page.window, PageWindow::new(0, 100));
        assert_eq!(page.items.len(), 26);
        assert_eq!(page.next_link, "/activities?start=100&limit=100");
    }

    #[test]
    fn test_requested_window() {
        let page = intercept(&Method::GET, &uri("/activities?start=3&limit=2"), letters).unwrap();
        assert_eq!(page.items, vec!['d', 'e']);
        assert_eq!(page.next_link, "/activities?start=5&limit=2");
        assert_eq!(page.link_header(), "</activities?start=5&limit=2>; rel=\"next\"");
    }

    #[test]
    fn test_link_is_set_past_the_end() {
        let page = intercept(&Method::GET, &uri("/activities?start=30&limit=10"), letters).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_link, "/activities?start=40&limit=10");
    }

    #[test]
    fn test_non_get_is_rejected_before_operation_runs() {
        let mut invoked = false;
        let result = intercept(&Method::POST, &uri("/activities"), || {
            invoked = true;
            letters()
        });
        assert!(matches!(result, Err(PagingError::UnsupportedMethod(m)) if m == Method::POST));
        assert!(!invoked);
    }

    #[test]
    fn test_unparsable_params_use_defaults() {
        let page =
            intercept(&Method::GET, &uri("/activities?start=x&limit=-3"), letters).unwrap();
        assert_eq!(page.window, PageWindow::new(0, 100));
    }

    #[test]
    fn test_next_link_keeps_other_params() {
        let link = next_link(
            &uri("/runs?branch=main&start=10&limit=5&q=a%20b"),
            PageWindow::new(10, 5),
        );
        assert_eq!(link, "/runs?branch=main&q=a%20b&start=15&limit=5");

        let link = next_link(&uri("/runs?start=0&limit=5"), PageWindow::new(0, 5));
        assert_eq!(link, "/runs?start=5&limit=5");

        let link = next_link(&uri("/runs?"), PageWindow::new(0, 5));
        assert_eq!(link, "/runs?start=5&limit=5");
    }
}
