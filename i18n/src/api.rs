use crate::cache::{Resolution, ResolutionCache};
use crate::errors::I18nError;
use crate::key::BundleKey;
use crate::locale::{Locale, LocaleResolution};
use crate::resolver::TranslationTable;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use shared::envelope::Envelope;
use std::sync::Arc;

const RELEASE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
const SNAPSHOT_CACHE_CONTROL: &str = "no-cache";

#[derive(Clone)]
struct BundleState {
    cache: Arc<ResolutionCache>,
    default_locale: Locale,
}

#[derive(Serialize)]
struct BundlePayload<'a> {
    data: &'a TranslationTable,
    #[serde(rename = "cache-timestamp")]
    cache_timestamp: u64,
}

/// Routes `{prefix}/$PLUGIN_NAME/$PLUGIN_VERSION/$BUNDLE_NAME[/$LOCALE]`.
pub fn router(prefix: &str, cache: Arc<ResolutionCache>, default_locale: Locale) -> Router {
    let prefix = prefix.trim_matches('/');
    Router::new()
        .route(&format!("/{prefix}"), get(missing_identity))
        .route(&format!("/{prefix}/"), get(missing_identity))
        .route(&format!("/{prefix}/{{*identity}}"), get(get_bundle))
        .with_state(BundleState {
            cache,
            default_locale,
        })
}

async fn missing_identity() -> I18nError {
    I18nError::MalformedIdentity
}

async fn get_bundle(
    State(state): State<BundleState>,
    Path(identity): Path<String>,
    headers: HeaderMap,
) -> Result<Response, I18nError> {
    let key: BundleKey = identity.parse()?;
    let request_default = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(Locale::from_accept_language)
        .unwrap_or_else(|| state.default_locale.clone());
    let locale = LocaleResolution::resolve(&key, &request_default);

    let entry = state.cache.resolve(&key, &locale)?;
    let Resolution::Found(table) = entry.resolution() else {
        tracing::warn!(%key, "unknown plugin or resource bundle");
        return Err(I18nError::UnknownIdentity(key.to_string()));
    };

    let cache_control = if key.is_release_version() {
        RELEASE_CACHE_CONTROL
    } else {
        SNAPSHOT_CACHE_CONTROL
    };
    let payload = BundlePayload {
        data: table,
        cache_timestamp: entry.timestamp(),
    };
    Ok(([(header::CACHE_CONTROL, cache_control)], Envelope::Ok(payload)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::errors::LoadError;
    use crate::resolver::{
        BundleLoader, FilesystemPluginResolver, PluginHandle, PluginResolver,
        PropertiesBundleLoader,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct CountingResolver {
        inner: FilesystemPluginResolver,
        calls: AtomicUsize,
    }

    impl PluginResolver for CountingResolver {
        fn resolve(&self, name: &str, version: &str) -> Option<PluginHandle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve(name, version)
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        resolver: Arc<CountingResolver>,
        app: Router,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let bundle_dir = dir.path().join("blueocean").join("io").join("jenkins");
        fs::create_dir_all(&bundle_dir).unwrap();
        fs::write(bundle_dir.join("Messages.properties"), "run=Run\nstop=Stop\n").unwrap();
        fs::write(bundle_dir.join("Messages_fr.properties"), "run=Lancer\n").unwrap();
        fs::write(bundle_dir.join("Messages_fr_CA.properties"), "run=Partir\n").unwrap();
        fs::write(bundle_dir.join("Broken.properties"), "bad=\\u00\n").unwrap();

        let resolver = Arc::new(CountingResolver {
            inner: FilesystemPluginResolver::new(dir.path()),
            calls: AtomicUsize::new(0),
        });
        let loader: Arc<dyn BundleLoader> = Arc::new(PropertiesBundleLoader);
        let cache = ResolutionCache::new(&CacheConfig::default(), resolver.clone(), loader);
        let app = router("blueocean-i18n", Arc::new(cache), Locale::new("en"));

        Fixture {
            _dir: dir,
            resolver,
            app,
        }
    }

    async fn send(
        app: &Router,
        uri: &str,
        accept_language: Option<&str>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = accept_language {
            request = request.header(header::ACCEPT_LANGUAGE, value);
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bundle_with_locale() {
        let fixture = fixture();
        let (status, headers, body) = send(
            &fixture.app,
            "/blueocean-i18n/blueocean/1.0.3/io.jenkins.Messages/fr-CA",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], RELEASE_CACHE_CONTROL);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data"]["run"], "Partir");
        assert_eq!(body["data"]["stop"], "Stop");
        assert!(body["cache-timestamp"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_accept_language_is_the_fallback() {
        let fixture = fixture();
        let (status, headers, body) = send(
            &fixture.app,
            "/blueocean-i18n/blueocean/1.1-SNAPSHOT/io.jenkins.Messages",
            Some("fr;q=0.9, en;q=0.5"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], SNAPSHOT_CACHE_CONTROL);
        assert_eq!(body["data"]["run"], "Lancer");

        let (_, _, body) = send(
            &fixture.app,
            "/blueocean-i18n/blueocean/1.2/io.jenkins.Messages",
            None,
        )
        .await;
        assert_eq!(body["data"]["run"], "Run");
    }

    #[tokio::test]
    async fn test_unknown_identity_is_resolved_once() {
        let fixture = fixture();
        let uri = "/blueocean-i18n/myplugin/1.0/messages";

        for _ in 0..2 {
            let (status, headers, body) = send(&fixture.app, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(headers.get(header::CACHE_CONTROL).is_none());
            assert_eq!(body["status"], "error");
            assert_eq!(
                body["message"],
                "Unknown plugin or resource bundle: myplugin/1.0/messages"
            );
        }
        assert_eq!(fixture.resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_identity() {
        let fixture = fixture();
        for uri in [
            "/blueocean-i18n",
            "/blueocean-i18n/",
            "/blueocean-i18n//",
            "/blueocean-i18n/blueocean",
            "/blueocean-i18n/blueocean/1.0",
            "/blueocean-i18n/blueocean/1.0/io.jenkins.Messages/fr/extra",
        ] {
            let (status, _, body) = send(&fixture.app, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["status"], "error");
            assert!(body["message"].as_str().unwrap().contains("$PLUGIN_NAME"));
        }
        assert_eq!(fixture.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_loader_failure_is_a_server_error() {
        let fixture = fixture();
        let (status, _, body) = send(
            &fixture.app,
            "/blueocean-i18n/blueocean/1.0/io.jenkins.Broken",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("Broken.properties"));
    }

    #[test]
    fn test_load_error_message_names_file() {
        let err = I18nError::from(Arc::new(LoadError::Io {
            path: "/x/Messages.properties".into(),
            source: std::io::Error::other("denied"),
        }));
        assert!(err.to_string().contains("Messages.properties"));
    }
}
