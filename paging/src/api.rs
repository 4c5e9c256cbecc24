use crate::activity::Activity;
use crate::errors::PagingError;
use crate::interceptor::{Page, intercept};
use crate::merge::MergedContainer;
use axum::extract::{OriginalUri, Path, State};
use axum::http::Method;
use axum::routing::any;
use axum::{Json, Router};
use std::sync::Arc;

#[derive(Clone)]
struct ActivityState {
    container: Arc<MergedContainer<Activity>>,
}

/// Routes for the activity feed. Every verb is routed so that the paging
/// interceptor, not the router, decides what a non-GET request gets.
pub fn router(prefix: &str, container: Arc<MergedContainer<Activity>>) -> Router {
    let prefix = prefix.trim_matches('/');
    Router::new()
        .route(&format!("/{prefix}"), any(list_activities))
        .route(&format!("/{prefix}/"), any(list_activities))
        .route(&format!("/{prefix}/{{id}}"), any(get_activity))
        .with_state(ActivityState { container })
}

async fn list_activities(
    State(state): State<ActivityState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Page<Activity>, PagingError> {
    intercept(&method, &uri, || Ok(&*state.container))
}

async fn get_activity(
    State(state): State<ActivityState>,
    Path(id): Path<String>,
) -> Result<Json<Activity>, PagingError> {
    state.container.get(&id).map(Json)
}
