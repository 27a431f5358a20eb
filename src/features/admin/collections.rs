use crate::AppState;
use crate::domain::CollectionItem;
use crate::error::AppResult;
use crate::features::extract::{ApiJson, ApiPath};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

/// `GET|POST /` and `GET|PUT|DELETE /{id}` for one collection, mounted under `/api/admin/{name}`.
pub fn collection_router<T: CollectionItem>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler::<T>).post(create_handler::<T>))
        .route(
            "/{id}",
            get(get_handler::<T>)
                .put(update_handler::<T>)
                .delete(delete_handler::<T>),
        )
}

async fn list_handler<T: CollectionItem>(State(state): State<AppState>) -> AppResult<Json<Vec<T>>> {
    Ok(Json(state.content.list::<T>().await?))
}

async fn get_handler<T: CollectionItem>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<T>> {
    Ok(Json(state.content.get::<T>(id).await?))
}

async fn create_handler<T: CollectionItem>(
    State(state): State<AppState>,
    ApiJson(item): ApiJson<T>,
) -> AppResult<(StatusCode, Json<T>)> {
    let created = state.content.create(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_handler<T: CollectionItem>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(item): ApiJson<T>,
) -> AppResult<Json<T>> {
    Ok(Json(state.content.update(id, item).await?))
}

async fn delete_handler<T: CollectionItem>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.content.delete::<T>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
