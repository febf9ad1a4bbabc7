use crate::auth::AuthUser;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pairvote_app::domain::{Suggestion, SuggestionPage, User, Vote, VotePage};
use pairvote_app::AppContext;
use pairvote_errors::AppError;
use serde::Deserialize;

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/suggestions", get(list_suggestions).post(create_suggestion))
        .route("/api/suggestions/{id}", get(get_suggestion))
        .route("/api/votes/pair", get(sample_pair))
        .route("/api/votes", post(cast_vote))
        .route("/api/votes/user/{id}", get(user_votes))
        .route("/api/users/me", get(current_user))
        .route("/api/users", post(upsert_user))
        .with_state(ctx)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Pairvote API" }))
}

#[derive(Deserialize)]
struct ListQuery {
    page: Option<u64>,
    #[serde(alias = "pageSize")]
    page_size: Option<u64>,
    #[serde(alias = "sortBy")]
    sort_by: Option<String>,
    #[serde(alias = "sortOrder")]
    sort_order: Option<String>,
}

async fn list_suggestions(
    State(ctx): State<AppContext>,
    Query(q): Query<ListQuery>,
) -> Result<Json<SuggestionPage>, AppError> {
    let page = ctx
        .list_suggestions
        .execute(q.page, q.page_size, q.sort_by.as_deref(), q.sort_order.as_deref())
        .await?;
    Ok(Json(page))
}

#[derive(Deserialize)]
struct CreateSuggestionBody {
    description: String,
}

async fn create_suggestion(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Json(body): Json<CreateSuggestionBody>,
) -> Result<(StatusCode, Json<Suggestion>), AppError> {
    ctx.ensure_user
        .execute(&user.id, &user.email, &user.name)
        .await?;
    let suggestion = ctx
        .create_suggestion
        .execute(&user.id, &body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(suggestion)))
}

async fn get_suggestion(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<Suggestion>, AppError> {
    let model = ctx
        .suggestions
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("suggestion"))?;
    Ok(Json(model.into()))
}

async fn sample_pair(State(ctx): State<AppContext>, user: AuthUser) -> Result<Response, AppError> {
    match ctx.sample_pair.execute(&user.id).await? {
        Some((first, second)) => Ok(Json(serde_json::json!({
            "pair": [first, second],
        }))
        .into_response()),
        // Distinct "nothing left to vote on" condition, not a generic error.
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "no_eligible_pairs",
                "message": "no more suggestions to vote on",
            })),
        )
            .into_response()),
    }
}

#[derive(Deserialize)]
struct CastVoteBody {
    winner_id: i64,
    loser_id: i64,
}

async fn cast_vote(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Json(body): Json<CastVoteBody>,
) -> Result<(StatusCode, Json<Vote>), AppError> {
    ctx.ensure_user
        .execute(&user.id, &user.email, &user.name)
        .await?;
    let vote = ctx
        .cast_vote
        .execute(&user.id, body.winner_id, body.loser_id)
        .await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

#[derive(Deserialize)]
struct VotePageQuery {
    page: Option<u64>,
    #[serde(alias = "perPage")]
    per_page: Option<u64>,
}

async fn user_votes(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<String>,
    Query(q): Query<VotePageQuery>,
) -> Result<Json<VotePage>, Response> {
    // Users can only view their own votes.
    if id != user.id {
        return Err((StatusCode::FORBIDDEN, "Forbidden").into_response());
    }
    let page = ctx
        .list_user_votes
        .execute(&id, q.page, q.per_page)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(page))
}

async fn current_user(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    let current = ctx.current_user.execute(&user.id).await?;
    Ok(Json(current))
}

#[derive(Deserialize)]
struct UpsertUserBody {
    name: Option<String>,
}

async fn upsert_user(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Json(body): Json<UpsertUserBody>,
) -> Result<Json<User>, AppError> {
    let name = body.name.unwrap_or(user.name);
    let ensured = ctx.ensure_user.execute(&user.id, &user.email, &name).await?;
    Ok(Json(ensured))
}
