use poem::handler;
use poem::web::{Data, Form, Html, Path, Query, Redirect};
use poem::{IntoResponse, Response};
use serde::Deserialize;

use super::{AppState, not_found, views};
use crate::entities::comment::NewComment;

const HOME_POSTS: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct ArchiveQuery {
    search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    name: String,
    comment: String,
}

#[handler]
pub async fn index(Data(state): Data<&AppState>) -> Html<String> {
    Html(views::home(&state.content.posts.recent(HOME_POSTS).await))
}

#[handler]
pub async fn archive(Data(state): Data<&AppState>, Query(query): Query<ArchiveQuery>) -> Html<String> {
    let search = query.search.unwrap_or_default();
    let mut posts = state.content.posts.search(&search).await;
    posts.reverse();
    Html(views::archive(&posts, &search))
}

/// Every successful read counts as a view.
#[handler]
pub async fn show_post(Data(state): Data<&AppState>, Path(id): Path<u64>) -> poem::Result<Response> {
    let Some(post) = state.content.posts.increment_view(id).await? else {
        return Ok(not_found());
    };
    let comments = state.content.comments.for_post(id).await;
    Ok(Html(views::post(&post, &comments)).into_response())
}

/// Accepts comments for any id; the post is not looked up.
#[handler]
pub async fn create_comment(
    Data(state): Data<&AppState>,
    Path(id): Path<u64>,
    Form(form): Form<CommentForm>,
) -> poem::Result<Redirect> {
    state
        .content
        .comments
        .create(NewComment {
            post_id: id,
            name: form.name.trim().to_string(),
            comment: form.comment.trim().to_string(),
        })
        .await?;
    Ok(Redirect::see_other(format!("/post/{id}")))
}

#[handler]
pub async fn projects(Data(state): Data<&AppState>) -> Html<String> {
    let mut projects = state.content.projects.list().await;
    projects.sort_by_key(|p| p.order);
    Html(views::projects(&projects))
}
