use std::time::Duration;

use poem::handler;
use poem::http::StatusCode;
use poem::web::cookie::{Cookie, CookieJar, SameSite};
use poem::web::{Data, Form, Html, Path, Redirect};
use poem::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{info, warn};

use super::{AppState, is_signed_in, not_found, session_token, views};
use crate::entities::ProjectFields;
use crate::entities::post::NewPost;
use crate::error::ContentError;
use crate::session::{SESSION_COOKIE, SESSION_LIFETIME};

const DASHBOARD: &str = "/admin/dashboard";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    title: String,
    body: String,
    status: String,
}

/// Every field arrives as text; unparsable numbers and statuses fall back to
/// their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectForm {
    title: String,
    description: String,
    url: String,
    status: String,
    order: String,
}

impl From<ProjectForm> for ProjectFields {
    fn from(form: ProjectForm) -> Self {
        Self {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            url: form.url,
            status: form.status.trim().parse().unwrap_or_default(),
            order: form.order.trim().parse().unwrap_or(0),
        }
    }
}

fn session_cookie(token: String) -> Cookie {
    let mut cookie = Cookie::new_with_str(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(Duration::from_secs(SESSION_LIFETIME.num_seconds().unsigned_abs()));
    cookie
}

/// Expires the session cookie on the same path it was set on.
fn removal_cookie() -> Cookie {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    cookie
}

/// A missing entity is not an error for admin deletes.
fn ignore_missing(result: Result<(), ContentError>) -> Result<(), ContentError> {
    match result {
        Err(e) if e.is_not_found() => Ok(()),
        other => other,
    }
}

#[handler]
pub async fn login_page(Data(state): Data<&AppState>, cookie_jar: &CookieJar) -> Response {
    if is_signed_in(state, cookie_jar) {
        return Redirect::see_other(DASHBOARD).into_response();
    }
    Html(views::login(None)).into_response()
}

#[handler]
pub async fn login(
    Data(state): Data<&AppState>,
    cookie_jar: &CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = state.auth.clone();
    let verified = tokio::task::spawn_blocking(move || auth.verify(&form.password))
        .await
        .unwrap_or(false);

    if !verified {
        warn!("admin sign-in rejected");
        return Html(views::login(Some("Incorrect password.")))
            .with_status(StatusCode::UNAUTHORIZED)
            .into_response();
    }

    cookie_jar.add(session_cookie(state.sessions.create()));
    info!("admin signed in");
    Redirect::see_other(DASHBOARD).into_response()
}

#[handler]
pub async fn logout(Data(state): Data<&AppState>, cookie_jar: &CookieJar) -> Redirect {
    if let Some(token) = session_token(cookie_jar) {
        state.sessions.destroy(&token);
    }
    cookie_jar.add(removal_cookie());
    info!("admin signed out");
    Redirect::see_other("/admin")
}

/// Signed-in requests for admin paths that do not exist.
#[handler]
pub async fn unknown() -> Response {
    not_found()
}

#[handler]
pub async fn dashboard(Data(state): Data<&AppState>) -> Html<String> {
    let content = &state.content;
    let (posts, comments, mut projects) = tokio::join!(
        content.posts.list(),
        content.comments.list(),
        content.projects.list(),
    );
    projects.sort_by_key(|p| p.order);
    Html(views::dashboard(&posts, &comments, &projects))
}

#[handler]
pub async fn new_post() -> Html<String> {
    Html(views::post_form())
}

#[handler]
pub async fn create_post(Data(state): Data<&AppState>, Form(form): Form<PostForm>) -> poem::Result<Redirect> {
    let post = state
        .content
        .posts
        .create(NewPost {
            title: form.title.trim().to_string(),
            body: form.body,
            status: Some(form.status),
        })
        .await?;
    Ok(Redirect::see_other(format!("/post/{}", post.id)))
}

/// Removes the post and its comments.
#[handler]
pub async fn delete_post(Data(state): Data<&AppState>, Path(id): Path<u64>) -> poem::Result<Redirect> {
    ignore_missing(state.content.posts.delete(id).await)?;
    Ok(Redirect::see_other(DASHBOARD))
}

#[handler]
pub async fn delete_comment(Data(state): Data<&AppState>, Path(id): Path<u64>) -> poem::Result<Redirect> {
    ignore_missing(state.content.comments.delete(id).await)?;
    Ok(Redirect::see_other(DASHBOARD))
}

#[handler]
pub async fn new_project() -> Html<String> {
    Html(views::project_form(None))
}

#[handler]
pub async fn create_project(
    Data(state): Data<&AppState>,
    Form(form): Form<ProjectForm>,
) -> poem::Result<Redirect> {
    state.content.projects.create(form.into()).await?;
    Ok(Redirect::see_other(DASHBOARD))
}

#[handler]
pub async fn edit_project(Data(state): Data<&AppState>, Path(id): Path<u64>) -> Response {
    match state.content.projects.get(id).await {
        Some(project) => Html(views::project_form(Some(&project))).into_response(),
        None => not_found(),
    }
}

#[handler]
pub async fn update_project(
    Data(state): Data<&AppState>,
    Path(id): Path<u64>,
    Form(form): Form<ProjectForm>,
) -> poem::Result<Response> {
    match state.content.projects.update(id, form.into()).await {
        Ok(_) => Ok(Redirect::see_other(DASHBOARD).into_response()),
        Err(e) if e.is_not_found() => Ok(not_found()),
        Err(e) => Err(e.into()),
    }
}

#[handler]
pub async fn delete_project(Data(state): Data<&AppState>, Path(id): Path<u64>) -> poem::Result<Redirect> {
    ignore_missing(state.content.projects.delete(id).await)?;
    Ok(Redirect::see_other(DASHBOARD))
}
