//! HTTP surface: public pages, the admin console, and the session guard.

mod admin;
mod public;
pub mod views;

use std::sync::Arc;

use poem::http::StatusCode;
use poem::middleware::{CookieJarManager, SetHeader, Tracing};
use poem::web::cookie::CookieJar;
use poem::web::{Html, Redirect};
use poem::{Endpoint, EndpointExt, IntoResponse, Request, Response, Route, get, post};

use crate::auth::AdminAuth;
use crate::services::Content;
use crate::session::{SESSION_COOKIE, SessionRegistry};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub content: Content,
    pub sessions: Arc<SessionRegistry>,
    pub auth: AdminAuth,
}

pub fn build_app(state: AppState) -> impl Endpoint {
    Route::new()
        .at("/", get(public::index))
        .at("/archive", get(public::archive))
        .at("/post/:id", get(public::show_post))
        .at("/post/:id/comment", post(public::create_comment))
        .at("/projects", get(public::projects))
        .nest("/admin", admin_routes().around(require_session))
        .with(CookieJarManager::new())
        .with(
            SetHeader::new()
                .overriding("X-Content-Type-Options", "nosniff")
                .overriding("X-Frame-Options", "DENY")
                .overriding("Referrer-Policy", "same-origin"),
        )
        .with(Tracing)
        .data(state)
}

/// Everything under `/admin`. Only the login entry points are public; the
/// guard wraps the whole tree, unknown paths included.
fn admin_routes() -> Route {
    Route::new()
        .at("/", get(admin::login_page).post(admin::login))
        .at("/login", get(admin::login_page).post(admin::login))
        .at("/logout", post(admin::logout))
        .at("/dashboard", get(admin::dashboard))
        .at("/posts", post(admin::create_post))
        .at("/posts/new", get(admin::new_post))
        .at("/posts/:id/delete", post(admin::delete_post))
        .at("/comments/:id/delete", post(admin::delete_comment))
        .at("/projects", post(admin::create_project))
        .at("/projects/new", get(admin::new_project))
        .at("/projects/:id", post(admin::update_project))
        .at("/projects/:id/edit", get(admin::edit_project))
        .at("/projects/:id/delete", post(admin::delete_project))
        .at("/*rest", admin::unknown)
}

fn is_public_admin_path(path: &str) -> bool {
    matches!(path.trim_end_matches('/'), "/admin" | "/admin/login")
}

fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value_str().to_string())
}

fn is_signed_in(state: &AppState, jar: &CookieJar) -> bool {
    session_token(jar).is_some_and(|token| state.sessions.validate(&token))
}

/// Admin guard: requests without a live session go back to the login page.
async fn require_session<E: Endpoint>(ep: Arc<E>, req: Request) -> poem::Result<Response> {
    let allowed = is_public_admin_path(req.original_uri().path())
        || req
            .data::<AppState>()
            .is_some_and(|state| is_signed_in(state, req.cookie()));
    if !allowed {
        tracing::debug!(path = %req.uri().path(), "unauthenticated admin request");
        return Ok(Redirect::see_other("/admin").into_response());
    }
    ep.call(req).await.map(IntoResponse::into_response)
}

fn not_found() -> Response {
    Html(views::not_found())
        .with_status(StatusCode::NOT_FOUND)
        .into_response()
}
