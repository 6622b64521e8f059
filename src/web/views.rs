//! Server-rendered pages. Every user-supplied value passes through [`escape`].

use std::fmt::Write;

use crate::entities::{Comment, Post, Project, ProjectStatus};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;line-height:1.5;color:#222}\
nav a{margin-right:1rem}article{margin-bottom:2rem}.meta{color:#777;font-size:.9rem}\
form.inline{display:inline}input,textarea,select{display:block;width:100%;margin:.25rem 0 .75rem}\
textarea{min-height:8rem}.error{color:#b00}table{width:100%;border-collapse:collapse}td{padding:.25rem;border-bottom:1px solid #eee}";

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title><style>{STYLE}</style></head><body>\
<nav><a href=\"/\">Home</a><a href=\"/archive\">Archive</a><a href=\"/projects\">Projects</a></nav>\
<main>{body}</main></body></html>",
        title = escape(title),
    )
}

fn date(post: &Post) -> String {
    post.date.format("%B %-d, %Y").to_string()
}

fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape(p).replace('\n', "<br>")))
        .collect()
}

fn excerpt(text: &str) -> String {
    let short = crate::entities::truncate(text, 240);
    if short.len() < text.len() {
        format!("{}…", escape(short.trim_end()))
    } else {
        escape(&short)
    }
}

fn post_summary(out: &mut String, post: &Post) {
    let _ = write!(
        out,
        "<article><h2><a href=\"/post/{id}\">{title}</a></h2>\
<p class=\"meta\">{date}</p><p>{excerpt}</p></article>",
        id = post.id,
        title = escape(&post.title),
        date = date(post),
        excerpt = excerpt(&post.body),
    );
}

pub fn home(posts: &[Post]) -> String {
    let mut body = String::from("<h1>Latest posts</h1>");
    if posts.is_empty() {
        body.push_str("<p>Nothing here yet.</p>");
    }
    for post in posts {
        post_summary(&mut body, post);
    }
    body.push_str("<p><a href=\"/archive\">All posts</a></p>");
    layout("Blog", &body)
}

pub fn archive(posts: &[Post], search: &str) -> String {
    let mut body = format!(
        "<h1>Archive</h1><form method=\"get\" action=\"/archive\">\
<input type=\"search\" name=\"search\" value=\"{}\" placeholder=\"Search posts\"></form>",
        escape(search)
    );
    if posts.is_empty() {
        body.push_str("<p>No posts found.</p>");
    }
    for post in posts {
        post_summary(&mut body, post);
    }
    layout("Archive", &body)
}

pub fn post(post: &Post, comments: &[Comment]) -> String {
    let mut body = format!(
        "<article><h1>{title}</h1><p class=\"meta\">{date}{status} · {views} views</p>{text}</article>",
        title = escape(&post.title),
        date = date(post),
        status = post
            .status
            .as_deref()
            .map(|s| format!(" · {}", escape(s)))
            .unwrap_or_default(),
        views = post.views,
        text = paragraphs(&post.body),
    );

    let _ = write!(body, "<section><h2>Comments ({})</h2>", comments.len());
    for comment in comments {
        let _ = write!(
            body,
            "<div class=\"comment\"><p class=\"meta\">{name} · {date}</p>{text}</div>",
            name = escape(&comment.name),
            date = comment.date.format("%B %-d, %Y %H:%M"),
            text = paragraphs(&comment.comment),
        );
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"/post/{id}/comment\">\
<label>Name<input name=\"name\" maxlength=\"50\" required></label>\
<label>Comment<textarea name=\"comment\" maxlength=\"1000\" required></textarea></label>\
<button type=\"submit\">Post comment</button></form></section>",
        id = post.id,
    );
    layout(&post.title, &body)
}

pub fn projects(projects: &[Project]) -> String {
    let mut body = String::from("<h1>Projects</h1>");
    if projects.is_empty() {
        body.push_str("<p>No projects yet.</p>");
    }
    for project in projects {
        let link = if project.is_available() {
            format!("<a href=\"{}\">Visit</a>", escape(&project.url))
        } else {
            "<span class=\"meta\">Not yet available</span>".to_string()
        };
        let badge = match project.status {
            ProjectStatus::Active => "",
            ProjectStatus::ComingSoon => " <span class=\"meta\">(coming soon)</span>",
        };
        let _ = write!(
            body,
            "<article><h2>{title}{badge}</h2><p>{description}</p><p>{link}</p></article>",
            title = escape(&project.title),
            description = escape(&project.description),
        );
    }
    layout("Projects", &body)
}

pub fn not_found() -> String {
    layout("Not found", "<h1>Not found</h1><p>There is nothing at this address.</p>")
}

pub fn login(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default();
    let body = format!(
        "<h1>Admin</h1>{error}<form method=\"post\" action=\"/admin/login\">\
<label>Password<input type=\"password\" name=\"password\" autofocus required></label>\
<button type=\"submit\">Sign in</button></form>"
    );
    layout("Sign in", &body)
}

fn delete_button(action: &str) -> String {
    format!(
        "<form class=\"inline\" method=\"post\" action=\"{action}\">\
<button type=\"submit\">Delete</button></form>"
    )
}

pub fn dashboard(posts: &[Post], comments: &[Comment], projects: &[Project]) -> String {
    let mut body = String::from(
        "<h1>Dashboard</h1><form class=\"inline\" method=\"post\" action=\"/admin/logout\">\
<button type=\"submit\">Sign out</button></form>",
    );

    body.push_str("<h2>Posts</h2><p><a href=\"/admin/posts/new\">New post</a></p><table>");
    for post in posts {
        let _ = write!(
            body,
            "<tr><td><a href=\"/post/{id}\">{title}</a></td><td>{views} views</td><td>{delete}</td></tr>",
            id = post.id,
            title = escape(&post.title),
            views = post.views,
            delete = delete_button(&format!("/admin/posts/{}/delete", post.id)),
        );
    }
    body.push_str("</table>");

    body.push_str("<h2>Comments</h2><table>");
    for comment in comments {
        let _ = write!(
            body,
            "<tr><td>{name}</td><td>{text}</td><td><a href=\"/post/{post_id}\">post {post_id}</a></td><td>{delete}</td></tr>",
            name = escape(&comment.name),
            text = escape(&comment.comment),
            post_id = comment.post_id,
            delete = delete_button(&format!("/admin/comments/{}/delete", comment.id)),
        );
    }
    body.push_str("</table>");

    body.push_str("<h2>Projects</h2><p><a href=\"/admin/projects/new\">New project</a></p><table>");
    for project in projects {
        let _ = write!(
            body,
            "<tr><td>{order}</td><td>{title}</td><td>{status}</td>\
<td><a href=\"/admin/projects/{id}/edit\">Edit</a> {delete}</td></tr>",
            order = project.order,
            title = escape(&project.title),
            status = project.status,
            id = project.id,
            delete = delete_button(&format!("/admin/projects/{}/delete", project.id)),
        );
    }
    body.push_str("</table>");

    layout("Dashboard", &body)
}

pub fn post_form() -> String {
    let body = "<h1>New post</h1><form method=\"post\" action=\"/admin/posts\">\
<label>Title<input name=\"title\" maxlength=\"200\" required></label>\
<label>Status<input name=\"status\" maxlength=\"200\"></label>\
<label>Body<textarea name=\"body\" maxlength=\"10000\" required></textarea></label>\
<button type=\"submit\">Publish</button></form>";
    layout("New post", body)
}

/// Create form when `project` is `None`, edit form otherwise.
pub fn project_form(project: Option<&Project>) -> String {
    let (heading, action) = match project {
        Some(p) => ("Edit project".to_string(), format!("/admin/projects/{}", p.id)),
        None => ("New project".to_string(), "/admin/projects".to_string()),
    };
    let title = project.map(|p| escape(&p.title)).unwrap_or_default();
    let description = project.map(|p| escape(&p.description)).unwrap_or_default();
    let url = project.map(|p| escape(&p.url)).unwrap_or_default();
    let order = project.map(|p| p.order).unwrap_or_default();
    let status = project.map(|p| p.status).unwrap_or_default();
    let selected = |s: ProjectStatus| if s == status { " selected" } else { "" };

    let body = format!(
        "<h1>{heading}</h1><form method=\"post\" action=\"{action}\">\
<label>Title<input name=\"title\" value=\"{title}\" maxlength=\"100\" required></label>\
<label>Description<textarea name=\"description\" maxlength=\"500\">{description}</textarea></label>\
<label>URL<input name=\"url\" value=\"{url}\" maxlength=\"200\"></label>\
<label>Status<select name=\"status\">\
<option value=\"active\"{active}>Active</option>\
<option value=\"coming_soon\"{coming_soon}>Coming soon</option></select></label>\
<label>Order<input name=\"order\" type=\"number\" value=\"{order}\"></label>\
<button type=\"submit\">Save</button></form>",
        active = selected(ProjectStatus::Active),
        coming_soon = selected(ProjectStatus::ComingSoon),
    );
    layout(&heading, &body)
}
