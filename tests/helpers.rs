use axum::Router;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use webmark::{api, app_state::AppState, config::Config};

/// A page the extractor accepts: an `<article>` with three long paragraphs,
/// followed by a plain list of links outside it.
pub fn article_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">{href}</a></li>"#))
        .collect();
    let paragraph = format!(
        "{title} covers its topic in plenty of detail so that the reader walks away with a working understanding. "
    );
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>{title}</title></head>
<body>
  <nav><a href="/">Home</a></nav>
  <article>
    <h1>{title}</h1>
    <p>{p1}</p>
    <h2>Details</h2>
    <p>{p2}</p>
    <p>{p3}</p>
  </article>
  <ul class="page-links">{anchors}</ul>
</body>
</html>"#,
        p1 = paragraph.repeat(3),
        p2 = paragraph.repeat(2),
        p3 = paragraph.repeat(2),
    )
}

pub async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(html.into_bytes())
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub fn test_app() -> Router {
    api::router(AppState::new(Config::default()))
}
