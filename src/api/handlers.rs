use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    api::dtos::{CrawlRequest, ErrorResponse, ExportRequest, MovePageRequest, PageListResponse},
    app_state::AppState,
    crawler::{CrawlJob, PagePipeline},
    fetcher::HttpFetcher,
    packaging::{EPUB_CONTENT_TYPE, PackagingError, Section},
    sink::StorageError,
};

const DEFAULT_EXPORT_TITLE: &str = "webmark export";

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Runs one crawl to completion and stores every page it produced.
pub async fn crawl(State(state): State<AppState>, Json(payload): Json<CrawlRequest>) -> Response {
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    let max_pages = payload.max_pages.unwrap_or(state.config.crawl.max_pages);
    let mut job = match CrawlJob::new(&payload.url, max_pages) {
        Ok(job) => job,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    // one source per job, dropped with it
    let source = match HttpFetcher::new(&state.config.fetch) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "could not build page source");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to start crawl");
        }
    };
    let pipeline = PagePipeline::from_config(&state.config);

    job.run(&source, &pipeline).await;

    let mut pages = Vec::with_capacity(job.results().len());
    for record in job.into_results() {
        match state.sink.store(record, payload.folder.clone()).await {
            Ok(page) => pages.push(page),
            Err(e) => {
                error!(error = %e, "failed to store page");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store pages");
            }
        }
    }

    info!(url = %payload.url, pages = pages.len(), "crawl stored");
    (StatusCode::OK, Json(PageListResponse { pages })).into_response()
}

pub async fn list_pages(State(state): State<AppState>) -> Response {
    match state.sink.list().await {
        Ok(pages) => (StatusCode::OK, Json(PageListResponse { pages })).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list pages");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list pages")
        }
    }
}

pub async fn move_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovePageRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    match state
        .sink
        .move_to_folder(id, payload.folder.trim().to_string())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(StorageError::NotFound(_)) => error_response(StatusCode::NOT_FOUND, "Page not found"),
        Err(e) => {
            error!(error = %e, "failed to move page");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to move page")
        }
    }
}

/// Packages the requested pages, in request order, into one e-book.
pub async fn export(State(state): State<AppState>, Json(payload): Json<ExportRequest>) -> Response {
    let Some(packager) = state.packager.clone() else {
        return error_response(StatusCode::NOT_IMPLEMENTED, "Export is not configured");
    };
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    let stored = match state.sink.list().await {
        Ok(pages) => pages,
        Err(e) => {
            error!(error = %e, "failed to list pages");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load pages");
        }
    };

    let mut sections = Vec::with_capacity(payload.page_ids.len());
    for id in &payload.page_ids {
        let Some(page) = stored.iter().find(|p| p.id == *id) else {
            return error_response(StatusCode::NOT_FOUND, format!("Page {id} not found"));
        };
        sections.push(Section {
            title: page.record.title.clone(),
            markdown: page.record.markdown.clone(),
        });
    }

    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_EXPORT_TITLE);

    match packager.package(title, &sections) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, EPUB_CONTENT_TYPE)],
            bytes,
        )
            .into_response(),
        Err(PackagingError::Empty) => error_response(StatusCode::BAD_REQUEST, "Nothing to export"),
        Err(e) => {
            warn!(error = %e, "packaging failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to package pages")
        }
    }
}
