//! Video listing and byte-range streaming handlers.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
    Json,
};
use serde::Serialize;
use std::io::SeekFrom;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

use netflox_core::library::content_type;
use netflox_core::{LibraryError, VideoInfo};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response for `GET /api/movies/{id}/video`
#[derive(Debug, Serialize)]
pub struct MovieVideoResponse {
    pub movie_id: u64,
    pub filename: String,
    /// Streaming path for the player.
    pub path: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn library_error(e: LibraryError) -> ApiError {
    match e {
        LibraryError::Forbidden(_) => api_error(StatusCode::FORBIDDEN, "Access denied"),
        LibraryError::NotFound(name) => {
            api_error(StatusCode::NOT_FOUND, format!("Video not found: {}", name))
        }
        LibraryError::Io(e) => {
            error!("Video library I/O error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read video directory")
        }
    }
}

/// What a `Range` header asks for, relative to a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No usable range; serve the whole file.
    Full,
    /// Inclusive byte range.
    Partial { start: u64, end: u64 },
    /// Syntactically valid but outside the file.
    Unsatisfiable,
}

/// Parse a single `bytes=` range. Multi-range and malformed headers are
/// ignored and served in full.
pub fn parse_range(header: Option<&HeaderValue>, file_size: u64) -> RangeRequest {
    let Some(ranges) = header
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.trim().strip_prefix("bytes="))
    else {
        return RangeRequest::Full;
    };
    if ranges.contains(',') {
        return RangeRequest::Full;
    }
    let Some((start, end)) = ranges.split_once('-') else {
        return RangeRequest::Full;
    };
    let (start, end) = (start.trim(), end.trim());

    match (start.is_empty(), end.is_empty()) {
        // bytes=-500 (last 500 bytes)
        (true, false) => {
            let Ok(suffix_len) = end.parse::<u64>() else {
                return RangeRequest::Full;
            };
            if suffix_len == 0 || file_size == 0 {
                return RangeRequest::Unsatisfiable;
            }
            RangeRequest::Partial {
                start: file_size.saturating_sub(suffix_len),
                end: file_size - 1,
            }
        }
        // bytes=500-
        (false, true) => {
            let Ok(start) = start.parse::<u64>() else {
                return RangeRequest::Full;
            };
            if start >= file_size {
                return RangeRequest::Unsatisfiable;
            }
            RangeRequest::Partial {
                start,
                end: file_size - 1,
            }
        }
        // bytes=0-499
        (false, false) => {
            let (Ok(start), Ok(end)) = (start.parse::<u64>(), end.parse::<u64>()) else {
                return RangeRequest::Full;
            };
            if start > end {
                return RangeRequest::Full;
            }
            if start >= file_size {
                return RangeRequest::Unsatisfiable;
            }
            RangeRequest::Partial {
                start,
                end: end.min(file_size - 1),
            }
        }
        (true, true) => RangeRequest::Full,
    }
}

/// GET /api/videos
///
/// Recognised video file names, sorted.
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    state
        .library()
        .list_videos()
        .await
        .map(Json)
        .map_err(library_error)
}

/// GET /api/video-info/{filename}
pub async fn video_info(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<VideoInfo>, ApiError> {
    state
        .library()
        .video_info(&filename)
        .await
        .map(Json)
        .map_err(library_error)
}

/// GET /api/movies/{id}/video
///
/// Which local file, if any, holds the movie with this catalog ID.
pub async fn movie_video(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<u64>,
) -> Result<Json<MovieVideoResponse>, ApiError> {
    match state.library().find_movie_video(movie_id).await {
        Ok(Some(filename)) => Ok(Json(MovieVideoResponse {
            movie_id,
            path: format!("/videos/{}", filename),
            filename,
        })),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("No video for movie {}", movie_id),
        )),
        Err(e) => Err(library_error(e)),
    }
}

/// GET|HEAD /videos/{filename} and /api/videos/{filename}
///
/// Streams the file, honouring a single `Range`. HEAD answers with the same
/// headers and no body.
pub async fn stream_video(
    method: Method,
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let path = state
        .library()
        .resolve(&filename)
        .await
        .map_err(library_error)?;

    let file_size = tokio::fs::metadata(&path)
        .await
        .map_err(|e| library_error(e.into()))?
        .len();
    let content_type = content_type(&filename);
    let range = parse_range(headers.get(header::RANGE), file_size);

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0");

    let (builder, start, length) = match range {
        RangeRequest::Unsatisfiable => {
            debug!("Unsatisfiable range for {} ({} bytes)", filename, file_size);
            return build(
                builder
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .header(header::CONTENT_RANGE, format!("bytes */{}", file_size)),
                Body::empty(),
            );
        }
        RangeRequest::Partial { start, end } => {
            let length = end - start + 1;
            debug!("Serving range {}-{}/{} for {}", start, end, file_size, filename);
            (
                builder
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(header::CONTENT_LENGTH, length)
                    .header(
                        header::CONTENT_RANGE,
                        format!("bytes {}-{}/{}", start, end, file_size),
                    ),
                start,
                length,
            )
        }
        RangeRequest::Full => {
            debug!("Serving full file {} ({} bytes)", filename, file_size);
            (
                builder
                    .status(StatusCode::OK)
                    .header(header::CONTENT_LENGTH, file_size),
                0,
                file_size,
            )
        }
    };

    if method == Method::HEAD {
        return build(builder, Body::empty());
    }

    let mut file = File::open(&path)
        .await
        .map_err(|e| library_error(e.into()))?;
    if start > 0 {
        file.seek(SeekFrom::Start(start))
            .await
            .map_err(|e| library_error(e.into()))?;
    }
    let body = Body::from_stream(ReaderStream::new(file.take(length)));

    build(builder, body)
}

fn build(builder: axum::http::response::Builder, body: Body) -> Result<Response, ApiError> {
    builder.body(body).map_err(|e| {
        error!("Failed to build video response: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response")
    })
}
