use axum::{
    body::Body,
    extract::{
        Multipart, Path, State,
        multipart::{Field, MultipartError},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_util::io::ReaderStream;

use crate::app::AppState;
use crate::error::{PhotoError, PhotoResult};
use crate::photos::{
    LocalFileStorage, NewPhoto, PhotoRecord, check_image_filename, storage_filename,
};

const UPLOAD_HTML: &str = include_str!("../templates/new.html");

/// Multipart field carrying the uploaded image.
pub const PHOTO_FIELD: &str = "photo";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

pub async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_HTML)
}

pub async fn gallery_page(State(state): State<AppState>) -> Response {
    match load_gallery(&state).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => error_response(&state, err),
    }
}

async fn load_gallery(state: &AppState) -> PhotoResult<String> {
    let collection = state.store.open().await?;
    Ok(render_gallery(collection.all()))
}

pub async fn create_photo(State(state): State<AppState>, multipart: Multipart) -> Response {
    match receive_photo(&state, multipart).await {
        Ok(record) => {
            tracing::info!(
                id = record.id,
                filename = %record.filename,
                mimetype = %record.mimetype,
                size = record.size,
                "stored photo"
            );
            Redirect::to(&format!("/photo/{}", record.id)).into_response()
        }
        Err(err) => error_response(&state, err),
    }
}

/// Filters, writes, then records the first `photo` field of the form.
async fn receive_photo(state: &AppState, mut multipart: Multipart) -> PhotoResult<PhotoRecord> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let originalname = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(PhotoError::MissingUpload),
        };
        check_image_filename(&originalname)?;

        let mimetype = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());
        let filename = storage_filename(&mimetype, &originalname, Utc::now());
        let size = write_upload(&state.storage, &filename, &mut field).await?;

        let mut collection = state.store.open().await?;
        let record = collection.insert(NewPhoto {
            filename,
            mimetype,
            originalname,
            size,
        });
        collection.persist().await?;
        return Ok(record);
    }
    Err(PhotoError::MissingUpload)
}

/// Streams the field to a new file, removing it again if anything fails.
async fn write_upload(
    storage: &LocalFileStorage,
    filename: &str,
    field: &mut Field<'_>,
) -> PhotoResult<u64> {
    let mut file = storage.create_new(filename).await?;
    let written = copy_field(field, &mut file).await;
    drop(file);
    if written.is_err() {
        if let Err(err) = storage.remove(filename).await {
            tracing::warn!(filename, error = %err, "failed to remove partial upload");
        }
    }
    written
}

async fn copy_field(field: &mut Field<'_>, file: &mut File) -> PhotoResult<u64> {
    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        file.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;
    Ok(size)
}

fn multipart_error(err: MultipartError) -> PhotoError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PhotoError::PayloadTooLarge
    } else {
        PhotoError::InvalidUpload(err.body_text())
    }
}

pub async fn show_photo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match stream_photo(&state, &id).await {
        Ok(response) => response,
        Err(err) => error_response(&state, err),
    }
}

async fn stream_photo(state: &AppState, raw_id: &str) -> PhotoResult<Response> {
    let id = parse_photo_id(raw_id)?;
    let record = {
        let collection = state.store.open().await?;
        collection.get(id).cloned().ok_or(PhotoError::NotFound)?
    };
    let (file, len) = state.storage.open(&record.filename).await?;
    let body = Body::from_stream(ReaderStream::new(file));
    Ok((
        [
            (header::CONTENT_TYPE, record.mimetype),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        body,
    )
        .into_response())
}

/// Only the plain decimal form is accepted, so each photo has one URL.
fn parse_photo_id(raw_id: &str) -> PhotoResult<u64> {
    match raw_id.parse::<u64>() {
        Ok(id) if id.to_string() == raw_id => Ok(id),
        _ => Err(PhotoError::InvalidId(raw_id.to_string())),
    }
}

pub async fn not_found() -> Response {
    let status = StatusCode::NOT_FOUND;
    (status, Html(render_error(status, "Not Found", None))).into_response()
}

fn error_response(state: &AppState, err: PhotoError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, "photo request failed");
    } else {
        tracing::warn!(error = %err, "photo request rejected");
    }
    let details = state.config.expose_errors.then(|| format!("{err:?}"));
    let message = if state.config.expose_errors {
        err.to_string()
    } else {
        err.public_message()
    };
    (status, Html(render_error(status, &message, details.as_deref()))).into_response()
}

fn render_gallery(records: &[PhotoRecord]) -> String {
    let mut body = String::from(
        "<h1>Frame</h1>\n<p><a href=\"/photos/new\">Add a photo</a></p>\n",
    );
    if records.is_empty() {
        body.push_str("<p class=\"empty\">No photos yet.</p>\n");
        return layout("Frame", &body);
    }
    body.push_str("<ul class=\"gallery\">\n");
    for record in records {
        let name = escape_html(&record.originalname);
        body.push_str(&format!(
            "  <li id=\"photo-{id}\"><a href=\"/photo/{id}\"><img src=\"/photo/{id}\" alt=\"{name}\"></a>\
             <span>{name}</span> <small>{size} &middot; {uploaded}</small></li>\n",
            id = record.id,
            size = format_size(record.size),
            uploaded = record.created_at.format("%Y-%m-%d %H:%M UTC"),
        ));
    }
    body.push_str("</ul>\n");
    layout("Frame", &body)
}

fn render_error(status: StatusCode, message: &str, details: Option<&str>) -> String {
    let mut body = format!(
        "<h1>{}</h1>\n<h2>{}</h2>\n",
        escape_html(message),
        status.as_u16()
    );
    if let Some(details) = details {
        body.push_str(&format!("<pre>{}</pre>\n", escape_html(details)));
    }
    body.push_str("<p><a href=\"/\">Back to gallery</a></p>\n");
    layout("Error", &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n\
         body {{ font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; }}\n\
         .gallery {{ list-style: none; padding: 0; display: grid; grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr)); gap: 1rem; }}\n\
         .gallery img {{ width: 100%; height: 10rem; object-fit: cover; display: block; }}\n\
         </style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
