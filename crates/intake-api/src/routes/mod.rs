pub mod forms;
pub mod health;
pub mod instruments;
pub mod schema;
pub mod sessions;

use axum::http::header;
use axum::response::{IntoResponse, Response};

use intake_export::Artifact;

/// A rendered document as a download.
pub(crate) fn download(artifact: Artifact) -> Response {
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}
