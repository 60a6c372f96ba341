/**
 * Post Handlers
 *
 * - `POST /posts/create` - multipart submission, runs the post pipeline
 * - `GET /posts` - public feed, newest first
 * - `POST /posts/{id}/like` - toggle the caller's like
 * - `POST /posts/{id}/comment` - append a comment
 *
 * Mutating handlers sit behind the auth middleware and always act as the
 * session user; no user id is ever read from the request body.
 */

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::media::Attachment;
use crate::backend::middleware::AuthUser;
use crate::backend::posts::pipeline::Submission;
use crate::backend::server::state::AppState;
use crate::shared::{CreateCommentRequest, PostView, SharedError};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn multipart_error(err: MultipartError) -> BackendError {
    BackendError::handler(err.status(), err.body_text())
}

/// Unknown and malformed ids are both reported as a missing post
fn parse_post_id(raw: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(raw).map_err(|_| BackendError::NotFound { entity: "Post" })
}

/// Read the `text` and `media` fields of a post submission
async fn read_submission(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<Submission, BackendError> {
    let mut text: Option<String> = None;
    let mut media: Option<Attachment> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("text") => {
                text = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("media") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // browsers send an empty part when no file was chosen
                if bytes.is_empty() && file_name.is_empty() {
                    continue;
                }
                if bytes.len() > max_upload_bytes {
                    return Err(BackendError::handler(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        "File too large",
                    ));
                }
                if media.is_some() {
                    return Err(SharedError::validation(
                        "media",
                        "Only one media file may be attached",
                    )
                    .into());
                }

                media = Some(Attachment::new(file_name, content_type, bytes)?);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(Submission::from_parts(text, media)?)
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<PostView>), BackendError> {
    let multipart =
        multipart.map_err(|r| BackendError::handler(r.status(), r.body_text()))?;

    let submission = read_submission(multipart, state.config.max_upload_bytes).await?;
    let post = state.pipeline.submit(&user, submission).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostView>>, BackendError> {
    let posts = state.store.list_posts().await?;
    Ok(Json(posts))
}

pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PostView>, BackendError> {
    let post_id = parse_post_id(&id)?;
    let post = state.store.toggle_like(post_id, user.user_id).await?;
    Ok(Json(post))
}

pub async fn comment_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostView>), BackendError> {
    let post_id = parse_post_id(&id)?;
    let Json(request) = body.map_err(|r| SharedError::validation("text", r.body_text()))?;
    let text = request.validated_text()?;

    let post = state.store.add_comment(post_id, user.user_id, text).await?;
    Ok((StatusCode::CREATED, Json(post)))
}
