//! Image uploads
//!
//! `POST /api/upload/{suffix}` takes one multipart image field. Files land
//! under `public_path` with UUID v4 names and are served back by the
//! gateway's `ServeDir` mounts.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use auth::application::UsersUseCase;
use auth::domain::UserRepository;
use auth::{User, UserRole};
use axum::Json;
use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::post;
use kernel::{AppError, AppResult};
use platform::crypto::random_file_name;
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::AppConfig;
use crate::gateway::Meta;
use crate::service::BlogService;

pub const AVATAR_LIMIT: usize = 1024 * 1024;
pub const POST_IMAGE_LIMIT: usize = 5 * 1024 * 1024;
/// Room for multipart boundaries and part headers
const MULTIPART_OVERHEAD: usize = 16 * 1024;

/// Accepted content types and the extension stored on disk
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    Avatar,
    PostImage,
}

impl UploadKind {
    fn parse(suffix: &str) -> Option<Self> {
        match suffix {
            "avatar" => Some(Self::Avatar),
            "post-image" => Some(Self::PostImage),
            _ => None,
        }
    }

    const fn field(&self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::PostImage => "image",
        }
    }

    const fn limit(&self) -> usize {
        match self {
            Self::Avatar => AVATAR_LIMIT,
            Self::PostImage => POST_IMAGE_LIMIT,
        }
    }

    const fn required(&self) -> UserRole {
        match self {
            Self::Avatar => UserRole::User,
            Self::PostImage => UserRole::Author,
        }
    }
}

struct UploadState {
    service: BlogService,
    public_path: PathBuf,
    avatar_path: String,
    post_path: String,
    default_avatar: String,
}

impl UploadState {
    /// URL prefix (without slashes) of an upload kind
    fn url_dir(&self, kind: UploadKind) -> &str {
        match kind {
            UploadKind::Avatar => &self.avatar_path,
            UploadKind::PostImage => &self.post_path,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// One validated image part
#[derive(Debug)]
struct ImageFile {
    extension: &'static str,
    bytes: Vec<u8>,
}

pub fn upload_router(service: BlogService, config: &AppConfig) -> Router {
    let state = Arc::new(UploadState {
        service,
        public_path: config.public_path.clone(),
        avatar_path: config.avatar_path.clone(),
        post_path: config.post_path.clone(),
        default_avatar: config.default_avatar.clone(),
    });

    Router::new()
        .route("/api/upload/{suffix}", post(upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(POST_IMAGE_LIMIT + MULTIPART_OVERHEAD))
        .with_state(state)
}

async fn upload(
    State(state): State<Arc<UploadState>>,
    Path(suffix): Path<String>,
    Meta(meta): Meta,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let kind = UploadKind::parse(&suffix)
        .ok_or_else(|| AppError::not_found(format!("unknown upload target {suffix}")))?;
    let caller = state.service.authorize(&meta, kind.required()).await?;

    let file = read_image(&mut multipart, kind.field(), kind.limit()).await?;

    let url_dir = state.url_dir(kind);
    let dir = state.public_path.join(url_dir);
    let name = random_file_name(file.extension);
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&name), &file.bytes).await?;
    let url = format!("/{url_dir}/{name}");

    tracing::info!(
        user_id = caller.id,
        kind = kind.field(),
        size = file.bytes.len(),
        url = %url,
        "File uploaded"
    );

    if kind == UploadKind::Avatar {
        let users = UsersUseCase::new(state.service.auth_repo());
        let store = AvatarDir {
            dir: &dir,
            url_dir,
            default_avatar: &state.default_avatar,
        };
        store.swap(&users, &caller, &name).await?;
    }

    Ok(Json(UploadResponse { url }))
}

/// On-disk avatar directory and the URL prefix it is served under
struct AvatarDir<'a> {
    dir: &'a FsPath,
    url_dir: &'a str,
    default_avatar: &'a str,
}

impl AvatarDir<'_> {
    /// Point the caller at the stored file `name` and remove the replaced
    /// one. The default avatar is shared and never removed. Returns the
    /// previous URL.
    async fn swap<U>(&self, users: &UsersUseCase<U>, caller: &User, name: &str) -> AppResult<String>
    where
        U: UserRepository,
    {
        let url = format!("/{}/{name}", self.url_dir);
        let previous = match users.set_avatar(caller, &url).await {
            Ok(previous) => previous,
            Err(e) => {
                remove_quietly(&self.dir.join(name)).await;
                return Err(e.into());
            }
        };

        if previous != self.default_avatar && previous != url {
            if let Some(old) = stored_file(self.dir, self.url_dir, &previous) {
                remove_quietly(&old).await;
            }
        }
        Ok(previous)
    }
}

/// Read the named field, checking type and size chunk by chunk
async fn read_image(multipart: &mut Multipart, field_name: &str, limit: usize) -> AppResult<ImageFile> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_argument(format!("failed to parse multipart: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_ascii_lowercase();
        let extension = image_extension(&content_type).ok_or_else(|| {
            AppError::invalid_argument(format!("unsupported file type {content_type}"))
        })?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::invalid_argument(format!("failed to read upload: {e}")))?
        {
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::invalid_argument(format!(
                    "file exceeds {} KiB",
                    limit / 1024
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(AppError::invalid_argument("file is empty"));
        }
        return Ok(ImageFile { extension, bytes });
    }

    Err(AppError::invalid_argument(format!("{field_name} file is required")))
}

fn image_extension(content_type: &str) -> Option<&'static str> {
    IMAGE_TYPES
        .iter()
        .find(|(ty, _)| *ty == content_type)
        .map(|(_, ext)| *ext)
}

/// Disk path of a previously stored upload, only for our own `/<dir>/<name>` URLs
fn stored_file(dir: &FsPath, url_dir: &str, url: &str) -> Option<PathBuf> {
    let name = url.strip_prefix('/')?.strip_prefix(url_dir)?.strip_prefix('/')?;
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return None;
    }
    Some(dir.join(name))
}

async fn remove_quietly(path: &FsPath) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(error = %e, path = %path.display(), "Failed to remove upload");
    }
}
