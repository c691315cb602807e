use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::api::models::{Post, PostDraft};
use crate::error::{AppError, AppResult};
use crate::gateway::{ApiGateway, ApiMethod, ImagePayload, MediaUploader};
use crate::session::SessionStore;

/// Derive a URL slug from a (possibly diacritic-heavy) title: lowercase,
/// NFD-decompose and drop the combining marks, map đ to d, drop everything
/// else that is not ASCII-alphanumeric or whitespace, then hyphenate.
pub fn slugify(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut stripped = String::with_capacity(text.len());
    for c in text.to_lowercase().nfd() {
        if ('\u{0300}'..='\u{036f}').contains(&c) {
            continue;
        }
        // đ does not decompose; it needs its own mapping
        let c = if c == 'đ' { 'd' } else { c };
        if c.is_ascii_alphanumeric() || c.is_whitespace() {
            stripped.push(c);
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Filters for the posts list.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub category: Option<i64>,
}

impl PostQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self { page, limit, ..Default::default() }
    }

    fn to_endpoint(&self) -> String {
        let page = self.page.max(1);
        let limit = if self.limit == 0 { 10 } else { self.limit };
        let mut url = format!("posts?limit={}&offset={}", limit, (page - 1) * limit);
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            url.push_str(&format!("&search={}", urlencoding::encode(search)));
        }
        if let Some(category) = self.category {
            url.push_str(&format!("&category={}", category));
        }
        url
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PostPage {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    total: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SlugCheck {
    #[serde(default)]
    exists: bool,
}

/// Posts CRUD plus the slug machinery the editor needs.
#[derive(Clone)]
pub struct PostsService {
    gateway: ApiGateway,
    session: SessionStore,
    uploader: MediaUploader,
}

impl PostsService {
    pub fn new(gateway: ApiGateway, session: SessionStore, uploader: MediaUploader) -> Self {
        Self { gateway, session, uploader }
    }

    /// One page of posts with the total count for pagination.
    pub async fn list(&self, query: &PostQuery) -> AppResult<(Vec<Post>, i64)> {
        let token = self.session.bearer()?;
        let page: PostPage = self.gateway
            .request_as(&query.to_endpoint(), ApiMethod::Get, None, Some(&token))
            .await?;
        Ok((page.posts, page.total))
    }

    pub async fn get(&self, id: i64) -> AppResult<Post> {
        let token = self.session.bearer()?;
        self.gateway
            .request_as(&format!("posts/{}", id), ApiMethod::Get, None, Some(&token))
            .await
    }

    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Post> {
        let token = self.session.bearer()?;
        self.gateway
            .request_as(&format!("posts/slug/{}", urlencoding::encode(slug)), ApiMethod::Get, None, Some(&token))
            .await
    }

    /// Ask the backend whether `slug` is already taken. When editing,
    /// `current_slug` is the record's stored slug; an unchanged slug is
    /// never reported as a duplicate (and no request is made).
    pub async fn check_slug(&self, slug: &str, current_slug: Option<&str>) -> AppResult<bool> {
        if slug.is_empty() {
            return Ok(false);
        }
        if current_slug == Some(slug) {
            return Ok(false);
        }
        let token = self.session.bearer()?;
        let check: SlugCheck = self.gateway
            .request_as(
                &format!("posts/check-slug?slug={}", urlencoding::encode(slug)),
                ApiMethod::Get,
                None,
                Some(&token),
            )
            .await?;
        Ok(check.exists)
    }

    /// Create or update a post from the editor's draft.
    ///
    /// The slug is derived from the title when blank, then checked for
    /// uniqueness (duplicate -> validation error, nothing saved). A new
    /// thumbnail is uploaded first and a failed upload aborts the whole
    /// save; the backend never sees a post whose image went missing.
    pub async fn save(
        &self,
        mut draft: PostDraft,
        existing_id: Option<i64>,
        current_slug: Option<&str>,
        new_thumbnail: Option<&ImagePayload>,
    ) -> AppResult<Post> {
        if draft.title.trim().is_empty() {
            return Err(AppError::validation("missing_title", "a title is required"));
        }
        if draft.slug.is_empty() {
            draft.slug = slugify(&draft.title);
        }
        if self.check_slug(&draft.slug, current_slug).await? {
            return Err(AppError::validation("slug_taken", "this URL already exists, choose another"));
        }

        if let Some(image) = new_thumbnail {
            // Abort on failure: a post must not be saved pointing at a
            // thumbnail that never made it to the media host.
            let uploaded = self.uploader.upload(image).await?;
            draft.thumbnail = uploaded.url;
        }

        let token = self.session.bearer()?;
        let body = serde_json::to_value(&draft)
            .map_err(|e| AppError::internal("encode_draft".to_string(), e.to_string()))?;
        match existing_id {
            None => {
                self.gateway
                    .request_as("posts", ApiMethod::Post, Some(&body), Some(&token))
                    .await
            }
            Some(id) => {
                self.gateway
                    .request_as(&format!("posts/{}", id), ApiMethod::Put, Some(&body), Some(&token))
                    .await
            }
        }
    }

    pub async fn delete(&self, id: i64) -> AppResult<JsonValue> {
        let token = self.session.bearer()?;
        let val = self.gateway
            .request(&format!("posts/{}", id), ApiMethod::Delete, None, Some(&token))
            .await;
        if let Err(e) = &val {
            warn!(target: "goalblog::posts", "delete post {} failed: {}", id, e);
        }
        val
    }
}
