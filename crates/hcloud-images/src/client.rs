//! Asynchronous client for the `/images` endpoints.

use crate::models::{Image, ImageListOpts, ImageUpdateOpts};
use hcloud_core::id::ImageId;
use hcloud_core::{fetch_all_pages, ApiClient, ListOpts, Response, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct ImageGetResponse {
    image: Image,
}

#[derive(Debug, Deserialize)]
struct ImageListResponse {
    images: Vec<Image>,
}

/// Client for managing images.
#[derive(Clone)]
pub struct ImageClient {
    inner: ApiClient,
}

impl ImageClient {
    /// Wrap a shared API client.
    #[must_use]
    pub fn new(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// Fetch an image; `None` if it does not exist.
    pub async fn get(&self, id: ImageId) -> Result<(Option<Image>, Response)> {
        let path = format!("images/{id}");
        let (body, response) = self.inner.get_optional::<ImageGetResponse>(&path).await?;
        Ok((body.map(|body| body.image), response))
    }

    /// List one page of images.
    pub async fn list(&self, opts: &ImageListOpts) -> Result<(Vec<Image>, Response)> {
        let params = opts.to_pairs()?;
        let (body, response) = self
            .inner
            .get::<ImageListResponse>("images", &params)
            .await?;
        Ok((body.images, response))
    }

    /// Fetch every image.
    pub async fn all(&self) -> Result<Vec<Image>> {
        self.all_with_opts(&ImageListOpts::default()).await
    }

    /// Fetch every image matching the filters.
    pub async fn all_with_opts(&self, opts: &ImageListOpts) -> Result<Vec<Image>> {
        fetch_all_pages(opts.list.clone(), |list: ListOpts| {
            let opts = ImageListOpts {
                list,
                ..opts.clone()
            };
            async move { self.list(&opts).await }
        })
        .await
    }

    /// Update description, type or labels of an image.
    pub async fn update(&self, id: ImageId, opts: &ImageUpdateOpts) -> Result<(Image, Response)> {
        opts.check()?;
        let path = format!("images/{id}");
        let (body, response) = self
            .inner
            .put::<_, ImageGetResponse>(&path, opts)
            .await?;
        Ok((body.image, response))
    }

    /// Delete an image.
    pub async fn delete(&self, id: ImageId) -> Result<Response> {
        let path = format!("images/{id}");
        let response = self.inner.delete(&path).await?;
        info!(image = %id, "deleted image");
        Ok(response)
    }
}
