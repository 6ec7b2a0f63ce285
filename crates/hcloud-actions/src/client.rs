//! Asynchronous client for the `/actions` endpoints.

use crate::models::{Action, ActionListOpts};
use hcloud_core::id::ActionId;
use hcloud_core::{fetch_all_pages, ApiClient, ListOpts, Response, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ActionGetResponse {
    action: Action,
}

#[derive(Debug, Deserialize)]
struct ActionListResponse {
    actions: Vec<Action>,
}

/// Client for reading actions.
#[derive(Clone)]
pub struct ActionClient {
    inner: ApiClient,
}

impl ActionClient {
    /// Wrap a shared API client.
    #[must_use]
    pub fn new(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// Fetch an action; `None` if it does not exist.
    pub async fn get(&self, id: ActionId) -> Result<(Option<Action>, Response)> {
        let path = format!("actions/{id}");
        let (body, response) = self
            .inner
            .get_optional::<ActionGetResponse>(&path)
            .await?;
        Ok((body.map(|body| body.action), response))
    }

    /// List one page of actions.
    pub async fn list(&self, opts: &ActionListOpts) -> Result<(Vec<Action>, Response)> {
        let params = opts.to_pairs()?;
        let (body, response) = self
            .inner
            .get::<ActionListResponse>("actions", &params)
            .await?;
        Ok((body.actions, response))
    }

    /// Fetch every action.
    pub async fn all(&self) -> Result<Vec<Action>> {
        self.all_with_opts(&ActionListOpts::default()).await
    }

    /// Fetch every action matching the filters; pagination fields are managed here.
    pub async fn all_with_opts(&self, opts: &ActionListOpts) -> Result<Vec<Action>> {
        fetch_all_pages(opts.list.clone(), |list: ListOpts| {
            let opts = ActionListOpts {
                list,
                ..opts.clone()
            };
            async move { self.list(&opts).await }
        })
        .await
    }
}
