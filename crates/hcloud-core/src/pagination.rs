//! Aggregation of paginated list endpoints.

use std::future::Future;

use tracing::debug;

use crate::error::{Error, Result};
use crate::query::ListOpts;
use crate::response::Response;

/// Page size used when fetching every page of a collection.
pub const ALL_PAGE_SIZE: u32 = 50;

/// Fetch every page of a collection, starting at page 1.
///
/// `fetch` receives [`ListOpts`] with `page` and `per_page` set and returns one
/// page of results together with its [`Response`]. Pages are requested until the
/// pagination metadata reports the last page, or until a response carries no
/// pagination metadata at all. The first error aborts the whole aggregation and
/// discards everything collected so far.
///
/// # Errors
///
/// Returns the first error produced by `fetch`, or a parse error if a page
/// reports a next page that does not lie after it.
pub async fn fetch_all_pages<T, F, Fut>(base: ListOpts, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(ListOpts) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Response)>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let opts = ListOpts {
            page: Some(page),
            per_page: Some(base.per_page.unwrap_or(ALL_PAGE_SIZE)),
            ..base.clone()
        };

        let (batch, response) = fetch(opts).await?;
        debug!(page, fetched = batch.len(), "fetched page");
        items.extend(batch);

        match response.pagination() {
            Some(pagination) if !pagination.is_last_page() => {
                let next = pagination.next_page.unwrap_or(page + 1);
                if next <= page {
                    return Err(Error::ParseError(format!(
                        "pagination did not advance: page {page} reports next page {next}"
                    )));
                }
                page = next;
            }
            _ => break,
        }
    }

    Ok(items)
}
