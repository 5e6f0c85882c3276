//! Exhaustive pagination over list endpoints.

use octocrab::{Octocrab, Page};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::github::error::SweepError;

use super::error_mapping::map_octocrab_error;

/// Largest page size GitHub accepts.
const PER_PAGE: u8 = 100;

#[derive(Serialize)]
struct Paged<'a, Q: Serialize + ?Sized> {
    per_page: u8,
    #[serde(flatten)]
    query: &'a Q,
}

/// Fetches the first page of `route` and follows `Link` headers until the
/// last page, returning every item in server order.
pub(super) async fn fetch_all<T, Q>(
    client: &Octocrab,
    operation: &str,
    route: &str,
    query: &Q,
) -> Result<Vec<T>, SweepError>
where
    T: DeserializeOwned,
    Q: Serialize + ?Sized + Sync,
{
    let parameters = Paged {
        per_page: PER_PAGE,
        query,
    };
    let first = client
        .get::<Page<T>, _, _>(route, Some(&parameters))
        .await
        .map_err(|error| map_octocrab_error(operation, &error))?;

    client
        .all_pages(first)
        .await
        .map_err(|error| map_octocrab_error(operation, &error))
}

/// Query with no parameters beyond the page size.
#[derive(Serialize)]
pub(super) struct NoQuery {}
