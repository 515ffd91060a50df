//! Blocking client for the Twitter v1.1 REST API.

use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::account::{Profile, UserId};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::source::FollowSource;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";

/// `users/lookup` accepts at most this many names or IDs per request.
const LOOKUP_BATCH: usize = 100;

/// Page size for `friends/ids`.
const FRIENDS_PAGE: u32 = 5000;

#[derive(Debug, Deserialize)]
struct FriendsPage {
    ids: Vec<UserId>,
    #[serde(default)]
    next_cursor: i64,
}

/// App-only (bearer token) client. Every request goes through the retry policy.
pub struct TwitterClient {
    base_url: String,
    bearer_token: String,
    retry: RetryPolicy,
    http: Client,
}

impl TwitterClient {
    pub fn new(bearer_token: &str, retry: RetryPolicy) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE, bearer_token, retry)
    }

    pub fn with_base_url(base_url: &str, bearer_token: &str, retry: RetryPolicy) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
            retry,
            http,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, resource: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}.json", self.base_url, resource);
        self.retry.run(resource, || {
            debug!("GET {url} {query:?}");
            let resp = self
                .http
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .query(query)
                .send()?;

            let status = resp.status();
            let body = resp.text()?;
            if !status.is_success() {
                return Err(Error::Api {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(serde_json::from_str(&body)?)
        })
    }

    fn lookup(&self, key: &str, values: Vec<String>) -> Result<Vec<Profile>> {
        lookup_in_batches(&values, |batch| {
            self.get_json("users/lookup", &[(key, batch.join(","))])
        })
    }
}

/// Runs `lookup` once per [`LOOKUP_BATCH`]-sized chunk of `values`. A 404
/// for a chunk means none of it exists.
fn lookup_in_batches<F>(values: &[String], mut lookup: F) -> Result<Vec<Profile>>
where
    F: FnMut(&[String]) -> Result<Vec<Profile>>,
{
    let mut profiles = Vec::with_capacity(values.len());
    for batch in values.chunks(LOOKUP_BATCH) {
        match lookup(batch) {
            Ok(found) => profiles.extend(found),
            Err(Error::Api { status: 404, .. }) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(profiles)
}

/// Follows `next_cursor` from -1 until it comes back as 0, returning every ID
/// seen, sorted and deduplicated.
fn collect_pages<F>(mut fetch_page: F) -> Result<Vec<UserId>>
where
    F: FnMut(i64) -> Result<FriendsPage>,
{
    let mut ids = Vec::new();
    let mut cursor: i64 = -1;
    while cursor != 0 {
        let page = fetch_page(cursor)?;
        ids.extend(page.ids);
        cursor = page.next_cursor;
    }
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

impl FollowSource for TwitterClient {
    fn lookup_handles(&self, handles: &[String]) -> Result<Vec<Profile>> {
        self.lookup("screen_name", handles.to_vec())
    }

    fn lookup_ids(&self, ids: &[UserId]) -> Result<Vec<Profile>> {
        self.lookup("user_id", ids.iter().map(UserId::to_string).collect())
    }

    fn fetch_follows(&self, handle: &str) -> Result<Vec<UserId>> {
        let ids = collect_pages(|cursor| {
            self.get_json(
                "friends/ids",
                &[
                    ("screen_name", handle.to_string()),
                    ("count", FRIENDS_PAGE.to_string()),
                    ("cursor", cursor.to_string()),
                ],
            )
        })?;
        info!("{handle}: fetched {} friend ids", ids.len());
        Ok(ids)
    }
}
