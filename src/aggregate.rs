use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::account::{Account, UserId};
use crate::error::{Error, Result};

/// How many named accounts follow each followed ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowCounts {
    counts: HashMap<UserId, usize>,
}

impl FollowCounts {
    pub fn from_accounts(accounts: &[Account]) -> Self {
        let mut counts = HashMap::new();
        for account in accounts {
            for &id in account.follows() {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        FollowCounts { counts }
    }

    /// Zero for IDs nobody follows.
    pub fn get(&self, id: UserId) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, usize)> + '_ {
        self.counts.iter().map(|(&id, &n)| (id, n))
    }

    /// The `n` most-followed IDs, by descending count then ascending ID.
    pub fn most_common(&self, n: usize) -> Vec<(UserId, usize)> {
        let mut all: Vec<_> = self.iter().collect();
        all.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        all.truncate(n);
        all
    }
}

/// Number of accounts followed by both `account_a` and `account_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub account_a: String,
    pub account_b: String,
    #[serde(rename = "overlap")]
    pub count: usize,
}

impl Overlap {
    fn output_order(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.account_a.cmp(&other.account_a))
            .then_with(|| self.account_b.cmp(&other.account_b))
    }
}

/// Overlap for every unordered pair of accounts.
///
/// Pairs are formed as `(accounts[i], accounts[j])` with `i < j`, so pass the
/// accounts in canonical order. Pairs with nothing in common are kept with a
/// count of zero. The result is sorted by descending count, then ascending
/// `account_a`, then ascending `account_b`.
pub fn friend_overlap(accounts: &[Account]) -> Vec<Overlap> {
    let mut overlaps = Vec::with_capacity(accounts.len() * accounts.len().saturating_sub(1) / 2);
    for (i, a) in accounts.iter().enumerate() {
        for b in &accounts[i + 1..] {
            overlaps.push(Overlap {
                account_a: a.handle.clone(),
                account_b: b.handle.clone(),
                count: intersection_len(a.follows(), b.follows()),
            });
        }
    }
    overlaps.sort_by(Overlap::output_order);
    overlaps
}

/// Result of asking which accounts two named accounts both follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonFollows {
    /// The two accounts share nothing.
    NoneFound,
    /// Shared IDs, ascending. Never empty.
    Shared(Vec<UserId>),
}

impl CommonFollows {
    pub fn ids(&self) -> &[UserId] {
        match self {
            CommonFollows::NoneFound => &[],
            CommonFollows::Shared(ids) => ids,
        }
    }
}

/// IDs followed by both `handle_a` and `handle_b`.
///
/// Handles match ASCII case-insensitively, as lookups do. Fails with
/// [`Error::AccountNotFound`] if either handle is not among `accounts`.
pub fn common_follows(accounts: &[Account], handle_a: &str, handle_b: &str) -> Result<CommonFollows> {
    let find = |handle: &str| {
        accounts
            .iter()
            .find(|a| a.handle.eq_ignore_ascii_case(handle))
            .ok_or_else(|| Error::AccountNotFound(handle.to_string()))
    };
    let a = find(handle_a)?;
    let b = find(handle_b)?;

    let shared = intersection(a.follows(), b.follows());
    if shared.is_empty() {
        Ok(CommonFollows::NoneFound)
    } else {
        Ok(CommonFollows::Shared(shared))
    }
}

fn intersection_len(a: &[UserId], b: &[UserId]) -> usize {
    merge_common(a, b, |_| {})
}

fn intersection(a: &[UserId], b: &[UserId]) -> Vec<UserId> {
    let mut out = Vec::new();
    merge_common(a, b, |id| out.push(id));
    out
}

// Both slices must be sorted ascending without duplicates.
fn merge_common(a: &[UserId], b: &[UserId], mut on_match: impl FnMut(UserId)) -> usize {
    let (mut i, mut j, mut n) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                on_match(a[i]);
                n += 1;
                i += 1;
                j += 1;
            }
        }
    }
    n
}
