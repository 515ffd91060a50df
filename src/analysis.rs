use log::info;

use crate::account::Account;
use crate::aggregate::{self, CommonFollows, FollowCounts, Overlap};
use crate::error::Result;
use crate::graph::FollowGraph;
use crate::source::{self, FollowSource};

/// Everything derived from one snapshot of follow lists.
pub struct Analysis {
    pub accounts: Vec<Account>,
    pub counts: FollowCounts,
    pub overlaps: Vec<Overlap>,
    pub common: CommonFollows,
    pub graph: FollowGraph,
}

impl Analysis {
    /// Aggregates `accounts` (put into canonical order first) and builds the
    /// graph. Fails if either handle of `pair` is missing.
    pub fn from_accounts(mut accounts: Vec<Account>, pair: (&str, &str)) -> Result<Self> {
        crate::account::sort_by_handle(&mut accounts);
        let counts = FollowCounts::from_accounts(&accounts);
        let overlaps = aggregate::friend_overlap(&accounts);
        let common = aggregate::common_follows(&accounts, pair.0, pair.1)?;
        let graph = FollowGraph::build(&accounts, &counts);
        info!(
            "{} accounts, {} distinct friends, {} pairs",
            accounts.len(),
            counts.len(),
            overlaps.len()
        );
        Ok(Analysis {
            accounts,
            counts,
            overlaps,
            common,
            graph,
        })
    }

    pub fn collect<S: FollowSource + ?Sized>(
        source: &S,
        handles: &[String],
        pair: (&str, &str),
    ) -> Result<Self> {
        let accounts = source::collect_accounts(source, handles)?;
        Self::from_accounts(accounts, pair)
    }
}
