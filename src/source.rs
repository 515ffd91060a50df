use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use csv::Reader;
use log::{debug, info};
use serde::Deserialize;

use crate::account::{Account, Profile, UserId};
use crate::error::{Error, Result};

/// Where profiles and follow lists come from.
pub trait FollowSource {
    /// Resolves handles to profiles. Unknown handles are simply absent from
    /// the result.
    fn lookup_handles(&self, handles: &[String]) -> Result<Vec<Profile>>;

    /// Resolves numeric IDs to profiles. Unknown IDs are absent from the result.
    fn lookup_ids(&self, ids: &[UserId]) -> Result<Vec<Profile>>;

    /// Everything `handle` follows, ascending, without duplicates.
    fn fetch_follows(&self, handle: &str) -> Result<Vec<UserId>>;
}

/// Looks up every handle, then fetches each account's follow list.
///
/// Accounts come back in lookup order, one per distinct ID: a handle listed
/// twice (in any casing) is collected once. Any fetch failure aborts the
/// whole collection.
pub fn collect_accounts<S: FollowSource + ?Sized>(
    source: &S,
    handles: &[String],
) -> Result<Vec<Account>> {
    let mut seen = HashSet::new();
    let profiles: Vec<Profile> = source
        .lookup_handles(handles)?
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .collect();
    info!(
        "found {} of {} accounts: {:?}",
        profiles.len(),
        handles.len(),
        profiles.iter().map(|p| &p.screen_name).collect::<Vec<_>>()
    );

    profiles
        .into_iter()
        .map(|profile| {
            let follows = source.fetch_follows(&profile.screen_name)?;
            debug!("{} follows {} accounts", profile.screen_name, follows.len());
            Ok(Account::from_profile(profile, follows))
        })
        .collect()
}

/// Handles for `ids`, in the same order. IDs the source cannot resolve are
/// rendered as the number itself.
pub fn resolve_handles<S: FollowSource + ?Sized>(source: &S, ids: &[UserId]) -> Result<Vec<String>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let names: HashMap<UserId, String> = source
        .lookup_ids(ids)?
        .into_iter()
        .map(|p| (p.id, p.screen_name))
        .collect();
    Ok(ids
        .iter()
        .map(|id| names.get(id).cloned().unwrap_or_else(|| id.to_string()))
        .collect())
}

#[derive(Debug, Deserialize)]
struct FollowRecord {
    handle: String,
    user_id: UserId,
    friend_id: UserId,
}

/// Follow lists loaded from a CSV snapshot with header
/// `handle,user_id,friend_id`, one row per follow.
///
/// Handle matching is ASCII case-insensitive, as on the live platform.
#[derive(Debug, Default)]
pub struct CsvFollowSource {
    accounts: BTreeMap<String, (Profile, Vec<UserId>)>,
}

impl CsvFollowSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut source = CsvFollowSource::default();
        for record in Reader::from_reader(reader).into_deserialize() {
            let record: FollowRecord = record?;
            let (_, follows) = source
                .accounts
                .entry(record.handle.to_ascii_lowercase())
                .or_insert_with(|| {
                    (
                        Profile {
                            id: record.user_id,
                            screen_name: record.handle.clone(),
                        },
                        Vec::new(),
                    )
                });
            follows.push(record.friend_id);
        }
        for (_, follows) in source.accounts.values_mut() {
            follows.sort_unstable();
            follows.dedup();
        }
        Ok(source)
    }

    fn get(&self, handle: &str) -> Option<&(Profile, Vec<UserId>)> {
        self.accounts.get(&handle.to_ascii_lowercase())
    }
}

impl FollowSource for CsvFollowSource {
    fn lookup_handles(&self, handles: &[String]) -> Result<Vec<Profile>> {
        Ok(handles
            .iter()
            .filter_map(|h| self.get(h))
            .map(|(profile, _)| profile.clone())
            .collect())
    }

    fn lookup_ids(&self, ids: &[UserId]) -> Result<Vec<Profile>> {
        Ok(self
            .accounts
            .values()
            .map(|(profile, _)| profile)
            .filter(|profile| ids.contains(&profile.id))
            .cloned()
            .collect())
    }

    fn fetch_follows(&self, handle: &str) -> Result<Vec<UserId>> {
        self.get(handle)
            .map(|(_, follows)| follows.clone())
            .ok_or_else(|| Error::Api {
                status: 404,
                body: format!("no follow list for {handle}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = "\
handle,user_id,friend_id
Alice,100,3
Alice,100,1
Alice,100,3
bob,200,3
";

    #[test]
    fn csv_rows_group_into_sorted_follow_lists() {
        let source = CsvFollowSource::from_reader(SNAPSHOT.as_bytes()).unwrap();
        assert_eq!(source.fetch_follows("alice").unwrap(), vec![1, 3]);
        assert_eq!(source.fetch_follows("BOB").unwrap(), vec![3]);
        assert!(matches!(
            source.fetch_follows("carol"),
            Err(Error::Api { status: 404, .. })
        ));
    }

    #[test]
    fn lookup_keeps_original_spelling_and_drops_unknowns() {
        let source = CsvFollowSource::from_reader(SNAPSHOT.as_bytes()).unwrap();
        let found = source
            .lookup_handles(&["ALICE".into(), "nobody".into()])
            .unwrap();
        assert_eq!(
            found,
            vec![Profile {
                id: 100,
                screen_name: "Alice".into()
            }]
        );
        let by_id = source.lookup_ids(&[200, 999]).unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].screen_name, "bob");
    }

    #[test]
    fn unresolved_ids_fall_back_to_numbers() {
        let source = CsvFollowSource::from_reader(SNAPSHOT.as_bytes()).unwrap();
        assert_eq!(
            resolve_handles(&source, &[3, 200]).unwrap(),
            vec!["3".to_string(), "bob".to_string()]
        );
        assert!(resolve_handles(&source, &[]).unwrap().is_empty());
    }

    #[test]
    fn collected_accounts_keep_lookup_order() {
        let source = CsvFollowSource::from_reader(SNAPSHOT.as_bytes()).unwrap();
        let accounts = collect_accounts(&source, &["bob".into(), "Alice".into()]).unwrap();
        let handles: Vec<_> = accounts.iter().map(|a| a.handle.as_str()).collect();
        assert_eq!(handles, ["bob", "Alice"]);
        assert_eq!(accounts[1].follows(), &[1, 3]);
    }

    #[test]
    fn repeated_and_case_variant_handles_collect_once() {
        let snapshot = "handle,user_id,friend_id\nA,1,7\nA,1,8\nB,2,9\n";
        let source = CsvFollowSource::from_reader(snapshot.as_bytes()).unwrap();
        let handles: Vec<String> = ["A", "a", "B", "A"].iter().map(|s| s.to_string()).collect();
        let accounts = collect_accounts(&source, &handles).unwrap();

        let names: Vec<_> = accounts.iter().map(|a| a.handle.as_str()).collect();
        assert_eq!(names, ["A", "B"]);

        let counts = crate::aggregate::FollowCounts::from_accounts(&accounts);
        assert_eq!(counts.get(7), 1);
        let overlaps = crate::aggregate::friend_overlap(&accounts);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].count, 0);
        let graph = crate::graph::FollowGraph::build(&accounts, &counts);
        assert!(!graph.contains(&crate::graph::FollowNode::Friend(7)));
    }
}
