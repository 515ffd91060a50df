use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Platform-assigned numeric account ID.
pub type UserId = u64;

/// Profile record returned by an account lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub screen_name: String,
}

/// A named account together with everything it follows.
///
/// `follows` is sorted ascending with no duplicates; the constructor enforces
/// this so the set operations in `aggregate` can rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub handle: String,
    follows: Vec<UserId>,
}

impl Account {
    pub fn new(id: UserId, handle: impl Into<String>, mut follows: Vec<UserId>) -> Self {
        follows.sort_unstable();
        follows.dedup();
        Account {
            id,
            handle: handle.into(),
            follows,
        }
    }

    pub fn from_profile(profile: Profile, follows: Vec<UserId>) -> Self {
        Account::new(profile.id, profile.screen_name, follows)
    }

    pub fn follows(&self) -> &[UserId] {
        &self.follows
    }

    pub fn follows_id(&self, id: UserId) -> bool {
        self.follows.binary_search(&id).is_ok()
    }
}

/// Reads one handle per line, trimmed, in file order. Blank lines are skipped.
pub fn read_handles(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(parse_handles(&text))
}

pub fn parse_handles(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Puts accounts in canonical order: ascending by handle.
pub fn sort_by_handle(accounts: &mut [Account]) {
    accounts.sort_by(|a, b| a.handle.cmp(&b.handle));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_are_sorted_and_deduplicated() {
        let account = Account::new(7, "someone", vec![30, 10, 20, 10]);
        assert_eq!(account.follows(), &[10, 20, 30]);
        assert!(account.follows_id(20));
        assert!(!account.follows_id(25));
    }

    #[test]
    fn handles_are_trimmed_and_blank_lines_skipped() {
        let text = "  BernieSanders \nrealDonaldTrump\n\n   \n\tHillaryClinton\r\n";
        assert_eq!(
            parse_handles(text),
            vec!["BernieSanders", "realDonaldTrump", "HillaryClinton"]
        );
    }

    #[test]
    fn sort_by_handle_is_case_sensitive_byte_order() {
        let mut accounts = vec![
            Account::new(1, "realDonaldTrump", vec![]),
            Account::new(2, "HillaryClinton", vec![]),
            Account::new(3, "GovGaryJohnson", vec![]),
        ];
        sort_by_handle(&mut accounts);
        let handles: Vec<_> = accounts.iter().map(|a| a.handle.as_str()).collect();
        assert_eq!(handles, ["GovGaryJohnson", "HillaryClinton", "realDonaldTrump"]);
    }
}
