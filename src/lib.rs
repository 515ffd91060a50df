//! Which accounts do several Twitter accounts follow in common?
//!
//! Follow lists are fetched for a handful of named accounts, the accounts
//! followed by more than one of them are counted and paired up, and the
//! resulting graph is drawn with Graphviz.

pub mod account;
pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod render;
pub mod report;
pub mod retry;
pub mod source;
pub mod twitter;

pub use account::{Account, Profile, UserId};
pub use aggregate::{CommonFollows, FollowCounts, Overlap, common_follows, friend_overlap};
pub use analysis::Analysis;
pub use error::{Error, Result};
pub use graph::{FollowGraph, FollowNode};
pub use retry::RetryPolicy;
pub use source::{CsvFollowSource, FollowSource};
pub use twitter::TwitterClient;
