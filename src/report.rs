//! Human-readable run summary and the overlap CSV export.

use std::io::{self, Write};
use std::path::Path;

use csv::Writer;

use crate::account::{Account, UserId};
use crate::aggregate::{CommonFollows, Overlap};
use crate::error::{Error, Result};
use crate::graph::FollowGraph;

pub const NO_COMMON_FRIEND: &str = "no common friend found";

pub fn print_friend_counts<W: Write>(out: &mut W, accounts: &[Account]) -> io::Result<()> {
    writeln!(out, "Friends per candidate:")?;
    for account in accounts {
        writeln!(out, "{} {}", account.handle, account.follows().len())?;
    }
    Ok(())
}

pub fn print_most_common<W: Write>(out: &mut W, most_common: &[(UserId, usize)]) -> io::Result<()> {
    writeln!(out, "Most common friends:")?;
    for (id, count) in most_common {
        writeln!(out, "  {id}: {count}")?;
    }
    Ok(())
}

pub fn print_overlaps<W: Write>(out: &mut W, overlaps: &[Overlap]) -> io::Result<()> {
    writeln!(out, "Friend overlap:")?;
    for o in overlaps {
        writeln!(out, "  {} {} {}", o.account_a, o.account_b, o.count)?;
    }
    Ok(())
}

/// `names` are the resolved handles of `common.ids()`, in the same order.
pub fn print_common_follows<W: Write>(
    out: &mut W,
    handle_a: &str,
    handle_b: &str,
    common: &CommonFollows,
    names: &[String],
) -> io::Result<()> {
    let shown = match common {
        CommonFollows::NoneFound => NO_COMMON_FRIEND.to_string(),
        CommonFollows::Shared(_) => names.join(", "),
    };
    writeln!(out, "Followed by {handle_a} and {handle_b}: {shown}")
}

pub fn print_graph_summary<W: Write>(out: &mut W, graph: &FollowGraph) -> io::Result<()> {
    writeln!(
        out,
        "graph has {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    )
}

/// Writes `account_a,account_b,overlap` rows in the order given.
pub fn write_overlap_csv(path: &Path, overlaps: &[Overlap]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = Writer::from_writer(file);
    for overlap in overlaps {
        writer.serialize(overlap)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}
