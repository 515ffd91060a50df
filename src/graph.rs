use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};

use crate::account::{Account, UserId};
use crate::aggregate::FollowCounts;

/// A followed account must be followed by at least this many named accounts
/// to appear in the graph.
pub const MIN_SHARED_FOLLOWERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FollowNode {
    /// One of the accounts under analysis, keyed by handle.
    Account(String),
    /// An account followed by several named accounts, keyed by ID.
    Friend(UserId),
}

impl FollowNode {
    pub fn is_named_account(&self) -> bool {
        matches!(self, FollowNode::Account(_))
    }

    /// Text drawn next to the node: the handle for named accounts, nothing
    /// for friends.
    pub fn label(&self) -> &str {
        match self {
            FollowNode::Account(handle) => handle,
            FollowNode::Friend(_) => "",
        }
    }
}

impl fmt::Display for FollowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowNode::Account(handle) => f.write_str(handle),
            FollowNode::Friend(id) => write!(f, "{id}"),
        }
    }
}

/// Undirected graph of named accounts and the friends they share.
pub struct FollowGraph {
    pub graph: UnGraph<FollowNode, ()>,
    node_indices: HashMap<FollowNode, NodeIndex>,
}

impl FollowGraph {
    /// Every named account becomes a node. Each ID followed by at least
    /// [`MIN_SHARED_FOLLOWERS`] named accounts becomes a node joined to each
    /// of its followers; everything else is left out.
    pub fn build(accounts: &[Account], counts: &FollowCounts) -> Self {
        let mut follow_graph = FollowGraph {
            graph: UnGraph::new_undirected(),
            node_indices: HashMap::new(),
        };

        for account in accounts {
            follow_graph.add_node(FollowNode::Account(account.handle.clone()));
        }

        for account in accounts {
            let source = follow_graph.node_indices[&FollowNode::Account(account.handle.clone())];
            for &id in account.follows() {
                if counts.get(id) >= MIN_SHARED_FOLLOWERS {
                    let friend = follow_graph.add_node(FollowNode::Friend(id));
                    follow_graph.graph.update_edge(source, friend, ());
                }
            }
        }

        follow_graph
    }

    fn add_node(&mut self, node: FollowNode) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .node_indices
            .entry(node.clone())
            .or_insert_with(|| graph.add_node(node))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node: &FollowNode) -> bool {
        self.node_indices.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FollowNode> {
        self.graph.node_weights()
    }

    /// All edges as `(handle, friend id)` pairs, sorted.
    pub fn edges(&self) -> Vec<(String, UserId)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .filter_map(|(a, b)| match (&self.graph[a], &self.graph[b]) {
                (FollowNode::Account(h), FollowNode::Friend(id))
                | (FollowNode::Friend(id), FollowNode::Account(h)) => Some((h.clone(), *id)),
                _ => None,
            })
            .collect();
        edges.sort();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_follow_of_shared_id_adds_one_node() {
        let accounts = vec![
            Account::new(1, "a", vec![5]),
            Account::new(2, "b", vec![5]),
            Account::new(3, "c", vec![5]),
        ];
        let counts = FollowCounts::from_accounts(&accounts);
        let graph = FollowGraph::build(&accounts, &counts);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn only_named_accounts_carry_labels() {
        assert!(FollowNode::Account("a".into()).is_named_account());
        assert_eq!(FollowNode::Account("a".into()).label(), "a");
        assert!(!FollowNode::Friend(12).is_named_account());
        assert_eq!(FollowNode::Friend(12).label(), "");
        assert_eq!(FollowNode::Friend(12).to_string(), "12");
    }

    #[test]
    fn account_without_follows_is_still_a_node() {
        let accounts = vec![Account::new(1, "lonely", vec![])];
        let graph = FollowGraph::build(&accounts, &FollowCounts::from_accounts(&accounts));
        assert!(graph.contains(&FollowNode::Account("lonely".into())));
        assert_eq!(graph.edge_count(), 0);
    }
}
