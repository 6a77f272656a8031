//! A variant of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! that keeps one node per key while the node itself carries extra search state, breaks cost ties
//! between arrivals with a caller-supplied ordering and stops after a fixed number of expansions.
//! Passing a zero heuristic turns it into uniform-cost search.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use log::warn;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use std::hash::Hash;

struct OpenEntry<K> {
    priority: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for OpenEntry<K> {}

impl<K: PartialEq> PartialEq for OpenEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.priority.eq(&other.priority) && self.cost.eq(&other.cost)
    }
}

impl<K: Ord> PartialOrd for OpenEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for OpenEntry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest priority first; ties go to the cheaper entry so that every node which can still
        // improve another one at equal priority is expanded before it
        match other.priority.cmp(&self.priority) {
            Ordering::Equal => other.cost.cmp(&self.cost),
            s => s,
        }
    }
}

/// The record kept per key: where it was reached from, at what cost and in which state.
pub(crate) struct Node<N, C> {
    pub parent: usize,
    pub cost: C,
    pub state: N,
}

/// Everything a best-first run produced. `nodes` holds every key that was ever reached.
pub(crate) struct BestFirstRun<K, N, C> {
    pub path: Option<(Vec<N>, C)>,
    pub expansions: usize,
    pub limit_reached: bool,
    pub nodes: FxIndexMap<K, Node<N, C>>,
}

fn trace_back<K, N: Clone, C>(nodes: &FxIndexMap<K, Node<N, C>>, start: usize) -> Vec<N> {
    let mut path: Vec<N> = itertools::unfold(start, |i| {
        nodes.get_index(*i).map(|(_, node)| {
            *i = node.parent;
            node.state.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Runs best-first search from `start` until `success` holds for an expanded node, the open set
/// is empty, or `max_expansions` nodes have been expanded. Nodes are merged by `key`. A node is
/// replaced when a strictly cheaper arrival is found, or when an arrival of equal cost orders
/// before it under `tie_break`. Stale queue entries are skipped and do not count as expansions.
pub(crate) fn best_first<K, N, C, FK, FN, IN, FH, FS, FT>(
    start: N,
    mut key: FK,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
    mut tie_break: FT,
    max_expansions: usize,
) -> BestFirstRun<K, N, C>
where
    K: Eq + Hash,
    N: Clone,
    C: Zero + Ord + Copy,
    FK: FnMut(&N) -> K,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
    FT: FnMut(&N, &N) -> Ordering,
{
    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        priority: heuristic(&start),
        cost: Zero::zero(),
        index: 0,
    });
    let mut nodes: FxIndexMap<K, Node<N, C>> = FxIndexMap::default();
    nodes.insert(
        key(&start),
        Node {
            parent: usize::MAX,
            cost: Zero::zero(),
            state: start,
        },
    );
    let mut expansions = 0;
    let mut limit_reached = false;
    while let Some(OpenEntry { cost, index, .. }) = open.pop() {
        let successors = {
            let Some((_, node)) = nodes.get_index(index) else {
                continue;
            };
            // Stale entry for a node that was improved after it was queued
            if cost > node.cost {
                continue;
            }
            if expansions >= max_expansions {
                warn!("Search gave up after {} expansions", expansions);
                limit_reached = true;
                break;
            }
            expansions += 1;
            if success(&node.state) {
                let path = trace_back(&nodes, index);
                return BestFirstRun {
                    path: Some((path, cost)),
                    expansions,
                    limit_reached,
                    nodes,
                };
            }
            successors(&node.state)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            match nodes.entry(key(&successor)) {
                Vacant(e) => {
                    let priority = new_cost + heuristic(&successor);
                    let n = e.index();
                    e.insert(Node {
                        parent: index,
                        cost: new_cost,
                        state: successor,
                    });
                    open.push(OpenEntry {
                        priority,
                        cost: new_cost,
                        index: n,
                    });
                }
                Occupied(mut e) => {
                    let current = e.get();
                    if new_cost < current.cost {
                        let priority = new_cost + heuristic(&successor);
                        let n = e.index();
                        e.insert(Node {
                            parent: index,
                            cost: new_cost,
                            state: successor,
                        });
                        open.push(OpenEntry {
                            priority,
                            cost: new_cost,
                            index: n,
                        });
                    } else if new_cost == current.cost
                        && tie_break(&successor, &current.state) == Ordering::Less
                    {
                        // Same cost, so the queued entry stays valid
                        e.insert(Node {
                            parent: index,
                            cost: new_cost,
                            state: successor,
                        });
                    }
                }
            }
        }
    }
    BestFirstRun {
        path: None,
        expansions,
        limit_reached,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Line graph 0 - 1 - 2 - ... - 9 with unit edges.
    fn line_successors(n: &i32) -> Vec<(i32, i32)> {
        [*n - 1, *n + 1]
            .into_iter()
            .filter(|m| (0..10).contains(m))
            .map(|m| (m, 1))
            .collect()
    }

    fn no_tie_break<N>(_: &N, _: &N) -> Ordering {
        Ordering::Equal
    }

    #[test]
    fn finds_shortest_line_path() {
        let run = best_first(
            0,
            |n| *n,
            line_successors,
            |n| 7 - n.min(&7),
            |n| *n == 7,
            no_tie_break,
            100,
        );
        let (path, cost) = run.path.unwrap();
        assert_eq!(path, (0..=7).collect::<Vec<_>>());
        assert_eq!(cost, 7);
        assert!(!run.limit_reached);
    }

    #[test]
    fn exhausts_and_counts_expansions() {
        let run = best_first(0, |n| *n, line_successors, |_| 0, |n| *n == 42, no_tie_break, 100);
        assert!(run.path.is_none());
        assert!(!run.limit_reached);
        assert_eq!(run.expansions, 10);
        assert_eq!(run.nodes.len(), 10);
    }

    #[test]
    fn stops_at_expansion_cap() {
        let run = best_first(0, |n| *n, line_successors, |_| 0, |n| *n == 9, no_tie_break, 3);
        assert!(run.path.is_none());
        assert!(run.limit_reached);
        assert_eq!(run.expansions, 3);
    }

    #[test]
    fn stale_entries_are_not_expansions() {
        // 0 -> 1 costs 5 directly but 2 through node 2
        let successors = |n: &i32| match *n {
            0 => vec![(1, 5), (2, 1)],
            2 => vec![(1, 1)],
            _ => vec![],
        };
        let run = best_first(0, |n| *n, successors, |_| 0, |_| false, no_tie_break, 100);
        assert_eq!(run.expansions, 3);
        assert_eq!(run.nodes[&1].cost, 2);
        assert_eq!(run.nodes[&1].parent, run.nodes.get_index_of(&2).unwrap());
    }

    #[test]
    fn equal_cost_arrivals_use_tie_break() {
        // Diamond 0 -> {1, 2} -> 3; states are (node, predecessor)
        let successors = |s: &(u8, u8)| match s.0 {
            0 => vec![((1, 0), 1), ((2, 0), 1)],
            1 => vec![((3, 1), 1)],
            2 => vec![((3, 2), 1)],
            _ => vec![],
        };
        let lowest = best_first(
            (0, 0),
            |s| s.0,
            successors,
            |_| 0,
            |_| false,
            |a, b| a.1.cmp(&b.1),
            100,
        );
        assert_eq!(lowest.nodes[&3].state, (3, 1));
        let highest = best_first(
            (0, 0),
            |s| s.0,
            successors,
            |_| 0,
            |_| false,
            |a, b| b.1.cmp(&a.1),
            100,
        );
        assert_eq!(highest.nodes[&3].state, (3, 2));
        assert_eq!(highest.expansions, 4);
        assert_eq!(highest.nodes[&3].cost, 2);
    }
}
