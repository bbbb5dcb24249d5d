//! Frontier containers: the only thing that differs between BFS, DFS and the
//! best-first strategies.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::state::State;

/// A state waiting to be expanded.
#[derive(Debug)]
pub(crate) struct Entry {
    pub state: State,
    /// Node in the search tree that reached `state`; `None` for the start state.
    pub node: Option<usize>,
    /// Weighted cost of the path so far.
    pub cost: u32,
    pub depth: usize,
}

pub(crate) trait Frontier {
    fn push(&mut self, entry: Entry, priority: u32);
    fn pop(&mut self) -> Option<Entry>;
    fn len(&self) -> usize;
}

/// First in, first out. Priorities are ignored.
#[derive(Debug, Default)]
pub(crate) struct Fifo(VecDeque<Entry>);

impl Frontier for Fifo {
    fn push(&mut self, entry: Entry, _priority: u32) {
        self.0.push_back(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Last in, first out. Priorities are ignored.
#[derive(Debug, Default)]
pub(crate) struct Lifo(Vec<Entry>);

impl Frontier for Lifo {
    fn push(&mut self, entry: Entry, _priority: u32) {
        self.0.push(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug)]
struct Prioritized {
    priority: u32,
    seq: u64,
    entry: Entry,
}

impl PartialEq for Prioritized {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Prioritized {}

impl Ord for Prioritized {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; equal priorities pop in insertion order.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Prioritized {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lowest priority first, ties broken by insertion order.
#[derive(Debug, Default)]
pub(crate) struct Priority {
    heap: BinaryHeap<Prioritized>,
    counter: u64,
}

impl Frontier for Priority {
    fn push(&mut self, entry: Entry, priority: u32) {
        self.counter += 1;
        self.heap.push(Prioritized {
            priority,
            seq: self.counter,
            entry,
        });
    }

    fn pop(&mut self) -> Option<Entry> {
        self.heap.pop().map(|p| p.entry)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_map;

    fn entry(cost: u32) -> Entry {
        Entry {
            state: parse_map("X, 2, 0, 2, H, 1").unwrap(),
            node: None,
            cost,
            depth: 0,
        }
    }

    fn drain(frontier: &mut impl Frontier) -> Vec<u32> {
        std::iter::from_fn(|| frontier.pop().map(|e| e.cost)).collect()
    }

    #[test]
    fn fifo_and_lifo_order() {
        let mut fifo = Fifo::default();
        let mut lifo = Lifo::default();
        for cost in [1, 2, 3] {
            fifo.push(entry(cost), 0);
            lifo.push(entry(cost), 0);
        }
        assert_eq!(fifo.len(), 3);
        assert_eq!(drain(&mut fifo), [1, 2, 3]);
        assert_eq!(drain(&mut lifo), [3, 2, 1]);
    }

    #[test]
    fn priority_breaks_ties_by_insertion() {
        let mut frontier = Priority::default();
        // cost doubles as a label here
        frontier.push(entry(10), 5);
        frontier.push(entry(11), 2);
        frontier.push(entry(12), 5);
        frontier.push(entry(13), 2);
        frontier.push(entry(14), 0);
        assert_eq!(drain(&mut frontier), [14, 11, 13, 10, 12]);
    }
}
