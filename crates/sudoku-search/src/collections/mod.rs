//! Hand-built ordered containers backing the graph engine: a left-leaning
//! red-black tree map and a comparator-driven binary heap.

mod priority_queue;
mod tree_map;

pub use priority_queue::PriorityQueue;
pub use tree_map::TreeMap;
