//! BMZ minimal-perfect-hash construction.
//!
//! Given a base hasher already perfect over `n` keys, BMZ finds a hash
//! onto exactly `[0, n)`. Each attempt seeds two vertex hashes and maps
//! every key to an edge of a graph with `⌈c·n⌉` vertices; when the attempt
//! succeeds, an integer table `g` over the vertices satisfies
//!
//! ```text
//! hash(key) = g[a(key)] + g[b(key)]   (wrapping 32-bit sum, < n for domain keys)
//! ```
//!
//! # Algorithm
//!
//! Per attempt:
//!
//! 1. Draw two 32-bit seeds and compute every key's edge; a self-loop is
//!    rotated away, a duplicate edge abandons the seed.
//! 2. Iteratively peel degree-1 vertices; whatever survives is *critical*
//!    (lives on a cycle or has degree > 2 after chain stripping).
//! 3. Greedily assign ascending integers to critical vertices, tree by
//!    tree, choosing for each vertex the smallest candidate whose induced
//!    edge values are fresh and below `n`; impossibility abandons the seed.
//! 4. Walk outward from the critical vertices (then over isolated
//!    chains), giving each new vertex `g[w] = e − g[v]` for the lowest
//!    still-unassigned edge value `e`.
//!
//! Duplicate edges dominate the failure probability; they get likelier as
//! `c` approaches 1.0, while each extra `c` costs four bytes per key in
//! the finished table.
//!
//! Construction state is transient per attempt; only `(seeds, g, n)` and
//! the base hasher survive inside the returned [`MinimalHasher`].

use std::collections::VecDeque;
use std::rc::Rc;

use rand::RngCore;

use crate::core::bitvec::BitVec;
use crate::domain::PerfectDomain;
use crate::error::{PerfectCraftError, Result};
use crate::hash::hasher::{HashRange, KeyHasher};
use crate::hash::murmur3::murmur3_32;

/// The BMZ construction parameters.
///
/// Validated by [`Perfect::minimized_with`](crate::perfect::Perfect::minimized_with)
/// before reaching this type.
pub(crate) struct Bmz {
    max_attempts: u32,
    c: f64,
}

impl Bmz {
    pub(crate) fn new(max_attempts: u32, c: f64) -> Self {
        Self { max_attempts, c }
    }

    /// Run seeded attempts until one yields a minimal hash.
    pub(crate) fn build<T: 'static>(
        &self,
        base: Rc<dyn KeyHasher<T>>,
        domain: &PerfectDomain<T>,
        rng: &mut dyn RngCore,
    ) -> Result<MinimalHasher<T>> {
        let key_count = domain.len();
        let vertex_count = (self.c * key_count as f64).ceil();
        if vertex_count > f64::from(u32::MAX) {
            return Err(PerfectCraftError::invalid_parameters(
                "domain too large for a 32-bit g-table",
            ));
        }
        let vertex_count = vertex_count as usize;

        for _ in 0..self.max_attempts {
            let seed1 = rng.next_u32();
            let seed2 = rng.next_u32();

            let graph = match build_graph(&*base, seed1, seed2, vertex_count, domain) {
                Some(graph) => graph,
                None => continue, // duplicate edge, reseed
            };

            let mut g = vec![0u32; vertex_count];
            if !Assigner::new(&graph).assign(&mut g) {
                continue; // critical-vertex conflict, reseed
            }

            return Ok(MinimalHasher {
                base,
                seed1,
                seed2,
                g: g.into(),
                key_count,
            });
        }
        Err(PerfectCraftError::perfection_failure(
            "failed to find minimal hash",
        ))
    }
}

/// A minimal perfect hash onto `[0, n)`.
///
/// Produced by [`Perfect::minimized`](crate::perfect::Perfect::minimized);
/// closes over the base hasher, the two edge seeds, and the g-table.
/// Defined behavior outside the construction domain is only that the
/// result is some integer; containers pair every lookup with a store
/// equality check.
pub struct MinimalHasher<T: ?Sized> {
    base: Rc<dyn KeyHasher<T>>,
    seed1: u32,
    seed2: u32,
    g: Rc<[u32]>,
    key_count: usize,
}

impl<T: ?Sized> Clone for MinimalHasher<T> {
    fn clone(&self) -> Self {
        Self {
            base: Rc::clone(&self.base),
            seed1: self.seed1,
            seed2: self.seed2,
            g: Rc::clone(&self.g),
            key_count: self.key_count,
        }
    }
}

impl<T: ?Sized> MinimalHasher<T> {
    /// The hash for an empty domain: range `[0, 0)`.
    pub(crate) fn empty(base: Rc<dyn KeyHasher<T>>) -> Self {
        Self {
            base,
            seed1: 0,
            seed2: 0,
            g: Rc::from(Vec::<u32>::new()),
            key_count: 0,
        }
    }

    /// Bytes of memory held by the g-table.
    #[must_use]
    pub fn table_bytes(&self) -> usize {
        self.g.len() * std::mem::size_of::<u32>()
    }
}

impl<T: ?Sized> KeyHasher<T> for MinimalHasher<T> {
    fn range(&self) -> HashRange {
        HashRange::from_len(self.key_count as u64)
    }

    fn hash(&self, key: &T) -> u64 {
        if self.g.is_empty() {
            return 0;
        }
        let (a, b) = compute_edge(&*self.base, self.seed1, self.seed2, self.g.len(), key);
        u64::from(self.g[a].wrapping_add(self.g[b]))
    }
}

/// A key's vertex pair under the seeded edge hashes.
///
/// Equal vertices would form a self-loop, so the second vertex is rotated
/// one position (wrapping) in that case.
fn compute_edge<T: ?Sized>(
    base: &dyn KeyHasher<T>,
    seed1: u32,
    seed2: u32,
    vertex_count: usize,
    key: &T,
) -> (usize, usize) {
    let bytes = base.hash(key).to_le_bytes();
    let a = murmur3_32(&bytes, seed1) as usize % vertex_count;
    let mut b = murmur3_32(&bytes, seed2) as usize % vertex_count;
    if a == b {
        b = if b == vertex_count - 1 { 0 } else { b + 1 };
    }
    (a, b)
}

/// One attempt's hash graph: edges are keys, vertices index the g-table.
struct Graph {
    edge_count: usize,
    adjacency: Vec<Vec<u32>>,
}

/// Compute every key's edge; `None` when two keys collide on a vertex pair.
fn build_graph<T: 'static>(
    base: &dyn KeyHasher<T>,
    seed1: u32,
    seed2: u32,
    vertex_count: usize,
    domain: &PerfectDomain<T>,
) -> Option<Graph> {
    let mut graph = Graph {
        edge_count: 0,
        adjacency: vec![Vec::new(); vertex_count],
    };
    for key in domain.iter() {
        let (a, b) = compute_edge(base, seed1, seed2, vertex_count, &key);
        if !graph.set_edge(a as u32, b as u32) {
            return None;
        }
    }
    Some(graph)
}

impl Graph {
    /// Record an edge; false if this vertex pair is already an edge.
    fn set_edge(&mut self, a: u32, b: u32) -> bool {
        if self.adjacency[a as usize].contains(&b) {
            return false;
        }
        self.adjacency[a as usize].push(b);
        self.adjacency[b as usize].push(a);
        self.edge_count += 1;
        true
    }

    fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Vertices that survive iterative degree-1 peeling.
    fn find_critical(&self) -> BitVec {
        let n = self.vertex_count();
        let mut degrees = vec![0i64; n];
        for (vertex, neighbors) in self.adjacency.iter().enumerate() {
            degrees[vertex] += neighbors.len() as i64;
        }

        let mut peel: VecDeque<usize> = (0..n).filter(|&v| degrees[v] == 1).collect();
        while let Some(v) = peel.pop_front() {
            degrees[v] -= 1;
            for &adjacent in &self.adjacency[v] {
                degrees[adjacent as usize] -= 1;
                if degrees[adjacent as usize] == 1 {
                    peel.push_back(adjacent as usize);
                }
            }
        }

        let mut critical = BitVec::new(n);
        for (v, &degree) in degrees.iter().enumerate() {
            if degree > 1 {
                critical.set(v);
            }
        }
        critical
    }
}

/// Integer assignment over one attempt's graph.
struct Assigner<'g> {
    graph: &'g Graph,
    critical: BitVec,
    assigned_edges: BitVec,
}

impl<'g> Assigner<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            critical: graph.find_critical(),
            assigned_edges: BitVec::new(graph.edge_count),
            graph,
        }
    }

    /// Fill `g`; false when no conflict-free assignment exists this seed.
    fn assign(&mut self, g: &mut [u32]) -> bool {
        self.assign_critical(g) && self.assign_non_critical(g)
    }

    /// Assign ascending integers to critical vertices, one BFS tree at a
    /// time. Critical vertices are not necessarily connected, so each
    /// exhausted tree restarts from the lowest unassigned critical vertex.
    fn assign_critical(&mut self, g: &mut [u32]) -> bool {
        let mut assigned = BitVec::new(self.graph.vertex_count());
        let mut candidate: u32 = 0;
        while let Some(root) = first_one_not_in(&self.critical, &assigned) {
            let mut queue = VecDeque::from([root as u32]);
            match self.assign_critical_tree(&mut queue, candidate, &mut assigned, g) {
                Some(next) => candidate = next,
                None => return false,
            }
        }
        true
    }

    /// Process one tree of connected critical vertices.
    ///
    /// Returns the next candidate value, or `None` when some vertex forces
    /// an edge value at or beyond the edge count.
    fn assign_critical_tree(
        &mut self,
        queue: &mut VecDeque<u32>,
        mut candidate: u32,
        assigned: &mut BitVec,
        g: &mut [u32],
    ) -> Option<u32> {
        while let Some(v) = queue.pop_front() {
            let v = v as usize;
            if assigned.get(v) {
                continue;
            }
            candidate = self.satisfying_value(&self.graph.adjacency[v], candidate, assigned, g);
            for &adjacent in &self.graph.adjacency[v] {
                let a = adjacent as usize;
                if !assigned.get(a) && self.critical.get(a) && v != a {
                    queue.push_back(adjacent);
                }
                if assigned.get(a) {
                    // v's value is settled, so the edge to each assigned
                    // neighbour is now taken.
                    let edge_value = u64::from(candidate) + u64::from(g[a]);
                    if edge_value >= self.assigned_edges.len() as u64 {
                        return None;
                    }
                    self.assigned_edges.set(edge_value as usize);
                }
            }
            g[v] = candidate;
            assigned.set(v);
            candidate += 1;
        }
        Some(candidate)
    }

    /// The smallest x ≥ `candidate` whose edges to already-assigned
    /// neighbours are all fresh.
    fn satisfying_value(
        &self,
        adjacency: &[u32],
        mut candidate: u32,
        assigned: &BitVec,
        g: &[u32],
    ) -> u32 {
        'retry: loop {
            for &adjacent in adjacency {
                let a = adjacent as usize;
                if assigned.get(a) {
                    let edge_value = u64::from(g[a]) + u64::from(candidate);
                    if edge_value < self.assigned_edges.len() as u64
                        && self.assigned_edges.get(edge_value as usize)
                    {
                        candidate += 1;
                        continue 'retry;
                    }
                }
            }
            return candidate;
        }
    }

    /// BFS outward from the assigned critical vertices, then sweep any
    /// vertices left unvisited (isolated chains never touch a critical
    /// vertex).
    fn assign_non_critical(&mut self, g: &mut [u32]) -> bool {
        let mut visited = self.critical.clone();
        let mut queue: VecDeque<u32> = self.critical.ones().map(|v| v as u32).collect();
        if !self.spread_values(&mut queue, &mut visited, g) {
            return false;
        }
        let mut cursor = 0;
        while let Some(root) = visited.next_zero_from(cursor) {
            queue.push_back(root as u32);
            if !self.spread_values(&mut queue, &mut visited, g) {
                return false;
            }
            cursor = root + 1;
        }
        true
    }

    /// Give every vertex reachable from the queue a value derived from the
    /// lowest unassigned edge: `g[w] = edge − g[v]` (wrapping), so the edge
    /// (v, w) hashes to exactly that edge value.
    fn spread_values(
        &mut self,
        queue: &mut VecDeque<u32>,
        visited: &mut BitVec,
        g: &mut [u32],
    ) -> bool {
        let mut cursor = 0;
        while let Some(v) = queue.pop_front() {
            let v = v as usize;
            for index in 0..self.graph.adjacency[v].len() {
                let adjacent = self.graph.adjacency[v][index];
                let a = adjacent as usize;
                if !visited.get(a) && a != v {
                    let edge_value = match self.assigned_edges.next_zero_from(cursor) {
                        Some(edge_value) => edge_value,
                        None => return false,
                    };
                    g[a] = (edge_value as u32).wrapping_sub(g[v]);
                    queue.push_back(adjacent);
                    self.assigned_edges.set(edge_value);
                    visited.set(a);
                    cursor = edge_value + 1;
                }
            }
            visited.set(v);
        }
        true
    }
}

/// Lowest position set in `wanted` but not in `excluded`.
fn first_one_not_in(wanted: &BitVec, excluded: &BitVec) -> Option<usize> {
    for (index, (&w, &e)) in wanted.words().iter().zip(excluded.words()).enumerate() {
        let pending = w & !e;
        if pending != 0 {
            return Some(index * 64 + pending.trailing_zeros() as usize);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hasher::ObjectHasher;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn minimal_over(keys: Vec<u64>, max_attempts: u32, c: f64) -> MinimalHasher<u64> {
        let domain = PerfectDomain::over(keys);
        let base: Rc<dyn KeyHasher<u64>> = Rc::new(ObjectHasher::new());
        let mut rng = StdRng::seed_from_u64(0);
        Bmz::new(max_attempts, c)
            .build(base, &domain, &mut rng)
            .unwrap()
    }

    fn assert_minimal(hasher: &MinimalHasher<u64>, keys: &[u64]) {
        let mut seen = BitVec::new(keys.len());
        for key in keys {
            let h = hasher.hash(key) as usize;
            assert!(h < keys.len(), "hash {} out of range {}", h, keys.len());
            assert!(!seen.get_then_set(h, true), "duplicate hash {}", h);
        }
        assert!(seen.is_all_ones());
    }

    #[test]
    fn test_minimal_over_small_domain() {
        let keys: Vec<u64> = vec![3, 1, 4, 15, 9, 2, 6];
        let hasher = minimal_over(keys.clone(), 100, 1.15);
        assert_minimal(&hasher, &keys);
        assert_eq!(hasher.range().len(), keys.len() as u128);
    }

    #[test]
    fn test_minimal_over_single_key() {
        let keys = vec![42u64];
        let hasher = minimal_over(keys.clone(), 100, 1.15);
        assert_eq!(hasher.hash(&42), 0);
        assert_eq!(hasher.range().len(), 1);
    }

    #[test]
    fn test_minimal_over_two_keys() {
        let keys = vec![7u64, 8];
        let hasher = minimal_over(keys.clone(), 100, 1.15);
        assert_minimal(&hasher, &keys);
    }

    #[test]
    fn test_every_size_up_to_sixty() {
        for n in 1..=60u64 {
            let keys: Vec<u64> = (0..n).map(|i| i * 31 + 7).collect();
            let hasher = minimal_over(keys.clone(), 100, 1.15);
            assert_minimal(&hasher, &keys);
        }
    }

    #[test]
    fn test_larger_domain() {
        let keys: Vec<u64> = (0..5_000u64).map(|i| i.wrapping_mul(0x9e37_79b9)).collect();
        let hasher = minimal_over(keys.clone(), 100, 1.15);
        assert_minimal(&hasher, &keys);
    }

    #[test]
    fn test_reported_table_size() {
        let keys: Vec<u64> = (0..100).collect();
        let hasher = minimal_over(keys, 100, 1.5);
        assert_eq!(hasher.table_bytes(), 150 * 4);
    }

    #[test]
    fn test_deterministic_under_seeded_rng() {
        let keys: Vec<u64> = (0..200).collect();
        let first = minimal_over(keys.clone(), 100, 1.15);
        let second = minimal_over(keys.clone(), 100, 1.15);
        for key in &keys {
            assert_eq!(first.hash(key), second.hash(key));
        }
    }

    #[test]
    fn test_exhaustion_reports_failure() {
        // A constant base hasher collides every pair of keys, so every
        // seed produces a duplicate edge.
        struct Constant;
        impl KeyHasher<u64> for Constant {
            fn range(&self) -> HashRange {
                HashRange::from_bits(32)
            }
            fn hash(&self, _key: &u64) -> u64 {
                9
            }
        }
        let domain = PerfectDomain::over(vec![1u64, 2, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let result = Bmz::new(5, 1.15).build(Rc::new(Constant), &domain, &mut rng);
        assert_eq!(
            result.err(),
            Some(PerfectCraftError::perfection_failure(
                "failed to find minimal hash"
            ))
        );
    }
}
