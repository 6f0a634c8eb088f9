//! Consumable segment graph keyed by endpoint
//!
//! Segments live in an arena and are indexed twice, by start point and by end
//! point. Every take removes the segment from the arena and from both indexes,
//! so a segment is handed out at most once.
//!
//! Where several live segments share a key (samples lying exactly on the
//! level can make unrelated cells meet at one grid vertex) the lowest segment
//! id wins. Ids follow insertion order, which follows the row-major cell scan,
//! so ring reconstruction is deterministic for a given grid and level.

use std::collections::HashMap;

use crate::point::Point;
use crate::segment::Segment;

/// Index of a segment in the arena
pub type SegmentId = usize;

/// Mutable multigraph of oriented segments
#[derive(Debug, Default)]
pub struct AdjacencyMap {
    arena: Vec<Option<Segment>>,
    origins: Vec<(usize, usize)>,
    by_start: HashMap<Point, Vec<SegmentId>>,
    by_end: HashMap<Point, Vec<SegmentId>>,
    /// Every id below this is already taken
    cursor: usize,
    live: usize,
    ignored: usize,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a segment emitted by padded cell `cell`
    ///
    /// Zero-length segments are ignored and yield `None`.
    pub fn insert(&mut self, segment: Segment, cell: (usize, usize)) -> Option<SegmentId> {
        if segment.is_degenerate() {
            self.ignored += 1;
            return None;
        }
        let id = self.arena.len();
        self.arena.push(Some(segment));
        self.origins.push(cell);
        self.by_start.entry(segment.start()).or_default().push(id);
        self.by_end.entry(segment.end()).or_default().push(id);
        self.live += 1;
        Some(id)
    }

    /// Remove and return the live segment with the lowest id
    pub fn take_any(&mut self) -> Option<(SegmentId, Segment)> {
        while self.cursor < self.arena.len() {
            if self.arena[self.cursor].is_some() {
                let id = self.cursor;
                return self.remove(id).map(|segment| (id, segment));
            }
            self.cursor += 1;
        }
        None
    }

    /// Remove and return a live segment whose start is `point`
    pub fn take_starting_at(&mut self, point: Point) -> Option<Segment> {
        let id = *self.by_start.get(&point)?.first()?;
        self.remove(id)
    }

    /// Remove and return a live segment whose end is `point`
    pub fn take_ending_at(&mut self, point: Point) -> Option<Segment> {
        let id = *self.by_end.get(&point)?.first()?;
        self.remove(id)
    }

    /// Padded-grid cell that emitted a segment (live or taken)
    pub fn origin(&self, id: SegmentId) -> Option<(usize, usize)> {
        self.origins.get(id).copied()
    }

    /// Number of live segments
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of segments accepted so far
    pub fn inserted(&self) -> usize {
        self.arena.len()
    }

    /// Number of zero-length segments turned away
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    fn remove(&mut self, id: SegmentId) -> Option<Segment> {
        let segment = self.arena.get_mut(id)?.take()?;
        unlink(&mut self.by_start, segment.start(), id);
        unlink(&mut self.by_end, segment.end(), id);
        self.live -= 1;
        Some(segment)
    }
}

/// Drop `id` from the list under `key`, removing the key once it is empty
fn unlink(index: &mut HashMap<Point, Vec<SegmentId>>, key: Point, id: SegmentId) {
    if let Some(ids) = index.get_mut(&key) {
        if let Some(pos) = ids.iter().position(|&other| other == id) {
            // Lists are short and kept in id order
            ids.remove(pos);
        }
        if ids.is_empty() {
            index.remove(&key);
        }
    }
}
