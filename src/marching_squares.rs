//! Per-level pipeline and the concurrent level scheduler
//!
//! Each level runs independently: classify cells, emit oriented segments into
//! an adjacency map, trace rings, nest holes into exteriors. Levels share only
//! the read-only padded grid and the transform, so they fan out over rayon
//! with no locking, and the results are joined in the caller's level order.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::adjacency::AdjacencyMap;
use crate::config::ContourOptions;
use crate::error::{ContourError, Result};
use crate::grid::{PaddedGrid, SampleGrid, MAX_SAMPLE_MAGNITUDE};
use crate::polygon::{assemble_polygons, Assembly, Polygon};
use crate::ring::RingTracer;
use crate::segment::SegmentGenerator;
use crate::sink::PolygonSink;
use crate::transform::AffineTransform;

/// Counters describing how one level was built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Segments stored in the adjacency map
    pub segments: usize,
    /// Zero-length segments dropped before tracing
    pub degenerate_segments: usize,
    /// Rings kept after tracing
    pub rings: usize,
    /// Closed chains dropped for having no area
    pub discarded_rings: usize,
    /// Holes no exterior contained
    pub orphaned_holes: usize,
}

/// Polygons for one isovalue
#[derive(Debug, Clone, PartialEq)]
pub struct LevelResult {
    level: f64,
    polygons: Vec<Polygon>,
    stats: LevelStats,
}

impl LevelResult {
    /// A level with no polygons
    pub fn empty(level: f64) -> Self {
        Self {
            level,
            polygons: Vec::new(),
            stats: LevelStats::default(),
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn stats(&self) -> LevelStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Level results, index-aligned with the requested levels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourSet {
    results: Vec<LevelResult>,
}

impl ContourSet {
    pub fn new(results: Vec<LevelResult>) -> Self {
        Self { results }
    }

    /// Levels in request order, duplicates included
    pub fn levels(&self) -> Vec<f64> {
        self.results.iter().map(LevelResult::level).collect()
    }

    pub fn results(&self) -> &[LevelResult] {
        &self.results
    }

    pub fn get(&self, index: usize) -> Option<&LevelResult> {
        self.results.get(index)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Polygon count summed over every level
    pub fn total_polygons(&self) -> usize {
        self.results.iter().map(|r| r.polygons.len()).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LevelResult> {
        self.results.iter()
    }
}

impl IntoIterator for ContourSet {
    type Item = LevelResult;
    type IntoIter = std::vec::IntoIter<LevelResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ContourSet {
    type Item = &'a LevelResult;
    type IntoIter = std::slice::Iter<'a, LevelResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Contour one level of an already padded grid
///
/// Runs sequentially on the calling thread. The padded grid and transform
/// are only read, so any number of levels can run against them at once.
///
/// # Errors
///
/// `Configuration` for a non-finite level, a level beyond
/// [`MAX_SAMPLE_MAGNITUDE`](crate::MAX_SAMPLE_MAGNITUDE) or invalid options, and
/// `AlgorithmInvariantViolation` if the segments of the level do not close
/// into rings.
pub fn process_level(
    padded: &PaddedGrid,
    transform: &AffineTransform,
    level: f64,
    options: &ContourOptions,
) -> Result<LevelResult> {
    if !level.is_finite() {
        return Err(ContourError::configuration(format!(
            "level must be finite, got {level}"
        )));
    }
    if level.abs() > MAX_SAMPLE_MAGNITUDE {
        return Err(ContourError::configuration(format!(
            "level {level:e} is outside +/-{MAX_SAMPLE_MAGNITUDE:e}"
        )));
    }
    options.validate()?;

    if options.skip_uncrossed_levels && !padded.is_crossed_by(level) {
        trace!(level, min = padded.min(), max = padded.max(), "level not crossed by samples");
        return Ok(LevelResult::empty(level));
    }

    let start = Instant::now();
    let generator = SegmentGenerator::new(padded, transform, level, options.epsilon);
    let mut map = AdjacencyMap::new();
    generator.for_each_segment(|segment, cell| {
        map.insert(segment, cell);
    });
    let segments = map.inserted();
    let degenerate_segments = map.ignored();
    let segment_duration = start.elapsed();

    let start = Instant::now();
    let mut tracer = RingTracer::new(map, level);
    let rings = tracer.trace()?;
    let trace_stats = tracer.stats();
    let trace_duration = start.elapsed();

    let start = Instant::now();
    let Assembly { polygons, orphans } = assemble_polygons(rings);
    let nesting_duration = start.elapsed();

    if trace_stats.discarded > 0 {
        warn!(
            level,
            discarded = trace_stats.discarded,
            "dropped zero-area rings"
        );
    }
    if !orphans.is_empty() {
        warn!(
            level,
            orphans = orphans.len(),
            "dropped holes with no containing exterior"
        );
    }

    debug!(
        level,
        segments,
        rings = trace_stats.rings,
        polygons = polygons.len(),
        segment_ms = segment_duration.as_millis(),
        trace_ms = trace_duration.as_millis(),
        nesting_ms = nesting_duration.as_millis(),
        "Contoured level"
    );

    Ok(LevelResult {
        level,
        polygons,
        stats: LevelStats {
            segments,
            degenerate_segments,
            rings: trace_stats.rings,
            discarded_rings: trace_stats.discarded,
            orphaned_holes: orphans.len(),
        },
    })
}

/// Contour a grid at every requested level
///
/// Levels may be unsorted and may repeat; each is contoured on its own and
/// the returned set is index-aligned with `levels`. Work is spread over
/// rayon's global pool, or over a dedicated pool when
/// [`ContourOptions::threads`] is set. If any level fails the whole call
/// fails, and nothing is returned for the levels that succeeded.
///
/// # Example
///
/// ```
/// use geo_contour_polygons::{contour, AffineTransform, ContourOptions, SampleGrid};
///
/// let grid = SampleGrid::from_rows(&[
///     vec![0.0, 0.0, 0.0],
///     vec![0.0, 10.0, 0.0],
///     vec![0.0, 0.0, 0.0],
/// ])
/// .unwrap();
///
/// let set = contour(&grid, &AffineTransform::identity(), &[5.0], &ContourOptions::default()).unwrap();
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.total_polygons(), 1);
/// ```
pub fn contour(
    grid: &SampleGrid,
    transform: &AffineTransform,
    levels: &[f64],
    options: &ContourOptions,
) -> Result<ContourSet> {
    if levels.is_empty() {
        return Err(ContourError::configuration("levels list is empty"));
    }
    if let Some((index, level)) = levels.iter().enumerate().find(|(_, l)| !l.is_finite()) {
        return Err(ContourError::configuration(format!(
            "level {index} is not finite: {level}"
        )));
    }
    options.validate()?;
    transform.validate()?;

    let start = Instant::now();
    let padded = PaddedGrid::new(grid);

    let run = || {
        levels
            .par_iter()
            .map(|&level| process_level(&padded, transform, level, options))
            .collect::<Result<Vec<_>>>()
    };

    let results = match options.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ContourError::configuration(format!("failed to build thread pool: {e}")))?
            .install(run)?,
        None => run()?,
    };

    let set = ContourSet::new(results);
    debug!(
        cols = grid.cols(),
        rows = grid.rows(),
        levels = levels.len(),
        polygons = set.total_polygons(),
        elapsed_ms = start.elapsed().as_millis(),
        "Contoured grid"
    );

    Ok(set)
}

/// Contour a grid and hand each level to `sink` in request order
///
/// Nothing reaches the sink unless every level succeeded.
pub fn contour_into<S>(
    grid: &SampleGrid,
    transform: &AffineTransform,
    levels: &[f64],
    options: &ContourOptions,
    sink: &mut S,
) -> Result<()>
where
    S: PolygonSink + ?Sized,
{
    let set = contour(grid, transform, levels, options)?;
    for result in &set {
        sink.accept(result.level(), result.polygons())?;
    }
    Ok(())
}

/// Most levels [`generate_levels`] will build
pub const MAX_GENERATED_LEVELS: usize = 100_000;

/// Largest integer below which every `f64` index is exact
const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

/// Levels at every multiple of `interval` within `[min, max]`
///
/// Returns an empty list for a non-positive interval or an empty range.
///
/// # Errors
///
/// `Configuration` when the range holds more than [`MAX_GENERATED_LEVELS`]
/// multiples, or when a multiple index is too large to count exactly.
///
/// ```
/// use geo_contour_polygons::generate_levels;
///
/// assert_eq!(generate_levels(-3.0, 12.0, 5.0).unwrap(), vec![0.0, 5.0, 10.0]);
/// assert!(generate_levels(0.0, 10.0, 0.0).unwrap().is_empty());
/// assert!(generate_levels(0.0, 1e12, 1e-3).is_err());
/// ```
pub fn generate_levels(min: f64, max: f64, interval: f64) -> Result<Vec<f64>> {
    let finite = min.is_finite() && max.is_finite() && interval.is_finite();
    if !finite || interval <= 0.0 || max <= min {
        return Ok(vec![]);
    }

    // Multiples are computed from an index so errors do not accumulate
    let first = (min / interval).ceil();
    let last = (max / interval).floor();
    if !first.is_finite() || !last.is_finite() || first.abs().max(last.abs()) > MAX_EXACT_INDEX {
        return Err(ContourError::configuration(format!(
            "cannot index multiples of {interval} within [{min}, {max}]"
        )));
    }
    if last < first {
        return Ok(vec![]);
    }
    let count = last - first + 1.0;
    if count > MAX_GENERATED_LEVELS as f64 {
        return Err(ContourError::configuration(format!(
            "interval {interval} yields {count:e} levels, limit is {MAX_GENERATED_LEVELS}"
        )));
    }

    Ok((first as i64..=last as i64)
        .map(|k| k as f64 * interval)
        .filter(|level| *level >= min && *level <= max)
        .collect())
}
