//! Cold-stream topology resolution.
//!
//! Walks the cooling-water graph from the tower-fed streams, giving every
//! stream a lane and every cooler a column. Columns are handed out right to
//! left, always taking the free column nearest to (and left of) the stream's
//! start, so water visually flows leftwards away from the source anchor.

use crate::error::{GeometryError, LayoutError, TopologyError};
use crate::ir::{ColdStream, NetworkIR};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::config::LayoutConfig;
use super::spacing::SpacingPlan;
use super::types::{Placement, Point, StreamLayout};

/// Lanes, columns and per-stream geometry produced by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStreams {
    /// Cooler -> column X
    pub columns: BTreeMap<String, f64>,
    pub streams: BTreeMap<String, StreamLayout>,
    /// Streams in the order they were resolved
    pub order: Vec<String>,
}

/// Scratch state for one resolution pass.
#[derive(Debug)]
struct ResolverContext<'a> {
    remaining_lanes: Vec<f64>,
    remaining_columns: Vec<f64>,
    columns: HashMap<&'a str, f64>,
    /// Start point of every stream that has been given a lane
    starts: HashMap<&'a str, Point>,
    layouts: HashMap<&'a str, StreamLayout>,
    order: Vec<&'a str>,
}

impl<'a> ResolverContext<'a> {
    fn new(plan: &SpacingPlan) -> Self {
        Self {
            remaining_lanes: plan.lane_pool.clone(),
            remaining_columns: plan.column_pool.clone(),
            columns: HashMap::new(),
            starts: HashMap::new(),
            layouts: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Take the free lane closest to `target_y`.
    fn take_lane_near(&mut self, target_y: f64) -> Option<f64> {
        let idx = nearest(&self.remaining_lanes, target_y)?;
        Some(self.remaining_lanes.remove(idx))
    }

    /// Column of `cooler`, allocating one left of `reference_x` on first sight.
    fn place_column(&mut self, cooler: &'a str, reference_x: f64) -> Result<f64, TopologyError> {
        if let Some(&x) = self.columns.get(cooler) {
            return Ok(x);
        }
        if self.remaining_columns.is_empty() {
            return Err(TopologyError::ColumnsExhausted {
                cooler: cooler.to_string(),
            });
        }
        let idx = nearest_left(&self.remaining_columns, reference_x).ok_or_else(|| {
            TopologyError::NoColumnLeftOf {
                cooler: cooler.to_string(),
                reference_x,
            }
        })?;
        let x = self.remaining_columns.remove(idx);
        self.columns.insert(cooler, x);
        trace!(cooler, x, "placed cooler column");
        Ok(x)
    }

    fn finish(self) -> ResolvedStreams {
        ResolvedStreams {
            columns: self
                .columns
                .into_iter()
                .map(|(name, x)| (name.to_string(), x))
                .collect(),
            streams: self
                .layouts
                .into_iter()
                .map(|(name, layout)| (name.to_string(), layout))
                .collect(),
            order: self.order.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Index of the value nearest to `target`; ties go to the earlier entry.
pub fn nearest(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        let d = (v - target).abs();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the value strictly left of `reference` and closest to it.
pub fn nearest_left(values: &[f64], reference: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v >= reference {
            continue;
        }
        if best.is_none_or(|(_, bv)| v > bv) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// First destination cycle found, walking streams in input order.
///
/// The chain starts and ends on the same stream. Destinations no stream
/// starts at are skipped here; the walk reports them.
fn find_cycle(ir: &NetworkIR) -> Option<Vec<String>> {
    let mut marks: HashMap<&str, Visit> = HashMap::new();
    let mut path: Vec<&str> = Vec::new();
    ir.cold_streams
        .iter()
        .find_map(|stream| visit(ir, stream, &mut marks, &mut path))
}

fn visit<'a>(
    ir: &'a NetworkIR,
    stream: &'a ColdStream,
    marks: &mut HashMap<&'a str, Visit>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    match marks.get(stream.name.as_str()) {
        Some(Visit::Done) => return None,
        Some(Visit::InProgress) => {
            let pos = path.iter().position(|s| *s == stream.name)?;
            let mut chain: Vec<String> = path[pos..].iter().map(|s| s.to_string()).collect();
            chain.push(stream.name.clone());
            return Some(chain);
        }
        None => {}
    }

    marks.insert(stream.name.as_str(), Visit::InProgress);
    path.push(stream.name.as_str());
    for cooler in stream.destination_coolers() {
        let Some(next) = ir.find_stream_starting_at(cooler) else {
            continue;
        };
        if let Some(chain) = visit(ir, next, marks, path) {
            return Some(chain);
        }
    }
    path.pop();
    marks.insert(stream.name.as_str(), Visit::Done);
    None
}

struct Resolver<'a> {
    ir: &'a NetworkIR,
    config: &'a LayoutConfig,
}

/// Assign lanes, columns, start and end points to every cold stream.
///
/// A plan from [`super::plan_spacing`] has exactly one lane per stream and one
/// column per cooler; a hand-built plan with shorter pools fails with
/// `LanesExhausted` or `ColumnsExhausted`.
pub fn resolve_streams(
    ir: &NetworkIR,
    plan: &SpacingPlan,
    config: &LayoutConfig,
) -> Result<ResolvedStreams, LayoutError> {
    let resolver = Resolver { ir, config };
    let mut ctx = ResolverContext::new(plan);

    let initial: Vec<&ColdStream> = ir.cold_streams.iter().filter(|s| s.is_initial()).collect();
    if initial.is_empty() {
        return Err(TopologyError::NoTowerSource.into());
    }
    if let Some(chain) = find_cycle(ir) {
        return Err(TopologyError::Cycle(chain).into());
    }

    // Every tower-fed stream claims a lane near the source before any is walked.
    let start_x = plan.source_point.x - config.source_inset;
    for stream in &initial {
        let y = ctx
            .take_lane_near(plan.source_point.y)
            .ok_or_else(|| TopologyError::LanesExhausted(stream.name.clone()))?;
        debug!(stream = %stream.name, lane = y, "tower-fed stream assigned lane");
        ctx.starts.insert(stream.name.as_str(), Point::new(start_x, y));
    }

    for stream in initial {
        if ctx.layouts.contains_key(stream.name.as_str()) {
            continue;
        }
        let start = ctx.starts[stream.name.as_str()];
        resolver.process(stream, start, &mut ctx)?;
    }

    if let Some(missing) = ir
        .cold_streams
        .iter()
        .find(|s| !ctx.layouts.contains_key(s.name.as_str()))
    {
        return Err(TopologyError::Unreachable(missing.name.clone()).into());
    }

    debug!(
        streams = ctx.layouts.len(),
        columns = ctx.columns.len(),
        "resolved cold-stream topology"
    );
    Ok(ctx.finish())
}

impl<'a> Resolver<'a> {
    fn process(
        &self,
        stream: &'a ColdStream,
        start: Point,
        ctx: &mut ResolverContext<'a>,
    ) -> Result<(), LayoutError> {
        let coolers = stream.coolers();
        if coolers.is_empty() {
            return Err(GeometryError::EmptyStream(stream.name.clone()).into());
        }
        let mut nodes = Vec::with_capacity(coolers.len());
        for cooler in coolers {
            let x = ctx.place_column(cooler, start.x)?;
            nodes.push(Placement {
                name: cooler.to_string(),
                x,
                y: start.y,
            });
        }

        let end_point = Point::new(self.end_x(stream, start.x, ctx)?, start.y);
        trace!(stream = %stream.name, ?start, ?end_point, "resolved stream extent");

        ctx.layouts.insert(
            stream.name.as_str(),
            StreamLayout {
                start_point: start,
                end_point,
                lane_y: start.y,
                nodes,
            },
        );
        ctx.order.push(stream.name.as_str());

        for cooler in stream.destination_coolers() {
            let next = self.ir.find_stream_starting_at(cooler).ok_or_else(|| {
                TopologyError::DanglingDestination {
                    stream: stream.name.clone(),
                    cooler: cooler.to_string(),
                }
            })?;
            if ctx.starts.contains_key(next.name.as_str()) {
                // Merge target already reached from another parent.
                continue;
            }

            let y = ctx
                .take_lane_near(end_point.y)
                .ok_or_else(|| TopologyError::LanesExhausted(next.name.clone()))?;
            let next_start = Point::new(end_point.x - self.config.branch_offset, y);
            debug!(from = %stream.name, to = %next.name, lane = y, "downstream stream assigned lane");
            ctx.starts.insert(next.name.as_str(), next_start);
            self.process(next, next_start, ctx)?;
        }

        Ok(())
    }

    /// End X of `stream`: just left of the leftmost last cooler in its merge group.
    ///
    /// Siblings that have not been walked yet get their columns here, using
    /// this stream's start as the reference. Their lanes come later, when the
    /// walk reaches them.
    fn end_x(
        &self,
        stream: &'a ColdStream,
        reference_x: f64,
        ctx: &mut ResolverContext<'a>,
    ) -> Result<f64, LayoutError> {
        let mut leftmost = f64::INFINITY;
        for member in self.merge_group(stream) {
            let coolers = member.coolers();
            let mut last_x = None;
            for cooler in coolers {
                last_x = Some(ctx.place_column(cooler, reference_x)?);
            }
            let Some(x) = last_x else {
                return Err(GeometryError::EmptyStream(member.name.clone()).into());
            };
            leftmost = leftmost.min(x);
        }
        Ok(leftmost - self.config.cooler.width / 2.0 - self.config.end_gap)
    }

    /// `stream` plus every stream transitively sharing a destination cooler with it.
    fn merge_group(&self, stream: &'a ColdStream) -> Vec<&'a ColdStream> {
        let mut group = vec![stream];
        let mut i = 0;
        while i < group.len() {
            for other in self.ir.streams_sharing_destination(group[i]) {
                if !group.iter().any(|g| g.name == other.name) {
                    group.push(other);
                }
            }
            i += 1;
        }
        group
    }
}
