//! Automatically-routed fill.
//!
//! Instead of stitching each section separately and jumping between them,
//! auto-fill sequences every grating segment into one continuous path. The
//! construction follows the classic result that a multigraph whose nodes all
//! have even degree admits a closed walk using every edge once: grating
//! segments become edges, the region boundary between adjacent endpoints
//! becomes edges, and every other boundary edge is doubled to even out the
//! degrees. A loop-insertion pass (Hierholzer's algorithm with a BFS loop
//! finder) then grows the seed walk until every segment is covered.
//!
//! The graph is small and domain-specific, so it is a plain adjacency map
//! with per-edge kind labels rather than a graph-library dependency.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::Error;
use crate::geometry::Shape;
use crate::params::{AutoFillParams, FillParams};
use crate::patch::Patch;
use crate::stitch::fill::{
    GratingSegment, intersect_region_with_grating, row_num, stitch_row,
};
use crate::{Color, Point};

/// Tolerance (px) for deciding which boundary a grating endpoint lies on.
const BOUNDARY_TOLERANCE: f64 = 1e-5;

/// Initial BFS queue cap; doubled on overflow.
const INITIAL_QUEUE_CAP: usize = 2000;

/// How many times the queue cap may double before routing gives up.
const MAX_CAP_DOUBLINGS: u32 = 8;

/// Graph nodes are grating endpoints, keyed by quantised coordinates so that
/// floating-point twins collapse onto one node.
type NodeKey = (i64, i64);

fn node_key(p: Point) -> NodeKey {
    ((p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64)
}

/// What a graph edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EdgeKind {
    /// A grating segment; stitched as a fill row.
    Segment,
    /// A stretch of region boundary between arc-adjacent nodes.
    Outline,
    /// A duplicated boundary stretch, present to even out node degrees.
    Extra,
}

/// An undirected edge in normalized form, used as a set key.
type EdgeId = (NodeKey, NodeKey, EdgeKind);

fn edge_id(a: NodeKey, b: NodeKey, kind: EdgeKind) -> EdgeId {
    if a <= b { (a, b, kind) } else { (b, a, kind) }
}

/// Undirected multigraph over grating endpoints.
#[derive(Debug, Clone, Default)]
pub(crate) struct FillGraph {
    adjacency: BTreeMap<NodeKey, Vec<(NodeKey, EdgeKind)>>,
    points: BTreeMap<NodeKey, Point>,
}

impl FillGraph {
    fn add_node(&mut self, p: Point) -> NodeKey {
        let key = node_key(p);
        self.points.entry(key).or_insert(p);
        self.adjacency.entry(key).or_default();
        key
    }

    fn add_edge(&mut self, a: NodeKey, b: NodeKey, kind: EdgeKind) {
        self.adjacency.entry(a).or_default().push((b, kind));
        self.adjacency.entry(b).or_default().push((a, kind));
    }

    fn remove_edge(&mut self, a: NodeKey, b: NodeKey, kind: EdgeKind) {
        if let Some(list) = self.adjacency.get_mut(&a) {
            if let Some(i) = list.iter().position(|&e| e == (b, kind)) {
                list.remove(i);
            }
        }
        if let Some(list) = self.adjacency.get_mut(&b) {
            if let Some(i) = list.iter().position(|&e| e == (a, kind)) {
                list.remove(i);
            }
        }
    }

    pub(crate) fn has_edge(&self, a: NodeKey, b: NodeKey, kind: EdgeKind) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|list| list.contains(&(b, kind)))
    }

    fn neighbors(&self, node: NodeKey) -> Vec<(NodeKey, EdgeKind)> {
        self.adjacency.get(&node).cloned().unwrap_or_default()
    }

    fn degree(&self, node: NodeKey) -> usize {
        self.adjacency.get(&node).map_or(0, Vec::len)
    }

    fn point(&self, node: NodeKey) -> Point {
        self.points[&node]
    }

    fn nodes(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.adjacency.keys().copied()
    }
}

/// Build the Eulerian multigraph for a region's grating.
///
/// Every node must land on a boundary within tolerance, and every node must
/// come out with even degree; anything else means the grating intersected the
/// region degenerately.
pub(crate) fn build_graph(
    region: &str,
    shape: &Shape,
    segments: &[GratingSegment],
    params: &FillParams,
) -> Result<FillGraph, Error> {
    let mut graph = FillGraph::default();

    for &(beg, end) in segments {
        let a = graph.add_node(beg);
        let b = graph.add_node(end);
        graph.add_edge(a, b, EdgeKind::Segment);
    }

    // group the nodes by the boundary they sit on, ordered by arc position
    let mut boundary_nodes: Vec<Vec<(f64, NodeKey)>> = vec![Vec::new(); shape.boundary_count()];
    for node in graph.nodes().collect::<Vec<_>>() {
        let p = graph.point(node);
        let index = shape.nearest_boundary(p, BOUNDARY_TOLERANCE).ok_or_else(|| {
            Error::InvalidGeometry {
                region: region.to_string(),
                reason: format!("grating endpoint ({:.3}, {:.3}) is not on any boundary", p.x, p.y),
            }
        })?;
        let projection = shape.project_onto_boundary(index, p);
        boundary_nodes[index].push((projection, node));
    }

    for nodes in &mut boundary_nodes {
        if nodes.len() < 2 {
            continue;
        }

        nodes.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        let mut ordered: Vec<NodeKey> = nodes.iter().map(|&(_, node)| node).collect();

        // If the first two nodes share a grating row we cannot tell which
        // row the wrap-around edge belongs to, so rotate until they differ.
        // Capped at the node count; all-one-row inputs fall back to set 0.
        let mut edge_set = 0;
        for _ in 0..ordered.len() {
            let row0 = row_num(graph.point(ordered[0]), params.angle, params.row_spacing);
            let row1 = row_num(graph.point(ordered[1]), params.angle, params.row_spacing);
            if row0 != row1 {
                edge_set = (row0.min(row1)).rem_euclid(2) as usize;
                break;
            }
            ordered.rotate_left(1);
        }

        // one outline edge between each pair of arc-adjacent nodes, wrapping
        // around, plus a duplicate on every other edge
        let n = ordered.len();
        for i in 0..n {
            let node1 = ordered[i];
            let node2 = ordered[(i + 1) % n];
            graph.add_edge(node1, node2, EdgeKind::Outline);
            if i % 2 == edge_set {
                graph.add_edge(node1, node2, EdgeKind::Extra);
            }
        }
    }

    for node in graph.nodes().collect::<Vec<_>>() {
        if graph.degree(node) % 2 != 0 {
            return Err(Error::NonEulerianGraph {
                region: region.to_string(),
            });
        }
    }

    Ok(graph)
}

/// One directed traversal in a loop, remembering which edge kind it used.
type LoopEdge = (NodeKey, NodeKey, EdgeKind);

/// Outcome of one bounded BFS from a candidate start node.
enum LoopSearch {
    /// A closed walk back to the start, with the segment count it covers.
    Found(Vec<LoopEdge>, usize),
    /// The queue outgrew the cap; worth retrying with a larger cap.
    QueueOverflow,
    /// No loop can be built from this node; its edges are used up.
    NoLoop,
}

#[derive(Clone)]
struct SearchState {
    path: Vec<NodeKey>,
    kinds: Vec<EdgeKind>,
    visited: BTreeSet<EdgeId>,
    segments: usize,
}

/// Breadth-first search for a closed walk from `start` back to itself that
/// does not reuse edges. Loops of three or fewer nodes (down and back along a
/// doubled edge) are ignored.
fn bfs_for_loop(graph: &FillGraph, start: NodeKey, max_queue: usize) -> LoopSearch {
    let mut to_search: VecDeque<SearchState> = VecDeque::new();
    to_search.push_front(SearchState {
        path: vec![start],
        kinds: Vec::new(),
        visited: BTreeSet::new(),
        segments: 0,
    });

    while !to_search.is_empty() {
        if to_search.len() > max_queue {
            return LoopSearch::QueueOverflow;
        }

        let state = to_search.pop_back().expect("queue is non-empty");
        let ending = *state.path.last().expect("path is never empty");

        let mut neighbors = graph.neighbors(ending);
        // try grating segments first: this biases the walk toward the
        // lawn-mower pattern we actually want to stitch
        neighbors.sort_by_key(|&(_, kind)| kind != EdgeKind::Segment);

        for (next, kind) in neighbors {
            let edge = edge_id(ending, next, kind);
            if state.visited.contains(&edge) {
                continue;
            }

            let segments = state.segments + usize::from(kind == EdgeKind::Segment);

            if next == start && state.path.len() + 1 > 3 {
                let mut edges: Vec<LoopEdge> = Vec::with_capacity(state.path.len());
                for (i, pair) in state.path.windows(2).enumerate() {
                    edges.push((pair[0], pair[1], state.kinds[i]));
                }
                edges.push((ending, next, kind));
                return LoopSearch::Found(edges, segments);
            }

            let mut new_state = state.clone();
            new_state.path.push(next);
            new_state.kinds.push(kind);
            new_state.visited.insert(edge);
            new_state.segments = segments;
            to_search.push_front(new_state);
        }
    }

    LoopSearch::NoLoop
}

/// Find a loop connected to the already-stitched path.
///
/// Candidate start nodes are tried most-recently-visited first. A start whose
/// BFS overflows the queue is set aside and retried after all other
/// candidates, with the cap doubled; a bounded number of doublings later the
/// search reports failure instead of spinning.
fn find_loop(
    graph: &FillGraph,
    nodes_visited: &mut VecDeque<NodeKey>,
) -> Option<(Vec<LoopEdge>, usize)> {
    let mut max_queue = INITIAL_QUEUE_CAP;

    for _ in 0..=MAX_CAP_DOUBLINGS {
        let mut retry: Vec<NodeKey> = Vec::new();
        let mut found: Option<(Vec<LoopEdge>, usize)> = None;

        while let Some(start) = nodes_visited.pop_back() {
            match bfs_for_loop(graph, start, max_queue) {
                LoopSearch::Found(edges, segments) => {
                    found = Some((edges, segments));
                    break;
                }
                LoopSearch::QueueOverflow => {
                    log::debug!("loop search overflowed queue cap {max_queue}, deferring node");
                    retry.push(start);
                }
                // this node's edges are used up; discard it
                LoopSearch::NoLoop => {}
            }
        }

        for node in retry {
            nodes_visited.push_front(node);
        }

        if found.is_some() {
            return found;
        }
        if nodes_visited.is_empty() {
            return None;
        }

        max_queue *= 2;
    }

    None
}

/// Splice a loop into the path at the node where it starts.
fn insert_loop(path: &mut Vec<(NodeKey, NodeKey)>, loop_edges: &[LoopEdge]) {
    let loop_start = loop_edges[0].0;
    let position = path
        .iter()
        .position(|&(start, _)| start == loop_start)
        .unwrap_or(path.len());

    let pairs = loop_edges.iter().map(|&(a, b, _)| (a, b));
    path.splice(position..position, pairs);
}

/// Grow a closed walk covering every grating segment.
///
/// Returns the walk as directed node pairs plus a flag reporting whether
/// every segment was covered; when routing stalls, the partial walk is
/// returned and the caller stitches what exists.
pub(crate) fn find_stitch_path(
    graph: &FillGraph,
    segments: &[GratingSegment],
) -> (Vec<(NodeKey, NodeKey)>, bool) {
    let mut work = graph.clone();
    let num_segments = segments.len();

    let seed_a = node_key(segments[0].0);
    let seed_b = node_key(segments[0].1);

    // seed: down the first segment and back along the outline; the segment
    // edge is consumed exactly once
    let mut path: Vec<(NodeKey, NodeKey)> = vec![(seed_a, seed_b), (seed_b, seed_a)];
    work.remove_edge(seed_a, seed_b, EdgeKind::Segment);

    let mut segments_visited = 1;
    let mut nodes_visited: VecDeque<NodeKey> = VecDeque::from([seed_a, seed_b]);
    let mut complete = true;

    while segments_visited < num_segments {
        let Some((loop_edges, covered)) = find_loop(&work, &mut nodes_visited) else {
            log::warn!(
                "auto-fill routing stalled after {segments_visited} of {num_segments} segments; \
                 stitching the partial path"
            );
            complete = false;
            break;
        };

        segments_visited += covered;
        for &(a, b, kind) in &loop_edges {
            nodes_visited.push_back(a);
            work.remove_edge(a, b, kind);
        }

        insert_loop(&mut path, &loop_edges);
    }

    // returning to the seed over outline edges sews nothing; snip them off
    while path.len() > 1 {
        let &(a, b) = path.last().expect("path is non-empty");
        if graph.has_edge(a, b, EdgeKind::Outline) {
            path.pop();
        } else {
            break;
        }
    }

    (path, complete)
}

/// Collapse maximal runs of non-segment traversals into single spans.
///
/// The boolean marks segment spans; boundary spans only need their start and
/// end, since the stitching walks the boundary itself.
fn collapse_sequential_outline_edges(
    graph: &FillGraph,
    path: &[(NodeKey, NodeKey)],
) -> Vec<(NodeKey, NodeKey, bool)> {
    let mut collapsed: Vec<(NodeKey, NodeKey, bool)> = Vec::new();
    let mut start_of_run: Option<NodeKey> = None;

    for &(a, b) in path {
        if graph.has_edge(a, b, EdgeKind::Segment) {
            if let Some(start) = start_of_run.take() {
                collapsed.push((start, a, false));
            }
            collapsed.push((a, b, true));
        } else if start_of_run.is_none() {
            start_of_run = Some(a);
        }
    }

    if let (Some(start), Some(&(_, last_end))) = (start_of_run, path.last()) {
        collapsed.push((start, last_end, false));
    }

    collapsed
}

/// Emit running stitches along the boundary from one point to another.
///
/// Both points are projected onto the boundary that `start` lies on, and the
/// walk steps `running_stitch_length` at a time in the signed direction of
/// the projection difference.
pub(crate) fn connect_points(
    shape: &Shape,
    patch: &mut Patch,
    start: Point,
    end: Point,
    running_stitch_length: f64,
    pixels_per_mm: f64,
) {
    let boundary = shape.nearest_boundary(start, BOUNDARY_TOLERANCE).unwrap_or_else(|| {
        log::debug!("connect_points start is off-boundary; walking the outer boundary");
        0
    });

    let mut pos = shape.project_onto_boundary(boundary, start);
    let end_pos = shape.project_onto_boundary(boundary, end);
    let direction = if end_pos >= pos { 1.0 } else { -1.0 };

    while (end_pos - pos) * direction > 0.0 {
        patch.add_stitch(shape.boundary_point_at(boundary, pos));
        pos += running_stitch_length * direction;
    }

    let end_point = shape.boundary_point_at(boundary, end_pos);
    let far_enough = patch
        .last_stitch()
        .is_none_or(|last| (end_point - last).length() > 0.1 * pixels_per_mm);
    if far_enough {
        patch.add_stitch(end_point);
    }
}

/// Turn the routed walk into stitches.
fn path_to_patch(
    shape: &Shape,
    graph: &FillGraph,
    path: &[(NodeKey, NodeKey)],
    color: Color,
    params: &FillParams,
    running_stitch_length: f64,
) -> Patch {
    let mut patch = Patch::new(color);

    for (a, b, is_segment) in collapse_sequential_outline_edges(graph, path) {
        let beg = graph.point(a);
        let end = graph.point(b);
        if is_segment {
            stitch_row(&mut patch, beg, end, params);
        } else {
            connect_points(
                shape,
                &mut patch,
                beg,
                end,
                running_stitch_length,
                params.pixels_per_mm,
            );
        }
    }

    patch
}

/// One full auto-fill pass at the given grating parameters.
fn do_auto_fill(
    region: &str,
    shape: &Shape,
    color: Color,
    params: &FillParams,
    running_stitch_length: f64,
    starting_point: Option<Point>,
) -> Result<Vec<Patch>, Error> {
    let rows = intersect_region_with_grating(shape, params);
    let segments: Vec<GratingSegment> = rows.into_iter().flatten().collect();

    if segments.is_empty() {
        log::warn!("region '{region}': grating produced no segments, nothing to fill");
        return Ok(Vec::new());
    }

    let graph = build_graph(region, shape, &segments, params)?;
    let (path, _complete) = find_stitch_path(&graph, &segments);

    let mut patches: Vec<Patch> = Vec::new();

    if let Some(start) = starting_point {
        let mut bridge = Patch::new(color);
        connect_points(
            shape,
            &mut bridge,
            start,
            graph.point(path[0].0),
            running_stitch_length,
            params.pixels_per_mm,
        );
        patches.push(bridge);
    }

    patches.push(path_to_patch(
        shape,
        &graph,
        &path,
        color,
        params,
        running_stitch_length,
    ));

    Ok(patches)
}

/// Auto-fill a region, optionally with an underlay pass first.
///
/// `previous_stitch` is the last stitch of the previous region's patches;
/// when present, the fill starts from its projection onto this region's
/// outer boundary and a running-stitch bridge patch leads in.
pub fn auto_fill_region(
    region: &str,
    shape: &Shape,
    color: Color,
    params: &AutoFillParams,
    previous_stitch: Option<Point>,
) -> Result<Vec<Patch>, Error> {
    let mut starting_point = previous_stitch.map(|p| {
        let projection = shape.project_onto_boundary(0, p);
        shape.boundary_point_at(0, projection)
    });

    let mut patches: Vec<Patch> = Vec::new();

    if let Some(underlay) = &params.underlay {
        patches.extend(do_auto_fill(
            region,
            shape,
            color,
            underlay,
            params.running_stitch_length,
            starting_point,
        )?);
        starting_point = patches.last().and_then(Patch::last_stitch);
    }

    patches.extend(do_auto_fill(
        region,
        shape,
        color,
        &params.fill,
        params.running_stitch_length,
        starting_point,
    )?);

    Ok(patches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> Color {
        Color::new(20, 40, 60, 255)
    }

    fn params(row_spacing: f64, max_stitch_length: f64) -> FillParams {
        FillParams {
            angle: 0.0,
            row_spacing,
            max_stitch_length,
            staggers: 4,
            flip: false,
            pixels_per_mm: 1.0,
        }
    }

    fn circle(cx: f64, cy: f64, r: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                Point::new(cx + r * theta.cos(), cy + r * theta.sin())
            })
            .collect()
    }

    fn annulus() -> Shape {
        Shape::from_rings(&[circle(0.0, 0.0, 10.0, 48), circle(0.0, 0.0, 3.0, 24)]).unwrap()
    }

    fn square(size: f64) -> Shape {
        Shape::from_rings(&[vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]])
        .unwrap()
    }

    fn grating_segments(shape: &Shape, p: &FillParams) -> Vec<GratingSegment> {
        intersect_region_with_grating(shape, p)
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_graph_is_eulerian_for_square() {
        let shape = square(10.0);
        let p = params(1.0, 2.0);
        let segments = grating_segments(&shape, &p);
        let graph = build_graph("square", &shape, &segments, &p).unwrap();

        for node in graph.nodes().collect::<Vec<_>>() {
            assert_eq!(graph.degree(node) % 2, 0);
        }
    }

    #[test]
    fn test_graph_is_eulerian_for_annulus() {
        let shape = annulus();
        let p = params(1.0, 2.0);
        let segments = grating_segments(&shape, &p);
        assert!(!segments.is_empty());

        let graph = build_graph("annulus", &shape, &segments, &p).unwrap();
        for node in graph.nodes().collect::<Vec<_>>() {
            assert_eq!(graph.degree(node) % 2, 0);
        }
    }

    #[test]
    fn test_duplicated_segment_is_rejected() {
        let shape = square(10.0);
        let p = params(1.0, 2.0);
        let seg: GratingSegment = (Point::new(0.0, 2.0), Point::new(10.0, 2.0));

        let result = build_graph("square", &shape, &[seg, seg], &p);
        assert!(matches!(result, Err(Error::NonEulerianGraph { .. })));
    }

    #[test]
    fn test_off_boundary_endpoint_is_invalid_geometry() {
        let shape = square(10.0);
        let p = params(1.0, 2.0);
        let seg: GratingSegment = (Point::new(1.0, 2.0), Point::new(9.0, 2.0));

        let result = build_graph("square", &shape, &[seg], &p);
        assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
    }

    #[test]
    fn test_path_covers_every_segment_once() {
        let shape = annulus();
        let p = params(1.0, 2.0);
        let segments = grating_segments(&shape, &p);
        let graph = build_graph("annulus", &shape, &segments, &p).unwrap();

        let (path, complete) = find_stitch_path(&graph, &segments);
        assert!(complete, "routing should cover the annulus fully");

        for &(beg, end) in &segments {
            let a = node_key(beg);
            let b = node_key(end);
            let traversals = path
                .iter()
                .filter(|&&(s, e)| (s, e) == (a, b) || (s, e) == (b, a))
                .count();
            assert!(traversals >= 1, "segment {a:?}->{b:?} never traversed");
            assert!(traversals <= 2, "segment {a:?}->{b:?} overused");
        }
    }

    #[test]
    fn test_auto_fill_single_patch_inside_region() {
        let shape = annulus();
        let p = AutoFillParams {
            fill: params(1.0, 2.0),
            running_stitch_length: 1.5,
            underlay: None,
        };

        let patches = auto_fill_region("annulus", &shape, color(), &p, None).unwrap();
        assert_eq!(patches.len(), 1, "one continuous path, no jump patches");
        assert!(patches[0].len() > 50);

        for stitch in &patches[0].stitches {
            let inside = shape.contains(*stitch) || shape.boundary_distance(*stitch) < 1e-6;
            assert!(inside, "stitch ({}, {}) left the region", stitch.x, stitch.y);
        }
    }

    #[test]
    fn test_underlay_runs_before_primary() {
        let shape = square(10.0);
        let fill = params(0.5, 2.0);
        let p = AutoFillParams {
            fill,
            running_stitch_length: 1.5,
            underlay: Some(FillParams {
                angle: std::f64::consts::FRAC_PI_2,
                row_spacing: 1.5,
                ..fill
            }),
        };

        let patches = auto_fill_region("square", &shape, color(), &p, None).unwrap();
        // underlay pass, bridge into the primary pass, primary pass
        assert!(patches.len() >= 2);

        let underlay_count: usize = patches[0].len();
        let total: usize = patches.iter().map(Patch::len).sum();
        assert!(underlay_count < total / 2, "underlay is sparser than the fill");
    }

    #[test]
    fn test_previous_stitch_seeds_bridge_patch() {
        let shape = square(10.0);
        let p = AutoFillParams {
            fill: params(1.0, 2.0),
            running_stitch_length: 1.5,
            underlay: None,
        };

        let previous = Point::new(25.0, 5.0);
        let patches = auto_fill_region("square", &shape, color(), &p, Some(previous)).unwrap();

        assert_eq!(patches.len(), 2, "bridge patch plus fill patch");
        let bridge_start = patches[0].stitches[0];
        // the bridge starts at the projection of the previous stitch onto
        // the outer boundary, which for (25, 5) is (10, 5)
        assert!(bridge_start.distance_to(Point::new(10.0, 5.0)) < 1e-6);
    }

    #[test]
    fn test_connect_points_steps_along_boundary() {
        let shape = square(10.0);
        let mut patch = Patch::new(color());

        connect_points(
            &shape,
            &mut patch,
            Point::new(10.0, 2.0),
            Point::new(10.0, 8.0),
            1.5,
            1.0,
        );

        assert!(patch.len() >= 4);
        for stitch in &patch.stitches {
            assert!((stitch.x - 10.0).abs() < 1e-6, "walk stays on the right edge");
        }
        assert!(patch.stitches[0].distance_to(Point::new(10.0, 2.0)) < 1e-6);
        assert!(patch.last_stitch().unwrap().distance_to(Point::new(10.0, 8.0)) < 1e-6);
    }

    #[test]
    fn test_trailing_outline_edges_trimmed() {
        let shape = square(10.0);
        let p = params(1.0, 2.0);
        let segments = grating_segments(&shape, &p);
        let graph = build_graph("square", &shape, &segments, &p).unwrap();

        let (path, _) = find_stitch_path(&graph, &segments);
        let &(a, b) = path.last().unwrap();
        assert!(
            !graph.has_edge(a, b, EdgeKind::Outline),
            "path must not end with outline-only travel"
        );
    }
}
