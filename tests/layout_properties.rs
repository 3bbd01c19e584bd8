//! Property-based invariant tests for the network layout.
//!
//! Networks are generated as a tower-fed chain of streams, optionally with a
//! second tower-fed stream merging into the chain and a two-way branch at the
//! end. For every generated network:
//!
//! 1. Layout is deterministic.
//! 2. No two cold streams share a lane.
//! 3. Every cooler has one column, used on every lane it appears on.
//! 4. Every stream and every referenced cooler is covered.
//! 5. Streams sharing a destination cooler end at the same X.
//! 6. Downstream streams start left of their parent's end.

use coolnet::layout::{LayoutConfig, LayoutResult};
use coolnet::layout_network;
use coolnet::network::{CoolFlow, Cooler, HotFlow, NetworkDescription};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Shape {
    path_lens: Vec<usize>,
    merge: bool,
    branch: bool,
    hot_count: usize,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    (
        prop::collection::vec(1usize..=2, 1..=4),
        any::<bool>(),
        any::<bool>(),
        1usize..=3,
    )
        .prop_map(|(path_lens, merge, branch, hot_count)| Shape {
            path_lens,
            merge,
            branch,
            hot_count,
        })
}

fn build(shape: &Shape) -> NetworkDescription {
    let mut coolers: Vec<String> = Vec::new();
    let mut fresh = |coolers: &mut Vec<String>| {
        let name = format!("E{}", coolers.len() + 1);
        coolers.push(name.clone());
        name
    };

    let chain_len = shape.path_lens.len();
    let mut flows: Vec<(String, Vec<String>, Vec<String>, Vec<String>)> = Vec::new();
    let mut incoming: Option<String> = None;
    let mut first_junction: Option<String> = None;
    let mut branch_sources: Vec<String> = Vec::new();

    for (i, &len) in shape.path_lens.iter().enumerate() {
        let sources = match incoming.take() {
            Some(j) => vec![j],
            None => vec!["TOWER".to_string()],
        };
        let path: Vec<String> = (0..len).map(|_| fresh(&mut coolers)).collect();
        let last = i + 1 == chain_len;
        let destinations = if !last {
            let j = fresh(&mut coolers);
            if i == 0 {
                first_junction = Some(j.clone());
            }
            incoming = Some(j.clone());
            vec![j]
        } else if shape.branch {
            branch_sources = vec![fresh(&mut coolers), fresh(&mut coolers)];
            branch_sources.clone()
        } else {
            vec!["TOWER".to_string()]
        };
        flows.push((format!("W{}", i + 1), sources, path, destinations));
    }

    if shape.merge {
        if let Some(j) = &first_junction {
            let path = vec![fresh(&mut coolers)];
            flows.push(("V1".to_string(), vec!["TOWER".into()], path, vec![j.clone()]));
        }
    }
    for (k, src) in branch_sources.iter().enumerate() {
        flows.push((format!("B{}", k + 1), vec![src.clone()], vec![], vec!["TOWER".into()]));
    }

    let hot_flows = (0..shape.hot_count)
        .map(|h| {
            let names: Vec<&str> = coolers
                .iter()
                .enumerate()
                .filter(|(i, _)| i % shape.hot_count == h)
                .map(|(_, c)| c.as_str())
                .collect();
            HotFlow::new(&format!("H{}", h + 1), 120.0, 50.0, &names)
        })
        .collect();

    let cool_flows = flows
        .iter()
        .map(|(name, sources, path, destinations)| {
            let s: Vec<&str> = sources.iter().map(String::as_str).collect();
            let p: Vec<&str> = path.iter().map(String::as_str).collect();
            let d: Vec<&str> = destinations.iter().map(String::as_str).collect();
            CoolFlow::new(name, &s, &p, &d)
        })
        .collect();

    NetworkDescription {
        hot_flows,
        cool_flows,
        coolers: coolers.iter().map(|c| Cooler::new(c)).collect(),
    }
}

fn lay_out(desc: &NetworkDescription) -> LayoutResult {
    layout_network(desc, &LayoutConfig::default()).expect("generated network lays out")
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(shape in shape_strategy()) {
        let desc = build(&shape);
        prop_assert_eq!(lay_out(&desc), lay_out(&desc));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Lane uniqueness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lanes_are_unique(shape in shape_strategy()) {
        let layout = lay_out(&build(&shape));
        let lanes: Vec<f64> = layout.streams.values().map(|s| s.lane_y).collect();
        for (i, a) in lanes.iter().enumerate() {
            for b in &lanes[i + 1..] {
                prop_assert_ne!(a, b, "two streams share lane {}", a);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. One column per cooler
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn columns_are_unique_and_reused(shape in shape_strategy()) {
        let layout = lay_out(&build(&shape));

        let xs: Vec<f64> = layout.columns.values().copied().collect();
        for (i, a) in xs.iter().enumerate() {
            for b in &xs[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }

        for stream in layout.streams.values() {
            for node in &stream.nodes {
                prop_assert_eq!(node.x, layout.columns[&node.name]);
                prop_assert_eq!(node.y, stream.lane_y);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_stream_and_cooler_is_covered(shape in shape_strategy()) {
        let desc = build(&shape);
        let layout = lay_out(&desc);

        let names: BTreeSet<&str> = desc.cool_flows.iter().map(|f| f.name.as_str()).collect();
        let laid_out: BTreeSet<&str> = layout.streams.keys().map(String::as_str).collect();
        prop_assert_eq!(names, laid_out);
        prop_assert_eq!(layout.draw_order.len(), desc.cool_flows.len());

        let placed: HashSet<&str> = layout
            .streams
            .values()
            .flat_map(|s| s.nodes.iter().map(|n| n.name.as_str()))
            .collect();
        for flow in &desc.cool_flows {
            for cooler in flow
                .sources
                .iter()
                .chain(flow.destinations.iter())
                .filter_map(|e| e.cooler())
                .chain(flow.path.iter().map(String::as_str))
            {
                prop_assert!(placed.contains(cooler), "cooler {} never placed", cooler);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Merge convergence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merging_streams_converge(shape in shape_strategy()) {
        let desc = build(&shape);
        let layout = lay_out(&desc);

        for a in &desc.cool_flows {
            for b in &desc.cool_flows {
                if a.name == b.name {
                    continue;
                }
                let shared = a
                    .destinations
                    .iter()
                    .filter_map(|e| e.cooler())
                    .any(|d| b.destinations.iter().any(|e| e.cooler() == Some(d)));
                if shared {
                    prop_assert_eq!(
                        layout.streams[&a.name].end_point.x,
                        layout.streams[&b.name].end_point.x
                    );
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Flow moves left
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn downstream_starts_left_of_parent_end(shape in shape_strategy()) {
        let desc = build(&shape);
        let layout = lay_out(&desc);

        for flow in &desc.cool_flows {
            let parent = &layout.streams[&flow.name];
            for dest in flow.destinations.iter().filter_map(|e| e.cooler()) {
                let child = desc
                    .cool_flows
                    .iter()
                    .find(|f| f.sources.iter().any(|s| s.cooler() == Some(dest)))
                    .expect("generated destinations always feed a stream");
                prop_assert!(layout.streams[&child.name].start_point.x < parent.end_point.x);
            }
        }
    }
}
