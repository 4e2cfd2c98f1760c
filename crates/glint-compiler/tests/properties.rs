//! Property tests over randomly built unary chains.

use glint_compiler::{EffectGraph, NodeSpec, compile};
use proptest::prelude::*;

const SOURCES: [&str; 4] = ["audio-level", "tempo-confidence", "gradient", "time"];
const STAGES: [&str; 4] = ["scale", "sin", "clamp", "modulo"];

fn chain(source: usize, stages: &[usize], reversed: bool) -> EffectGraph {
    let mut nodes = vec![NodeSpec::new("n0", SOURCES[source])];
    for (i, &stage) in stages.iter().enumerate() {
        nodes.push(NodeSpec::new(format!("n{}", i + 1), STAGES[stage]).input(format!("n{i}")));
    }
    nodes.push(NodeSpec::new("paint", "palette-interpolate").input(format!("n{}", stages.len())));
    if reversed {
        nodes.reverse();
    }
    nodes
        .into_iter()
        .fold(EffectGraph::default(), EffectGraph::node)
}

proptest! {
    #[test]
    fn chains_compile_deterministically(
        source in 0..SOURCES.len(),
        stages in prop::collection::vec(0..STAGES.len(), 0..8),
        reversed in any::<bool>(),
    ) {
        let effect = chain(source, &stages, reversed);
        let first = compile(&effect).unwrap();
        let second = compile(&effect).unwrap();
        prop_assert_eq!(&first.code, &second.code);
        prop_assert_eq!(first.stats.pixel_loops, 1);
        // Single-consumer pure chains inline completely.
        prop_assert_eq!(first.stats.inlined, stages.len() + 1);
        prop_assert_eq!(first.stats.frame_temporaries + first.stats.pixel_temporaries, 0);
        prop_assert!(first.stats.unused.is_empty());
    }

    #[test]
    fn out_of_range_bins_are_rejected(bin in prop_oneof![-50i64..0, 64i64..500]) {
        let effect = EffectGraph::default()
            .node(NodeSpec::new("b", "spectrum-bin").param("bin", bin as f64))
            .node(NodeSpec::new("paint", "palette-interpolate").input("b"));
        prop_assert!(compile(&effect).is_err());
    }
}
