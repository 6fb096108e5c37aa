#![no_main]

use std::io::Cursor;
use std::path::Path;

use libfuzzer_sys::fuzz_target;
use netcentra_core::graph::{BasicStats, RawGraph, SimpleGraph};

fuzz_target!(|data: &[u8]| {
    let Some((&flag, body)) = data.split_first() else {
        return;
    };
    let directed = flag & 1 == 1;

    let Ok(raw) = RawGraph::from_reader(Cursor::new(body), Path::new("fuzz"), directed) else {
        return;
    };
    let (g, _) = SimpleGraph::from_raw(raw);
    let (stats, _) = BasicStats::from_graph(&g);
    assert_eq!(stats.num_nodes, g.node_count());
    if stats.num_nodes >= 2 {
        assert!((0.0..=1.0).contains(&stats.density));
    }
});
