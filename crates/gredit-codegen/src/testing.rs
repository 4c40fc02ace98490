//! Random graph generation for property tests.
//!
//! A [`Plan`] describes an acyclic pipeline of `MIX` function nodes
//! (`f0`, `f1`, ...). Each input port is left open, fed by a head data node,
//! fed directly by an earlier function, or fed by an earlier function through
//! an intermediate data node. Functions are inserted in a shuffled order so the
//! scheduler has to rebuild the dependency order itself.

use proptest::prelude::*;

use gredit_core::{Graph, GraphBuilder, Kernel, KernelRegistry, PortRef};

/// How one function input port is fed.
#[derive(Debug, Clone, Copy)]
pub enum Feed {
    Open,
    Head,
    Direct(usize),
    Through(usize),
}

#[derive(Debug, Clone)]
pub struct Plan {
    /// Feeds of the two input ports of `f{i}`.
    pub feeds: Vec<(Feed, Feed)>,
    /// Whether `f{i}` also writes a tail result `r{i}`.
    pub results: Vec<bool>,
    /// Insertion order of the function nodes.
    pub order: Vec<usize>,
}

fn feed(index: usize) -> BoxedStrategy<Feed> {
    if index == 0 {
        prop_oneof![Just(Feed::Open), Just(Feed::Head)].boxed()
    } else {
        prop_oneof![
            Just(Feed::Open),
            Just(Feed::Head),
            (0..index).prop_map(Feed::Direct),
            (0..index).prop_map(Feed::Through),
        ]
        .boxed()
    }
}

pub fn plan() -> impl Strategy<Value = Plan> {
    (1usize..10).prop_flat_map(|n| {
        let feeds: Vec<_> = (0..n).map(|i| (feed(i), feed(i))).collect();
        (
            feeds,
            prop::collection::vec(any::<bool>(), n),
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
        )
            .prop_map(|(feeds, results, order)| Plan {
                feeds,
                results,
                order,
            })
    })
}

pub fn registry() -> KernelRegistry {
    let mut builder = KernelRegistry::builder();
    builder
        .register_builtins()
        .register_kernel(Kernel::from_signature("MIX", "II", "I").unwrap())
        .unwrap()
        .register_kernel(Kernel::from_signature("COPY", "I", "I").unwrap())
        .unwrap();
    builder.build()
}

/// Adds links under generated ids `l0`, `l1`, ...
struct Linker<'r> {
    builder: GraphBuilder<'r>,
    next: usize,
}

impl Linker<'_> {
    fn link(&mut self, from: impl Into<PortRef>, to: impl Into<PortRef>) {
        let id = format!("l{}", self.next);
        self.next += 1;
        self.builder.connect(&id, from, to).unwrap();
    }
}

impl Plan {
    pub fn build(&self, registry: &KernelRegistry) -> Graph {
        self.build_with_ring(registry, 0)
    }

    /// Build the plan plus a ring of `ring` `COPY` nodes (`c0`, `c1`, ...),
    /// each fed by the previous one and `c0` fed by the last. A ring of
    /// length 0 adds nothing.
    pub fn build_with_ring(&self, registry: &KernelRegistry, ring: usize) -> Graph {
        let mut builder = GraphBuilder::new(registry);
        for &i in &self.order {
            builder.add_node(&format!("f{i}"), "MIX").unwrap();
        }
        for c in 0..ring {
            builder.add_node(&format!("c{c}"), "COPY").unwrap();
        }

        let mut linker = Linker { builder, next: 0 };
        for (i, &(a, b)) in self.feeds.iter().enumerate() {
            let target = format!("f{i}");
            for (port, feed) in [(0, a), (1, b)] {
                match feed {
                    Feed::Open => {}
                    Feed::Head => {
                        let head = format!("h{i}_{port}");
                        linker.builder.add_node(&head, "IMAGE").unwrap();
                        linker.link((&head, 0), (&target, port));
                    }
                    Feed::Direct(src) => {
                        linker.link((&format!("f{src}"), 0), (&target, port));
                    }
                    Feed::Through(src) => {
                        let data = format!("d{i}_{port}");
                        linker.builder.add_node(&data, "IMAGE").unwrap();
                        linker.link((&format!("f{src}"), 0), (&data, 0));
                        linker.link((&data, 0), (&target, port));
                    }
                }
            }
            if self.results[i] {
                let result = format!("r{i}");
                linker.builder.add_node(&result, "IMAGE").unwrap();
                linker.link((&target, 0), (&result, 0));
            }
        }
        for c in 0..ring {
            let from = format!("c{}", (c + ring - 1) % ring);
            linker.link((&from, 0), (&format!("c{c}"), 0));
        }

        linker.builder.build().unwrap()
    }
}
