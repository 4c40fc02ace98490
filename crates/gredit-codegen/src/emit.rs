//! Graph-to-C emission.
//!
//! The generated block creates the context and the graph, then declares
//! entities in a fixed order so every handle exists before it is used:
//!
//! | Section             | Contents                                   |
//! |---------------------|--------------------------------------------|
//! | `Inputs`            | head data nodes (nothing produces them)    |
//! | `Intermediate data` | data nodes both produced and consumed      |
//! | `Links`             | every link, in graph order                 |
//! | `Results`           | tail data nodes (nothing consumes them)    |
//! | `Functions`         | function nodes, in scheduled order         |
//!
//! A section's banner and the blank line before it appear only when the
//! section has entries.
//!
//! Every node and link becomes a C variable named after its id, so ids that
//! would redeclare the context or graph handle, or that are C reserved words,
//! are rejected before anything is written.

use std::io::Write;
use std::path::Path;

use gredit_core::graph::link::Link;
use gredit_core::graph::node::{DataRole, Node, NodeKind};
use gredit_core::graph::Graph;
use gredit_core::kernel::Tag;

use crate::error::CodegenError;
use crate::schedule::function_order;
use crate::writer::{write_artifact, CodeWriter};

/// Names of the handles every generated statement refers to.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub context: &'a str,
    pub graph: &'a str,
}

/// C keywords through C11.
const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic", "_Bool",
    "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert", "_Thread_local",
];

fn reserved(name: &str) -> Option<&'static str> {
    if name == "NULL" {
        Some("it is the NULL macro")
    } else if C_KEYWORDS.contains(&name) {
        Some("it is a C keyword")
    } else {
        None
    }
}

impl Scope<'_> {
    /// Fail when declaring `id` inside this scope would not compile.
    fn check(&self, id: &str) -> Result<(), CodegenError> {
        let reason = if id == self.context {
            "it names the context handle"
        } else if id == self.graph {
            "it names the graph handle"
        } else if let Some(reason) = reserved(id) {
            reason
        } else {
            return Ok(());
        };
        Err(CodegenError::ReservedName {
            id: id.to_string(),
            reason,
        })
    }

    /// Check the handles themselves, then every node and link id of `graph`.
    fn check_graph(&self, graph: &Graph) -> Result<(), CodegenError> {
        for handle in [self.context, self.graph] {
            if let Some(reason) = reserved(handle) {
                return Err(CodegenError::ReservedName {
                    id: handle.to_string(),
                    reason,
                });
            }
        }
        if self.graph == self.context {
            return Err(CodegenError::ReservedName {
                id: self.graph.to_string(),
                reason: "the graph handle would redeclare the context handle",
            });
        }
        graph
            .nodes()
            .map(|n| n.id.as_str())
            .chain(graph.links().map(|l| l.id.as_str()))
            .try_for_each(|id| self.check(id))
    }
}

/// An entity that can write its own construction statement.
pub trait RenderConstructor {
    fn render_constructor<W: Write>(
        &self,
        out: &mut CodeWriter<W>,
        scope: Scope<'_>,
    ) -> std::io::Result<()>;
}

fn data_constructor(tag: Tag) -> &'static str {
    match tag {
        Tag::Image => "vxCreateImage",
        Tag::Buffer => "vxCreateBuffer",
        Tag::Scalar => "vxCreateScalar",
    }
}

impl RenderConstructor for Node {
    fn render_constructor<W: Write>(
        &self,
        out: &mut CodeWriter<W>,
        scope: Scope<'_>,
    ) -> std::io::Result<()> {
        match &self.kind {
            NodeKind::Data { tag } => out.line(format_args!(
                "{} {} = {}({}, \"{}\");",
                tag.native_type(),
                self.id,
                data_constructor(*tag),
                scope.context,
                self.id
            )),
            NodeKind::Function { kernel } => {
                let mut args = vec![scope.graph.to_string(), format!("\"{}\"", self.id)];
                args.extend(
                    self.ports()
                        .map(|port| port.first_link().cloned().unwrap_or_else(|| "NULL".into())),
                );
                out.line(format_args!(
                    "vx_node {} = vx{}Node({});",
                    self.id,
                    kernel.display_name(),
                    args.join(", ")
                ))
            }
        }
    }
}

impl RenderConstructor for Link {
    fn render_constructor<W: Write>(
        &self,
        out: &mut CodeWriter<W>,
        scope: Scope<'_>,
    ) -> std::io::Result<()> {
        out.line(format_args!(
            "vx_link {} = vxCreateLink({}, \"{}\", {}, \"{}\", {});",
            self.id,
            scope.graph,
            self.source.node,
            self.source.port,
            self.target.node,
            self.target.port
        ))
    }
}

/// Derive the generated graph's identifier from the output path: the file
/// stem with every non-identifier character replaced by `_`.
pub fn graph_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() {
        name.push_str("graph");
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Renders one graph as a C statement block.
#[derive(Debug, Clone)]
pub struct GraphCodeWriter<'g> {
    graph: &'g Graph,
    context: String,
}

impl<'g> GraphCodeWriter<'g> {
    pub fn new(graph: &'g Graph, context: impl Into<String>) -> Self {
        Self {
            graph,
            context: context.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    fn scope<'a>(&'a self, graph_name: &'a str) -> Scope<'a> {
        Scope {
            context: &self.context,
            graph: graph_name,
        }
    }

    /// Check names and schedule the function nodes. Runs before any output,
    /// so a graph that cannot be emitted writes nothing.
    fn prepare(&self, graph_name: &str) -> Result<Vec<&'g Node>, CodegenError> {
        self.scope(graph_name).check_graph(self.graph)?;
        function_order(self.graph)
    }

    /// Render the block to `out`. A cyclic graph or a clashing id writes
    /// nothing.
    pub fn render<W: Write>(&self, out: &mut W, graph_name: &str) -> Result<(), CodegenError> {
        let functions = self.prepare(graph_name)?;
        self.emit(out, graph_name, &functions)
    }

    pub fn render_to_string(&self, graph_name: &str) -> Result<String, CodegenError> {
        let mut buf = Vec::new();
        self.render(&mut buf, graph_name)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Render to a file, naming the graph after the file. Nothing is left on
    /// disk when checking, scheduling or writing fails.
    pub fn write_file(&self, path: &Path) -> Result<(), CodegenError> {
        let graph_name = graph_name_for(path);
        let functions = self.prepare(&graph_name)?;
        write_artifact(path, |out| self.emit(out, &graph_name, &functions))?;
        tracing::info!(
            path = %path.display(),
            graph = %graph_name,
            nodes = self.graph.node_count(),
            links = self.graph.link_count(),
            "wrote graph source"
        );
        Ok(())
    }

    fn emit<W: Write>(
        &self,
        out: &mut W,
        graph_name: &str,
        functions: &[&Node],
    ) -> Result<(), CodegenError> {
        let scope = self.scope(graph_name);

        let mut heads = Vec::new();
        let mut intermediates = Vec::new();
        let mut tails = Vec::new();
        for node in self.graph.nodes() {
            match node.role() {
                Some(DataRole::Head) => heads.push(node),
                Some(DataRole::Intermediate) => intermediates.push(node),
                Some(DataRole::Tail) => tails.push(node),
                None => {}
            }
        }
        let links: Vec<&Link> = self.graph.links().collect();

        let mut w = CodeWriter::new(out);
        w.line("{")?;
        {
            let mut body = w.indent();
            body.comment("The Context")?;
            body.line(format_args!(
                "vx_context {} = vxCreateContext();",
                scope.context
            ))?;
            body.blank()?;
            body.comment("The Graph")?;
            body.line(format_args!(
                "vx_graph {} = vxCreateGraph({});",
                scope.graph, scope.context
            ))?;

            section(&mut *body, "Inputs", &heads, scope)?;
            section(&mut *body, "Intermediate data", &intermediates, scope)?;
            section(&mut *body, "Links", &links, scope)?;
            section(&mut *body, "Results", &tails, scope)?;
            section(&mut *body, "Functions", functions, scope)?;
        }
        w.line("}")?;
        Ok(())
    }
}

fn section<W: Write, R: RenderConstructor>(
    out: &mut CodeWriter<W>,
    banner: &str,
    entries: &[&R],
    scope: Scope<'_>,
) -> std::io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    out.blank()?;
    out.comment(banner)?;
    for entry in entries {
        entry.render_constructor(out, scope)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gredit_core::{GraphBuilder, Kernel, KernelRegistry};

    fn registry() -> KernelRegistry {
        let mut builder = KernelRegistry::builder();
        builder
            .register_builtins()
            .register_kernel(Kernel::from_signature("FOO", "I", "I").unwrap())
            .unwrap()
            .register_kernel(Kernel::from_signature("BAR", "IS", "B").unwrap())
            .unwrap();
        builder.build()
    }

    fn pipeline(registry: &KernelRegistry) -> Graph {
        let mut b = GraphBuilder::new(registry);
        b.add_node("in1", "IMAGE").unwrap();
        b.add_node("n1", "FOO").unwrap();
        b.add_node("out1", "IMAGE").unwrap();
        b.connect("l1", ("in1", 0), ("n1", 0)).unwrap();
        b.connect("l2", ("n1", 0), ("out1", 0)).unwrap();
        b.build().unwrap()
    }

    const PIPELINE_C: &str = "\
{
  // The Context
  vx_context context = vxCreateContext();

  // The Graph
  vx_graph pipeline = vxCreateGraph(context);

  // Inputs
  vx_image in1 = vxCreateImage(context, \"in1\");

  // Links
  vx_link l1 = vxCreateLink(pipeline, \"in1\", 0, \"n1\", 0);
  vx_link l2 = vxCreateLink(pipeline, \"n1\", 0, \"out1\", 0);

  // Results
  vx_image out1 = vxCreateImage(context, \"out1\");

  // Functions
  vx_node n1 = vxFOONode(pipeline, \"n1\", l1, l2);
}
";

    #[test]
    fn renders_single_function_pipeline() {
        let registry = registry();
        let graph = pipeline(&registry);
        let text = GraphCodeWriter::new(&graph, "context")
            .render_to_string("pipeline")
            .unwrap();
        assert_eq!(text, PIPELINE_C);
    }

    #[test]
    fn rendering_is_repeatable() {
        let registry = registry();
        let graph = pipeline(&registry);
        let writer = GraphCodeWriter::new(&graph, "ctx");
        let first = writer.render_to_string("g").unwrap();
        let second = writer.render_to_string("g").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn block_is_balanced() {
        let registry = registry();
        let graph = pipeline(&registry);
        let text = GraphCodeWriter::new(&graph, "context")
            .render_to_string("g")
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"{"));
        assert_eq!(lines.last(), Some(&"}"));
        for line in &lines[1..lines.len() - 1] {
            assert!(line.is_empty() || line.starts_with("  "), "{line:?}");
            assert!(!line.starts_with("   "), "{line:?}");
        }
    }

    #[test]
    fn empty_sections_are_omitted() {
        let graph = Graph::new();
        let text = GraphCodeWriter::new(&graph, "context")
            .render_to_string("g")
            .unwrap();
        assert_eq!(
            text,
            "{\n  // The Context\n  vx_context context = vxCreateContext();\n\n  \
             // The Graph\n  vx_graph g = vxCreateGraph(context);\n}\n"
        );
    }

    #[test]
    fn intermediates_and_unconnected_ports() {
        let registry = registry();
        let mut b = GraphBuilder::new(&registry);
        b.add_node("src", "IMAGE").unwrap();
        b.add_node("n1", "FOO").unwrap();
        b.add_node("mid", "IMAGE").unwrap();
        b.add_node("n2", "BAR").unwrap();
        b.connect("l1", ("src", 0), ("n1", 0)).unwrap();
        b.connect("l2", ("n1", 0), ("mid", 0)).unwrap();
        b.connect("l3", ("mid", 0), ("n2", 0)).unwrap();
        let graph = b.build().unwrap();

        let text = GraphCodeWriter::new(&graph, "context")
            .render_to_string("g")
            .unwrap();
        assert!(text.contains("  // Intermediate data\n  vx_image mid = vxCreateImage(context, \"mid\");\n"));
        assert!(!text.contains("// Results"));
        assert!(text.contains("vx_node n2 = vxBARNode(g, \"n2\", l3, NULL, NULL);"));
        let n1 = text.find("vx_node n1").unwrap();
        let n2 = text.find("vx_node n2").unwrap();
        assert!(n1 < n2);
    }

    #[test]
    fn data_nodes_use_tag_constructors() {
        let graph = {
            let registry = registry();
            let mut b = GraphBuilder::new(&registry);
            b.add_node("lut", "BUFFER").unwrap();
            b.add_node("k", "SCALAR").unwrap();
            b.build().unwrap()
        };
        let text = GraphCodeWriter::new(&graph, "context")
            .render_to_string("g")
            .unwrap();
        assert!(text.contains("vx_buffer lut = vxCreateBuffer(context, \"lut\");"));
        assert!(text.contains("vx_scalar k = vxCreateScalar(context, \"k\");"));
    }

    #[test]
    fn descriptor_display_name_names_constructor() {
        let registry = KernelRegistry::standard().unwrap();
        let mut b = GraphBuilder::new(&registry);
        b.add_node("in1", "IMAGE").unwrap();
        b.add_node("blur", "GAUSSIAN_3x3").unwrap();
        b.connect("l1", ("in1", 0), ("blur", 0)).unwrap();
        let graph = b.build().unwrap();

        let text = GraphCodeWriter::new(&graph, "context")
            .render_to_string("g")
            .unwrap();
        assert!(text.contains("vx_node blur = vxGaussian3x3Node(g, \"blur\", l1, NULL);"));
    }

    #[test]
    fn cyclic_graph_renders_nothing() {
        let registry = registry();
        let mut b = GraphBuilder::new(&registry);
        b.add_node("a", "FOO").unwrap();
        b.add_node("b", "FOO").unwrap();
        b.connect("l1", ("a", 0), ("b", 0)).unwrap();
        b.connect("l2", ("b", 0), ("a", 0)).unwrap();
        let graph = b.build().unwrap();

        let writer = GraphCodeWriter::new(&graph, "context");
        let mut buf = Vec::new();
        let err = writer.render(&mut buf, "g").unwrap_err();
        assert!(matches!(err, CodegenError::CyclicGraph { .. }));
        assert!(buf.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cycle.c");
        assert!(writer.write_file(&path).is_err());
        assert!(!path.exists());
    }

    fn clash(err: CodegenError) -> (String, &'static str) {
        match err {
            CodegenError::ReservedName { id, reason } => (id, reason),
            other => panic!("expected ReservedName, got {other:?}"),
        }
    }

    #[test]
    fn ids_clashing_with_handles_are_rejected() {
        let registry = registry();
        let mut b = GraphBuilder::new(&registry);
        b.add_node("in1", "IMAGE").unwrap();
        b.add_node("context", "IMAGE").unwrap();
        b.add_node("pipeline", "IMAGE").unwrap();
        let graph = b.build().unwrap();

        let writer = GraphCodeWriter::new(&graph, "context");
        let mut buf = Vec::new();
        let (id, reason) = clash(writer.render(&mut buf, "pipeline").unwrap_err());
        assert_eq!(id, "context");
        assert_eq!(reason, "it names the context handle");
        assert!(buf.is_empty());

        let writer = GraphCodeWriter::new(&graph, "ctx");
        let (id, reason) = clash(writer.render_to_string("pipeline").unwrap_err());
        assert_eq!(id, "pipeline");
        assert_eq!(reason, "it names the graph handle");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.c");
        let err = writer.write_file(&path).unwrap_err();
        assert!(err.to_string().contains("identifier pipeline"));
        assert!(!path.exists());

        assert!(writer.render_to_string("g").is_ok());
    }

    #[test]
    fn reserved_words_are_rejected() {
        let registry = registry();
        let mut b = GraphBuilder::new(&registry);
        b.add_node("int", "SCALAR").unwrap();
        let graph = b.build().unwrap();
        let (id, reason) = clash(
            GraphCodeWriter::new(&graph, "context")
                .render_to_string("g")
                .unwrap_err(),
        );
        assert_eq!(id, "int");
        assert_eq!(reason, "it is a C keyword");

        let mut b = GraphBuilder::new(&registry);
        b.add_node("a", "IMAGE").unwrap();
        b.add_node("n1", "FOO").unwrap();
        b.connect("NULL", ("a", 0), ("n1", 0)).unwrap();
        let graph = b.build().unwrap();
        let (id, _) = clash(
            GraphCodeWriter::new(&graph, "context")
                .render_to_string("g")
                .unwrap_err(),
        );
        assert_eq!(id, "NULL");
    }

    #[test]
    fn handles_must_be_distinct_and_unreserved() {
        let graph = Graph::new();
        let (id, _) = clash(
            GraphCodeWriter::new(&graph, "context")
                .render_to_string("context")
                .unwrap_err(),
        );
        assert_eq!(id, "context");

        let (id, reason) = clash(
            GraphCodeWriter::new(&graph, "static")
                .render_to_string("g")
                .unwrap_err(),
        );
        assert_eq!(id, "static");
        assert_eq!(reason, "it is a C keyword");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("int.c");
        assert!(GraphCodeWriter::new(&graph, "context")
            .write_file(&path)
            .is_err());
        assert!(!path.exists());
    }

    #[test]
    fn write_file_names_graph_after_file() {
        let registry = registry();
        let graph = pipeline(&registry);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.c");
        GraphCodeWriter::new(&graph, "context")
            .write_file(&path)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PIPELINE_C);
    }

    #[test]
    fn unwritable_target_is_reported() {
        let registry = registry();
        let graph = pipeline(&registry);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("pipeline.c");
        let err = GraphCodeWriter::new(&graph, "context")
            .write_file(&path)
            .unwrap_err();
        assert!(matches!(err, CodegenError::WriteTargetUnavailable { .. }));
    }

    #[test]
    fn graph_names_are_identifiers() {
        assert_eq!(graph_name_for(Path::new("out/pipeline.c")), "pipeline");
        assert_eq!(graph_name_for(Path::new("my-graph.v2.c")), "my_graph_v2");
        assert_eq!(graph_name_for(Path::new("3d.c")), "_3d");
        assert_eq!(graph_name_for(Path::new("")), "graph");
    }

    use std::collections::HashMap;

    use crate::testing;
    use proptest::prelude::*;

    /// Every declared variable with the banner of the section declaring it.
    fn declarations(text: &str) -> Vec<(String, String)> {
        let mut section = String::new();
        let mut declared = Vec::new();
        for line in text.lines() {
            if let Some(banner) = line.strip_prefix("  // ") {
                section = banner.to_string();
            } else if let Some(statement) = line.strip_prefix("  vx_") {
                let name = statement.split_whitespace().nth(1).unwrap();
                declared.push((name.to_string(), section.clone()));
            }
        }
        declared
    }

    proptest! {
        #[test]
        fn every_entity_is_declared_once_in_its_section(plan in testing::plan()) {
            let registry = testing::registry();
            let graph = plan.build(&registry);
            let text = GraphCodeWriter::new(&graph, "context")
                .render_to_string("g")
                .unwrap();

            let declared = declarations(&text);
            let mut sections: HashMap<&str, &str> = HashMap::new();
            for (name, section) in &declared {
                prop_assert!(
                    sections.insert(name.as_str(), section.as_str()).is_none(),
                    "{} declared twice",
                    name
                );
            }
            prop_assert_eq!(declared.len(), graph.node_count() + graph.link_count() + 2);
            prop_assert_eq!(sections.get("context").copied(), Some("The Context"));
            prop_assert_eq!(sections.get("g").copied(), Some("The Graph"));
            for node in graph.nodes() {
                let expected = match node.role() {
                    Some(DataRole::Head) => "Inputs",
                    Some(DataRole::Intermediate) => "Intermediate data",
                    Some(DataRole::Tail) => "Results",
                    None => "Functions",
                };
                prop_assert_eq!(sections.get(node.id.as_str()).copied(), Some(expected));
            }
            for link in graph.links() {
                prop_assert_eq!(sections.get(link.id.as_str()).copied(), Some("Links"));
            }

            let functions: Vec<&str> = declared
                .iter()
                .filter(|(_, section)| section == "Functions")
                .map(|(name, _)| name.as_str())
                .collect();
            let scheduled: Vec<&str> = function_order(&graph)
                .unwrap()
                .into_iter()
                .map(|n| n.id.as_str())
                .collect();
            prop_assert_eq!(functions, scheduled);
        }

        #[test]
        fn rendering_is_stable_and_balanced(plan in testing::plan()) {
            let registry = testing::registry();
            let graph = plan.build(&registry);
            let writer = GraphCodeWriter::new(&graph, "context");
            let first = writer.render_to_string("g").unwrap();
            prop_assert_eq!(&first, &writer.render_to_string("g").unwrap());

            let rebuilt = plan.build(&registry);
            let again = GraphCodeWriter::new(&rebuilt, "context")
                .render_to_string("g")
                .unwrap();
            prop_assert_eq!(&first, &again);

            let lines: Vec<&str> = first.lines().collect();
            prop_assert_eq!(lines.first().copied(), Some("{"));
            prop_assert_eq!(lines.last().copied(), Some("}"));
            for line in &lines[1..lines.len() - 1] {
                prop_assert!(
                    line.is_empty() || (line.starts_with("  ") && !line.starts_with("   ")),
                    "{:?}",
                    line
                );
            }
            prop_assert_eq!(first.matches('{').count(), first.matches('}').count());
        }

        #[test]
        fn cyclic_pipelines_leave_no_file(plan in testing::plan(), ring in 2usize..5) {
            let registry = testing::registry();
            let graph = plan.build_with_ring(&registry, ring);
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("pipeline.c");
            let err = GraphCodeWriter::new(&graph, "context")
                .write_file(&path)
                .unwrap_err();
            prop_assert!(matches!(err, CodegenError::CyclicGraph { .. }), "expected CyclicGraph, got {:?}", err);
            prop_assert!(!path.exists());
        }
    }

    #[test]
    fn ingested_document_renders() {
        let doc = gredit_doc::GraphDocument::parse(
            r#"{
                "nodes": [
                    { "id": "in1", "kernel": "IMAGE" },
                    { "id": "n1", "kernel": "FOO" },
                    { "id": "out1", "kernel": "IMAGE" }
                ],
                "links": [
                    { "id": "l1", "from": { "node": "in1" }, "to": { "node": "n1" } },
                    { "id": "l2", "from": { "node": "n1" }, "to": { "node": "out1" } }
                ]
            }"#,
        )
        .unwrap();
        let graph = doc.to_graph(&registry()).unwrap();
        let text = GraphCodeWriter::new(&graph, "context")
            .render_to_string("pipeline")
            .unwrap();
        assert_eq!(text, PIPELINE_C);
    }
}
