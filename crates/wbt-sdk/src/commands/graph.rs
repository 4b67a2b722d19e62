use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::PathBuf;

use eyre::Context as _;
use tracing::{info, instrument};
use wbt_tree::{Flattened, Path, Step};

use crate::common::{build_tree, read_records};

/// Fill colours by nesting level; deeper levels reuse the last one.
const NESTING_COLORS: [&str; 8] = [
    "#FDF3D0", "#DCE8FA", "#D9E7D6", "#F1CFCD", "#F5F5F5", "#E1D5E7", "#FFE6CC", "white",
];

/// Build a record file's tree and export it as a Graphviz dot document.
///
/// # Errors
/// Returns an error if the records are unreadable or violate the tree's
/// structural contract, or if writing the document fails.
#[instrument(skip_all, fields(records = %records_file.display()))]
pub async fn export_graph(records_file: PathBuf, graph_out: PathBuf) -> eyre::Result<()> {
    let records = read_records(&records_file).await?;
    let tree = build_tree(records).await?;

    let dot = render_dot(tree.flattened())?;
    tokio::fs::write(&graph_out, dot)
        .await
        .with_context(|| format!("Failed to write graph {}", graph_out.display()))?;
    info!(file = ?graph_out, nodes = tree.flattened().len(), "Exported graph");
    Ok(())
}

/// Render a flattened tree as a dot document.
///
/// Edges are derived from paths alone. Left and right edges are labelled;
/// edges into a nested scope are not.
///
/// # Errors
/// Returns an error if formatting fails.
pub fn render_dot(flat: &Flattened) -> eyre::Result<String> {
    let paths: HashSet<&Path> = flat.nodes().iter().map(|node| &node.path).collect();

    let mut dot = String::from("strict digraph {\nnode [shape=record];\n");
    for node in flat.nodes() {
        let color = NESTING_COLORS
            .get(node.nesting)
            .or(NESTING_COLORS.last())
            .copied()
            .unwrap_or("white");
        writeln!(
            dot,
            "{} [label=\"{}\" style=filled fillcolor=\"{color}\"];",
            node_id(&node.path),
            node.key
        )?;

        if let Some((parent, step)) = parent_of(&node.path, &paths) {
            match step {
                Step::Left | Step::Right => writeln!(
                    dot,
                    "{} -> {} [label=\"{}\"];",
                    node_id(&parent),
                    node_id(&node.path),
                    step.token()
                )?,
                Step::Nested | Step::ScopeRoot => {
                    writeln!(dot, "{} -> {};", node_id(&parent), node_id(&node.path))?;
                }
            }
        }
    }
    dot.push_str("}\n");
    Ok(dot)
}

/// Dot identifier of a node: `n` followed by its path tokens.
fn node_id(path: &Path) -> String {
    format!("n{path}")
}

/// Path of the node one step above `path`, with the step taken from it.
///
/// A position holds either a leaf at that exact path or a scope root at the
/// path plus `M`; nested scopes always hang off a scope root.
fn parent_of(path: &Path, paths: &HashSet<&Path>) -> Option<(Path, Step)> {
    let position = path.position();
    let step = position.last()?;
    let parent = position.parent()?;
    let parent = match step {
        Step::Nested => parent.child(Step::ScopeRoot),
        Step::Left | Step::Right | Step::ScopeRoot => {
            if paths.contains(&parent) {
                parent
            } else {
                parent.child(Step::ScopeRoot)
            }
        }
    };
    paths.contains(&parent).then_some((parent, step))
}

#[cfg(test)]
mod tests {
    use test_utils::records;
    use wbt_tree::WeightBalancedTree;

    use super::*;

    fn dot_for(records: &wbt_core::base::SortedRecords) -> String {
        let tree = WeightBalancedTree::build(records).expect("tree");
        render_dot(tree.flattened()).expect("dot")
    }

    #[test]
    fn leaf_edges_are_labelled() {
        let dot = dot_for(&records![[1] => 10, [2] => 20, [3] => 30]);
        assert!(dot.starts_with("strict digraph {\n"));
        assert!(dot.contains("n [label=\"2\""));
        assert!(dot.contains("n -> nL [label=\"L\"];"));
        assert!(dot.contains("n -> nR [label=\"R\"];"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn nested_edges_hang_off_scope_roots() {
        let dot = dot_for(&records![[0, 3, 10] => 1, [0, 3, 20] => 2]);
        assert!(dot.contains("nM -> nNM;"));
        assert!(dot.contains("nNM -> nNN;"));
        assert!(dot.contains("nNN -> nNNL [label=\"L\"];"));
        assert!(dot.contains("nNM [label=\"3\" style=filled fillcolor=\"#DCE8FA\"];"));
    }

    #[test]
    fn scope_root_children_attach_to_marker() {
        // Top siblings [leaf 0, scope 1, leaf 2]: the scope root is the pivot.
        let dot = dot_for(&records![[0] => 1, [1, 5] => 2, [2] => 3]);
        assert!(dot.contains("nM -> nL [label=\"L\"];"));
        assert!(dot.contains("nM -> nR [label=\"R\"];"));
        assert!(dot.contains("nM -> nN;"));
    }

    #[test]
    fn empty_tree() {
        let dot = dot_for(&records![]);
        assert_eq!(dot, "strict digraph {\nnode [shape=record];\n}\n");
    }
}
