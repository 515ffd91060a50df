use std::path::Path;
use std::process::Command;

use log::{debug, info};
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;

use crate::error::{Error, Result};
use crate::graph::{FollowGraph, FollowNode};

// Graphviz RGBA, roughly 30% opaque.
const NODE_COLOR: &str = "#1f77b44d";
const EDGE_COLOR: &str = "#00000026";

/// Graphviz DOT for the graph: named accounts labelled with their handle,
/// friends drawn as small unlabelled dots.
pub fn to_dot(follow_graph: &FollowGraph) -> String {
    let dot = Dot::with_attr_getters(
        &follow_graph.graph,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &|_, _| format!("color=\"{EDGE_COLOR}\""),
        &|_, (_, node): (NodeIndex, &FollowNode)| {
            format!(
                "label=\"{}\", shape=circle, style=filled, fillcolor=\"{NODE_COLOR}\", \
                 color=\"{NODE_COLOR}\", width=0.08, height=0.08, fixedsize=true, fontsize=10",
                escape_label(node.label())
            )
        },
    );
    format!("{:?}", dot)
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn save_graph_to_dot(follow_graph: &FollowGraph, filename: &Path) -> Result<()> {
    std::fs::write(filename, to_dot(follow_graph)).map_err(|e| Error::io(filename, e))?;
    debug!("wrote {}", filename.display());
    Ok(())
}

/// Rasterises `dot_file` to a 6x6 inch PNG with the given Graphviz layout
/// engine (`neato`, `dot`, `sfdp`, ...).
pub fn render_png(layout: &str, dot_file: &Path, output_image: &Path) -> Result<()> {
    let status = Command::new(layout)
        .arg("-Tpng")
        .arg("-Gsize=6,6!")
        .arg("-Gdpi=100")
        .arg("-Goverlap=true")
        .arg(dot_file)
        .arg("-o")
        .arg(output_image)
        .status()
        .map_err(|e| Error::Render(format!("could not run `{layout}`: {e}")))?;

    if !status.success() {
        return Err(Error::Render(format!("`{layout}` exited with {status}")));
    }
    info!("rendered {}", output_image.display());
    Ok(())
}

pub fn open_image(output_image: &Path) -> Result<()> {
    let opener = if cfg!(target_os = "windows") {
        "start"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    Command::new(opener)
        .arg(output_image)
        .status()
        .map_err(|e| Error::Render(format!("could not run `{opener}`: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_in_labels_are_escaped() {
        assert_eq!(escape_label(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn missing_layout_binary_is_a_render_error() {
        let err = render_png(
            "definitely-not-a-graphviz-engine",
            Path::new("in.dot"),
            Path::new("out.png"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
