//! Edge-list ingestion.
//!
//! Each non-comment line names one undirected edge as two whitespace
//! separated integer labels; further columns (weights, timestamps) are
//! ignored. Lines starting with `#` or `%` are comments. Labels are compacted
//! to dense vertex ids in order of first appearance.

use std::{
    collections::HashMap,
    io::{self, BufRead},
};

use fractanet_core::{FractalError, Graph};
use thiserror::Error;

/// Errors raised while parsing an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// Reading from the underlying source failed.
    #[error("failed to read edge list: {0}")]
    Io(#[from] io::Error),
    /// A line did not contain two integer labels.
    #[error("line {line}: expected two integer vertex labels, found `{content}`")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Offending line content.
        content: String,
    },
    /// The compacted edges could not be assembled into a graph.
    #[error(transparent)]
    Graph(#[from] FractalError),
}

/// Graph loaded from an edge list together with the original labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledGraph {
    graph: Graph,
    labels: Vec<i64>,
}

impl LabelledGraph {
    /// Loaded graph over dense vertex ids.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Original label of every dense vertex id.
    #[must_use]
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Original label of `vertex`, if it exists.
    #[must_use]
    pub fn label_of(&self, vertex: usize) -> Option<i64> {
        self.labels.get(vertex).copied()
    }

    /// Restricts the graph to its largest connected component, keeping the
    /// labels of the surviving vertices.
    ///
    /// # Errors
    /// Returns [`FractalError::EmptyGraph`] when the graph has no vertices.
    pub fn into_largest_component(self) -> Result<Self, FractalError> {
        let components = self.graph.connected_components();
        let largest = components.first().ok_or(FractalError::EmptyGraph)?;
        let graph = self.graph.induced_subgraph(largest)?;
        let labels = largest
            .iter()
            .filter_map(|&vertex| self.labels.get(vertex).copied())
            .collect();
        Ok(Self { graph, labels })
    }
}

/// Parses a whitespace-delimited edge list.
///
/// # Errors
/// Returns [`EdgeListError`] for unreadable input or a malformed line.
///
/// # Examples
/// ```
/// use fractanet_cli::cli::parse_edge_list;
///
/// let loaded = parse_edge_list("# comment\n10 20\n20 30 0.5\n% note\n".as_bytes())?;
/// assert_eq!(loaded.graph().vertex_count(), 3);
/// assert_eq!(loaded.graph().edge_count(), 2);
/// assert_eq!(loaded.labels(), &[10, 20, 30]);
/// # Ok::<(), fractanet_cli::cli::EdgeListError>(())
/// ```
pub fn parse_edge_list(reader: impl BufRead) -> Result<LabelledGraph, EdgeListError> {
    let mut ids: HashMap<i64, usize> = HashMap::new();
    let mut labels = Vec::new();
    let mut edges = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') || content.starts_with('%') {
            continue;
        }
        let (left, right) = parse_pair(content).ok_or_else(|| EdgeListError::Malformed {
            line: index + 1,
            content: content.to_owned(),
        })?;
        let mut intern = |label: i64| {
            *ids.entry(label).or_insert_with(|| {
                labels.push(label);
                labels.len() - 1
            })
        };
        edges.push((intern(left), intern(right)));
    }

    let graph = Graph::from_edges(labels.len(), edges)?;
    Ok(LabelledGraph { graph, labels })
}

fn parse_pair(content: &str) -> Option<(i64, i64)> {
    let mut fields = content.split_whitespace();
    let left = fields.next()?.parse().ok()?;
    let right = fields.next()?.parse().ok()?;
    Some((left, right))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn labels_are_compacted_in_first_seen_order() {
        let loaded = parse_edge_list("7 -3\n-3 100\n100 7\n".as_bytes()).expect("edges parse");
        assert_eq!(loaded.labels(), &[7, -3, 100]);
        assert_eq!(loaded.graph().edge_count(), 3);
        assert_eq!(loaded.label_of(2), Some(100));
        assert_eq!(loaded.label_of(3), None);
    }

    #[test]
    fn self_loops_and_repeats_collapse() {
        let loaded = parse_edge_list("1 1\n1 2\n2 1\n".as_bytes()).expect("edges parse");
        assert_eq!(loaded.graph().vertex_count(), 2);
        assert_eq!(loaded.graph().edge_count(), 1);
    }

    #[rstest]
    #[case::single_label("1\n", 1)]
    #[case::not_integer("1 b\n", 1)]
    #[case::later_line("1 2\n\n3 x\n", 3)]
    fn malformed_lines_report_their_number(#[case] input: &str, #[case] expected: usize) {
        match parse_edge_list(input.as_bytes()) {
            Err(EdgeListError::Malformed { line, .. }) => assert_eq!(line, expected),
            other => panic!("expected malformed line, got {other:?}"),
        }
    }

    #[test]
    fn largest_component_keeps_surviving_labels() {
        let loaded = parse_edge_list("5 6\n10 11\n11 12\n".as_bytes())
            .and_then(|loaded| loaded.into_largest_component().map_err(EdgeListError::from))
            .expect("component extracts");
        assert_eq!(loaded.graph().vertex_count(), 3);
        assert_eq!(loaded.labels(), &[10, 11, 12]);
        assert!(loaded.graph().is_connected());
    }

    #[test]
    fn empty_input_yields_an_empty_graph() {
        let loaded = parse_edge_list("# nothing\n".as_bytes()).expect("comments parse");
        assert!(loaded.graph().is_empty());
    }
}
