use petgraph::graph::UnGraph;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadEdgeListError {
    #[error("invalid line (got {0})")]
    InvalidLine(String),
    #[error("found self loop at vertex {0}")]
    SelfLoop(u32),
    #[error("parse int error")]
    ParseInt(#[from] ParseIntError),
    #[error("io error")]
    IoError(#[from] std::io::Error),
}

/// Reads a graph with one edge `u v` per line. Vertices are numbered from 0 and the graph has
/// one more vertex than the largest index. Empty lines are skipped and repeated edges are
/// merged.
pub fn read_edge_list<P>(path: P) -> Result<UnGraph<(), ()>, ReadEdgeListError>
where
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    parse_edge_list(BufReader::new(file))
}

pub fn parse_edge_list<R: BufRead>(reader: R) -> Result<UnGraph<(), ()>, ReadEdgeListError> {
    let mut n = 0;
    let mut edges = vec![];
    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_ascii_whitespace();
        let Some(a) = tokens.next() else {
            continue;
        };
        let Some(b) = tokens.next() else {
            return Err(ReadEdgeListError::InvalidLine(line));
        };
        if tokens.next().is_some() {
            return Err(ReadEdgeListError::InvalidLine(line));
        }

        let u: u32 = a.parse()?;
        let v: u32 = b.parse()?;
        if u == v {
            return Err(ReadEdgeListError::SelfLoop(u));
        }
        edges.push((u.min(v), u.max(v)));
        n = n.max(u + 1).max(v + 1);
    }
    edges.sort_unstable();
    edges.dedup();

    let mut graph = UnGraph::with_capacity(n as usize, edges.len());
    graph.extend_with_edges(edges);
    Ok(graph)
}
