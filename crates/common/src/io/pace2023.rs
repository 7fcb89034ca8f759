use petgraph::graph::UnGraph;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Pace2023Error {
    #[error("not pace2023 format")]
    InvalidFormat,
    #[error("missing header")]
    MissingHeader,
    #[error("invalid header (expected 'p tww (n) (m)')")]
    InvalidHeader,
    #[error("vertex {0} out of range")]
    VertexOutOfRange(u32),
    #[error("could not read file")]
    IoError(#[from] io::Error),
}

impl From<ParseIntError> for Pace2023Error {
    fn from(_value: ParseIntError) -> Self {
        Pace2023Error::InvalidFormat
    }
}

/// Reads a graph in the format of the PACE 2023 challenge. The header is `p tww (n) (m)`,
/// followed by one edge per line with vertices numbered from 1. Lines starting with `c` are
/// comments.
pub fn read_pace2023<P>(path: P) -> Result<UnGraph<(), ()>, Pace2023Error>
where
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    parse_pace2023(io::BufReader::new(file))
}

pub fn parse_pace2023<R: BufRead>(reader: R) -> Result<UnGraph<(), ()>, Pace2023Error> {
    let mut lines = reader.lines().filter(|line| !matches!(line, Ok(line) if line.starts_with('c')));
    let first_line = lines.next().ok_or(Pace2023Error::MissingHeader)??;
    let mut iter = first_line.split_ascii_whitespace();

    let p = iter.next().ok_or(Pace2023Error::InvalidHeader)?;
    let tww = iter.next().ok_or(Pace2023Error::InvalidHeader)?;
    if p != "p" || tww != "tww" {
        return Err(Pace2023Error::InvalidHeader);
    }
    let n: u32 = iter.next().ok_or(Pace2023Error::InvalidHeader)?.parse()?;
    let m: usize = iter.next().ok_or(Pace2023Error::InvalidHeader)?.parse()?;

    let mut graph = UnGraph::with_capacity(n as usize, m);
    for _ in 0..n {
        graph.add_node(());
    }

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut iter = line.split_ascii_whitespace();
        let mut next_vertex = || -> Result<u32, Pace2023Error> {
            let v: u32 = iter.next().ok_or(Pace2023Error::InvalidFormat)?.parse()?;
            if v == 0 || v > n {
                return Err(Pace2023Error::VertexOutOfRange(v));
            }
            Ok(v - 1)
        };
        let u = next_vertex()?;
        let v = next_vertex()?;
        if u == v {
            return Err(Pace2023Error::InvalidFormat);
        }
        graph.update_edge(u.into(), v.into(), ());
    }
    Ok(graph)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_comments_and_edges() {
        let graph = parse_pace2023("c a path\np tww 4 3\n1 2\nc inner comment\n2 3\n3 4\n".as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains_edge(0.into(), 1.into()));
    }

    #[test]
    fn invalid_input() {
        assert!(matches!(parse_pace2023("".as_bytes()), Err(Pace2023Error::MissingHeader)));
        assert!(matches!(parse_pace2023("p td 2 1\n".as_bytes()), Err(Pace2023Error::InvalidHeader)));
        assert!(matches!(parse_pace2023("p tww 2 1\n1 3\n".as_bytes()), Err(Pace2023Error::VertexOutOfRange(3))));
        assert!(matches!(parse_pace2023("p tww 2 1\n1\n".as_bytes()), Err(Pace2023Error::InvalidFormat)));
    }
}
