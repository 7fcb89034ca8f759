use petgraph::graph::{NodeIndex, UnGraph};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadMetisError {
    #[error("invalid format")]
    NotMetisFormat,
    #[error("missing header")]
    MissingHeader,
    #[error("invalid header (expected '(n) (m)', got {0})")]
    WrongHeader(String),
    #[error("wrong n given in header (expected {expected}, got {actual})")]
    WrongN { expected: usize, actual: usize },
    #[error("wrong m given in header (expected {expected}, got {actual})")]
    WrongM { expected: usize, actual: usize },
    #[error("found zero index (indices must be at least 1)")]
    ZeroIndex,
    #[error("vertex {0} out of range")]
    VertexOutOfRange(usize),
    #[error("number of reverse edges not matching (expected {expected}, got {actual})")]
    NumReverseEdgesNotMatching { expected: usize, actual: usize },
    #[error("found self loop")]
    SelfLoop(usize),
    #[error("parse error")]
    ParseInt(#[from] ParseIntError),
    #[error("io error")]
    IoError(#[from] std::io::Error),
}

/// Implements a subset of the metis graph format. See [metis].
///
/// The format supports undirected, unweighted, loop-less graphs and specifies
/// the number of nodes and the number edges in its header. The vertices indices
/// start with 1.
///
/// The restrictions are
/// + only allows comments before header line
/// + does only allow '(n) (m)' as header
/// + does not support vertex and edge weights
///
/// [metis]: https://people.sc.fsu.edu/~jburkardt/data/metis_graph/metis_graph.html
pub fn read_metis<P>(path: P) -> Result<UnGraph<(), ()>, ReadMetisError>
where
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    parse_metis(BufReader::new(file))
}

pub fn parse_metis<R: BufRead>(reader: R) -> Result<UnGraph<(), ()>, ReadMetisError> {
    let mut lines = reader.lines();

    let first_line = loop {
        let line = lines.next().ok_or(ReadMetisError::MissingHeader)??;
        if !line.starts_with('%') {
            break line;
        }
    };

    let (n, m) = {
        let err = || ReadMetisError::WrongHeader(first_line.clone());
        let mut iter = first_line.split_ascii_whitespace();
        let n: usize = iter.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        let m: usize = iter.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        if iter.next().is_some() || n >= u32::MAX as usize || m >= u32::MAX as usize {
            return Err(err());
        }
        (n, m)
    };

    let mut graph = UnGraph::with_capacity(n, m);
    let (n_expected, m_expected) = (n, m);

    for _ in 0..n {
        graph.add_node(());
    }

    let mut m_reverse = 0;
    let mut u = 1;
    for line in lines {
        let line = line?;
        if line.starts_with('%') {
            return Err(ReadMetisError::NotMetisFormat);
        }
        if u > n_expected {
            if line.trim().is_empty() {
                continue;
            }
            return Err(ReadMetisError::WrongN { actual: u, expected: n_expected });
        }
        for v in line.split_ascii_whitespace() {
            let v: usize = v.parse()?;
            if v == 0 {
                return Err(ReadMetisError::ZeroIndex);
            }
            if v > n_expected {
                return Err(ReadMetisError::VertexOutOfRange(v));
            }
            let (u, v) = (NodeIndex::new(u - 1), NodeIndex::new(v - 1));
            match u.cmp(&v) {
                Ordering::Less => {
                    graph.add_edge(u, v, ());
                }
                Ordering::Equal => return Err(ReadMetisError::SelfLoop(u.index() + 1)),
                Ordering::Greater => {
                    m_reverse += 1;
                }
            }
        }
        u += 1;
    }

    let n_actual = u - 1;
    if n_actual != n_expected {
        return Err(ReadMetisError::WrongN { actual: n_actual, expected: n_expected });
    }
    if graph.edge_count() != m_expected {
        return Err(ReadMetisError::WrongM { actual: graph.edge_count(), expected: m_expected });
    }
    if m_reverse != m_expected {
        return Err(ReadMetisError::NumReverseEdgesNotMatching { actual: m_reverse, expected: m_expected });
    }

    Ok(graph)
}

#[derive(Error, Debug)]
pub enum WriteMetisError {
    #[error("io error")]
    IoError(#[from] std::io::Error),
}

pub fn write_metis<P>(path: P, graph: &UnGraph<(), ()>) -> Result<(), WriteMetisError>
where
    P: AsRef<Path>,
{
    let file = File::create(path)?;
    write_metis_to(BufWriter::new(file), graph)
}

fn write_metis_to<W: Write>(mut file: W, graph: &UnGraph<(), ()>) -> Result<(), WriteMetisError> {
    writeln!(file, "{} {}", graph.node_count(), graph.edge_count())?;
    for u in graph.node_indices() {
        let mut neighbors: Vec<_> = graph.neighbors(u).map(|v| v.index() + 1).collect();
        neighbors.sort_unstable();
        let line: Vec<String> = neighbors.iter().map(ToString::to_string).collect();
        writeln!(file, "{}", line.join(" "))?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn triangle_with_pendant() {
        let graph = parse_metis("% comment\n4 4\n2 3\n1 3\n1 2 4\n3\n".as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.contains_edge(2.into(), 3.into()));
    }

    #[test]
    fn isolated_vertices_have_empty_lines() {
        let graph = parse_metis("3 1\n3\n\n1\n".as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn written_graphs_are_read_back() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (2, 3)]);
        let mut buffer = vec![];
        write_metis_to(&mut buffer, &graph).unwrap();
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "4 4\n2 3\n1 3\n1 2 4\n3\n");
        let read = parse_metis(buffer.as_slice()).unwrap();
        assert_eq!(read.edge_count(), 4);
    }

    #[test]
    fn invalid_input() {
        assert!(matches!(parse_metis("".as_bytes()), Err(ReadMetisError::MissingHeader)));
        assert!(matches!(parse_metis("2 1 1\n".as_bytes()), Err(ReadMetisError::WrongHeader(_))));
        assert!(matches!(parse_metis("2 1\n2\n0\n".as_bytes()), Err(ReadMetisError::ZeroIndex)));
        assert!(matches!(parse_metis("2 1\n1\n".as_bytes()), Err(ReadMetisError::SelfLoop(1))));
        assert!(matches!(parse_metis("2 1\n3\n".as_bytes()), Err(ReadMetisError::VertexOutOfRange(3))));
        assert!(matches!(parse_metis("2 1\n2\n".as_bytes()), Err(ReadMetisError::WrongN { actual: 1, expected: 2 })));
        assert!(matches!(parse_metis("2 1\n2\n\n".as_bytes()), Err(ReadMetisError::NumReverseEdgesNotMatching { .. })));
        assert!(matches!(parse_metis("2 1\n2\n1\n% late\n".as_bytes()), Err(ReadMetisError::NotMetisFormat)));
    }
}
