use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use common::io::{read_edge_list, read_metis, read_pace2023, write_intervals, GraphFileType};
use interval_graph::decomposition::chordal::chordal_nice_decomposition;
use interval_graph::decomposition::interval::interval_nice_path_decomposition;
use interval_graph::mpq::{mpq_recognize, MpqRecognition};
use interval_graph::{recognize, Interval};
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Algo {
    SixSweep,
    Mpq,
}

#[derive(Debug, Parser)]
struct Cli {
    #[arg(long)]
    input_type: GraphFileType,
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    stats: Option<PathBuf>,
    #[arg(long, value_enum)]
    algo: Algo,
    #[arg(long)]
    log_level: Option<Level>,
}

#[derive(Debug, Default)]
struct Stats {
    time: Option<Duration>,
    is_interval: Option<bool>,
    tree_width: Option<usize>,
    path_width: Option<usize>,
}

fn write_stats(path: &Option<PathBuf>, input: &Path, algo: Algo, stats: &Stats, status: &str) -> Result<(), Box<dyn Error>> {
    let Some(path) = path else { return Ok(()); };
    let mut out = BufWriter::new(File::create(path)?);
    let input = input.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    let algo = algo.to_possible_value().map(|value| value.get_name().to_string()).unwrap_or_default();
    let time = stats.time.map_or("null".to_string(), |t| t.as_secs_f64().to_string());
    let is_interval = stats.is_interval.map_or("null".to_string(), |b| b.to_string());
    let tree_width = stats.tree_width.map_or("null".to_string(), |w| w.to_string());
    let path_width = stats.path_width.map_or("null".to_string(), |w| w.to_string());
    writeln!(
        out,
        "{{\"input\": \"{input}\", \"algo\": \"{algo}\", \"time\": {time}, \"is_interval\": {is_interval}, \"tree_width\": {tree_width}, \"path_width\": {path_width}, \"status\": \"{status}\"}}"
    )?;
    out.flush()?;
    Ok(())
}

/// Checks that two vertices are adjacent exactly if their intervals intersect.
fn is_interval_model(graph: &UnGraph<(), ()>, model: &[(NodeIndex, Interval<usize>)]) -> bool {
    if model.len() != graph.node_count() {
        return false;
    }
    let mut by_start = model.to_vec();
    by_start.sort_by(|(_, a), (_, b)| Interval::cmp_by_start(a, b));

    let mut intersecting = 0;
    for (i, (u, a)) in by_start.iter().enumerate() {
        for (v, b) in by_start[i + 1..].iter().take_while(|(_, b)| b.start() <= a.end()) {
            if !graph.contains_edge(*u, *v) {
                return false;
            }
            intersecting += 1;
        }
    }
    intersecting == graph.edge_count()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut stats = Stats::default();
    write_stats(&cli.stats, &cli.input, cli.algo, &stats, "unfinished")?;
    let graph = match cli.input_type {
        GraphFileType::Pace2023 => read_pace2023(&cli.input)?,
        GraphFileType::Metis => read_metis(&cli.input)?,
        GraphFileType::EdgeList => read_edge_list(&cli.input)?,
    };

    if let Some(level) = cli.log_level {
        let subscriber = FmtSubscriber::builder().with_max_level(level).with_span_events(FmtSpan::CLOSE).finish();

        subscriber.init();
    };

    let start = Instant::now();
    let model = match cli.algo {
        Algo::SixSweep => {
            let recognition = recognize(&graph);
            stats.time = Some(start.elapsed());
            let umbrella = recognition.umbrella();
            match recognition.into_representation() {
                Ok(representation) => {
                    let model: Vec<_> = representation.iter().collect();
                    Some(model)
                }
                Err(_) => {
                    info!(?umbrella, "not an interval graph");
                    None
                }
            }
        }
        Algo::Mpq => {
            let recognition = mpq_recognize(&graph);
            stats.time = Some(start.elapsed());
            match recognition {
                MpqRecognition::Interval(tree) => Some(tree.intervals()),
                MpqRecognition::NotInterval { vertex, obstruction } => {
                    info!(vertex = vertex.index(), ?obstruction, "not an interval graph");
                    None
                }
                MpqRecognition::Inconclusive { vertex } => {
                    warn!(vertex = vertex.index(), "inconclusive");
                    write_stats(&cli.stats, &cli.input, cli.algo, &stats, "inconclusive")?;
                    return Ok(());
                }
            }
        }
    };
    stats.is_interval = Some(model.is_some());

    if let Some(model) = &model {
        if !is_interval_model(&graph, model) {
            write_stats(&cli.stats, &cli.input, cli.algo, &stats, "invalid-model")?;
            return Err("the computed intervals do not represent the graph".into());
        }
        if let Some(output) = &cli.output {
            let mut model = model.clone();
            model.sort_by_key(|(v, _)| *v);
            write_intervals(output, model.into_iter().map(|(v, interval)| {
                let (start, end) = interval.into_bounds();
                (v.index(), start, end)
            }))?;
        }

        let tree = chordal_nice_decomposition(&graph)?;
        let path = interval_nice_path_decomposition(&graph)?;
        if !tree.is_nice() || !tree.is_tree_decomposition_of(&graph) {
            return Err("invalid nice tree decomposition".into());
        }
        if !path.is_nice() || !path.is_tree_decomposition_of(&graph) {
            return Err("invalid nice path decomposition".into());
        }
        stats.tree_width = Some(tree.width());
        stats.path_width = Some(path.width());
    }

    write_stats(&cli.stats, &cli.input, cli.algo, &stats, "finished")?;
    Ok(())
}
