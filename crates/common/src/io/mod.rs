mod edge_list;
mod intervals;
mod metis;
mod pace2023;

use clap::ValueEnum;
pub use edge_list::{parse_edge_list, read_edge_list, ReadEdgeListError};
pub use intervals::{write_intervals, write_intervals_to};
pub use metis::{parse_metis, read_metis, write_metis, ReadMetisError, WriteMetisError};
pub use pace2023::{parse_pace2023, read_pace2023, Pace2023Error};

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum GraphFileType {
    Pace2023,
    Metis,
    EdgeList,
}
