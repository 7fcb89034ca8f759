use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes an interval model with one line `vertex start end` per vertex.
pub fn write_intervals<P, T>(path: P, intervals: impl IntoIterator<Item = (usize, T, T)>) -> std::io::Result<()>
where
    P: AsRef<Path>,
    T: Display,
{
    let file = File::create(path)?;
    write_intervals_to(BufWriter::new(file), intervals)
}

pub fn write_intervals_to<W, T>(mut writer: W, intervals: impl IntoIterator<Item = (usize, T, T)>) -> std::io::Result<()>
where
    W: Write,
    T: Display,
{
    for (v, start, end) in intervals {
        writeln!(writer, "{v} {start} {end}")?;
    }
    writer.flush()
}
