use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate, TimeDelta};
use flate2::{Compression, write::GzEncoder};
use rand::Rng;

use crate::generator::{generate_malformed, generate_ui_log};

pub fn log_file_name(date: NaiveDate, gzip: bool) -> String {
    let suffix = if gzip { ".gz" } else { "" };
    format!("nginx-access-ui.log-{}{suffix}", date.format("%Y%m%d"))
}

/// Writes `lines` log lines into `dir` and returns the path of the new file.
pub fn write_log<R: Rng + ?Sized>(
    rng: &mut R,
    dir: &Path,
    date: NaiveDate,
    lines: usize,
    gzip: bool,
    malformed_rate: f64,
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(date, gzip));
    let file = BufWriter::new(File::create(&path)?);
    if gzip {
        let mut enc = GzEncoder::new(file, Compression::default());
        write_lines(rng, &mut enc, date, lines, malformed_rate)?;
        enc.finish()?.flush()?;
    } else {
        let mut file = file;
        write_lines(rng, &mut file, date, lines, malformed_rate)?;
        file.flush()?;
    }
    Ok(path)
}

fn write_lines<R: Rng + ?Sized, W: Write>(
    rng: &mut R,
    out: &mut W,
    date: NaiveDate,
    lines: usize,
    malformed_rate: f64,
) -> io::Result<()> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .and_then(|t| t.and_local_timezone(Local).earliest())
        .unwrap_or_else(Local::now);
    for i in 0..lines {
        let at = start + TimeDelta::milliseconds((i as i64 * 86_400_000) / lines.max(1) as i64);
        let line = if rng.random_bool(malformed_rate.clamp(0.0, 1.0)) {
            generate_malformed(rng)
        } else {
            generate_ui_log(rng, at)
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}
