use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use crate::marks::{Marks, Point};

pub const HEADER: &str = "Type;X;Y";
pub const DELIMITER: char = ';';

const SEED: &str = "Seed";
const SUPERPIXEL: &str = "Superpixel";

/// Save dialogs don't append a default extension on every platform.
pub fn with_csv_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("csv")
    }
}

pub fn write_csv<W: Write>(mut w: W, marks: &Marks) -> Result<()> {
    writeln!(w, "{}", HEADER)?;
    for (x, y) in &marks.seeds {
        writeln!(w, "{}{d}{}{d}{}", SEED, x, y, d = DELIMITER)?;
    }
    if let Some((x, y)) = marks.superpixel {
        writeln!(w, "{}{d}{}{d}{}", SUPERPIXEL, x, y, d = DELIMITER)?;
    }
    w.flush()?;
    Ok(())
}

pub fn save_csv<P: AsRef<Path>>(path: P, marks: &Marks) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(BufWriter::new(file), marks)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        "Saved {} seeds and {} superpixel to {}",
        marks.seeds.len(),
        marks.superpixel.is_some() as usize,
        path.display()
    );
    Ok(())
}

fn parse_coord(s: &str, line: usize) -> Result<i32> {
    s.trim()
        .parse::<i32>()
        .with_context(|| format!("line {}: invalid coordinate {:?}", line, s))
}

/// The header row is optional and blank lines are skipped. A leading BOM
/// is ignored.
pub fn read_csv<R: BufRead>(r: R) -> Result<Marks> {
    let mut marks = Marks::default();
    let mut seen_row = false;

    for (i, line) in r.lines().enumerate() {
        let n = i + 1;
        let line = line.with_context(|| format!("line {}: read failed", n))?;
        let line = if n == 1 {
            line.trim_start_matches('\u{feff}')
        } else {
            line.as_str()
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !seen_row {
            seen_row = true;
            if line == HEADER {
                continue;
            }
        }

        let fields = line.split(DELIMITER).collect::<Vec<_>>();
        ensure!(
            fields.len() == 3,
            "line {}: expected 3 fields, found {}",
            n,
            fields.len()
        );

        let p: Point = (parse_coord(fields[1], n)?, parse_coord(fields[2], n)?);

        match fields[0] {
            SEED => marks.seeds.push(p),
            SUPERPIXEL => marks.superpixel = Some(p),
            other => bail!("line {}: unknown row type {:?}", n, other),
        }
    }

    Ok(marks)
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Marks> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let marks = read_csv(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!("Loaded {} seeds from {}", marks.seeds.len(), path.display());
    Ok(marks)
}
