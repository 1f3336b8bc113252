//! Point files: one `x,y` pair per line.
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::data::Point;

#[derive(Debug, thiserror::Error)]
pub enum PointFileError {
  #[error(transparent)]
  Io(#[from] io::Error),
  #[error("line {line}: {reason}")]
  Parse { line: usize, reason: String },
}

/// Read every point from the file at `path`.
///
/// # Errors
/// See [`parse_points`].
pub fn read_points(path: impl AsRef<Path>) -> Result<Vec<Point>, PointFileError> {
  parse_points(BufReader::new(File::open(path)?))
}

/// Parse `x,y` lines. Surrounding whitespace and blank lines are ignored.
///
/// # Errors
/// [`PointFileError::Parse`] names the first line (counting from one) that
/// does not hold exactly two comma separated numbers.
///
/// ```rust
/// # use chanhull::io::parse_points;
/// # use chanhull::data::Point;
/// let pts = parse_points("0.5,1\n\n -2, 3.25 \n".as_bytes()).unwrap();
/// assert_eq!(pts, vec![Point::new([0.5, 1.0]), Point::new([-2.0, 3.25])]);
/// ```
pub fn parse_points<R: BufRead>(reader: R) -> Result<Vec<Point>, PointFileError> {
  let mut pts = Vec::new();
  for (idx, line) in reader.lines().enumerate() {
    let line = line?;
    let text = line.trim();
    if text.is_empty() {
      continue;
    }
    let parse_error = |reason: String| PointFileError::Parse {
      line: idx + 1,
      reason,
    };
    let mut fields = text.split(',');
    let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
      return Err(parse_error(format!("expected `x,y`, found {text:?}")));
    };
    let coord = |field: &str| {
      field
        .trim()
        .parse::<f32>()
        .map_err(|err| parse_error(format!("{field:?}: {err}")))
    };
    pts.push(Point::new([coord(x)?, coord(y)?]));
  }
  Ok(pts)
}

/// Write `pts` to `path`, replacing the file.
///
/// # Errors
/// Any I/O error from creating or writing the file.
pub fn write_points(path: impl AsRef<Path>, pts: &[Point]) -> Result<(), PointFileError> {
  let mut out = BufWriter::new(File::create(path)?);
  format_points(&mut out, pts)?;
  out.flush()?;
  Ok(())
}

/// One `x,y` line per point with six decimals.
///
/// # Errors
/// Any error from `out`.
pub fn format_points<W: Write>(out: &mut W, pts: &[Point]) -> io::Result<()> {
  for pt in pts {
    writeln!(out, "{pt}")?;
  }
  Ok(())
}
