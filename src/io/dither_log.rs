//! Applied-offset log for reproducing a jitter run.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write applied `(del_c, del_r)` pixel offsets, one frame per row, as a
/// two-column whitespace-delimited text file.
pub fn write_dither_log<P: AsRef<Path>>(path: P, offsets: &[(f64, f64)]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (del_c, del_r) in offsets {
        writeln!(writer, "{del_c:.6} {del_r:.6}")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_two_column_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dither.txt");

        write_dither_log(&path, &[(0.0, 0.0), (1.5, -2.25)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "0.000000 0.000000");
        assert_eq!(lines[1], "1.500000 -2.250000");
    }

    #[test]
    fn test_empty_run_writes_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dither.txt");
        write_dither_log(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
