//! Horizon persistence.
//!
//! One text row per trace column: survey inline, crossline, and two-way
//! time, tab separated, in deterministic column order. The format is
//! geometry-aware so dumped files line up with the source survey rather
//! than the processed sub-region.

use super::Horizon;
use crate::cube::CubeGeometry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a horizon to `path` in survey coordinates.
pub fn dump_horizon(
    horizon: &Horizon,
    geometry: &CubeGeometry,
    path: &Path,
) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    for (&(i1, i2), pick) in horizon.iter() {
        writeln!(
            out,
            "{}\t{}\t{:.2}",
            geometry.iline(i1),
            geometry.xline(i2),
            geometry.time_ms(pick.depth)
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::Pick;
    use std::fs;

    #[test]
    fn dump_writes_survey_coordinates_in_key_order() {
        let mut h = Horizon::new();
        h.insert_pick(1, 0, Pick { depth: 2, prob: 0.9 });
        h.insert_pick(0, 3, Pick { depth: 0, prob: 0.8 });
        let geometry = CubeGeometry {
            iline_first: 500,
            xline_first: 700,
            delay_ms: 100.0,
            sample_ms: 4.0,
            shape: [10, 10, 10],
        };

        let dir = std::env::temp_dir().join("horizon_detector_dump_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("horizon_0");
        dump_horizon(&h, &geometry, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = contents.lines().collect();
        assert_eq!(rows, vec!["500\t703\t100.00", "501\t700\t108.00"]);
        fs::remove_file(&path).ok();
    }
}
