//! File I/O for saving and loading solved solutions.
//!
//! Binary format for `solutions.bin` (little endian):
//! - 4 bytes: magic (`NVCP`)
//! - u8: format version
//! - u16: grid height
//! - u16: grid width
//! - u16: requirement count
//! - u32: solution count
//! - repeat per solution, repeat per requirement (requirement count is
//!   fixed per file, so no per-solution piece count is stored):
//!   - u8: rotation (0..=3)
//!   - u8: compressed flag (0 or 1)
//!   - i32: position.x
//!   - i32: position.y
//!
//! Files written before the magic/header was added have none of the above
//! header fields; the first four bytes are the solution count directly,
//! immediately followed by the per-solution records. `load_all`/`count` fall
//! back to this legacy layout whenever the leading bytes don't match the
//! magic, trusting the caller's `settings`/`num_requirements` in place of
//! the (absent) stored header.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::PuzzleError;
use crate::grid::format_cells;
use crate::pieces::{GridSettings, Location, Part, Placement, Position, Requirement, Solution};
use crate::verifier::place_all;

const FILE_MAGIC: [u8; 4] = *b"NVCP";
const FILE_VERSION: u8 = 1;

fn read_u16<R: Read>(reader: &mut R) -> std::io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32<R: Read>(reader: &mut R) -> std::io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Saves solutions to both a binary file and a paired human-readable text
/// dump, at `bin_path`/`txt_path`.
pub fn save(
    solutions: &[Solution],
    settings: &GridSettings,
    bin_path: &Path,
    txt_path: &Path,
    parts: &[Part],
    requirements: &[Requirement],
) -> Result<(), PuzzleError> {
    save_text(solutions, settings, txt_path, parts, requirements)?;
    save_binary(solutions, settings, bin_path, requirements)?;
    Ok(())
}

fn save_text(
    solutions: &[Solution],
    settings: &GridSettings,
    path: &Path,
    parts: &[Part],
    requirements: &[Requirement],
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "Found {} solutions:\n", solutions.len())?;
    for (i, solution) in solutions.iter().enumerate() {
        writeln!(file, "Solution {}:", i + 1)?;
        match place_all(parts, requirements, solution, settings) {
            Some(cells) => write!(file, "{}", format_cells(&cells, settings.width))?,
            None => writeln!(file, "<invalid solution>")?,
        }
        writeln!(file)?;
    }
    Ok(())
}

fn save_binary(
    solutions: &[Solution],
    settings: &GridSettings,
    path: &Path,
    requirements: &[Requirement],
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(&FILE_MAGIC)?;
    file.write_all(&[FILE_VERSION])?;
    file.write_all(&(settings.height as u16).to_le_bytes())?;
    file.write_all(&(settings.width as u16).to_le_bytes())?;

    let num_requirements = requirements.len();
    file.write_all(&(num_requirements as u16).to_le_bytes())?;
    file.write_all(&(solutions.len() as u32).to_le_bytes())?;

    for solution in solutions {
        for placement in solution {
            file.write_all(&[placement.loc.rotation, placement.compressed as u8])?;
            file.write_all(&placement.loc.position.x.to_le_bytes())?;
            file.write_all(&placement.loc.position.y.to_le_bytes())?;
        }
    }

    Ok(())
}

/// Reads `solution_count` solutions, each `num_requirements` placement
/// records long. Shared by the current and legacy-format read paths, which
/// differ only in how they arrive at `solution_count`.
fn read_records(
    file: &mut File,
    solution_count: usize,
    num_requirements: usize,
) -> Result<Vec<Solution>, PuzzleError> {
    let mut solutions = Vec::with_capacity(solution_count);

    for _ in 0..solution_count {
        let mut solution = Vec::with_capacity(num_requirements);
        for _ in 0..num_requirements {
            let mut header = [0u8; 2];
            file.read_exact(&mut header)?;
            let rotation = header[0];
            if rotation > 3 {
                return Err(PuzzleError::CorruptSolutions);
            }
            let compressed = header[1] != 0;
            let x = read_i32(file)?;
            let y = read_i32(file)?;
            solution.push(Placement {
                loc: Location {
                    position: Position { x, y },
                    rotation,
                },
                compressed,
            });
        }
        solutions.push(solution);
    }

    Ok(solutions)
}

/// Loads all solutions from `path`, validating them against `settings` and
/// `requirements.len()`.
///
/// Falls back to the legacy, header-less layout (solution count directly in
/// the first four bytes) when the file doesn't start with the magic; the
/// legacy layout predates storing grid dimensions, so that fallback trusts
/// the caller's `settings`/`num_requirements` instead of validating against
/// a stored header.
pub fn load_all(
    path: &Path,
    settings: &GridSettings,
    num_requirements: usize,
) -> Result<Vec<Solution>, PuzzleError> {
    let mut file = File::open(path)?;
    let mut prefix = [0u8; 4];
    file.read_exact(&mut prefix)?;

    if prefix == FILE_MAGIC {
        let mut version = [0u8; 1];
        file.read_exact(&mut version)?;
        if version[0] != FILE_VERSION {
            return Err(PuzzleError::CorruptSolutions);
        }

        let height = read_u16(&mut file)? as usize;
        let width = read_u16(&mut file)? as usize;
        let stored_requirements = read_u16(&mut file)? as usize;
        if height != settings.height
            || width != settings.width
            || stored_requirements != num_requirements
        {
            return Err(PuzzleError::CorruptSolutions);
        }

        let solution_count = read_u32(&mut file)? as usize;
        read_records(&mut file, solution_count, num_requirements)
    } else {
        log::warn!(
            "solutions file is missing the {} magic; falling back to the legacy header-less format",
            std::str::from_utf8(&FILE_MAGIC).unwrap_or("NVCP")
        );
        // legacy layout: no magic, no header, the leading bytes already read
        // into `prefix` are the solution count itself.
        let solution_count = u32::from_le_bytes(prefix) as usize;
        read_records(&mut file, solution_count, num_requirements)
    }
}

/// Returns the number of saved solutions without decoding them all.
pub fn count(path: &Path) -> Result<usize, PuzzleError> {
    let mut file = File::open(path)?;
    let mut prefix = [0u8; 4];
    file.read_exact(&mut prefix)?;
    if prefix == FILE_MAGIC {
        let mut version = [0u8; 1];
        file.read_exact(&mut version)?;
        if version[0] != FILE_VERSION {
            return Err(PuzzleError::CorruptSolutions);
        }
        let _height = read_u16(&mut file)?;
        let _width = read_u16(&mut file)?;
        let _num_requirements = read_u16(&mut file)?;
        Ok(read_u32(&mut file)? as usize)
    } else {
        log::warn!(
            "solutions file is missing the {} magic; falling back to the legacy header-less format",
            std::str::from_utf8(&FILE_MAGIC).unwrap_or("NVCP")
        );
        Ok(u32::from_le_bytes(prefix) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mask;
    use crate::pieces::Constraint;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("navicust-solver-test-{name}-{}", std::process::id()))
    }

    #[test]
    fn binary_round_trip_preserves_placements() {
        let settings = GridSettings {
            height: 2,
            width: 2,
            has_oob: false,
            command_line_row: 1,
        };
        let requirements = vec![Requirement {
            part_index: 0,
            constraint: Constraint::default(),
        }];
        let parts = vec![Part {
            is_solid: true,
            color: 0,
            compressed_mask: Mask::from(vec![true], 1, 1),
            uncompressed_mask: Mask::from(vec![true], 1, 1),
        }];
        let solutions = vec![vec![Placement {
            loc: Location {
                position: Position { x: -1, y: 1 },
                rotation: 2,
            },
            compressed: true,
        }]];

        let bin_path = temp_path("roundtrip.bin");
        let txt_path = temp_path("roundtrip.txt");
        save(
            &solutions,
            &settings,
            &bin_path,
            &txt_path,
            &parts,
            &requirements,
        )
        .unwrap();

        let loaded = load_all(&bin_path, &settings, requirements.len()).unwrap();
        assert_eq!(loaded, solutions);
        assert_eq!(count(&bin_path).unwrap(), 1);

        let _ = std::fs::remove_file(&bin_path);
        let _ = std::fs::remove_file(&txt_path);
    }

    #[test]
    fn load_rejects_mismatched_grid_dimensions() {
        let settings = GridSettings {
            height: 2,
            width: 2,
            has_oob: false,
            command_line_row: 1,
        };
        let other_settings = GridSettings {
            height: 3,
            width: 3,
            has_oob: false,
            command_line_row: 1,
        };
        let requirements: Vec<Requirement> = vec![];
        let parts: Vec<Part> = vec![];
        let solutions: Vec<Solution> = vec![];

        let bin_path = temp_path("mismatch.bin");
        let txt_path = temp_path("mismatch.txt");
        save(
            &solutions,
            &settings,
            &bin_path,
            &txt_path,
            &parts,
            &requirements,
        )
        .unwrap();

        assert!(load_all(&bin_path, &other_settings, 0).is_err());

        let _ = std::fs::remove_file(&bin_path);
        let _ = std::fs::remove_file(&txt_path);
    }

    /// Writes the legacy, header-less layout by hand (solution count
    /// directly in the first four bytes, no magic/version/dimensions) and
    /// checks that both `load_all` and `count` fall back to reading it.
    #[test]
    fn legacy_header_less_format_still_loads() {
        let settings = GridSettings {
            height: 2,
            width: 2,
            has_oob: false,
            command_line_row: 1,
        };
        let requirements = vec![Requirement {
            part_index: 0,
            constraint: Constraint::default(),
        }];
        let placement = Placement {
            loc: Location {
                position: Position { x: 0, y: 1 },
                rotation: 1,
            },
            compressed: false,
        };

        let bin_path = temp_path("legacy.bin");
        {
            let mut file = File::create(&bin_path).unwrap();
            file.write_all(&1u32.to_le_bytes()).unwrap(); // solution count
            file.write_all(&[placement.loc.rotation, placement.compressed as u8])
                .unwrap();
            file.write_all(&placement.loc.position.x.to_le_bytes())
                .unwrap();
            file.write_all(&placement.loc.position.y.to_le_bytes())
                .unwrap();
        }

        let loaded = load_all(&bin_path, &settings, requirements.len()).unwrap();
        assert_eq!(loaded, vec![vec![placement]]);
        assert_eq!(count(&bin_path).unwrap(), 1);

        let _ = std::fs::remove_file(&bin_path);
    }
}
