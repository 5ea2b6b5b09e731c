//! Writes generated parts as `.scad` files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::parts::Part;

/// Writes each part to `<dir>/<name>.scad`, creating `dir` if needed.
///
/// Each file is written to a temporary path first and renamed into place,
/// so an existing file is either replaced whole or left as it was.
///
/// # Returns
///
/// The paths written, in the order of `parts`.
#[instrument(skip(parts), fields(parts = parts.len()))]
pub fn write_parts(dir: &Path, parts: &[Part]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    parts
        .iter()
        .map(|part| {
            let path = dir.join(format!("{}.scad", part.name));
            atomic_write(&path, &part.shape.to_code())?;
            info!(path = %path.display(), "wrote part");
            Ok(path)
        })
        .collect()
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("scad.tmp");

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write to temporary file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3D;
    use crate::shape::Shape;
    use tempfile::TempDir;

    fn part(name: &str, size: f64) -> Part {
        Part::new(name, Shape::cube(Point3D::new(size, size, size)))
    }

    #[test]
    fn test_write_parts() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out");
        let written = write_parts(&dir, &[part("a", 1.), part("b", 2.)]).unwrap();

        assert_eq!(written, vec![dir.join("a.scad"), dir.join("b.scad")]);
        assert_eq!(
            fs::read_to_string(&written[1]).unwrap(),
            "cube(size = [2, 2, 2]);\n"
        );
        // No temporary files are left behind.
        let mut entries = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        entries.sort();
        assert_eq!(entries, ["a.scad", "b.scad"]);
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.scad");
        fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write_parts(temp.path(), &[part("a", 3.)]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "cube(size = [3, 3, 3]);\n"
        );
    }

    #[test]
    fn test_unwritable_directory_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not_a_dir");
        fs::write(&file, "").unwrap();

        let err = write_parts(&file, &[part("a", 1.)]).unwrap_err();
        assert!(err.to_string().contains("Failed to create output directory"));
    }
}
