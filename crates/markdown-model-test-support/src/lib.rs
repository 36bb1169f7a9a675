//! Shared test harness utilities for markdown-model crates.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use markdown_model_config::Config;
use tempfile::TempDir;

const CHUNK_SIZE: usize = 64 * 1024;

/// Path to a fixture under the calling crate's `tests/fixtures` directory.
pub fn fixture_path(manifest_dir: &str, name: &str) -> PathBuf {
    Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy a fixture into a fresh temporary directory and return both, so the
/// directory lives as long as the caller holds it.
pub fn copy_fixture(manifest_dir: &str, name: &str) -> io::Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let target = dir.path().join(name);
    std::fs::copy(fixture_path(manifest_dir, name), &target)?;
    Ok((dir, target))
}

/// Baseline configuration rooted at `root`.
pub fn test_config(root: &Path) -> Config {
    Config::for_root(root)
}

/// Byte-for-byte comparison of two files, read in fixed-size chunks.
pub fn files_identical(left: &Path, right: &Path) -> io::Result<bool> {
    let mut left = File::open(left)?;
    let mut right = File::open(right)?;

    if left.metadata()?.len() != right.metadata()?.len() {
        return Ok(false);
    }

    let mut left_buf = vec![0u8; CHUNK_SIZE];
    let mut right_buf = vec![0u8; CHUNK_SIZE];

    loop {
        let left_read = read_full(&mut left, &mut left_buf)?;
        let right_read = read_full(&mut right, &mut right_buf)?;

        if left_read != right_read || left_buf[..left_read] != right_buf[..right_read] {
            return Ok(false);
        }
        if left_read == 0 {
            return Ok(true);
        }
    }
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_file_contents() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        let c = dir.path().join("c.md");
        std::fs::write(&a, "# Same\n").unwrap();
        std::fs::write(&b, "# Same\n").unwrap();
        std::fs::write(&c, "# Diff\n").unwrap();

        assert!(files_identical(&a, &b).unwrap());
        assert!(!files_identical(&a, &c).unwrap());
    }

    #[test]
    fn compares_across_chunk_boundaries() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        let mut body = "x".repeat(CHUNK_SIZE * 2 + 10);
        std::fs::write(&a, &body).unwrap();
        body.replace_range(CHUNK_SIZE + 5..CHUNK_SIZE + 6, "y");
        std::fs::write(&b, &body).unwrap();

        assert!(files_identical(&a, &a).unwrap());
        assert!(!files_identical(&a, &b).unwrap());
    }
}
