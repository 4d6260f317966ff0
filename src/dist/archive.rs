//! Gzip-compressed tar archives.
//!
//! Entries get normalized headers (root ownership, fixed mtime, 0755 for
//! executables) so that archiving the same inputs twice gives identical
//! bytes.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;

/// Extension of every archive written here.
pub const TGZ_EXTENSION: &str = "tgz";

/// A file to place in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// File on disk
    pub source: PathBuf,

    /// Relative path inside the archive
    pub archive_path: PathBuf,
}

impl ArchiveEntry {
    pub fn new(source: impl Into<PathBuf>, archive_path: impl Into<PathBuf>) -> Self {
        ArchiveEntry {
            source: source.into(),
            archive_path: archive_path.into(),
        }
    }
}

/// Write `entries` into a new `.tgz` at `dest`.
pub fn write_tgz(dest: &Path, entries: &[ArchiveEntry]) -> Result<()> {
    let file = File::create(dest)
        .with_context(|| format!("failed to create archive {}", dest.display()))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        append_file(&mut builder, entry).with_context(|| {
            format!(
                "failed to add {} to {}",
                entry.source.display(),
                dest.display()
            )
        })?;
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .with_context(|| format!("failed to finish archive {}", dest.display()))?;

    Ok(())
}

fn append_file(builder: &mut tar::Builder<GzEncoder<File>>, entry: &ArchiveEntry) -> Result<()> {
    let mut file = File::open(&entry.source)?;
    let metadata = file.metadata()?;

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(metadata.len());
    header.set_mode(0o755);
    header.set_mtime(0);
    header.set_uid(0);
    header.set_gid(0);
    header.set_username("root")?;
    header.set_groupname("root")?;
    header.set_cksum();

    builder.append_data(&mut header, &entry.archive_path, &mut file)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn read_tgz_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let file = File::open(path).unwrap();
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (name, data)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("foo");
        std::fs::write(&exe, b"binary").unwrap();

        let dest = tmp.path().join("foo.tgz");
        write_tgz(
            &dest,
            &[ArchiveEntry::new(&exe, "foo-1.0.0/bin/linux-amd64/foo")],
        )
        .unwrap();

        let entries = read_tgz_entries(&dest);
        assert_eq!(
            entries,
            vec![(
                "foo-1.0.0/bin/linux-amd64/foo".to_string(),
                b"binary".to_vec()
            )]
        );
    }

    #[test]
    fn test_archives_are_reproducible() {
        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("foo");
        std::fs::write(&exe, b"binary").unwrap();

        let a = tmp.path().join("a.tgz");
        let b = tmp.path().join("b.tgz");
        write_tgz(&a, &[ArchiveEntry::new(&exe, "foo")]).unwrap();
        write_tgz(&b, &[ArchiveEntry::new(&exe, "foo")]).unwrap();

        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }

    #[test]
    fn test_missing_source_names_file() {
        let tmp = TempDir::new().unwrap();
        let err = write_tgz(
            &tmp.path().join("x.tgz"),
            &[ArchiveEntry::new(tmp.path().join("missing"), "missing")],
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("missing"));
    }
}
