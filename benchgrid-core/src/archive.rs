//! Archive codec
//!
//! Zip pack/unpack used for artifact transfer: clients pack a benchmark
//! directory before uploading, the orchestrator unpacks the upload into a
//! per-job staging directory. `unpack(pack(dir))` reproduces the directory's
//! relative structure and file bytes exactly.

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::{Component, Path};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Extracts a zip archive into `dest`, preserving relative paths
///
/// `dest` is created if missing. Entries that would escape `dest` (absolute
/// paths, `..` components) are rejected.
pub fn unpack(bytes: &[u8], dest: &Path) -> io::Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::create_dir_all(dest)?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let relative = entry.enclosed_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("archive entry '{}' escapes the destination", entry.name()),
            )
        })?;
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&target)?;
        io::copy(&mut entry, &mut file)?;
    }

    Ok(())
}

/// Packs a directory tree into a zip archive
///
/// Walks `dir` recursively and writes each regular file under its path
/// relative to `dir`.
pub fn pack(dir: &Path) -> io::Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    pack_dir(&mut writer, dir, Path::new(""), options)?;

    let cursor = writer
        .finish()
        .map_err(io::Error::other)?;
    Ok(cursor.into_inner())
}

fn pack_dir(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    root: &Path,
    relative: &Path,
    options: SimpleFileOptions,
) -> io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(root.join(relative))?
        .collect::<Result<_, _>>()?;
    // stable entry order keeps packed archives reproducible
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let entry_relative = relative.join(entry.file_name());
        let name = zip_entry_name(&entry_relative);
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            writer
                .add_directory(format!("{name}/"), options)
                .map_err(io::Error::other)?;
            pack_dir(writer, root, &entry_relative, options)?;
        } else if file_type.is_file() {
            writer
                .start_file(name, options)
                .map_err(io::Error::other)?;
            let mut file = fs::File::open(entry.path())?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            writer.write_all(&buf)?;
        }
    }

    Ok(())
}

/// Zip entry names always use forward slashes, whatever the host separator
fn zip_entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
