//! # Image Source Module
//!
//! Filesystem side of the batch: enumerating candidate scans, decoding them,
//! writing corrected rasters back and moving files to their destination.
//!
//! Writes go through a temporary file in the target directory that is renamed
//! over the destination, so an interrupted run never leaves a truncated image.

use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// List files in `dir` whose extension matches one of `extensions`
/// (case-insensitive), sorted by file name.
///
/// # Errors
///
/// `AppError::SourceMissing` when `dir` is not an existing directory,
/// `AppError::Io` when it cannot be read.
pub fn list_images(dir: &Path, extensions: &[String]) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::SourceMissing(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| AppError::io("read directory", dir, e))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::io("read directory entry", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            images.push(path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} candidate images in {}", images.len(), dir.display());
    Ok(images)
}

/// Decode an image file into a raster.
pub fn open_raster(path: &Path) -> AppResult<DynamicImage> {
    image::open(path).map_err(|e| AppError::decode(path, e))
}

/// Encode `image` as `format` and atomically replace `path` with it.
pub fn persist(image: &DynamicImage, path: &Path, format: ImageFormat) -> AppResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(".card-orient-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| AppError::io("create temporary file", dir, e))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        image
            .write_to(&mut writer, format)
            .map_err(|e| AppError::io("encode image", path, e))?;
        writer
            .flush()
            .map_err(|e| AppError::io("flush image", path, e))?;
    }

    // Keep the mode of the file being replaced; the scratch file is created owner-only
    if let Ok(meta) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| AppError::io("copy permissions", path, e))?;
    }

    temp.persist(path)
        .map_err(|e| AppError::io("replace file", path, e.error))?;
    debug!("Persisted {:?} image to {}", format, path.display());
    Ok(())
}

/// Create `dir` and any missing parents; succeeds when it already exists.
pub fn ensure_dir(dir: &Path) -> AppResult<()> {
    fs::create_dir_all(dir).map_err(|e| AppError::io("create directory", dir, e))
}

/// Move `source` to `target`.
///
/// Tries a rename first; when that fails (typically across filesystems) the
/// file is copied and the source removed.
pub fn relocate(source: &Path, target: &Path) -> AppResult<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            warn!(
                error = %rename_err,
                "Rename {} -> {} failed, copying instead",
                source.display(),
                target.display()
            );
            fs::copy(source, target).map_err(|e| AppError::io("copy file", target, e))?;
            fs::remove_file(source).map_err(|e| AppError::io("remove file", source, e))
        }
    }
}

/// Resolve the destination argument the way the CLI documents it: `~` expands
/// to the home directory, absolute paths are kept, anything else lives under
/// `source_root`.
pub fn resolve_destination(source_root: &Path, destination: &str) -> PathBuf {
    let expanded = expand_home(destination);
    if expanded.is_absolute() {
        expanded
    } else {
        source_root.join(expanded)
    }
}

fn expand_home(value: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (value, home) {
        ("~", Some(home)) => home,
        (v, Some(home)) if v.starts_with("~/") => home.join(&v[2..]),
        (v, _) => PathBuf::from(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_list_images_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "b.png", 2, 2);
        write_png(dir.path(), "a.png", 2, 2);
        write_png(dir.path(), "C.PNG", 2, 2);
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let found = list_images(dir.path(), &["png".to_string()]).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["C.PNG", "a.png", "b.png"]);
    }

    #[test]
    fn test_list_images_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = list_images(&dir.path().join("nope"), &["png".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::SourceMissing(_)));
    }

    #[test]
    fn test_open_raster_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();
        let err = open_raster(&path).unwrap_err();
        assert!(matches!(err, AppError::Decode { .. }));
    }

    #[test]
    fn test_persist_replaces_file_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "card.png", 4, 2);

        let mut replacement = RgbImage::new(2, 4);
        replacement.put_pixel(1, 3, Rgb([10, 20, 30]));
        persist(&DynamicImage::ImageRgb8(replacement), &path, ImageFormat::Png).unwrap();

        let reloaded = open_raster(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (2, 4));
        assert_eq!(reloaded.get_pixel(1, 3).0, [10, 20, 30, 255]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_persist_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "card.png", 4, 2);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        persist(
            &DynamicImage::ImageRgb8(RgbImage::new(2, 4)),
            &path,
            ImageFormat::Png,
        )
        .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_relocate_moves_file() {
        let dir = TempDir::new().unwrap();
        let source = write_png(dir.path(), "card.png", 2, 2);
        let dest_dir = dir.path().join("out");
        ensure_dir(&dest_dir).unwrap();
        ensure_dir(&dest_dir).unwrap();

        let target = dest_dir.join("card.png");
        relocate(&source, &target).unwrap();
        assert!(!source.exists());
        assert!(target.exists());
    }

    #[test]
    fn test_resolve_destination() {
        let root = Path::new("./scanned");
        assert_eq!(resolve_destination(root, "done"), PathBuf::from("./scanned/done"));
        assert_eq!(resolve_destination(root, "/tmp/out"), PathBuf::from("/tmp/out"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(resolve_destination(root, "~/cards"), PathBuf::from(home).join("cards"));
        }
    }
}
