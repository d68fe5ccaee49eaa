// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading image files from disk into attachments.

use std::path::{Path, PathBuf};

use columbus_session::Attachment;

/// Why a file could not be attached.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: not an image ({media_type})", path.display())]
    NotImage { path: PathBuf, media_type: String },

    #[error("{}: {size} bytes does not fit in memory", path.display())]
    TooLarge { path: PathBuf, size: u64 },
}

/// Guesses the media type of `path` from its extension.
pub fn media_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Reads an image file into an [`Attachment`].
///
/// The size reported by the filesystem before reading becomes the declared
/// size, so a file that changes while being read fails to encode later.
pub fn read_image(path: &Path) -> Result<Attachment, FileError> {
    let media_type = media_type_for(path);
    if !media_type.starts_with("image/") {
        return Err(FileError::NotImage {
            path: path.to_path_buf(),
            media_type,
        });
    }

    let read_err = |source| FileError::Read {
        path: path.to_path_buf(),
        source,
    };
    let declared = std::fs::metadata(path).map_err(read_err)?.len();
    let declared = declared_size(path, declared)?;
    let bytes = std::fs::read(path).map_err(read_err)?;

    Ok(Attachment::with_declared_size(
        display_name(path),
        media_type,
        bytes,
        declared,
    ))
}

fn declared_size(path: &Path, len: u64) -> Result<usize, FileError> {
    usize::try_from(len).map_err(|_| FileError::TooLarge {
        path: path.to_path_buf(),
        size: len,
    })
}

/// Reads every path, keeping the successes and collecting the failures.
pub fn read_images<P: AsRef<Path>>(paths: &[P]) -> (Vec<Attachment>, Vec<FileError>) {
    let mut attachments = Vec::new();
    let mut errors = Vec::new();
    for path in paths {
        match read_image(path.as_ref()) {
            Ok(attachment) => attachments.push(attachment),
            Err(e) => errors.push(e),
        }
    }
    (attachments, errors)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let attachment = read_image(&path).unwrap();
        assert_eq!(attachment.display_name(), "cat.png");
        assert_eq!(attachment.media_type(), "image/png");
        assert_eq!(attachment.bytes(), &[1, 2, 3]);
        assert!(attachment.is_complete());
    }

    #[test]
    fn refuses_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = read_image(&path).unwrap_err();
        assert!(matches!(err, FileError::NotImage { .. }));
        assert!(err.to_string().contains("text/plain"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_image(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }

    #[test]
    fn metadata_length_converts_to_declared_size() {
        let path = Path::new("photo.png");
        assert_eq!(declared_size(path, 4096).unwrap(), 4096);
        if usize::BITS < u64::BITS {
            let err = declared_size(path, u64::MAX).unwrap_err();
            assert!(matches!(err, FileError::TooLarge { size: u64::MAX, .. }));
        }
    }

    #[test]
    fn read_images_splits_results() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.jpeg");
        std::fs::write(&good, [0xFF, 0xD8]).unwrap();
        let bad = dir.path().join("b.pdf");
        std::fs::write(&bad, b"%PDF").unwrap();

        let (attachments, errors) = read_images(&[good, bad]);
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].media_type(), "image/jpeg");
        assert_eq!(errors.len(), 1);
    }
}
