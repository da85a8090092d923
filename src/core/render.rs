use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::compose::RenderBlock;
use super::error::{InvoicerError, Result};

/// Turns composed blocks into the bytes of a printable document.
pub trait Renderer {
    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &str;

    fn render(&self, blocks: &[RenderBlock]) -> Result<Vec<u8>>;
}

/// Render `blocks` and write them to `{dir}/{stem}.{ext}`.
///
/// The document is rendered completely before the file is created, and the
/// file is opened with create-new semantics: an existing artifact is never
/// overwritten ([`InvoicerError::ArtifactExists`]). A failed write removes the
/// partial file.
pub fn write_artifact<R: Renderer + ?Sized>(
    dir: &Path,
    stem: &str,
    renderer: &R,
    blocks: &[RenderBlock],
) -> Result<PathBuf> {
    let bytes = renderer.render(blocks)?;
    let path = dir.join(format!("{stem}.{}", renderer.extension()));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => InvoicerError::ArtifactExists(path.clone()),
            _ => InvoicerError::Io(e),
        })?;

    if let Err(e) = file.write_all(&bytes).and_then(|()| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(&path);
        return Err(e.into());
    }

    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote invoice artifact");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Renderer for Plain {
        fn extension(&self) -> &str {
            "txt"
        }

        fn render(&self, blocks: &[RenderBlock]) -> Result<Vec<u8>> {
            Ok(format!("{} blocks", blocks.len()).into_bytes())
        }
    }

    struct Broken;

    impl Renderer for Broken {
        fn extension(&self) -> &str {
            "txt"
        }

        fn render(&self, _: &[RenderBlock]) -> Result<Vec<u8>> {
            Err(InvoicerError::Render("no fonts".into()))
        }
    }

    #[test]
    fn writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "1_acme", &Plain, &[RenderBlock::Spacer(1.0)]).unwrap();
        assert_eq!(path, dir.path().join("1_acme.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "1 blocks");
    }

    #[test]
    fn never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1_acme.txt"), "original").unwrap();
        let err = write_artifact(dir.path(), "1_acme", &Plain, &[]).unwrap_err();
        assert!(matches!(err, InvoicerError::ArtifactExists(_)));
        assert_eq!(fs::read_to_string(dir.path().join("1_acme.txt")).unwrap(), "original");
    }

    #[test]
    fn render_failure_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_artifact(dir.path(), "1_acme", &Broken, &[]).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
