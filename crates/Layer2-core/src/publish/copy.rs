//! Copy primitive - files and directory trees
//!
//! Without `hard`, directories are merged into existing content. With `hard`,
//! the destination is removed first so it ends up an exact copy.

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Copy `src` to `dest`, recursing into directories
///
/// Returns the number of files copied.
pub async fn copy_path(src: &Path, dest: &Path, hard: bool) -> io::Result<u64> {
    let metadata = fs::metadata(src).await?;

    if metadata.is_dir() && dest.starts_with(src) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot copy {} into itself", src.display()),
        ));
    }

    if hard {
        remove_existing(dest).await?;
    }

    if metadata.is_dir() {
        copy_dir_recursive(src, dest).await
    } else {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(src, dest).await?;
        debug!("Copied {} -> {}", src.display(), dest.display());
        Ok(1)
    }
}

async fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<u64> {
    fs::create_dir_all(dest).await?;

    let mut copied = 0;
    let mut entries = fs::read_dir(src).await?;

    while let Some(entry) = entries.next_entry().await? {
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if entry.file_type().await?.is_dir() {
            copied += Box::pin(copy_dir_recursive(&src_path, &dest_path)).await?;
        } else {
            fs::copy(&src_path, &dest_path).await?;
            debug!("Copied {} -> {}", src_path.display(), dest_path.display());
            copied += 1;
        }
    }

    Ok(copied)
}

async fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
