use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;
use markdown_model_config::WriteSettings;
use tempfile::Builder;

use crate::error::{ModelError, ModelResult};

pub fn read_document(path: &Path) -> ModelResult<String> {
    fs::read_to_string(path).map_err(|err| ModelError::io(path, err))
}

/// Write `content` to `path` according to `settings`. A plain write truncates
/// the target first, so a failure part-way can leave it incomplete.
pub fn write_document(path: &Path, content: &str, settings: WriteSettings) -> ModelResult<()> {
    if settings.backup && path.exists() {
        let backup_path = backup_path(path);
        fs::copy(path, &backup_path).map_err(|err| {
            warn!(
                "backup of {} to {} failed, target left unchanged",
                path.display(),
                backup_path.display()
            );
            ModelError::io(&backup_path, err)
        })?;
    }

    if settings.atomic {
        write_atomic(path, content)
    } else {
        write_in_place(path, content)
    }
}

fn write_in_place(path: &Path, content: &str) -> ModelResult<()> {
    let mut file = File::create(path).map_err(|err| ModelError::io(path, err))?;
    file.write_all(content.as_bytes())
        .map_err(|err| ModelError::io(path, err))
}

fn write_atomic(path: &Path, content: &str) -> ModelResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = Builder::new()
        .prefix(".markdown-model")
        .tempfile_in(&parent)
        .map_err(|err| ModelError::io(&parent, err))?;

    tmp.as_file_mut()
        .write_all(content.as_bytes())
        .and_then(|_| tmp.as_file_mut().sync_all())
        .map_err(|err| ModelError::io(tmp.path(), err))?;

    tmp.persist(path).map(|_| ()).map_err(|err| {
        warn!(
            "atomic rename into {} failed, temporary file removed",
            path.display()
        );
        ModelError::io(path, err.error)
    })
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}
