use std::path::Path;

use crate::{FailureKind, ServiceError, UploadFile};

/// Reads local files for upload, naming each part after the file name.
pub async fn read_uploads<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<UploadFile>, ServiceError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ServiceError::new(FailureKind::Io, format!("not a file: {}", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ServiceError::new(FailureKind::Io, format!("{}: {err}", path.display()))
        })?;
        files.push(UploadFile { name, bytes });
    }
    Ok(files)
}
