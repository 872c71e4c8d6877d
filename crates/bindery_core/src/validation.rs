use thiserror::Error;

/// Rejections raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a book folder first.")]
    NoBookSelected,
    #[error("Select a book and md file first.")]
    NoCurrentFile,
    #[error("No raw epub selected.")]
    NoRawSelected,
    #[error("No md files selected.")]
    NoDerivedSelected,
    #[error("Select exactly one md file to rename.")]
    RenameNeedsSingle,
    #[error("File name must end with .md")]
    RenameSuffix,
    #[error("No epub files dropped.")]
    NoEpubFiles,
}

pub(crate) fn check_rename(new_name: &str) -> Result<(), ValidationError> {
    if new_name.ends_with(".md") {
        Ok(())
    } else {
        Err(ValidationError::RenameSuffix)
    }
}

/// Keeps only `.epub` paths, in their given order.
pub fn epub_paths(paths: &[String]) -> Result<Vec<String>, ValidationError> {
    let kept: Vec<String> = paths
        .iter()
        .filter(|path| path.ends_with(".epub"))
        .cloned()
        .collect();
    if kept.is_empty() {
        return Err(ValidationError::NoEpubFiles);
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_requires_md_suffix() {
        assert_eq!(check_rename("chapter.txt"), Err(ValidationError::RenameSuffix));
        assert_eq!(check_rename("chapter.md"), Ok(()));
    }

    #[test]
    fn epub_filter_keeps_order() {
        let paths = vec!["b.epub".to_string(), "notes.txt".to_string(), "a.epub".to_string()];
        assert_eq!(epub_paths(&paths).unwrap(), vec!["b.epub", "a.epub"]);
        assert_eq!(
            epub_paths(&["x.pdf".to_string()]),
            Err(ValidationError::NoEpubFiles)
        );
    }
}
