use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), AppError> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .map_err(|e| AppError::File(format!("Failed to create {:?}: {}", path, e)))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        fs::read_to_string(&path)
            .map_err(|e| AppError::File(format!("Failed to read file {:?}: {}", path.as_ref(), e)))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), AppError> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).map_err(|e| {
            AppError::File(format!("Failed to write to file {:?}: {}", path.as_ref(), e))
        })
    }

    /// List the immediate subdirectories of a directory, sorted by name
    pub fn sorted_subdirs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, AppError> {
        Self::sorted_entries(dir.as_ref(), |p| p.is_dir())
    }

    /// List the files directly inside a directory, sorted by name
    pub fn sorted_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, AppError> {
        Self::sorted_entries(dir.as_ref(), |p| p.is_file())
    }

    fn sorted_entries(dir: &Path, keep: fn(&Path) -> bool) -> Result<Vec<PathBuf>, AppError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| AppError::File(format!("Failed to read directory {:?}: {}", dir, e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| AppError::File(format!("Failed to read entry in {:?}: {}", dir, e)))?;
            let path = entry.path();
            if keep(&path) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}
