use crate::models::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions admitted into a scan. The scanner targets application
/// source trees, so binary and lockfile noise stays out.
const SCANNABLE_EXTENSIONS: [&str; 17] = [
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "json", "py", "java", "go", "rb", "php", "cs", "html",
    "vue", "svelte", "sql",
];

/// Holds the source files loaded from disk for a CLI scan. The engine
/// itself only ever sees the in-memory list.
#[derive(Debug, Default)]
pub struct ScanContext {
    pub files: Vec<SourceFile>,
}

impl ScanContext {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn load_files(&mut self, paths: &[PathBuf], exclude: &[PathBuf]) -> Result<(), String> {
        for path in paths {
            if self.is_excluded(path, exclude) {
                continue;
            }

            if path.is_dir() {
                self.load_directory(path, exclude)?;
            } else if path.is_file() && is_scannable_file(path) {
                self.load_file(path)?;
            }
        }
        Ok(())
    }

    /// Recursively loads scannable files from a directory, skipping paths
    /// that match any exclude prefix.
    fn load_directory(&mut self, dir_path: &Path, exclude: &[PathBuf]) -> Result<(), String> {
        let entries =
            fs::read_dir(dir_path).map_err(|e| format!("Failed to read directory: {}", e))?;
        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
            let path = entry.path();

            if self.is_excluded(&path, exclude) {
                continue;
            }

            if path.is_dir() {
                self.load_directory(&path, exclude)?;
            } else if path.is_file() && is_scannable_file(&path) {
                self.load_file(&path)?;
            }
        }
        Ok(())
    }

    fn is_excluded(&self, path: &Path, exclude: &[PathBuf]) -> bool {
        exclude
            .iter()
            .any(|exclude_pattern| path.starts_with(exclude_pattern))
    }

    fn load_file(&mut self, file_path: &Path) -> Result<(), String> {
        let content = fs::read_to_string(file_path)
            .map_err(|e| format!("Failed to read file '{}': {}", file_path.display(), e))?;
        self.files
            .push(SourceFile::new(file_path.to_path_buf(), content));
        Ok(())
    }
}

fn is_scannable_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCANNABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
