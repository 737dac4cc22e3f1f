use std::path::PathBuf;

/// An in-memory source file handed to the scanner. The engine never touches
/// the filesystem; loading is the CLI's (or any other caller's) concern.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: PathBuf, content: String) -> Self {
        Self { path, content }
    }

    pub fn path_display(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}
