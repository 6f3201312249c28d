use std::fs;
use std::path::{Path, PathBuf};

use convoy_core::ChangeRequest;
use convoy_parse::{parse_change_request, serialize_change_request};

use crate::error::OperationError;
use crate::traits::ChangeStore;
use crate::Result;

const MAX_FILENAME_ATTEMPTS: usize = 100;

/// Change request directory on disk, one markdown file per request.
pub struct FileSystemChangeStore {
    change_dir: PathBuf,
}

impl FileSystemChangeStore {
    #[must_use]
    pub fn new(change_dir: PathBuf) -> Self {
        Self { change_dir }
    }
}

impl ChangeStore for FileSystemChangeStore {
    fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.change_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(OperationError::RequestList {
                    path: self.change_dir.clone(),
                    source,
                });
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| OperationError::RequestList {
                path: self.change_dir.clone(),
                source,
            })?;
            let path = entry.path();

            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }

            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<ChangeRequest> {
        let content =
            fs::read_to_string(path).map_err(|source| OperationError::RequestFileRead {
                path: path.to_path_buf(),
                source,
            })?;

        parse_change_request(&content).map_err(|source| OperationError::RequestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, request: &ChangeRequest) -> Result<String> {
        fs::create_dir_all(&self.change_dir).map_err(OperationError::RequestFileWrite)?;

        let filename = generate_unique_filename(&self.change_dir);
        let content =
            serialize_change_request(request).map_err(OperationError::RequestSerialize)?;
        fs::write(self.change_dir.join(&filename), content)
            .map_err(OperationError::RequestFileWrite)?;

        Ok(filename)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|source| OperationError::RequestFileDelete {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn generate_unique_filename(change_dir: &Path) -> String {
    for _ in 0..MAX_FILENAME_ATTEMPTS {
        if let Some(name) = petname::petname(3, "-") {
            let filename = format!("{name}.md");

            if !change_dir.join(&filename).exists() {
                return filename;
            }
        }
    }

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("change-{timestamp}.md")
}
