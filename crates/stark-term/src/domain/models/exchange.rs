use std::path::Path;

use super::ExchangeError;
use super::FileDescriptor;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitReply {
    pub welcome_text: Option<String>,
    pub context_loaded: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadReply {
    pub result_text: String,
    /// `false` when the service answered but refused the file.
    pub accepted: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryReply {
    pub answer_text: String,
    pub context_loaded: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClearReply {
    pub confirmation_text: String,
}

/// A file read into memory, ready to be sent as multipart form data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub async fn from_path(path: &Path) -> Result<FileUpload, ExchangeError> {
        let descriptor = describe_file(path);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExchangeError::File {
                path: path.display().to_string(),
                source,
            })?;

        return Ok(FileUpload {
            name: descriptor.name,
            mime_type: descriptor.mime_type,
            bytes,
        });
    }
}

/// Name and MIME type of a local file, guessed from its extension.
pub fn describe_file(path: &Path) -> FileDescriptor {
    let name = path
        .file_name()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    return FileDescriptor { name, mime_type };
}
