//! File upload field
//!
//! Files are checked against the control's size limit and accept list
//! before they reach the form state. A rejected file leaves the field's
//! current value and display untouched and records a message instead.

use crate::handlers::FileUploader;
use crate::resolver::ResolvedControl;
use crate::widgets::{file_display_name, FieldCommand, FieldProps};
use form_types::{FileRef, FormValue, DEFAULT_FILE_ACCEPT};
use std::fmt;

const MIB: f64 = 1024.0 * 1024.0;

/// Why a selected file was refused
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileRejection {
    TooLarge { limit: u64 },
    UnsupportedType { accept: String },
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRejection::TooLarge { limit } => {
                write!(f, "File size exceeds {:.0}MB limit.", *limit as f64 / MIB)
            }
            FileRejection::UnsupportedType { accept } => {
                write!(f, "Invalid file type. Accepted types: {}", accept)
            }
        }
    }
}

/// Check a file against a size limit and a comma-separated accept list.
///
/// Size is checked first. Accept entries may be MIME wildcards
/// (`image/*`), extensions (`.pdf`) or exact MIME types.
pub fn check_file(file: &FileRef, accept: &str, max_size: u64) -> Result<(), FileRejection> {
    if file.size() > max_size {
        return Err(FileRejection::TooLarge { limit: max_size });
    }
    if accept == DEFAULT_FILE_ACCEPT || accept.contains(DEFAULT_FILE_ACCEPT) || accepts(accept, file) {
        return Ok(());
    }
    Err(FileRejection::UnsupportedType {
        accept: accept.to_string(),
    })
}

fn accepts(accept: &str, file: &FileRef) -> bool {
    let name = file.name.to_lowercase();
    accept.split(',').map(str::trim).any(|entry| {
        if let Some(family) = entry.strip_suffix('*') {
            if entry.ends_with("/*") {
                return file.mime_type.starts_with(family);
            }
        }
        if entry.starts_with('.') {
            return name.ends_with(&entry.to_lowercase());
        }
        file.mime_type == entry
    })
}

/// How a chosen file can be previewed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilePreview {
    /// A file held in memory, identified by its local id
    Local { file_id: uuid::Uuid, mime_type: String },
    /// A stored file reachable by URL
    Remote { url: String },
}

/// Stateful file field: display name, preview and last rejection
#[derive(Clone, Debug, PartialEq)]
pub struct FileField {
    accept: String,
    max_size: u64,
    display_name: Option<String>,
    preview: Option<FilePreview>,
    rejection: Option<FileRejection>,
}

impl FileField {
    pub fn new(control: &ResolvedControl) -> Self {
        Self {
            accept: control.options.accept().to_string(),
            max_size: control.options.max_size(),
            display_name: None,
            preview: None,
            rejection: None,
        }
    }

    /// Refresh display and preview from the field's current value
    pub fn sync(&mut self, value: Option<&FormValue>, uploader: &dyn FileUploader) {
        self.display_name = value.and_then(file_display_name);
        self.preview = match value {
            Some(FormValue::File(file)) => Some(FilePreview::Local {
                file_id: file.id,
                mime_type: file.mime_type.clone(),
            }),
            Some(FormValue::String(key)) if !key.is_empty() => Some(FilePreview::Remote {
                url: uploader.file_url(key),
            }),
            _ => None,
        };
    }

    /// Take a file chosen by the user
    pub fn select(&mut self, props: &FieldProps<'_>, file: FileRef) -> Option<FieldCommand> {
        if props.is_read_only() {
            return None;
        }
        if let Err(rejection) = check_file(&file, &self.accept, self.max_size) {
            tracing::debug!(field = %props.control.path, file = %file.name, reason = %rejection, "File rejected");
            self.rejection = Some(rejection);
            return None;
        }

        self.rejection = None;
        self.display_name = Some(file.name.clone());
        self.preview = Some(FilePreview::Local {
            file_id: file.id,
            mime_type: file.mime_type.clone(),
        });
        Some(FieldCommand::SetValue {
            path: props.control.path.clone(),
            value: FormValue::File(file),
        })
    }

    /// Clear the field
    pub fn remove(&mut self, props: &FieldProps<'_>) -> Option<FieldCommand> {
        if props.is_read_only() {
            return None;
        }
        self.display_name = None;
        self.preview = None;
        self.rejection = None;
        Some(FieldCommand::SetValue {
            path: props.control.path.clone(),
            value: FormValue::Null,
        })
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn preview(&self) -> Option<&FilePreview> {
        self.preview.as_ref()
    }

    pub fn rejection(&self) -> Option<&FileRejection> {
        self.rejection.as_ref()
    }

    /// Whether a remove action is offered
    pub fn can_remove(&self, props: &FieldProps<'_>) -> bool {
        !props.is_read_only() && self.display_name.is_some()
    }

    /// Hint shown on an empty drop zone
    pub fn size_hint(&self) -> String {
        format!("Max {}MB", (self.max_size as f64 / MIB).round())
    }
}
