//! Upload-and-replace transform applied to values before submission

use crate::{FileUploader, SubmitError};
use form_types::FormValue;
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use serde_json::{Map, Value};

/// Upload every file in `value` and replace it by its storage key.
///
/// Independent files upload concurrently. The first failure aborts the
/// transform. The input is left untouched.
pub fn replace_files_with_keys<'a>(
    value: &'a FormValue,
    uploader: &'a dyn FileUploader,
) -> BoxFuture<'a, Result<Value, SubmitError>> {
    async move {
        match value {
            FormValue::File(file) => {
                let uploaded = uploader.upload(file).await?;
                tracing::debug!(file = %file.name, key = %uploaded.key, "File uploaded");
                Ok(Value::String(uploaded.key))
            }
            FormValue::Array(items) => {
                let converted =
                    try_join_all(items.iter().map(|item| replace_files_with_keys(item, uploader))).await?;
                Ok(Value::Array(converted))
            }
            FormValue::Object(map) => {
                let converted =
                    try_join_all(map.values().map(|item| replace_files_with_keys(item, uploader))).await?;
                let object: Map<String, Value> = map.keys().cloned().zip(converted).collect();
                Ok(Value::Object(object))
            }
            scalar => Ok(scalar.to_json()?),
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UploadedFile;
    use async_trait::async_trait;
    use form_types::FileRef;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingUploader {
        uploaded: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl FileUploader for RecordingUploader {
        async fn upload(&self, file: &FileRef) -> Result<UploadedFile, SubmitError> {
            if self.fail_on.as_deref() == Some(file.name.as_str()) {
                return Err(SubmitError::upload(&file.name, "storage unavailable"));
            }
            self.uploaded.lock().push(file.name.clone());
            Ok(UploadedFile {
                key: format!("key-{}", file.name),
                name: Some(file.name.clone()),
                url: None,
            })
        }

        fn file_url(&self, key: &str) -> String {
            format!("https://files.test/{}", key)
        }
    }

    fn values_with_files() -> FormValue {
        let mut values = FormValue::from(json!({
            "remarks": "ok",
            "attachments": [],
            "lab": {"temperature": 4}
        }));
        values.set_path(
            &form_types::FieldPath::parse("certificate").unwrap(),
            FileRef::new("cert.pdf", "application/pdf", vec![1u8]).into(),
        );
        values.set_path(
            &form_types::FieldPath::parse("lab.report").unwrap(),
            FileRef::new("lab.png", "image/png", vec![2u8]).into(),
        );
        if let FormValue::Object(map) = &mut values {
            map.insert(
                "attachments".into(),
                FormValue::Array(vec![FileRef::new("a.txt", "text/plain", "a").into()]),
            );
        }
        values
    }

    #[tokio::test]
    async fn test_files_replaced_by_keys() {
        let uploader = RecordingUploader::default();
        let values = values_with_files();

        let json = replace_files_with_keys(&values, &uploader).await.unwrap();
        assert_eq!(
            json,
            json!({
                "remarks": "ok",
                "attachments": ["key-a.txt"],
                "lab": {"temperature": 4, "report": "key-lab.png"},
                "certificate": "key-cert.pdf"
            })
        );
        assert_eq!(uploader.uploaded.lock().len(), 3);
        // The source tree still holds the files
        assert!(values.contains_files());
    }

    #[tokio::test]
    async fn test_upload_failure_aborts() {
        let uploader = RecordingUploader {
            fail_on: Some("lab.png".into()),
            ..Default::default()
        };
        let result = replace_files_with_keys(&values_with_files(), &uploader).await;
        assert!(matches!(result, Err(SubmitError::Upload { name, .. }) if name == "lab.png"));
    }

    #[tokio::test]
    async fn test_values_without_files_pass_through() {
        let values = FormValue::from(json!({"decision": "APPROVED", "flags": [true, null]}));
        let json = replace_files_with_keys(&values, &crate::NoUploader).await.unwrap();
        assert_eq!(json, json!({"decision": "APPROVED", "flags": [true, null]}));
    }
}
