use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// Form field carrying the job description on `/api/analyze`.
pub const JOB_DESCRIPTION_FIELD: &str = "jobDescription";

/// A resume document pulled out of a multipart form.
#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
    /// Present only when the form carried a non-blank job description.
    pub job_description: Option<String>,
}

/// Reads the multipart body. `file_field` names the file part; an absent part
/// is a validation error. Unknown fields are skipped.
pub async fn read_upload(
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == file_field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            file = Some((file_name, data));
        } else if name == JOB_DESCRIPTION_FIELD {
            let text = field.text().await?;
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                job_description = Some(trimmed.to_string());
            }
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    Ok(ResumeUpload {
        file_name,
        bytes,
        job_description,
    })
}
