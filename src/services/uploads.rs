//! multipart 上传解析
//!
//! 表单里只允许一个文件字段，其余字段按文本收集。
//! 扩展名白名单、大小上限与魔术字节在读取时即校验，通过后才写入对象存储。

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::{StreamExt, TryStreamExt};

use crate::config::AppConfig;
use crate::errors::{Result, TrackademyError};
use crate::storage::object_store::{ObjectStore, object_key};
use crate::utils::file_magic::{INVALID_FILE_TYPE_MESSAGE, file_extension};
use crate::utils::validate_magic_bytes;

// 文本字段的上限，防止把大文件塞进普通字段
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// 已读入内存并通过校验的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// 小写扩展名，含点号
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// 解析后的 multipart 表单
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn require_file(&mut self, field: &str) -> Result<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| TrackademyError::bad_request(format!("File field '{field}' is required.")))
    }
}

/// 读取 multipart 表单，`file_field` 为文件字段名
pub async fn read_upload_form(mut payload: Multipart, file_field: &str) -> Result<UploadForm> {
    let config = AppConfig::get();
    let max_size = config.upload.max_size;
    let mut form = UploadForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| TrackademyError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        let content_disposition = field.content_disposition().cloned();
        let name = content_disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = content_disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        if name == file_field {
            if form.file.is_some() {
                return Err(TrackademyError::bad_request(
                    "Only one file can be uploaded at a time.",
                ));
            }

            let file_name = file_name.unwrap_or_default();
            let extension = file_extension(&file_name)
                .filter(|ext| config.upload.allowed_types.iter().any(|t| t == ext))
                .ok_or_else(|| TrackademyError::bad_request(INVALID_FILE_TYPE_MESSAGE))?;

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| {
                    TrackademyError::bad_request(format!("Invalid multipart payload: {e}"))
                })?;
                if bytes.len() + data.len() > max_size {
                    return Err(TrackademyError::bad_request(format!(
                        "File size exceeds the limit of {} MB.",
                        max_size / (1024 * 1024)
                    )));
                }
                bytes.extend_from_slice(&data);
            }

            if !validate_magic_bytes(&bytes, &extension) {
                return Err(TrackademyError::bad_request(INVALID_FILE_TYPE_MESSAGE));
            }

            form.file = Some(UploadedFile {
                file_name,
                extension,
                bytes,
            });
        } else if file_name.is_some() {
            return Err(TrackademyError::bad_request(format!(
                "Unexpected file field '{name}'."
            )));
        } else {
            let mut value = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| {
                    TrackademyError::bad_request(format!("Invalid multipart payload: {e}"))
                })?;
                if value.len() + data.len() > MAX_TEXT_FIELD_BYTES {
                    return Err(TrackademyError::bad_request(format!(
                        "Field '{name}' is too large."
                    )));
                }
                value.extend_from_slice(&data);
            }
            let value = String::from_utf8(value).map_err(|_| {
                TrackademyError::bad_request(format!("Field '{name}' must be UTF-8 text."))
            })?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// 写入对象存储，返回对象键
pub async fn store_upload(
    store: &dyn ObjectStore,
    folder: &str,
    prefix: &str,
    uploader_user_id: i64,
    file: UploadedFile,
) -> Result<String> {
    let key = object_key(
        folder,
        uploader_user_id,
        prefix,
        chrono::Utc::now().timestamp_millis(),
        &file.extension,
    );
    tracing::info!(
        "Storing upload '{}' ({} bytes) as {}",
        file.file_name,
        file.bytes.len(),
        key
    );
    store.put(key, file.bytes).await
}
