//! 上传文件的对象存储
//!
//! 键格式：`trackademy/{folder}/{uploaderUserId}/{prefix}_{timestampMillis}_{uploaderUserId}{ext}`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;

use crate::config::AppConfig;
use crate::errors::{Result, TrackademyError};

const KEY_ROOT: &str = "trackademy";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入对象并返回其键
    async fn put(&self, key: String, bytes: Vec<u8>) -> Result<String>;
}

/// 生成对象键，`extension` 需带前导点
pub fn object_key(
    folder: &str,
    uploader_user_id: i64,
    prefix: &str,
    timestamp_millis: i64,
    extension: &str,
) -> String {
    format!(
        "{KEY_ROOT}/{folder}/{uploader_user_id}/{prefix}_{timestamp_millis}_{uploader_user_id}{extension}"
    )
}

/// 本地目录实现
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        // 键由服务端生成，这里只拒绝越出根目录的路径
        if key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(TrackademyError::bad_request(format!(
                "Invalid object key: {key}"
            )));
        }
        Ok(self.root.join(key))
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: String, bytes: Vec<u8>) -> Result<String> {
        let path = self.path_for(&key)?;
        web::block(move || write_file(&path, &bytes))
            .await
            .map_err(|e| TrackademyError::file_operation(format!("Upload task failed: {e}")))??;
        tracing::debug!("Stored object {}", key);
        Ok(key)
    }
}

pub fn create_object_store() -> Arc<dyn ObjectStore> {
    let config = AppConfig::get();
    Arc::new(LocalObjectStore::new(&config.upload.dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        assert_eq!(
            object_key("submissions", 42, "submission", 1_700_000_000_123, ".pdf"),
            "trackademy/submissions/42/submission_1700000000123_42.pdf"
        );
    }

    #[actix_web::test]
    async fn test_local_store_writes_nested_key() {
        let root = std::env::temp_dir().join(format!("trackademy-store-{}", uuid::Uuid::new_v4()));
        let store = LocalObjectStore::new(&root);
        let key = object_key("certificates", 7, "certificate", 1, ".txt");

        let stored = store.put(key.clone(), b"hello".to_vec()).await.unwrap();
        assert_eq!(stored, key);
        assert_eq!(fs::read(root.join(&key)).unwrap(), b"hello");

        let err = store
            .put("trackademy/../escape.txt".into(), vec![])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let _ = fs::remove_dir_all(root);
    }
}
