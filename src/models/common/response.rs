use std::collections::BTreeMap;

use serde::Serialize;

// 统一的API响应结构
//
// { "status": "success", "results": N, "data": { "<key>": value } }
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    pub data: BTreeMap<&'static str, T>,
}

impl<T> ApiResponse<T> {
    pub fn success(key: &'static str, value: T) -> Self {
        Self {
            status: "success",
            results: None,
            data: BTreeMap::from([(key, value)]),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    // 列表响应额外带上条数
    pub fn list(key: &'static str, items: Vec<T>) -> Self {
        Self {
            status: "success",
            results: Some(items.len()),
            data: BTreeMap::from([(key, items)]),
        }
    }
}

// 证书接口使用的响应结构
//
// { "success": true, "message": "...", "data": value, "count": N }
#[derive(Debug, Clone, Serialize)]
pub struct ApiMessageResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiMessageResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            count: None,
        }
    }
}

impl<T> ApiMessageResponse<Vec<T>> {
    pub fn list(items: Vec<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: Some(items.len()),
            data: items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyed_envelope() {
        let body = serde_json::to_value(ApiResponse::success("college", json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"status": "success", "data": {"college": {"id": 1}}}));
    }

    #[test]
    fn test_list_envelope_counts_results() {
        let body = serde_json::to_value(ApiResponse::list("exams", vec![1, 2, 3])).unwrap();
        assert_eq!(body["results"], 3);
        assert_eq!(body["data"]["exams"], json!([1, 2, 3]));
    }

    #[test]
    fn test_message_envelope() {
        let body =
            serde_json::to_value(ApiMessageResponse::list(vec!["a"], "Certificates retrieved"))
                .unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["message"], "Certificates retrieved");
    }
}
