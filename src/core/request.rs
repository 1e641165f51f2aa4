use crate::core::{RawResponse, RequestDescriptor, ResponseType, Transport};
use crate::utils::error::{ClientError, Result};
use serde::de::DeserializeOwned;

/// 依照 `ResponseType` 解碼後的回應內容
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl ResponseBody {
    fn kind(&self) -> &'static str {
        match self {
            ResponseBody::Json(_) => "json",
            ResponseBody::Text(_) => "text",
            ResponseBody::Bytes(_) => "bytes",
        }
    }

    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value)?),
            other => Err(ClientError::UnexpectedResponse {
                expected: "json",
                found: other.kind(),
            }),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            ResponseBody::Text(text) => Ok(text),
            other => Err(ClientError::UnexpectedResponse {
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ResponseBody::Bytes(bytes) => Ok(bytes),
            other => Err(ClientError::UnexpectedResponse {
                expected: "bytes",
                found: other.kind(),
            }),
        }
    }
}

/// 所有 API 呼叫共用的送出入口：送出請求、檢查狀態碼、依提示解碼
pub async fn make_api_request<T>(transport: &T, request: RequestDescriptor) -> Result<ResponseBody>
where
    T: Transport + ?Sized,
{
    let method = request.method;
    let url = request.url.clone();
    let response_type = request.response_type;

    tracing::debug!("📡 {} {}", method.as_str(), url);
    let response = transport.send(request).await?;
    tracing::debug!("📡 {} {} -> {}", method.as_str(), url, response.status);

    if !response.is_success() {
        return Err(ClientError::Status {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    decode(response, response_type)
}

fn decode(response: RawResponse, response_type: ResponseType) -> Result<ResponseBody> {
    match response_type {
        ResponseType::Json => {
            if response.body.iter().all(|b| b.is_ascii_whitespace()) {
                return Ok(ResponseBody::Json(serde_json::Value::Null));
            }
            // 無法解析為 JSON 時以原始文字回傳
            match serde_json::from_slice(&response.body) {
                Ok(value) => Ok(ResponseBody::Json(value)),
                Err(_) => String::from_utf8(response.body)
                    .map(|text| ResponseBody::Json(serde_json::Value::String(text)))
                    .map_err(|_| ClientError::InvalidText),
            }
        }
        ResponseType::Text => String::from_utf8(response.body)
            .map(ResponseBody::Text)
            .map_err(|_| ClientError::InvalidText),
        ResponseType::Bytes => Ok(ResponseBody::Bytes(response.body)),
    }
}
