use crate::config::client_config::ApiUrls;
use crate::core::request::{make_api_request, ResponseBody};
use crate::core::{
    LoginFormMode, LoginUser, MultipartField, OidcClient, PhotoFile, Product, RegistrationUser,
    RequestBody, RequestDescriptor, RequestOverrides, ResponseType, Testimonial, TokenProvider,
    Transport,
};
use crate::utils::error::Result;
use serde_json::Value;

pub const AUTHORIZATION: &str = "authorization";
pub const CONTENT_TYPE: &str = "content-type";
pub const FINGERPRINT: &str = "fingerprint";

const TESTIMONIAL_COUNT_QUERY: &str = "select count(1) as count from testimonial";

/// 外部實體引用的 XML 內容，原樣送出
pub const METADATA_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE child [ <!ENTITY child SYSTEM "file:///etc/passwd"> ]><child></child>"#;

/// REST 端點的薄封裝：每個方法建立一個請求描述，交給共用的 `make_api_request`。
///
/// 傳輸層與 token 來源都在建構時注入；token 在每次呼叫時重新讀取，不做快取。
pub struct ApiClient<T: Transport, P: TokenProvider> {
    transport: T,
    tokens: P,
    urls: ApiUrls,
}

impl<T: Transport, P: TokenProvider> ApiClient<T, P> {
    pub fn new(transport: T, tokens: P, urls: ApiUrls) -> Self {
        Self {
            transport,
            tokens,
            urls,
        }
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }

    fn authorized(&self, request: RequestDescriptor) -> RequestDescriptor {
        request.with_optional_header(AUTHORIZATION, self.tokens.token())
    }

    async fn dispatch(&self, request: RequestDescriptor) -> Result<ResponseBody> {
        make_api_request(&self.transport, request).await
    }

    pub async fn get_testimonials(&self) -> Result<Value> {
        let request = RequestDescriptor::get(self.urls.testimonials());
        self.dispatch(request).await?.into_json()
    }

    pub async fn get_testimonials_count(&self) -> Result<Value> {
        let url = format!(
            "{}/count?query={}",
            self.urls.testimonials(),
            urlencoding::encode(TESTIMONIAL_COUNT_QUERY)
        );
        self.dispatch(RequestDescriptor::get(url)).await?.into_json()
    }

    pub async fn get_products(&self) -> Result<Vec<Product>> {
        let request = self.authorized(RequestDescriptor::get(self.urls.products()));
        self.dispatch(request).await?.into_json()
    }

    pub async fn get_latest_products(&self) -> Result<Vec<Product>> {
        let request = RequestDescriptor::get(self.urls.latest_products());
        self.dispatch(request).await?.into_json()
    }

    pub async fn post_testimonial(&self, testimonial: &Testimonial) -> Result<Value> {
        let request = self.authorized(
            RequestDescriptor::post(self.urls.testimonials())
                .with_body(RequestBody::Json(serde_json::to_value(testimonial)?)),
        );
        self.dispatch(request).await?.into_json()
    }

    /// email 直接接在查詢字串後，不做編碼
    pub async fn post_subscription(&self, email: &str) -> Result<Value> {
        let url = format!("{}?email={}", self.urls.subscriptions(), email);
        self.dispatch(RequestDescriptor::post(url)).await?.into_json()
    }

    pub async fn post_user(&self, user: &RegistrationUser) -> Result<Value> {
        let request = RequestDescriptor::post(self.urls.users())
            .with_body(RequestBody::Json(serde_json::to_value(user)?));
        self.dispatch(request).await?.into_json()
    }

    pub async fn login(&self, user: &LoginUser) -> Result<Value> {
        self.login_with(user, RequestOverrides::default()).await
    }

    /// HTML 模式以表單編碼送出所有欄位，其他模式送 JSON
    pub async fn login_with(&self, user: &LoginUser, overrides: RequestOverrides) -> Result<Value> {
        let value = serde_json::to_value(user)?;
        let body = if user.op == LoginFormMode::Html {
            RequestBody::Form(form_pairs(&value))
        } else {
            RequestBody::Json(value)
        };

        let request = overrides.apply(
            RequestDescriptor::post(format!("{}/login", self.urls.auth())).with_body(body),
        );
        self.dispatch(request).await?.into_json()
    }

    pub async fn get_ldap(&self, ldap_profile_link: &str) -> Result<Value> {
        let url = format!(
            "{}/ldap?query={}",
            self.urls.users(),
            urlencoding::encode(ldap_profile_link)
        );
        self.dispatch(RequestDescriptor::get(url)).await?.into_json()
    }

    pub async fn load_dom_xsrf_token(&self, fingerprint: &str) -> Result<String> {
        let request = RequestDescriptor::get(format!("{}/dom-csrf-flow", self.urls.auth()))
            .with_header(FINGERPRINT, fingerprint)
            .with_response_type(ResponseType::Text);
        Ok(unquote_token(self.dispatch(request).await?.into_text()?))
    }

    pub async fn load_xsrf_token(&self) -> Result<String> {
        let request = RequestDescriptor::get(format!("{}/simple-csrf-flow", self.urls.auth()))
            .with_response_type(ResponseType::Text);
        Ok(unquote_token(self.dispatch(request).await?.into_text()?))
    }

    pub async fn get_oidc_client(&self) -> Result<OidcClient> {
        let request = RequestDescriptor::get(format!("{}/oidc-client", self.urls.auth()));
        self.dispatch(request).await?.into_json()
    }

    pub async fn post_metadata(&self) -> Result<Value> {
        let url = format!(
            "{}?xml={}",
            self.urls.metadata(),
            urlencoding::encode(METADATA_XML)
        );
        let request = RequestDescriptor::post(url).with_header(CONTENT_TYPE, "text/xml");
        self.dispatch(request).await?.into_json()
    }

    pub async fn get_user_photo(&self, email: &str) -> Result<Vec<u8>> {
        let request = self.authorized(
            RequestDescriptor::get(photo_url(&self.urls, email))
                .with_response_type(ResponseType::Bytes),
        );
        self.dispatch(request).await?.into_bytes()
    }

    /// 以 multipart 上傳，欄位名稱即為目標 email
    pub async fn put_photo(&self, photo: PhotoFile, email: &str) -> Result<Value> {
        let field = MultipartField {
            name: email.to_string(),
            file_name: photo.file_name,
            content_type: Some("image/png".to_string()),
            content: photo.content,
        };
        let request = self.authorized(
            RequestDescriptor::put(photo_url(&self.urls, email))
                .with_body(RequestBody::Multipart(vec![field])),
        );
        self.dispatch(request).await?.into_json()
    }

    /// 目標 URL 原樣轉交給轉址端點，不做任何檢查
    pub async fn go_to(&self, url: &str) -> Result<Value> {
        let target = format!("{}?url={}", self.urls.goto(), url);
        self.dispatch(RequestDescriptor::get(target)).await?.into_json()
    }

    pub async fn post_render(&self, data: &str) -> Result<Value> {
        let request = RequestDescriptor::post(self.urls.render())
            .with_header(CONTENT_TYPE, "text/plain")
            .with_body(RequestBody::Text(data.to_string()));
        self.dispatch(request).await?.into_json()
    }
}

fn photo_url(urls: &ApiUrls, email: &str) -> String {
    format!("{}/one/{}/photo", urls.users(), email)
}

/// JSON 字串形式的 token（`"abc"`）去除引號，其餘原樣回傳
fn unquote_token(text: String) -> String {
    match serde_json::from_str::<String>(&text) {
        Ok(token) => token,
        Err(_) => text,
    }
}

fn form_pairs(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect(),
        _ => Vec::new(),
    }
}
