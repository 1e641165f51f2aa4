use anyhow::Result;
use broken_client::adapters::session::TOKEN_KEY;
use broken_client::core::{LoginFormMode, LoginUser, PhotoFile, Testimonial};
use broken_client::utils::error::ErrorCategory;
use broken_client::{
    ApiClient, ApiPaths, ApiUrls, ClientError, ReqwestTransport, SessionStorage, SessionToken,
};
use httpmock::prelude::*;

fn client_for(
    server: &MockServer,
    token: Option<&str>,
) -> (ApiClient<ReqwestTransport, SessionToken>, SessionStorage) {
    let storage = SessionStorage::new();
    if let Some(token) = token {
        storage.set_item(TOKEN_KEY, token);
    }
    let client = ApiClient::new(
        ReqwestTransport::new(),
        SessionToken::new(storage.clone()),
        ApiUrls::new(&server.base_url(), ApiPaths::default()),
    );
    (client, storage)
}

#[tokio::test]
async fn test_products_send_session_token() -> Result<()> {
    let server = MockServer::start_async().await;
    let products_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products")
                .header("authorization", "token-abc");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": 1, "name": "Lamp", "price": 12.5},
                    {"id": 2, "name": "Chair", "description": "Oak"}
                ]));
        })
        .await;

    let (client, _) = client_for(&server, Some("token-abc"));
    let products = client.get_products().await?;

    products_mock.assert_async().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Lamp");
    assert_eq!(products[1].description.as_deref(), Some("Oak"));
    Ok(())
}

#[tokio::test]
async fn test_products_without_token_omit_authorization() -> Result<()> {
    let server = MockServer::start_async().await;
    let products_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products")
                .matches(|req| {
                    req.headers.as_ref().map_or(true, |headers| {
                        !headers
                            .iter()
                            .any(|(name, _)| name.eq_ignore_ascii_case("authorization"))
                    })
                });
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;

    let (client, _) = client_for(&server, None);
    let products = client.get_products().await?;

    products_mock.assert_async().await;
    assert!(products.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_subscription_posts_email_query_with_empty_body() -> Result<()> {
    let server = MockServer::start_async().await;
    let subscribe_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/subscriptions")
                .query_param("email", "a@b.com")
                .body("");
            then.status(200);
        })
        .await;

    let (client, _) = client_for(&server, None);
    let result = client.post_subscription("a@b.com").await?;

    subscribe_mock.assert_async().await;
    assert!(result.is_null());
    Ok(())
}

#[tokio::test]
async fn test_testimonial_post_is_json_with_token() -> Result<()> {
    let server = MockServer::start_async().await;
    let testimonial_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/testimonials")
                .header("authorization", "tok")
                .json_body(serde_json::json!({
                    "name": "Bob",
                    "title": "Great shop",
                    "message": "Fast delivery"
                }));
            then.status(201).json_body(serde_json::json!({"id": 10}));
        })
        .await;

    let (client, _) = client_for(&server, Some("tok"));
    let testimonial = Testimonial {
        name: "Bob".to_string(),
        title: "Great shop".to_string(),
        message: "Fast delivery".to_string(),
        rating: None,
    };
    let created = client.post_testimonial(&testimonial).await?;

    testimonial_mock.assert_async().await;
    assert_eq!(created["id"], 10);
    Ok(())
}

#[tokio::test]
async fn test_html_login_sends_form_fields() -> Result<()> {
    let server = MockServer::start_async().await;
    let login_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .x_www_form_urlencoded_tuple("email", "alice@example.com")
                .x_www_form_urlencoded_tuple("password", "s3cret")
                .x_www_form_urlencoded_tuple("op", "HTML");
            then.status(200).json_body(serde_json::json!({"token": "jwt"}));
        })
        .await;

    let (client, _) = client_for(&server, None);
    let user = LoginUser {
        email: "alice@example.com".to_string(),
        password: "s3cret".to_string(),
        op: LoginFormMode::Html,
    };
    let response = client.login(&user).await?;

    login_mock.assert_async().await;
    assert_eq!(response["token"], "jwt");
    Ok(())
}

#[tokio::test]
async fn test_json_login_sends_json_object() -> Result<()> {
    let server = MockServer::start_async().await;
    let login_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login").json_body(serde_json::json!({
                "email": "alice@example.com",
                "password": "s3cret",
                "op": "JSON"
            }));
            then.status(200).json_body(serde_json::json!({"token": "jwt"}));
        })
        .await;

    let (client, _) = client_for(&server, None);
    let user = LoginUser {
        email: "alice@example.com".to_string(),
        password: "s3cret".to_string(),
        op: LoginFormMode::Json,
    };
    client.login(&user).await?;

    login_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_token_flows_return_text() -> Result<()> {
    let server = MockServer::start_async().await;
    let dom_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/auth/dom-csrf-flow")
                .header("fingerprint", "fp-1");
            then.status(200).body("dom-token");
        })
        .await;
    let simple_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/simple-csrf-flow");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("\"simple-token\"");
        })
        .await;

    let (client, _) = client_for(&server, None);

    assert_eq!(client.load_dom_xsrf_token("fp-1").await?, "dom-token");
    assert_eq!(client.load_xsrf_token().await?, "simple-token");
    dom_mock.assert_async().await;
    simple_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_photo_download_returns_bytes() -> Result<()> {
    let server = MockServer::start_async().await;
    let png = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    let photo_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/one/a@b.com/photo")
                .header("authorization", "tok");
            then.status(200)
                .header("Content-Type", "image/png")
                .body(png.clone());
        })
        .await;

    let (client, _) = client_for(&server, Some("tok"));
    let photo = client.get_user_photo("a@b.com").await?;

    photo_mock.assert_async().await;
    assert_eq!(photo, png);
    Ok(())
}

#[tokio::test]
async fn test_photo_upload_is_multipart_keyed_by_email() -> Result<()> {
    let server = MockServer::start_async().await;
    let upload_mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/users/one/a@b.com/photo")
                .header("authorization", "tok")
                .body_contains("name=\"a@b.com\"")
                .body_contains("filename=\"me.png\"")
                .body_contains("image/png")
                .body_contains("PNGDATA");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        })
        .await;

    let (client, _) = client_for(&server, Some("tok"));
    client
        .put_photo(PhotoFile::new("me.png", b"PNGDATA".to_vec()), "a@b.com")
        .await?;

    upload_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_goto_and_render() -> Result<()> {
    let server = MockServer::start_async().await;
    let goto_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/goto")
                .query_param("url", "https://example.org/landing");
            then.status(200).json_body(serde_json::json!({"redirected": true}));
        })
        .await;
    let render_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/render")
                .header("content-type", "text/plain")
                .body("<b>hello</b>");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<b>hello</b>");
        })
        .await;

    let (client, _) = client_for(&server, None);
    client.go_to("https://example.org/landing").await?;
    let rendered = client.post_render("<b>hello</b>").await?;

    goto_mock.assert_async().await;
    render_mock.assert_async().await;
    assert_eq!(rendered, "<b>hello</b>");
    Ok(())
}

#[tokio::test]
async fn test_metadata_posts_xml_query() -> Result<()> {
    let server = MockServer::start_async().await;
    let metadata_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/metadata")
                .header("content-type", "text/xml")
                .query_param("xml", broken_client::core::client::METADATA_XML);
            then.status(200)
                .header("Content-Type", "application/xml")
                .body("<child>ok</child>");
        })
        .await;

    let (client, _) = client_for(&server, None);
    let reply = client.post_metadata().await?;
    assert_eq!(reply, "<child>ok</child>");

    metadata_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_http_error_status_reaches_caller() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/testimonials");
            then.status(500).body("database down");
        })
        .await;

    let (client, _) = client_for(&server, None);
    let err = client.get_testimonials().await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Http);
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let client = ApiClient::new(
        ReqwestTransport::new(),
        || None::<String>,
        ApiUrls::new("http://127.0.0.1:1", ApiPaths::default()),
    );

    let err = client.get_latest_products().await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.category(), ErrorCategory::Transport);
}
