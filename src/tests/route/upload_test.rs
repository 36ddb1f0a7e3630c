#[cfg(test)]
mod tests {
    use crate::tests::common::{test_app, TEST_BUCKET};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use object_store::ObjectStore;

    const BOUNDARY: &str = "----blogo-test-boundary";

    fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let app = test_app().await;
        let content: Vec<u8> = (0..4096u32).map(|i| (i % 256) as u8).collect();

        let (status, body) = app.send(multipart_request("file", "cat photo.png", &content)).await;
        assert_eq!(status, StatusCode::OK);

        let url = body["url"].as_str().unwrap();
        let prefix = format!(
            "https://firebasestorage.googleapis.com/v0/b/{}/o/uploads%2Fcat_photo.",
            TEST_BUCKET
        );
        assert!(url.starts_with(&prefix), "unexpected url {}", url);
        assert!(url.ends_with(".png?alt=media"), "unexpected url {}", url);

        let path = app.state.uploader.object_path_from_url(url).unwrap();
        let meta = app.store.head(&path).await.unwrap();
        assert_eq!(meta.size, content.len());
    }

    #[tokio::test]
    async fn test_same_filename_gets_distinct_objects() {
        let app = test_app().await;

        let (_, first) = app.send(multipart_request("file", "a.png", b"one")).await;
        let (_, second) = app.send(multipart_request("file", "a.png", b"two")).await;
        assert_ne!(first["url"], second["url"]);

        for (body, expected) in [(first, b"one"), (second, b"two")] {
            let path = app
                .state
                .uploader
                .object_path_from_url(body["url"].as_str().unwrap())
                .unwrap();
            let stored = app.store.get(&path).await.unwrap().bytes().await.unwrap();
            assert_eq!(stored.as_ref(), expected);
        }
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let app = test_app().await;

        let (status, body) = app.send(multipart_request("avatar", "a.png", b"data")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("file"));
    }

    #[tokio::test]
    async fn test_upload_requires_multipart() {
        let app = test_app().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _) = app.send(request).await;
        assert!(status.is_client_error());
    }
}
