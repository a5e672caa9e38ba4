//! Content operation integration tests.

#[cfg(test)]
mod tests {
    use http::Method;
    use oio_proxy::ContentCreateInput;

    use crate::{MockProxy, Reply, oio_url};

    #[test]
    fn test_should_show_content_byte_for_byte() {
        let body = r#"{"chunks":[{"url":"http://10.0.0.1:6004/0A1B","pos":"0","size":42,"hash":"00"}]}"#;
        let proxy = MockProxy::always(Reply::status(200).body(body));

        let shown = proxy.client().content_show(&oio_url("NS/acct/photos/2024/cat.jpg")).unwrap();

        assert_eq!(shown.as_ref(), body.as_bytes());
        let req = proxy.last_request();
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.uri,
            "/v3.0/NS/content/show?acct=acct&ref=photos&path=2024%2Fcat.jpg"
        );
        assert_eq!(req.header("user-agent"), Some("oio-integration"));
    }

    #[test]
    fn test_should_delete_content_twice() {
        let proxy = MockProxy::always(Reply::status(204));
        let client = proxy.client();
        let url = oio_url("NS/acct/ref/obj");

        client.content_delete(&url).unwrap();
        client.content_delete(&url).unwrap();

        let requests = proxy.requests();
        assert_eq!(requests.len(), 2);
        for req in &requests {
            assert_eq!(req.method, Method::POST);
            assert_eq!(req.uri, "/v3.0/NS/content/delete?acct=acct&ref=ref&path=obj");
        }
    }

    #[test]
    fn test_should_link_content_with_json_body() {
        let proxy = MockProxy::always(Reply::status(204));

        proxy
            .client()
            .content_link(&oio_url("NS/acct/ref/alias"), "0123456789ABCDEF")
            .unwrap();

        let req = proxy.last_request();
        assert_eq!(req.method, Method::POST);
        assert!(req.uri.starts_with("/v3.0/NS/content/link?"));
        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body, serde_json::json!({"id": "0123456789ABCDEF"}));
    }

    #[test]
    fn test_should_prepare_content_and_read_headers() {
        let proxy = MockProxy::always(
            Reply::status(200)
                .header("x-oio-ns-chunk-size", "1048576")
                .header("x-oio-content-meta-version", "1700000000000000")
                .header("x-oio-content-id", "CAFEBABE")
                .header("content-type", "application/json")
                .body("[]"),
        );

        let out = proxy
            .client()
            .content_prepare(&oio_url("NS/acct/ref/big.bin"), 3_000_000, true)
            .unwrap();

        assert_eq!(out.chunk_size.as_deref(), Some("1048576"));
        assert_eq!(out.version.as_deref(), Some("1700000000000000"));
        assert_eq!(out.content_id.as_deref(), Some("CAFEBABE"));
        assert_eq!(out.body.as_ref(), b"[]");

        let req = proxy.last_request();
        assert_eq!(req.header("x-oio-action-mode"), Some("autocreate"));
        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body, serde_json::json!({"size": 3_000_000, "autocreate": true}));
        assert_eq!(req.header("content-length"), Some(req.body.len().to_string().as_str()));
    }

    #[test]
    fn test_should_prepare_without_autocreate_header() {
        let proxy = MockProxy::always(Reply::status(200));

        let out = proxy
            .client()
            .content_prepare(&oio_url("NS/acct/ref/obj"), 10, false)
            .unwrap();

        assert_eq!(out.chunk_size, None);
        assert_eq!(out.version, None);
        assert_eq!(out.content_id, None);
        assert_eq!(proxy.last_request().header("x-oio-action-mode"), None);
    }

    #[test]
    fn test_should_create_content_with_chunks() {
        let chunks = r#"[{"url":"http://10.0.0.1:6004/0A1B","pos":"0","size":42}]"#;
        let proxy = MockProxy::always(Reply::status(200).body("{}"));
        let input = ContentCreateInput::builder()
            .size(42)
            .chunks(chunks)
            .content_id("0A1B")
            .build();

        let body = proxy
            .client()
            .content_create(&oio_url("NS/acct/ref/obj"), &input)
            .unwrap();

        assert_eq!(body.as_ref(), b"{}");
        let req = proxy.last_request();
        assert_eq!(req.uri, "/v3.0/NS/content/create?acct=acct&ref=ref&path=obj&id=0A1B");
        assert_eq!(req.header("x-oio-content-meta-length"), Some("42"));
        assert_eq!(
            req.header("x-oio-content-meta-hash"),
            Some("00000000000000000000000000000000")
        );
        assert_eq!(req.header("x-oio-content-meta-policy"), Some("NONE"));
        assert_eq!(req.body.as_ref(), chunks.as_bytes());
    }

    #[test]
    fn test_should_stream_large_body() {
        let payload = vec![b'x'; 100_000];
        let proxy = MockProxy::always(Reply::status(200));
        let input = ContentCreateInput::builder()
            .size(payload.len() as u64)
            .chunks(payload.clone())
            .build();

        proxy
            .client()
            .content_create(&oio_url("NS/acct/ref/obj"), &input)
            .unwrap();

        let req = proxy.last_request();
        assert_eq!(req.body.len(), payload.len());
        assert_eq!(req.header("content-length"), Some("100000"));
        assert!(req.header("transfer-encoding").is_none());
    }
}
