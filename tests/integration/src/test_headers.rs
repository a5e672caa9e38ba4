//! Header ordering integration tests.

#[cfg(test)]
mod tests {
    use http::Method;
    use oio_proxy::{DefaultHeaders, HttpTransport, RequestContext, ResponseContext, exchange};

    use crate::{MockProxy, Reply};

    fn transport(proxy: &MockProxy) -> HttpTransport {
        HttpTransport::from_config(&proxy.config()).unwrap()
    }

    #[test]
    fn test_should_keep_request_order_per_header_name() {
        let proxy = MockProxy::always(Reply::status(200));
        let defaults = DefaultHeaders::new().with("X-Dup", "default");
        let request = RequestContext::new()
            .with_header("X-oio-mid", "m")
            .with_header("X-Dup", "caller");
        let url = format!("http://{}/v3.0/NS/content/show?acct=a&ref=r&path=p", proxy.host());

        exchange(&transport(&proxy), &defaults, &Method::GET, &url, Some(&request), None).unwrap();

        let req = proxy.last_request();
        assert_eq!(req.header_values("x-dup"), ["default", "caller"]);
        assert_eq!(req.header("x-oio-mid"), Some("m"));
    }

    #[test]
    fn test_should_keep_response_order_per_header_name() {
        let proxy = MockProxy::always(
            Reply::status(200)
                .header("x-oio-a", "1")
                .header("x-oio-b", "2")
                .header("x-oio-a", "3"),
        );
        let url = format!("http://{}/v3.0/NS/content/show?acct=a&ref=r&path=p", proxy.host());
        let mut response = ResponseContext::headers_only();

        exchange(
            &transport(&proxy),
            &DefaultHeaders::new(),
            &Method::GET,
            &url,
            None,
            Some(&mut response),
        )
        .unwrap();

        let a: Vec<_> = response.headers.iter().filter(|(n, _)| *n == "a").map(|(_, v)| v).collect();
        assert_eq!(a, ["1", "3"]);
        assert_eq!(response.headers.get("b"), Some("2"));
        assert_eq!(response.headers.len(), 3);
    }
}
