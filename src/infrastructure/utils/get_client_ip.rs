use actix_web::HttpRequest;

/// Extract the client's IP address from the request.
///
/// With `trust_x_forwarded_for`, the first non-empty entry of `X-Forwarded-For`
/// wins over the peer address. Returns `None` when neither is available.
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> Option<String> {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }
    }
    req.peer_addr().map(|addr| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const PEER: &str = "127.0.0.1:40000";

    #[test]
    fn prefers_first_forwarded_entry() {
        let req = TestRequest::default()
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.5, 10.0.0.1"))
            .to_http_request();

        assert_eq!(get_client_ip(&req, true).as_deref(), Some("203.0.113.5"));
    }

    #[test]
    fn falls_back_to_peer_when_header_is_blank_or_untrusted() {
        let req = TestRequest::default()
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("X-Forwarded-For", " , 10.0.0.1"))
            .to_http_request();
        assert_eq!(get_client_ip(&req, true).as_deref(), Some("127.0.0.1"));

        let req = TestRequest::default()
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.5"))
            .to_http_request();
        assert_eq!(get_client_ip(&req, false).as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn unknown_without_header_or_peer() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(get_client_ip(&req, true), None);
    }
}
