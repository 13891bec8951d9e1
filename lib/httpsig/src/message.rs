use http::{HeaderMap, Method, Request, Response, Uri};

/// HTTP message the signatures and digests are computed over
///
/// The body is held in memory, so it stays readable for whoever handles the message next
pub trait HttpMessage {
    /// Header map of the message
    fn headers(&self) -> &HeaderMap;

    /// Mutable header map of the message
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Method and URI of the message, if it is a request
    fn request_target(&self) -> Option<(&Method, &Uri)>;

    /// Raw body bytes
    fn body(&self) -> &[u8];
}

impl<B> HttpMessage for Request<B>
where
    B: AsRef<[u8]>,
{
    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        Request::headers_mut(self)
    }

    fn request_target(&self) -> Option<(&Method, &Uri)> {
        Some((self.method(), self.uri()))
    }

    fn body(&self) -> &[u8] {
        Request::body(self).as_ref()
    }
}

impl<B> HttpMessage for Response<B>
where
    B: AsRef<[u8]>,
{
    fn headers(&self) -> &HeaderMap {
        Response::headers(self)
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        Response::headers_mut(self)
    }

    fn request_target(&self) -> Option<(&Method, &Uri)> {
        None
    }

    fn body(&self) -> &[u8] {
        Response::body(self).as_ref()
    }
}
