use isahc::{AsyncBody, Request, Response};

use crate::Error;

/// Thin wrapper over isahc. One attempt per request, platform default timeouts.
#[derive(Clone)]
pub(crate) struct HttpClient {
    inner: isahc::HttpClient,
}

impl HttpClient {
    pub fn new() -> Result<Self, Error> {
        let inner = isahc::HttpClient::builder()
            .default_header(
                "user-agent",
                format!("ip_tracker/{}", env!("CARGO_PKG_VERSION")),
            )
            .default_header("accept", "application/json")
            .build()?;

        Ok(Self { inner })
    }

    pub async fn send_async<B>(&self, request: Request<B>) -> Result<Response<AsyncBody>, Error>
    where
        B: Into<AsyncBody>,
    {
        let uri = request.uri().path().to_owned();
        self.inner.send_async(request).await.map_err(|err| {
            let err: Error = err.into();
            warn!("http client request to {} failed: {}", uri, err);
            err
        })
    }
}
