//! `fetch`-backed HTTP transport for the campus API client.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: every send fails with a [`TransportError`], which the
//! session treats like an unreachable server.
//!
//! ERROR HANDLING
//! ==============
//! Only failures that produce no response (network, CORS, body read) become
//! `TransportError`. Non-2xx statuses are returned as responses so the API
//! client can extract the server's message.

#![allow(clippy::unused_async)]

use campus::{HttpRequest, HttpResponse, Transport, TransportError};
#[cfg(feature = "csr")]
use campus::Method;

#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;

            let url = request.url.as_str();
            let mut builder = match request.method {
                Method::Get => Request::get(url),
                Method::Post => Request::post(url),
                Method::Put => Request::put(url),
                Method::Patch => Request::patch(url),
                Method::Delete => Request::delete(url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError(e.to_string()))?;

            let response = prepared.send().await.map_err(|e| TransportError(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| TransportError(e.to_string()))?;
            Ok(HttpResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(TransportError("HTTP is only available in the browser".to_owned()))
        }
    }
}
