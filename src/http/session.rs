use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::ResponseBuilder;
use crate::http::writer::ResponseWriter;
use crate::router::Router;

/// Upper bound on the bytes read per connection. Longer requests are
/// parsed in truncated form.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Owns one accepted connection for exactly one request/response exchange.
pub struct Session<S = TcpStream> {
    stream: S,
    router: Arc<Router>,
    responses: ResponseBuilder,
    state: SessionState,
}

enum SessionState {
    Reading,
    Dispatching(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>, responses: ResponseBuilder) -> Self {
        Self {
            stream,
            router,
            responses,
            state: SessionState::Reading,
        }
    }

    /// Runs the session to completion and closes the connection.
    ///
    /// Faults while reading or dispatching get one best-effort 500; nothing
    /// here is reported back to the caller.
    pub async fn run(mut self) {
        if let Err(e) = self.drive().await {
            tracing::error!(error = %e, "Session failed, answering 500");

            let mut writer = ResponseWriter::from_response(&self.responses.make_500());
            let _ = writer.write_to_stream(&mut self.stream).await;
        }

        let _ = self.stream.shutdown().await;
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, SessionState::Closed) {
                SessionState::Reading => {
                    if let Some(req) = self.read_request().await? {
                        self.state = SessionState::Dispatching(req);
                    }
                }

                SessionState::Dispatching(req) => {
                    let response = self.dispatch(req).await?;
                    self.state = SessionState::Writing(ResponseWriter::new(response));
                }

                SessionState::Writing(mut writer) => {
                    // A failed write abandons the connection; no 500 follows.
                    if let Err(e) = writer.write_to_stream(&mut self.stream).await {
                        tracing::warn!(
                            error = %e,
                            unsent = writer.remaining(),
                            "Failed to write response"
                        );
                    }
                }

                SessionState::Closed => return Ok(()),
            }
        }
    }

    async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = self
            .stream
            .read(&mut buf)
            .await
            .context("failed to read request")?;

        if n == 0 {
            tracing::debug!("Peer closed before sending a request");
            return Ok(None);
        }

        Ok(Some(parse_request(&buf[..n])))
    }

    async fn dispatch(&self, req: Request) -> anyhow::Result<Bytes> {
        let router = Arc::clone(&self.router);
        let path = req.path.clone();

        // Handlers read files synchronously.
        let response = tokio::task::spawn_blocking(move || router.handle_request(&path))
            .await
            .context("route handler failed")?;

        if response.is_empty() {
            tracing::debug!(
                method = %req.method,
                path = %req.path,
                has_path = req.has_path(),
                "No route matched, answering 404"
            );
            return Ok(self.responses.make_404().to_bytes());
        }

        tracing::debug!(
            method = %req.method,
            path = %req.path,
            bytes = response.len(),
            "Route matched"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::NOT_FOUND_BODY;
    use std::io;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context as TaskContext, Poll};
    use tokio::io::{DuplexStream, ReadBuf};

    /// In-memory stream that can fail its reads or writes and records
    /// what the session sent.
    #[derive(Default)]
    struct FaultyStream {
        input: Vec<u8>,
        fail_read: bool,
        fail_write: bool,
        output: Arc<Mutex<Vec<u8>>>,
        write_calls: Arc<Mutex<usize>>,
    }

    impl AsyncRead for FaultyStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut TaskContext<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            if this.fail_read {
                return Poll::Ready(Err(io::ErrorKind::ConnectionReset.into()));
            }
            let n = this.input.len().min(buf.remaining());
            buf.put_slice(&this.input[..n]);
            this.input.drain(..n);
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for FaultyStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut TaskContext<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            *this.write_calls.lock().unwrap() += 1;
            if this.fail_write {
                return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
            }
            this.output.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut TaskContext<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn router_with_index() -> Arc<Router> {
        let responses = ResponseBuilder::new();
        let mut router = Router::new();
        router.add_route("/index.html", move || {
            responses.make_html("<h1>index</h1>").to_bytes()
        });
        Arc::new(router)
    }

    async fn exchange(router: Arc<Router>, request: &[u8]) -> Vec<u8> {
        let (mut client, server) = tokio::io::duplex(8192);
        let session = Session::<DuplexStream>::new(server, router, ResponseBuilder::new());
        let session = tokio::spawn(session.run());

        client.write_all(request).await.unwrap();
        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        session.await.unwrap();
        out
    }

    #[tokio::test]
    async fn serves_registered_route() {
        let out = exchange(router_with_index(), b"GET /index.html HTTP/1.1\r\n\r\n").await;
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\n<h1>index</h1>"));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let out = exchange(router_with_index(), b"GET /missing HTTP/1.1\r\n\r\n").await;
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.ends_with(NOT_FOUND_BODY));
    }

    #[tokio::test]
    async fn non_get_method_is_404() {
        let out = exchange(router_with_index(), b"POST /index.html HTTP/1.1\r\n\r\n").await;

        assert!(out.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
    }

    #[tokio::test]
    async fn clean_close_writes_nothing() {
        let (mut client, server) = tokio::io::duplex(1024);
        let session = Session::new(server, router_with_index(), ResponseBuilder::new());
        let session = tokio::spawn(session.run());

        client.shutdown().await.unwrap();
        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        session.await.unwrap();

        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn panicking_handler_is_500() {
        let mut router = Router::new();
        router.add_route("/boom", || -> Bytes { panic!("handler exploded") });

        let out = exchange(Arc::new(router), b"GET /boom HTTP/1.1\r\n\r\n").await;

        assert!(out.starts_with(b"HTTP/1.1 500 Internal Server Error\r\n"));
    }

    #[tokio::test]
    async fn oversized_request_line_is_truncated() {
        let long_path = format!("/{}", "a".repeat(2 * READ_BUFFER_SIZE));
        let responses = ResponseBuilder::new();
        let mut router = Router::new();
        router.add_route(long_path.clone(), move || responses.make_html("long").to_bytes());

        let request = format!("GET {} HTTP/1.1\r\n\r\n", long_path);
        let out = exchange(Arc::new(router), request.as_bytes()).await;

        assert!(out.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
    }

    #[tokio::test]
    async fn read_error_is_500() {
        let stream = FaultyStream {
            fail_read: true,
            ..Default::default()
        };
        let output = Arc::clone(&stream.output);

        Session::new(stream, router_with_index(), ResponseBuilder::new())
            .run()
            .await;

        let out = output.lock().unwrap();
        assert!(out.starts_with(b"HTTP/1.1 500 Internal Server Error\r\n"));
    }

    #[tokio::test]
    async fn write_error_abandons_connection() {
        let stream = FaultyStream {
            input: b"GET /index.html HTTP/1.1\r\n\r\n".to_vec(),
            fail_write: true,
            ..Default::default()
        };
        let output = Arc::clone(&stream.output);
        let write_calls = Arc::clone(&stream.write_calls);

        Session::new(stream, router_with_index(), ResponseBuilder::new())
            .run()
            .await;

        assert_eq!(*write_calls.lock().unwrap(), 1);
        assert!(output.lock().unwrap().is_empty());
    }
}
