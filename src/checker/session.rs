// src/checker/session.rs
// =============================================================================
// The rendering session the crawler drives.
//
// A session is the one long-lived resource of a crawl: it loads pages one at
// a time, answers "did this image load?", and issues lightweight link checks
// that share its cookie jar. The crawl loop owns it exclusively and closes it
// when the queue runs dry.
//
// `Session` is the seam; `HttpSession` is the implementation used by the
// binary. It renders the HTML exactly as served (no script execution), which
// is what a static documentation site produces anyway.
// =============================================================================

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// A successfully loaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// Final URL after redirects (what a browser reports as `page.url`)
    pub url: String,
    /// HTTP status of the final response. Error statuses still render.
    pub status: u16,
    pub html: String,
}

#[async_trait]
pub trait Session: Send + Sync {
    /// Loads `url` as the current page. Fails only when nothing could be
    /// rendered (transport error, unreadable body, closed session).
    async fn navigate(&mut self, url: &str) -> Result<LoadedPage>;

    /// Issues a lightweight request and returns the response status.
    async fn request_status(&self, url: &str) -> Result<u16>;

    /// True when the image at `src` loads and has a non-zero natural width.
    async fn image_loaded(&self, src: &str) -> bool;

    async fn close(&mut self);
}

pub struct HttpSession {
    client: Client,
    closed: bool,
}

impl HttpSession {
    /// Builds the session's HTTP client.
    ///
    /// Parameters:
    ///   timeout: per-request limit for page loads, image fetches and link
    ///            checks alike
    ///
    /// Returns: a ready session, or an error if the client cannot be built
    /// (TLS backend setup). That error aborts the run.
    ///
    /// The client keeps one cookie jar for everything, follows up to 10
    /// redirects, and identifies itself as "site-sentry/<version>".
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("site-sentry/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP session")?;

        Ok(Self {
            client,
            closed: false,
        })
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<LoadedPage> {
        if self.closed {
            bail!("session is closed");
        }

        let response = self.client.get(url).send().await?;
        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", final_url))?;

        debug!(url, final_url = %final_url, status, bytes = html.len(), "page loaded");

        Ok(LoadedPage {
            url: final_url,
            status,
            html,
        })
    }

    async fn request_status(&self, url: &str) -> Result<u16> {
        if self.closed {
            bail!("session is closed");
        }

        // The body is dropped unread; only the status matters
        let response = self.client.get(url).send().await?;
        Ok(response.status().as_u16())
    }

    async fn image_loaded(&self, src: &str) -> bool {
        if self.closed {
            return false;
        }

        // Inline images carry their bytes in the URL itself
        if let Some(rest) = src.strip_prefix("data:") {
            return rest
                .split_once(',')
                .map_or(false, |(_, payload)| !payload.is_empty());
        }

        let response = match self.client.get(src).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(src, error = %e, "image request failed");
                return false;
            }
        };

        if response.status().as_u16() >= 400 {
            return false;
        }

        // An HTML or text body cannot decode as an image (typically the
        // server's error page behind a 200)
        let is_text = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_ascii_lowercase().starts_with("text/"))
            .unwrap_or(false);
        if is_text {
            return false;
        }

        match response.bytes().await {
            Ok(bytes) => !bytes.is_empty(),
            Err(e) => {
                debug!(src, error = %e, "image body unreadable");
                false
            }
        }
    }

    async fn close(&mut self) {
        self.closed = true;
        debug!("session closed");
    }
}

#[cfg(test)]
mod test_server {
    // Minimal HTTP/1.1 server for exercising the real client. Each
    // connection serves one request and is closed.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub struct Reply {
        pub status: u16,
        pub headers: Vec<(&'static str, String)>,
        pub body: Vec<u8>,
    }

    impl Reply {
        pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
            Self {
                status,
                headers: vec![("Content-Type", content_type.to_string())],
                body: body.into(),
            }
        }

        pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
            self.headers.push((name, value.into()));
            self
        }
    }

    /// Starts a server on a random local port and returns its origin
    /// (e.g. "http://127.0.0.1:41234"). `route` maps (path, raw request
    /// head) to a reply.
    pub async fn serve<F>(route: F) -> String
    where
        F: Fn(&str, &str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&head).to_string();
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let reply = route(&path, &head);

                let mut out = format!("HTTP/1.1 {} Reply\r\n", reply.status);
                for (name, value) in &reply.headers {
                    out.push_str(&format!("{}: {}\r\n", name, value));
                }
                out.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n",
                    reply.body.len()
                ));

                let _ = socket.write_all(out.as_bytes()).await;
                let _ = socket.write_all(&reply.body).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    /// An origin nothing is listening on.
    pub async fn dead_origin() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}
