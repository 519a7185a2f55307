//! Best-effort notification of a third-party endpoint.

use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct NotifyPayload<'a> {
    meet_link: &'a str,
}

#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    timeout: Duration,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// POSTs the target link to `url`, bounded by the configured timeout.
    pub async fn notify(&self, url: &str, target_link: &str) -> Result<reqwest::StatusCode, reqwest::Error> {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&NotifyPayload {
                meet_link: target_link,
            })
            .send()
            .await?;
        Ok(response.status())
    }

    /// Runs [`Notifier::notify`] in the background. Failures are logged and otherwise ignored.
    pub fn spawn_notify(&self, url: String, target_link: String) {
        let notifier = self.clone();
        tokio::spawn(async move {
            match notifier.notify(&url, &target_link).await {
                Ok(status) => info!("External endpoint notified at {} ({})", url, status),
                Err(e) => warn!("External endpoint notification to {} failed: {}", url, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::Value;
    use tokio::sync::mpsc;

    async fn spawn_receiver() -> (String, mpsc::Receiver<Value>) {
        let (tx, rx) = mpsc::channel(4);
        let app = Router::new().route(
            "/hook",
            post(move |Json(body): Json<Value>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(body).await;
                    "ok"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/hook", addr), rx)
    }

    #[tokio::test]
    async fn test_notify_posts_target_link() {
        let (url, mut rx) = spawn_receiver().await;
        let notifier = Notifier::new(Duration::from_secs(5));

        let status = notifier.notify(&url, "https://meet.example/abc").await.unwrap();
        assert!(status.is_success());

        let body = rx.recv().await.unwrap();
        assert_eq!(body["meet_link"], "https://meet.example/abc");
    }

    #[tokio::test]
    async fn test_spawn_notify_delivers_in_background() {
        let (url, mut rx) = spawn_receiver().await;
        let notifier = Notifier::new(Duration::from_secs(5));

        notifier.spawn_notify(url, "link-1".to_string());

        let body = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body["meet_link"], "link-1");
    }

    #[tokio::test]
    async fn test_notify_times_out_on_silent_endpoint() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let notifier = Notifier::new(Duration::from_millis(300));
        let started = std::time::Instant::now();
        let result = notifier
            .notify(&format!("http://{}/hook", addr), "link")
            .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_notify_unreachable_is_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier = Notifier::new(Duration::from_secs(2));
        assert!(notifier
            .notify(&format!("http://{}/hook", addr), "link")
            .await
            .is_err());
    }
}
