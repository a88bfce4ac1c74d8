//! Refresh Scheduler
//!
//! Runs one load cycle immediately at startup and one per interval tick
//! thereafter. Each cycle is a full fetch, normalize, render, commit pass;
//! a failed cycle commits the error state and the next tick gets an
//! independent chance to succeed. No error escapes the cycle boundary.

use std::sync::Arc;
use std::time::Duration;

use crate::manifest::{self, ManifestLoader};
use crate::render;
use crate::view::{CycleOutcome, PageView};

/// Run one full load cycle against the view
pub async fn run_cycle(loader: &ManifestLoader, view: &PageView) {
    let token = view.begin().await;
    let outcome = load_outcome(loader).await;

    if !view.commit(token, outcome).await {
        tracing::debug!("Discarded stale load cycle output");
    }
}

/// Fetch and render, folding every failure into the error state
async fn load_outcome(loader: &ManifestLoader) -> CycleOutcome {
    match loader.fetch().await {
        Ok(manifest) => {
            let mut messages = manifest::normalize(&manifest);
            manifest::sort(&mut messages);

            tracing::info!("Loaded {} messages from manifest", messages.len());

            if messages.is_empty() {
                CycleOutcome::Empty {
                    markup: render::render_empty(),
                }
            } else {
                let count = messages.len();
                CycleOutcome::Rendered {
                    markup: render::render_messages(&messages),
                    count,
                }
            }
        }
        Err(e) => {
            tracing::error!("Error fetching messages: {}", e);
            CycleOutcome::Error {
                markup: render::render_error(&e.to_string()),
                message: e.to_string(),
            }
        }
    }
}

/// Spawn the refresh task. The first tick fires immediately, then one
/// cycle per interval.
pub fn spawn(
    loader: Arc<ManifestLoader>,
    view: Arc<PageView>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            run_cycle(&loader, &view).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManifestConfig;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    async fn serve_fixture(status: StatusCode, body: &'static str) -> SocketAddr {
        let app = Router::new().route(
            "/messages/manifest.json",
            get(move || async move { (status, body) }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    fn loader_for(addr: SocketAddr) -> ManifestLoader {
        ManifestLoader::new(&ManifestConfig {
            base_url: format!("http://{}", addr),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_cycle_renders_sorted_cards() {
        let addr = serve_fixture(
            StatusCode::OK,
            r#"{"messages": [
                {"author": "Old", "message": "first", "timestamp": "2026-01-01T00:00:00Z", "filename": "old.json"},
                {"author": "New", "message": "second", "timestamp": "2026-02-01T00:00:00Z", "filename": "new.json"}
            ]}"#,
        )
        .await;

        let view = PageView::new();
        run_cycle(&loader_for(addr), &view).await;

        let container = view.container().await;
        let new_pos = container.find("New").unwrap();
        let old_pos = container.find("Old").unwrap();
        assert!(new_pos < old_pos, "newest message renders first");
        assert_eq!(view.status().await.message_count, 2);
    }

    #[tokio::test]
    async fn test_cycle_empty_manifest_renders_empty_state() {
        let addr = serve_fixture(StatusCode::OK, r#"{"messages": []}"#).await;

        let view = PageView::new();
        run_cycle(&loader_for(addr), &view).await;

        assert!(view.container().await.contains("No messages yet!"));
        assert_eq!(
            view.status().await.phase,
            crate::view::CyclePhase::Empty
        );
    }

    #[tokio::test]
    async fn test_cycle_404_renders_generate_hint() {
        let addr = serve_fixture(StatusCode::NOT_FOUND, "").await;

        let view = PageView::new();
        run_cycle(&loader_for(addr), &view).await;

        let container = view.container().await;
        assert!(container.contains("error-state"));
        assert!(container.contains("generate"));
    }

    #[tokio::test]
    async fn test_cycle_500_renders_status_code() {
        let addr = serve_fixture(StatusCode::INTERNAL_SERVER_ERROR, "").await;

        let view = PageView::new();
        run_cycle(&loader_for(addr), &view).await;

        assert!(view.container().await.contains("500"));
        assert_eq!(
            view.status().await.phase,
            crate::view::CyclePhase::Error
        );
    }

    #[tokio::test]
    async fn test_cycle_is_idempotent_for_unchanged_manifest() {
        let addr = serve_fixture(
            StatusCode::OK,
            r#"{"messages": [{"author": "Ada", "message": "hi", "filename": "ada.json"}]}"#,
        )
        .await;

        let loader = loader_for(addr);
        let view = PageView::new();

        run_cycle(&loader, &view).await;
        let first = view.container().await;

        run_cycle(&loader, &view).await;
        let second = view.container().await;

        assert_eq!(first, second);
        assert_eq!(view.status().await.cycles_completed, 2);
    }
}
