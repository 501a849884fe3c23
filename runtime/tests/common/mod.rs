//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use axum::Router;
use std::time::Duration;

use ionian_wx_runtime::sources::widget::WidgetTimeouts;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture server");
    let addr = listener.local_addr().expect("fixture server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fixture server");
    });
    format!("http://{addr}")
}

/// Widget timeouts small enough for tests that wait on missing fields.
pub fn quick_timeouts() -> WidgetTimeouts {
    WidgetTimeouts {
        navigation: Duration::from_secs(2),
        field: Duration::from_millis(40),
        consent: Duration::from_millis(40),
        consent_settle: Duration::from_millis(1),
        poll: Duration::from_millis(5),
    }
}
