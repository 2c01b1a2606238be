mod common;

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use common::TestApp;
use startupquest_api::client::publish;
use startupquest_api::config::PublishTarget;

async fn spawn_server(app: &TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn publish_forwards_key_and_returns_body() {
    let app = TestApp::new("letmein", 20, Duration::from_secs(60));
    let url = spawn_server(&app).await;
    let client = reqwest::Client::new();

    let result = publish(&client, &url, PublishTarget::Rubrics, "letmein").await.unwrap();
    assert_eq!(result.status, 200);
    assert_eq!(result.body["ok"], true);
    assert!(app.state.store.get_rubric("intro-quiz").unwrap().is_some());
}

#[tokio::test]
async fn publish_surfaces_rejection_and_peer_address() {
    let app = TestApp::new("letmein", 20, Duration::from_secs(60));
    let url = spawn_server(&app).await;
    let client = reqwest::Client::new();

    let result = publish(&client, &format!("{url}/"), PublishTarget::Lessons, "wrong").await.unwrap();
    assert_eq!(result.status, 401);
    assert_eq!(result.body["error"], "Unauthorized");

    let events = app.events.0.lock().unwrap();
    assert_eq!(events[0].client_id, "127.0.0.1");
    assert_eq!(events[0].route, "/admin/lessons/sync");
}

#[tokio::test]
async fn unreachable_api_is_an_error() {
    let client = reqwest::Client::new();
    // bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let res = publish(&client, &format!("http://{addr}"), PublishTarget::Rubrics, "k").await;
    assert!(res.is_err());
}
