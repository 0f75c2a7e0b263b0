use roundtable_feedback::monitor::ConnectionState;

use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_reports_healthy_against_a_live_database() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get_health_check().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response body");
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn status_reports_the_monitors_latest_observation() {
    // Arrange
    let app = spawn_app().await;

    // Wait until the monitor's first probe has landed.
    let mut status_rx = app.monitor.subscribe();
    while status_rx.borrow().state == ConnectionState::Checking {
        status_rx
            .changed()
            .await
            .expect("The monitor went away before its first probe");
    }

    // Act
    let response = app.get_status().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response body");
    assert_eq!(body["state"], "healthy");
    assert!(body["lastCheckedAt"].is_string());
}
