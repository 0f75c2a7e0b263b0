use crate::helpers::spawn_app;

#[tokio::test]
async fn the_form_descriptor_carries_site_metadata_and_the_option_catalogue() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get_form_descriptor().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response body");
    assert!(body["title"].is_string());
    assert!(body["description"].is_string());
    let options = body["improvementOptions"]
        .as_array()
        .expect("improvementOptions should be an array");
    assert_eq!(options.len(), 7);
    assert!(
        options
            .iter()
            .any(|o| o == "No improvements needed, I was satisfied.")
    );
}
