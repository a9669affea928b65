pub use chat_server::testing::{DOCTOR_TOKEN, OTHER_PATIENT_TOKEN, PATIENT_TOKEN};

/// Backend on an ephemeral port; returns its base URL.
pub async fn spawn_backend() -> String {
    chat_server::testing::spawn_server()
        .await
        .expect("Failed to start test backend")
}
