pub use chat_server::testing::{DOCTOR_TOKEN, OTHER_PATIENT_TOKEN, PATIENT_TOKEN};

pub async fn spawn_server() -> String {
    chat_server::testing::spawn_server()
        .await
        .expect("Failed to start test server")
}
