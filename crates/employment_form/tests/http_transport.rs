use std::collections::BTreeMap;

use employment_form::{HttpTransport, SubmissionPayload, SubmissionTransport, SubmitError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> SubmissionPayload {
    SubmissionPayload {
        personal_data: BTreeMap::from([("fullName".to_string(), "Tan Mei Ling".to_string())]),
        employment: vec![BTreeMap::from([("company".to_string(), "Maxis".to_string())])],
        authenticated_email: Some("mei.ling@example.com".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn posts_the_payload_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/application"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::to_value(payload()).unwrap()))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(format!("{}/hooks/application", server.uri())).unwrap();
    transport.submit(&payload()).await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri()).unwrap();
    let err = transport.submit(&payload()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Rejected { status: 403 }));
}
