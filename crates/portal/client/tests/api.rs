//! Adapter behaviour against mock portal services

use form_engine::{
    FileRef, FileUploader, FormDefinition, FormEngine, SubmitError, SubmitHandler, SubmitOutcome,
    WidgetEvent,
};
use portal_client::{
    cancellable, ApprovalSubmitHandler, CancellationToken, ClientError, HttpFileStore, PortalClient,
    ReviewSubmitHandler, TaskSubmitHandler,
};
use portal_types::{ApplicationQuery, Decision, HsCodeQuery, StepStatus};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PortalClient {
    PortalClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn consignment_json() -> serde_json::Value {
    json!({
        "id": "c-1",
        "tradeFlow": "IMPORT",
        "traderId": "trader-123",
        "state": "IN_PROGRESS",
        "items": [{
            "hsCodeID": "0902.30.11",
            "steps": [
                {"stepId": "general_info", "type": "TRADER_FORM", "status": "COMPLETED", "taskId": "t-1"},
                {"stepId": "npqs", "type": "OGA_FORM", "status": "IN_PROGRESS", "dependsOn": ["general_info"], "taskId": "t-2"}
            ]
        }],
        "createdAt": "2026-01-16T14:30:00Z",
        "updatedAt": "2026-01-16T15:00:00Z"
    })
}

#[tokio::test]
async fn test_list_and_get_consignments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/consignments"))
        .and(query_param("traderId", "trader-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [consignment_json()], "total": 1, "page": 1, "pageSize": 20
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/consignments/c-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(consignment_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/consignments/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    let page = client.list_consignments("trader-123").await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].primary_hs_code(), Some("0902.30.11"));

    let consignment = client.get_consignment("c-1").await.unwrap().unwrap();
    assert_eq!(consignment.step_for_task("t-2").unwrap().status, StepStatus::InProgress);

    assert!(client.get_consignment("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_server_error_is_not_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/consignments/c-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database unavailable"})))
        .mount(&server)
        .await;

    match client(&server).get_consignment("c-1").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hs_code_search_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/hscodes"))
        .and(query_param("hsCodeStartsWith", "0902"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "h-1", "hsCode": "0902.10", "description": "Green tea", "category": "Tea"}],
            "total": 1, "page": 1, "pageSize": 10
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .search_hs_codes(&HsCodeQuery::starts_with("0902").with_limit(10))
        .await
        .unwrap();
    assert_eq!(page.items[0].hs_code, "0902.10");
}

#[tokio::test]
async fn test_fetch_task_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(json!({
            "task_id": "t-1", "consignment_id": "c-1", "payload": {"action": "FETCH_FORM"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {
                "status": "SUBMITTED",
                "message": "",
                "data": {"title": "General Information", "schema": {"type": "object", "properties": {}}}
            }
        })))
        .mount(&server)
        .await;

    let response = client(&server).fetch_task_form("t-1", "c-1").await.unwrap();
    let result = response.result.unwrap();
    assert!(result.is_read_only());
    assert_eq!(result.data.title, "General Information");
}

#[tokio::test]
async fn test_task_submit_handler() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_partial_json(json!({"payload": {"action": "SUBMIT_FORM", "content": {"ok": true}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "message": "Submitted", "taskId": "t-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_partial_json(json!({"payload": {"action": "DRAFT"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false, "message": "Task is locked", "taskId": "t-1"
        })))
        .mount(&server)
        .await;

    let handler = TaskSubmitHandler::new(client(&server), "t-1", "c-1");
    handler.submit(json!({"ok": true})).await.unwrap();

    let draft = handler.clone().as_draft();
    assert_eq!(
        draft.submit(json!({"ok": false})).await,
        Err(SubmitError::Rejected("Task is locked".into()))
    );
}

#[tokio::test]
async fn test_oga_listing_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oga/applications"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"taskId": "t-2", "consignmentId": "c-1", "formId": "f", "status": "PENDING"}
        ])))
        .mount(&server)
        .await;

    let page = client(&server)
        .list_applications(&ApplicationQuery::default().with_status("PENDING"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert!(page.items[0].status.is_reviewable());
}

#[tokio::test]
async fn test_review_rejection_surfaces_in_engine() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/oga/applications/t-2/review"))
        .and(body_json(json!({"decision": "APPROVED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false, "error": "Application already reviewed"
        })))
        .mount(&server)
        .await;

    let definition = FormDefinition::from_json(
        json!({
            "type": "object",
            "required": ["decision"],
            "properties": {"decision": {"type": "string", "enum": ["APPROVED", "REJECTED"]}}
        }),
        json!({}),
    )
    .unwrap();
    let engine = FormEngine::new(
        definition,
        Arc::new(ReviewSubmitHandler::new(client(&server), "t-2")),
    );
    engine.set_value("decision", "APPROVED").unwrap();

    match engine.handle_submit().await {
        SubmitOutcome::Failed(SubmitError::Rejected(message)) => {
            assert_eq!(message, "Application already reviewed");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(engine.submit_error().is_some());
    assert_eq!(
        engine.value("decision").unwrap().and_then(|v| v.as_str().map(String::from)),
        Some("APPROVED".to_string())
    );
}

#[tokio::test]
async fn test_approval_merges_trader_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/oga/applications/t-2/approve"))
        .and(body_json(json!({
            "formData": {"netWeight": 5000, "decision": "APPROVED"},
            "consignmentId": "c-1",
            "decision": "APPROVED",
            "reviewerName": "Officer",
            "comments": "Cleared"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let handler = ApprovalSubmitHandler::new(client(&server), "t-2", "c-1", Decision::Approved, "Officer")
        .with_comments("Cleared")
        .with_trader_data(json!({"netWeight": 5000}));
    handler.submit(json!({"decision": "APPROVED"})).await.unwrap();
}

#[tokio::test]
async fn test_upload_then_submit_with_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "uploads/7f/certificate.pdf", "name": "certificate.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_partial_json(json!({
            "payload": {"content": {"certificate": "uploads/7f/certificate.pdf"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "taskId": "t-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let store = Arc::new(HttpFileStore::new(client.clone()));
    assert_eq!(
        store.file_url("uploads/7f/certificate.pdf"),
        format!("{}/api/uploads/uploads/7f/certificate.pdf", server.uri())
    );

    let definition = FormDefinition::from_json(
        json!({
            "type": "object",
            "required": ["certificate"],
            "properties": {"certificate": {"type": "string", "format": "file", "title": "Certificate"}}
        }),
        json!(null),
    )
    .unwrap();
    let engine = FormEngine::new(definition, Arc::new(TaskSubmitHandler::new(client, "t-1", "c-1")))
        .with_uploader(store);

    engine
        .dispatch_event(
            "certificate",
            WidgetEvent::FileSelected(FileRef::new("certificate.pdf", "application/pdf", b"%PDF-1.7".to_vec())),
        )
        .unwrap();
    assert!(engine.handle_submit().await.is_submitted());
}

#[tokio::test]
async fn test_upload_failure_is_reported_per_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
        .mount(&server)
        .await;

    let store = HttpFileStore::new(client(&server));
    let file = FileRef::new("scan.png", "image/png", vec![0u8; 16]);
    match store.upload(&file).await {
        Err(SubmitError::Upload { name, message }) => {
            assert_eq!(name, "scan.png");
            assert!(message.contains("too large"));
        }
        other => panic!("expected upload error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_fetch_returns_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oga/applications/t-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"taskId": "t-9", "status": "PENDING"}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = cancellable(&token, client.get_application("t-9")).await;
    assert!(matches!(result, Err(ClientError::Cancelled)));
}
