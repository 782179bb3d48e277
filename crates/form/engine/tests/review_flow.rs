//! End-to-end review form flows

use async_trait::async_trait;
use form_engine::{
    dispatch, FieldPath, FileRef, FileUploader, FormDefinition, FormEngine, FormError, FormValue,
    SubmitError, SubmitHandler, SubmitOutcome, UploadedFile, WidgetEvent, WidgetKind,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Default)]
struct Inbox {
    submissions: Mutex<Vec<Value>>,
}

#[async_trait]
impl SubmitHandler for Inbox {
    async fn submit(&self, values: Value) -> Result<(), SubmitError> {
        self.submissions.lock().push(values);
        Ok(())
    }
}

struct Storage;

#[async_trait]
impl FileUploader for Storage {
    async fn upload(&self, file: &FileRef) -> Result<UploadedFile, SubmitError> {
        Ok(UploadedFile {
            key: format!("k/{}", file.name),
            name: Some(file.name.clone()),
            url: None,
        })
    }

    fn file_url(&self, key: &str) -> String {
        format!("http://localhost:8080/api/uploads/{}", key)
    }
}

fn review_definition() -> FormDefinition {
    FormDefinition::from_json(
        json!({
            "type": "object",
            "required": ["decision"],
            "properties": {
                "decision": {
                    "type": "string",
                    "title": "Decision",
                    "oneOf": [
                        {"const": "APPROVED", "title": "Approved"},
                        {"const": "REJECTED", "title": "Rejected"}
                    ]
                },
                "remarks": {"type": "string", "title": "Remarks"},
                "inspectionReport": {"type": "string", "format": "file"}
            }
        }),
        json!({
            "type": "VerticalLayout",
            "elements": [
                {"type": "Control", "scope": "#/properties/decision"},
                {"type": "Control", "scope": "#/properties/remarks", "options": {"multi": true}},
                {"type": "Control", "scope": "#/properties/inspectionReport", "options": {"accept": ".pdf"}}
            ]
        }),
    )
    .unwrap()
}

#[tokio::test]
async fn test_reviewer_fixes_errors_then_submits() {
    let inbox = Arc::new(Inbox::default());
    let engine = FormEngine::new(review_definition(), inbox.clone()).with_uploader(Arc::new(Storage));

    // Nothing chosen yet: the submit is blocked and the error becomes visible
    let outcome = engine.handle_submit().await;
    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(
        engine.visible_error("decision").unwrap().as_deref(),
        Some("is a required property")
    );

    engine
        .dispatch_event("decision", WidgetEvent::Input("APPROVED".into()))
        .unwrap();
    engine
        .dispatch_event("remarks", WidgetEvent::Input("Samples conform".into()))
        .unwrap();
    let rejected = engine.dispatch_event(
        "inspectionReport",
        WidgetEvent::FileSelected(FileRef::new("photo.jpg", "image/jpeg", "jpg")),
    );
    assert!(matches!(
        rejected,
        Err(FormError::FileRejected { ref field, .. }) if field == "inspectionReport"
    ));
    assert_eq!(engine.value("inspectionReport").unwrap(), None);
    engine
        .dispatch_event(
            "inspectionReport",
            WidgetEvent::FileSelected(FileRef::new("report.pdf", "application/pdf", "pdf")),
        )
        .unwrap();

    assert_eq!(engine.visible_error("decision").unwrap(), None);
    assert!(engine.handle_submit().await.is_submitted());

    let submissions = inbox.submissions.lock();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0],
        json!({
            "decision": "APPROVED",
            "remarks": "Samples conform",
            "inspectionReport": "k/report.pdf"
        })
    );
}

#[tokio::test]
async fn test_unset_remarks_are_absent() {
    let inbox = Arc::new(Inbox::default());
    let engine = FormEngine::new(review_definition(), inbox.clone());
    engine.set_value("decision", "REJECTED").unwrap();

    assert!(engine.handle_submit().await.is_submitted());
    assert_eq!(inbox.submissions.lock()[0], json!({"decision": "REJECTED"}));
}

#[test]
fn test_decision_offers_exactly_the_declared_options() {
    let definition = review_definition();
    let control = definition
        .control(&FieldPath::parse("decision").unwrap())
        .unwrap();

    let WidgetKind::Select { options, .. } = dispatch(control) else {
        panic!("decision should render as a select");
    };
    let pairs: Vec<(Value, &str)> = options
        .iter()
        .map(|o| (o.value.clone(), o.label.as_str()))
        .collect();
    assert_eq!(options.len(), 2);
    assert_eq!(
        pairs,
        vec![(json!("APPROVED"), "Approved"), (json!("REJECTED"), "Rejected")]
    );

    let engine = FormEngine::new(definition, Arc::new(Inbox::default()));
    engine.set_value("decision", "APPROVED").unwrap();
    assert!(!engine.validate().contains_key("decision"));
    engine.set_value("decision", "MAYBE").unwrap();
    assert_eq!(
        engine.validate().get("decision").map(String::as_str),
        Some("must be equal to one of the allowed values")
    );
}

#[test]
fn test_view_reflects_state() {
    let engine = FormEngine::new(review_definition(), Arc::new(Inbox::default()));
    engine.set_value("decision", "REJECTED").unwrap();

    let view = engine.view(None).unwrap();
    let fields = view.fields();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].label, "Decision");
    assert_eq!(fields[0].display, "Rejected");
    assert_eq!(fields[1].kind.name(), "textarea");
    assert_eq!(fields[2].kind.name(), "file");
}

proptest! {
    #[test]
    fn prop_errors_match_fresh_validation(
        edits in proptest::collection::vec((0usize..3, "[A-Z]{0,9}"), 0..12)
    ) {
        let engine = FormEngine::new(review_definition(), Arc::new(Inbox::default()));
        let fields = ["decision", "remarks", "decision"];
        for (field, text) in &edits {
            engine.set_value(fields[*field], FormValue::from(text.as_str())).unwrap();
        }
        let incremental = engine.errors();
        prop_assert_eq!(&incremental, &engine.validate());

        let decision = engine.value("decision").unwrap();
        let decision_ok = matches!(
            decision.as_ref().and_then(FormValue::as_str),
            Some("APPROVED") | Some("REJECTED")
        );
        prop_assert_eq!(incremental.contains_key("decision"), !decision_ok);
    }
}
