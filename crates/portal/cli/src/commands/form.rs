//! Terminal rendering and editing of engine-backed forms

use crate::output::{print_error, print_success, print_warning};
use anyhow::{anyhow, bail, Context};
use colored::*;
use form_engine::{
    FieldPath, FileField, FilePreview, FileRef, FormEngine, SubmitOutcome, ViewNode,
    WidgetEvent, WidgetKind, WidgetView,
};
use std::path::{Path, PathBuf};

/// A `field=value` pair from the command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub value: String,
}

pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok(Assignment {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Feed typed values through each field's widget, then blur it
pub fn apply_assignments(engine: &FormEngine, assignments: &[Assignment]) -> anyhow::Result<()> {
    for Assignment { field, value } in assignments {
        let path = FieldPath::parse(field)?;
        let control = engine
            .definition()
            .control(&path)
            .ok_or_else(|| anyhow!("Form has no field '{}'", field))?;

        let event = match form_engine::dispatch(control) {
            WidgetKind::Checkbox => WidgetEvent::Toggle(parse_bool(value)?),
            WidgetKind::File { .. } => bail!("'{}' is a file field; use --file {}=<path>", field, field),
            _ => WidgetEvent::Input(value.clone()),
        };

        if !engine.dispatch_event(field, event)? {
            print_warning(&format!("Value '{}' was not accepted for {}", value, field));
        }
        engine.dispatch_event(field, WidgetEvent::Blur)?;
    }
    Ok(())
}

/// Attach local files to file fields
pub fn attach_files(engine: &FormEngine, files: &[Assignment]) -> anyhow::Result<()> {
    for Assignment { field, value } in files {
        let path = PathBuf::from(value);
        let content = std::fs::read(&path).with_context(|| format!("Cannot read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(value.as_str())
            .to_string();
        let file = FileRef::new(name, mime_for(&path), content);

        if !engine.dispatch_event(field, WidgetEvent::FileSelected(file))? {
            bail!("'{}' does not take files", field);
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => bail!("expected true or false, got '{}'", other),
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Print the form's current view
pub fn print_form(engine: &FormEngine, title: &str) -> anyhow::Result<()> {
    let view = engine.view(None)?;
    println!("{}", title.bold());
    if view.read_only {
        println!("{}", "(read only)".dimmed());
    }
    print_node(engine, &view.root, 1);
    if let Some(error) = &view.submit_error {
        print_error(error);
    }
    Ok(())
}

fn print_node(engine: &FormEngine, node: &ViewNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        ViewNode::Vertical(children) | ViewNode::Horizontal(children) => {
            for child in children {
                print_node(engine, child, depth);
            }
        }
        ViewNode::Group { label, children } => {
            if let Some(label) = label {
                println!("{}{}", indent, label.underline());
            }
            for child in children {
                print_node(engine, child, depth + 1);
            }
        }
        ViewNode::Tabs {
            tabs,
            active,
            children,
        } => {
            let header: Vec<String> = tabs
                .iter()
                .enumerate()
                .map(|(i, tab)| {
                    if i == *active {
                        format!("[{}]", tab).bold().to_string()
                    } else {
                        tab.dimmed().to_string()
                    }
                })
                .collect();
            println!("{}{}", indent, header.join(" "));
            for child in children {
                print_node(engine, child, depth + 1);
            }
        }
        ViewNode::Label(text) => println!("{}{}", indent, text.italic()),
        ViewNode::Field(field) => print_field(engine, field, &indent),
    }
}

fn print_field(engine: &FormEngine, field: &WidgetView, indent: &str) {
    let marker = if field.required { "*" } else { "" };
    let value = match &field.kind {
        WidgetKind::Checkbox => (if field.checked { "[x]" } else { "[ ]" }).to_string(),
        WidgetKind::File { .. } => file_summary(engine, field),
        WidgetKind::Select { options, .. } if field.display.is_empty() => {
            let keys: Vec<String> = options.iter().map(|o| o.key()).collect();
            format!("<{}>", keys.join("|")).dimmed().to_string()
        }
        _ if field.display.is_empty() => "-".dimmed().to_string(),
        _ => field.display.clone(),
    };

    println!(
        "{}{}{} ({}): {}",
        indent,
        field.label,
        marker.red(),
        field.kind.name().dimmed(),
        value
    );
    if let Some(error) = &field.error {
        println!("{}  {}", indent, error.red());
    }
}

fn file_summary(engine: &FormEngine, field: &WidgetView) -> String {
    let Ok(path) = FieldPath::parse(&field.name) else {
        return field.display.clone();
    };
    let Some(control) = engine.definition().control(&path) else {
        return field.display.clone();
    };

    let mut file_field = FileField::new(control);
    let value = engine.value(&field.name).ok().flatten();
    file_field.sync(value.as_ref(), engine.uploader());

    match (file_field.display_name(), file_field.preview()) {
        (Some(name), Some(FilePreview::Remote { url })) => format!("{} <{}>", name, url),
        (Some(name), _) => format!("{} (pending upload)", name),
        (None, _) => file_field.size_hint().dimmed().to_string(),
    }
}

/// Report a submit outcome; failures become errors
pub fn report_outcome(engine: &FormEngine, outcome: SubmitOutcome, what: &str) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Submitted => {
            print_success(&format!("{} submitted", what));
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in &errors {
                let label = engine
                    .definition()
                    .control(&FieldPath::parse(field)?)
                    .map(|c| c.label.clone())
                    .unwrap_or_else(|| field.clone());
                print_error(&format!("{}: {}", label, message));
            }
            bail!("{} has {} invalid field(s)", what, errors.len())
        }
        SubmitOutcome::Busy => bail!("{} is already being submitted", what),
        SubmitOutcome::Failed(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("remarks=Looks good = fine").unwrap(),
            Assignment {
                field: "remarks".into(),
                value: "Looks good = fine".into()
            }
        );
        assert_eq!(parse_assignment("decision=").unwrap().value, "");
        assert!(parse_assignment("decision").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("report.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("scan")), "application/octet-stream");
    }

    #[test]
    fn test_attach_reports_rejected_file() {
        use form_engine::FormDefinition;
        use portal_client::{PortalClient, ReviewSubmitHandler};
        use std::sync::Arc;

        let definition = FormDefinition::from_json(
            serde_json::json!({
                "type": "object",
                "properties": {"certificate": {"type": "string", "format": "file"}}
            }),
            serde_json::json!({
                "type": "Control",
                "scope": "#/properties/certificate",
                "options": {"accept": ".pdf"}
            }),
        )
        .unwrap();
        let client = PortalClient::new("http://localhost:1", std::time::Duration::from_secs(1)).unwrap();
        let engine = FormEngine::new(definition, Arc::new(ReviewSubmitHandler::new(client, "t-1")));

        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("photo.png");
        std::fs::write(&photo, b"png").unwrap();

        let files = vec![Assignment {
            field: "certificate".into(),
            value: photo.display().to_string(),
        }];
        let err = attach_files(&engine, &files).unwrap_err();
        assert!(err.to_string().contains("Invalid file type"));
        assert_eq!(engine.value("certificate").unwrap(), None);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("Yes").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("perhaps").is_err());
    }
}
