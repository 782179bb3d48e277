//! Deployment instances and their review forms

use crate::{ConfigError, ConfigResult};
use form_engine::FormDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Instances compiled into the binary
const BUILTIN_INSTANCES: &[(&str, &str)] = &[
    ("fcau", include_str!("presets/fcau.json")),
    ("npqs", include_str!("presets/npqs.json")),
];

/// Suffix of instance files in a config directory
pub const INSTANCE_FILE_SUFFIX: &str = ".config.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub app_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub border_radius: String,
}

/// Portal sections an instance enables
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default)]
    pub pre_consignment: bool,
    #[serde(default)]
    pub consignment_management: bool,
    #[serde(default)]
    pub reporting_dashboard: bool,
}

// ── Wire shape ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceFile {
    instance_id: Option<String>,
    branding: Branding,
    #[serde(default)]
    theme: Option<Theme>,
    #[serde(default)]
    features: Option<Features>,
    review_configs: ReviewConfigsFile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewConfigsFile {
    default_form_id: String,
    forms: Vec<ReviewFormFile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewFormFile {
    review_type: String,
    review_document_id: String,
    form: FormFile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormFile {
    schema: Value,
    #[serde(default)]
    ui_schema: Value,
}

// ── Validated config ─────────────────────────────────────────────────

/// A review form with its resolved definition
#[derive(Clone, Debug)]
pub struct ReviewFormConfig {
    pub review_type: String,
    pub review_document_id: String,
    pub definition: FormDefinition,
}

/// A validated deployment instance
#[derive(Clone, Debug)]
pub struct InstanceConfig {
    pub id: String,
    pub branding: Branding,
    pub theme: Option<Theme>,
    pub features: Features,
    pub default_form_id: String,
    forms: Vec<ReviewFormConfig>,
}

impl InstanceConfig {
    /// Parse and validate an instance document
    pub fn from_json_str(id: &str, json: &str) -> ConfigResult<Self> {
        let file: InstanceFile = serde_json::from_str(json)?;
        Self::from_file(id, file)
    }

    fn from_file(id: &str, file: InstanceFile) -> ConfigResult<Self> {
        if let Some(declared) = file.instance_id.as_deref() {
            if declared != id {
                tracing::warn!(instance = %id, declared = %declared, "Instance id differs from file name");
            }
        }

        let mut seen = HashSet::new();
        let mut forms = Vec::with_capacity(file.review_configs.forms.len());
        for form in file.review_configs.forms {
            if !seen.insert(form.review_document_id.clone()) {
                return Err(ConfigError::DuplicateReviewForm(form.review_document_id));
            }
            let definition = FormDefinition::from_json(form.form.schema, form.form.ui_schema)
                .map_err(|source| ConfigError::InvalidReviewForm {
                    form_id: form.review_document_id.clone(),
                    source,
                })?;
            forms.push(ReviewFormConfig {
                review_type: form.review_type,
                review_document_id: form.review_document_id,
                definition,
            });
        }

        let default_form_id = file.review_configs.default_form_id;
        if !seen.contains(&default_form_id) {
            return Err(ConfigError::ReviewFormNotFound {
                form_id: default_form_id,
            });
        }

        tracing::debug!(instance = %id, forms = forms.len(), "Instance config loaded");

        Ok(Self {
            id: id.to_string(),
            branding: file.branding,
            theme: file.theme,
            features: file.features.unwrap_or_default(),
            default_form_id,
            forms,
        })
    }

    pub fn review_forms(&self) -> &[ReviewFormConfig] {
        &self.forms
    }

    /// Select the review form for an application. `None` picks the
    /// instance default.
    pub fn review_form(&self, form_id: Option<&str>) -> ConfigResult<&ReviewFormConfig> {
        let wanted = form_id.unwrap_or(&self.default_form_id);
        self.forms
            .iter()
            .find(|f| f.review_document_id == wanted)
            .ok_or_else(|| ConfigError::ReviewFormNotFound {
                form_id: wanted.to_string(),
            })
    }
}

// ── Loading ──────────────────────────────────────────────────────────

/// Ids of the built-in instances
pub fn builtin_instances() -> Vec<&'static str> {
    BUILTIN_INSTANCES.iter().map(|(id, _)| *id).collect()
}

/// Load a built-in instance
pub fn load_instance(instance: &str) -> ConfigResult<InstanceConfig> {
    let (_, json) = BUILTIN_INSTANCES
        .iter()
        .find(|(id, _)| *id == instance)
        .ok_or_else(|| ConfigError::InstanceNotFound {
            instance: instance.to_string(),
            available: builtin_instances().into_iter().map(String::from).collect(),
        })?;
    InstanceConfig::from_json_str(instance, json)
}

/// Load `<dir>/<instance>.config.json`
pub fn load_instance_from_dir(dir: &Path, instance: &str) -> ConfigResult<InstanceConfig> {
    let path = dir.join(format!("{}{}", instance, INSTANCE_FILE_SUFFIX));
    if !path.is_file() {
        return Err(ConfigError::InstanceNotFound {
            instance: instance.to_string(),
            available: instances_in_dir(dir)?,
        });
    }

    let json = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(instance = %instance, path = %path.display(), "Loading instance config");
    InstanceConfig::from_json_str(instance, &json)
}

/// Instance ids found in a config directory, sorted
pub fn instances_in_dir(dir: &Path) -> ConfigResult<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut ids: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(INSTANCE_FILE_SUFFIX))
                .map(String::from)
        })
        .collect();
    ids.sort();
    Ok(ids)
}
