//! Control resolution
//!
//! Walks a UI schema in document order and binds every `Control` element
//! to the schema property its scope points at.

use form_types::{
    ControlElement, ControlOptions, FieldPath, FormError, FormResult, JsonSchema, SchemaProperty,
    UiSchemaElement,
};

/// The category (tab) a control lives in
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRef {
    /// Position of the category within its categorization
    pub index: usize,
    pub label: String,
}

/// A UI control bound to its schema property
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedControl {
    /// Data path derived from the scope
    pub path: FieldPath,
    pub scope: String,
    /// Display label: UI label, then schema title, then the humanized
    /// property name
    pub label: String,
    /// Whether the immediate parent object lists the property as required
    pub required: bool,
    pub property: SchemaProperty,
    /// Control options merged with the property's `format`
    pub options: ControlOptions,
    pub category: Option<CategoryRef>,
}

impl ResolvedControl {
    /// Dotted field name used as the state key
    pub fn name(&self) -> String {
        self.path.to_string()
    }

    pub fn description(&self) -> Option<&str> {
        self.property.description.as_deref()
    }

    /// Whether the control is on screen for the given active tab.
    ///
    /// Controls outside any categorization are always visible. When no tab
    /// is selected, or the selection is not one of `tabs`, the first
    /// category of each categorization is shown.
    pub fn is_visible(&self, active_tab: Option<&str>, tabs: &[String]) -> bool {
        match &self.category {
            None => true,
            Some(category) => match active_tab {
                Some(active) if tabs.iter().any(|t| t == active) => category.label == active,
                _ => category.index == 0,
            },
        }
    }
}

/// Resolve every control of `ui` against `schema`, in document order
pub fn resolve(schema: &JsonSchema, ui: &UiSchemaElement) -> FormResult<Vec<ResolvedControl>> {
    let mut controls = Vec::new();
    walk(schema, ui, None, &mut controls)?;
    Ok(controls)
}

fn walk(
    schema: &JsonSchema,
    element: &UiSchemaElement,
    category: Option<&CategoryRef>,
    out: &mut Vec<ResolvedControl>,
) -> FormResult<()> {
    match element {
        UiSchemaElement::Control(control) => {
            out.push(resolve_control(schema, control, category)?);
        }
        UiSchemaElement::Label(_) => {}
        UiSchemaElement::Categorization(layout) => {
            for (index, child) in layout.elements.iter().enumerate() {
                if let UiSchemaElement::Category(tab) = child {
                    let tab_ref = CategoryRef {
                        index,
                        label: tab.label.clone(),
                    };
                    for nested in &tab.elements {
                        walk(schema, nested, Some(&tab_ref), out)?;
                    }
                }
            }
        }
        UiSchemaElement::Category(tab) => {
            for nested in &tab.elements {
                walk(schema, nested, category, out)?;
            }
        }
        UiSchemaElement::VerticalLayout(layout)
        | UiSchemaElement::HorizontalLayout(layout)
        | UiSchemaElement::Group(layout) => {
            for nested in &layout.elements {
                walk(schema, nested, category, out)?;
            }
        }
    }
    Ok(())
}

/// Bind a single control element
pub fn resolve_control(
    schema: &JsonSchema,
    control: &ControlElement,
    category: Option<&CategoryRef>,
) -> FormResult<ResolvedControl> {
    let path = FieldPath::from_scope(&control.scope)?;
    let (property, required) =
        schema
            .property_at(&path)
            .ok_or_else(|| FormError::UnresolvedScope {
                scope: control.scope.clone(),
            })?;

    let label = control
        .label
        .clone()
        .or_else(|| option_label(&control.options))
        .or_else(|| property.title.clone())
        .unwrap_or_else(|| {
            let humanized = humanize_label(path.name());
            if humanized.is_empty() {
                path.name().to_string()
            } else {
                humanized
            }
        });

    Ok(ResolvedControl {
        scope: control.scope.clone(),
        label,
        required,
        options: control.options.merged_with(property),
        property: property.clone(),
        category: category.cloned(),
        path,
    })
}

fn option_label(options: &ControlOptions) -> Option<String> {
    options
        .extra
        .get("label")
        .and_then(|label| label.as_str())
        .map(str::to_string)
}

/// Turn a property name into a display label.
///
/// `countryOfOrigin` → `Country Of Origin`, `batch_lot_no` → `Batch Lot No`,
/// `HSCode` → `HS Code`.
pub fn humanize_label(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
