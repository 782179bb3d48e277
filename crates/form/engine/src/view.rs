//! Layout rendering
//!
//! Turns the UI schema and a state snapshot into a tree of render-ready
//! nodes. Categorizations show only their active category.

use crate::definition::FormDefinition;
use crate::resolver::resolve_control;
use crate::state::FormState;
use crate::widgets::{FieldProps, Widget, WidgetView};
use form_types::{FormResult, UiSchemaElement};

/// A rendered layout node
#[derive(Clone, Debug, PartialEq)]
pub enum ViewNode {
    Vertical(Vec<ViewNode>),
    Horizontal(Vec<ViewNode>),
    Group {
        label: Option<String>,
        children: Vec<ViewNode>,
    },
    /// A categorization: every tab label, the active tab index and the
    /// active tab's content
    Tabs {
        tabs: Vec<String>,
        active: usize,
        children: Vec<ViewNode>,
    },
    Label(String),
    Field(WidgetView),
}

/// A rendered form
#[derive(Clone, Debug, PartialEq)]
pub struct FormView {
    pub root: ViewNode,
    pub read_only: bool,
    pub submit_error: Option<String>,
}

impl FormView {
    /// Render `definition` for `state`.
    ///
    /// `active_tab` selects a category by label; categorizations without a
    /// matching category show their first one.
    pub fn build(
        definition: &FormDefinition,
        state: &FormState,
        read_only: bool,
        active_tab: Option<&str>,
    ) -> FormResult<Self> {
        let renderer = Renderer {
            definition,
            state,
            read_only,
            active_tab,
        };
        Ok(Self {
            root: renderer.render(definition.ui_schema())?,
            read_only,
            submit_error: state.submit_error.clone(),
        })
    }

    /// Every rendered field in display order
    pub fn fields(&self) -> Vec<&WidgetView> {
        let mut fields = Vec::new();
        collect_fields(&self.root, &mut fields);
        fields
    }
}

fn collect_fields<'a>(node: &'a ViewNode, out: &mut Vec<&'a WidgetView>) {
    match node {
        ViewNode::Field(view) => out.push(view),
        ViewNode::Label(_) => {}
        ViewNode::Vertical(children)
        | ViewNode::Horizontal(children)
        | ViewNode::Group { children, .. }
        | ViewNode::Tabs { children, .. } => {
            for child in children {
                collect_fields(child, out);
            }
        }
    }
}

struct Renderer<'a> {
    definition: &'a FormDefinition,
    state: &'a FormState,
    read_only: bool,
    active_tab: Option<&'a str>,
}

impl Renderer<'_> {
    fn render(&self, element: &UiSchemaElement) -> FormResult<ViewNode> {
        Ok(match element {
            UiSchemaElement::Control(element) => {
                let control = resolve_control(self.definition.schema(), element, None)?;
                let props = FieldProps {
                    control: &control,
                    value: self.state.value(&control.path),
                    error: self.state.error(&control.path),
                    touched: self.state.is_touched(&control.path),
                    read_only: self.read_only,
                };
                ViewNode::Field(Widget::for_control(&control).view(&props))
            }
            UiSchemaElement::Label(label) => ViewNode::Label(label.text.clone()),
            UiSchemaElement::VerticalLayout(layout) => ViewNode::Vertical(self.render_all(&layout.elements)?),
            UiSchemaElement::HorizontalLayout(layout) => {
                ViewNode::Horizontal(self.render_all(&layout.elements)?)
            }
            UiSchemaElement::Group(layout) => ViewNode::Group {
                label: layout.label.clone(),
                children: self.render_all(&layout.elements)?,
            },
            UiSchemaElement::Categorization(layout) => {
                let tabs: Vec<(String, &[UiSchemaElement])> = layout
                    .elements
                    .iter()
                    .filter_map(|element| match element {
                        UiSchemaElement::Category(category) => {
                            Some((category.label.clone(), category.elements.as_slice()))
                        }
                        _ => None,
                    })
                    .collect();
                let active = self
                    .active_tab
                    .and_then(|wanted| tabs.iter().position(|(label, _)| label == wanted))
                    .unwrap_or(0);
                let children = match tabs.get(active) {
                    Some((_, elements)) => self.render_all(elements)?,
                    None => Vec::new(),
                };
                ViewNode::Tabs {
                    tabs: tabs.into_iter().map(|(label, _)| label).collect(),
                    active,
                    children,
                }
            }
            UiSchemaElement::Category(category) => ViewNode::Vertical(self.render_all(&category.elements)?),
        })
    }

    fn render_all(&self, elements: &[UiSchemaElement]) -> FormResult<Vec<ViewNode>> {
        elements.iter().map(|element| self.render(element)).collect()
    }
}
