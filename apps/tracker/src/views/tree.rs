use crate::models::{Application, FormField, Status};
use crate::notify::NoticeLevel;

/// What a control does when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ChangeStatus { id: i64 },
    Reject { id: i64 },
    Details { id: i64 },
}

/// Renderer-agnostic view tree produced by the pure render functions.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    /// Stacked vertically.
    Column(Vec<ViewNode>),
    /// Laid out inline.
    Group(Vec<ViewNode>),
    Heading(String),
    Text(String),
    Message {
        level: NoticeLevel,
        text: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<ViewNode>>,
    },
    Badge {
        class: String,
        label: String,
    },
    Link {
        href: String,
        label: String,
    },
    DisabledLink {
        label: String,
        reason: String,
    },
    Select {
        options: Vec<String>,
        selected: String,
        action: Action,
    },
    Button {
        label: String,
        action: Action,
    },
    FieldError {
        field: FormField,
        message: String,
    },
}

impl ViewNode {
    pub fn text(value: impl Into<String>) -> Self {
        ViewNode::Text(value.into())
    }

    pub fn message(level: NoticeLevel, text: impl Into<String>) -> Self {
        ViewNode::Message {
            level,
            text: text.into(),
        }
    }

    pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
        ViewNode::Link {
            href: href.into(),
            label: label.into(),
        }
    }

    /// Depth-first search, handy for assertions on rendered output.
    #[cfg(test)]
    pub fn find<'a>(&'a self, pred: &dyn Fn(&ViewNode) -> bool) -> Vec<&'a ViewNode> {
        let mut found = Vec::new();
        self.collect(pred, &mut found);
        found
    }

    #[cfg(test)]
    fn collect<'a>(&'a self, pred: &dyn Fn(&ViewNode) -> bool, out: &mut Vec<&'a ViewNode>) {
        if pred(self) {
            out.push(self);
        }
        match self {
            ViewNode::Column(children) | ViewNode::Group(children) => {
                for child in children {
                    child.collect(pred, out);
                }
            }
            ViewNode::Table { rows, .. } => {
                for cell in rows.iter().flatten() {
                    cell.collect(pred, out);
                }
            }
            _ => {}
        }
    }
}

/// Badge class convention: `status-<lowercased status>`.
/// Values outside the enumeration keep their label but get a neutral class.
pub fn status_badge(app: &Application) -> ViewNode {
    let label = app.status_label().to_string();
    let class = match Status::parse(&label) {
        Some(status) => format!("status-{}", status.as_str().to_lowercase()),
        None => "status-unrecognized".to_string(),
    };
    ViewNode::Badge { class, label }
}
