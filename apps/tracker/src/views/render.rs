//! Terminal UI layer: turns a `ViewNode` tree into plain text.

use super::tree::ViewNode;

pub fn render_text(node: &ViewNode) -> String {
    let mut out = String::new();
    block(node, &mut out);
    out.truncate(out.trim_end().len());
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn block(node: &ViewNode, out: &mut String) {
    match node {
        ViewNode::Column(children) => {
            for child in children {
                block(child, out);
            }
        }
        ViewNode::Heading(title) => {
            if !out.is_empty() {
                out.push('\n');
            }
            push_line(out, title);
            push_line(out, &"=".repeat(title.chars().count()));
        }
        ViewNode::Table { headers, rows } => table(headers, rows, out),
        ViewNode::Link { href, label } => push_line(out, &format!("{label}: {href}")),
        ViewNode::FieldError { field, message } => {
            push_line(out, &format!("  ! {}: {message}", field.label()))
        }
        other => push_line(out, &inline(other)),
    }
}

/// Single-line rendering, used for table cells and simple blocks.
pub fn inline(node: &ViewNode) -> String {
    match node {
        ViewNode::Text(text) | ViewNode::Heading(text) => text.clone(),
        ViewNode::Message { level, text } => format!("[{}] {text}", level.tag()),
        ViewNode::Badge { label, .. } => format!("[{label}]"),
        ViewNode::Link { label, .. } => label.clone(),
        ViewNode::DisabledLink { label, .. } => format!("{label} (n/a)"),
        ViewNode::Select { selected, .. } => format!("[{selected} v]"),
        ViewNode::Button { label, .. } => format!("({label})"),
        ViewNode::FieldError { field, message } => format!("{}: {message}", field.label()),
        ViewNode::Group(children) => join(children, " "),
        ViewNode::Column(children) => join(children, " / "),
        ViewNode::Table { rows, .. } => format!("({} rows)", rows.len()),
    }
}

fn join(children: &[ViewNode], sep: &str) -> String {
    children.iter().map(inline).collect::<Vec<_>>().join(sep)
}

fn table(headers: &[String], rows: &[Vec<ViewNode>], out: &mut String) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(inline).collect())
        .collect();

    let columns = headers
        .len()
        .max(cells.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; columns];
    for (i, header) in headers.iter().enumerate() {
        widths[i] = header.chars().count();
    }
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| -> String {
        (0..columns)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let pad = widths[i] - cell.chars().count();
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    push_line(out, &format_row(headers));
    push_line(
        out,
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        push_line(out, &format_row(row));
    }
}
