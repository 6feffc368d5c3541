use indexmap::IndexMap;

#[derive(Default)]
struct Node {
    children: IndexMap<String, Node>,
}

/// Render a list of file paths as an ASCII directory tree.
///
/// Paths are sorted lexicographically before insertion, so sibling order at
/// every level follows the full sorted path, and the node map preserves that
/// insertion order. Directories get a trailing `/`. Returns "" for no paths;
/// no trailing newline otherwise.
///
/// ```text
/// ├── README.md
/// └── src/
///     ├── main.py
///     └── utils.py
/// ```
pub fn build_tree(paths: &[String]) -> String {
    if paths.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&str> = paths.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut root = Node::default();
    for path in sorted {
        let mut node = &mut root;
        for part in path.split('/') {
            node = node.children.entry(part.to_string()).or_default();
        }
    }

    let mut lines = Vec::new();
    render_node(&root, "", &mut lines);
    lines.join("\n")
}

fn render_node(node: &Node, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (index, (name, child)) in node.children.iter().enumerate() {
        let is_last = index + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };

        if child.children.is_empty() {
            lines.push(format!("{}{}{}", prefix, connector, name));
        } else {
            lines.push(format!("{}{}{}/", prefix, connector, name));
            let extension = if is_last { "    " } else { "│   " };
            render_node(child, &format!("{}{}", prefix, extension), lines);
        }
    }
}
