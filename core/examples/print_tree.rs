use oag_core::{build_schema_tree, NodeId, SchemaTree};
use openapiv3::OpenAPI;

fn main() {
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: print_tree <openapi-document>");
            std::process::exit(2);
        }
    };

    let raw = std::fs::read_to_string(&path).expect("Could not read the document");
    let spec: OpenAPI = serde_yaml::from_str(&raw).expect("Could not deserialize the document");

    let tree = build_schema_tree(&spec);
    for child in tree.node(tree.root()).children.values() {
        print_node(&tree, *child, 0);
    }
}

fn print_node(tree: &SchemaTree, id: NodeId, depth: usize) {
    let node = tree.node(id);
    let mut line = format!(
        "{}{} [{}]",
        "  ".repeat(depth),
        node.path_element,
        node.payload.kind()
    );
    if let Some(reference) = &node.reference {
        line.push_str(&format!(" (ref={})", reference));
    }
    println!("{}", line);

    for child in node.children.values() {
        print_node(tree, *child, depth + 1);
    }
}
