#![deny(missing_docs)]

//! # Document Walk
//!
//! Builds a [`SchemaTree`] by walking an OpenAPI document. The walk visits
//! `components` and `paths`, descends into inline schemas (properties,
//! composition keywords, additional properties) and fans request bodies and
//! responses out per content type. `$ref` payloads become leaves: the
//! definition they point at is reachable under its own path, so descending
//! into references would only duplicate subtrees and would loop on cyclic
//! documents.
//!
//! Maps are visited in sorted key order so the same document always yields
//! the same tree, node ids included.

use indexmap::IndexMap;
use openapiv3::{
    AdditionalProperties, Components, MediaType, OpenAPI, Operation, Parameter, ParameterData,
    ParameterSchemaOrContent, PathItem, ReferenceOr, Responses, Schema, SchemaKind, Type,
};

use crate::tree::{NodeId, PathNode, Payload, SchemaTree};

/// Walks `spec` and returns the tree of addressable schema locations.
pub fn build_schema_tree(spec: &OpenAPI) -> SchemaTree {
    let mut tree = SchemaTree::new();
    let root = tree.root();

    if let Some(components) = &spec.components {
        gather_components(&mut tree, root, components);
    }
    gather_paths(&mut tree, root, spec);

    tree
}

// --- Components ---

fn gather_components(tree: &mut SchemaTree, parent: NodeId, components: &Components) {
    let components_id = tree.add_child(parent, PathNode::structural("components"));

    if !components.schemas.is_empty() {
        let category = add_category(tree, components_id, "schemas", "Schema");
        for name in sorted_keys(&components.schemas) {
            let entry = &components.schemas[name];
            let id = tree.add_child(category, PathNode::new(name, Payload::Schema(entry.clone())));
            if let ReferenceOr::Item(schema) = entry {
                gather_nested_schemas(tree, id, schema);
            }
        }
    }

    if !components.parameters.is_empty() {
        let category = add_category(tree, components_id, "parameters", "Parameter");
        for name in sorted_keys(&components.parameters) {
            let entry = &components.parameters[name];
            let id =
                tree.add_child(category, PathNode::new(name, Payload::Parameter(entry.clone())));
            if let ReferenceOr::Item(parameter) = entry {
                gather_format_schema(tree, id, &parameter.parameter_data_ref().format);
            }
        }
    }

    if !components.headers.is_empty() {
        let category = add_category(tree, components_id, "headers", "Header");
        for name in sorted_keys(&components.headers) {
            let entry = &components.headers[name];
            let id = tree.add_child(category, PathNode::new(name, Payload::Header(entry.clone())));
            if let ReferenceOr::Item(header) = entry {
                gather_format_schema(tree, id, &header.format);
            }
        }
    }

    if !components.request_bodies.is_empty() {
        let category = add_category(tree, components_id, "requestBodies", "RequestBody");
        for name in sorted_keys(&components.request_bodies) {
            let entry = &components.request_bodies[name];
            let id =
                tree.add_child(category, PathNode::new(name, Payload::RequestBody(entry.clone())));
            if let ReferenceOr::Item(body) = entry {
                gather_content(tree, id, &body.content);
            }
        }
    }

    if !components.responses.is_empty() {
        let category = add_category(tree, components_id, "responses", "Response");
        for name in sorted_keys(&components.responses) {
            let entry = &components.responses[name];
            let id =
                tree.add_child(category, PathNode::new(name, Payload::Response(entry.clone())));
            if let ReferenceOr::Item(response) = entry {
                gather_content(tree, id, &response.content);
            }
        }
    }

    if !components.security_schemes.is_empty() {
        let category = add_category(tree, components_id, "securitySchemes", "SecurityScheme");
        for name in sorted_keys(&components.security_schemes) {
            let entry = &components.security_schemes[name];
            tree.add_child(category, PathNode::new(name, Payload::SecurityScheme(entry.clone())));
        }
    }
}

/// Adds a structural category node (`schemas`, `parameters`, ...) carrying
/// the singular element name its entries extend collided type names with.
fn add_category(tree: &mut SchemaTree, parent: NodeId, segment: &str, element_name: &str) -> NodeId {
    let mut node = PathNode::structural(segment);
    node.element_name = Some(element_name.to_string());
    tree.add_child(parent, node)
}

// --- Schemas ---

/// Descends into the nested schemas an inline schema embeds. When an
/// untyped schema carries both, named properties win over composition
/// keywords; additional properties are gathered either way.
fn gather_nested_schemas(tree: &mut SchemaTree, parent: NodeId, schema: &Schema) {
    match &schema.schema_kind {
        SchemaKind::Type(Type::Object(object)) => {
            if !object.properties.is_empty() {
                gather_properties(tree, parent, &object.properties);
            }
            gather_additional_properties(tree, parent, object.additional_properties.as_ref());
        }
        SchemaKind::AllOf { all_of } if !all_of.is_empty() => {
            gather_composite(tree, parent, "allOf", all_of);
        }
        SchemaKind::OneOf { one_of } if !one_of.is_empty() => {
            gather_composite(tree, parent, "oneOf", one_of);
        }
        SchemaKind::AnyOf { any_of } if !any_of.is_empty() => {
            gather_composite(tree, parent, "anyOf", any_of);
        }
        SchemaKind::Any(any) => {
            if !any.properties.is_empty() {
                gather_properties(tree, parent, &any.properties);
            } else if !any.all_of.is_empty() {
                gather_composite(tree, parent, "allOf", &any.all_of);
            } else if !any.one_of.is_empty() {
                gather_composite(tree, parent, "oneOf", &any.one_of);
            } else if !any.any_of.is_empty() {
                gather_composite(tree, parent, "anyOf", &any.any_of);
            }
            gather_additional_properties(tree, parent, any.additional_properties.as_ref());
        }
        _ => {}
    }
}

fn gather_properties(
    tree: &mut SchemaTree,
    parent: NodeId,
    properties: &IndexMap<String, ReferenceOr<Box<Schema>>>,
) {
    for name in sorted_keys(properties) {
        let property = &properties[name];
        let payload = Payload::Schema(property.clone().unbox());
        let id = tree.add_child(parent, PathNode::new(name, payload));
        if let ReferenceOr::Item(schema) = property {
            gather_nested_schemas(tree, id, schema);
        }
    }
}

/// Adds one child per composition branch under a structural keyword node.
/// Branches have no name of their own, so they are keyed by position.
fn gather_composite(
    tree: &mut SchemaTree,
    parent: NodeId,
    keyword: &str,
    branches: &[ReferenceOr<Schema>],
) {
    let keyword_id = tree.add_child(parent, PathNode::structural(keyword));
    for (index, branch) in branches.iter().enumerate() {
        let id = tree.add_child(
            keyword_id,
            PathNode::new(&index.to_string(), Payload::Schema(branch.clone())),
        );
        if let ReferenceOr::Item(schema) = branch {
            gather_nested_schemas(tree, id, schema);
        }
    }
}

/// `additionalProperties: true` contributes a structural marker node, a
/// schema form contributes a schema node. `false` and absence contribute
/// nothing.
fn gather_additional_properties(
    tree: &mut SchemaTree,
    parent: NodeId,
    additional: Option<&AdditionalProperties>,
) {
    match additional {
        Some(AdditionalProperties::Any(true)) => {
            tree.add_child(parent, PathNode::structural("additionalProperties"));
        }
        Some(AdditionalProperties::Schema(schema)) => {
            let payload = Payload::Schema((**schema).clone());
            let id = tree.add_child(parent, PathNode::new("additionalProperties", payload));
            if let ReferenceOr::Item(item) = schema.as_ref() {
                gather_nested_schemas(tree, id, item);
            }
        }
        _ => {}
    }
}

/// Descends into a parameter or header schema. Content style parameters
/// describe serialization rather than a type, so only the schema form is
/// walked, and only when it is inline.
fn gather_format_schema(tree: &mut SchemaTree, parent: NodeId, format: &ParameterSchemaOrContent) {
    if let ParameterSchemaOrContent::Schema(ReferenceOr::Item(schema)) = format {
        gather_nested_schemas(tree, parent, schema);
    }
}

/// Adds one child per content type. Media types without a schema still mark
/// their position in the tree so the content type stays addressable.
fn gather_content(tree: &mut SchemaTree, parent: NodeId, content: &IndexMap<String, MediaType>) {
    for content_type in sorted_keys(content) {
        let media = &content[content_type];
        match &media.schema {
            Some(schema) => {
                let id = tree
                    .add_child(parent, PathNode::new(content_type, Payload::Schema(schema.clone())));
                if let ReferenceOr::Item(item) = schema {
                    gather_nested_schemas(tree, id, item);
                }
            }
            None => {
                tree.add_child(parent, PathNode::structural(content_type));
            }
        }
    }
}

// --- Paths ---

fn gather_paths(tree: &mut SchemaTree, parent: NodeId, spec: &OpenAPI) {
    if spec.paths.paths.is_empty() {
        return;
    }
    let paths_id = tree.add_child(parent, PathNode::structural("paths"));

    for template in sorted_keys(&spec.paths.paths) {
        let item = match &spec.paths.paths[template] {
            ReferenceOr::Item(item) => item,
            // A referenced path item carries no operations to walk.
            ReferenceOr::Reference { .. } => continue,
        };
        let template_id = tree.add_child(paths_id, PathNode::structural(template));
        gather_path_item(tree, template_id, item);
    }
}

fn gather_path_item(tree: &mut SchemaTree, parent: NodeId, item: &PathItem) {
    if !item.parameters.is_empty() {
        let parameters_id = add_category(tree, parent, "parameters", "Parameter");
        gather_parameters(tree, parameters_id, &item.parameters);
    }

    for (method, operation) in operations(item) {
        if let Some(operation) = operation {
            gather_operation(tree, parent, method, operation);
        }
    }
}

/// The operations of a path item, keyed by lowercase method and ordered
/// alphabetically so sibling operation nodes are created deterministically.
fn operations(item: &PathItem) -> [(&'static str, &Option<Operation>); 8] {
    [
        ("delete", &item.delete),
        ("get", &item.get),
        ("head", &item.head),
        ("options", &item.options),
        ("patch", &item.patch),
        ("post", &item.post),
        ("put", &item.put),
        ("trace", &item.trace),
    ]
}

fn gather_operation(tree: &mut SchemaTree, parent: NodeId, method: &str, operation: &Operation) {
    // Operations without an id are keyed by their lowercase method name.
    let segment = operation
        .operation_id
        .clone()
        .unwrap_or_else(|| method.to_string());
    let operation_node = tree.add_child(parent, PathNode::structural(&segment));

    if !operation.parameters.is_empty() {
        let parameters_id = add_category(tree, operation_node, "parameters", "Parameter");
        gather_parameters(tree, parameters_id, &operation.parameters);
    }

    if let Some(body) = &operation.request_body {
        let id = tree.add_child(
            operation_node,
            PathNode::new("requestBody", Payload::RequestBody(body.clone())),
        );
        if let ReferenceOr::Item(body) = body {
            gather_content(tree, id, &body.content);
        }
    }

    gather_responses(tree, operation_node, &operation.responses);
}

/// Adds the inline parameters of a path item or operation, keyed by
/// parameter name. Referenced parameters are skipped: their definition
/// lives under `components/parameters`.
fn gather_parameters(tree: &mut SchemaTree, parent: NodeId, parameters: &[ReferenceOr<Parameter>]) {
    for entry in parameters {
        let parameter = match entry {
            ReferenceOr::Item(parameter) => parameter,
            ReferenceOr::Reference { .. } => continue,
        };
        let data: &ParameterData = parameter.parameter_data_ref();
        let mut node = PathNode::new(&data.name, Payload::Parameter(entry.clone()));
        node.element_name = Some(data.name.clone());
        let id = tree.add_child(parent, node);
        gather_format_schema(tree, id, &data.format);
    }
}

/// Adds the responses of an operation under a structural `responses` node.
/// The `default` response sorts among the status codes by its literal key.
fn gather_responses(tree: &mut SchemaTree, parent: NodeId, responses: &Responses) {
    if responses.default.is_none() && responses.responses.is_empty() {
        return;
    }
    let responses_id = tree.add_child(parent, PathNode::structural("responses"));

    let mut entries: Vec<(String, &ReferenceOr<openapiv3::Response>)> = Vec::new();
    if let Some(default) = &responses.default {
        entries.push(("default".to_string(), default));
    }
    for (code, response) in &responses.responses {
        entries.push((code.to_string(), response));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (code, entry) in entries {
        let id =
            tree.add_child(responses_id, PathNode::new(&code, Payload::Response(entry.clone())));
        if let ReferenceOr::Item(response) = entry {
            gather_content(tree, id, &response.content);
        }
    }
}

// --- Helper Functions ---

/// Map keys in sorted order, decoupling the walk from document key order.
fn sorted_keys<V>(map: &IndexMap<String, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> OpenAPI {
        serde_yaml::from_str(yaml).expect("fixture must parse")
    }

    fn node_kind(tree: &SchemaTree, elements: &[&str]) -> &'static str {
        let id = tree
            .node_by_elements(elements)
            .unwrap_or_else(|| panic!("missing node {:?}", elements));
        tree.node(id).payload.kind()
    }

    #[test]
    fn test_gathers_nested_properties() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths: {}
components:
  schemas:
    SimpleObject:
      type: object
      properties:
        Name:
          type: string
        Nested:
          type: object
          properties:
            Inner:
              type: integer
"#,
        );
        let tree = build_schema_tree(&spec);

        assert_eq!(node_kind(&tree, &["components"]), "structural");
        assert_eq!(node_kind(&tree, &["components", "schemas"]), "structural");
        assert_eq!(node_kind(&tree, &["components", "schemas", "SimpleObject"]), "schema");
        assert_eq!(
            node_kind(&tree, &["components", "schemas", "SimpleObject", "Nested", "Inner"]),
            "schema"
        );

        let schemas = tree.node_by_elements(&["components", "schemas"]).unwrap();
        assert_eq!(tree.node(schemas).element_name.as_deref(), Some("Schema"));
    }

    #[test]
    fn test_reference_payloads_are_leaves() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths: {}
components:
  schemas:
    NodeA:
      type: object
      properties:
        next:
          $ref: '#/components/schemas/NodeB'
    NodeB:
      type: object
      properties:
        prev:
          $ref: '#/components/schemas/NodeA'
"#,
        );
        // The walk must terminate despite the reference cycle.
        let tree = build_schema_tree(&spec);

        let next = tree
            .node_by_elements(&["components", "schemas", "NodeA", "next"])
            .unwrap();
        assert_eq!(
            tree.node(next).reference.as_deref(),
            Some("#/components/schemas/NodeB")
        );
        assert!(tree.node(next).children.is_empty());
    }

    #[test]
    fn test_additional_properties_variants() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths: {}
components:
  schemas:
    FreeForm:
      type: object
      additionalProperties: true
    StringMap:
      type: object
      additionalProperties:
        type: string
    Closed:
      type: object
      additionalProperties: false
"#,
        );
        let tree = build_schema_tree(&spec);

        assert_eq!(
            node_kind(&tree, &["components", "schemas", "FreeForm", "additionalProperties"]),
            "structural"
        );
        assert_eq!(
            node_kind(&tree, &["components", "schemas", "StringMap", "additionalProperties"]),
            "schema"
        );
        let closed = tree.node_by_elements(&["components", "schemas", "Closed"]).unwrap();
        assert!(tree.node(closed).children.is_empty());
    }

    #[test]
    fn test_composition_branches_are_indexed() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths: {}
components:
  schemas:
    Mixture:
      allOf:
        - $ref: '#/components/schemas/Base'
        - type: object
          properties:
            extra:
              type: string
    Base:
      type: object
      properties:
        id:
          type: integer
"#,
        );
        let tree = build_schema_tree(&spec);

        assert_eq!(node_kind(&tree, &["components", "schemas", "Mixture", "allOf"]), "structural");
        let first = tree
            .node_by_elements(&["components", "schemas", "Mixture", "allOf", "0"])
            .unwrap();
        assert_eq!(tree.node(first).reference.as_deref(), Some("#/components/schemas/Base"));
        assert_eq!(
            node_kind(&tree, &["components", "schemas", "Mixture", "allOf", "1", "extra"]),
            "schema"
        );
    }

    #[test]
    fn test_gathers_operations_with_id_fallback() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
      responses:
        "200":
          description: A list of pets
          content:
            application/json:
              schema:
                type: array
                items:
                  type: string
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                name:
                  type: string
      responses:
        default:
          description: The error envelope
"#,
        );
        let tree = build_schema_tree(&spec);

        assert_eq!(node_kind(&tree, &["paths", "/pets", "listPets"]), "structural");
        assert_eq!(
            node_kind(&tree, &["paths", "/pets", "listPets", "parameters", "limit"]),
            "parameter"
        );
        assert_eq!(
            node_kind(
                &tree,
                &["paths", "/pets", "listPets", "responses", "200", "application/json"]
            ),
            "schema"
        );

        // No operationId, so the node is keyed by the method itself.
        assert_eq!(node_kind(&tree, &["paths", "/pets", "post"]), "structural");
        assert_eq!(node_kind(&tree, &["paths", "/pets", "post", "requestBody"]), "requestBody");
        assert_eq!(
            node_kind(
                &tree,
                &["paths", "/pets", "post", "requestBody", "application/json", "name"]
            ),
            "schema"
        );
        assert_eq!(
            node_kind(&tree, &["paths", "/pets", "post", "responses", "default"]),
            "response"
        );
    }

    #[test]
    fn test_content_parameters_are_not_descended() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths:
  /search:
    get:
      operationId: search
      parameters:
        - name: filter
          in: query
          content:
            application/json:
              schema:
                type: object
                properties:
                  q:
                    type: string
      responses:
        "204":
          description: Accepted
"#,
        );
        let tree = build_schema_tree(&spec);

        let filter = tree
            .node_by_elements(&["paths", "/search", "search", "parameters", "filter"])
            .unwrap();
        assert_eq!(tree.node(filter).payload.kind(), "parameter");
        assert!(tree.node(filter).children.is_empty());
    }

    #[test]
    fn test_media_without_schema_stays_addressable() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths: {}
components:
  responses:
    NoBody:
      description: Schema-less content listing
      content:
        text/plain: {}
"#,
        );
        let tree = build_schema_tree(&spec);

        assert_eq!(node_kind(&tree, &["components", "responses", "NoBody"]), "response");
        assert_eq!(
            node_kind(&tree, &["components", "responses", "NoBody", "text/plain"]),
            "structural"
        );
    }

    #[test]
    fn test_empty_components_still_marked() {
        let spec = parse(
            r#"
openapi: "3.0.0"
info:
  title: Gather fixtures
  version: "1.0"
paths: {}
components: {}
"#,
        );
        let tree = build_schema_tree(&spec);

        let components = tree.node_by_elements(&["components"]).unwrap();
        assert!(tree.node(components).payload.is_structural());
        assert!(tree.node(components).children.is_empty());
        // No paths, so no paths node either.
        assert_eq!(tree.node_by_elements(&["paths"]), None);
    }
}
