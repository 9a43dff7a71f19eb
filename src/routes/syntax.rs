//! Closed set of node shapes the route extractor cares about.
//!
//! tree-sitter hands back a loosely typed tree where every node is a `Node`
//! with a string `kind()`. `RouteNode::classify` folds the handful of kinds
//! that can declare routes into a tagged enum so the extractor can dispatch
//! with an exhaustive `match`. Everything else becomes `RouteNode::Other`.

use tree_sitter::Node;

use crate::routes::common::{first_named_child, get_node_text, is_comment, named_children_no_comments};

/// One declared variable: `name: Type = value`.
#[derive(Debug, Clone, Copy)]
pub struct Declarator<'a> {
    /// The type inside the annotation (`AppPage[]`), without the leading colon.
    pub annotation: Option<Node<'a>>,
    pub value: Option<Node<'a>>,
}

#[derive(Debug, Clone)]
pub struct MarkupElement<'a> {
    pub tag: &'a str,
    /// `jsx_attribute` nodes, in source order.
    pub attributes: Vec<Node<'a>>,
    pub children: Vec<Node<'a>>,
}

#[derive(Debug, Clone)]
pub enum FunctionBody<'a> {
    /// `{ ... }` body: the direct statements.
    Block(Vec<Node<'a>>),
    /// Concise arrow body: `() => <Routes />`.
    Expression(Node<'a>),
    Missing,
}

#[derive(Debug, Clone)]
pub enum RouteNode<'a> {
    /// `const`/`let`/`var` declaration.
    Declaration(Vec<Declarator<'a>>),
    /// JSX element with a tag name.
    Markup(MarkupElement<'a>),
    /// JSX fragment (`<>...</>`): only children are interesting.
    Fragment(Vec<Node<'a>>),
    Function(FunctionBody<'a>),
    /// Class: each method body is descended like a function.
    Class(Vec<FunctionBody<'a>>),
    /// `return <expr>;`
    Return(Option<Node<'a>>),
    /// `export <declaration>` / `export default <value>`.
    Export(Node<'a>),
    /// Call expression: only function-valued arguments are kept
    /// (`memo(() => ...)`, `withRouter(function Inner() {...})`).
    Call(Vec<Node<'a>>),
    /// Expressions that merely wrap other expressions: parentheses, JSX
    /// expression containers, logical operators and ternaries.
    Wrapped(Vec<Node<'a>>),
    Other,
}

impl<'a> RouteNode<'a> {
    pub fn classify(node: Node<'a>, source: &'a [u8]) -> Self {
        match node.kind() {
            "lexical_declaration" | "variable_declaration" => {
                RouteNode::Declaration(collect_declarators(node))
            }
            "jsx_element" => classify_jsx_element(node, source),
            "jsx_self_closing_element" => match node.child_by_field_name("name") {
                Some(name) => RouteNode::Markup(MarkupElement {
                    tag: get_node_text(name, source),
                    attributes: collect_attributes(node),
                    children: Vec::new(),
                }),
                None => RouteNode::Other,
            },
            "jsx_fragment" => RouteNode::Fragment(collect_jsx_children(node)),
            kind if is_function_kind(kind) => RouteNode::Function(function_body(node)),
            "class_declaration" | "abstract_class_declaration" | "class" => {
                RouteNode::Class(collect_method_bodies(node))
            }
            "return_statement" => RouteNode::Return(first_named_child(node)),
            "export_statement" => node
                .child_by_field_name("declaration")
                .or_else(|| node.child_by_field_name("value"))
                .map_or(RouteNode::Other, RouteNode::Export),
            "call_expression" => {
                let functions: Vec<Node<'a>> = node
                    .child_by_field_name("arguments")
                    .map(named_children_no_comments)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|arg| is_function_kind(arg.kind()))
                    .collect();
                if functions.is_empty() {
                    RouteNode::Other
                } else {
                    RouteNode::Call(functions)
                }
            }
            "parenthesized_expression" | "jsx_expression" => {
                RouteNode::Wrapped(named_children_no_comments(node))
            }
            "binary_expression" => classify_logical(node, source),
            "ternary_expression" => RouteNode::Wrapped(
                ["consequence", "alternative"]
                    .iter()
                    .filter_map(|field| node.child_by_field_name(*field))
                    .collect(),
            ),
            _ => RouteNode::Other,
        }
    }
}

pub fn is_function_kind(kind: &str) -> bool {
    matches!(
        kind,
        "arrow_function"
            | "function"
            | "function_expression"
            | "function_declaration"
            | "generator_function"
            | "generator_function_declaration"
    )
}

fn collect_declarators(node: Node) -> Vec<Declarator> {
    named_children_no_comments(node)
        .into_iter()
        .filter(|child| child.kind() == "variable_declarator")
        .map(|declarator| Declarator {
            annotation: declarator
                .child_by_field_name("type")
                .and_then(first_named_child),
            value: declarator.child_by_field_name("value"),
        })
        .collect()
}

fn classify_jsx_element<'a>(node: Node<'a>, source: &'a [u8]) -> RouteNode<'a> {
    let open_tag = node.child_by_field_name("open_tag").or_else(|| {
        named_children_no_comments(node)
            .into_iter()
            .find(|child| child.kind() == "jsx_opening_element")
    });
    let children = collect_jsx_children(node);

    let Some(open_tag) = open_tag else {
        return RouteNode::Fragment(children);
    };
    // `<>` parses as an opening element without a name in newer grammars.
    match open_tag.child_by_field_name("name") {
        Some(name) => RouteNode::Markup(MarkupElement {
            tag: get_node_text(name, source),
            attributes: collect_attributes(open_tag),
            children,
        }),
        None => RouteNode::Fragment(children),
    }
}

fn collect_attributes(tag: Node) -> Vec<Node> {
    named_children_no_comments(tag)
        .into_iter()
        .filter(|child| child.kind() == "jsx_attribute")
        .collect()
}

fn collect_jsx_children(node: Node) -> Vec<Node> {
    named_children_no_comments(node)
        .into_iter()
        .filter(|child| !matches!(child.kind(), "jsx_opening_element" | "jsx_closing_element"))
        .collect()
}

fn function_body(node: Node) -> FunctionBody {
    match node.child_by_field_name("body") {
        Some(body) if body.kind() == "statement_block" => {
            FunctionBody::Block(named_children_no_comments(body))
        }
        Some(body) => FunctionBody::Expression(body),
        None => FunctionBody::Missing,
    }
}

fn collect_method_bodies(node: Node) -> Vec<FunctionBody> {
    let Some(body) = node.child_by_field_name("body") else {
        return Vec::new();
    };
    named_children_no_comments(body)
        .into_iter()
        .filter_map(|member| match member.kind() {
            "method_definition" => Some(function_body(member)),
            // `render = () => (...)` class fields
            "public_field_definition" | "field_definition" => member
                .child_by_field_name("value")
                .filter(|value| is_function_kind(value.kind()))
                .map(function_body),
            _ => None,
        })
        .collect()
}

fn classify_logical<'a>(node: Node<'a>, source: &'a [u8]) -> RouteNode<'a> {
    let operator = node
        .child_by_field_name("operator")
        .map(|op| get_node_text(op, source))
        .unwrap_or_default();
    if !matches!(operator, "&&" | "||" | "??") {
        return RouteNode::Other;
    }
    RouteNode::Wrapped(
        ["left", "right"]
            .iter()
            .filter_map(|field| node.child_by_field_name(*field))
            .filter(|child| !is_comment(*child))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::{Parser, Tree};

    fn parse_tsx(code: &str) -> Tree {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_typescript::LANGUAGE_TSX.into()).unwrap();
        parser.parse(code, None).unwrap()
    }

    fn first_statement(tree: &Tree) -> Node<'_> {
        first_named_child(tree.root_node()).unwrap()
    }

    #[test]
    fn test_classify_declaration() {
        let code = "const pages: AppPage[] = [];";
        let tree = parse_tsx(code);
        let node = first_statement(&tree);
        match RouteNode::classify(node, code.as_bytes()) {
            RouteNode::Declaration(declarators) => {
                assert_eq!(declarators.len(), 1);
                let annotation = declarators[0].annotation.unwrap();
                assert_eq!(annotation.kind(), "array_type");
                assert_eq!(declarators[0].value.unwrap().kind(), "array");
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_markup_element() {
        let code = r#"<Route path="/about" exact><Home /></Route>;"#;
        let tree = parse_tsx(code);
        let statement = first_statement(&tree);
        let element = first_named_child(statement).unwrap();
        match RouteNode::classify(element, code.as_bytes()) {
            RouteNode::Markup(markup) => {
                assert_eq!(markup.tag, "Route");
                assert_eq!(markup.attributes.len(), 2);
                assert_eq!(markup.children.len(), 1);
            }
            other => panic!("expected markup, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_self_closing_member_tag() {
        let code = r#"<Router.Route to="/x" />;"#;
        let tree = parse_tsx(code);
        let element = first_named_child(first_statement(&tree)).unwrap();
        match RouteNode::classify(element, code.as_bytes()) {
            RouteNode::Markup(markup) => {
                assert_eq!(markup.tag, "Router.Route");
                assert!(markup.children.is_empty());
            }
            other => panic!("expected markup, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_concise_arrow() {
        let code = "const App = () => <div />;";
        let tree = parse_tsx(code);
        let RouteNode::Declaration(declarators) =
            RouteNode::classify(first_statement(&tree), code.as_bytes())
        else {
            panic!("expected declaration");
        };
        let value = declarators[0].value.unwrap();
        assert!(matches!(
            RouteNode::classify(value, code.as_bytes()),
            RouteNode::Function(FunctionBody::Expression(_))
        ));
    }

    #[test]
    fn test_call_without_function_arguments_is_other() {
        let code = "const x = compute(1, 2);";
        let tree = parse_tsx(code);
        let RouteNode::Declaration(declarators) =
            RouteNode::classify(first_statement(&tree), code.as_bytes())
        else {
            panic!("expected declaration");
        };
        let value = declarators[0].value.unwrap();
        assert!(matches!(RouteNode::classify(value, code.as_bytes()), RouteNode::Other));
    }

    #[test]
    fn test_arithmetic_binary_is_other() {
        let code = "a + b;";
        let tree = parse_tsx(code);
        let expr = first_named_child(first_statement(&tree)).unwrap();
        assert_eq!(expr.kind(), "binary_expression");
        assert!(matches!(RouteNode::classify(expr, code.as_bytes()), RouteNode::Other));
    }
}
