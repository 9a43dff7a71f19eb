//! Route extraction rules over classified nodes.
//!
//! Every visit returns the records (and pages) found under that node; callers
//! concatenate. Shapes that do not fully match a rule contribute nothing.

use tree_sitter::Node;

use crate::config::{RecognizedElementSet, RouteClassMap};
use crate::routes::common::{
    first_named_child, get_node_text, last_name_segment, named_children_no_comments,
    string_literal_value,
};
use crate::routes::syntax::{Declarator, FunctionBody, MarkupElement, RouteNode};

/// Attributes on a recognized element that carry a route path.
const ROUTE_ATTRIBUTES: [&str; 2] = ["path", "to"];

/// Generic wrappers whose single type argument is treated like `T[]`.
const ARRAY_GENERICS: [&str; 2] = ["Array", "ReadonlyArray"];

/// Property on a typed-table element that feeds the page lookup table.
const PAGE_URL_PROPERTY: &str = "url";

/// An extracted, unresolved route declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// URL prefix of the typed table the route came from; `None` for markup routes.
    pub route_class: Option<String>,
    /// Path as written, possibly with a `:param` segment.
    pub path_template: String,
}

impl RouteRecord {
    pub fn markup(path_template: impl Into<String>) -> Self {
        Self {
            route_class: None,
            path_template: path_template.into(),
        }
    }

    pub fn classed(route_class: impl Into<String>, path_template: impl Into<String>) -> Self {
        Self {
            route_class: Some(route_class.into()),
            path_template: path_template.into(),
        }
    }
}

/// One entry of a typed page table, used to expand dynamic segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
}

/// Everything found under one node (or one file), in source order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<RouteRecord>,
    pub pages: Vec<Page>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.pages.is_empty()
    }

    fn append(&mut self, mut other: Extraction) {
        self.records.append(&mut other.records);
        self.pages.append(&mut other.pages);
    }
}

impl FromIterator<Extraction> for Extraction {
    fn from_iter<I: IntoIterator<Item = Extraction>>(iter: I) -> Self {
        let mut out = Extraction::default();
        for part in iter {
            out.append(part);
        }
        out
    }
}

/// Walks one file's syntax tree.
#[derive(Clone, Copy)]
pub struct RouteExtractor<'c> {
    class_map: &'c RouteClassMap,
    elements: &'c RecognizedElementSet,
}

impl<'c> RouteExtractor<'c> {
    pub fn new(class_map: &'c RouteClassMap, elements: &'c RecognizedElementSet) -> Self {
        Self { class_map, elements }
    }

    /// Extract from a program root: its top-level statements are the entry points.
    pub fn extract(&self, root: Node, source: &[u8]) -> Extraction {
        named_children_no_comments(root)
            .into_iter()
            .map(|statement| self.visit(statement, source))
            .collect()
    }

    /// Apply every rule to a single node.
    pub fn visit(&self, node: Node, source: &[u8]) -> Extraction {
        match RouteNode::classify(node, source) {
            RouteNode::Declaration(declarators) => declarators
                .into_iter()
                .map(|declarator| self.visit_declarator(declarator, source))
                .collect(),
            RouteNode::Markup(element) => self.visit_markup(element, source),
            RouteNode::Fragment(children) => self.visit_all(children, source),
            RouteNode::Function(body) => self.visit_function_body(body, source),
            RouteNode::Class(methods) => methods
                .into_iter()
                .map(|body| self.visit_function_body(body, source))
                .collect(),
            RouteNode::Return(argument) => argument
                .map(|expr| self.visit(expr, source))
                .unwrap_or_default(),
            RouteNode::Export(inner) => self.visit(inner, source),
            RouteNode::Call(functions) | RouteNode::Wrapped(functions) => {
                self.visit_all(functions, source)
            }
            RouteNode::Other => Extraction::default(),
        }
    }

    fn visit_all(&self, nodes: Vec<Node>, source: &[u8]) -> Extraction {
        nodes
            .into_iter()
            .map(|node| self.visit(node, source))
            .collect()
    }

    fn visit_declarator(&self, declarator: Declarator, source: &[u8]) -> Extraction {
        let table = self.typed_table(declarator, source).unwrap_or_default();
        // Function-valued (or wrapped-function) initializers declare routes in their bodies.
        let nested = declarator
            .value
            .map(|value| self.visit(value, source))
            .unwrap_or_default();
        [table, nested].into_iter().collect()
    }

    /// Markup-attribute rule plus descent into the element's children.
    fn visit_markup(&self, element: MarkupElement, source: &[u8]) -> Extraction {
        let mut out = Extraction::default();
        if self.elements.contains(element.tag) {
            for attribute in &element.attributes {
                if let Some(path) = route_attribute_value(*attribute, source) {
                    out.records.push(RouteRecord::markup(path));
                }
            }
        }
        out.append(self.visit_all(element.children, source));
        out
    }

    fn visit_function_body(&self, body: FunctionBody, source: &[u8]) -> Extraction {
        match body {
            FunctionBody::Expression(expr) => self.visit(expr, source),
            FunctionBody::Block(statements) => self.visit_all(statements, source),
            FunctionBody::Missing => Extraction::default(),
        }
    }

    /// Typed-table rule: `const xs: T[] = [{ first: "..." }, ...]` where `T` is a
    /// route class. All elements must match or the declaration yields nothing.
    fn typed_table(&self, declarator: Declarator, source: &[u8]) -> Option<Extraction> {
        let element_type = array_element_type(declarator.annotation?, source)?;
        let prefix = self.class_map.prefix_for(element_type)?;
        let array = declarator.value?;
        if array.kind() != "array" {
            return None;
        }

        let mut out = Extraction::default();
        for element in named_children_no_comments(array) {
            if element.kind() != "object" {
                return None;
            }
            let properties = named_children_no_comments(element);
            let first = properties.first()?;
            let path = pair_string_value(*first, source)?;
            out.records.push(RouteRecord::classed(prefix, path));

            let page_url = properties.iter().find_map(|property| {
                let key = property_key(*property, source)?;
                if key == PAGE_URL_PROPERTY {
                    pair_string_value(*property, source)
                } else {
                    None
                }
            });
            if let Some(url) = page_url {
                out.pages.push(Page { url });
            }
        }
        Some(out)
    }
}

/// Literal value of a `path`/`to` attribute: `path="/x"` or `path={"/x"}`.
fn route_attribute_value(attribute: Node, source: &[u8]) -> Option<String> {
    let parts = named_children_no_comments(attribute);
    let (name, value) = match parts.as_slice() {
        [name, value] => (*name, *value),
        _ => return None,
    };
    if !ROUTE_ATTRIBUTES.contains(&get_node_text(name, source)) {
        return None;
    }
    match value.kind() {
        "string" => string_literal_value(value, source),
        "jsx_expression" => {
            let inner = named_children_no_comments(value);
            match inner.as_slice() {
                [only] => string_literal_value(*only, source),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Name of `T` in `T[]`, `Array<T>` or `ReadonlyArray<T>`.
fn array_element_type<'a>(annotation: Node, source: &'a [u8]) -> Option<&'a str> {
    match annotation.kind() {
        "array_type" => type_name(first_named_child(annotation)?, source),
        "readonly_type" => array_element_type(first_named_child(annotation)?, source),
        "generic_type" => {
            let name = get_node_text(annotation.child_by_field_name("name")?, source);
            if !ARRAY_GENERICS.contains(&name) {
                return None;
            }
            let arguments = annotation.child_by_field_name("type_arguments")?;
            match named_children_no_comments(arguments).as_slice() {
                [only] => type_name(*only, source),
                _ => None,
            }
        }
        _ => None,
    }
}

fn type_name<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    match node.kind() {
        "type_identifier" => Some(get_node_text(node, source)),
        "nested_type_identifier" => Some(last_name_segment(get_node_text(node, source))),
        "generic_type" => type_name(node.child_by_field_name("name")?, source),
        _ => None,
    }
}

fn property_key<'a>(property: Node, source: &'a [u8]) -> Option<std::borrow::Cow<'a, str>> {
    if property.kind() != "pair" {
        return None;
    }
    let key = property.child_by_field_name("key")?;
    match key.kind() {
        "property_identifier" => Some(get_node_text(key, source).into()),
        "string" => string_literal_value(key, source).map(Into::into),
        _ => None,
    }
}

fn pair_string_value(property: Node, source: &[u8]) -> Option<String> {
    if property.kind() != "pair" {
        return None;
    }
    string_literal_value(property.child_by_field_name("value")?, source)
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

    fn extract(code: &str) -> Extraction {
        let class_map = RouteClassMap::default();
        let elements = RecognizedElementSet::default();
        let tree = parse_tsx(code);
        RouteExtractor::new(&class_map, &elements).extract(tree.root_node(), code.as_bytes())
    }

    #[test]
    fn test_markup_path_attribute() {
        let result = extract(r#"const App = () => <Route path="/foo" />;"#);
        assert_eq!(result.records, vec![RouteRecord::markup("/foo")]);
    }

    #[test]
    fn test_markup_path_and_to_on_one_element() {
        let result = extract(r#"const App = () => <Redirect path="/old" to="/new" />;"#);
        assert_eq!(
            result.records,
            vec![RouteRecord::markup("/old"), RouteRecord::markup("/new")]
        );
    }

    #[test]
    fn test_expression_container_literal() {
        let result = extract(r#"const App = () => <Route path={"/braced"} />;"#);
        assert_eq!(result.records, vec![RouteRecord::markup("/braced")]);
    }

    #[test]
    fn test_non_literal_attribute_is_skipped() {
        let result = extract(
            r#"const App = () => <Route path={base + "/x"} to={`/t/${id}`} />;"#,
        );
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_markup_character_reference_is_decoded() {
        let result = extract(r#"const A = () => <Route path="/a&amp;b" to="/c&#47;d" />;"#);
        assert_eq!(
            result.records,
            vec![RouteRecord::markup("/a&b"), RouteRecord::markup("/c/d")]
        );
    }

    #[test]
    fn test_markup_attribute_backslash_is_literal() {
        let result = extract(r#"const A = () => <Route path="/a\n" />;"#);
        assert_eq!(result.records, vec![RouteRecord::markup(r"/a\n")]);
    }

    #[test]
    fn test_typed_table_escapes_are_decoded() {
        let result = extract(r#"const p: AppPage[] = [{ url: "/it\"s" }, { url: '/caf\u00e9' }];"#);
        assert_eq!(
            result.records,
            vec![
                RouteRecord::classed("page", "/it\"s"),
                RouteRecord::classed("page", "/caf\u{e9}"),
            ]
        );
        let urls: Vec<_> = result.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/it\"s", "/caf\u{e9}"]);
    }

    #[test]
    fn test_unrecognized_element_is_skipped_but_descended() {
        let result = extract(
            r#"const App = () => (
  <Link to="/nope">
    <Route path="/inner" />
  </Link>
);"#,
        );
        assert_eq!(result.records, vec![RouteRecord::markup("/inner")]);
    }

    #[test]
    fn test_typed_table() {
        let result = extract(r#"const pages: AppPage[] = [{ url: "/a" }, { url: "/b" }];"#);
        assert_eq!(
            result.records,
            vec![RouteRecord::classed("page", "/a"), RouteRecord::classed("page", "/b")]
        );
        assert_eq!(
            result.pages,
            vec![Page { url: "/a".into() }, Page { url: "/b".into() }]
        );
    }

    #[test]
    fn test_typed_table_uses_first_property_for_path() {
        let result = extract(
            r#"const appPages: AppPage[] = [
  { title: 'Inbox', url: '/page/Inbox', icon: mailOutline },
];"#,
        );
        assert_eq!(result.records, vec![RouteRecord::classed("page", "Inbox")]);
        assert_eq!(result.pages, vec![Page { url: "/page/Inbox".into() }]);
    }

    #[test]
    fn test_typed_table_generic_array() {
        let result = extract(r#"const pages: Array<AppPage> = [{ url: "/g" }];"#);
        assert_eq!(result.records, vec![RouteRecord::classed("page", "/g")]);
    }

    #[test]
    fn test_unknown_class_yields_nothing() {
        let result = extract(r#"const pages: OtherPage[] = [{ url: "/a" }];"#);
        assert!(result.is_empty());
    }

    #[test]
    fn test_typed_table_is_all_or_nothing() {
        let result = extract(r#"const pages: AppPage[] = [{ url: "/a" }, "/b"];"#);
        assert!(result.is_empty());

        let result = extract(r#"const pages: AppPage[] = [{ url: "/a" }, { count: 3 }];"#);
        assert!(result.is_empty());
    }

    #[test]
    fn test_typed_table_requires_array_initializer() {
        let result = extract(r#"const pages: AppPage[] = loadPages();"#);
        assert!(result.is_empty());
    }

    #[test]
    fn test_non_array_annotation_yields_nothing() {
        let result = extract(r#"const page: AppPage = { url: "/a" };"#);
        assert!(result.is_empty());
    }

    #[test]
    fn test_first_return_in_block_body() {
        let result = extract(
            r#"const App: React.FC = () => {
  return (
    <IonRouterOutlet>
      <Route path="/page/:name" exact={true} />
    </IonRouterOutlet>
  );
};"#,
        );
        assert_eq!(result.records, vec![RouteRecord::markup("/page/:name")]);
    }

    #[test]
    fn test_return_after_other_statements() {
        let result = extract(
            r#"const App = () => {
  const [x] = useState(0);
  return <Route path="/late" />;
};"#,
        );
        assert_eq!(result.records, vec![RouteRecord::markup("/late")]);
    }

    #[test]
    fn test_nested_declarations_in_function_body() {
        let result = extract(
            r#"function Menu() {
  const appPages: AppPage[] = [{ title: "Home", url: "/home" }];
  return <IonMenu />;
}"#,
        );
        assert_eq!(result.records, vec![RouteRecord::classed("page", "Home")]);
    }

    #[test]
    fn test_higher_order_wrapper() {
        let result = extract(
            r#"const Routes = withRouter(function Inner() {
  return <Route path="/wrapped" />;
});"#,
        );
        assert_eq!(result.records, vec![RouteRecord::markup("/wrapped")]);
    }

    #[test]
    fn test_exported_declarations() {
        let result = extract(
            r#"export const pages: AppPage[] = [{ url: "/e" }];
export default function App() {
  return <Route to="/d" />;
}"#,
        );
        assert_eq!(
            result.records,
            vec![RouteRecord::classed("page", "/e"), RouteRecord::markup("/d")]
        );
    }

    #[test]
    fn test_conditional_markup() {
        let result = extract(
            r#"const App = () => (
  <Switch>
    {loggedIn && <Route path="/account" />}
    {admin ? <Route path="/admin" /> : <Redirect to="/login" />}
  </Switch>
);"#,
        );
        assert_eq!(
            result.records,
            vec![
                RouteRecord::markup("/account"),
                RouteRecord::markup("/admin"),
                RouteRecord::markup("/login"),
            ]
        );
    }

    #[test]
    fn test_class_component_render() {
        let result = extract(
            r#"class App extends React.Component {
  render() {
    return <Route path="/classy" />;
  }
}"#,
        );
        assert_eq!(result.records, vec![RouteRecord::markup("/classy")]);
    }

    #[test]
    fn test_fragment_children() {
        let result = extract(r#"const R = () => <><Route path="/x" /><Route path="/y" /></>;"#);
        assert_eq!(
            result.records,
            vec![RouteRecord::markup("/x"), RouteRecord::markup("/y")]
        );
    }

    #[test]
    fn test_custom_element_set() {
        let class_map = RouteClassMap::default();
        let elements = RecognizedElementSet::from_names(["PrivateRoute"]);
        let code = r#"const A = () => <div><PrivateRoute path="/p" /><Route path="/r" /></div>;"#;
        let tree = parse_tsx(code);
        let result = RouteExtractor::new(&class_map, &elements)
            .extract(tree.root_node(), code.as_bytes());
        assert_eq!(result.records, vec![RouteRecord::markup("/p")]);
    }
}
