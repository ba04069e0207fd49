//! In-memory document tree for the landkit page runtime.
//!
//! The [`Document`] is an arena of nodes addressed by [`NodeId`]. It models
//! the parts of the browser DOM that the page modules touch: attributes and
//! class lists, text, form-control values, focus, layout rectangles and a
//! CSS selector subset (see [`SelectorList`]).
//!
//! Removed nodes stay in the arena (ids are never reused) but are detached,
//! so [`Document::is_connected`] reports `false` for them.

mod error;
mod geometry;
mod selector;

use std::fmt;
use std::fmt::Write as _;

pub use error::DomError;
pub use geometry::Rect;
pub use selector::SelectorList;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tags whose value is user-editable.
const FORM_CONTROLS: &[&str] = &["input", "textarea", "select"];

/// Tags serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Tags that take focus without a `tabindex`.
const FOCUSABLE_TAGS: &[&str] = &["button", "input", "select", "textarea"];

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Dirty value of a form control; `None` means "use the default value".
    value: Option<String>,
    rect: Rect,
}

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A document tree with `html`, `head` and `body` created up front.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            focused: None,
        };
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.link(doc.root, html);
        doc.link(html, head);
        doc.link(html, body);
        doc.head = head;
        doc.body = body;
        doc
    }

    /// The document node itself (parent of `html`).
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub const fn head(&self) -> NodeId {
        self.head
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn element(&self, id: NodeId) -> Result<&Element, DomError> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    // ---- creation & tree mutation ----

    /// Create a detached element. Tag names are lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data: NodeData::Element(Element {
                tag: tag.to_ascii_lowercase(),
                attrs: Vec::new(),
                value: None,
                rect: Rect::default(),
            }),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data: NodeData::Text(text.to_owned()),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create an element and append it to `parent`.
    ///
    /// # Errors
    /// Fails if `parent` cannot hold children.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let el = self.create_element(tag);
        self.append_child(parent, el)?;
        Ok(el)
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if matches!(self.node(parent)?.data, NodeData::Text(_)) {
            return Err(DomError::HierarchyRequest(format!(
                "text node {parent} cannot have children"
            )));
        }
        if matches!(self.node(child)?.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest(
                "the document node cannot be inserted".to_owned(),
            ));
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest(format!(
                "inserting {child} under {parent} would create a cycle"
            )));
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    ///
    /// # Errors
    /// Fails for unknown nodes, text parents and cycles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    /// Insert `child` before `reference` (or append when `reference` is `None`).
    ///
    /// # Errors
    /// Fails like [`Self::append_child`], or when `reference` is not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        if reference == child {
            return Ok(());
        }
        self.check_insertion(parent, child)?;
        if self.node(reference)?.parent != Some(parent) {
            return Err(DomError::HierarchyRequest(format!(
                "{reference} is not a child of {parent}"
            )));
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|c| *c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Detach `node` (and its subtree) from the tree.
    ///
    /// # Errors
    /// Fails for unknown nodes or when asked to remove the document node.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.node(node)?;
        if node == self.root {
            return Err(DomError::HierarchyRequest(
                "the document node cannot be removed".to_owned(),
            ));
        }
        if let Some(focused) = self.focused
            && self.contains(node, focused)
        {
            self.focused = None;
        }
        self.detach(node);
        Ok(())
    }

    // ---- navigation ----

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Parent, if it is an element.
    #[must_use]
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|p| self.is_element(*p))
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Inclusive ancestry check: `true` when `node == ancestor`.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    #[must_use]
    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_ok()
    }

    /// Element descendants of `node` in document order, excluding `node`.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if self.is_element(n) {
                out.push(n);
            }
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    // ---- attributes & classes ----

    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).ok().map(|el| el.tag.as_str())
    }

    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .ok()?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// Set or replace an attribute.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(node)?;
        if let Some(slot) = el.attrs.iter_mut().find(|(k, _)| k == name) {
            value.clone_into(&mut slot.1);
        } else {
            el.attrs.push((name.to_owned(), value.to_owned()));
        }
        Ok(())
    }

    /// Remove an attribute, returning whether it was present.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<bool, DomError> {
        let el = self.element_mut(node)?;
        let before = el.attrs.len();
        el.attrs.retain(|(k, _)| k != name);
        Ok(el.attrs.len() != before)
    }

    #[must_use]
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    /// First connected element with the given id, in document order.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.id(*n) == Some(id))
    }

    #[must_use]
    pub fn class_list(&self, node: NodeId) -> Vec<&str> {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.class_list(node).contains(&class)
    }

    fn write_classes(&mut self, node: NodeId, classes: &[String]) -> Result<(), DomError> {
        if classes.is_empty() {
            self.remove_attr(node, "class")?;
            Ok(())
        } else {
            self.set_attr(node, "class", &classes.join(" "))
        }
    }

    /// # Errors
    /// Fails when `node` is not an element.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let mut classes: Vec<String> = self
            .element(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == "class")
            .map(|(_, v)| v.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();
        if classes.iter().any(|c| c == class) {
            return Ok(());
        }
        classes.push(class.to_owned());
        self.write_classes(node, &classes)
    }

    /// # Errors
    /// Fails when `node` is not an element.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        self.element(node)?;
        if !self.has_class(node, class) {
            return Ok(());
        }
        let classes: Vec<String> = self
            .class_list(node)
            .into_iter()
            .filter(|c| *c != class)
            .map(str::to_owned)
            .collect();
        self.write_classes(node, &classes)
    }

    /// Toggle a class; `force` pins the result like `classList.toggle(c, force)`.
    /// Returns whether the class is present afterwards.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn toggle_class(
        &mut self,
        node: NodeId,
        class: &str,
        force: Option<bool>,
    ) -> Result<bool, DomError> {
        let present = force.unwrap_or_else(|| !self.has_class(node, class));
        if present {
            self.add_class(node, class)?;
        } else {
            self.remove_class(node, class)?;
        }
        Ok(present)
    }

    // ---- text ----

    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Text(t)) => out.push_str(t),
            Some(_) => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    /// Replace all children of `node` with one text node. A lone text child
    /// is rewritten in place.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.element(node)?;
        if !text.is_empty()
            && let [only] = self.nodes[node.0].children[..]
            && let NodeData::Text(existing) = &mut self.nodes[only.0].data
        {
            text.clone_into(existing);
            return Ok(());
        }
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link(node, text_node);
        }
        Ok(())
    }

    // ---- form controls ----

    #[must_use]
    pub fn is_form_control(&self, node: NodeId) -> bool {
        self.tag_name(node)
            .is_some_and(|tag| FORM_CONTROLS.contains(&tag))
    }

    /// Current value of a form control.
    ///
    /// # Errors
    /// Fails when `node` is not an `input`, `textarea` or `select`.
    pub fn value(&self, node: NodeId) -> Result<String, DomError> {
        let el = self.element(node)?;
        if !FORM_CONTROLS.contains(&el.tag.as_str()) {
            return Err(DomError::NotAFormControl(node));
        }
        if let Some(v) = &el.value {
            return Ok(v.clone());
        }
        if el.tag == "textarea" {
            return Ok(self.text_content(node));
        }
        Ok(self.attr(node, "value").unwrap_or_default().to_owned())
    }

    /// # Errors
    /// Fails when `node` is not a form control.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        if !self.is_form_control(node) {
            return Err(DomError::NotAFormControl(node));
        }
        self.element_mut(node)?.value = Some(value.to_owned());
        Ok(())
    }

    /// Restore every form control under `scope` to its default value,
    /// like `HTMLFormElement.reset()`.
    ///
    /// # Errors
    /// Fails when `scope` is not an element.
    pub fn reset_controls(&mut self, scope: NodeId) -> Result<(), DomError> {
        self.element(scope)?;
        for node in self.descendants(scope) {
            if self.is_form_control(node) {
                self.element_mut(node)?.value = None;
            }
        }
        Ok(())
    }

    // ---- focus ----

    #[must_use]
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(tag) = self.tag_name(node) else {
            return false;
        };
        if self.has_attr(node, "disabled") {
            return false;
        }
        self.has_attr(node, "tabindex")
            || FOCUSABLE_TAGS.contains(&tag)
            || (tag == "a" && self.has_attr(node, "href"))
    }

    /// Focus `node` if it is connected and focusable. Returns whether focus moved.
    ///
    /// # Errors
    /// Fails for unknown nodes.
    pub fn focus(&mut self, node: NodeId) -> Result<bool, DomError> {
        self.node(node)?;
        if !self.is_connected(node) || !self.is_focusable(node) {
            return Ok(false);
        }
        self.focused = Some(node);
        Ok(true)
    }

    pub const fn blur(&mut self) {
        self.focused = None;
    }

    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    // ---- layout ----

    /// Layout box of an element; detached or unknown nodes report an empty box.
    #[must_use]
    pub fn rect(&self, node: NodeId) -> Rect {
        self.element(node).map(|el| el.rect).unwrap_or_default()
    }

    /// # Errors
    /// Fails when `node` is not an element.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> Result<(), DomError> {
        self.element_mut(node)?.rect = rect;
        Ok(())
    }

    // ---- selectors ----

    /// First element under `scope` matching `selector`.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`] when the selector cannot be parsed.
    pub fn query_selector(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|n| list.matches(self, *n)))
    }

    /// All elements under `scope` matching `selector`, in document order.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`] when the selector cannot be parsed.
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|n| list.matches(self, *n))
            .collect())
    }

    /// # Errors
    /// Returns [`DomError::InvalidSelector`] when the selector cannot be parsed.
    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool, DomError> {
        Ok(SelectorList::parse(selector)?.matches(self, node))
    }

    /// Nearest inclusive ancestor element matching `selector`.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`] when the selector cannot be parsed.
    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        let mut current = Some(node).filter(|n| self.is_element(*n));
        while let Some(n) = current {
            if list.matches(self, n) {
                return Ok(Some(n));
            }
            current = self.parent_element(n);
        }
        Ok(None)
    }

    // ---- serialization ----

    /// Serialize `node` and its subtree as HTML.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node.0) else {
            return;
        };
        match &n.data {
            NodeData::Document => {
                for child in &n.children {
                    self.write_html(*child, out);
                }
            }
            NodeData::Text(t) => out.push_str(&escape(t, false)),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (k, v) in &el.attrs {
                    let _ = write!(out, " {k}=\"{}\"", escape(v, true));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in &n.children {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

fn escape(input: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
