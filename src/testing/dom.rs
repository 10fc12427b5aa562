//! In-memory DOM.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Write as _};
use std::rc::Rc;

use crate::dom::{DomElement, DomNode, EventListener, ListenerId};
use crate::element::Props;
use crate::types::DomEvent;

/// A DOM element (or text node) held in memory.
///
/// Supports the selector subset components use: `tag`, `#id`, `.class`,
/// `*`, compounds such as `li.todo.done`, and comma separated lists.
pub struct MemoryElement {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: Option<String>,
    children: RefCell<Vec<Rc<MemoryElement>>>,
    listeners: RefCell<Vec<(ListenerId, String, EventListener)>>,
    next_listener: Cell<ListenerId>,
}

impl MemoryElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            text: None,
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    /// A text node. Never matches a selector.
    pub fn text(content: impl Into<String>) -> Self {
        let mut node = Self::new("#text");
        node.text = Some(content.into());
        node
    }

    /// Element for a host tag, taking `id` and `class` from `props`.
    pub fn from_props(tag: &str, props: &Props) -> Self {
        let mut element = Self::new(tag);
        element.id = props.get_str("id").map(str::to_string);
        if let Some(classes) = props.get_str("class") {
            element.classes = classes.split_whitespace().map(str::to_string).collect();
        }
        element
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn append(&self, child: impl Into<Rc<MemoryElement>>) {
        self.children.borrow_mut().push(child.into());
    }

    pub fn replace_children(&self, children: Vec<Rc<MemoryElement>>) {
        *self.children.borrow_mut() = children;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn children(&self) -> Vec<Rc<MemoryElement>> {
        self.children.borrow().clone()
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self
                .children
                .borrow()
                .iter()
                .map(|child| child.text_content())
                .collect(),
        }
    }

    /// Markup of this subtree, with `id` and `class` attributes only.
    pub fn html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
            return;
        }
        let _ = write!(out, "<{}", self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{id}\"");
        }
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", self.classes.join(" "));
        }
        out.push('>');
        for child in self.children.borrow().iter() {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    /// Listeners attached to this element for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .count()
    }

    // -------------------------------------------------------------------------
    // Selectors
    // -------------------------------------------------------------------------

    /// Descendants matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Vec<Rc<MemoryElement>> {
        let mut found = Vec::new();
        for child in self.children.borrow().iter() {
            child.collect_matching(selector, &mut found);
        }
        found
    }

    fn collect_matching(self: &Rc<Self>, selector: &str, found: &mut Vec<Rc<MemoryElement>>) {
        if self.matches(selector) {
            found.push(self.clone());
        }
        for child in self.children.borrow().iter() {
            child.collect_matching(selector, found);
        }
    }

    pub fn matches(&self, selector: &str) -> bool {
        self.text.is_none()
            && selector
                .split(',')
                .map(str::trim)
                .any(|compound| self.matches_compound(compound))
    }

    fn matches_compound(&self, compound: &str) -> bool {
        let parts = split_compound(compound);
        !parts.is_empty() && parts.iter().all(|simple| self.matches_simple(simple))
    }

    fn matches_simple(&self, simple: &Simple<'_>) -> bool {
        match simple {
            Simple::Tag(tag) => *tag == "*" || *tag == self.tag,
            Simple::Id(id) => self.id.as_deref() == Some(*id),
            Simple::Class(class) => self.has_class(class),
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Deliver `event` to this element's listeners. Returns how many ran.
    ///
    /// `target` is filled with this element's id when the event has none.
    pub fn dispatch(&self, event: &DomEvent) -> usize {
        let mut event = event.clone();
        if event.target.is_none() {
            event.target = self.id.clone();
        }

        let listeners: Vec<EventListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, name, _)| *name == event.event_type)
            .map(|(_, _, listener)| listener.clone())
            .collect();

        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    /// Dispatch to every descendant matching `selector`.
    pub fn dispatch_to(&self, selector: &str, event: &DomEvent) -> usize {
        self.select(selector)
            .iter()
            .map(|element| element.dispatch(event))
            .sum()
    }
}

enum Simple<'a> {
    Tag(&'a str),
    Id(&'a str),
    Class(&'a str),
}

/// `li#a.b.c` → `[Tag(li), Id(a), Class(b), Class(c)]`
fn split_compound(compound: &str) -> Vec<Simple<'_>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut kind = 't';

    for (index, ch) in compound.char_indices() {
        if ch == '#' || ch == '.' {
            push_simple(&mut parts, kind, &compound[start..index]);
            kind = ch;
            start = index + 1;
        }
    }
    push_simple(&mut parts, kind, &compound[start..]);
    parts
}

fn push_simple<'a>(parts: &mut Vec<Simple<'a>>, kind: char, name: &'a str) {
    if name.is_empty() {
        return;
    }
    parts.push(match kind {
        '#' => Simple::Id(name),
        '.' => Simple::Class(name),
        _ => Simple::Tag(name),
    });
}

impl DomNode for MemoryElement {
    fn query_selector_all(&self, selector: &str) -> Vec<Rc<dyn DomElement>> {
        self.select(selector)
            .into_iter()
            .map(|element| element as Rc<dyn DomElement>)
            .collect()
    }
}

impl DomElement for MemoryElement {
    fn add_event_listener(&self, event: &str, listener: EventListener) -> ListenerId {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners
            .borrow_mut()
            .push((id, event.to_string(), listener));
        id
    }

    fn remove_event_listener(&self, event: &str, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(entry_id, name, _)| !(*entry_id == id && name == event));
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html())
    }
}
