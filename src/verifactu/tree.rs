use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::xml_utils::XmlWriter;
use crate::core::VerifactuError;

/// Owned XML element: local name, text content and children.
///
/// Namespaces and attributes are not kept; prefixes are applied when the
/// tree is written back out. A leaf can be marked pending: it still has to
/// be written, whatever its text says.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
    pending: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            children: Vec::new(),
            pending: false,
        }
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// No text, no children and nothing left to write.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty() && !self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Set the text and clear the pending mark.
    pub fn fill(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.pending = false;
    }

    /// Turn every leaf whose text is `marker` into an empty pending leaf.
    pub fn mark_pending(&mut self, marker: &str) {
        if self.children.is_empty() {
            if self.text == marker {
                self.text.clear();
                self.pending = true;
            }
            return;
        }
        for child in &mut self.children {
            child.mark_pending(marker);
        }
    }

    /// Parse an XML document into a tree rooted at its document element.
    pub fn parse(xml: &str) -> Result<Self, VerifactuError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(Element::new(local_name(e))),
                Ok(Event::Empty(ref e)) => {
                    attach(&mut stack, &mut root, Element::new(local_name(e)))?;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| VerifactuError::Xml(format!("bad text content: {err}")))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::End(_)) => {
                    let done = stack
                        .pop()
                        .ok_or_else(|| VerifactuError::Xml("unbalanced end tag".into()))?;
                    attach(&mut stack, &mut root, done)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(VerifactuError::Xml(format!(
                        "parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(VerifactuError::Xml("unclosed element".into()));
        }
        root.ok_or_else(|| VerifactuError::Xml("document has no root element".into()))
    }

    /// Index path of the first element matching `path`.
    ///
    /// The first segment is searched depth-first among all descendants;
    /// every following segment must be a direct child of the previous match
    /// (`"IDFactura/NumSerieFactura"`).
    pub fn locate(&self, path: &str) -> Option<Vec<usize>> {
        let mut segments = path.split('/');
        let mut indices = self.first_descendant(segments.next()?)?;
        let mut node = self.at(&indices)?;
        for segment in segments {
            let i = node.children.iter().position(|c| c.name == segment)?;
            indices.push(i);
            node = &node.children[i];
        }
        Some(indices)
    }

    fn first_descendant(&self, name: &str) -> Option<Vec<usize>> {
        for (i, child) in self.children.iter().enumerate() {
            if child.name == name {
                return Some(vec![i]);
            }
            if let Some(mut rest) = child.first_descendant(name) {
                rest.insert(0, i);
                return Some(rest);
            }
        }
        None
    }

    /// Index paths of every descendant named `name`, in document order.
    pub fn locate_all(&self, name: &str) -> Vec<Vec<usize>> {
        let mut found = Vec::new();
        let mut prefix = Vec::new();
        self.collect_named(name, &mut prefix, &mut found);
        found
    }

    fn collect_named(&self, name: &str, prefix: &mut Vec<usize>, found: &mut Vec<Vec<usize>>) {
        for (i, child) in self.children.iter().enumerate() {
            prefix.push(i);
            if child.name == name {
                found.push(prefix.clone());
            }
            child.collect_named(name, prefix, found);
            prefix.pop();
        }
    }

    /// Names of the elements strictly between `self` and the element at
    /// `indices`, outermost first.
    pub fn ancestry(&self, indices: &[usize]) -> Vec<&str> {
        let mut names = Vec::new();
        let mut node = self;
        for &i in indices.iter().take(indices.len().saturating_sub(1)) {
            match node.children.get(i) {
                Some(child) => {
                    names.push(child.name.as_str());
                    node = child;
                }
                None => break,
            }
        }
        names
    }

    pub fn at(&self, indices: &[usize]) -> Option<&Element> {
        indices
            .iter()
            .try_fold(self, |node, &i| node.children.get(i))
    }

    pub fn at_mut(&mut self, indices: &[usize]) -> Option<&mut Element> {
        indices
            .iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    pub fn find(&self, path: &str) -> Option<&Element> {
        self.locate(path).and_then(|indices| self.at(&indices))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        let indices = self.locate(path)?;
        self.at_mut(&indices)
    }

    /// Text of the element at `path`, or `""` when there is none.
    pub fn text_of(&self, path: &str) -> &str {
        self.find(path).map(|e| e.text.as_str()).unwrap_or_default()
    }

    /// Detach the first element matching `path`.
    pub fn remove(&mut self, path: &str) -> Option<Element> {
        let indices = self.locate(path)?;
        let (last, parent) = indices.split_last()?;
        let parent = self.at_mut(parent)?;
        Some(parent.children.remove(*last))
    }

    /// Detach every descendant named `name`.
    pub fn remove_all(&mut self, name: &str) {
        self.children.retain(|c| c.name != name);
        for child in &mut self.children {
            child.remove_all(name);
        }
    }

    /// Drop descendants named in `names` that end up empty. Children are
    /// pruned first, so a container whose contents were all pruned goes too.
    pub fn prune_empty(&mut self, names: &[&str]) {
        for child in &mut self.children {
            child.prune_empty(names);
        }
        self.children
            .retain(|c| !(c.is_empty() && names.contains(&c.name.as_str())));
    }

    /// Slash-separated path of the first pending descendant.
    pub fn find_pending(&self) -> Option<String> {
        for child in &self.children {
            if child.pending {
                return Some(child.name.clone());
            }
            if let Some(rest) = child.find_pending() {
                return Some(format!("{}/{rest}", child.name));
            }
        }
        None
    }

    /// Write the subtree, prefixing every element name with `prefix:`.
    pub(crate) fn write_prefixed(&self, w: &mut XmlWriter, prefix: &str) -> Result<(), VerifactuError> {
        let name = format!("{prefix}:{}", self.name);
        if self.children.is_empty() {
            if self.text.is_empty() {
                w.empty_element(&name)?;
            } else {
                w.text_element(&name, &self.text)?;
            }
            return Ok(());
        }
        w.start_element(&name)?;
        for child in &self.children {
            child.write_prefixed(w, prefix)?;
        }
        w.end_element(&name)?;
        Ok(())
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), VerifactuError> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(VerifactuError::Xml("multiple root elements".into())),
    }
    Ok(())
}
