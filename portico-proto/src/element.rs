//! Ordered request element tree.
//!
//! The gateway schema is order-sensitive, so a request fragment is kept as an
//! explicit tree of named elements rather than a map. Elements carry either
//! text or children (never both), plus optional attributes.

/// A single named node in a request fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Self>,
}

impl Element {
    /// Creates an empty container element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates a leaf element holding `text`.
    #[must_use]
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(name)
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element when one is given.
    #[must_use]
    pub fn child_opt(mut self, child: Option<Self>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    /// Appends a leaf child.
    #[must_use]
    pub fn leaf_child(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.child(Self::leaf(name, text))
    }

    /// Appends a leaf child only when `text` is present.
    #[must_use]
    pub fn leaf_opt<T: Into<String>>(self, name: impl Into<String>, text: Option<T>) -> Self {
        match text {
            Some(text) => self.leaf_child(name, text),
            None => self,
        }
    }

    /// Appends a child element in place.
    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Returns `Some(self)` unless the element has neither text nor children.
    ///
    /// Optional blocks are built speculatively and dropped here so that an
    /// absent block never produces an empty element on the wire.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    /// Returns `true` when the element has neither text nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.children.is_empty()
    }

    /// Returns the element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text content, if this is a leaf.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the child elements in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Finds the first direct child with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follows a path of child names from this element.
    #[must_use]
    pub fn find_path(&self, path: &[&str]) -> Option<&Self> {
        path.iter().try_fold(self, |node, name| node.find(name))
    }

    /// Returns the text at the end of `path`, if any.
    #[must_use]
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find_path(path).and_then(Self::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_keep_insertion_order() {
        let el = Element::new("Block1")
            .leaf_child("AllowDup", "Y")
            .leaf_child("Amt", "10.00")
            .child(Element::new("CardData").leaf_child("CardNbr", "4111"));
        let names: Vec<&str> = el.children().iter().map(Element::name).collect();
        assert_eq!(names, vec!["AllowDup", "Amt", "CardData"]);
        assert_eq!(el.text_at(&["CardData", "CardNbr"]), Some("4111"));
    }

    #[test]
    fn test_optional_leaves_are_skipped() {
        let el = Element::new("AdditionalTxnFields")
            .leaf_opt("Description", None::<String>)
            .leaf_opt("InvoiceNbr", Some("INV-1"));
        assert_eq!(el.children().len(), 1);
        assert!(el.find("Description").is_none());
    }

    #[test]
    fn test_non_empty_drops_empty_containers() {
        assert!(Element::new("DirectMktData").non_empty().is_none());
        assert!(Element::leaf("Amt", "1.00").non_empty().is_some());
    }

    #[test]
    fn test_attributes() {
        let el = Element::leaf("TrackData", "%B4111^").attribute("method", "swipe");
        assert_eq!(
            el.attributes(),
            &[("method".to_owned(), "swipe".to_owned())]
        );
    }
}
