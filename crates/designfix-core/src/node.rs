//! Markup tree model.
//!
//! The external parser hands the pipeline a tree of [`Element`] nodes and the
//! external printer serializes the mutated tree back to source text; JSON via
//! serde is the exchange format at both boundaries. Inside the pipeline the
//! tree is a single exclusively-owned mutable structure for the lifetime of
//! one conversion job — passes mutate it in place and every later pass sees
//! those mutations.

use serde::{Deserialize, Serialize};

/// A single element of the parsed markup tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element type tag (e.g. `div`, `span`, `svg`).
    pub tag: String,
    /// Ordered attribute list. Order is load-bearing: passes append and
    /// prepend at specific positions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<Attr>,
    /// Ordered children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

/// A named attribute on an [`Element`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub name: String,
    pub value: AttrValue,
}

/// An attribute value as the parser produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    /// A plain string literal.
    Literal(String),
    /// An opaque computed expression. Passes never rewrite these.
    Expression(String),
    /// An inline style declaration.
    Style(StyleDecl),
}

/// An ordered `property → literal value` style declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDecl(Vec<(String, String)>);

impl StyleDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, property: &str) -> bool {
        self.0.iter().any(|(p, _)| p == property)
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite an existing entry in place, or append a new one.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.0.push((property, value)),
        }
    }

    /// Insert an entry at the front of the declaration.
    pub fn prepend(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(0, (property.into(), value.into()));
    }

    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.push((property.into(), value.into()));
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Attribute names the generator uses for the utility-class list.
const CLASS_ATTRS: &[&str] = &["className", "class"];

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Convenience constructor for an element with a literal class list.
    pub fn with_class(tag: impl Into<String>, class: impl Into<String>) -> Self {
        let mut el = Self::new(tag);
        el.push_attr("className", AttrValue::Literal(class.into()));
        el
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    pub fn attr_mut(&mut self, name: &str) -> Option<&mut AttrValue> {
        self.attrs
            .iter_mut()
            .find(|a| a.name == name)
            .map(|a| &mut a.value)
    }

    /// Append an attribute as the element's last attribute.
    pub fn push_attr(&mut self, name: impl Into<String>, value: AttrValue) {
        self.attrs.push(Attr {
            name: name.into(),
            value,
        });
    }

    /// Remove an attribute by name, returning its value if it was present.
    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        let idx = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(idx).value)
    }

    /// The literal value of an attribute, if the attribute exists and its
    /// value is a literal. Expressions report `None` — callers treat that
    /// the same as an absent attribute.
    pub fn attr_literal(&self, name: &str) -> Option<&str> {
        match self.attr(name)? {
            AttrValue::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// The element's literal class list (`className` or `class`).
    ///
    /// Returns `None` when the class value is a computed expression —
    /// dynamic class values are never rewritten.
    pub fn class_literal(&self) -> Option<&str> {
        CLASS_ATTRS.iter().find_map(|name| self.attr_literal(name))
    }

    /// Replace the literal class list, creating a `className` attribute if
    /// the element has none. An expression-valued class attribute is left
    /// alone and a new attribute is NOT created over it.
    pub fn set_class_literal(&mut self, class: impl Into<String>) {
        let class = class.into();
        for name in CLASS_ATTRS {
            if let Some(value) = self.attr_mut(name) {
                if let AttrValue::Literal(s) = value {
                    *s = class;
                }
                return;
            }
        }
        self.push_attr("className", AttrValue::Literal(class));
    }

    /// The element's inline style declaration, if the `style` attribute
    /// exists and actually holds one.
    pub fn style(&self) -> Option<&StyleDecl> {
        match self.attr("style")? {
            AttrValue::Style(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut StyleDecl> {
        match self.attr_mut("style")? {
            AttrValue::Style(decl) => Some(decl),
            _ => None,
        }
    }

    /// Pre-order traversal over this element and every descendant.
    pub fn visit_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}
