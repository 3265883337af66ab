//! A minimal DOM element model.
//!
//!     Nodes render into [DomElement]s in two situations: the live render kept by the
//!     editor (created once, then patched through `update_dom`) and the export render used
//!     for HTML output. The model only carries what text nodes need: a tag, an optional
//!     class, ordered inline style declarations, text content and child elements.

/// A rendered element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomElement {
    tag: String,
    class_name: Option<String>,
    styles: Vec<(String, String)>,
    text: String,
    children: Vec<DomElement>,
}

impl DomElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Set the class attribute. An empty class removes the attribute.
    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        let class_name = class_name.into();
        self.class_name = if class_name.is_empty() {
            None
        } else {
            Some(class_name)
        };
    }

    pub fn children(&self) -> &[DomElement] {
        &self.children
    }

    pub fn push_child(&mut self, child: DomElement) {
        self.children.push(child);
    }

    /// Look up a single style declaration.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }

    /// Set a style declaration, keeping the original position when it already exists.
    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.styles.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.styles.push((property, value)),
        }
    }

    pub fn clear_styles(&mut self) {
        self.styles.clear();
    }

    /// Apply a `property: value; property: value` declaration list.
    ///
    /// Declarations without a colon or with an empty property are skipped.
    pub fn apply_css_text(&mut self, css: &str) {
        for declaration in css.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            if property.is_empty() {
                continue;
            }
            self.set_style(property, value.trim());
        }
    }

    /// The `style` attribute value, declarations in insertion order.
    pub fn css_text(&self) -> String {
        self.styles
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Serialize this element and its children to HTML.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(class_name) = &self.class_name {
            out.push_str(&format!(" class=\"{}\"", escape_attribute(class_name)));
        }
        if !self.styles.is_empty() {
            out.push_str(&format!(" style=\"{}\"", escape_attribute(&self.css_text())));
        }
        out.push('>');
        out.push_str(&escape_text(&self.text));
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_style_replaces_in_place() {
        let mut el = DomElement::new("span");
        el.set_style("color", "red");
        el.set_style("padding", "1px");
        el.set_style("color", "blue");

        assert_eq!(el.css_text(), "color: blue; padding: 1px");
    }

    #[test]
    fn test_apply_css_text_skips_garbage() {
        let mut el = DomElement::new("span");
        el.apply_css_text("color: red;; nonsense ; : empty; font-size:12px");

        assert_eq!(el.style("color"), Some("red"));
        assert_eq!(el.style("font-size"), Some("12px"));
        assert_eq!(el.styles().len(), 2);
    }

    #[test]
    fn test_empty_class_removes_attribute() {
        let mut el = DomElement::new("span");
        el.set_class_name("a");
        el.set_class_name("");
        assert_eq!(el.class_name(), None);
    }

    #[test]
    fn test_to_html_escapes_text_and_attributes() {
        let mut el = DomElement::new("span").with_text("a < b & [c]");
        el.set_class_name("x\"y");

        assert_eq!(
            el.to_html(),
            "<span class=\"x&quot;y\">a &lt; b &amp; [c]</span>"
        );
    }

    #[test]
    fn test_to_html_nests_children() {
        let el = DomElement::new("p")
            .with_child(DomElement::new("span").with_text("a"))
            .with_child(DomElement::new("code").with_text("b"));

        assert_eq!(el.to_html(), "<p><span>a</span><code>b</code></p>");
    }
}
