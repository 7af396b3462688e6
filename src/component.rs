//! Component model and render results
//!
//! A routable component is anything implementing [`Component`]: the single
//! required capability is `render`, while `on_mount` / `on_unmount` are
//! optional hooks with no-op defaults. Pages, layouts, and the not-found
//! view all share this trait; a layout additionally receives the already
//! rendered subtree through [`PageProps::children`].
//!
//! Render results are [`ViewNode`] trees. A tree renders to an HTML string
//! on any target and materializes to real DOM nodes on wasm32, which keeps
//! the composer and the render driver testable off-browser.

use crate::error::RenderError;
use crate::params::{QueryParams, RouteParams};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Props passed to every component render.
#[derive(Debug, Clone, Default)]
pub struct PageProps {
    /// Parameters extracted from the matched route pattern.
    pub params: RouteParams,
    /// Parameters parsed from the query string.
    pub query: QueryParams,
    /// Rendered subtree, present only for layout components.
    pub children: Option<ViewNode>,
}

impl PageProps {
    /// Props for a page render.
    pub fn page(params: RouteParams, query: QueryParams) -> Self {
        Self {
            params,
            query,
            children: None,
        }
    }

    /// The same props with a rendered subtree attached, for a layout render.
    pub fn with_children(&self, children: ViewNode) -> Self {
        Self {
            params: self.params.clone(),
            query: self.query.clone(),
            children: Some(children),
        }
    }

    /// Take the children, substituting an empty fragment when absent.
    pub fn take_children(&mut self) -> ViewNode {
        self.children.take().unwrap_or_else(ViewNode::empty_fragment)
    }
}

/// A renderable route component.
///
/// `render` is required; the lifecycle hooks default to no-ops. The router
/// guarantees that a mounted component's `on_unmount` fires before the next
/// component's `render` is called.
pub trait Component {
    /// Produce the view for this component.
    fn render(&self, props: PageProps) -> Result<ViewNode, RenderError>;

    /// Called via microtask after the component's view is attached.
    fn on_mount(&self) {}

    /// Called before the component is replaced by the next navigation.
    fn on_unmount(&self) {}
}

/// Shared component handle.
///
/// The router runs entirely on the UI thread, so components are shared with
/// `Rc` rather than `Arc`.
pub type ComponentRef = Rc<dyn Component>;

struct FnComponent<F>(F);

impl<F> Component for FnComponent<F>
where
    F: Fn(PageProps) -> Result<ViewNode, RenderError>,
{
    fn render(&self, props: PageProps) -> Result<ViewNode, RenderError> {
        (self.0)(props)
    }
}

/// Wrap a plain function as a component.
///
/// # Example
///
/// ```
/// use spa_navigator::{component, el, PageProps};
///
/// let home = component(|_props: PageProps| Ok(el("h1").text("Home").build()));
/// ```
pub fn component<F>(f: F) -> ComponentRef
where
    F: Fn(PageProps) -> Result<ViewNode, RenderError> + 'static,
{
    Rc::new(FnComponent(f))
}

// ============================================================================
// ViewNode
// ============================================================================

/// The result of a component render.
///
/// One of: an element tree, a text node, a raw HTML string (inserted
/// unescaped), a fragment of siblings, or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    /// An element with a tag, attributes, and children.
    Element {
        /// Tag name, e.g. `"div"`.
        tag: String,
        /// Attributes in deterministic order.
        attrs: BTreeMap<String, String>,
        /// Child nodes.
        children: Vec<ViewNode>,
    },
    /// Escaped text content.
    Text(String),
    /// Raw HTML, inserted without escaping.
    RawHtml(String),
    /// A sequence of sibling nodes with no wrapper element.
    Fragment(Vec<ViewNode>),
    /// Renders nothing.
    Empty,
}

impl ViewNode {
    /// A text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// A raw HTML node. The content is trusted and inserted verbatim.
    pub fn raw_html(html: impl Into<String>) -> Self {
        Self::RawHtml(html.into())
    }

    /// An empty fragment, the substitute for a failed subtree.
    pub fn empty_fragment() -> Self {
        Self::Fragment(Vec::new())
    }

    /// Render the tree to an HTML string.
    pub fn render_to_string(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::RawHtml(html) => out.push_str(html),
            Self::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Self::Empty => {}
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Element builder
// ============================================================================

/// Builder for [`ViewNode::Element`].
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    attrs: BTreeMap<String, String>,
    children: Vec<ViewNode>,
}

/// Start building an element with the given tag.
///
/// # Example
///
/// ```
/// use spa_navigator::el;
///
/// let view = el("div")
///     .attr("class", "panel")
///     .child(el("span").text("hello").build())
///     .build();
/// assert_eq!(view.render_to_string(), "<div class=\"panel\"><span>hello</span></div>");
/// ```
pub fn el(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        tag: tag.into(),
        attrs: BTreeMap::new(),
        children: Vec::new(),
    }
}

impl ElementBuilder {
    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append a child node.
    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a text child.
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(ViewNode::text(content))
    }

    /// Finish the element.
    pub fn build(self) -> ViewNode {
        ViewNode::Element {
            tag: self.tag,
            attrs: self.attrs,
            children: self.children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped() {
        let view = el("p").text("a < b & c").build();
        assert_eq!(view.render_to_string(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn raw_html_is_not_escaped() {
        let view = ViewNode::raw_html("<b>bold</b>");
        assert_eq!(view.render_to_string(), "<b>bold</b>");
    }

    #[test]
    fn fragment_renders_siblings() {
        let view = ViewNode::Fragment(vec![
            el("li").text("one").build(),
            el("li").text("two").build(),
        ]);
        assert_eq!(view.render_to_string(), "<li>one</li><li>two</li>");
    }

    #[test]
    fn empty_renders_nothing() {
        assert_eq!(ViewNode::Empty.render_to_string(), "");
        assert_eq!(ViewNode::empty_fragment().render_to_string(), "");
    }

    #[test]
    fn attributes_escaped_and_ordered() {
        let view = el("a")
            .attr("href", "/x")
            .attr("class", "nav \"quoted\"")
            .build();
        assert_eq!(
            view.render_to_string(),
            "<a class=\"nav &quot;quoted&quot;\" href=\"/x\"></a>"
        );
    }

    #[test]
    fn fn_component_renders() {
        let c = component(|props: PageProps| {
            let slug = props.params.get("slug").cloned().unwrap_or_default();
            Ok(el("article").text(slug).build())
        });

        let mut params = RouteParams::new();
        params.insert("slug".to_string(), "intro".to_string());
        let view = c
            .render(PageProps::page(params, QueryParams::new()))
            .unwrap();
        assert_eq!(view.render_to_string(), "<article>intro</article>");
    }

    #[test]
    fn lifecycle_hooks_default_to_noops() {
        let c = component(|_| Ok(ViewNode::Empty));
        c.on_mount();
        c.on_unmount();
    }

    #[test]
    fn props_with_children() {
        let props = PageProps::default();
        let mut layout_props = props.with_children(ViewNode::text("inner"));
        assert_eq!(layout_props.take_children(), ViewNode::text("inner"));
        // A second take yields the empty substitute.
        assert_eq!(layout_props.take_children(), ViewNode::empty_fragment());
    }
}
