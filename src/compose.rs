//! Layout composition
//!
//! Wraps a matched page in its layout chain. The chain is ordered outermost
//! first, so composition walks it back to front: the page renders first,
//! then each layout receives the subtree rendered so far as `children`, and
//! the root layout is applied last, outermost of all.
//!
//! Failure handling is asymmetric on purpose. A page render error aborts the
//! composition and surfaces to the render driver, which shows an inline
//! error panel. A layout render error is isolated: the failed layout's
//! subtree is replaced with an empty fragment, a warning is logged, and the
//! remaining outer layouts still render. One broken section layout must not
//! take the whole shell down.

use crate::component::{ComponentRef, PageProps, ViewNode};
use crate::error::RenderError;
use crate::params::{QueryParams, RouteParams};
use crate::warn_log;

/// A matched page together with the layouts that wrap it.
#[derive(Clone)]
pub struct ComposedRoute {
    /// The page component.
    pub page: ComponentRef,
    /// Layout chain, outermost first.
    pub layouts: Vec<ComponentRef>,
    /// Global root layout, applied outside everything else.
    pub root_layout: Option<ComponentRef>,
}

impl ComposedRoute {
    /// Compose a page with its layout chain.
    pub fn new(
        page: ComponentRef,
        layouts: Vec<ComponentRef>,
        root_layout: Option<ComponentRef>,
    ) -> Self {
        Self {
            page,
            layouts,
            root_layout,
        }
    }

    /// Render the page and wrap it in the layout chain.
    ///
    /// Page errors propagate; layout errors are replaced with an empty
    /// fragment so outer layouts still render.
    pub fn render(&self, params: RouteParams, query: QueryParams) -> Result<ViewNode, RenderError> {
        let props = PageProps::page(params, query);

        let mut view = self.page.render(props.clone())?;

        // Innermost layout first, so walk the chain from the back.
        for (index, layout) in self.layouts.iter().enumerate().rev() {
            view = render_layout(layout, &props, view, index);
        }

        if let Some(root) = &self.root_layout {
            view = render_layout(root, &props, view, usize::MAX);
        }

        Ok(view)
    }
}

impl std::fmt::Debug for ComposedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedRoute")
            .field("layouts", &self.layouts.len())
            .field("root_layout", &self.root_layout.is_some())
            .finish()
    }
}

fn render_layout(
    layout: &ComponentRef,
    props: &PageProps,
    children: ViewNode,
    index: usize,
) -> ViewNode {
    match layout.render(props.with_children(children)) {
        Ok(view) => view,
        Err(err) => {
            if index == usize::MAX {
                warn_log!("root layout failed to render, subtree dropped: {}", err);
            } else {
                warn_log!("layout {} failed to render, subtree dropped: {}", index, err);
            }
            ViewNode::empty_fragment()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{component, el};

    fn page(label: &'static str) -> ComponentRef {
        component(move |_: PageProps| Ok(el("main").text(label).build()))
    }

    fn layout(label: &'static str) -> ComponentRef {
        component(move |mut props: PageProps| {
            Ok(el("div")
                .attr("data-layout", label)
                .child(props.take_children())
                .build())
        })
    }

    fn failing() -> ComponentRef {
        component(|_| Err(RenderError::component("boom")))
    }

    fn render(composed: &ComposedRoute) -> String {
        composed
            .render(RouteParams::new(), QueryParams::new())
            .unwrap()
            .render_to_string()
    }

    #[test]
    fn page_alone() {
        let composed = ComposedRoute::new(page("home"), Vec::new(), None);
        assert_eq!(render(&composed), "<main>home</main>");
    }

    #[test]
    fn nesting_order_outermost_first() {
        let composed = ComposedRoute::new(
            page("post"),
            vec![layout("outer"), layout("inner")],
            Some(layout("root")),
        );

        assert_eq!(
            render(&composed),
            "<div data-layout=\"root\">\
             <div data-layout=\"outer\">\
             <div data-layout=\"inner\">\
             <main>post</main>\
             </div></div></div>"
        );
    }

    #[test]
    fn root_layout_wraps_even_without_chain() {
        let composed = ComposedRoute::new(page("home"), Vec::new(), Some(layout("root")));
        assert_eq!(
            render(&composed),
            "<div data-layout=\"root\"><main>home</main></div>"
        );
    }

    #[test]
    fn failed_layout_is_isolated() {
        let composed = ComposedRoute::new(
            page("post"),
            vec![layout("outer"), failing()],
            None,
        );

        // The failing inner layout drops its subtree; the outer layout still
        // renders around the empty substitute.
        assert_eq!(render(&composed), "<div data-layout=\"outer\"></div>");
    }

    #[test]
    fn page_error_propagates() {
        let composed = ComposedRoute::new(failing(), vec![layout("outer")], None);
        let err = composed
            .render(RouteParams::new(), QueryParams::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::Component(_)));
    }

    #[test]
    fn params_reach_every_layer() {
        let echo_page = component(|props: PageProps| {
            let id = props.params.get("id").cloned().unwrap_or_default();
            Ok(el("main").text(id).build())
        });
        let echo_layout = component(|mut props: PageProps| {
            let id = props.params.get("id").cloned().unwrap_or_default();
            Ok(el("section")
                .attr("data-id", id)
                .child(props.take_children())
                .build())
        });

        let composed = ComposedRoute::new(echo_page, vec![echo_layout], None);
        let mut params = RouteParams::new();
        params.insert("id".to_string(), "42".to_string());
        let html = composed
            .render(params, QueryParams::new())
            .unwrap()
            .render_to_string();
        assert_eq!(html, "<section data-id=\"42\"><main>42</main></section>");
    }
}
