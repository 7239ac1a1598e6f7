//! Output regions that display view-models.

use crate::render::Renderer;
use crate::view::OutputView;

/// A display area whose content is fully replaced on every update.
#[cfg_attr(test, mockall::automock)]
pub trait OutputRegion {
    /// Replace the region's content with the view.
    fn replace(&mut self, view: &OutputView);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, view: &OutputView) -> String {
        (**self).render(view)
    }
}

/// Region that keeps the latest rendering of the last view it was given.
#[derive(Debug, Default, Clone)]
pub struct RenderedRegion<R> {
    renderer: R,
    content: Option<String>,
}

impl<R: Renderer> RenderedRegion<R> {
    /// Create an empty, hidden region.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            content: None,
        }
    }

    /// Whether anything has been shown yet.
    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }

    /// Current rendered content.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Take the rendered content, leaving the region hidden.
    pub fn take_content(&mut self) -> Option<String> {
        self.content.take()
    }
}

impl<R: Renderer> OutputRegion for RenderedRegion<R> {
    fn replace(&mut self, view: &OutputView) {
        self.content = Some(self.renderer.render(view));
    }
}
