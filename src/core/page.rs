//! # Pages
//!
//! The table view is a stack of named pages. The primary table is always at
//! the bottom; overlays are pushed on top of it and the frontmost one
//! receives keyboard input.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// The table itself, with its footer.
    Primary,
    /// "Please wait" overlay shown while a background task loads.
    Secondary,
    /// Key binding summary.
    Help,
    /// The transition menu.
    Action,
}

impl Page {
    pub fn name(self) -> &'static str {
        match self {
            Page::Primary => "primary",
            Page::Secondary => "secondary",
            Page::Help => "help",
            Page::Action => "action",
        }
    }
}

/// Visible pages, back to front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStack {
    visible: Vec<Page>,
}

impl Default for PageStack {
    fn default() -> Self {
        Self {
            visible: vec![Page::Primary],
        }
    }
}

impl PageStack {
    /// Makes `page` visible. A page that is already visible keeps its place.
    pub fn show(&mut self, page: Page) {
        if !self.is_visible(page) {
            self.visible.push(page);
        }
    }

    /// Hides `page`. The primary page cannot be hidden.
    pub fn hide(&mut self, page: Page) {
        if page != Page::Primary {
            self.visible.retain(|p| *p != page);
        }
    }

    /// Shows `page` and moves it in front of every other page.
    pub fn send_to_front(&mut self, page: Page) {
        self.hide(page);
        self.visible.push(page);
    }

    pub fn is_visible(&self, page: Page) -> bool {
        self.visible.contains(&page)
    }

    pub fn front(&self) -> Page {
        self.visible.last().copied().unwrap_or(Page::Primary)
    }

    /// Visible pages in draw order.
    pub fn iter(&self) -> impl Iterator<Item = Page> + '_ {
        self.visible.iter().copied()
    }
}
