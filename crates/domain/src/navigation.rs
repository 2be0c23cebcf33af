use serde::{Deserialize, Serialize};

/// One link in a portal menu, optionally with nested sub-items.
///
/// An empty `roles` list means the item is visible to everyone who can see
/// the parent section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    id: String,
    label: String,
    href: String,
    badge: Option<String>,
    roles: Vec<String>,
    children: Vec<NavItem>,
}

impl NavItem {
    /// Creates an unrestricted item without badge or children.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            href: href.into(),
            badge: None,
            roles: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Restricts the item to the given role names.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches a badge label.
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Attaches sub-items.
    #[must_use]
    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        self.children = children;
        self
    }

    /// Returns a copy of this item carrying different children.
    #[must_use]
    pub fn with_filtered_children(&self, children: Vec<NavItem>) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            href: self.href.clone(),
            badge: self.badge.clone(),
            roles: self.roles.clone(),
            children,
        }
    }

    /// Returns the stable item id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the link target.
    #[must_use]
    pub fn href(&self) -> &str {
        self.href.as_str()
    }

    /// Returns the badge label, if any.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    /// Returns the allow-list of role names; empty means unrestricted.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns nested sub-items.
    #[must_use]
    pub fn children(&self) -> &[NavItem] {
        &self.children
    }
}

/// Titled group of menu items with an optional section-level allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    section: String,
    items: Vec<NavItem>,
    roles: Vec<String>,
}

impl NavSection {
    /// Creates an unrestricted section.
    #[must_use]
    pub fn new(section: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self {
            section: section.into(),
            items,
            roles: Vec::new(),
        }
    }

    /// Restricts the whole section to the given role names.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy of this section carrying different items.
    #[must_use]
    pub fn with_items(&self, items: Vec<NavItem>) -> Self {
        Self {
            section: self.section.clone(),
            items,
            roles: self.roles.clone(),
        }
    }

    /// Returns the section title.
    #[must_use]
    pub fn section(&self) -> &str {
        self.section.as_str()
    }

    /// Returns the items in authored order.
    #[must_use]
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Returns the section allow-list; empty means unrestricted.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}
