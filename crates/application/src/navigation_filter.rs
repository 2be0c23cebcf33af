use procura_domain::{NavItem, NavSection};

use crate::{AuthorizationEngine, SessionContext};

/// Returns the menu the session may see.
///
/// Section allow-lists are checked against the enum role only; item
/// allow-lists go through [`AuthorizationEngine::has_any_role`] and apply
/// recursively to sub-items. A surviving parent keeps its own link even when
/// all of its children are hidden. Sections left without items are dropped,
/// and authored order is preserved throughout.
#[must_use]
pub fn filter_navigation(
    engine: &AuthorizationEngine,
    context: &SessionContext,
    sections: &[NavSection],
) -> Vec<NavSection> {
    let Some(user) = context.active_user() else {
        return Vec::new();
    };

    sections
        .iter()
        .filter(|section| {
            section.roles().is_empty()
                || engine
                    .matcher()
                    .matches_any(user.role().as_str(), section.roles())
        })
        .filter_map(|section| {
            let items = filter_items(engine, context, section.items());
            (!items.is_empty()).then(|| section.with_items(items))
        })
        .collect()
}

fn filter_items(
    engine: &AuthorizationEngine,
    context: &SessionContext,
    items: &[NavItem],
) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| item.roles().is_empty() || engine.has_any_role(context, item.roles()))
        .map(|item| {
            if item.children().is_empty() {
                item.clone()
            } else {
                item.with_filtered_children(filter_items(engine, context, item.children()))
            }
        })
        .collect()
}
