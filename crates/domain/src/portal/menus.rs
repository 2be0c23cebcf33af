//! Hand-authored portal menus.
//!
//! Role lists mix enum role names with RBAC role names created by tenant
//! administrators; both are matched by name when the menu is filtered.

use crate::{NavItem, NavSection};

pub(super) fn admin() -> Vec<NavSection> {
    vec![
        NavSection::new(
            "Overview",
            vec![NavItem::new("admin-dashboard", "Dashboard", "/admin/dashboard")],
        ),
        NavSection::new(
            "Access control",
            vec![
                NavItem::new("admin-users", "Users", "/admin/users"),
                NavItem::new("admin-roles", "Roles & permissions", "/admin/rbac/roles")
                    .with_children(vec![
                        NavItem::new("admin-roles-new", "New role", "/admin/rbac/roles/new"),
                        NavItem::new(
                            "admin-role-assignments",
                            "Assignments",
                            "/admin/rbac/assignments",
                        ),
                    ]),
            ],
        )
        .with_roles(["ADMIN"]),
        NavSection::new(
            "Procurement",
            vec![
                NavItem::new("admin-tenders", "Tenders", "/admin/tenders"),
                NavItem::new("admin-vendors", "Vendors", "/admin/vendors")
                    .with_badge("review"),
                NavItem::new("admin-categories", "Categories", "/admin/categories"),
            ],
        ),
        NavSection::new(
            "Tenant",
            vec![
                NavItem::new("admin-settings", "Settings", "/admin/settings"),
                NavItem::new("admin-audit", "Audit trail", "/admin/audit")
                    .with_roles(["ADMIN", "AUDITOR"]),
            ],
        ),
    ]
}

pub(super) fn vendor() -> Vec<NavSection> {
    vec![
        NavSection::new(
            "Overview",
            vec![NavItem::new("vendor-dashboard", "Dashboard", "/vendor/dashboard")],
        ),
        NavSection::new(
            "Opportunities",
            vec![
                NavItem::new("vendor-tenders", "Open tenders", "/vendor/tenders")
                    .with_badge("new"),
                NavItem::new("vendor-bids", "My bids", "/vendor/bids"),
            ],
        ),
        NavSection::new(
            "Account",
            vec![
                NavItem::new("vendor-profile", "Company profile", "/vendor/profile"),
                NavItem::new("vendor-documents", "Documents", "/vendor/documents"),
                NavItem::new("vendor-invoices", "Invoices", "/vendor/invoices"),
            ],
        ),
    ]
}

pub(super) fn buyer() -> Vec<NavSection> {
    vec![
        NavSection::new(
            "Overview",
            vec![NavItem::new("buyer-dashboard", "Dashboard", "/buyer/dashboard")],
        ),
        NavSection::new(
            "Sourcing",
            vec![
                NavItem::new("buyer-tenders", "Tenders", "/buyer/tenders").with_children(vec![
                    NavItem::new("buyer-tenders-all", "All tenders", "/buyer/tenders"),
                    NavItem::new("buyer-tenders-new", "Create tender", "/buyer/tenders/new")
                        .with_roles(["BUYER", "MANAGER", "PROCUREMENT_MANAGER"]),
                ]),
                NavItem::new("buyer-bids", "Bid evaluation", "/buyer/bids")
                    .with_roles(["BUYER", "MANAGER", "EVALUATOR"]),
                NavItem::new("buyer-vendors", "Vendors", "/buyer/vendors"),
            ],
        ),
        NavSection::new(
            "Approvals",
            vec![
                NavItem::new("buyer-approvals", "Pending approvals", "/buyer/approvals")
                    .with_badge("pending"),
                NavItem::new(
                    "buyer-approval-history",
                    "Approval history",
                    "/buyer/approvals/history",
                ),
            ],
        )
        .with_roles(["MANAGER", "APPROVER", "ADMIN"]),
        NavSection::new(
            "Orders",
            vec![
                NavItem::new("buyer-requisitions", "Requisitions", "/buyer/requisitions"),
                NavItem::new("buyer-orders", "Purchase orders", "/buyer/orders"),
            ],
        ),
        NavSection::new(
            "Reports",
            vec![NavItem::new("buyer-spend", "Spend analysis", "/buyer/reports/spend")],
        )
        .with_roles(["MANAGER", "ADMIN"]),
    ]
}

pub(super) fn finance() -> Vec<NavSection> {
    vec![
        NavSection::new(
            "Overview",
            vec![NavItem::new("finance-dashboard", "Dashboard", "/finance/dashboard")],
        ),
        NavSection::new(
            "Payables",
            vec![
                NavItem::new("finance-invoices", "Invoices", "/finance/invoices")
                    .with_badge("due"),
                NavItem::new("finance-payments", "Payments", "/finance/payments")
                    .with_roles(["FINANCE", "PAYMENT_OFFICER"]),
            ],
        ),
        NavSection::new(
            "Budgets",
            vec![
                NavItem::new("finance-budgets", "Budgets", "/finance/budgets"),
                NavItem::new("finance-cost-centers", "Cost centers", "/finance/cost-centers"),
            ],
        )
        .with_roles(["FINANCE", "MANAGER"]),
    ]
}

pub(super) fn business() -> Vec<NavSection> {
    vec![
        NavSection::new(
            "Workspace",
            vec![
                NavItem::new("business-dashboard", "Dashboard", "/business/dashboard"),
                NavItem::new(
                    "business-requisitions",
                    "My requisitions",
                    "/business/requisitions",
                ),
                NavItem::new("business-catalog", "Catalog", "/business/catalog"),
            ],
        ),
        NavSection::new(
            "Administration",
            vec![NavItem::new(
                "business-settings",
                "Business unit settings",
                "/business/settings",
            )],
        )
        .with_roles(["ADMIN"]),
    ]
}
