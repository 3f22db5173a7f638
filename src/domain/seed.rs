//! Default records inserted into a fresh database.

use super::user::UserRole;

/// Account created on first run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultUser {
    pub username: &'static str,
    pub password: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: UserRole,
}

/// Tag created on first run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTag {
    pub name: &'static str,
    pub description: &'static str,
}

/// Page template created on first run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPage {
    pub name: &'static str,
    pub heading: &'static str,
    pub markup_language: &'static str,
    pub content: &'static str,
}

/// One account per role. Operators are expected to change these passwords
/// after the first login.
pub const DEFAULT_USERS: &[DefaultUser] = &[
    DefaultUser {
        username: "admin",
        password: "adminA_1",
        first_name: "Admin",
        last_name: "Admin",
        role: UserRole::Administrator,
    },
    DefaultUser {
        username: "contributor",
        password: "contributorC_1",
        first_name: "Contributor",
        last_name: "Contributor",
        role: UserRole::Contributor,
    },
    DefaultUser {
        username: "viewer",
        password: "viewerV_1",
        first_name: "Viewer",
        last_name: "Viewer",
        role: UserRole::Viewer,
    },
];

pub const RESTRICTED_TAG: &str = "restricted";
pub const FOREIGN_WORD_TAG: &str = "foreign word";

pub const DEFAULT_TAGS: &[DefaultTag] = &[
    DefaultTag {
        name: RESTRICTED_TAG,
        description: "Forms tagged with this tag are only visible to administrators \
                      and to users listed as unrestricted.",
    },
    DefaultTag {
        name: FOREIGN_WORD_TAG,
        description: "Use this tag for lexical entries that are not from the object \
                      language, e.g. loan words and proper names, so that they are \
                      exempt from morphological validation.",
    },
];

pub const DEFAULT_PAGES: &[DefaultPage] = &[
    DefaultPage {
        name: "home",
        heading: "Welcome",
        markup_language: "reStructuredText",
        content: "Welcome to this linguistic field database.\n\n\
                  Use the navigation to search and browse forms, corpora and files.",
    },
    DefaultPage {
        name: "help",
        heading: "Help",
        markup_language: "reStructuredText",
        content: "Ask an administrator for an account, then log in to add and edit data.",
    },
];
