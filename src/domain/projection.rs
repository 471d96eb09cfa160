//! Oracle projection records
//!
//! These mirror what the graph store hands back for a path query: a node plus
//! its outgoing relations, split by relation kind. A page links to pages and
//! redirects; a redirect points to at most one page or one redirect.

use serde::{Deserialize, Serialize};

use crate::domain::entities::NodeKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProjection {
    pub page_id: String,
    pub title: String,
    #[serde(default)]
    pub pages: Option<Vec<PageProjection>>,
    #[serde(default)]
    pub redirects: Option<Vec<RedirectProjection>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectProjection {
    pub page_id: String,
    pub title: String,
    #[serde(default)]
    pub page: Option<Box<PageProjection>>,
    #[serde(default)]
    pub redirect: Option<Box<RedirectProjection>>,
}

/// Root of a tree-shaped path result, tagged by the kind of its root node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PathProjection {
    Page(PageProjection),
    Redirect(RedirectProjection),
}

/// Borrowed view of one projection node, independent of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionRef<'a> {
    Page(&'a PageProjection),
    Redirect(&'a RedirectProjection),
}

impl<'a> ProjectionRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ProjectionRef::Page(p) => &p.page_id,
            ProjectionRef::Redirect(r) => &r.page_id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            ProjectionRef::Page(p) => &p.title,
            ProjectionRef::Redirect(r) => &r.title,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ProjectionRef::Page(_) => NodeKind::Page,
            ProjectionRef::Redirect(_) => NodeKind::Redirect,
        }
    }

    /// Outgoing relations of every kind merged into one ordered child set.
    ///
    /// Pages list linked pages before linked redirects; redirects list the
    /// target page before the target redirect. Structurally identical
    /// children collapse into the first occurrence.
    pub fn children(&self) -> Vec<ProjectionRef<'a>> {
        let mut merged: Vec<ProjectionRef<'a>> = Vec::new();
        let candidates: Vec<ProjectionRef<'a>> = match self {
            ProjectionRef::Page(p) => p
                .pages
                .iter()
                .flatten()
                .map(ProjectionRef::Page)
                .chain(p.redirects.iter().flatten().map(ProjectionRef::Redirect))
                .collect(),
            ProjectionRef::Redirect(r) => r
                .page
                .as_deref()
                .map(ProjectionRef::Page)
                .into_iter()
                .chain(r.redirect.as_deref().map(ProjectionRef::Redirect))
                .collect(),
        };
        for child in candidates {
            if !merged.contains(&child) {
                merged.push(child);
            }
        }
        merged
    }
}

impl PathProjection {
    pub fn root(&self) -> ProjectionRef<'_> {
        match self {
            PathProjection::Page(p) => ProjectionRef::Page(p),
            PathProjection::Redirect(r) => ProjectionRef::Redirect(r),
        }
    }
}

impl PageProjection {
    pub fn leaf(page_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            title: title.into(),
            pages: None,
            redirects: None,
        }
    }
}

impl RedirectProjection {
    pub fn leaf(page_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            title: title.into(),
            page: None,
            redirect: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_page_with_pages_and_redirects_when_listing_children_then_pages_come_first() {
        let page = PageProjection {
            pages: Some(vec![PageProjection::leaf("2", "b")]),
            redirects: Some(vec![RedirectProjection::leaf("3", "c")]),
            ..PageProjection::leaf("1", "a")
        };
        let root = ProjectionRef::Page(&page);
        let ids: Vec<&str> = root.children().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn given_duplicate_children_when_listing_then_they_collapse() {
        let page = PageProjection {
            pages: Some(vec![PageProjection::leaf("2", "b"), PageProjection::leaf("2", "b")]),
            ..PageProjection::leaf("1", "a")
        };
        assert_eq!(ProjectionRef::Page(&page).children().len(), 1);
    }

    #[test]
    fn given_redirect_when_listing_children_then_page_precedes_redirect() {
        let redirect = RedirectProjection {
            page: Some(Box::new(PageProjection::leaf("5", "e"))),
            redirect: Some(Box::new(RedirectProjection::leaf("6", "f"))),
            ..RedirectProjection::leaf("4", "d")
        };
        let children = ProjectionRef::Redirect(&redirect).children();
        assert_eq!(children[0].kind(), NodeKind::Page);
        assert_eq!(children[1].kind(), NodeKind::Redirect);
    }
}
