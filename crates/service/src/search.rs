//! Search-and-list over any entity.
//!
//! A list is described by a [`SearchList`] marker: which entity, which column
//! the `search` parameter matches against, and the default ordering. The
//! page served is always clamped into range, so any `page` value yields a page.

use common::pagination::{PageRequest, PageWindow, PAGE_SIZE};
use common::query::QueryParams;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    SelectorTrait,
};
use serde::Serialize;

use crate::errors::ServiceError;

/// Query parameters that never travel as hidden search-form inputs.
const HIDDEN_EXCLUDED: [&str; 2] = ["search", "page"];

/// Raw list request: every query parameter, in order.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    params: QueryParams,
}

impl ListQuery {
    pub fn new(params: QueryParams) -> Self { Self { params } }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self { Self::new(QueryParams::new(pairs)) }

    /// The trimmed search term, `None` when blank.
    pub fn search(&self) -> Option<&str> {
        self.params.get("search").map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn page(&self) -> PageRequest { PageRequest::parse(self.params.get("page")) }

    pub fn params(&self) -> &QueryParams { &self.params }
}

/// One served page plus what a list template needs to render its controls.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub page: PageWindow,
    pub is_paginated: bool,
    pub total_pages: u64,
    /// echoed, trimmed search term (empty when none)
    pub search: String,
    pub hidden_params: Vec<(String, String)>,
    pub next_page_query: Option<String>,
    pub previous_page_query: Option<String>,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, window: PageWindow, query: &ListQuery) -> Self {
        let page_query = |n: u64| query.params().with("page", Some(&n.to_string())).encode();
        Self {
            items,
            page: window,
            is_paginated: window.is_paginated(),
            total_pages: window.total_pages,
            search: query.search().unwrap_or_default().to_string(),
            hidden_params: query.params().without(&HIDDEN_EXCLUDED),
            next_page_query: window.has_next().then(|| page_query(window.number + 1)),
            previous_page_query: window.has_previous().then(|| page_query(window.number - 1)),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListPage<U> {
        ListPage {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            is_paginated: self.is_paginated,
            total_pages: self.total_pages,
            search: self.search,
            hidden_params: self.hidden_params,
            next_page_query: self.next_page_query,
            previous_page_query: self.previous_page_query,
        }
    }
}

/// A searchable, ordered collection.
pub trait SearchList {
    type Entity: EntityTrait;

    fn search_column() -> <Self::Entity as EntityTrait>::Column;

    /// Applied in order, ascending. Should end on a unique column so pages are stable.
    fn ordering() -> Vec<<Self::Entity as EntityTrait>::Column>;

    /// Filtered and ordered select for `query`.
    fn select(query: &ListQuery) -> Select<Self::Entity> {
        let mut select = Self::Entity::find();
        if let Some(term) = query.search() {
            select = select.filter(contains_ci(Self::search_column(), term));
        }
        for col in Self::ordering() {
            select = select.order_by_asc(col);
        }
        select
    }
}

/// `LOWER(col) LIKE LOWER('%term%')`, with LIKE wildcards in `term` matched literally.
/// Both sides go through the database's own `LOWER`.
pub fn contains_ci<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(term));
    Expr::cust_with_exprs(
        "$1 LIKE $2 ESCAPE '\\'",
        [
            SimpleExpr::from(Func::lower(Expr::col(col.as_column_ref()))),
            SimpleExpr::from(Func::lower(Expr::val(pattern))),
        ],
    )
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Count, clamp the requested page into range, and fetch it.
pub async fn fetch_page<'db, C, P>(
    db: &'db C,
    select: P,
    query: &ListQuery,
) -> Result<ListPage<<P::Selector as SelectorTrait>::Item>, ServiceError>
where
    C: ConnectionTrait,
    P: PaginatorTrait<'db, C>,
{
    let paginator = select.paginate(db, PAGE_SIZE);
    let total = paginator.num_items().await?;
    let window = PageWindow::resolve(query.page(), PAGE_SIZE, total);
    let items = paginator.fetch_page(window.index()).await?;
    Ok(ListPage::new(items, window, query))
}

/// Plain list of one entity.
pub async fn list<S, C>(db: &C, query: &ListQuery) -> Result<ListPage<<S::Entity as EntityTrait>::Model>, ServiceError>
where
    S: SearchList,
    <S::Entity as EntityTrait>::Model: Sync,
    C: ConnectionTrait,
{
    fetch_page(db, S::select(query), query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        ListQuery::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(query(&[("search", "   ")]).search(), None);
        assert_eq!(query(&[]).search(), None);
        assert_eq!(query(&[("search", "  Toy ")]).search(), Some("Toy"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn page_links_keep_other_parameters() {
        let q = query(&[("search", "usertest"), ("color", "blue"), ("page", "2")]);
        let window = PageWindow::resolve(q.page(), PAGE_SIZE, 12);
        let page = ListPage::new(Vec::<u8>::new(), window, &q);
        assert_eq!(page.search, "usertest");
        assert_eq!(page.hidden_params, vec![("color".to_string(), "blue".to_string())]);
        assert_eq!(page.next_page_query.as_deref(), Some("search=usertest&color=blue&page=3"));
        assert_eq!(page.previous_page_query.as_deref(), Some("search=usertest&color=blue&page=1"));
        assert!(page.is_paginated);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn single_page_has_no_links() {
        let q = query(&[]);
        let page = ListPage::new(vec![1, 2], PageWindow::resolve(q.page(), PAGE_SIZE, 2), &q);
        assert!(!page.is_paginated);
        assert!(page.next_page_query.is_none());
        assert!(page.previous_page_query.is_none());
    }
}
