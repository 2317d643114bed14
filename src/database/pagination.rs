use serde::{Deserialize, Serialize};

pub const PAGE_OUT_OF_RANGE: &str = "Page number out of range";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageContext<T> {
    pub rows: Vec<T>,
    pub total_rows: i64,
    /// 1-based.
    pub page: i64,
    pub page_count: i64,
    pub page_list: Vec<(String, i64)>,
    pub message: Option<String>,
}

/// Number of pages needed for `total_rows`; an empty list still has one
/// (empty) page.
pub fn page_count(total_rows: i64, page_size: i64) -> i64 {
    if total_rows <= 0 || page_size <= 0 {
        return 1;
    }
    (total_rows + page_size - 1) / page_size
}

pub fn is_in_range(page: i64, total_rows: i64, page_size: i64) -> bool {
    (1..=page_count(total_rows, page_size)).contains(&page)
}

/// Reads a page parameter the lenient way: leading digits are the number,
/// anything else (or nothing) is 0 and therefore out of range.
pub fn page_param(param: Option<&str>) -> i64 {
    let digits: String = param
        .unwrap_or("")
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// A requested page that doesn't exist. The caller should send the user to
/// `page` instead, showing `message` when there is one.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PageRedirect {
    pub page: i64,
    pub message: Option<String>,
}

/// Resolves a page parameter against a list of `total_rows`. Out of range
/// pages redirect to page 1; the notice is only shown when a page was
/// actually requested.
pub fn resolve_page(
    param: Option<&str>,
    total_rows: i64,
    page_size: i64,
) -> Result<i64, PageRedirect> {
    let page = page_param(param);
    if is_in_range(page, total_rows, page_size) {
        return Ok(page);
    }

    Err(PageRedirect {
        page: 1,
        message: param.map(|_| String::from(PAGE_OUT_OF_RANGE)),
    })
}

/// Two independently paginated lists on one view.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DualPageRedirect {
    pub first: i64,
    pub second: i64,
    pub message: Option<String>,
}

/// Like [`resolve_page`] for two lists at once. Only the list whose page is
/// out of range is reset to 1, the other keeps its requested page.
pub fn resolve_pages(
    first: (Option<&str>, i64),
    second: (Option<&str>, i64),
    page_size: i64,
) -> Result<(i64, i64), DualPageRedirect> {
    let first_page = page_param(first.0);
    let second_page = page_param(second.0);
    let first_ok = is_in_range(first_page, first.1, page_size);
    let second_ok = is_in_range(second_page, second.1, page_size);

    if first_ok && second_ok {
        return Ok((first_page, second_page));
    }

    let any_supplied = first.0.is_some() || second.0.is_some();
    Err(DualPageRedirect {
        first: if first_ok { first_page } else { 1 },
        second: if second_ok { second_page } else { 1 },
        message: any_supplied.then(|| String::from(PAGE_OUT_OF_RANGE)),
    })
}

impl<T> PageContext<T> {
    /// Cuts page `page` out of the full list. `page` must already be in range;
    /// anything else yields an empty window.
    pub fn from_rows(rows: Vec<T>, page_size: i64, page: i64) -> Self {
        let total_rows = rows.len() as i64;
        let page_count = page_count(total_rows, page_size);

        if total_rows == 0 {
            return Self::no_rows();
        }

        let offset = ((page - 1) * page_size).max(0) as usize;
        let rows: Vec<T> = rows
            .into_iter()
            .skip(offset)
            .take(page_size.max(0) as usize)
            .collect();

        let page_list = (1..=page_count)
            .map(|n| {
                let label = if n == page {
                    String::from("...")
                } else {
                    format!("{n}")
                };
                (label, n)
            })
            .collect();

        let first = offset as i64 + 1;
        let last = offset as i64 + rows.len() as i64;

        Self {
            rows,
            total_rows,
            page,
            page_count,
            page_list,
            message: Some(format!("{first} - {last} / {total_rows}")),
        }
    }

    pub fn no_rows() -> Self {
        Self {
            rows: vec![],
            total_rows: 0,
            page: 1,
            page_count: 1,
            page_list: vec![(String::from("..."), 1)],
            message: Some(String::from("No results")),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}
