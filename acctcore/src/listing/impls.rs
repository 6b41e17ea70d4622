use std::collections::BTreeMap;

use super::*;

const ALLOWED_KEYS: &[&str] = &["page", "per_page", "search", "sort", "direction"];

impl From<&str> for SortField {
    fn from(s: &str) -> Self {
        match s {
            "name" => SortField::Name,
            "email" => SortField::Email,
            "created_at" => SortField::CreatedAt,
            "updated_at" => SortField::UpdatedAt,
            _ => SortField::default(),
        }
    }
}

impl From<&str> for SortDirection {
    fn from(s: &str) -> Self {
        match s {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => SortDirection::default(),
        }
    }
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            search: None,
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

fn positive(value: Option<&String>) -> Result<Option<i64>, ()> {
    match value {
        None => Ok(None),
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(()),
        },
    }
}

impl ListingParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    pub fn sort(mut self, sort: impl Into<SortField>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn direction(mut self, direction: impl Into<SortDirection>) -> Self {
        self.direction = direction.into();
        self
    }

    /// Build the parameters from raw query string pairs.  Nothing here
    /// is an error: unknown keys are ignored and invalid values fall
    /// back to their defaults, with both being logged.
    pub fn from_query(query: &BTreeMap<String, String>) -> Self {
        let invalid_keys = query.keys()
            .filter(|k| !ALLOWED_KEYS.contains(&k.as_str()))
            .collect::<Vec<_>>();
        if !invalid_keys.is_empty() {
            log::info!("listing params: ignoring unknown keys {invalid_keys:?}");
        }

        let mut result = Self::new();
        match positive(query.get("page")) {
            Ok(Some(page)) => result.page = page,
            Ok(None) => (),
            Err(()) => log::info!("listing params: invalid page {:?}", query.get("page")),
        }
        match positive(query.get("per_page")) {
            Ok(Some(per_page)) => result.per_page = per_page,
            Ok(None) => (),
            Err(()) => log::info!("listing params: invalid per_page {:?}", query.get("per_page")),
        }
        if let Some(search) = query.get("search") {
            result = result.search(search.as_str());
        }
        if let Some(sort) = query.get("sort") {
            result = result.sort(sort.as_str());
        }
        if let Some(direction) = query.get("direction") {
            result = result.direction(direction.as_str());
        }
        result
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, params: &ListingParams) -> Self {
        let per_page = params.per_page.max(1);
        Self {
            data,
            current_page: params.page,
            last_page: if total > 0 { (total - 1) / per_page + 1 } else { 1 },
            per_page,
            total,
        }
    }
}
