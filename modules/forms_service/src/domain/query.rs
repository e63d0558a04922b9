//! Entry listing: filtering, sorting and pagination over one partition
//!
//! The skip offset is `page * limit - limit`. Pages are therefore 1-based in
//! effect: page 1 starts at offset 0, and page 0 yields `-limit`, which the
//! store treats as no skip. The reported page is echoed back unchanged.

use super::partition::Partition;
use super::repository::{CreatedBound, EntryFilter, EntryStore, FindOptions, SortSpec};
use super::validation::validate_limit;
use crate::config::Config;
use crate::contract::{
    DateOperator, DateSearch, FormEntry, FormsError, ListEntriesRequest, Listing, Pagination,
    SortDirection,
};
use regex::{Regex, RegexBuilder};

/// Fully-defaulted listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    page: i64,
    limit: i64,
    date_search: DateSearch,
    search: String,
    sort: String,
    direction: SortDirection,
    collation: String,
}

impl EntryQuery {
    /// Apply configured defaults to a request and validate it
    pub fn from_request(request: ListEntriesRequest, config: &Config) -> Result<Self, FormsError> {
        let limit = request.limit.unwrap_or(config.default_page_limit);
        validate_limit(limit)?;

        Ok(Self {
            page: request.page.unwrap_or(0),
            limit,
            date_search: request.date_search.unwrap_or_default(),
            search: request.search.unwrap_or_default(),
            sort: request
                .sort
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| config.default_sort.clone()),
            direction: request.order.unwrap_or_default(),
            collation: config.collation.clone(),
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Skip offset handed to the store (`page * limit - limit`)
    pub fn offset(&self) -> i64 {
        self.page
            .saturating_mul(self.limit)
            .saturating_sub(self.limit)
    }

    /// Filter shared by the count and the page fetch
    pub fn filter(&self) -> Result<EntryFilter, FormsError> {
        let mut filter = EntryFilter::default();

        if !self.search.is_empty() {
            filter.title = Some(title_pattern(&self.search)?);
        }

        if self.date_search.is_active() {
            let date = self.date_search.date;
            filter.created = Some(match self.date_search.operator {
                DateOperator::Before => CreatedBound::AtMost(date),
                DateOperator::After => CreatedBound::AtLeast(date),
                DateOperator::Exact => CreatedBound::Exactly(date),
            });
        }

        Ok(filter)
    }

    pub fn options(&self) -> FindOptions {
        FindOptions {
            skip: self.offset(),
            limit: self.limit,
            sort: Some(SortSpec {
                field: self.sort.clone(),
                direction: self.direction,
            }),
            collation: Some(self.collation.clone()),
        }
    }

    /// Count and fetch one page from a partition
    pub async fn execute(
        &self,
        store: &dyn EntryStore,
        partition: &Partition,
    ) -> Result<Listing<FormEntry>, FormsError> {
        let filter = self.filter()?;
        let options = self.options();

        tracing::debug!(
            %partition,
            page = self.page,
            limit = self.limit,
            skip = options.skip,
            sort = %self.sort,
            direction = self.direction.as_i8(),
            "listing entries"
        );

        let total = store
            .count(partition.as_str(), &filter)
            .await
            .map_err(FormsError::storage)?;

        let items = store
            .find(partition.as_str(), &filter, &options)
            .await
            .map_err(FormsError::storage)?;

        Ok(Listing {
            pagination: Pagination {
                page: self.page,
                pages: total_pages(total, self.limit),
                total,
            },
            items,
        })
    }
}

/// `ceil(total / limit)`
pub fn total_pages(total: u64, limit: i64) -> u64 {
    if limit <= 0 {
        return 0;
    }
    total.div_ceil(limit as u64)
}

/// Case-insensitive title pattern; an invalid pattern matches literally
fn title_pattern(search: &str) -> Result<Regex, FormsError> {
    RegexBuilder::new(search)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(search))
                .case_insensitive(true)
                .build()
        })
        .map_err(|e| FormsError::Validation {
            message: format!("invalid search pattern: {}", e),
        })
}
