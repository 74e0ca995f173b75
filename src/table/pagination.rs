//! Pagination state.
//!
//! The UI page is always 1-based. The request page follows the server's
//! first-page convention and is derived from the UI page on every read.

use serde::{Deserialize, Serialize};

use super::request::{PageParams, PaginationData};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Index of the first page in the server API.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum FirstPageIndex {
    Zero,
    #[default]
    One,
}

impl FirstPageIndex {
    /// Amount subtracted from the UI page to get the request page.
    pub fn offset(self) -> usize {
        match self {
            FirstPageIndex::Zero => 1,
            FirstPageIndex::One => 0,
        }
    }
}

impl TryFrom<u8> for FirstPageIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FirstPageIndex::Zero),
            1 => Ok(FirstPageIndex::One),
            other => Err(format!("first page index must be 0 or 1, got {}", other)),
        }
    }
}

impl From<FirstPageIndex> for u8 {
    fn from(index: FirstPageIndex) -> Self {
        match index {
            FirstPageIndex::Zero => 0,
            FirstPageIndex::One => 1,
        }
    }
}

/// Pagination options. Missing keys take their defaults when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PaginationOptions {
    pub first_page_index: FirstPageIndex,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            first_page_index: FirstPageIndex::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl PaginationOptions {
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

/// Current position, size and totals of a paginated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    first_page_index: FirstPageIndex,
    current_page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    total: usize,
    total_pages: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PaginationOptions::default())
    }
}

impl Pagination {
    pub fn new(options: PaginationOptions) -> Self {
        Self {
            first_page_index: options.first_page_index,
            current_page: 1,
            page_size: options.page_size.max(1),
            page_size_options: options.page_size_options,
            total: 0,
            total_pages: 0,
        }
    }

    pub fn first_page_index(&self) -> FirstPageIndex {
        self.first_page_index
    }

    /// 1-based page shown by the pagination control.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Page sent to the server.
    pub fn request_page(&self) -> usize {
        self.current_page - self.first_page_index.offset()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.request_page(),
            size: self.page_size,
        }
    }

    /// Set the UI page. Values below 1 are raised to 1.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Set the page size. Zero is raised to 1.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
    }

    /// Overwrite position and totals from a server response.
    pub fn update_from_response<T>(&mut self, response: &PaginationData<T>) {
        self.set_current_page(response.page.saturating_add(self.first_page_index.offset()));
        self.total = response.total;
        self.total_pages = response.total_page;
    }
}
