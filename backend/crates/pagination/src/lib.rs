//! Page-number pagination primitives.
//!
//! Endpoints that return collections accept a page number and a page size,
//! validate both, and answer with a [`PageEnvelope`] describing the slice
//! plus enough metadata for clients to walk the collection. Keeping the
//! types here lets inbound adapters and cached payloads share one shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE_NUMBER: u32 = 1;
/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 2;
/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures raised when constructing pagination inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers are one-based; zero is rejected.
    #[error("page number must be at least 1")]
    ZeroPageNumber,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
    /// Oversized pages are rejected rather than clamped so callers learn
    /// about the limit.
    #[error("page size must be at most {max}")]
    PageSizeTooLarge {
        /// The configured maximum page size.
        max: u32,
    },
}

/// One-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(u32);

impl PageNumber {
    /// Validate and construct a page number.
    pub fn new(value: u32) -> Result<Self, PaginationError> {
        if value == 0 {
            return Err(PaginationError::ZeroPageNumber);
        }
        Ok(Self(value))
    }

    /// The raw one-based page number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self(DEFAULT_PAGE_NUMBER)
    }
}

impl From<PageNumber> for u32 {
    fn from(value: PageNumber) -> Self {
        value.0
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of items per page, bounded by [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Validate and construct a page size.
    pub fn new(value: u32) -> Result<Self, PaginationError> {
        if value == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        if value > MAX_PAGE_SIZE {
            return Err(PaginationError::PageSizeTooLarge { max: MAX_PAGE_SIZE });
        }
        Ok(Self(value))
    }

    /// The raw page size.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated pagination inputs for a collection read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PageRequest {
    page: PageNumber,
    size: PageSize,
}

impl PageRequest {
    /// Construct a request from already-validated parts.
    #[must_use]
    pub fn new(page: PageNumber, size: PageSize) -> Self {
        Self { page, size }
    }

    /// Construct a request from optional raw query values, applying the
    /// documented defaults for absent parts.
    pub fn from_optional(page: Option<u32>, size: Option<u32>) -> Result<Self, PaginationError> {
        let page = page.map(PageNumber::new).transpose()?.unwrap_or_default();
        let size = size.map(PageSize::new).transpose()?.unwrap_or_default();
        Ok(Self { page, size })
    }

    /// The requested page number.
    #[must_use]
    pub fn page(&self) -> PageNumber {
        self.page
    }

    /// The requested page size.
    #[must_use]
    pub fn size(&self) -> PageSize {
        self.size
    }

    /// Number of items preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let preceding = u64::from(self.page.get() - 1) * u64::from(self.size.get());
        usize::try_from(preceding).unwrap_or(usize::MAX)
    }
}

/// A page of items plus collection metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    /// Items on this page, in collection order.
    pub items: Vec<T>,
    /// One-based page number this envelope describes.
    pub page: u32,
    /// Page size used to produce this envelope.
    pub page_size: u32,
    /// Total number of items in the collection.
    pub total_items: u64,
    /// Total number of pages at this page size.
    pub total_pages: u32,
}

/// Slice an in-memory collection into the requested page.
///
/// Pages past the end of the collection yield an empty `items` list with
/// accurate totals, so clients can distinguish "empty collection" from
/// "walked off the end".
#[must_use]
pub fn paginate<T: Clone>(items: &[T], request: &PageRequest) -> PageEnvelope<T> {
    let size = request.size().get();
    let total_items = items.len() as u64;
    let total_pages = u32::try_from(total_items.div_ceil(u64::from(size))).unwrap_or(u32::MAX);

    let page_items: Vec<T> = items
        .iter()
        .skip(request.offset())
        .take(size as usize)
        .cloned()
        .collect();

    PageEnvelope {
        items: page_items,
        page: request.page().get(),
        page_size: size,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    //! Validation and slicing coverage for pagination primitives.
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn page_number_rejects_zero() {
        let err = PageNumber::new(0).expect_err("zero page rejected");
        assert_eq!(err, PaginationError::ZeroPageNumber);
    }

    #[rstest]
    #[case(0, PaginationError::ZeroPageSize)]
    #[case(MAX_PAGE_SIZE + 1, PaginationError::PageSizeTooLarge { max: MAX_PAGE_SIZE })]
    fn page_size_rejects_out_of_range(#[case] value: u32, #[case] expected: PaginationError) {
        let err = PageSize::new(value).expect_err("out-of-range size rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn defaults_apply_when_values_absent() {
        let request = PageRequest::from_optional(None, None).expect("defaults valid");
        assert_eq!(request.page().get(), DEFAULT_PAGE_NUMBER);
        assert_eq!(request.size().get(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    #[case(1, 2, vec!["a", "b"], 3)]
    #[case(2, 2, vec!["c", "d"], 3)]
    #[case(3, 2, vec!["e"], 3)]
    #[case(4, 2, vec![], 3)]
    fn paginate_slices_in_order(
        #[case] page: u32,
        #[case] size: u32,
        #[case] expected: Vec<&str>,
        #[case] expected_pages: u32,
    ) {
        let items = ["a", "b", "c", "d", "e"];
        let request = PageRequest::from_optional(Some(page), Some(size)).expect("valid request");
        let envelope = paginate(&items, &request);
        assert_eq!(envelope.items, expected);
        assert_eq!(envelope.page, page);
        assert_eq!(envelope.page_size, size);
        assert_eq!(envelope.total_items, 5);
        assert_eq!(envelope.total_pages, expected_pages);
    }

    #[rstest]
    fn paginate_empty_collection() {
        let items: [&str; 0] = [];
        let envelope = paginate(&items, &PageRequest::default());
        assert!(envelope.items.is_empty());
        assert_eq!(envelope.total_items, 0);
        assert_eq!(envelope.total_pages, 0);
    }

    #[rstest]
    fn envelope_serializes_camel_case() {
        let envelope = paginate(&[1_u8, 2, 3], &PageRequest::default());
        let value = serde_json::to_value(&envelope).expect("serializable envelope");
        assert!(value.get("pageSize").is_some());
        assert!(value.get("page_size").is_none());
    }
}
