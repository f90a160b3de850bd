use crate::{EngineError, ResultEngine};

/// Page sizes offered by the transaction list.
pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// Zero-based page index and a non-zero page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSpec {
    index: u32,
    size: u32,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self { index: 0, size: 25 }
    }
}

impl PageSpec {
    pub fn new(index: u32, size: u32) -> ResultEngine<Self> {
        if size == 0 {
            return Err(EngineError::Validation("page size must be > 0".to_string()));
        }
        Ok(Self { index, size })
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn size(self) -> u32 {
        self.size
    }

    /// The server counts pages from 1. Saturates at `u32::MAX`.
    pub fn server_page(self) -> u32 {
        self.index.saturating_add(1)
    }

    /// Number of pages needed for `total` records; at least one.
    pub fn page_count(self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub(crate) fn with_index(self, index: u32) -> Self {
        Self { index, ..self }
    }

    pub(crate) fn with_size(self, size: u32) -> ResultEngine<Self> {
        Self::new(0, size)
    }

    /// Next entry of [`PAGE_SIZES`], wrapping around.
    pub fn next_size(self) -> u32 {
        PAGE_SIZES
            .iter()
            .copied()
            .find(|s| *s > self.size)
            .unwrap_or(PAGE_SIZES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(PageSpec::new(0, 0), Err(EngineError::Validation(_))));
    }

    #[test]
    fn server_page_is_one_based_and_saturates() {
        assert_eq!(PageSpec::default().server_page(), 1);
        assert_eq!(PageSpec::new(4, 25).unwrap().server_page(), 5);
        assert_eq!(PageSpec::new(u32::MAX, 25).unwrap().server_page(), u32::MAX);
    }

    #[test]
    fn page_count_rounds_up() {
        let page = PageSpec::new(0, 25).unwrap();
        assert_eq!(page.page_count(0), 1);
        assert_eq!(page.page_count(25), 1);
        assert_eq!(page.page_count(26), 2);
        assert_eq!(page.page_count(101), 5);
    }

    #[test]
    fn sizes_cycle() {
        let page = PageSpec::new(0, 25).unwrap();
        assert_eq!(page.next_size(), 50);
        assert_eq!(PageSpec::new(0, 100).unwrap().next_size(), 10);
        assert_eq!(PageSpec::new(0, 7).unwrap().next_size(), 10);
    }
}
