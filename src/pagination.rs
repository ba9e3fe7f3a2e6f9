use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Offset pagination over `count` rows. An empty listing still has one
/// (empty) page, and out-of-range page numbers are clamped, never rejected.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Paginator {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn total_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            self.count / self.per_page + i64::from(self.count % self.per_page != 0)
        }
    }

    pub fn clamp(&self, page: i64) -> i64 {
        page.clamp(1, self.total_pages())
    }

    /// Row offset of an already clamped page.
    pub fn offset(&self, page: i64) -> i64 {
        (page - 1).saturating_mul(self.per_page)
    }

    pub fn page_info(&self, page: i64) -> PageInfo {
        let total_pages = self.total_pages();
        PageInfo {
            current_page: page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_has_a_single_page() {
        let p = Paginator::new(0, 10);
        assert_eq!(p.total_pages(), 1);
        let info = p.page_info(p.clamp(5));
        assert_eq!(info.current_page, 1);
        assert!(!info.has_next);
        assert!(!info.has_previous);
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(Paginator::new(10, 10).total_pages(), 1);
        assert_eq!(Paginator::new(11, 10).total_pages(), 2);
        assert_eq!(Paginator::new(25, 10).total_pages(), 3);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let p = Paginator::new(25, 10);
        assert_eq!(p.clamp(99), 3);
        assert_eq!(p.clamp(0), 1);
        assert_eq!(p.clamp(-4), 1);
        assert_eq!(p.offset(3), 20);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let info = Paginator::new(25, 10).page_info(2);
        assert!(info.has_next);
        assert!(info.has_previous);
        assert_eq!(info.total_pages, 3);
    }

    #[test]
    fn huge_page_size_does_not_overflow() {
        let p = Paginator::new(25, i64::MAX);
        assert_eq!(p.total_pages(), 1);
        assert_eq!(p.clamp(i64::MAX), 1);
        assert_eq!(p.offset(1), 0);

        let p = Paginator::new(i64::MAX, i64::MAX - 1);
        assert_eq!(p.total_pages(), 2);
        assert_eq!(p.offset(2), i64::MAX - 1);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let p = Paginator::new(3, 0);
        assert_eq!(p.per_page(), 1);
        assert_eq!(p.total_pages(), 3);
    }
}
