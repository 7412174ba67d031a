//! Client-side sorting, filtering and pagination of API listings.
//!
//! The API returns complete collections; narrowing them for display happens
//! here.

use std::borrow::Borrow;
use std::cmp::Reverse;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::api::{Lead, Testimonial, TestimonialStatus, UnknownStatus};

/// Rows per page used by the console.
pub const DEFAULT_PER_PAGE: usize = 10;

/// Records with a creation timestamp.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Timestamped for Lead {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Testimonial {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordering by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            _ => Err(format!("unknown sort order: {s} (expected newest or oldest)")),
        }
    }
}

/// Sort in place by creation time. Ties keep their original order.
pub fn sort_by_created<T: Timestamped>(items: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Newest => items.sort_by_key(|item| Reverse(item.created_at())),
        SortOrder::Oldest => items.sort_by_key(Timestamped::created_at),
    }
}

/// The `n` most recently created items, newest first.
pub fn most_recent<T: Timestamped + Clone>(items: &[T], n: usize) -> Vec<T> {
    let mut sorted = items.to_vec();
    sort_by_created(&mut sorted, SortOrder::Newest);
    sorted.truncate(n);
    sorted
}

/// Number of items created on `day` as seen in time zone `tz`.
pub fn count_created_on<T, Tz>(items: &[T], day: NaiveDate, tz: &Tz) -> usize
where
    T: Timestamped,
    Tz: TimeZone,
{
    items
        .iter()
        .filter(|item| item.created_at().with_timezone(tz).date_naive() == day)
        .count()
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }
}

/// Slice out page `page` (1-based) of `per_page` items.
///
/// Page 0 is treated as page 1, and a `per_page` of 0 as 1. Pages past the
/// end are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Page {
        items: &items[start..end],
        page,
        per_page,
        total_items,
        total_pages,
    }
}

/// Which testimonials to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TestimonialStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TestimonialStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

pub fn filter_testimonials(items: &[Testimonial], filter: StatusFilter) -> Vec<&Testimonial> {
    items.iter().filter(|t| filter.matches(t.status)).collect()
}

/// Moderation queue order: pending first, then newest first.
pub fn sort_for_moderation<T: Borrow<Testimonial>>(items: &mut [T]) {
    items.sort_by_key(|item| {
        let t = item.borrow();
        (t.status != TestimonialStatus::Pending, Reverse(t.created_at))
    });
}

/// Count testimonials per status: (pending, approved, rejected).
pub fn testimonial_counts(items: &[Testimonial]) -> (usize, usize, usize) {
    items.iter().fold((0, 0, 0), |(p, a, r), t| match t.status {
        TestimonialStatus::Pending => (p + 1, a, r),
        TestimonialStatus::Approved => (p, a + 1, r),
        TestimonialStatus::Rejected => (p, a, r + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LeadStatus;
    use chrono::FixedOffset;

    fn lead(id: &str, created: &str) -> Lead {
        Lead {
            id: id.to_string(),
            full_name: format!("Applicant {id}"),
            email: None,
            phone: "0123456789".to_string(),
            occupation: None,
            monthly_income: None,
            loan_amount: 10_000.0,
            loan_type: "PERSONAL".to_string(),
            location: None,
            message: None,
            status: LeadStatus::Submitted,
            assigned_to: None,
            created_at: created.parse().unwrap(),
        }
    }

    fn testimonial(id: &str, status: TestimonialStatus) -> Testimonial {
        Testimonial {
            id: id.to_string(),
            name: "Customer".to_string(),
            rating: 5,
            message: "Great service".to_string(),
            status,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            moderated_at: None,
            moderated_by: None,
        }
    }

    fn ids(leads: &[Lead]) -> Vec<&str> {
        leads.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_sort_newest_and_oldest() {
        let mut leads = vec![
            lead("b", "2024-02-01T00:00:00Z"),
            lead("c", "2024-03-01T00:00:00Z"),
            lead("a", "2024-01-01T00:00:00Z"),
        ];

        sort_by_created(&mut leads, SortOrder::Newest);
        assert_eq!(ids(&leads), ["c", "b", "a"]);

        sort_by_created(&mut leads, SortOrder::Oldest);
        assert_eq!(ids(&leads), ["a", "b", "c"]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("Newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!("oldest".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_most_recent() {
        let leads: Vec<Lead> = (1..=7)
            .map(|d| lead(&d.to_string(), &format!("2024-01-0{d}T00:00:00Z")))
            .collect();

        let recent = most_recent(&leads, 5);
        assert_eq!(ids(&recent), ["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn test_sort_for_moderation() {
        let at = |id: &str, status, created: &str| Testimonial {
            created_at: created.parse().unwrap(),
            ..testimonial(id, status)
        };
        let mut items = vec![
            at("old-approved", TestimonialStatus::Approved, "2024-01-01T00:00:00Z"),
            at("old-pending", TestimonialStatus::Pending, "2024-01-02T00:00:00Z"),
            at("new-rejected", TestimonialStatus::Rejected, "2024-03-01T00:00:00Z"),
            at("new-pending", TestimonialStatus::Pending, "2024-02-01T00:00:00Z"),
        ];

        sort_for_moderation(&mut items);
        let order: Vec<&str> = items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            order,
            ["new-pending", "old-pending", "new-rejected", "old-approved"]
        );

        let mut refs: Vec<&Testimonial> = items.iter().rev().collect();
        sort_for_moderation(&mut refs);
        assert_eq!(refs[0].id, "new-pending");
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, &items[0..10]);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());
        assert!(!first.has_previous());
        assert_eq!(first.first_index(), 1);

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, &[21, 22, 23]);
        assert!(!last.has_next());
        assert!(last.has_previous());
        assert_eq!(last.first_index(), 21);
    }

    #[test]
    fn test_paginate_out_of_range() {
        let items: Vec<u32> = (1..=5).collect();

        let page = paginate(&items, 4, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.first_index(), 0);

        let page = paginate(&items, 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, &[1]);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, DEFAULT_PER_PAGE);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_count_created_on_respects_time_zone() {
        let leads = vec![
            lead("a", "2024-05-01T15:30:00Z"),
            lead("b", "2024-05-01T17:00:00Z"),
            lead("c", "2024-04-30T23:00:00Z"),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(count_created_on(&leads, day, &Utc), 2);

        // UTC+8: "b" falls on 2 May, "c" moves onto 1 May.
        let myt = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(count_created_on(&leads, day, &myt), 2);
        let day2 = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(count_created_on(&leads, day2, &myt), 1);
    }

    #[test]
    fn test_filter_testimonials() {
        let items = vec![
            testimonial("1", TestimonialStatus::Pending),
            testimonial("2", TestimonialStatus::Approved),
            testimonial("3", TestimonialStatus::Pending),
        ];

        assert_eq!(filter_testimonials(&items, StatusFilter::All).len(), 3);
        let pending = filter_testimonials(&items, "pending".parse().unwrap());
        assert_eq!(pending.len(), 2);
        assert_eq!(testimonial_counts(&items), (2, 1, 0));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "rejected".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(TestimonialStatus::Rejected)
        );
        assert!("archived".parse::<StatusFilter>().is_err());
    }
}
