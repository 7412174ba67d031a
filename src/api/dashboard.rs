//! Dashboard summary.

use chrono::{Local, NaiveDate, TimeZone};
use tracing::debug;

use super::leads::LeadsApi;
use super::testimonials::TestimonialsApi;
use super::types::{DashboardStats, Lead, Testimonial, TestimonialStatus};
use super::users::UsersApi;
use crate::client::Dispatcher;
use crate::error::Result;
use crate::listing::{count_created_on, most_recent};

/// Number of leads listed under "recent".
pub const RECENT_LEADS: usize = 5;

/// Fetch leads, users and testimonials concurrently and summarize them for
/// today in the local time zone.
pub async fn dashboard_stats(dispatcher: &Dispatcher) -> Result<DashboardStats> {
    dashboard_stats_on(dispatcher, Local::now().date_naive(), &Local).await
}

/// Like [`dashboard_stats`], counting "today" as `day` in `tz`.
pub async fn dashboard_stats_on<Tz: TimeZone>(
    dispatcher: &Dispatcher,
    day: NaiveDate,
    tz: &Tz,
) -> Result<DashboardStats> {
    let leads_api = LeadsApi::new(dispatcher);
    let users_api = UsersApi::new(dispatcher);
    let testimonials_api = TestimonialsApi::new(dispatcher);
    let (leads, users, testimonials) = tokio::try_join!(
        leads_api.list(),
        users_api.list(),
        testimonials_api.moderation_queue(),
    )?;
    debug!(
        leads = leads.len(),
        users = users.len(),
        testimonials = testimonials.len(),
        "dashboard data fetched"
    );

    Ok(summarize(&leads, users.len(), &testimonials, day, tz))
}

fn summarize<Tz: TimeZone>(
    leads: &[Lead],
    total_users: usize,
    testimonials: &[Testimonial],
    day: NaiveDate,
    tz: &Tz,
) -> DashboardStats {
    DashboardStats {
        total_leads: leads.len(),
        today_leads: count_created_on(leads, day, tz),
        total_users,
        pending_testimonials: testimonials
            .iter()
            .filter(|t| t.status == TestimonialStatus::Pending)
            .count(),
        recent_leads: most_recent(leads, RECENT_LEADS),
    }
}
