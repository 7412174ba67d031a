//! REST endpoint paths.
//!
//! Paths are relative to the dispatcher's base URL.

pub const LOGIN: &str = "/api/auth/login";

pub const LEADS: &str = "/api/leads";

pub const USERS: &str = "/api/users";

pub const TESTIMONIAL_MODERATION: &str = "/api/testimonials/moderation";

pub fn lead_status(id: &str) -> String {
    format!("{LEADS}/{}/status", segment(id))
}

pub fn lead_assign(id: &str) -> String {
    format!("{LEADS}/{}/assign", segment(id))
}

pub fn user(id: &str) -> String {
    format!("{USERS}/{}", segment(id))
}

pub fn testimonial(id: &str) -> String {
    format!("/api/testimonials/{}", segment(id))
}

pub fn testimonial_approve(id: &str) -> String {
    format!("{}/approve", testimonial(id))
}

pub fn testimonial_reject(id: &str) -> String {
    format!("{}/reject", testimonial(id))
}

/// Percent-encode an id for use as one path segment.
fn segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
