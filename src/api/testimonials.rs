//! Testimonial moderation.

use tracing::info;

use super::endpoints;
use super::types::Testimonial;
use crate::client::Dispatcher;
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct TestimonialsApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> TestimonialsApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// All testimonials, whatever their moderation state.
    pub async fn moderation_queue(&self) -> Result<Vec<Testimonial>> {
        self.dispatcher
            .get_json(endpoints::TESTIMONIAL_MODERATION)
            .await
    }

    /// Approve for publication; returns the moderated record.
    pub async fn approve(&self, id: &str) -> Result<Testimonial> {
        let updated: Testimonial = self
            .dispatcher
            .patch_json::<_, ()>(&endpoints::testimonial_approve(id), None)
            .await?;
        info!(testimonial = id, "testimonial approved");
        Ok(updated)
    }

    pub async fn reject(&self, id: &str) -> Result<Testimonial> {
        let updated: Testimonial = self
            .dispatcher
            .patch_json::<_, ()>(&endpoints::testimonial_reject(id), None)
            .await?;
        info!(testimonial = id, "testimonial rejected");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.dispatcher.delete(&endpoints::testimonial(id)).await?;
        info!(testimonial = id, "testimonial deleted");
        Ok(())
    }
}
