//! Dashboard aggregate across every entity.

use sqlx::PgPool;

use super::{
    CatalogRepository, ContactRepository, HireDeveloperRepository, JobApplicationRepository,
    OpenPositionRepository, RepositoryError, TestimonialRepository,
};
use crate::models::stats::DashboardStats;
use crate::models::{ProductKind, ServiceKind};

/// Read-only repository for the dashboard summary.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run the seven summary queries concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `RepositoryError` any query produces.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let contacts = ContactRepository::new(self.pool);
        let applications = JobApplicationRepository::new(self.pool);
        let enquiries = HireDeveloperRepository::new(self.pool);
        let positions = OpenPositionRepository::new(self.pool);
        let products = CatalogRepository::<ProductKind>::new(self.pool);
        let services = CatalogRepository::<ServiceKind>::new(self.pool);
        let testimonials = TestimonialRepository::new(self.pool);

        let (
            contact_stats,
            job_application_stats,
            hire_developer_stats,
            open_position_stats,
            product_stats,
            service_stats,
            testimonial_stats,
        ) = tokio::try_join!(
            contacts.summary(),
            applications.summary(),
            enquiries.summary(),
            positions.summary(),
            products.counts(),
            services.counts(),
            testimonials.counts(),
        )?;

        Ok(DashboardStats {
            contact_stats,
            job_application_stats,
            hire_developer_stats,
            open_position_stats,
            product_stats,
            service_stats,
            testimonial_stats,
        })
    }
}
