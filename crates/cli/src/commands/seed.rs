//! Seed the product catalogue with the home page's sample entries.
//!
//! Idempotent: an entry whose title already exists is left alone. With
//! `clear_existing` every product is deleted first.

use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Could not reach the database.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// A statement failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A sample product: title, description and benefits.
struct SampleProduct {
    title: &'static str,
    description: &'static str,
    benefits: &'static [&'static str],
}

const SAMPLE_PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        title: "Website Builder Pro",
        description: "Create stunning, professional websites with our drag-and-drop builder. No coding required.",
        benefits: &["Drag & Drop Builder", "Mobile Responsive", "SEO Optimized", "24/7 Support"],
    },
    SampleProduct {
        title: "CRM System",
        description: "Complete customer relationship management solution to streamline your sales process.",
        benefits: &["Lead Management", "Sales Pipeline", "Customer Tracking", "Analytics Dashboard"],
    },
    SampleProduct {
        title: "ERP Software",
        description: "Enterprise resource planning solution for comprehensive business management.",
        benefits: &[
            "Inventory Management",
            "Financial Tracking",
            "HR Management",
            "Multi-location Support",
        ],
    },
    SampleProduct {
        title: "Attendance & Payroll",
        description: "Automated attendance tracking and payroll management system.",
        benefits: &[
            "Biometric Integration",
            "Auto Payroll Calculation",
            "Leave Management",
            "Reports & Analytics",
        ],
    },
    SampleProduct {
        title: "WhatsApp Business Suite",
        description: "Complete WhatsApp automation and marketing solution for businesses.",
        benefits: &["Bulk Messaging", "Auto Responses", "Chatbot Integration", "Analytics Dashboard"],
    },
    SampleProduct {
        title: "Event Management App",
        description: "Comprehensive event planning and management solution.",
        benefits: &["Event Registration", "Ticket Management", "Payment Processing", "Event Analytics"],
    },
    SampleProduct {
        title: "Digital NFC Cards",
        description: "Modern digital business cards with NFC technology.",
        benefits: &["NFC Technology", "Contact Sharing", "Social Media Links", "Analytics Tracking"],
    },
    SampleProduct {
        title: "Community Platform",
        description: "Build and manage online communities with advanced features.",
        benefits: &["User Management", "Content Moderation", "Discussion Forums", "Mobile App Support"],
    },
];

/// Insert the sample products in one transaction.
///
/// # Returns
///
/// The number of products inserted.
///
/// # Errors
///
/// Returns `SeedError` if the connection or any statement fails.
pub async fn products(clear_existing: bool) -> Result<u64, SeedError> {
    let pool = connect().await?;
    let mut tx = pool.begin().await?;

    if clear_existing {
        let cleared = sqlx::query("DELETE FROM site.products")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::info!(cleared, "Cleared existing products");
    }

    let mut inserted = 0;
    for product in SAMPLE_PRODUCTS {
        let benefits: Vec<&str> = product.benefits.to_vec();
        let result = sqlx::query(
            r"
            INSERT INTO site.products (title, description, benefits, is_active)
            SELECT $1, $2, $3, TRUE
            WHERE NOT EXISTS (SELECT 1 FROM site.products WHERE title = $1)
            ",
        )
        .bind(product.title)
        .bind(product.description)
        .bind(&benefits)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tracing::info!(title = product.title, "Already present, skipping");
        } else {
            tracing::info!(title = product.title, "Inserted");
            inserted += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(inserted, total = SAMPLE_PRODUCTS.len(), "Product seeding complete");
    Ok(inserted)
}
