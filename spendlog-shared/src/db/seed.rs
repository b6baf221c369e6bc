/// First-run data seeding
///
/// After migrations, the seeder fills empty tables with defaults: two login
/// credentials (one ADMIN, one USER), nine expense categories, and five
/// sample persons. Each block only runs when its table is empty, so restarts
/// never duplicate or overwrite data.

use sqlx::PgPool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::models::category::{Category, CategoryFields};
use crate::models::credential::{CreateCredential, Credential, Role};
use crate::models::person::{CreatePerson, Person};

/// Default categories seeded on first run: (name, description, color, icon)
const DEFAULT_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    (
        "Food & Dining",
        "Restaurants, groceries, and food delivery",
        "#FF6B6B",
        "fas fa-utensils",
    ),
    (
        "Transportation",
        "Gas, public transport, rideshare, parking",
        "#4ECDC4",
        "fas fa-car",
    ),
    (
        "Shopping",
        "Clothing, electronics, and general shopping",
        "#45B7D1",
        "fas fa-shopping-bag",
    ),
    (
        "Entertainment",
        "Movies, games, subscriptions, and fun activities",
        "#96CEB4",
        "fas fa-gamepad",
    ),
    (
        "Utilities",
        "Electricity, water, internet, phone bills",
        "#FFEAA7",
        "fas fa-bolt",
    ),
    (
        "Healthcare",
        "Medical expenses, pharmacy, insurance",
        "#DDA0DD",
        "fas fa-heartbeat",
    ),
    (
        "Education",
        "Books, courses, tuition, and learning materials",
        "#98D8C8",
        "fas fa-graduation-cap",
    ),
    (
        "Travel",
        "Flights, hotels, vacation expenses",
        "#F7DC6F",
        "fas fa-plane",
    ),
    ("Other", "Miscellaneous expenses", "#BDC3C7", "fas fa-question-circle"),
];

/// Sample persons seeded on first run
const SAMPLE_PERSONS: &[(&str, &str, &str, &str)] = &[
    ("John", "Doe", "john.doe@example.com", "1234567890"),
    ("Jane", "Smith", "jane.smith@example.com", "0987654321"),
    ("Bob", "Johnson", "bob.johnson@example.com", "5555555555"),
    ("Alice", "Brown", "alice.brown@example.com", "1111111111"),
    ("Charlie", "Wilson", "charlie.wilson@example.com", "2222222222"),
];

/// Seeds default credentials, categories, and sample persons
///
/// # Errors
///
/// Returns an error if password hashing or any insert fails.
pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    if Credential::count(pool).await? == 0 {
        seed_credentials(pool).await?;
    }

    if Category::count(pool).await? == 0 {
        seed_categories(pool).await?;
    }

    if Person::count(pool).await? == 0 {
        seed_persons(pool).await?;
    }

    Ok(())
}

async fn seed_credentials(pool: &PgPool) -> anyhow::Result<()> {
    Credential::create(
        pool,
        CreateCredential {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash_password("admin123")?,
            role: Role::Admin,
        },
    )
    .await?;

    Credential::create(
        pool,
        CreateCredential {
            username: "user".to_string(),
            email: "user@example.com".to_string(),
            password_hash: hash_password("user123")?,
            role: Role::User,
        },
    )
    .await?;

    info!("Default credentials seeded (admin/ADMIN, user/USER)");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<()> {
    for (name, description, color, icon) in DEFAULT_CATEGORIES {
        Category::create(
            pool,
            CategoryFields {
                name: name.to_string(),
                description: Some(description.to_string()),
                color: Some(color.to_string()),
                icon: Some(icon.to_string()),
                is_active: true,
            },
        )
        .await?;
    }

    info!(count = DEFAULT_CATEGORIES.len(), "Default expense categories seeded");
    Ok(())
}

async fn seed_persons(pool: &PgPool) -> anyhow::Result<()> {
    for (first_name, last_name, email, phone) in SAMPLE_PERSONS {
        Person::create(
            pool,
            CreatePerson {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                phone_number: Some(phone.to_string()),
            },
        )
        .await?;
    }

    info!(count = SAMPLE_PERSONS.len(), "Sample persons seeded");
    Ok(())
}
