//! Approved test profiles for local development.
//!
//! Fills an empty database with browsable candidates of both genders so the
//! match list, requests and chat can be exercised without running the
//! review flow by hand.

use chrono::{Datelike, NaiveDate, Utc};
use domain::models::profile::{Gender, ProfileSubmission};
use fake::faker::address::en::{CityName, CountryName};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use persistence::repositories::ProfileRepository;
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_PROFILES_PER_GENDER: usize = 5;

const MIN_AGE: i32 = 22;
const MAX_AGE: i32 = 35;

const BIOS: &[&str] = &[
    "Looking for a meaningful connection based on shared values and faith.",
    "Passionate about faith, family, and building a future together.",
    "Love reading, traveling, and exploring new cultures.",
    "Family-oriented person looking for someone with similar values.",
    "Enjoy outdoor activities and meaningful conversations.",
];

const RELIGIOUS_LEVELS: &[&str] = &["practicing", "moderate", "very_practicing"];
const PRAYER_FREQUENCIES: &[&str] = &["five_times", "regularly", "occasionally"];
const EDUCATION_LEVELS: &[&str] = &["high_school", "bachelors", "masters", "phd"];
const LOCATION_PREFERENCES: &[&str] = &["same_city", "same_country", "anywhere"];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One generated profile and the id it will be stored under.
#[derive(Debug, Clone)]
pub struct TestProfile {
    pub id: Uuid,
    pub submission: ProfileSubmission,
}

fn pick<'a>(values: &[&'a str]) -> &'a str {
    values[(0..values.len()).fake::<usize>()]
}

fn date_of_birth(age: i32) -> NaiveDate {
    let year = Utc::now().year() - age;
    let month = (1..13).fake::<u32>();
    let day = (1..29).fake::<u32>();
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Builds one approved-ready profile. `photo_index` selects a stable avatar.
pub fn generate_test_profile(gender: Gender, photo_index: usize) -> TestProfile {
    let age = (MIN_AGE..=MAX_AGE).fake::<i32>();
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    let city: String = CityName().fake();
    let country: String = CountryName().fake();

    let mut religious_info = json!({
        "level": pick(RELIGIOUS_LEVELS),
        "prayer_frequency": pick(PRAYER_FREQUENCIES),
    });
    if gender == Gender::Female {
        religious_info["hijab"] = json!((0..2).fake::<u8>() == 1);
    }

    TestProfile {
        id: Uuid::new_v4(),
        submission: ProfileSubmission {
            name: Some(format!("{} {}", first, last)),
            photo_url: Some(format!("https://i.pravatar.cc/400?img={}", photo_index)),
            bio: pick(BIOS).to_string(),
            date_of_birth: date_of_birth(age),
            gender,
            location: format!("{}, {}", city, country),
            religious_info,
            preferences: json!({
                "age_range": { "min": age - 5, "max": age + 5 },
                "location_preference": pick(LOCATION_PREFERENCES),
                "education": pick(EDUCATION_LEVELS),
            }),
        },
    }
}

/// `per_gender` men followed by `per_gender` women.
pub fn generate_test_profiles(per_gender: usize) -> Vec<TestProfile> {
    [Gender::Male, Gender::Female]
        .into_iter()
        .flat_map(|gender| std::iter::repeat(gender).take(per_gender))
        .enumerate()
        .map(|(i, gender)| generate_test_profile(gender, i + 1))
        .collect()
}

/// Stores generated profiles as approved. Returns them in insertion order.
pub async fn seed_test_profiles(
    pool: &PgPool,
    per_gender: usize,
) -> Result<Vec<TestProfile>, SeedError> {
    let repo = ProfileRepository::new(pool.clone());
    let profiles = generate_test_profiles(per_gender);

    for profile in &profiles {
        let stored = repo.upsert_approved(profile.id, &profile.submission).await?;
        info!(
            profile_id = %stored.id,
            name = %stored.name,
            gender = ?profile.submission.gender,
            "Seeded approved profile"
        );
    }

    Ok(profiles)
}
