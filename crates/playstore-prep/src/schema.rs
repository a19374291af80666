//! Column names of the input files and of the produced fact table.

// Catalog input
pub const APP: &str = "App";
pub const CATEGORY: &str = "Category";
pub const RATING: &str = "Rating";
pub const REVIEWS: &str = "Reviews";
pub const SIZE: &str = "Size";
pub const INSTALLS: &str = "Installs";
pub const TYPE: &str = "Type";
pub const PRICE: &str = "Price";
pub const CONTENT_RATING: &str = "Content Rating";
pub const GENRES: &str = "Genres";
pub const LAST_UPDATED: &str = "Last Updated";
pub const CURRENT_VER: &str = "Current Ver";
pub const ANDROID_VER: &str = "Android Ver";

// Review input
pub const TRANSLATED_REVIEW: &str = "Translated_Review";
pub const SENTIMENT: &str = "Sentiment";
pub const SENTIMENT_POLARITY: &str = "Sentiment_Polarity";
pub const SENTIMENT_SUBJECTIVITY: &str = "Sentiment_Subjectivity";

// Derived
pub const APP_ID: &str = "App_id";
pub const RATING_VALUE: &str = "Rating Value";
pub const RATINGS_COUNT: &str = "Ratings Count";
pub const SIZE_KB: &str = "Size KB";
pub const PRICE_USD: &str = "Price USD";
pub const SENTIMENT_POLAR: &str = "Sentiment Polar";
pub const SENTIMENT_SUBJECT: &str = "Sentiment Subject";

/// Columns the catalog file must provide, in file order.
pub const CATALOG_COLUMNS: [&str; 13] = [
    APP,
    CATEGORY,
    RATING,
    REVIEWS,
    SIZE,
    INSTALLS,
    TYPE,
    PRICE,
    CONTENT_RATING,
    GENRES,
    LAST_UPDATED,
    CURRENT_VER,
    ANDROID_VER,
];

/// Columns the review file must provide.
pub const REVIEW_COLUMNS: [&str; 5] = [
    APP,
    TRANSLATED_REVIEW,
    SENTIMENT,
    SENTIMENT_POLARITY,
    SENTIMENT_SUBJECTIVITY,
];

/// Descriptive attributes identifying one catalog entry; duplicates on
/// these keys are collapsed and their ratings counts summed.
pub const DEDUP_KEYS: [&str; 12] = [
    APP,
    CATEGORY,
    RATING_VALUE,
    SIZE,
    INSTALLS,
    TYPE,
    PRICE,
    CONTENT_RATING,
    GENRES,
    LAST_UPDATED,
    CURRENT_VER,
    ANDROID_VER,
];

/// Review fields carried into the fact table.
pub const SENTIMENT_FIELDS: [&str; 3] = [SENTIMENT, SENTIMENT_POLAR, SENTIMENT_SUBJECT];

/// The output schema, in order.
pub const FINAL_COLUMNS: [&str; 18] = [
    APP_ID,
    APP,
    CATEGORY,
    GENRES,
    CONTENT_RATING,
    TYPE,
    INSTALLS,
    LAST_UPDATED,
    CURRENT_VER,
    ANDROID_VER,
    SIZE,
    SIZE_KB,
    PRICE_USD,
    RATINGS_COUNT,
    RATING_VALUE,
    SENTIMENT,
    SENTIMENT_POLAR,
    SENTIMENT_SUBJECT,
];
