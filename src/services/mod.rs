pub mod gemini; // Gemini menu extraction
pub mod image;
pub mod twitter; // Twitter API v2 user lookup

pub use gemini::{GeminiService, MenuExtractor};
pub use image::{prepare_image, ImageError, PreparedImage};
pub use twitter::{LookupError, ProfileLookup, TwitterClient};
