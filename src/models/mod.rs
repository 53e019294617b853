use serde::{Deserialize, Serialize};
use serde_json::json;

/// One dish as the model is asked to emit it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub dish_name: String,
    pub dish_price: String,
    pub dish_type: String,
}

impl MenuItem {
    /// Response schema handed to Gemini so the output is constrained to `[MenuItem]`.
    pub fn response_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "dish_name": { "type": "STRING" },
                    "dish_price": { "type": "STRING" },
                    "dish_type": { "type": "STRING" }
                },
                "required": ["dish_name", "dish_price", "dish_type"]
            }
        })
    }
}

/// Flattened profile returned by `/api/twitter/:username`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileData {
    pub name: String,
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub description: String,
    pub location: String,
    pub profile_image_url: String,
    pub tweets: u64,
    pub listed: u64,
    pub created_at: String,
    pub verified: bool,
    pub url: String,
}

/// `data` object of the users/by/username response. Everything is optional upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TwitterUser {
    pub name: Option<String>,
    pub username: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: Option<String>,
    pub verified: Option<bool>,
    pub url: Option<String>,
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicMetrics {
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub tweet_count: Option<u64>,
    pub listed_count: Option<u64>,
}

impl ProfileData {
    pub fn from_upstream(user: &TwitterUser) -> Self {
        let metrics = user.public_metrics.clone().unwrap_or_default();
        let text = |field: &Option<String>| field.clone().unwrap_or_default();

        Self {
            name: text(&user.name),
            username: text(&user.username),
            followers: metrics.followers_count.unwrap_or(0),
            following: metrics.following_count.unwrap_or(0),
            description: text(&user.description),
            location: text(&user.location),
            profile_image_url: text(&user.profile_image_url),
            tweets: metrics.tweet_count.unwrap_or(0),
            listed: metrics.listed_count.unwrap_or(0),
            created_at: text(&user.created_at),
            verified: user.verified.unwrap_or(false),
            url: text(&user.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_full_user() {
        let user: TwitterUser = serde_json::from_value(json!({
            "id": "12",
            "name": "jack",
            "username": "jack",
            "description": "no state is the best state",
            "location": "California",
            "profile_image_url": "https://pbs.twimg.com/jack.jpg",
            "created_at": "2006-03-21T20:50:14.000Z",
            "verified": true,
            "url": "https://t.co/x",
            "public_metrics": {
                "followers_count": 6000000,
                "following_count": 4000,
                "tweet_count": 29000,
                "listed_count": 32000
            }
        }))
        .unwrap();

        let profile = ProfileData::from_upstream(&user);

        assert_eq!(profile.name, "jack");
        assert_eq!(profile.followers, 6_000_000);
        assert_eq!(profile.following, 4000);
        assert_eq!(profile.tweets, 29000);
        assert_eq!(profile.listed, 32000);
        assert!(profile.verified);
        assert_eq!(profile.location, "California");
    }

    #[test]
    fn test_profile_defaults_missing_and_null_fields() {
        let user: TwitterUser = serde_json::from_value(json!({
            "name": "Someone",
            "username": "someone",
            "location": null,
            "public_metrics": { "followers_count": 5 }
        }))
        .unwrap();

        let profile = ProfileData::from_upstream(&user);
        let value = serde_json::to_value(&profile).unwrap();

        assert_eq!(value["location"], "");
        assert_eq!(value["description"], "");
        assert_eq!(value["followers"], 5);
        assert_eq!(value["following"], 0);
        assert_eq!(value["verified"], false);
        assert_eq!(value.as_object().unwrap().len(), 12);
    }

    #[test]
    fn test_menu_schema_requires_all_fields() {
        let schema = MenuItem::response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 3);
    }
}
