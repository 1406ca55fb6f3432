use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

// Identifiers

#[derive(Default, Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub String);

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// Geography

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64, zoom: u8) -> Self {
        Self {
            latitude,
            longitude,
            zoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub location: Location,
}

impl Default for City {
    fn default() -> Self {
        SupportedCity::default().city()
    }
}

/// The cities the service has listings for
#[derive(IntoStaticStr, EnumIter, Display, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum SupportedCity {
    #[default]
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl SupportedCity {
    pub fn location(&self) -> Location {
        match self {
            SupportedCity::Paris => Location::new(48.864716, 2.349014, 12),
            SupportedCity::Cologne => Location::new(50.935173, 6.953101, 12),
            SupportedCity::Brussels => Location::new(50.85045, 4.34878, 13),
            SupportedCity::Amsterdam => Location::new(52.371807, 4.896029, 12),
            SupportedCity::Hamburg => Location::new(53.551086, 9.993682, 12),
            SupportedCity::Dusseldorf => Location::new(51.233334, 6.783333, 12),
        }
    }

    pub fn city(&self) -> City {
        let name: &'static str = self.into();
        City {
            name: name.to_string(),
            location: self.location(),
        }
    }

    /// Case insensitive lookup by name
    pub fn find(name: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|c| {
            let candidate: &'static str = c.into();
            candidate.eq_ignore_ascii_case(name.trim())
        })
    }
}

lazy_static::lazy_static! {
    pub static ref CITIES: Vec<City> = {
        use strum::IntoEnumIterator;
        SupportedCity::iter().map(|c| c.city()).collect()
    };
}

// Offers

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub city: City,
    pub location: Location,
    pub is_favorite: bool,
    pub is_premium: bool,
    pub rating: f64,
    /// The detail payload does not include a preview image
    #[serde(default)]
    pub preview_image: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetail {
    #[serde(flatten)]
    pub offer: Offer,
    pub description: String,
    pub bedrooms: u32,
    pub max_adults: u32,
    #[serde(default)]
    pub goods: Vec<String>,
    pub host: Profile,
    #[serde(default)]
    pub images: Vec<String>,
}

impl std::ops::Deref for OfferDetail {
    type Target = Offer;

    fn deref(&self) -> &Self::Target {
        &self.offer
    }
}

impl std::ops::DerefMut for OfferDetail {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.offer
    }
}

// Reviews

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub date: DateTime<Utc>,
    pub user: Profile,
    pub comment: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPost {
    pub comment: String,
    pub rating: u8,
}

impl CommentPost {
    pub const MIN_LENGTH: usize = 50;
    pub const MAX_LENGTH: usize = 300;
    pub const MAX_RATING: u8 = 5;

    pub fn new(comment: impl Into<String>, rating: u8) -> Self {
        Self {
            comment: comment.into(),
            rating,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let length = self.comment.trim().chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(format!(
                "Review must be between {} and {} characters",
                Self::MIN_LENGTH,
                Self::MAX_LENGTH
            ));
        }
        if !(1..=Self::MAX_RATING).contains(&self.rating) {
            return Err(format!("Rating must be between 1 and {}", Self::MAX_RATING));
        }
        Ok(())
    }
}

// Session

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    pub email: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pro: Option<bool>,
}

impl AuthInfo {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish()
    }
}

#[derive(IntoStaticStr, Display, Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum AuthorizationStatus {
    #[strum(serialize = "AUTH")]
    Auth,
    #[strum(serialize = "NO_AUTH")]
    NoAuth,
    #[default]
    #[strum(serialize = "UNKNOWN")]
    Unknown,
}

impl AuthorizationStatus {
    pub fn is_auth(&self) -> bool {
        matches!(self, AuthorizationStatus::Auth)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, AuthorizationStatus::Unknown)
    }
}

// Listing

#[derive(IntoStaticStr, EnumIter, Display, Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SortType {
    #[default]
    Popular,
    #[strum(serialize = "Price: low to high")]
    PriceLowToHigh,
    #[strum(serialize = "Price: high to low")]
    PriceHighToLow,
    #[strum(serialize = "Top rated first")]
    TopRated,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_parses_backend_json() {
        let json = r#"{
            "id": "6af6f711-c28d-4121-82cd-e0b462a27f00",
            "title": "Beautiful & luxurious studio at great location",
            "type": "apartment",
            "price": 120,
            "city": {"name": "Amsterdam", "location": {"latitude": 52.35514938496378, "longitude": 4.673877537499948, "zoom": 8}},
            "location": {"latitude": 52.35514938496378, "longitude": 4.673877537499948, "zoom": 8},
            "isFavorite": false,
            "isPremium": false,
            "rating": 4,
            "previewImage": "https://url-to-image/image.png"
        }"#;
        let offer: Offer = serde_json::from_str(json).unwrap();
        assert_eq!(offer.kind, "apartment");
        assert_eq!(offer.city.name, "Amsterdam");
        assert_eq!(offer.rating, 4.0);
    }

    #[test]
    fn detail_parses_without_preview_image() {
        let json = r#"{
            "id": "a", "title": "t", "type": "room", "price": 50,
            "city": {"name": "Paris", "location": {"latitude": 48.8, "longitude": 2.3, "zoom": 12}},
            "location": {"latitude": 48.8, "longitude": 2.3, "zoom": 16},
            "isFavorite": true, "isPremium": true, "rating": 4.8,
            "description": "d", "bedrooms": 1, "maxAdults": 2,
            "goods": ["Kitchen"],
            "host": {"name": "Oliver", "avatarUrl": "a.jpg", "isPro": false},
            "images": ["1.jpg", "2.jpg"]
        }"#;
        let detail: OfferDetail = serde_json::from_str(json).unwrap();
        assert!(detail.is_favorite);
        assert_eq!(detail.preview_image, "");
        assert_eq!(detail.max_adults, 2);
        assert_eq!(detail.images.len(), 2);
    }

    #[test]
    fn cities_are_the_six_supported_ones() {
        let names: Vec<_> = CITIES.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["Paris", "Cologne", "Brussels", "Amsterdam", "Hamburg", "Dusseldorf"]
        );
        assert_eq!(SupportedCity::find("amsterdam"), Some(SupportedCity::Amsterdam));
        assert_eq!(SupportedCity::find("Berlin"), None);
        assert_eq!(City::default().name, "Paris");
    }

    #[test]
    fn comment_validation() {
        assert!(CommentPost::new("x".repeat(50), 5).validate().is_ok());
        assert!(CommentPost::new("x".repeat(49), 5).validate().is_err());
        assert!(CommentPost::new("x".repeat(301), 5).validate().is_err());
        assert!(CommentPost::new("x".repeat(60), 0).validate().is_err());
        assert!(CommentPost::new("x".repeat(60), 6).validate().is_err());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("a@b.com", "secret1");
        assert!(!format!("{credentials:?}").contains("secret1"));
    }
}
