use chrono::{DateTime, Utc};

use crate::environment::types::{Offer, Review, SortType};

/// Reviews shown on the detail page
pub const MAX_REVIEWS: usize = 10;
/// Nearby offers shown on the detail page and its map
pub const MAX_NEARBY: usize = 3;
/// Gallery images shown on the detail page
pub const MAX_IMAGES: usize = 6;

const MAX_RATING: f64 = 5.0;

/// Stars to fill for a rating
pub fn round_rating(rating: f64) -> u8 {
    rating.round().clamp(0.0, MAX_RATING) as u8
}

/// Width of the star bar in percent
pub fn rating_to_percent(rating: f64) -> u8 {
    (f64::from(round_rating(rating)) / MAX_RATING * 100.0) as u8
}

/// `apartment` -> `Apartment`. Unknown kinds are capitalized.
pub fn format_housing_type(kind: &str) -> String {
    match kind.to_lowercase().as_str() {
        "apartment" => "Apartment".to_string(),
        "room" => "Room".to_string(),
        "house" => "House".to_string(),
        "hotel" => "Hotel".to_string(),
        _ => {
            let mut chars = kind.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

pub fn places_label(count: usize) -> String {
    match count {
        1 => "1 place".to_string(),
        n => format!("{n} places"),
    }
}

/// e.g. `April 2019`
pub fn format_review_date(date: &DateTime<Utc>) -> String {
    date.format("%B %Y").to_string()
}

/// Stable sort, `Popular` keeps the backend order
pub fn sort_offers(offers: &mut [Offer], sort: SortType) {
    match sort {
        SortType::Popular => {}
        SortType::PriceLowToHigh => offers.sort_by_key(|o| o.price),
        SortType::PriceHighToLow => offers.sort_by_key(|o| std::cmp::Reverse(o.price)),
        SortType::TopRated => offers.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
}

/// Newest first, at most [`MAX_REVIEWS`]
pub fn reviews_for_display<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Vec<Review> {
    let mut reviews: Vec<Review> = reviews.into_iter().cloned().collect();
    reviews.sort_by(|a, b| b.date.cmp(&a.date));
    reviews.truncate(MAX_REVIEWS);
    reviews
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::types::fixtures::{offer, review};
    use crate::environment::types::SupportedCity::Paris;

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(3.1), 3);
        assert_eq!(round_rating(4.5), 5);
        assert_eq!(round_rating(4.4), 4);
        assert_eq!(round_rating(0.0), 0);
        assert_eq!(round_rating(5.0), 5);
    }

    #[test]
    fn test_rating_to_percent() {
        assert_eq!(rating_to_percent(3.0), 60);
        assert_eq!(rating_to_percent(5.0), 100);
        assert_eq!(rating_to_percent(0.0), 0);
        assert_eq!(rating_to_percent(4.5), 100);
    }

    #[test]
    fn test_format_housing_type() {
        assert_eq!(format_housing_type("apartment"), "Apartment");
        assert_eq!(format_housing_type("room"), "Room");
        assert_eq!(format_housing_type("house"), "House");
        assert_eq!(format_housing_type("hotel"), "Hotel");
        assert_eq!(format_housing_type("APARTMENT"), "Apartment");
        assert_eq!(format_housing_type("unknown"), "Unknown");
        assert_eq!(format_housing_type(""), "");
    }

    #[test]
    fn test_labels() {
        assert_eq!(places_label(1), "1 place");
        assert_eq!(places_label(0), "0 places");
        assert_eq!(places_label(4), "4 places");
        let date = "2019-04-24T10:00:00Z".parse().unwrap();
        assert_eq!(format_review_date(&date), "April 2019");
    }

    #[test]
    fn test_sort_offers() {
        let mut offers: Vec<Offer> = [("a", 120, 3.0), ("b", 80, 4.8), ("c", 200, 4.1)]
            .into_iter()
            .map(|(id, price, rating)| {
                let mut o = offer(id, Paris);
                o.price = price;
                o.rating = rating;
                o
            })
            .collect();
        let order = |offers: &[Offer]| offers.iter().map(|o| o.id.0.clone()).collect::<Vec<_>>();

        sort_offers(&mut offers, SortType::Popular);
        assert_eq!(order(&offers), ["a", "b", "c"]);
        sort_offers(&mut offers, SortType::PriceLowToHigh);
        assert_eq!(order(&offers), ["b", "a", "c"]);
        sort_offers(&mut offers, SortType::PriceHighToLow);
        assert_eq!(order(&offers), ["c", "a", "b"]);
        sort_offers(&mut offers, SortType::TopRated);
        assert_eq!(order(&offers), ["b", "c", "a"]);
    }

    #[test]
    fn test_reviews_for_display() {
        let reviews: Vec<_> = (0..12)
            .map(|day| review(&format!("r{day}"), &format!("2024-01-{:02}T10:00:00Z", day + 1)))
            .collect();
        let shown = reviews_for_display(&reviews);
        assert_eq!(shown.len(), MAX_REVIEWS);
        assert_eq!(shown[0].id, "r11");
        assert_eq!(shown[9].id, "r2");
    }
}
