//! Read access to the root state.
//!
//! The plain getters borrow straight from the state. Derived values are
//! computed by [`Selectors`], which remembers the inputs of the last call
//! and hands out the same `Arc` for as long as they are unchanged, so
//! subscribers can compare results with `Arc::ptr_eq`.

use std::sync::{Arc, Mutex};

use itertools::Itertools;

use crate::components::data_process::offers_in_city;
use crate::components::root::RootState;
use crate::environment::types::{
    AuthInfo, AuthorizationStatus, City, Offer, OfferDetail, Review, SortType,
};
use crate::helper::{self, MAX_NEARBY};

pub fn city(state: &RootState) -> &City {
    &state.data.city
}

pub fn all_offers(state: &RootState) -> &Arc<Vec<Offer>> {
    &state.data.all_offers
}

pub fn is_loading(state: &RootState) -> bool {
    state.data.is_loading
}

pub fn is_offer_loading(state: &RootState) -> bool {
    state.data.is_offer_loading
}

pub fn is_comment_posting(state: &RootState) -> bool {
    state.data.is_comment_posting
}

pub fn comment_error(state: &RootState) -> Option<&str> {
    state.data.comment_error.as_deref()
}

pub fn current_offer(state: &RootState) -> Option<&OfferDetail> {
    state.data.current_offer.as_ref()
}

pub fn nearby_offers(state: &RootState) -> &Arc<Vec<Offer>> {
    &state.data.nearby_offers
}

pub fn comments(state: &RootState) -> &im::Vector<Review> {
    &state.data.comments
}

pub fn authorization_status(state: &RootState) -> AuthorizationStatus {
    state.user.authorization_status
}

pub fn user(state: &RootState) -> Option<&AuthInfo> {
    state.user.user.as_ref()
}

pub fn login_error(state: &RootState) -> Option<&str> {
    state.user.error_message.as_deref()
}

/// Compares two `Arc`s by address
struct Identity<T>(Arc<T>);

impl<T> PartialEq for Identity<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A single-entry cache keyed by the inputs of a derivation
struct Memo<K, V> {
    cached: Mutex<Option<(K, Arc<V>)>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    fn get(&self, key: K, compute: impl FnOnce(&K) -> V) -> Arc<V> {
        let Ok(mut cached) = self.cached.lock() else {
            return Arc::new(compute(&key))
        };
        match cached.as_ref() {
            Some((last, value)) if *last == key => value.clone(),
            _ => {
                let value = Arc::new(compute(&key));
                *cached = Some((key, value.clone()));
                value
            }
        }
    }
}

pub type CityGroups = Vec<(String, Vec<Offer>)>;

#[derive(Default)]
pub struct Selectors {
    places: Memo<(Identity<Vec<Offer>>, String), Vec<Offer>>,
    sorted_places: Memo<(Identity<Vec<Offer>>, SortType), Vec<Offer>>,
    favorite_offers: Memo<Identity<Vec<Offer>>, Vec<Offer>>,
    favorites_by_city: Memo<Identity<Vec<Offer>>, CityGroups>,
    offers_by_city: Memo<Identity<Vec<Offer>>, CityGroups>,
    reviews: Memo<im::Vector<Review>, Vec<Review>>,
    nearby: Memo<Identity<Vec<Offer>>, Vec<Offer>>,
}

impl std::fmt::Debug for Selectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selectors").finish()
    }
}

impl Selectors {
    /// The offers of the selected city
    pub fn places(&self, state: &RootState) -> Arc<Vec<Offer>> {
        let key = (
            Identity(state.data.all_offers.clone()),
            state.data.city.name.clone(),
        );
        self.places
            .get(key, |(offers, city)| offers_in_city(&offers.0, city))
    }

    pub fn sorted_places(&self, state: &RootState, sort: SortType) -> Arc<Vec<Offer>> {
        let places = self.places(state);
        self.sorted_places.get((Identity(places), sort), |(places, sort)| {
            let mut sorted = places.0.to_vec();
            helper::sort_offers(&mut sorted, *sort);
            sorted
        })
    }

    pub fn favorite_offers(&self, state: &RootState) -> Arc<Vec<Offer>> {
        self.favorite_offers
            .get(Identity(state.data.all_offers.clone()), |offers| {
                offers.0.iter().filter(|o| o.is_favorite).cloned().collect()
            })
    }

    pub fn favorite_count(&self, state: &RootState) -> usize {
        self.favorite_offers(state).len()
    }

    /// Favorites grouped by city name, cities in alphabetical order
    pub fn favorites_by_city(&self, state: &RootState) -> Arc<CityGroups> {
        let favorites = self.favorite_offers(state);
        self.favorites_by_city
            .get(Identity(favorites), |favorites| group_by_city(&favorites.0))
    }

    /// All offers grouped by city name, cities in alphabetical order
    pub fn offers_by_city(&self, state: &RootState) -> Arc<CityGroups> {
        self.offers_by_city
            .get(Identity(state.data.all_offers.clone()), |offers| {
                group_by_city(&offers.0)
            })
    }

    pub fn reviews_for_display(&self, state: &RootState) -> Arc<Vec<Review>> {
        self.reviews.get(state.data.comments.clone(), |comments| {
            helper::reviews_for_display(comments)
        })
    }

    pub fn nearby_for_display(&self, state: &RootState) -> Arc<Vec<Offer>> {
        self.nearby
            .get(Identity(state.data.nearby_offers.clone()), |nearby| {
                nearby.0.iter().take(MAX_NEARBY).cloned().collect()
            })
    }
}

fn group_by_city(offers: &[Offer]) -> CityGroups {
    offers
        .iter()
        .sorted_by(|a, b| a.city.name.cmp(&b.city.name))
        .group_by(|o| o.city.name.clone())
        .into_iter()
        .map(|(city, offers)| (city, offers.cloned().collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::types::fixtures::{offer, review};
    use crate::environment::types::SupportedCity::{self, Amsterdam, Cologne, Paris};
    use strum::IntoEnumIterator;

    fn state() -> RootState {
        let mut state = RootState::default();
        let mut offers = vec![
            offer("1", Paris),
            offer("2", Amsterdam),
            offer("3", Paris),
            offer("4", Cologne),
        ];
        offers[1].is_favorite = true;
        offers[2].is_favorite = true;
        offers[3].is_favorite = true;
        offers[0].price = 300;
        state.data.all_offers = Arc::new(offers);
        state
    }

    fn ids(offers: &[Offer]) -> Vec<&str> {
        offers.iter().map(|o| o.id.0.as_str()).collect()
    }

    #[test]
    fn places_are_stable_until_inputs_change() {
        let selectors = Selectors::default();
        let mut state = state();

        let first = selectors.places(&state);
        assert_eq!(ids(&first), ["1", "3"]);
        assert!(Arc::ptr_eq(&first, &selectors.places(&state)));

        // an unrelated change keeps the result
        state.data.is_loading = true;
        assert!(Arc::ptr_eq(&first, &selectors.places(&state)));

        state.data.city = Amsterdam.city();
        let second = selectors.places(&state);
        assert_eq!(ids(&second), ["2"]);
        assert!(!Arc::ptr_eq(&first, &second));

        Arc::make_mut(&mut state.data.all_offers).push(offer("5", Amsterdam));
        assert_eq!(ids(&selectors.places(&state)), ["2", "5"]);
    }

    #[test]
    fn favorites_and_count() {
        let selectors = Selectors::default();
        let state = state();
        let favorites = selectors.favorite_offers(&state);
        assert_eq!(ids(&favorites), ["2", "3", "4"]);
        assert_eq!(selectors.favorite_count(&state), 3);
        assert!(Arc::ptr_eq(&favorites, &selectors.favorite_offers(&state)));
    }

    #[test]
    fn favorites_grouped_by_city() {
        let selectors = Selectors::default();
        let state = state();
        let groups = selectors.favorites_by_city(&state);
        let summary: Vec<_> = groups
            .iter()
            .map(|(city, offers)| (city.as_str(), ids(offers)))
            .collect();
        assert_eq!(
            summary,
            [
                ("Amsterdam", vec!["2"]),
                ("Cologne", vec!["4"]),
                ("Paris", vec!["3"]),
            ]
        );
        assert!(Arc::ptr_eq(&groups, &selectors.favorites_by_city(&state)));

        let all = selectors.offers_by_city(&state);
        let paris = all.iter().find(|(city, _)| city == "Paris").unwrap();
        assert_eq!(ids(&paris.1), ["1", "3"]);
    }

    #[test]
    fn sorted_places_follow_sort_type() {
        let selectors = Selectors::default();
        let state = state();
        let popular = selectors.sorted_places(&state, SortType::Popular);
        assert_eq!(ids(&popular), ["1", "3"]);
        let cheap = selectors.sorted_places(&state, SortType::PriceLowToHigh);
        assert_eq!(ids(&cheap), ["3", "1"]);
        assert!(Arc::ptr_eq(
            &cheap,
            &selectors.sorted_places(&state, SortType::PriceLowToHigh)
        ));
    }

    #[test]
    fn display_lists_are_limited() {
        let selectors = Selectors::default();
        let mut state = state();
        state.data.nearby_offers = Arc::new(
            SupportedCity::iter()
                .enumerate()
                .map(|(i, city)| offer(&format!("n{i}"), city))
                .collect(),
        );
        assert_eq!(selectors.nearby_for_display(&state).len(), MAX_NEARBY);

        state.data.comments = (1..=11)
            .map(|day| review(&format!("r{day}"), &format!("2024-03-{day:02}T08:00:00Z")))
            .collect();
        let reviews = selectors.reviews_for_display(&state);
        assert_eq!(reviews.len(), helper::MAX_REVIEWS);
        assert_eq!(reviews[0].id, "r11");
        assert!(Arc::ptr_eq(&reviews, &selectors.reviews_for_display(&state)));
    }

    #[test]
    fn getters_read_state() {
        let state = state();
        assert_eq!(city(&state).name, "Paris");
        assert_eq!(all_offers(&state).len(), 4);
        assert!(authorization_status(&state).is_unknown());
        assert_eq!(user(&state), None);
        assert_eq!(current_offer(&state), None);
        assert!(comments(&state).is_empty());
        assert!(!is_loading(&state));
    }
}
