use std::collections::HashSet;
use std::sync::Arc;

use crate::environment::types::{City, Offer, OfferDetail, OfferId, Review};

/// The remote collections a request can be issued for
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Resource {
    Offers,
    OfferDetail,
    NearbyOffers,
    Comments,
    Favorites,
    /// The favorite flag of a single offer
    Favorite(OfferId),
}

/// Stamped on a request when it is issued and carried by its completion
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct RequestId(pub u64);

/// Remembers the newest request per resource so that a slow, older
/// response can't overwrite the result of a newer one.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct RequestTracker {
    next: u64,
    latest: im::HashMap<Resource, RequestId>,
}

impl RequestTracker {
    pub fn begin(&mut self, resource: Resource) -> RequestId {
        self.next += 1;
        let id = RequestId(self.next);
        self.latest.insert(resource, id);
        id
    }

    /// A completion is current unless a newer request for the same
    /// resource has been issued since
    pub fn is_latest(&self, resource: &Resource, id: RequestId) -> bool {
        self.latest
            .get(resource)
            .map_or(true, |latest| *latest == id)
    }

    /// Offers whose favorite flag was toggled after `id` was issued
    pub fn favorites_toggled_after(&self, id: RequestId) -> HashSet<OfferId> {
        self.latest
            .iter()
            .filter_map(|(resource, latest)| match resource {
                Resource::Favorite(offer) if latest.0 > id.0 => Some(offer.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataState {
    pub city: City,
    pub all_offers: Arc<Vec<Offer>>,
    pub is_loading: bool,
    pub current_offer: Option<OfferDetail>,
    pub is_offer_loading: bool,
    pub nearby_offers: Arc<Vec<Offer>>,
    pub comments: im::Vector<Review>,
    pub is_comment_posting: bool,
    pub comment_error: Option<String>,
    pub requests: RequestTracker,
}

impl Default for DataState {
    fn default() -> Self {
        Self {
            city: City::default(),
            all_offers: Arc::default(),
            is_loading: false,
            current_offer: None,
            is_offer_loading: false,
            nearby_offers: Arc::default(),
            comments: im::Vector::new(),
            is_comment_posting: false,
            comment_error: None,
            requests: RequestTracker::default(),
        }
    }
}

pub fn offers_in_city(offers: &[Offer], city: &str) -> Vec<Offer> {
    offers
        .iter()
        .filter(|offer| offer.city.name == city)
        .cloned()
        .collect()
}

// Data Operations

impl DataState {
    /// The offers of the selected city
    pub fn places(&self) -> Vec<Offer> {
        offers_in_city(&self.all_offers, &self.city.name)
    }

    /// Set the favorite flag of offer `id` on every cached copy. Lists
    /// whose copy already has the flag keep their identity.
    pub fn changed_favorite(&mut self, id: &OfferId, is_favorite: bool) -> bool {
        let mut found = false;
        for offers in [&mut self.all_offers, &mut self.nearby_offers] {
            let Some(idx) = offers.iter().position(|o| &o.id == id) else {
                continue
            };
            found = true;
            if offers[idx].is_favorite != is_favorite {
                Arc::make_mut(offers)[idx].is_favorite = is_favorite;
            }
        }
        if let Some(current) = self.current_offer.as_mut() {
            if &current.id == id {
                current.is_favorite = is_favorite;
                found = true;
            }
        }
        found
    }

    /// Set `is_favorite` on every cached offer to whether it is part of
    /// `favorites`. Offers missing from `favorites` are explicitly
    /// unmarked, offers in `pinned` keep their flag.
    pub fn reconcile_favorites(&mut self, favorites: &[Offer], pinned: &HashSet<OfferId>) {
        let ids: HashSet<OfferId> = favorites.iter().map(|o| o.id.clone()).collect();
        let expected = |offer: &Offer| {
            if pinned.contains(&offer.id) {
                offer.is_favorite
            } else {
                ids.contains(&offer.id)
            }
        };
        for offers in [&mut self.all_offers, &mut self.nearby_offers] {
            let outdated = offers.iter().any(|o| o.is_favorite != expected(o));
            if !outdated {
                continue;
            }
            for offer in Arc::make_mut(offers).iter_mut() {
                let is_favorite = expected(&*offer);
                offer.is_favorite = is_favorite;
            }
        }
        if let Some(current) = self.current_offer.as_mut() {
            let is_favorite = expected(&**current);
            current.is_favorite = is_favorite;
        }
    }

    pub fn is_current_offer(&self, id: &OfferId) -> bool {
        self.current_offer.as_ref().map_or(false, |o| &o.id == id)
    }
}
