use std::collections::HashSet;
use std::sync::Arc;

use super::state::{DataState, RequestId, Resource};
use crate::environment::types::{City, CommentPost, Offer, OfferDetail, OfferId, Review};
use crate::environment::Environment;
use crate::error::ApiError;
use crate::store::Effect;

const COMMENT_FAILED: &str = "Failed to post review. Please try again.";

#[derive(Clone)]
pub enum DataAction {
    ChangeCity(City),

    FetchOffers,
    OffersLoaded(RequestId, Result<Vec<Offer>, ApiError>),

    FetchOffer(OfferId),
    OfferLoaded(RequestId, Result<OfferDetail, ApiError>),

    FetchNearbyOffers(OfferId),
    NearbyOffersLoaded(RequestId, Result<Vec<Offer>, ApiError>),

    FetchComments(OfferId),
    CommentsLoaded(RequestId, Result<Vec<Review>, ApiError>),

    PostComment(OfferId, CommentPost),
    CommentPosted(OfferId, Result<Review, ApiError>),

    ToggleFavorite(OfferId, bool),
    FavoriteChanged(OfferId, RequestId, Result<Offer, ApiError>),

    FetchFavorites,
    FavoritesLoaded(RequestId, Result<Vec<Offer>, ApiError>),
    /// Mark every cached offer as not favorite, e.g. after logout
    ClearFavorites,
}

pub fn reduce(action: DataAction, state: &mut DataState, environment: &Environment) -> Effect<DataAction> {
    log::trace!("{action:?}");
    let model = environment.model.clone();
    match action {
        DataAction::ChangeCity(city) => {
            state.city = city;
            Effect::NONE
        }
        DataAction::FetchOffers => {
            state.is_loading = true;
            let request = state.requests.begin(Resource::Offers);
            Effect::future(async move { model.offers().await }, move |result| {
                DataAction::OffersLoaded(request, result)
            })
        }
        DataAction::OffersLoaded(request, result) => {
            if !is_latest(state, Resource::Offers, request) {
                return Effect::NONE;
            }
            state.is_loading = false;
            match result {
                Ok(offers) => state.all_offers = Arc::new(offers),
                Err(e) => log::error!("Could not load offers: {e}"),
            }
            Effect::NONE
        }
        DataAction::FetchOffer(id) => {
            state.is_offer_loading = true;
            let request = state.requests.begin(Resource::OfferDetail);
            Effect::future(async move { model.offer(&id).await }, move |result| {
                DataAction::OfferLoaded(request, result)
            })
        }
        DataAction::OfferLoaded(request, result) => {
            if !is_latest(state, Resource::OfferDetail, request) {
                return Effect::NONE;
            }
            state.is_offer_loading = false;
            match result {
                Ok(offer) => state.current_offer = Some(offer),
                Err(e) => {
                    log::error!("Could not load offer: {e}");
                    state.current_offer = None;
                }
            }
            Effect::NONE
        }
        DataAction::FetchNearbyOffers(id) => {
            let request = state.requests.begin(Resource::NearbyOffers);
            Effect::future(async move { model.nearby_offers(&id).await }, move |result| {
                DataAction::NearbyOffersLoaded(request, result)
            })
        }
        DataAction::NearbyOffersLoaded(request, result) => {
            if !is_latest(state, Resource::NearbyOffers, request) {
                return Effect::NONE;
            }
            match result {
                Ok(offers) => state.nearby_offers = Arc::new(offers),
                Err(e) => log::error!("Could not load nearby offers: {e}"),
            }
            Effect::NONE
        }
        DataAction::FetchComments(id) => {
            let request = state.requests.begin(Resource::Comments);
            Effect::future(async move { model.comments(&id).await }, move |result| {
                DataAction::CommentsLoaded(request, result)
            })
        }
        DataAction::CommentsLoaded(request, result) => {
            if !is_latest(state, Resource::Comments, request) {
                return Effect::NONE;
            }
            match result {
                Ok(comments) => state.comments = comments.into_iter().collect(),
                Err(e) => log::error!("Could not load comments: {e}"),
            }
            Effect::NONE
        }
        DataAction::PostComment(id, post) => {
            if let Err(message) = post.validate() {
                state.comment_error = Some(message);
                return Effect::NONE;
            }
            state.is_comment_posting = true;
            state.comment_error = None;
            let offer_id = id.clone();
            Effect::future(
                async move { model.post_comment(&offer_id, &post).await },
                move |result| DataAction::CommentPosted(id, result),
            )
        }
        DataAction::CommentPosted(id, result) => {
            state.is_comment_posting = false;
            match result {
                // the comments belong to another offer by now
                Ok(_) if !state.is_current_offer(&id) => Effect::NONE,
                Ok(review) => {
                    // show the review right away, the refetch brings the
                    // list in line with the backend
                    state.comments.push_back(review);
                    Effect::action(DataAction::FetchComments(id))
                }
                Err(e) => {
                    log::error!("Could not post comment: {e}");
                    state.comment_error =
                        Some(e.validation_messages().unwrap_or_else(|| COMMENT_FAILED.to_string()));
                    Effect::NONE
                }
            }
        }
        DataAction::ToggleFavorite(id, on) => {
            let request = state.requests.begin(Resource::Favorite(id.clone()));
            let offer_id = id.clone();
            Effect::future(
                async move { model.set_favorite(&offer_id, on).await },
                move |result| DataAction::FavoriteChanged(id, request, result),
            )
        }
        DataAction::FavoriteChanged(id, request, result) => {
            if !is_latest(state, Resource::Favorite(id.clone()), request) {
                return Effect::NONE;
            }
            match result {
                Ok(offer) => {
                    if !state.changed_favorite(&id, offer.is_favorite) {
                        log::error!("Could not find offer {:?}", &id);
                    }
                }
                Err(e) => log::error!("Could not change favorite: {e}"),
            }
            Effect::NONE
        }
        DataAction::FetchFavorites => {
            let request = state.requests.begin(Resource::Favorites);
            Effect::future(async move { model.favorites().await }, move |result| {
                DataAction::FavoritesLoaded(request, result)
            })
        }
        DataAction::FavoritesLoaded(request, result) => {
            if !is_latest(state, Resource::Favorites, request) {
                return Effect::NONE;
            }
            match result {
                Ok(favorites) => {
                    // toggles issued after this snapshot know better
                    let pinned = state.requests.favorites_toggled_after(request);
                    state.reconcile_favorites(&favorites, &pinned)
                }
                Err(e) => log::error!("Could not load favorites: {e}"),
            }
            Effect::NONE
        }
        DataAction::ClearFavorites => {
            state.reconcile_favorites(&[], &HashSet::new());
            Effect::NONE
        }
    }
}

fn is_latest(state: &DataState, resource: Resource, request: RequestId) -> bool {
    let latest = state.requests.is_latest(&resource, request);
    if !latest {
        log::debug!("Dropping stale {resource:?} response {request:?}");
    }
    latest
}

impl std::fmt::Debug for DataAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn count<T>(result: &Result<Vec<T>, ApiError>) -> Result<usize, &ApiError> {
            result.as_ref().map(|items| items.len())
        }
        match self {
            Self::ChangeCity(city) => f.debug_tuple("ChangeCity").field(&city.name).finish(),
            Self::FetchOffers => write!(f, "FetchOffers"),
            Self::OffersLoaded(request, result) => f
                .debug_tuple("OffersLoaded")
                .field(request)
                .field(&count(result))
                .finish(),
            Self::FetchOffer(id) => f.debug_tuple("FetchOffer").field(id).finish(),
            Self::OfferLoaded(request, result) => f
                .debug_tuple("OfferLoaded")
                .field(request)
                .field(&result.as_ref().map(|o| &o.id))
                .finish(),
            Self::FetchNearbyOffers(id) => f.debug_tuple("FetchNearbyOffers").field(id).finish(),
            Self::NearbyOffersLoaded(request, result) => f
                .debug_tuple("NearbyOffersLoaded")
                .field(request)
                .field(&count(result))
                .finish(),
            Self::FetchComments(id) => f.debug_tuple("FetchComments").field(id).finish(),
            Self::CommentsLoaded(request, result) => f
                .debug_tuple("CommentsLoaded")
                .field(request)
                .field(&count(result))
                .finish(),
            Self::PostComment(id, post) => f
                .debug_tuple("PostComment")
                .field(id)
                .field(&post.rating)
                .finish(),
            Self::CommentPosted(id, result) => f
                .debug_tuple("CommentPosted")
                .field(id)
                .field(&result.as_ref().map(|r| &r.id))
                .finish(),
            Self::ToggleFavorite(id, on) => {
                f.debug_tuple("ToggleFavorite").field(id).field(on).finish()
            }
            Self::FavoriteChanged(id, request, result) => f
                .debug_tuple("FavoriteChanged")
                .field(id)
                .field(request)
                .field(&result.as_ref().map(|o| o.is_favorite))
                .finish(),
            Self::FetchFavorites => write!(f, "FetchFavorites"),
            Self::FavoritesLoaded(request, result) => f
                .debug_tuple("FavoritesLoaded")
                .field(request)
                .field(&count(result))
                .finish(),
            Self::ClearFavorites => write!(f, "ClearFavorites"),
        }
    }
}
