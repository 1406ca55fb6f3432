//! Keeps the markers of one map widget in sync with a list of points.
//!
//! The widget itself lives behind [`MapWidget`]. A [`MapController`] owns
//! at most one of them, creates it lazily when it is attached to a
//! container and disposes of it exactly once, either through
//! [`MapController::dispose`] or when the controller is dropped.

mod headless;

pub use headless::{HeadlessFactory, HeadlessMap};

use crate::environment::types::{Location, Offer, OfferId};

pub const URL_MARKER_DEFAULT: &str =
    "https://assets.htmlacademy.ru/content/intensive/javascript-1/demo/interactive-map/pin.svg";
pub const URL_MARKER_CURRENT: &str =
    "https://assets.htmlacademy.ru/content/intensive/javascript-1/demo/interactive-map/main-pin.svg";
pub const URL_MARKER_ACTIVE: &str = "/img/pin-active.svg";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MarkerIcon {
    pub url: &'static str,
    pub size: (u32, u32),
    pub anchor: (u32, u32),
}

impl MarkerIcon {
    const SIZE: (u32, u32) = (40, 40);
    const ANCHOR: (u32, u32) = (20, 40);

    pub const DEFAULT: MarkerIcon = MarkerIcon::new(URL_MARKER_DEFAULT);
    /// The hovered offer in a list
    pub const ACTIVE: MarkerIcon = MarkerIcon::new(URL_MARKER_ACTIVE);
    /// The offer of the detail page
    pub const CURRENT: MarkerIcon = MarkerIcon::new(URL_MARKER_CURRENT);

    const fn new(url: &'static str) -> Self {
        Self {
            url,
            size: Self::SIZE,
            anchor: Self::ANCHOR,
        }
    }
}

/// Identifies the element a map is rendered into
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ContainerRef(pub u64);

/// Handle of a marker added to a widget
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    pub location: Location,
    pub icon: MarkerIcon,
}

pub trait MapWidget {
    fn fly_to(&mut self, center: Location);
    fn add_marker(&mut self, pin: &Pin) -> MarkerId;
    fn remove_marker(&mut self, marker: MarkerId);
    /// Release the widget, it is not used afterwards
    fn dispose(&mut self);
}

pub trait MapFactory {
    type Widget: MapWidget;

    fn create(&self, container: ContainerRef, center: Location) -> Self::Widget;
}

struct Mounted<W> {
    container: ContainerRef,
    center: Location,
    widget: W,
}

pub struct MapController<F: MapFactory> {
    factory: F,
    map: Option<Mounted<F::Widget>>,
    markers: Vec<MarkerId>,
    /// What the markers should show
    pins: Vec<Pin>,
    /// What the markers currently show, `None` until the first render
    rendered: Option<Vec<Pin>>,
}

impl<F: MapFactory> std::fmt::Debug for MapController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapController")
            .field("container", &self.map.as_ref().map(|m| m.container))
            .field("markers", &self.markers.len())
            .finish()
    }
}

impl<F: MapFactory> MapController<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            map: None,
            markers: Vec::new(),
            pins: Vec::new(),
            rendered: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.map.is_some()
    }

    pub fn widget(&self) -> Option<&F::Widget> {
        self.map.as_ref().map(|m| &m.widget)
    }

    /// Bind to `container`. The widget is created on the first call, a
    /// new center only moves the existing one.
    pub fn attach(&mut self, container: ContainerRef, center: Location) {
        let is_mounted = self
            .map
            .as_ref()
            .map_or(false, |m| m.container == container);
        if !is_mounted {
            self.dispose();
            log::debug!("Creating map in {container:?}");
            let widget = self.factory.create(container, center);
            self.map = Some(Mounted {
                container,
                center,
                widget,
            });
        } else if let Some(mounted) = self.map.as_mut() {
            if mounted.center != center {
                mounted.widget.fly_to(center);
                mounted.center = center;
            }
        }
        self.sync();
    }

    /// One marker per offer, the `active` one highlighted
    pub fn show_places(&mut self, places: &[Offer], active: Option<&OfferId>) {
        self.pins = places
            .iter()
            .map(|offer| Pin {
                location: offer.location,
                icon: if Some(&offer.id) == active {
                    MarkerIcon::ACTIVE
                } else {
                    MarkerIcon::DEFAULT
                },
            })
            .collect();
        self.sync();
    }

    /// One marker per location, the `selected` one marked as current
    pub fn show_locations(&mut self, locations: &[Location], selected: Option<Location>) {
        self.pins = locations
            .iter()
            .map(|location| Pin {
                location: *location,
                icon: if Some(*location) == selected {
                    MarkerIcon::CURRENT
                } else {
                    MarkerIcon::DEFAULT
                },
            })
            .collect();
        self.sync();
    }

    fn sync(&mut self) {
        let Some(mounted) = self.map.as_mut() else {
            return
        };
        if self.rendered.as_ref() == Some(&self.pins) {
            return;
        }
        for marker in self.markers.drain(..) {
            mounted.widget.remove_marker(marker);
        }
        for pin in &self.pins {
            self.markers.push(mounted.widget.add_marker(pin));
        }
        self.rendered = Some(self.pins.clone());
    }

    /// Release the widget. Further calls do nothing until the controller
    /// is attached again.
    pub fn dispose(&mut self) {
        let Some(mut mounted) = self.map.take() else {
            return
        };
        log::debug!("Disposing map in {:?}", mounted.container);
        mounted.widget.dispose();
        self.markers.clear();
        self.rendered = None;
    }
}

impl<F: MapFactory> Drop for MapController<F> {
    fn drop(&mut self) {
        self.dispose()
    }
}
