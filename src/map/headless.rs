use super::{ContainerRef, MapFactory, MapWidget, MarkerId, Pin};
use crate::environment::types::Location;

/// A map without a screen. Keeps track of its markers and logs every
/// change, used by the command line client.
#[derive(Debug)]
pub struct HeadlessMap {
    container: ContainerRef,
    center: Location,
    markers: Vec<(MarkerId, Pin)>,
    next: u64,
}

impl HeadlessMap {
    pub fn center(&self) -> Location {
        self.center
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.markers.iter().map(|(_, pin)| pin)
    }
}

impl MapWidget for HeadlessMap {
    fn fly_to(&mut self, center: Location) {
        log::debug!(
            "{:?} fly to {},{}",
            self.container,
            center.latitude,
            center.longitude
        );
        self.center = center;
    }

    fn add_marker(&mut self, pin: &Pin) -> MarkerId {
        self.next += 1;
        let id = MarkerId(self.next);
        log::trace!(
            "{:?} marker {id:?} at {},{} ({})",
            self.container,
            pin.location.latitude,
            pin.location.longitude,
            pin.icon.url
        );
        self.markers.push((id, *pin));
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.retain(|(id, _)| *id != marker);
    }

    fn dispose(&mut self) {
        log::debug!("{:?} disposed", self.container);
        self.markers.clear();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessFactory;

impl MapFactory for HeadlessFactory {
    type Widget = HeadlessMap;

    fn create(&self, container: ContainerRef, center: Location) -> HeadlessMap {
        HeadlessMap {
            container,
            center,
            markers: Vec::new(),
            next: 0,
        }
    }
}
