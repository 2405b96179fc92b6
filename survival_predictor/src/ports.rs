use serde::Serialize;

use crate::types::Port;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapMarker {
    pub tooltip: &'static str,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortMap {
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl Port {
    /// Quay coordinates, degrees.
    pub fn coordinates(self) -> (f64, f64) {
        match self {
            Port::Southampton => (50.9097, -1.4044),
            Port::Cherbourg => (49.6301, -1.619),
            Port::Queenstown => (51.8496, -8.2976),
        }
    }

    pub fn marker(self) -> MapMarker {
        let (lat, lon) = self.coordinates();
        MapMarker {
            tooltip: self.name(),
            lat,
            lon,
        }
    }
}

/// Voyage order; the map centers on the first stop.
const VOYAGE: [Port; 3] = [Port::Southampton, Port::Cherbourg, Port::Queenstown];

pub fn port_map() -> PortMap {
    let (lat, lon) = VOYAGE[0].coordinates();
    PortMap {
        center: [lat, lon],
        zoom: 5,
        markers: VOYAGE.iter().map(|p| p.marker()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_centers_on_southampton_with_all_ports() {
        let m = port_map();
        assert_eq!(m.center, [50.9097, -1.4044]);
        assert_eq!(m.zoom, 5);
        let names: Vec<_> = m.markers.iter().map(|mk| mk.tooltip).collect();
        assert_eq!(names, ["Southampton", "Cherbourg", "Queenstown"]);
    }
}
