use geo::{Distance, Haversine};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// Great-circle distance in metres.
    pub fn haversine_distance(&self, to: &Location) -> f64 {
        Haversine.distance(self.point, to.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance_is_symmetric() {
        // Bay St & Wellesley and Union Station, Toronto.
        let bay_wellesley = Location::from_lat_lon(43.6651, -79.3860);
        let union = Location::from_lat_lon(43.6453, -79.3806);

        let there = bay_wellesley.haversine_distance(&union);
        let back = union.haversine_distance(&bay_wellesley);

        assert!((there - back).abs() < 1e-9);
        assert!((2_000.0..2_500.0).contains(&there));
    }
}
