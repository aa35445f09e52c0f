//! Named Bengaluru places for realistic routing fixtures.
//!
//! Coordinates are approximate city positions, close enough for
//! haversine distances at metro scale.

/// A named place with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

// ============================================================================
// Restaurants (pickup points)
// ============================================================================

pub const RESTAURANTS: &[Place] = &[
    Place::new("Truffles Koramangala", 12.9332, 77.6146),
    Place::new("Meghana Foods Koramangala", 12.9365, 77.6266),
    Place::new("Empire Restaurant Indiranagar", 12.9784, 77.6408),
    Place::new("Corner House Jayanagar", 12.9300, 77.5832),
    Place::new("CTR Malleshwaram", 13.0027, 77.5681),
    Place::new("Vidyarthi Bhavan Basavanagudi", 12.9420, 77.5737),
    Place::new("MTR Lalbagh Road", 12.9557, 77.5850),
    Place::new("Nagarjuna Residency Road", 12.9721, 77.6077),
    Place::new("Shivaji Military Hotel Jayanagar", 12.9184, 77.5737),
    Place::new("Brahmin's Coffee Bar Shankarapura", 12.9548, 77.5681),
    Place::new("Rameshwaram Cafe Indiranagar", 12.9698, 77.6367),
    Place::new("Koshy's St Marks Road", 12.9751, 77.6043),
    Place::new("Airlines Hotel Lavelle Road", 12.9699, 77.5967),
    Place::new("Gundappa Donne Biryani Ulsoor", 12.9812, 77.6270),
    Place::new("Hari Super Sandwich Jayanagar", 12.9254, 77.5832),
    Place::new("A2B Marathahalli", 12.9569, 77.7011),
];

// ============================================================================
// Residential neighborhoods (drop-off points)
// ============================================================================

pub const NEIGHBORHOODS: &[Place] = &[
    Place::new("Koramangala", 12.9352, 77.6245),
    Place::new("Indiranagar", 12.9719, 77.6412),
    Place::new("HSR Layout", 12.9116, 77.6389),
    Place::new("Jayanagar", 12.9308, 77.5838),
    Place::new("MG Road", 12.9758, 77.6045),
    Place::new("Whitefield", 12.9698, 77.7500),
    Place::new("Electronic City", 12.8452, 77.6602),
    Place::new("Marathahalli", 12.9591, 77.6974),
    Place::new("BTM Layout", 12.9166, 77.6101),
    Place::new("Malleshwaram", 13.0035, 77.5709),
    Place::new("Basavanagudi", 12.9422, 77.5760),
    Place::new("Hebbal", 13.0358, 77.5970),
    Place::new("Yelahanka", 13.1007, 77.5963),
    Place::new("Banashankari", 12.9255, 77.5468),
    Place::new("Rajajinagar", 12.9866, 77.5517),
    Place::new("JP Nagar", 12.9063, 77.5857),
    Place::new("Bellandur", 12.9304, 77.6784),
    Place::new("Sarjapur Road", 12.9010, 77.6874),
    Place::new("Domlur", 12.9610, 77.6387),
    Place::new("Ulsoor", 12.9817, 77.6284),
];

/// Pairs restaurants with drop-off neighborhoods for batch fixtures.
pub fn delivery_pairs(count: usize) -> Vec<(Place, Place)> {
    RESTAURANTS
        .iter()
        .cycle()
        .zip(NEIGHBORHOODS.iter().cycle())
        .take(count)
        .map(|(restaurant, neighborhood)| (*restaurant, *neighborhood))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_bengaluru_area() {
        for place in RESTAURANTS.iter().chain(NEIGHBORHOODS.iter()) {
            assert!(
                place.lat > 12.8 && place.lat < 13.2,
                "{} lat out of range: {}",
                place.name,
                place.lat
            );
            assert!(
                place.lon > 77.4 && place.lon < 77.8,
                "{} lon out of range: {}",
                place.name,
                place.lon
            );
        }
    }

    #[test]
    fn test_delivery_pairs_cycle() {
        let pairs = delivery_pairs(25);
        assert_eq!(pairs.len(), 25);
        assert_eq!(pairs[0].0.name, pairs[16].0.name, "restaurants repeat after 16");
    }
}
