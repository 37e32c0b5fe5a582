//! Recycling plants offered for booking. The list doubles as the plant
//! selector's options and the map's marker source.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecyclingPlant {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub hours: &'static str,
    pub phone: Option<&'static str>,
}

/// Glasgow city centre.
pub const MAP_CENTER: (f64, f64) = (55.8642, -4.2518);
pub const MAP_ZOOM: u8 = 12;
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_MAX_ZOOM: u8 = 19;

pub static RECYCLING_PLANTS: [RecyclingPlant; 6] = [
    RecyclingPlant {
        name: "Dawsholm Recycling Centre",
        address: "Dalsholm Road, Glasgow, G20 0SP",
        lat: 55.8903,
        lng: -4.3044,
        hours: "Mon-Sun: 8:00 AM - 4:00 PM",
        phone: Some("0141 287 1059"),
    },
    RecyclingPlant {
        name: "Polmadie Recycling Centre",
        address: "18 Aikenhead Road, Glasgow, G42 8NN",
        lat: 55.8359,
        lng: -4.2441,
        hours: "Mon-Sun: 8:00 AM - 4:00 PM",
        phone: Some("0141 287 0368"),
    },
    RecyclingPlant {
        name: "Shieldhall Recycling Centre",
        address: "Shieldhall Road, Glasgow, G51 4SL",
        lat: 55.8624,
        lng: -4.3441,
        hours: "Mon-Sun: 8:00 AM - 4:00 PM",
        phone: Some("0141 287 0911"),
    },
    RecyclingPlant {
        name: "Easter Queenslie Household Waste Recycling Centre",
        address: "240 Queenslie Industrial Estate, Glasgow, G33 4UL",
        lat: 55.8549,
        lng: -4.1616,
        hours: "Mon-Sun: 8:00 AM - 4:00 PM",
        phone: Some("0141 287 5555"),
    },
    RecyclingPlant {
        name: "Clyde Gateway East Recycling Centre",
        address: "Shawfield Drive, Glasgow, G73 1NN",
        lat: 55.8263,
        lng: -4.2092,
        hours: "Mon-Sun: 8:00 AM - 4:00 PM",
        phone: Some("0141 287 0912"),
    },
    RecyclingPlant {
        name: "Biffa East Kilbride Recycling Centre",
        address: "Strathaven Road, East Kilbride, G75 0QZ",
        lat: 55.7639,
        lng: -4.2213,
        hours: "Mon-Sat: 8:00 AM - 6:00 PM, Sun: 9:00 AM - 5:00 PM",
        phone: Some("01355 806060"),
    },
];

pub fn find_plant(name: &str) -> Option<&'static RecyclingPlant> {
    RECYCLING_PLANTS.iter().find(|plant| plant.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_names_are_unique() {
        let mut names: Vec<_> = RECYCLING_PLANTS.iter().map(|plant| plant.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RECYCLING_PLANTS.len());
    }

    #[test]
    fn finds_plants_by_exact_name() {
        let plant = find_plant("Polmadie Recycling Centre").expect("missing plant");
        assert_eq!(plant.phone, Some("0141 287 0368"));
        assert!(find_plant("polmadie recycling centre").is_none());
    }
}
