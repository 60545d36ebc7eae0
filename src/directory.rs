//! Fallback directory
//!
//! Static popular cities and localities. The gateway synthesizes responses from
//! these when the vendor is unavailable, and the search modal shows matches
//! from them before any network answer arrives.

use serde::Serialize;

/// A city shown in the popular list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopularCity {
    pub id: &'static str,
    pub name: &'static str,
}

/// A well-known locality inside a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopularLocality {
    pub id: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    #[serde(rename = "fullAddress")]
    pub full_address: &'static str,
}

const POPULAR_CITIES: &[PopularCity] = &[
    PopularCity { id: "city-indore", name: "Indore" },
    PopularCity { id: "city-mumbai", name: "Mumbai" },
    PopularCity { id: "city-delhi", name: "Delhi" },
    PopularCity { id: "city-bangalore", name: "Bangalore" },
    PopularCity { id: "city-pune", name: "Pune" },
    PopularCity { id: "city-jaipur", name: "Jaipur" },
    PopularCity { id: "city-hyderabad", name: "Hyderabad" },
    PopularCity { id: "city-chennai", name: "Chennai" },
    PopularCity { id: "city-kolkata", name: "Kolkata" },
    PopularCity { id: "city-ahmedabad", name: "Ahmedabad" },
];

const POPULAR_LOCALITIES: &[PopularLocality] = &[
    PopularLocality {
        id: "loc-indore-vijay-nagar",
        name: "Vijay Nagar",
        city: "Indore",
        state: "Madhya Pradesh",
        full_address: "Vijay Nagar, Indore, Madhya Pradesh, India",
    },
    PopularLocality {
        id: "loc-indore-vijay-nagar-square",
        name: "Vijay Nagar Square",
        city: "Indore",
        state: "Madhya Pradesh",
        full_address: "Vijay Nagar Square, AB Road, Indore, Madhya Pradesh, India",
    },
    PopularLocality {
        id: "loc-indore-vijay-nagar-scheme-54",
        name: "Vijay Nagar Scheme No. 54",
        city: "Indore",
        state: "Madhya Pradesh",
        full_address: "Scheme No. 54, Vijay Nagar, Indore, Madhya Pradesh, India",
    },
    PopularLocality {
        id: "loc-indore-palasia",
        name: "Palasia",
        city: "Indore",
        state: "Madhya Pradesh",
        full_address: "Palasia, Indore, Madhya Pradesh, India",
    },
    PopularLocality {
        id: "loc-indore-rajwada",
        name: "Rajwada",
        city: "Indore",
        state: "Madhya Pradesh",
        full_address: "Rajwada, Indore, Madhya Pradesh, India",
    },
    PopularLocality {
        id: "loc-mumbai-andheri-west",
        name: "Andheri West",
        city: "Mumbai",
        state: "Maharashtra",
        full_address: "Andheri West, Mumbai, Maharashtra, India",
    },
    PopularLocality {
        id: "loc-mumbai-bandra",
        name: "Bandra",
        city: "Mumbai",
        state: "Maharashtra",
        full_address: "Bandra, Mumbai, Maharashtra, India",
    },
    PopularLocality {
        id: "loc-delhi-connaught-place",
        name: "Connaught Place",
        city: "Delhi",
        state: "Delhi",
        full_address: "Connaught Place, New Delhi, Delhi, India",
    },
    PopularLocality {
        id: "loc-bangalore-koramangala",
        name: "Koramangala",
        city: "Bangalore",
        state: "Karnataka",
        full_address: "Koramangala, Bangalore, Karnataka, India",
    },
    PopularLocality {
        id: "loc-bangalore-indiranagar",
        name: "Indiranagar",
        city: "Bangalore",
        state: "Karnataka",
        full_address: "Indiranagar, Bangalore, Karnataka, India",
    },
    PopularLocality {
        id: "loc-pune-koregaon-park",
        name: "Koregaon Park",
        city: "Pune",
        state: "Maharashtra",
        full_address: "Koregaon Park, Pune, Maharashtra, India",
    },
    PopularLocality {
        id: "loc-jaipur-malviya-nagar",
        name: "Malviya Nagar",
        city: "Jaipur",
        state: "Rajasthan",
        full_address: "Malviya Nagar, Jaipur, Rajasthan, India",
    },
    PopularLocality {
        id: "loc-hyderabad-banjara-hills",
        name: "Banjara Hills",
        city: "Hyderabad",
        state: "Telangana",
        full_address: "Banjara Hills, Hyderabad, Telangana, India",
    },
    PopularLocality {
        id: "loc-chennai-t-nagar",
        name: "T. Nagar",
        city: "Chennai",
        state: "Tamil Nadu",
        full_address: "T. Nagar, Chennai, Tamil Nadu, India",
    },
    PopularLocality {
        id: "loc-ahmedabad-navrangpura",
        name: "Navrangpura",
        city: "Ahmedabad",
        state: "Gujarat",
        full_address: "Navrangpura, Ahmedabad, Gujarat, India",
    },
];

/// All popular cities, in display order
pub fn popular_cities() -> &'static [PopularCity] {
    POPULAR_CITIES
}

/// All popular localities, in display order
pub fn popular_localities() -> &'static [PopularLocality] {
    POPULAR_LOCALITIES
}

/// Cities whose name contains `query`, ignoring case
pub fn match_cities(query: &str) -> Vec<&'static PopularCity> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    POPULAR_CITIES
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect()
}

/// Localities whose name or full address contains `query`, ignoring case
pub fn match_localities(query: &str) -> Vec<&'static PopularLocality> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    POPULAR_LOCALITIES
        .iter()
        .filter(|l| {
            l.name.to_lowercase().contains(&needle)
                || l.full_address.to_lowercase().contains(&needle)
        })
        .collect()
}
