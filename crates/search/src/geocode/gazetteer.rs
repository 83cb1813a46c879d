//! Built-in gazetteer of the platform's major cities.
//!
//! Last-resort fallback when the upstream provider yields nothing: a
//! query mentioning one of these city names still resolves, at reduced
//! confidence.

/// One gazetteer entry. `folded` is the lowercase, accent-folded form
/// matched against normalized queries.
pub struct GazetteerCity {
    pub folded: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub region: &'static str,
    pub country: &'static str,
}

pub const CITIES: &[GazetteerCity] = &[
    GazetteerCity {
        folded: "yaounde",
        name: "Yaoundé",
        latitude: 3.8480,
        longitude: 11.5021,
        region: "Centre",
        country: "Cameroun",
    },
    GazetteerCity {
        folded: "douala",
        name: "Douala",
        latitude: 4.0511,
        longitude: 9.7679,
        region: "Littoral",
        country: "Cameroun",
    },
    GazetteerCity {
        folded: "bamenda",
        name: "Bamenda",
        latitude: 5.9631,
        longitude: 10.1591,
        region: "Nord-Ouest",
        country: "Cameroun",
    },
    GazetteerCity {
        folded: "bafoussam",
        name: "Bafoussam",
        latitude: 5.4781,
        longitude: 10.4167,
        region: "Ouest",
        country: "Cameroun",
    },
    GazetteerCity {
        folded: "garoua",
        name: "Garoua",
        latitude: 9.3265,
        longitude: 13.3958,
        region: "Nord",
        country: "Cameroun",
    },
    GazetteerCity {
        folded: "paris",
        name: "Paris",
        latitude: 48.8566,
        longitude: 2.3522,
        region: "Île-de-France",
        country: "France",
    },
    GazetteerCity {
        folded: "lyon",
        name: "Lyon",
        latitude: 45.7640,
        longitude: 4.8357,
        region: "Auvergne-Rhône-Alpes",
        country: "France",
    },
    GazetteerCity {
        folded: "marseille",
        name: "Marseille",
        latitude: 43.2965,
        longitude: 5.3698,
        region: "Provence-Alpes-Côte d'Azur",
        country: "France",
    },
];

/// Finds the first city whose folded name occurs in the normalized query.
pub fn lookup(normalized_query: &str) -> Option<&'static GazetteerCity> {
    CITIES.iter().find(|c| normalized_query.contains(c.folded))
}
