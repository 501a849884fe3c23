//! Hardcoded station directories, one per source.

use serde::Serialize;

/// A configured station: source-specific id and the name shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Station {
    pub id: &'static str,
    pub name: &'static str,
}

impl Station {
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name }
    }
}

/// Read-only id → display name map for one source, in report order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StationDirectory {
    pub source: &'static str,
    pub stations: &'static [Station],
}

impl StationDirectory {
    pub const fn new(source: &'static str, stations: &'static [Station]) -> Self {
        Self { source, stations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Station> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Display name for `id`, if configured.
    pub fn lookup(&self, id: &str) -> Option<&'static str> {
        self.stations.iter().find(|s| s.id == id).map(|s| s.name)
    }
}

/// Weather Underground personal weather stations.
pub const WUNDERGROUND: StationDirectory = StationDirectory::new(
    "wunderground",
    &[
        Station::new("IKERKIRA2", "Arillas"),
        Station::new("IAVLIO1", "Avliotes"),
        Station::new("IPERIT4", "Acharavi"),
        Station::new("IKAROU2", "Gialos Karousadon"),
        Station::new("ILOUTS1", "Loutses1"),
        Station::new("ILOUTS2", "Loutses Anapaftiria"),
        Station::new("IKASSI2", "Kassiopi"),
        Station::new("ISINIE3", "Sinies Porta"),
        Station::new("INISSA6", "Old Sinies"),
        Station::new("IYANNA5", "Ropa"),
        Station::new("ICORFU22", "Laiki Agora"),
        Station::new("ICORFU20", "Kentro Kofineta"),
        Station::new("ICORFU9", "1st Epal"),
        Station::new("ICORFU24", "Garitsa"),
        Station::new("IKOBIT2", "Kobitsi"),
        Station::new("IGASTO3", "Perama"),
        Station::new("IKALAF4", "Kothoniki"),
        Station::new("ICORFU8", "Agios Georgios Argyr"),
        Station::new("ICHLOM1", "Chlomos"),
        Station::new("IARGYR6", "Perivoli"),
        Station::new("ISAYAD1", "Sagiada"),
        Station::new("IIGOUM1", "Igoumenitsa"),
        Station::new("IU0389U02", "Filothei Thesprot"),
    ],
);

/// The single meteoclub.gr station page.
pub const METEOCLUB: StationDirectory =
    StationDirectory::new("meteoclub", &[Station::new("valanio-kerkyra", "Valaneio")]);

/// penteli.meteo.gr station pages, keyed by URL slug.
pub const PENTELI: StationDirectory = StationDirectory::new(
    "penteli",
    &[
        Station::new("kerkyra", "Gouvia"),
        Station::new("paxoi", "Paxoi"),
        Station::new("petalia", "Petaleia"),
        Station::new("acharavi", "AcharaviEAA"),
        Station::new("igoumenitsa", "MavroudiThesprot"),
    ],
);

/// The meteociel.fr observation page for Corfu airport.
pub const METEOCIEL: StationDirectory =
    StationDirectory::new("meteociel", &[Station::new("16641", "Aerodromio")]);

/// Weathercloud dashboards.
pub const WEATHERCLOUD: StationDirectory = StationDirectory::new(
    "weathercloud",
    &[
        Station::new("d7463552240", "AgiosPanteleimonas"),
        Station::new("d0774314531", "Agni"),
        Station::new("d7746504386", "Nissaki"),
        Station::new("d7550631437", "Ypsos"),
        Station::new("d6245085291", "Kothoniki"),
        Station::new("d1871029033", "Perama"),
        Station::new("d1594180981", "Gastouri"),
        Station::new("d2603547554", "Milia Kynopiaston"),
        Station::new("d5203070705", "Agioi Deka"),
        Station::new("d4591805891", "Petriti"),
        Station::new("d3332581754", "GraikoxoriThesprot"),
        Station::new("d0228718460", "FiliatesThesprot"),
    ],
);

/// Station codes kept from the ionianweather.gr feed. Display names come
/// from the feed itself.
pub const IONIAN_CODES: &[&str] = &["CRF-1", "CRF-2", "CRF-3", "CRF-4", "PAX-1"];

/// All fixed directories in run order.
pub fn all() -> [StationDirectory; 5] {
    [WUNDERGROUND, METEOCLUB, PENTELI, METEOCIEL, WEATHERCLOUD]
}

/// Display name for `id` in the first directory that has it, or `id` itself.
pub fn display_name(id: &str) -> &str {
    all().iter().find_map(|d| d.lookup(id)).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_directory_sizes() {
        assert_eq!(WUNDERGROUND.len(), 23);
        assert_eq!(PENTELI.len(), 5);
        assert_eq!(WEATHERCLOUD.len(), 12);
        assert_eq!(IONIAN_CODES.len(), 5);
    }

    #[test]
    fn test_ids_are_unique() {
        for dir in all() {
            let ids: HashSet<_> = dir.iter().map(|s| s.id).collect();
            assert_eq!(ids.len(), dir.len(), "duplicate id in {}", dir.source);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(WUNDERGROUND.lookup("ICORFU24"), Some("Garitsa"));
        assert_eq!(WUNDERGROUND.lookup("NOPE"), None);
        assert_eq!(display_name("d1594180981"), "Gastouri");
        assert_eq!(display_name("16641"), "Aerodromio");
        assert_eq!(display_name("d000"), "d000");
    }
}
