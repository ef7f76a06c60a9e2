//! Coordinate reference system metadata
//!
//! Geoform never reprojects. The CRS is carried from the input DEM to every
//! derived raster so outputs stay georeferenced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate reference system, identified by EPSG code or WKT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    epsg: Option<u32>,
    wkt: Option<String>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            wkt: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            epsg: None,
            wkt: Some(wkt.into()),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// WKT representation if known
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Whether coordinates are angular (degrees).
    ///
    /// Only EPSG codes in the geographic 2D range (4000–4999) are
    /// recognised; a WKT-only CRS is checked for a `GEOGCS`/`GEOGCRS` root.
    pub fn is_geographic(&self) -> bool {
        if let Some(code) = self.epsg {
            return (4000..5000).contains(&code);
        }
        self.wkt
            .as_deref()
            .map(|w| {
                let w = w.trim_start();
                w.starts_with("GEOGCS") || w.starts_with("GEOGCRS")
            })
            .unwrap_or(false)
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        match (self.epsg, other.epsg) {
            (Some(a), Some(b)) => a == b,
            _ => match (&self.wkt, &other.wkt) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// String identifier for display and logging
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            return format!("WKT:{}", &wkt[..wkt.len().min(50)]);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(32719);
        assert_eq!(crs.epsg(), Some(32719));
        assert_eq!(crs.identifier(), "EPSG:32719");
        assert!(!crs.is_geographic());
    }

    #[test]
    fn test_crs_geographic() {
        assert!(CRS::wgs84().is_geographic());
        assert!(CRS::from_wkt("GEOGCS[\"WGS 84\"]").is_geographic());
        assert!(!CRS::from_wkt("PROJCS[\"UTM 19S\"]").is_geographic());
    }

    #[test]
    fn test_crs_equivalence() {
        assert!(CRS::from_epsg(4326).is_equivalent(&CRS::wgs84()));
        assert!(!CRS::from_epsg(4326).is_equivalent(&CRS::from_wkt("GEOGCS")));
    }
}
