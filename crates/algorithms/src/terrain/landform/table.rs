//! Composite signature to landform class
//!
//! A composite reads as four digits `S H M T`: slope bucket (1 sloped,
//! 2 flat, 5 steep), heat load (1 cool, 2 neutral, 3 warm), mean TPI
//! (1 lowest .. 4 highest) and fine-scale TPI (1 lowest .. 5 highest).
//!
//! Every class lists its composites explicitly; no composite appears in
//! two rows. Steep composites are the one range entry.

use super::class::LandformClass;
use super::class::LandformClass::*;

/// Steep composites, whatever the other three buckets
const CLIFF_RANGE: std::ops::RangeInclusive<u16> = 5000..=6000;

/// Composite sets of every class except [`LandformClass::Cliff`]
const LANDFORM_TABLE: [(LandformClass, &[u16]); 14] = [
    (PeakRidgeWarm, &[1344, 2344]),
    (PeakRidge, &[1244]),
    (PeakRidgeCool, &[1144]),
    (MountainDivide, &[
        1115, 1125, 1135, 1145, 1215, 1225, 1235, 1245, 1315, 1325, 1335, 1345,
        2115, 2125, 2135, 2145, 2215, 2225, 2235, 2245, 2315, 2325, 2335, 2345,
    ]),
    (UpperSlopeWarm, &[1342, 1343]),
    (UpperSlope, &[1242, 1243]),
    (UpperSlopeCool, &[1142, 1143]),
    (UpperSlopeFlat, &[2142, 2143, 2144, 2242, 2243, 2244, 2342, 2343]),
    (LowerSlopeWarm, &[1322, 1323, 1324, 1332, 1333, 1334]),
    (LowerSlope, &[1222, 1223, 1224, 1232, 1233, 1234]),
    (LowerSlopeCool, &[1122, 1123, 1124, 1132, 1133, 1134]),
    (LowerSlopeFlat, &[
        2122, 2123, 2124, 2132, 2133, 2134, 2222, 2223, 2224,
        2232, 2233, 2234, 2322, 2323, 2324, 2332, 2333, 2334,
    ]),
    (Valley, &[
        1112, 1113, 1114, 1212, 1213, 1214, 1312, 1313, 1314,
        2111, 2112, 2113, 2114, 2121, 2131, 2141,
        2211, 2212, 2213, 2214, 2221, 2231, 2241,
        2311, 2312, 2313, 2314, 2321, 2331, 2341,
    ]),
    (ValleyNarrow, &[1111, 1121, 1131, 1141, 1211, 1221, 1231, 1241, 1311, 1321, 1331, 1341]),
];

/// Landform for a composite signature; `None` for composites that no
/// class claims.
pub fn landform_for_composite(composite: u16) -> Option<LandformClass> {
    if CLIFF_RANGE.contains(&composite) {
        return Some(Cliff);
    }

    LANDFORM_TABLE
        .iter()
        .find(|(_, set)| set.contains(&composite))
        .map(|(class, _)| *class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composites(s: u16) -> impl Iterator<Item = u16> {
        (1..=3u16).flat_map(move |h| {
            (1..=4u16).flat_map(move |m| (1..=5u16).map(move |t| s * 1000 + h * 100 + m * 10 + t))
        })
    }

    #[test]
    fn test_every_sloped_and_flat_composite_classified() {
        for c in composites(1).chain(composites(2)) {
            assert!(landform_for_composite(c).is_some(), "composite {} unclassified", c);
        }
    }

    #[test]
    fn test_every_table_row_round_trips() {
        for (class, set) in LANDFORM_TABLE.iter() {
            for &c in set.iter() {
                assert_eq!(landform_for_composite(c), Some(*class), "composite {}", c);
            }
        }
    }

    #[test]
    fn test_table_rows_disjoint() {
        let mut seen = std::collections::BTreeSet::new();
        for (_, set) in LANDFORM_TABLE.iter() {
            for &c in set.iter() {
                assert!(seen.insert(c), "composite {} listed twice", c);
                assert!(!CLIFF_RANGE.contains(&c));
            }
        }
        // 12 heat-load x mean-TPI pairs x 5 TPI buckets, sloped and flat
        assert_eq!(seen.len(), 120);
    }

    #[test]
    fn test_every_class_has_a_row() {
        for class in LandformClass::ALL.iter().filter(|c| **c != Cliff) {
            assert!(LANDFORM_TABLE.iter().any(|(c, _)| c == class), "{:?} missing", class);
        }
    }

    #[test]
    fn test_known_entries() {
        assert_eq!(landform_for_composite(1234), Some(LowerSlope));
        assert_eq!(landform_for_composite(1344), Some(PeakRidgeWarm));
        assert_eq!(landform_for_composite(2344), Some(PeakRidgeWarm));
        assert_eq!(landform_for_composite(1244), Some(PeakRidge));
        assert_eq!(landform_for_composite(1144), Some(PeakRidgeCool));
        assert_eq!(landform_for_composite(1343), Some(UpperSlopeWarm));
        assert_eq!(landform_for_composite(2244), Some(UpperSlopeFlat));
        assert_eq!(landform_for_composite(1334), Some(LowerSlopeWarm));
        assert_eq!(landform_for_composite(2132), Some(LowerSlopeFlat));
        assert_eq!(landform_for_composite(1214), Some(Valley));
        assert_eq!(landform_for_composite(2341), Some(Valley));
        assert_eq!(landform_for_composite(2113), Some(Valley));
        assert_eq!(landform_for_composite(1241), Some(ValleyNarrow));
        assert_eq!(landform_for_composite(1111), Some(ValleyNarrow));
    }

    #[test]
    fn test_mountain_divide_needs_top_tpi_bucket() {
        for c in composites(1).chain(composites(2)) {
            assert_eq!(landform_for_composite(c) == Some(MountainDivide), c % 10 == 5, "composite {}", c);
        }
    }

    #[test]
    fn test_cliff_range() {
        assert_eq!(landform_for_composite(5000), Some(Cliff));
        assert_eq!(landform_for_composite(5234), Some(Cliff));
        assert_eq!(landform_for_composite(6000), Some(Cliff));
        assert_eq!(landform_for_composite(4999), None);
        assert_eq!(landform_for_composite(6001), None);
    }

    #[test]
    fn test_unknown_composites() {
        assert_eq!(landform_for_composite(0), None);
        assert_eq!(landform_for_composite(1000), None);
        assert_eq!(landform_for_composite(1434), None);
        assert_eq!(landform_for_composite(1204), None);
        assert_eq!(landform_for_composite(1256), None);
        assert_eq!(landform_for_composite(3234), None);
        assert_eq!(landform_for_composite(4999), None);
        assert_eq!(landform_for_composite(6001), None);
        assert_eq!(landform_for_composite(u16::MAX), None);
    }
}
