//! SKU Formatter
//!
//! Builds and parses the canonical SKU string
//! `BRAND-CATEGORY-SIZE-COLOR-SEQUENCE`. Inputs to [`build`] are assumed
//! already normalized and uppercased; [`parse`] is best-effort and
//! returns `None` instead of an error.

use crate::core::{SkuError, SkuResult};
use shared::models::SkuComponents;

/// Field label order, for error messages
const FIELDS: [&str; 5] = ["brand", "category", "size", "color", "sequence"];

fn is_valid_component(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}

/// Join five already-normalized components into a SKU string
///
/// Fails with `InvalidComponent` when a field is empty or contains a
/// character outside `[A-Z0-9]`.
pub fn build(
    brand: &str,
    category: &str,
    size: &str,
    color: &str,
    sequence: &str,
) -> SkuResult<String> {
    for (field, value) in FIELDS.into_iter().zip([brand, category, size, color, sequence]) {
        if value.is_empty() {
            return Err(SkuError::invalid_component(field, "empty"));
        }
        if !is_valid_component(value) {
            return Err(SkuError::invalid_component(
                field,
                format!("'{value}' contains characters outside [A-Z0-9]"),
            ));
        }
    }
    Ok(format!("{brand}-{category}-{size}-{color}-{sequence}"))
}

/// Split a SKU string back into components; `None` on any mismatch
///
/// Requires at least five non-empty `[A-Z0-9]+` groups. The sequence
/// component absorbs any trailing hyphen-joined remainder, so sequences
/// that themselves contain hyphens (custom suffixes) survive a round trip
/// through the catalog.
pub fn parse(sku: &str) -> Option<SkuComponents> {
    let parts: Vec<&str> = sku.split('-').collect();
    if parts.len() < 5 || !parts.iter().all(|p| is_valid_component(p)) {
        return None;
    }
    Some(SkuComponents {
        brand: parts[0].to_string(),
        category: parts[1].to_string(),
        size: parts[2].to_string(),
        color: parts[3].to_string(),
        sequence: parts[4..].join("-"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_joins_fields() {
        let sku = build("NIKE", "SHO", "L", "BLK", "001").unwrap();
        assert_eq!(sku, "NIKE-SHO-L-BLK-001");
    }

    #[test]
    fn test_build_rejects_empty_field() {
        let err = build("NIKE", "", "L", "BLK", "001").unwrap_err();
        assert!(matches!(
            err,
            SkuError::InvalidComponent { field: "category", .. }
        ));
    }

    #[test]
    fn test_build_rejects_bad_charset() {
        // Lowercase, hyphens and unicode are all caller bugs at this layer
        assert!(build("nike", "SHO", "L", "BLK", "001").is_err());
        assert!(build("NIKE", "SHO", "L", "BLK", "00-1").is_err());
        assert!(build("NIKE", "SH O", "L", "BLK", "001").is_err());
        assert!(build("NIKÉ", "SHO", "L", "BLK", "001").is_err());
    }

    #[test]
    fn test_parse_round_trip() {
        let cases = [
            ("NIKE", "SHO", "L", "BLK", "001"),
            ("PUMA", "ACC", "OS", "NON", "042"),
            ("B1", "C2", "XXL", "NVY", "1000"),
        ];
        for (b, c, s, col, seq) in cases {
            let sku = build(b, c, s, col, seq).unwrap();
            let parsed = parse(&sku).unwrap();
            assert_eq!(parsed.brand, b);
            assert_eq!(parsed.category, c);
            assert_eq!(parsed.size, s);
            assert_eq!(parsed.color, col);
            assert_eq!(parsed.sequence, seq);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse("").is_none());
        assert!(parse("NIKE-SHO-L-BLK").is_none()); // only 4 groups
        assert!(parse("NIKE-SHO-L-BLK-").is_none()); // empty sequence
        assert!(parse("nike-SHO-L-BLK-001").is_none()); // lowercase
        assert!(parse("NIKE-SHO-L-BLK-0 1").is_none()); // space
        assert!(parse("NIKE_SHO_L_BLK_001").is_none()); // wrong separator
    }

    #[test]
    fn test_parse_sequence_absorbs_remainder() {
        let parsed = parse("NIKE-SHO-L-BLK-001-PROMO").unwrap();
        assert_eq!(parsed.sequence, "001-PROMO");
        assert_eq!(parsed.prefix(), "NIKE-SHO-");
    }
}
