//! Geometry decoding
//!
//! PostGIS renders a `geometry` value cast to text as hex-encoded EWKB. Only
//! two-dimensional points are stored, so that is all this parser accepts.

use geoboard::{Location, RepositoryError};

const WKB_POINT: u32 = 1;
const EWKB_Z_FLAG: u32 = 0x8000_0000;
const EWKB_M_FLAG: u32 = 0x4000_0000;
const EWKB_SRID_FLAG: u32 = 0x2000_0000;

/// Decode a hex (E)WKB point into a `Location`.
///
/// Accepts either byte order, with or without an embedded SRID. Anything
/// else, including empty points, is `RepositoryError::MalformedGeometry`.
pub fn decode_point_hex(hex_wkb: &str) -> Result<Location, RepositoryError> {
    let bytes = hex::decode(hex_wkb.trim())
        .map_err(|e| RepositoryError::MalformedGeometry(format!("invalid hex: {}", e)))?;

    let mut reader = WkbReader::new(&bytes)?;
    let type_code = reader.read_u32()?;

    if type_code & (EWKB_Z_FLAG | EWKB_M_FLAG) != 0 {
        return Err(malformed("only 2D points are supported"));
    }
    if type_code & EWKB_SRID_FLAG != 0 {
        // SRID is not needed to recover the coordinates.
        reader.read_u32()?;
    }
    let geometry_type = type_code & 0x0FFF_FFFF;
    if geometry_type != WKB_POINT {
        return Err(malformed(&format!(
            "expected point, found geometry type {}",
            geometry_type
        )));
    }

    let long = reader.read_f64()?;
    let lat = reader.read_f64()?;
    reader.finish()?;

    if long.is_nan() || lat.is_nan() {
        return Err(malformed("empty point"));
    }

    Ok(Location::new(long, lat))
}

fn malformed(reason: &str) -> RepositoryError {
    RepositoryError::MalformedGeometry(reason.to_string())
}

struct WkbReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    little_endian: bool,
}

impl<'a> WkbReader<'a> {
    fn new(bytes: &'a [u8]) -> Result<Self, RepositoryError> {
        let little_endian = match bytes.first() {
            Some(0) => false,
            Some(1) => true,
            Some(other) => return Err(malformed(&format!("bad byte order marker {}", other))),
            None => return Err(malformed("empty geometry")),
        };

        Ok(Self {
            bytes,
            pos: 1,
            little_endian,
        })
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], RepositoryError> {
        let end = self.pos + N;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| malformed("truncated geometry"))?;
        self.pos = end;

        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn read_u32(&mut self) -> Result<u32, RepositoryError> {
        let raw = self.take::<4>()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn read_f64(&mut self) -> Result<f64, RepositoryError> {
        let raw = self.take::<8>()?;
        Ok(if self.little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }

    fn finish(self) -> Result<(), RepositoryError> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(malformed("trailing bytes after point"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ewkb_le(type_code: u32, srid: Option<u32>, coords: &[f64]) -> String {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&type_code.to_le_bytes());
        if let Some(srid) = srid {
            bytes.extend_from_slice(&srid.to_le_bytes());
        }
        for c in coords {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        hex::encode_upper(bytes)
    }

    #[test]
    fn test_postgis_point_with_srid() {
        let hex = "0101000020E610000000000000004052C00000000000004440";
        let loc = decode_point_hex(hex).unwrap();
        assert_eq!(loc, Location::new(-73.0, 40.0));
    }

    #[test]
    fn test_big_endian_plain_wkb() {
        let hex = "0000000001C0524000000000004044000000000000";
        let loc = decode_point_hex(hex).unwrap();
        assert_eq!(loc, Location::new(-73.0, 40.0));
    }

    #[test]
    fn test_full_precision_round_trip() {
        let hex = ewkb_le(WKB_POINT | EWKB_SRID_FLAG, Some(4326), &[-73.123456789, 40.000000001]);
        let loc = decode_point_hex(&hex).unwrap();
        assert_eq!(loc, Location::new(-73.123456789, 40.000000001));
    }

    #[test]
    fn test_rejects_invalid_hex() {
        let err = decode_point_hex("not-hex").unwrap_err();
        assert!(matches!(err, RepositoryError::MalformedGeometry(_)));
    }

    #[test]
    fn test_rejects_truncated_input() {
        let hex = "0101000020E610000000000000004052C0";
        let err = decode_point_hex(hex).unwrap_err();
        assert!(matches!(err, RepositoryError::MalformedGeometry(_)));
    }

    #[test]
    fn test_rejects_non_point() {
        // LINESTRING type code
        let hex = ewkb_le(2, None, &[0.0, 0.0]);
        assert!(decode_point_hex(&hex).is_err());
    }

    #[test]
    fn test_rejects_3d_point() {
        let hex = ewkb_le(WKB_POINT | EWKB_Z_FLAG, None, &[1.0, 2.0, 3.0]);
        assert!(decode_point_hex(&hex).is_err());
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let hex = ewkb_le(WKB_POINT, None, &[1.0, 2.0, 3.0]);
        assert!(decode_point_hex(&hex).is_err());
    }

    #[test]
    fn test_rejects_empty_point() {
        let hex = ewkb_le(WKB_POINT, None, &[f64::NAN, f64::NAN]);
        assert!(decode_point_hex(&hex).is_err());
    }

    #[test]
    fn test_rejects_empty_string() {
        assert!(decode_point_hex("").is_err());
    }
}
