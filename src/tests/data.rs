use chrono::{DateTime, TimeZone, Utc};

use crate::feed::OrbitalElementRecord;

pub const ISS_NAME: &str = "ISS (ZARYA)";
pub const ISS_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub const ISS_LINE2: &str =
    "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

const VARIANTS: [(&str, &str, &str); 2] = [
    (
        "TEST OBJECT A",
        "1 90001U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992",
        "2 90001  51.6461 100.0000 0001413  89.1723 010.0000 15.49507896236001",
    ),
    (
        "TEST OBJECT B",
        "1 90002U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9993",
        "2 90002  51.6461 340.5000 0001413  89.1723 190.2500 15.49507896236009",
    ),
];

/// Shortly before the ISS element epoch (2020 day 194.886).
pub fn iss_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 7, 12, 21, 16, 0).unwrap()
}

pub fn iss_record() -> OrbitalElementRecord {
    OrbitalElementRecord {
        name: ISS_NAME.to_string(),
        line1: ISS_LINE1.to_string(),
        line2: ISS_LINE2.to_string(),
    }
}

/// The ISS followed by two objects on distinct planes.
pub fn sample_records() -> Vec<OrbitalElementRecord> {
    let mut records = vec![iss_record()];
    records.extend(VARIANTS.iter().map(|(name, line1, line2)| OrbitalElementRecord {
        name: name.to_string(),
        line1: line1.to_string(),
        line2: line2.to_string(),
    }));
    records
}

/// `sample_records` in the three-line plaintext feed layout.
pub fn sample_feed() -> String {
    sample_records()
        .iter()
        .map(|r| format!("{}\n{}\n{}\n", r.name, r.line1, r.line2))
        .collect()
}
