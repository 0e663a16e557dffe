use crate::feed::error::FeedError;
use crate::feed::types::OrbitalElementRecord;

/// Parse a plaintext feed into `(name, line1, line2)` groups.
///
/// Blank lines are ignored. Parsing stops at the first incomplete group, so a
/// feed cut off mid-record yields every record before the cut.
pub fn parse_feed(content: &str) -> Vec<OrbitalElementRecord> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::with_capacity(lines.len() / 3);

    for group in lines.chunks(3) {
        let &[name, line1, line2] = group else {
            log::warn!(
                "Feed truncated after {} records: incomplete group starting at {:?}",
                records.len(),
                group.first().copied().unwrap_or_default()
            );
            break;
        };

        records.push(OrbitalElementRecord {
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
        });
    }

    records
}

/// Set keys are substituted into the upstream URL, so only plain identifiers
/// are accepted.
pub fn validate_set(set: &str) -> Result<(), FeedError> {
    let valid = !set.is_empty()
        && set
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(FeedError::InvalidSet(set.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{sample_feed, ISS_LINE1, ISS_LINE2};
    use rstest::rstest;

    #[test]
    fn parses_complete_groups() {
        let records = parse_feed(&sample_feed());
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert_eq!(records[0].line1, ISS_LINE1);
        assert_eq!(records[0].line2, ISS_LINE2);
    }

    #[test]
    fn orphan_name_line_is_dropped() {
        let feed = format!(
            "A\n{ISS_LINE1}\n{ISS_LINE2}\nB\n{ISS_LINE1}\n{ISS_LINE2}\nORPHAN\n"
        );
        let records = parse_feed(&feed);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "B");
    }

    #[test]
    fn truncation_stops_at_first_incomplete_group() {
        let feed = format!("A\n{ISS_LINE1}\n{ISS_LINE2}\nB\n{ISS_LINE1}\n");
        let records = parse_feed(&feed);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn tolerates_blank_lines_and_crlf() {
        let feed = format!("\r\n  ISS (ZARYA)  \r\n\r\n{ISS_LINE1}\r\n{ISS_LINE2}\r\n\r\n");
        let records = parse_feed(&feed);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert_eq!(records[0].line2, ISS_LINE2);
    }

    #[test]
    fn empty_feed_yields_nothing() {
        assert!(parse_feed("").is_empty());
        assert!(parse_feed("\n\n  \n").is_empty());
    }

    #[rstest]
    #[case("active", true)]
    #[case("gps-ops", true)]
    #[case("last_30_days", true)]
    #[case("", false)]
    #[case("../secret", false)]
    #[case("visual.txt", false)]
    #[case("a b", false)]
    fn set_names(#[case] set: &str, #[case] valid: bool) {
        assert_eq!(validate_set(set).is_ok(), valid);
    }
}
