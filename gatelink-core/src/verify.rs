use crate::flight_code::FlightCode;

/// Result of comparing a freshly scanned code against the session's code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Nothing scannable survived normalization.
    Empty,
    /// The scan names the session's flight; boarding may proceed.
    Match,
    /// The scan names a different flight; both canonical forms are carried
    /// so the caller can show the operator what was read vs expected.
    Mismatch { scanned: String, expected: String },
}

/// Compare a raw scan against the session's bound flight code.
///
/// Pure function: no store access, no state. What a `Match` authorizes is
/// the caller's decision; manual and scan-confirmed boarding both end up in
/// the same roster append, distinguished only by their source tag.
pub fn verify(scanned_raw: &str, expected: &FlightCode) -> ScanOutcome {
    let scanned = FlightCode::normalize(scanned_raw);
    if scanned.is_empty() {
        return ScanOutcome::Empty;
    }
    if scanned == expected.as_str() {
        ScanOutcome::Match
    } else {
        ScanOutcome::Mismatch {
            scanned,
            expected: expected.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> FlightCode {
        FlightCode::parse(raw).unwrap()
    }

    #[test]
    fn test_matching_scan() {
        assert_eq!(verify("BA0679", &code("BA679")), ScanOutcome::Match);
        assert_eq!(verify(" ba 679 ", &code("BA679")), ScanOutcome::Match);
    }

    #[test]
    fn test_mismatching_scan_carries_both_codes() {
        assert_eq!(
            verify("LH100", &code("BA679")),
            ScanOutcome::Mismatch {
                scanned: "LH100".to_string(),
                expected: "BA679".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_scan() {
        assert_eq!(verify("", &code("BA679")), ScanOutcome::Empty);
        assert_eq!(verify("  #@!  ", &code("BA679")), ScanOutcome::Empty);
    }
}
