//! Shipper/consignee resolution and recipient gating.

use crate::decode::TextLine;
use crate::models::config::RecipientRule;

/// Parties resolved from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parties {
    pub shipper: Option<String>,
    pub consignee: Option<String>,
}

/// Parties plus whether the recipient passed the profile's gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub parties: Parties,
    pub accepted: bool,
}

impl Resolution {
    fn accepted(parties: Parties) -> Self {
        Self {
            parties,
            accepted: true,
        }
    }
}

/// Resolve parties according to `rule`.
///
/// `party_marker` names the line preceding the combined shipper/consignee
/// line; it is only consulted by allow-list resolution.
pub fn resolve_parties(rule: &RecipientRule, party_marker: &str, lines: &[TextLine]) -> Resolution {
    match rule {
        RecipientRule::Disabled => Resolution::accepted(Parties::default()),

        RecipientRule::Required { name } => {
            let present = lines.iter().any(|line| line.text.contains(name.as_str()));
            Resolution {
                parties: Parties {
                    shipper: None,
                    consignee: present.then(|| name.clone()),
                },
                accepted: present,
            }
        }

        RecipientRule::AllowList { names, expected } => {
            let parties = split_party_line(party_marker, names, lines);
            let accepted = match expected {
                Some(expected) => parties.consignee.as_deref() == Some(expected.as_str()),
                None => true,
            };
            Resolution { parties, accepted }
        }
    }
}

/// Split the line after `party_marker` into shipper and consignee.
///
/// Suffixes of the whitespace-separated tokens are tested shortest first;
/// the first one in `names` becomes the consignee and the remaining prefix
/// the shipper. Without a match the whole line is the shipper.
fn split_party_line(party_marker: &str, names: &[String], lines: &[TextLine]) -> Parties {
    let Some(marker_idx) = lines.iter().position(|l| l.text.contains(party_marker)) else {
        return Parties::default();
    };
    let Some(names_line) = lines.get(marker_idx + 1) else {
        return Parties::default();
    };

    let tokens: Vec<&str> = names_line.text.split_whitespace().collect();
    for start in (0..tokens.len()).rev() {
        let candidate = tokens[start..].join(" ");
        if names.iter().any(|n| *n == candidate) {
            let shipper = tokens[..start].join(" ");
            return Parties {
                shipper: Some(shipper),
                consignee: Some(candidate),
            };
        }
    }

    Parties {
        shipper: Some(names_line.text.trim().to_string()),
        consignee: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn allow_list(expected: Option<&str>) -> RecipientRule {
        RecipientRule::AllowList {
            names: vec![
                "D H TRADING GROUP SPC CO".to_string(),
                "INDITEX S.A.".to_string(),
            ],
            expected: expected.map(str::to_string),
        }
    }

    #[test]
    fn test_allow_list_split() {
        let lines = TextLine::numbered([
            "SHIPPER CONSIGNEE",
            "ACME LOGISTICS LLC D H TRADING GROUP SPC CO",
        ]);

        let resolution = resolve_parties(&allow_list(None), "SHIPPER CONSIGNEE", &lines);
        assert!(resolution.accepted);
        assert_eq!(
            resolution.parties,
            Parties {
                shipper: Some("ACME LOGISTICS LLC".to_string()),
                consignee: Some("D H TRADING GROUP SPC CO".to_string()),
            }
        );
    }

    #[test]
    fn test_allow_list_no_match_keeps_whole_line() {
        let lines = TextLine::numbered(["SHIPPER CONSIGNEE", "ACME LLC SOMEONE ELSE"]);

        let resolution = resolve_parties(&allow_list(None), "SHIPPER CONSIGNEE", &lines);
        assert!(resolution.accepted);
        assert_eq!(resolution.parties.shipper.as_deref(), Some("ACME LLC SOMEONE ELSE"));
        assert_eq!(resolution.parties.consignee, None);
    }

    #[test]
    fn test_allow_list_expected_consignee() {
        let lines = TextLine::numbered(["SHIPPER CONSIGNEE", "ACME LLC INDITEX S.A."]);

        let rejected = resolve_parties(
            &allow_list(Some("D H TRADING GROUP SPC CO")),
            "SHIPPER CONSIGNEE",
            &lines,
        );
        assert!(!rejected.accepted);

        let accepted = resolve_parties(&allow_list(Some("INDITEX S.A.")), "SHIPPER CONSIGNEE", &lines);
        assert!(accepted.accepted);
    }

    #[test]
    fn test_missing_marker_or_next_line() {
        let none = resolve_parties(&allow_list(None), "SHIPPER CONSIGNEE", &TextLine::numbered(["x"]));
        assert_eq!(none.parties, Parties::default());

        let last = TextLine::numbered(["header", "SHIPPER CONSIGNEE"]);
        let none = resolve_parties(&allow_list(None), "SHIPPER CONSIGNEE", &last);
        assert_eq!(none.parties, Parties::default());
    }

    #[test]
    fn test_required_literal() {
        let rule = RecipientRule::Required {
            name: "D H TRADING GROUP SPC CO".to_string(),
        };

        let lines = TextLine::numbered(["Bill to: D H TRADING GROUP SPC CO, Dubai"]);
        let found = resolve_parties(&rule, "SHIPPER CONSIGNEE", &lines);
        assert!(found.accepted);
        assert_eq!(found.parties.consignee.as_deref(), Some("D H TRADING GROUP SPC CO"));

        let lines = TextLine::numbered(["Bill to: someone else"]);
        let missing = resolve_parties(&rule, "SHIPPER CONSIGNEE", &lines);
        assert!(!missing.accepted);
        assert_eq!(missing.parties.consignee, None);
    }

    #[test]
    fn test_disabled_produces_no_parties() {
        let lines = TextLine::numbered(["SHIPPER CONSIGNEE", "A B"]);
        let resolution = resolve_parties(&RecipientRule::Disabled, "SHIPPER CONSIGNEE", &lines);
        assert!(resolution.accepted);
        assert_eq!(resolution.parties, Parties::default());
    }
}
