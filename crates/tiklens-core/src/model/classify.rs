// ── Display classification for free-form rule fields ──
//
// Chains and actions stay plain strings on the wire model. These enums
// only pick a presentation class; unknown values map to `Other` and the
// original string is always what gets shown.

use serde::Serialize;

use tiklens_api::FirewallRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChainKind {
    Input,
    Forward,
    Output,
    Other,
}

impl ChainKind {
    pub fn classify(chain: &str) -> Self {
        match chain {
            "input" => Self::Input,
            "forward" => Self::Forward,
            "output" => Self::Output,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    Accept,
    Drop,
    Reject,
    Return,
    Other,
}

impl ActionKind {
    pub fn classify(action: &str) -> Self {
        match action {
            "accept" => Self::Accept,
            "drop" => Self::Drop,
            "reject" => Self::Reject,
            "return" => Self::Return,
            _ => Self::Other,
        }
    }
}

/// Address-list references of a rule, labelled by match position.
pub fn list_bindings(rule: &FirewallRule) -> Vec<(&'static str, &str)> {
    [
        ("any", rule.address_list.as_deref()),
        ("src", rule.src_address_list.as_deref()),
        ("dst", rule.dst_address_list.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, list)| list.filter(|l| !l.is_empty()).map(|l| (label, l)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_classify() {
        assert_eq!(ChainKind::classify("forward"), ChainKind::Forward);
        assert_eq!(ActionKind::classify("reject"), ActionKind::Reject);
    }

    #[test]
    fn unknown_values_fall_back_to_other() {
        assert_eq!(ChainKind::classify("srcnat"), ChainKind::Other);
        assert_eq!(ChainKind::classify("Input"), ChainKind::Other);
        assert_eq!(ActionKind::classify("fasttrack-connection"), ActionKind::Other);
    }

    #[test]
    fn bindings_skip_empty_lists() {
        let mut rule = FirewallRule::new("*1", "input", "drop");
        rule.src_address_list = Some("blacklist".into());
        rule.dst_address_list = Some(String::new());

        assert_eq!(list_bindings(&rule), vec![("src", "blacklist")]);
    }
}
