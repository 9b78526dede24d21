//! Rule-based journal entry suggestions.
//!
//! Each rule yields one synthetic entry. Nothing is persisted.

use chrono::NaiveDate;

pub const DEFAULT_MEMO: &str = "auto journal entry";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoJournalRule {
    pub account: Option<String>,
    pub amount: f64,
    pub partner: Option<String>,
    pub condition: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AutoJournalEntry {
    pub date: NaiveDate,
    pub reference: String,
    pub account_name: String,
    pub amount: f64,
    pub partner_name: String,
    pub memo: String,
}

/// One entry per rule, referenced `AUTO0001`, `AUTO0002`, ... in rule order.
pub fn generate(rules: &[AutoJournalRule], today: NaiveDate) -> Vec<AutoJournalEntry> {
    rules
        .iter()
        .enumerate()
        .map(|(idx, rule)| AutoJournalEntry {
            date: today,
            reference: format!("AUTO{:04}", idx + 1),
            account_name: rule.account.clone().unwrap_or_default(),
            amount: rule.amount,
            partner_name: rule.partner.clone().unwrap_or_default(),
            memo: rule
                .condition
                .clone()
                .unwrap_or_else(|| DEFAULT_MEMO.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_follow_rule_order() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let rules = vec![
            AutoJournalRule {
                account: Some("Sales".to_string()),
                amount: 150.5,
                partner: Some("ACME".to_string()),
                condition: Some("monthly subscription".to_string()),
            },
            AutoJournalRule::default(),
        ];

        let entries = generate(&rules, today);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].reference, "AUTO0001");
        assert_eq!(entries[0].account_name, "Sales");
        assert_eq!(entries[0].amount, 150.5);
        assert_eq!(entries[0].memo, "monthly subscription");
        assert_eq!(entries[1].reference, "AUTO0002");
        assert_eq!(entries[1].account_name, "");
        assert_eq!(entries[1].partner_name, "");
        assert_eq!(entries[1].memo, DEFAULT_MEMO);
        assert!(entries.iter().all(|e| e.date == today));
    }

    #[test]
    fn no_rules_no_entries() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        assert!(generate(&[], today).is_empty());
    }
}
