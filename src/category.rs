//! The catalog of mobile-money transaction categories.
//!
//! Every transaction belongs to exactly one [Category]. The backend stores
//! categories as snake_case keys, e.g. "incoming_money", and the dashboard
//! displays them with a human-readable label, e.g. "Incoming Money".
//!
//! Unrecognised keys coming from the data source are never an error, they
//! are coerced to [Category::Uncategorized]. Only user supplied filter input
//! is parsed strictly (see [Category::from_str]).

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::Error;

/// The type of a mobile-money transaction.
///
/// The variants are declared in catalog order, which is also the order used
/// to break ties when sorting aggregates and to populate the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Money received from another subscriber.
    IncomingMoney,
    /// Payments made to merchant code holders.
    PaymentsToCodeHolders,
    /// Transfers sent to other mobile numbers.
    TransfersToMobileNumbers,
    /// Deposits made from a bank account into the wallet.
    BankDeposits,
    /// Airtime and bill payments.
    AirtimeBillPayments,
    /// Prepaid electricity purchases.
    CashPower,
    /// Cash withdrawals at an agent.
    Withdrawal,
    /// Transfers out of the wallet to a bank account.
    BankTransfer,
    /// Internet and voice bundle purchases.
    Pack,
    /// Transactions initiated by a third party.
    ThirdParty,
    /// Anything that could not be categorised.
    Uncategorized,
}

/// The label used for [Category::Uncategorized] and for any unknown key.
pub const UNCATEGORIZED_LABEL: &str = "No category";

impl Category {
    /// Every category in catalog order.
    pub const ALL: [Category; 11] = [
        Category::IncomingMoney,
        Category::PaymentsToCodeHolders,
        Category::TransfersToMobileNumbers,
        Category::BankDeposits,
        Category::AirtimeBillPayments,
        Category::CashPower,
        Category::Withdrawal,
        Category::BankTransfer,
        Category::Pack,
        Category::ThirdParty,
        Category::Uncategorized,
    ];

    /// The categories that count as incoming funds in the deposits vs.
    /// payments split.
    pub const DEPOSITS: [Category; 2] = [Category::IncomingMoney, Category::BankDeposits];

    /// The key used by the backend for this category.
    pub fn key(self) -> &'static str {
        match self {
            Category::IncomingMoney => "incoming_money",
            Category::PaymentsToCodeHolders => "payments_to_code_holders",
            Category::TransfersToMobileNumbers => "transfers_to_mobile_numbers",
            Category::BankDeposits => "bank_deposits",
            Category::AirtimeBillPayments => "airtime_bill_payments",
            Category::CashPower => "cash_power",
            Category::Withdrawal => "withdrawal",
            Category::BankTransfer => "bank_transfer",
            Category::Pack => "pack",
            Category::ThirdParty => "third_party",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// The human-readable label for this category.
    pub fn label(self) -> &'static str {
        match self {
            Category::IncomingMoney => "Incoming Money",
            Category::PaymentsToCodeHolders => "Payments to Code Holders",
            Category::TransfersToMobileNumbers => "Transfer to Mobile Numbers",
            Category::BankDeposits => "Bank Deposits",
            Category::AirtimeBillPayments => "Airtime Purchase",
            Category::CashPower => "Cash Power",
            Category::Withdrawal => "Withdrawal",
            Category::BankTransfer => "Bank Transfer",
            Category::Pack => "Internet and Voice Bundle Purchases",
            Category::ThirdParty => "Third Party",
            Category::Uncategorized => UNCATEGORIZED_LABEL,
        }
    }

    /// Look up a category by its backend key.
    ///
    /// Unknown keys resolve to [Category::Uncategorized].
    pub fn from_key(key: &str) -> Self {
        Self::lookup(key).unwrap_or(Category::Uncategorized)
    }

    /// Whether this category counts as a deposit.
    pub fn is_deposit(self) -> bool {
        Self::DEPOSITS.contains(&self)
    }

    /// The position of this category in [Category::ALL].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    fn lookup(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

/// Get the display label for a category key, falling back to
/// [UNCATEGORIZED_LABEL] for keys that are not in the catalog.
pub fn label_for_key(key: &str) -> &'static str {
    Category::from_key(key).label()
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category key strictly, rejecting keys that are not in the catalog.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Self::lookup(key).ok_or_else(|| Error::InvalidFilter(format!("unknown category \"{key}\"")))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::Error;

    use super::{Category, UNCATEGORIZED_LABEL, label_for_key};

    #[test]
    fn keys_round_trip_through_lookup() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), category);
        }
    }

    #[test]
    fn catalog_order_matches_index() {
        for (index, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(category.index(), index);
        }
    }

    #[test]
    fn unknown_key_resolves_to_uncategorized() {
        assert_eq!(Category::from_key("lottery"), Category::Uncategorized);
        assert_eq!(Category::from_key(""), Category::Uncategorized);
        assert_eq!(label_for_key("lottery"), UNCATEGORIZED_LABEL);
    }

    #[test]
    fn labels_are_unique() {
        let labels: HashSet<_> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), Category::ALL.len());
    }

    #[test]
    fn only_incoming_money_and_bank_deposits_are_deposits() {
        let deposits: Vec<_> = Category::ALL
            .into_iter()
            .filter(|category| category.is_deposit())
            .collect();

        assert_eq!(
            deposits,
            vec![Category::IncomingMoney, Category::BankDeposits]
        );
    }

    #[test]
    fn from_str_rejects_unknown_keys() {
        assert_eq!("withdrawal".parse::<Category>(), Ok(Category::Withdrawal));
        assert!(matches!(
            "Withdrawal".parse::<Category>(),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn serializes_as_key() {
        let json = serde_json::to_string(&Category::BankDeposits).unwrap();
        assert_eq!(json, "\"bank_deposits\"");
    }
}
