//! Record types shared by the store, the snapshot loader and the aggregators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The minimal purchase view consumed by the pivot aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Purchase amount (negative for refunds/credits)
    pub amount: Decimal,

    /// Cost classification label
    pub category: String,

    /// Construction phase label
    pub stage: String,
}

impl PurchaseRecord {
    pub fn new(amount: Decimal, category: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            stage: stage.into(),
        }
    }
}

/// A purchase row as stored in the `purchases` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,
    pub project_id: i64,
    pub item_name: String,
    pub item_qty: Option<f64>,
    pub unit: Option<String>,
    pub vendor: String,
    pub stage: String,
    pub category: String,
    pub date: NaiveDate,
    pub purchase_amount: Decimal,
    pub mode_of_payment: String,
    pub paid_amount: Decimal,
    pub paid_by: Option<String>,
    pub notes: Option<String>,
}

impl Purchase {
    /// Project this row onto the fields the pivot needs
    pub fn record(&self) -> PurchaseRecord {
        PurchaseRecord::new(self.purchase_amount, &self.category, &self.stage)
    }

    /// Quantity with its unit, e.g. "12 Nos" or "2.50 MT"
    pub fn quantity_label(&self) -> String {
        let unit = self.unit.as_deref().unwrap_or("");
        let whole_units = matches!(self.unit.as_deref(), None | Some("Nos") | Some("Others"));

        let qty = match self.item_qty {
            Some(q) if whole_units => format!("{}", q.trunc() as i64),
            Some(q) => format!("{:.2}", q),
            None => String::new(),
        };

        format!("{} {}", qty, unit).trim().to_string()
    }
}

/// A purchase waiting to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub project_id: i64,
    pub item_name: String,
    pub item_qty: Option<f64>,
    pub unit: Option<String>,
    pub vendor: String,
    pub stage: String,
    pub category: String,
    pub date: NaiveDate,
    pub purchase_amount: Decimal,
    pub mode_of_payment: String,
    pub paid_amount: Decimal,
    pub paid_by: Option<String>,
    pub notes: Option<String>,
}

/// A construction project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

/// One of the two declared report dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Stage,
}

impl Dimension {
    pub fn plural(&self) -> &'static str {
        match self {
            Dimension::Category => "categories",
            Dimension::Stage => "stages",
        }
    }

    /// Pick this dimension's value off a purchase
    pub fn value_of<'a>(&self, purchase: &'a Purchase) -> &'a str {
        match self {
            Dimension::Category => &purchase.category,
            Dimension::Stage => &purchase.stage,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Category => write!(f, "Category"),
            Dimension::Stage => write!(f, "Stage"),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" | "categories" => Ok(Dimension::Category),
            "stage" | "stages" => Ok(Dimension::Stage),
            other => Err(format!("unknown dimension '{}' (expected category or stage)", other)),
        }
    }
}

/// Purchase columns that listings can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseColumn {
    Category,
    Vendor,
    Stage,
    ModeOfPayment,
}

impl PurchaseColumn {
    /// Column name in the `purchases` table
    pub fn column_name(&self) -> &'static str {
        match self {
            PurchaseColumn::Category => "category",
            PurchaseColumn::Vendor => "vendor",
            PurchaseColumn::Stage => "stage",
            PurchaseColumn::ModeOfPayment => "mode_of_payment",
        }
    }
}

impl fmt::Display for PurchaseColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseColumn::Category => write!(f, "Category"),
            PurchaseColumn::Vendor => write!(f, "Vendor"),
            PurchaseColumn::Stage => write!(f, "Stage"),
            PurchaseColumn::ModeOfPayment => write!(f, "Mode of Payment"),
        }
    }
}

impl FromStr for PurchaseColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "category" => Ok(PurchaseColumn::Category),
            "vendor" => Ok(PurchaseColumn::Vendor),
            "stage" => Ok(PurchaseColumn::Stage),
            "mode_of_payment" | "mode" => Ok(PurchaseColumn::ModeOfPayment),
            _ => Err(format!(
                "unknown column '{}' (expected category, vendor, stage or mode-of-payment)",
                s.trim()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(unit: Option<&str>, qty: Option<f64>) -> Purchase {
        Purchase {
            id: 1,
            project_id: 1,
            item_name: "Cement".to_string(),
            item_qty: qty,
            unit: unit.map(str::to_string),
            vendor: "Ramco".to_string(),
            stage: "Basement".to_string(),
            category: "Material".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            purchase_amount: Decimal::from(4500),
            mode_of_payment: "UPI".to_string(),
            paid_amount: Decimal::from(4500),
            paid_by: None,
            notes: None,
        }
    }

    #[test]
    fn test_record_projection() {
        let record = sample(None, None).record();
        assert_eq!(record, PurchaseRecord::new(Decimal::from(4500), "Material", "Basement"));
    }

    #[test]
    fn test_quantity_label_whole_units() {
        assert_eq!(sample(Some("Nos"), Some(12.0)).quantity_label(), "12 Nos");
        assert_eq!(sample(None, Some(3.7)).quantity_label(), "3");
    }

    #[test]
    fn test_quantity_label_fractional_units() {
        assert_eq!(sample(Some("MT"), Some(2.5)).quantity_label(), "2.50 MT");
        assert_eq!(sample(Some("Kg"), None).quantity_label(), "Kg");
    }

    #[test]
    fn test_dimension_from_str() {
        assert_eq!("Category".parse::<Dimension>(), Ok(Dimension::Category));
        assert_eq!(" stages ".parse::<Dimension>(), Ok(Dimension::Stage));
        assert!("vendor".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_purchase_column_from_str() {
        assert_eq!("Vendor".parse::<PurchaseColumn>(), Ok(PurchaseColumn::Vendor));
        assert_eq!(
            "mode-of-payment".parse::<PurchaseColumn>(),
            Ok(PurchaseColumn::ModeOfPayment)
        );
        assert_eq!(
            "Mode of Payment".parse::<PurchaseColumn>(),
            Ok(PurchaseColumn::ModeOfPayment)
        );
        assert!("notes".parse::<PurchaseColumn>().is_err());
        assert_eq!(PurchaseColumn::ModeOfPayment.column_name(), "mode_of_payment");
    }
}
