//! Sales
//!
//! Sale records are immutable snapshots of a completed checkout. Dates are
//! stored the way the shop's locale writes them (`d/m/yyyy`), so the raw text
//! is kept and parsed only when ordering or grouping.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
};

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rustc_hash::FxHashMap;

use crate::{
    cart::Cart,
    ids::TypedId,
    money::{self, Price},
};

/// Sale Id
pub type SaleId = TypedId<SaleRecord>;

/// One purchased product inside a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

/// Locale-formatted sale date (`d/m/yyyy`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaleDate(String);

impl SaleDate {
    /// Wrap a stored date string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Format a calendar date without zero padding, e.g. `5/3/2025`.
    pub fn from_date(date: Date) -> Self {
        Self(format!("{}/{}/{}", date.day(), date.month(), date.year()))
    }

    /// Today's date in the given time zone.
    pub fn today_in(time_zone: &TimeZone) -> Self {
        Self::from_date(Timestamp::now().to_zoned(time_zone.clone()).date())
    }

    /// Raw stored text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no date was stored.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parse `d/m/yyyy`; `None` when the text is not a valid date.
    pub fn parse(&self) -> Option<Date> {
        let mut parts = self.0.trim().split('/');

        let day = parts.next()?.trim().parse::<i8>().ok()?;
        let month = parts.next()?.trim().parse::<i8>().ok()?;
        let year = parts.next()?.trim().parse::<i16>().ok()?;

        if parts.next().is_some() {
            return None;
        }

        Date::new(year, month, day).ok()
    }
}

impl Display for SaleDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// A sale about to be appended to the sales collection.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub lines: Vec<SaleLine>,
    pub total: Price,
    pub date: SaleDate,
}

impl NewSale {
    /// Snapshot the cart as a sale dated `date`.
    pub fn from_cart(cart: &Cart, date: SaleDate) -> Self {
        let lines = cart.sale_lines();
        let total = lines_total(&lines);

        Self { lines, total, date }
    }
}

/// Sale Record
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub id: SaleId,
    pub lines: Vec<SaleLine>,
    pub total: Price,
    pub date: SaleDate,
}

impl SaleRecord {
    /// Units sold across all lines.
    pub fn units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn is_listable(&self) -> bool {
        !self.lines.is_empty() && self.total.to_minor_units() > 0 && !self.date.is_empty()
    }
}

/// Sum of unit price × quantity.
pub fn lines_total(lines: &[SaleLine]) -> Price {
    let minor = lines.iter().fold(0_i64, |acc, line| {
        acc.saturating_add(
            line.unit_price
                .to_minor_units()
                .saturating_mul(i64::from(line.quantity)),
        )
    });

    money::from_minor(minor)
}

/// Records worth showing in the sales listing, newest first.
///
/// Records without lines, with a zero total or without a date are dropped.
/// Records whose date cannot be parsed sort after every dated record; ties
/// keep their feed order.
pub fn sales_listing(records: &[SaleRecord]) -> Vec<SaleRecord> {
    let mut listed: Vec<(Option<Date>, &SaleRecord)> = records
        .iter()
        .filter(|record| record.is_listable())
        .map(|record| (record.date.parse(), record))
        .collect();

    listed.sort_by(|(left, _), (right, _)| match (left, right) {
        (Some(left), Some(right)) => right.cmp(left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    listed
        .into_iter()
        .map(|(_, record)| record.clone())
        .collect()
}

/// Units sold of one product on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUnits {
    pub name: String,
    pub units: u64,
}

/// What was sold on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: Date,
    pub sales: usize,
    pub units: u64,
    pub revenue: Price,

    /// Units per product, most sold first.
    pub products: Vec<ProductUnits>,
}

impl DailySummary {
    /// Summarise the listable records dated `date`.
    pub fn for_date(records: &[SaleRecord], date: Date) -> Self {
        let mut sales = 0;
        let mut revenue_minor = 0_i64;
        let mut units_by_product: FxHashMap<&str, u64> = FxHashMap::default();

        for record in records
            .iter()
            .filter(|record| record.is_listable() && record.date.parse() == Some(date))
        {
            sales += 1;
            revenue_minor = revenue_minor.saturating_add(record.total.to_minor_units());

            for line in &record.lines {
                *units_by_product.entry(line.name.as_str()).or_default() +=
                    u64::from(line.quantity);
            }
        }

        let mut products: Vec<ProductUnits> = units_by_product
            .into_iter()
            .map(|(name, units)| ProductUnits {
                name: name.to_string(),
                units,
            })
            .collect();

        products.sort_by(|left, right| {
            right
                .units
                .cmp(&left.units)
                .then_with(|| left.name.cmp(&right.name))
        });

        Self {
            date,
            sales,
            units: products.iter().map(|product| product.units).sum(),
            revenue: money::from_minor(revenue_minor),
            products,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::fixtures::product;

    use super::*;

    fn record(id: &str, total_minor: i64, date: &str) -> SaleRecord {
        SaleRecord {
            id: SaleId::from(id),
            lines: vec![SaleLine {
                name: "Cortado".to_string(),
                quantity: 1,
                unit_price: money::from_minor(total_minor),
            }],
            total: money::from_minor(total_minor),
            date: SaleDate::new(date),
        }
    }

    #[test]
    fn parses_locale_dates() {
        assert_eq!(SaleDate::new("5/3/2025").parse(), Some(date(2025, 3, 5)));
        assert_eq!(SaleDate::new("16/10/2026").parse(), Some(date(2026, 10, 16)));
        assert_eq!(SaleDate::new("31/2/2025").parse(), None);
        assert_eq!(SaleDate::new("2025-03-05").parse(), None);
        assert_eq!(SaleDate::new("1/2/3/4").parse(), None);
    }

    #[test]
    fn from_date_is_unpadded() {
        assert_eq!(SaleDate::from_date(date(2025, 3, 5)).as_str(), "5/3/2025");
    }

    #[test]
    fn listing_filters_and_sorts_newest_first() {
        let records = [
            record("old", 500, "1/2/2025"),
            record("zero", 0, "3/2/2025"),
            record("undated", 300, ""),
            record("new", 700, "10/2/2025"),
            record("mid", 200, "2/2/2025"),
        ];

        let ids: Vec<String> = sales_listing(&records)
            .into_iter()
            .map(|r| r.id.into_string())
            .collect();

        assert_eq!(ids, ["new", "mid", "old"]);
    }

    #[test]
    fn listing_drops_records_without_lines() {
        let mut empty = record("empty", 500, "1/2/2025");
        empty.lines.clear();

        assert!(sales_listing(&[empty]).is_empty());
    }

    #[test]
    fn unparseable_dates_sort_last_in_feed_order() {
        let records = [
            record("garbled-1", 100, "someday"),
            record("dated", 100, "1/1/2024"),
            record("garbled-2", 100, "tomorrow"),
        ];

        let ids: Vec<String> = sales_listing(&records)
            .into_iter()
            .map(|r| r.id.into_string())
            .collect();

        assert_eq!(ids, ["dated", "garbled-1", "garbled-2"]);
    }

    #[test]
    fn new_sale_from_cart_totals_lines() {
        let mut cart = Cart::new();

        cart.add_item(&product("a", "Chocotorta", 350));
        cart.add_item(&product("a", "Chocotorta", 350));
        cart.add_item(&product("b", "Cortado", 200));

        let sale = NewSale::from_cart(&cart, SaleDate::new("1/1/2025"));

        assert_eq!(sale.lines.len(), 2);
        assert_eq!(sale.total, money::from_minor(900));
    }

    #[test]
    fn daily_summary_aggregates_one_day() -> TestResult {
        let mut big = record("b", 900, "2/2/2025");
        big.lines = vec![
            SaleLine {
                name: "Chocotorta".to_string(),
                quantity: 2,
                unit_price: money::from_minor(350),
            },
            SaleLine {
                name: "Cortado".to_string(),
                quantity: 1,
                unit_price: money::from_minor(200),
            },
        ];

        let records = [record("a", 200, "2/2/2025"), big, record("c", 999, "3/2/2025")];

        let summary = DailySummary::for_date(&records, "2025-02-02".parse()?);

        assert_eq!(summary.sales, 2);
        assert_eq!(summary.units, 4);
        assert_eq!(summary.revenue, money::from_minor(1100));
        assert_eq!(
            summary.products,
            [
                ProductUnits {
                    name: "Chocotorta".to_string(),
                    units: 2
                },
                ProductUnits {
                    name: "Cortado".to_string(),
                    units: 2
                },
            ]
        );

        Ok(())
    }
}
