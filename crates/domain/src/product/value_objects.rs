//! Value objects for the product domain.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Display name of a product: non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 255;

    /// Creates a validated product name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let length = name.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ValidationError::NameTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProductName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductName> for String {
    fn from(name: ProductName) -> Self {
        name.0
    }
}

/// Non-negative, finite price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ProductPrice(f64);

impl ProductPrice {
    /// Creates a validated price.
    pub fn new(price: f64) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFinitePrice);
        }
        if price < 0.0 {
            return Err(ValidationError::NegativePrice { price });
        }
        Ok(Self(price))
    }

    /// Returns a zero price.
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Returns the amount.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for ProductPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for ProductPrice {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductPrice> for f64 {
    fn from(price: ProductPrice) -> Self {
        price.0
    }
}

/// Non-negative quantity on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ProductStock(i64);

impl ProductStock {
    /// Creates a validated stock quantity.
    pub fn new(stock: i64) -> Result<Self, ValidationError> {
        if stock < 0 {
            return Err(ValidationError::NegativeStock { stock });
        }
        Ok(Self(stock))
    }

    /// Returns an empty stock.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the quantity.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns true if at least `quantity` units are on hand.
    pub fn covers(&self, quantity: u32) -> bool {
        self.0 >= i64::from(quantity)
    }

    /// Returns the stock after adding `quantity` units.
    pub fn increase(self, quantity: u32) -> Result<Self, ValidationError> {
        self.0
            .checked_add(i64::from(quantity))
            .map(Self)
            .ok_or(ValidationError::StockOverflow {
                current: self.0,
                quantity,
            })
    }

    /// Returns the stock after removing `quantity` units, or None if fewer are
    /// on hand.
    pub fn reduce(self, quantity: u32) -> Option<Self> {
        if !self.covers(quantity) {
            return None;
        }
        Some(Self(self.0 - i64::from(quantity)))
    }
}

impl std::fmt::Display for ProductStock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ProductStock {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductStock> for i64 {
    fn from(stock: ProductStock) -> Self {
        stock.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rejects_empty() {
        assert_eq!(ProductName::new(""), Err(ValidationError::EmptyName));
    }

    #[test]
    fn name_counts_characters_not_bytes() {
        let name = "é".repeat(255);
        assert!(name.len() > 255);
        assert!(ProductName::new(name).is_ok());

        let result = ProductName::new("é".repeat(256));
        assert_eq!(
            result,
            Err(ValidationError::NameTooLong {
                length: 256,
                max: 255
            })
        );
    }

    #[test]
    fn price_rejects_non_finite() {
        assert_eq!(
            ProductPrice::new(f64::NAN),
            Err(ValidationError::NonFinitePrice)
        );
        assert_eq!(
            ProductPrice::new(f64::INFINITY),
            Err(ValidationError::NonFinitePrice)
        );
    }

    #[test]
    fn price_display_uses_two_decimals() {
        assert_eq!(ProductPrice::new(9.5).unwrap().to_string(), "9.50");
    }

    #[test]
    fn stock_reduce_and_increase() {
        let stock = ProductStock::new(5).unwrap();
        assert_eq!(stock.reduce(3), Some(ProductStock::new(2).unwrap()));
        assert_eq!(stock.reduce(5), Some(ProductStock::zero()));
        assert_eq!(stock.reduce(6), None);
        assert_eq!(stock.increase(10).unwrap().value(), 15);
    }

    #[test]
    fn stock_increase_overflow_is_rejected() {
        let stock = ProductStock::new(i64::MAX).unwrap();
        assert_eq!(
            stock.increase(1),
            Err(ValidationError::StockOverflow {
                current: i64::MAX,
                quantity: 1
            })
        );
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<ProductPrice>("-1.0").is_err());
        assert!(serde_json::from_str::<ProductStock>("-3").is_err());
        assert!(serde_json::from_str::<ProductName>("\"\"").is_err());
        assert_eq!(
            serde_json::from_str::<ProductStock>("7").unwrap(),
            ProductStock::new(7).unwrap()
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every non-negative price round-trips.
            #[test]
            fn price_roundtrips(p in 0.0f64..1.0e12) {
                prop_assert_eq!(ProductPrice::new(p).unwrap().value(), p);
            }

            /// Property: every negative price is rejected.
            #[test]
            fn negative_price_rejected(p in -1.0e12f64..-f64::MIN_POSITIVE) {
                prop_assert_eq!(
                    ProductPrice::new(p),
                    Err(ValidationError::NegativePrice { price: p })
                );
            }

            /// Property: every non-negative stock round-trips.
            #[test]
            fn stock_roundtrips(s in 0i64..=i64::MAX) {
                prop_assert_eq!(ProductStock::new(s).unwrap().value(), s);
            }

            /// Property: every negative stock is rejected.
            #[test]
            fn negative_stock_rejected(s in i64::MIN..0i64) {
                prop_assert_eq!(
                    ProductStock::new(s),
                    Err(ValidationError::NegativeStock { stock: s })
                );
            }

            /// Property: non-empty names up to 255 characters round-trip.
            #[test]
            fn name_roundtrips(name in "\\PC{1,255}") {
                let product_name = ProductName::new(name.clone()).unwrap();
                prop_assert_eq!(product_name.value(), name.as_str());
            }

            /// Property: reducing by at most the stock on hand subtracts exactly.
            #[test]
            fn reduce_subtracts(current in 0i64..1_000_000, q in 0u32..1_000_000) {
                let stock = ProductStock::new(current).unwrap();
                match stock.reduce(q) {
                    Some(next) => {
                        prop_assert!(i64::from(q) <= current);
                        prop_assert_eq!(next.value(), current - i64::from(q));
                    }
                    None => prop_assert!(i64::from(q) > current),
                }
            }

            /// Property: increasing adds exactly.
            #[test]
            fn increase_adds(current in 0i64..1_000_000_000, q in any::<u32>()) {
                let stock = ProductStock::new(current).unwrap();
                prop_assert_eq!(stock.increase(q).unwrap().value(), current + i64::from(q));
            }
        }
    }
}
