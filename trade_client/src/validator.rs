//! Response validation against an expected server-side transform.
//!
//! The transform is supplied through [`Expectation`] so that the client stays
//! independent of any particular server. [`EchoTransform`] describes the
//! reference server: price scaled by `1.01`, quantity doubled.
use serde::Serialize;
use trade_common::TradeMessage;

/// Largest absolute price difference still considered a match (exclusive).
pub const PRICE_TOLERANCE: f64 = 1e-4;

/// Values the response is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Expected {
    /// Expected price.
    pub price: f64,
    /// Expected quantity; wider than the wire field so scaling cannot overflow.
    pub quantity: i64,
}

/// Computes what a correct response to `request` looks like.
pub trait Expectation {
    /// Returns the expected response values for `request`.
    fn expect(&self, request: &TradeMessage) -> Expected;
}

impl<F> Expectation for F
where
    F: Fn(&TradeMessage) -> Expected,
{
    fn expect(&self, request: &TradeMessage) -> Expected {
        self(request)
    }
}

/// Multiplicative echo transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoTransform {
    /// Factor applied to the price.
    pub price_factor: f64,
    /// Factor applied to the quantity.
    pub quantity_factor: i64,
}

impl Default for EchoTransform {
    fn default() -> Self {
        EchoTransform {
            price_factor: 1.01,
            quantity_factor: 2,
        }
    }
}

impl Expectation for EchoTransform {
    fn expect(&self, request: &TradeMessage) -> Expected {
        Expected {
            price: request.price * self.price_factor,
            quantity: i64::from(request.quantity).saturating_mul(self.quantity_factor),
        }
    }
}

/// Result of comparing a response with its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Validation {
    /// Price the expectation asked for.
    pub expected_price: f64,
    /// Price found in the response.
    pub actual_price: f64,
    /// Quantity the expectation asked for.
    pub expected_quantity: i64,
    /// Quantity found in the response.
    pub actual_quantity: i32,
    /// Price within tolerance.
    pub price_match: bool,
    /// Quantity exactly equal.
    pub quantity_match: bool,
}

impl Validation {
    /// Both fields matched.
    pub fn passed(&self) -> bool {
        self.price_match && self.quantity_match
    }
}

/// Stateless comparator of request/response pairs.
#[derive(Debug, Clone)]
pub struct Validator<E = EchoTransform> {
    expectation: E,
    tolerance: f64,
}

impl Default for Validator<EchoTransform> {
    fn default() -> Self {
        Validator::new(EchoTransform::default())
    }
}

impl<E: Expectation> Validator<E> {
    /// Validator using `expectation` and the default price tolerance.
    pub fn new(expectation: E) -> Self {
        Validator {
            expectation,
            tolerance: PRICE_TOLERANCE,
        }
    }

    /// Overrides the price tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Compares `response` with what `request` should have produced.
    pub fn validate(&self, request: &TradeMessage, response: &TradeMessage) -> Validation {
        let expected = self.expectation.expect(request);
        Validation {
            expected_price: expected.price,
            actual_price: response.price,
            expected_quantity: expected.quantity,
            actual_quantity: response.quantity,
            price_match: (response.price - expected.price).abs() < self.tolerance,
            quantity_match: i64::from(response.quantity) == expected.quantity,
        }
    }
}
