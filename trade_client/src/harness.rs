//! End-to-end check: send one trade, decode the reply, validate it.
use crate::client::FramingClient;
use crate::connector::Connector;
use crate::validator::{Expectation, Validation, Validator};
use log::{debug, info, warn};
use serde::Serialize;
use strum_macros::Display;
use trade_common::{Result, TradeMessage};

/// What a single exchange produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The server answered with something other than `200 OK`.
    Rejected {
        /// Full status line as received.
        status_line: String,
    },
    /// The server answered `200 OK` and the body was decoded and compared.
    Validated {
        /// Decoded response trade.
        response: TradeMessage,
        /// Comparison with the expectation.
        validation: Validation,
    },
}

impl Outcome {
    /// True only for a validated response whose fields all matched.
    pub fn passed(&self) -> bool {
        match self {
            Outcome::Rejected { .. } => false,
            Outcome::Validated { validation, .. } => validation.passed(),
        }
    }

    /// Pass/fail summary.
    pub fn verdict(&self) -> Verdict {
        if self.passed() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// Overall pass/fail flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verdict {
    #[allow(missing_docs)]
    Pass,
    #[allow(missing_docs)]
    Fail,
}

/// Machine-readable summary printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Pass/fail flag.
    pub verdict: Verdict,
    /// Trade that was sent.
    pub request: TradeMessage,
    /// What came back.
    pub outcome: Outcome,
}

impl Report {
    /// Builds a report for `request` and its `outcome`.
    pub fn new(request: TradeMessage, outcome: Outcome) -> Self {
        Report {
            verdict: outcome.verdict(),
            request,
            outcome,
        }
    }
}

/// Performs one exchange and validates the answer.
///
/// A non-`200 OK` status skips decoding and validation. A body shorter than a
/// trade message fails with `TruncatedMessage`.
pub fn run<C: Connector, E: Expectation>(
    client: &FramingClient<C>,
    validator: &Validator<E>,
    request: &TradeMessage,
) -> Result<Outcome> {
    let response = client.exchange(request)?;
    let status_line = response.status_line().to_string();

    if !response.is_ok() {
        warn!(
            "Request failed, status: {}",
            response.status_code().unwrap_or("<none>")
        );
        return Ok(Outcome::Rejected { status_line });
    }

    info!("Request succeeded: {}", status_line);
    debug!("Response head:\n{}", response.head.trim_end());
    info!("Response body: {} bytes", response.body.len());

    let decoded = TradeMessage::decode(&response.body)?;
    info!(
        "Decoded trade: id={} symbol={} price={:.2} quantity={}",
        decoded.trade_id,
        decoded.symbol_char(),
        decoded.price,
        decoded.quantity
    );

    let validation = validator.validate(request, &decoded);
    info!(
        "Price check: {} (expected {:.2}, actual {:.2})",
        pass_fail(validation.price_match),
        validation.expected_price,
        validation.actual_price
    );
    info!(
        "Quantity check: {} (expected {}, actual {})",
        pass_fail(validation.quantity_match),
        validation.expected_quantity,
        validation.actual_quantity
    );

    Ok(Outcome::Validated {
        response: decoded,
        validation,
    })
}

fn pass_fail(ok: bool) -> Verdict {
    if ok { Verdict::Pass } else { Verdict::Fail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::EchoTransform;

    #[test]
    fn rejected_never_passes() {
        let outcome = Outcome::Rejected {
            status_line: "HTTP/1.1 500 Internal Server Error".into(),
        };
        assert!(!outcome.passed());
        assert_eq!(outcome.verdict(), Verdict::Fail);
    }

    #[test]
    fn report_serializes_verdict_and_kind() {
        let request = TradeMessage::new(12345, b'A', 99.5, 1000);
        let response = TradeMessage::new(12345, b'A', 100.495, 2000);
        let validation = Validator::new(EchoTransform::default()).validate(&request, &response);
        let report = Report::new(request, Outcome::Validated { response, validation });

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "pass");
        assert_eq!(json["outcome"]["kind"], "validated");
        assert_eq!(json["outcome"]["response"]["quantity"], 2000);
        assert_eq!(json["request"]["symbol"], 65);
        assert_eq!(Verdict::Pass.to_string(), "PASS");
    }
}
