//! Input checks. Pure: no collaborator is touched.

use crate::error::TransferError;
use crate::network::{AddressValidator, Network};
use crate::transfer::TransferRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub amount_text: String,
    pub to: String,
}

pub fn validate_request(
    request: &TransferRequest,
    network: Network,
    validator: &dyn AddressValidator,
) -> Result<ValidatedRequest, TransferError> {
    let amount_text = request.amount.trim();
    let to = request.to.trim();
    if amount_text.is_empty() || to.is_empty() {
        return Err(TransferError::MissingFields);
    }
    if !validator.is_valid_destination(to, network) {
        return Err(TransferError::InvalidAddress(to.to_string()));
    }
    Ok(ValidatedRequest { amount_text: amount_text.to_string(), to: to.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_addresses::p2tr;
    use crate::network::NetworkAddressValidator;

    #[test]
    fn blank_fields_are_missing() {
        let v = NetworkAddressValidator;
        let to = p2tr(9, Network::Regtest);
        for req in [TransferRequest::new("", &to), TransferRequest::new("1", "  "), TransferRequest::new(" ", "")] {
            assert!(matches!(validate_request(&req, Network::Regtest, &v), Err(TransferError::MissingFields)));
        }
    }

    #[test]
    fn destination_checked_against_network() {
        let v = NetworkAddressValidator;
        let mainnet = p2tr(9, Network::Bitcoin);
        let err = validate_request(&TransferRequest::new("1", &mainnet), Network::Regtest, &v).unwrap_err();
        assert_eq!(err.user_message(), "Invalid transfer address.");
    }

    #[test]
    fn valid_request_is_trimmed() {
        let v = NetworkAddressValidator;
        let to = p2tr(9, Network::Regtest);
        let ok = validate_request(&TransferRequest::new(" 0.5 ", format!(" {to} ")), Network::Regtest, &v).unwrap();
        assert_eq!(ok, ValidatedRequest { amount_text: "0.5".into(), to });
    }
}
