//! Network profiles and address format checks.

use bitcoin::address::{Address, AddressType, NetworkUnchecked};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Bitcoin,
    Testnet,
    Signet,
    #[default]
    Regtest,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "mainnet" | "main" => Some(Network::Bitcoin),
            "testnet" | "test" => Some(Network::Testnet),
            "signet" => Some(Network::Signet),
            "regtest" | "reg" => Some(Network::Regtest),
            _ => None,
        }
    }

    pub fn to_bitcoin(&self) -> bitcoin::Network {
        match self {
            Network::Bitcoin => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
            Network::Signet => bitcoin::Network::Signet,
            Network::Regtest => bitcoin::Network::Regtest,
        }
    }

    /// Public OP_NET node for this network, if one exists.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Regtest => Some("https://regtest.opnet.org"),
            Network::Testnet => Some("https://testnet.opnet.org"),
            _ => None,
        }
    }

    /// Deployed wBTC contract, where one is known.
    pub fn default_contract(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some("tb1pq64lx73fwyrdp4asvl7xt5r5qvxvt9wy82x75taqtzvd64f58nasansurj"),
            _ => None,
        }
    }
}

/// Address format checks against a network profile.
pub trait AddressValidator: Send + Sync {
    /// Any address that can receive funds on `network`.
    fn is_valid_destination(&self, address: &str, network: Network) -> bool;
    /// A taproot (P2TR) address on `network`.
    fn is_valid_p2tr(&self, address: &str, network: Network) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkAddressValidator;

impl NetworkAddressValidator {
    fn checked(address: &str, network: Network) -> Option<Address> {
        Address::<NetworkUnchecked>::from_str(address.trim())
            .ok()?
            .require_network(network.to_bitcoin())
            .ok()
    }
}

impl AddressValidator for NetworkAddressValidator {
    fn is_valid_destination(&self, address: &str, network: Network) -> bool {
        Self::checked(address, network).is_some()
    }

    fn is_valid_p2tr(&self, address: &str, network: Network) -> bool {
        Self::checked(address, network)
            .map(|a| a.address_type() == Some(AddressType::P2tr))
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) mod test_addresses {
    use super::Network;
    use bitcoin::key::CompressedPublicKey;
    use bitcoin::secp256k1::{Keypair, Secp256k1, SecretKey};
    use bitcoin::Address;

    fn keypair(seed: u8) -> Keypair {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&[seed.max(1); 32]).expect("valid key");
        Keypair::from_secret_key(&secp, &sk)
    }

    pub fn p2tr(seed: u8, network: Network) -> String {
        let secp = Secp256k1::new();
        let (xonly, _) = keypair(seed).x_only_public_key();
        Address::p2tr(&secp, xonly, None, network.to_bitcoin()).to_string()
    }

    pub fn p2wpkh(seed: u8, network: Network) -> String {
        let pk = CompressedPublicKey(keypair(seed).public_key());
        Address::p2wpkh(&pk, network.to_bitcoin()).to_string()
    }
}
