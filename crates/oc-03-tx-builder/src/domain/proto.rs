//! # Protobuf Messages
//!
//! The subset of Cosmos SDK and emissions (v9) messages the worker sends,
//! with field tags matching the chain's `.proto` definitions. Optional
//! `oneof`s the worker never sets are left out; omitted fields encode the
//! same as their defaults.

#![allow(missing_docs)]

/// Type URL of a secp256k1 public key.
pub const PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";
/// Type URL of the inference payload message.
pub const INSERT_WORKER_PAYLOAD_TYPE_URL: &str = "/emissions.v9.InsertWorkerPayloadRequest";
/// Type URL of the worker registration message.
pub const REGISTER_TYPE_URL: &str = "/emissions.v9.RegisterRequest";

// =============================================================================
// GOOGLE / COSMOS SDK
// =============================================================================

/// `google.protobuf.Any`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// `cosmos.base.v1beta1.Coin`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

/// `cosmos.crypto.secp256k1.PubKey`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

/// `cosmos.tx.v1beta1.TxBody`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

/// `cosmos.tx.signing.v1beta1.SignMode`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SignMode {
    Unspecified = 0,
    Direct = 1,
}

/// `cosmos.tx.v1beta1.ModeInfo.Single`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModeInfoSingle {
    #[prost(enumeration = "SignMode", tag = "1")]
    pub mode: i32,
}

/// `cosmos.tx.v1beta1.ModeInfo` (single-signer arm only)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModeInfo {
    #[prost(message, optional, tag = "1")]
    pub single: Option<ModeInfoSingle>,
}

/// `cosmos.tx.v1beta1.SignerInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub mode_info: Option<ModeInfo>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

/// `cosmos.tx.v1beta1.Fee`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: String,
    #[prost(string, tag = "4")]
    pub granter: String,
}

/// `cosmos.tx.v1beta1.AuthInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

/// `cosmos.tx.v1beta1.SignDoc`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignDoc {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(string, tag = "3")]
    pub chain_id: String,
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

/// `cosmos.tx.v1beta1.TxRaw`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

// =============================================================================
// EMISSIONS
// =============================================================================

/// `emissions.v3.Nonce`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Nonce {
    #[prost(int64, tag = "1")]
    pub block_height: i64,
}

/// `emissions.v9.InputInference`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputInference {
    #[prost(uint64, tag = "1")]
    pub topic_id: u64,
    #[prost(int64, tag = "2")]
    pub block_height: i64,
    #[prost(string, tag = "3")]
    pub inferer: String,
    #[prost(string, tag = "4")]
    pub value: String,
    #[prost(bytes = "vec", tag = "5")]
    pub extra_data: Vec<u8>,
    #[prost(string, tag = "6")]
    pub proof: String,
}

/// `emissions.v9.InputInferenceForecastBundle` (inference arm only)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputInferenceForecastBundle {
    #[prost(message, optional, tag = "1")]
    pub inference: Option<InputInference>,
}

/// `emissions.v9.InputWorkerDataBundle`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputWorkerDataBundle {
    #[prost(string, tag = "1")]
    pub worker: String,
    #[prost(message, optional, tag = "2")]
    pub nonce: Option<Nonce>,
    #[prost(uint64, tag = "3")]
    pub topic_id: u64,
    #[prost(message, optional, tag = "4")]
    pub inference_forecasts_bundle: Option<InputInferenceForecastBundle>,
    #[prost(bytes = "vec", tag = "5")]
    pub inferences_forecasts_bundle_signature: Vec<u8>,
    #[prost(string, tag = "6")]
    pub pubkey: String,
}

/// `emissions.v9.InsertWorkerPayloadRequest`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InsertWorkerPayloadRequest {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(message, optional, tag = "2")]
    pub worker_data_bundle: Option<InputWorkerDataBundle>,
}

/// `emissions.v9.RegisterRequest`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterRequest {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(uint64, tag = "2")]
    pub topic_id: u64,
    #[prost(string, tag = "3")]
    pub owner: String,
    #[prost(bool, tag = "4")]
    pub is_reputer: bool,
}
