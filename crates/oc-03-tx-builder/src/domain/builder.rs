//! Message and transaction assembly.

use prost::Message;
use shared_crypto::Secp256k1KeyPair;
use shared_types::SubmissionMessage;

use super::errors::SignerError;
use super::fee::FeeQuote;
use super::proto::{
    self, Any, AuthInfo, Coin, Fee, InputInference, InputInferenceForecastBundle,
    InputWorkerDataBundle, InsertWorkerPayloadRequest, ModeInfo, ModeInfoSingle, PubKey,
    RegisterRequest, SignDoc, SignMode, SignerInfo, TxBody, TxRaw,
};

/// Blocks after the latest height at which a transaction expires.
pub const TIMEOUT_HEIGHT_OFFSET: u64 = 50;

/// Signing identity and account state for one transaction.
#[derive(Debug, Clone, Copy)]
pub struct TxContext<'a> {
    /// Wallet key.
    pub keypair: &'a Secp256k1KeyPair,
    /// Chain id bound into the sign doc.
    pub chain_id: &'a str,
    /// Wallet account number.
    pub account_number: u64,
    /// Sequence this transaction consumes.
    pub sequence: u64,
    /// Fee denomination.
    pub fee_denom: &'a str,
}

fn block_height(value: u64) -> Result<i64, SignerError> {
    i64::try_from(value)
        .map_err(|_| SignerError::InvalidMessage(format!("block height {value} out of range")))
}

/// Encode `message` as the chain message sent by wallet `address`.
///
/// Inference payloads carry a bundle signature: low-S ECDSA over SHA-256 of
/// the encoded `InputInferenceForecastBundle`, plus the hex public key.
pub fn payload_any(
    message: &SubmissionMessage,
    keypair: &Secp256k1KeyPair,
    address: &str,
) -> Result<Any, SignerError> {
    match message {
        SubmissionMessage::Inference {
            topic_id,
            nonce,
            value,
        } => {
            let height = block_height(*nonce)?;
            let bundle = InputInferenceForecastBundle {
                inference: Some(InputInference {
                    topic_id: *topic_id,
                    block_height: height,
                    inferer: address.to_string(),
                    value: value.clone(),
                    extra_data: Vec::new(),
                    proof: String::new(),
                }),
            };
            let signature = keypair.sign(&bundle.encode_to_vec());

            let request = InsertWorkerPayloadRequest {
                sender: address.to_string(),
                worker_data_bundle: Some(InputWorkerDataBundle {
                    worker: address.to_string(),
                    nonce: Some(proto::Nonce {
                        block_height: height,
                    }),
                    topic_id: *topic_id,
                    inference_forecasts_bundle: Some(bundle),
                    inferences_forecasts_bundle_signature: signature.to_vec(),
                    pubkey: keypair.public_key().to_hex(),
                }),
            };
            Ok(Any {
                type_url: proto::INSERT_WORKER_PAYLOAD_TYPE_URL.to_string(),
                value: request.encode_to_vec(),
            })
        }
        SubmissionMessage::Register { topic_id } => {
            let request = RegisterRequest {
                sender: address.to_string(),
                topic_id: *topic_id,
                owner: address.to_string(),
                is_reputer: false,
            };
            Ok(Any {
                type_url: proto::REGISTER_TYPE_URL.to_string(),
                value: request.encode_to_vec(),
            })
        }
    }
}

/// Build and sign a single-message `TxRaw` (SIGN_MODE_DIRECT).
pub fn build_tx(ctx: &TxContext<'_>, message: Any, timeout_height: u64, fee: FeeQuote) -> Vec<u8> {
    let body = TxBody {
        messages: vec![message],
        memo: String::new(),
        timeout_height,
    };

    let public_key = Any {
        type_url: proto::PUBKEY_TYPE_URL.to_string(),
        value: PubKey {
            key: ctx.keypair.public_key().as_bytes().to_vec(),
        }
        .encode_to_vec(),
    };

    let auth_info = AuthInfo {
        signer_infos: vec![SignerInfo {
            public_key: Some(public_key),
            mode_info: Some(ModeInfo {
                single: Some(ModeInfoSingle {
                    mode: SignMode::Direct as i32,
                }),
            }),
            sequence: ctx.sequence,
        }],
        fee: Some(Fee {
            amount: vec![Coin {
                denom: ctx.fee_denom.to_string(),
                amount: fee.amount.to_string(),
            }],
            gas_limit: fee.gas_limit,
            payer: String::new(),
            granter: String::new(),
        }),
    };

    let body_bytes = body.encode_to_vec();
    let auth_info_bytes = auth_info.encode_to_vec();

    let sign_doc = SignDoc {
        body_bytes: body_bytes.clone(),
        auth_info_bytes: auth_info_bytes.clone(),
        chain_id: ctx.chain_id.to_string(),
        account_number: ctx.account_number,
    };
    let signature = ctx.keypair.sign(&sign_doc.encode_to_vec());

    TxRaw {
        body_bytes,
        auth_info_bytes,
        signatures: vec![signature.to_vec()],
    }
    .encode_to_vec()
}
