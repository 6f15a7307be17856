//! Builders shared by the integration scenarios.

use std::sync::Arc;
use std::time::Duration;

use node_runtime::{ChainParams, GlobalConfig, SupervisorConfig};
use oc_01_chain_client::MockChainClient;
use oc_02_inference_client::InferenceClient;
use oc_03_tx_builder::domain::proto::{InsertWorkerPayloadRequest, TxBody, TxRaw};
use oc_03_tx_builder::{CosmosTxSigner, SignerParams, TxSigner};
use oc_04_topic_worker::{SubmissionLane, WorkerDeps};
use prost::Message;
use shared_crypto::Secp256k1KeyPair;
use shared_types::{SignedTx, TopicConfig, TopicId, TxCheckConfig};

/// Wallet key used by every scenario.
pub const WALLET_KEY: [u8; 32] = [0x42; 32];

/// Topic with short cadences: 2 s tick, 3 fetch attempts 1 s apart.
pub fn topic(topic_id: TopicId) -> TopicConfig {
    TopicConfig {
        nonce_fetch_freq: Duration::from_secs(2),
        inference_fetch_retries: 3,
        inference_fetch_retry_freq: Duration::from_secs(1),
        ..TopicConfig::new(topic_id, format!("http://localhost:8000/inference/{topic_id}"))
    }
}

/// Three status checks, 1 s apart.
pub fn tx_check() -> TxCheckConfig {
    TxCheckConfig {
        retries: 3,
        freq: Duration::from_secs(1),
    }
}

/// Wallet key pair.
pub fn keypair() -> Arc<Secp256k1KeyPair> {
    Arc::new(Secp256k1KeyPair::from_bytes(WALLET_KEY).expect("valid test key"))
}

/// Resolved config for `topics` with a 1 s restart delay.
pub fn global_config(topics: Vec<TopicConfig>) -> GlobalConfig {
    GlobalConfig {
        debug: true,
        keypair: keypair(),
        chain: ChainParams {
            api_url: "http://localhost:1317".into(),
            tx_check: tx_check(),
            address_prefix: "allo".into(),
            gas_adjustment: 1.5,
            fee_denom: "uallo".into(),
        },
        topics,
        supervisor: SupervisorConfig {
            restart_on_failure: true,
            restart_delay: Duration::from_secs(1),
        },
    }
}

/// Real signer bootstrapped against the mock chain.
pub async fn cosmos_signer(chain: &Arc<MockChainClient>) -> Arc<CosmosTxSigner> {
    let signer = CosmosTxSigner::bootstrap(keypair(), SignerParams::default(), chain.clone())
        .await
        .expect("mock chain bootstraps");
    Arc::new(signer)
}

/// Worker collaborators over the mock chain.
pub fn deps(
    chain: &Arc<MockChainClient>,
    inference: Arc<dyn InferenceClient>,
    signer: Arc<dyn TxSigner>,
) -> WorkerDeps {
    WorkerDeps {
        chain: chain.clone(),
        queries: chain.clone(),
        inference,
        signer,
        lane: SubmissionLane::new(),
        tx_check: tx_check(),
    }
}

/// Decode the worker payload carried by a signed transaction.
pub fn decode_payload(tx: &SignedTx) -> InsertWorkerPayloadRequest {
    let raw = TxRaw::decode(tx.bytes.as_slice()).expect("tx raw");
    let body = TxBody::decode(raw.body_bytes.as_slice()).expect("tx body");
    let message = body.messages.first().expect("one message");
    InsertWorkerPayloadRequest::decode(message.value.as_slice()).expect("worker payload")
}
