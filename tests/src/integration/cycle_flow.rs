//! # Cycle Flow
//!
//! A full node over the in-memory chain: nonce discovery, inference fetch,
//! real protobuf signing, broadcast and confirmation.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use node_runtime::NodeRuntime;
    use oc_01_chain_client::{ChainError, MockChainClient};
    use oc_02_inference_client::{InferenceError, MockInferenceClient};
    use oc_03_tx_builder::TxSigner;
    use shared_types::TxStatus;

    use crate::fixtures::{cosmos_signer, decode_payload, deps, global_config, topic};

    #[tokio::test(start_paused = true)]
    async fn test_open_window_gets_one_signed_payload() {
        let chain = Arc::new(MockChainClient::new());
        chain.set_open_nonce(Some(120));
        chain.push_status(Ok(TxStatus::NotFound));
        let inference = Arc::new(MockInferenceClient::with_value("2731.55"));
        let signer = cosmos_signer(&chain).await;
        let config = global_config(vec![topic(1)]);
        let runtime = NodeRuntime::new(&config, &deps(&chain, inference.clone(), signer.clone()));

        let exits = runtime.run(tokio::time::sleep(Duration::from_secs(20))).await;

        assert!(exits.iter().all(|(_, exit)| exit.is_shutdown()));
        let submitted = chain.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(inference.calls(), 1);

        let payload = decode_payload(&submitted[0]);
        assert_eq!(payload.sender, signer.address());
        let bundle = payload.worker_data_bundle.expect("bundle");
        assert_eq!(bundle.topic_id, 1);
        assert_eq!(bundle.nonce.expect("nonce").block_height, 120);
        let value = bundle
            .inference_forecasts_bundle
            .and_then(|b| b.inference)
            .expect("inference");
        assert_eq!(value.value, "2731.55");
        assert_eq!(value.inferer, signer.address());

        assert_eq!(signer.sequence(), 1);
        assert_eq!(submitted[0].sequence, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_model_abandons_windows() {
        let chain = Arc::new(MockChainClient::new());
        chain.push_nonce(Ok(Some(5)));
        chain.set_open_nonce(Some(6));
        let inference = Arc::new(MockInferenceClient::failing(InferenceError::Transport(
            "connection refused".into(),
        )));
        let signer = cosmos_signer(&chain).await;
        let config = global_config(vec![topic(1)]);
        let runtime = NodeRuntime::new(&config, &deps(&chain, inference.clone(), signer));
        let worker = runtime.workers()[0].clone();

        runtime.run(tokio::time::sleep(Duration::from_secs(30))).await;

        assert_eq!(chain.submit_calls(), 0);
        assert_eq!(inference.calls(), 6);
        assert_eq!(worker.tracker().last_handled(), Some(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_window_is_not_retried() {
        let chain = Arc::new(MockChainClient::new());
        chain.push_nonce(Ok(Some(30)));
        chain.set_open_nonce(Some(31));
        chain.push_broadcast(Err(ChainError::Rejected {
            code: 77,
            raw_log: "nonce already fulfilled".into(),
        }));
        let inference = Arc::new(MockInferenceClient::with_value("0.5"));
        let signer = cosmos_signer(&chain).await;
        let config = global_config(vec![topic(1)]);
        let runtime = NodeRuntime::new(&config, &deps(&chain, inference, signer.clone()));

        runtime.run(tokio::time::sleep(Duration::from_secs(30))).await;

        let submitted = chain.submitted();
        assert_eq!(submitted.len(), 2);
        let windows: Vec<i64> = submitted
            .iter()
            .map(|tx| decode_payload(tx).worker_data_bundle.and_then(|b| b.nonce).map_or(0, |n| n.block_height))
            .collect();
        assert_eq!(windows, vec![30, 31]);
        // Rejection leaves the sequence where it was.
        assert_eq!(submitted[0].sequence, 0);
        assert_eq!(submitted[1].sequence, 0);
        assert_eq!(signer.sequence(), 1);
    }
}
