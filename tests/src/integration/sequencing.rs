//! # Account Sequencing
//!
//! Several topics share one wallet. Their submissions must go out with
//! strictly increasing account sequences.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use node_runtime::NodeRuntime;
    use oc_01_chain_client::{AccountInfo, ChainError, MockChainClient};
    use oc_02_inference_client::MockInferenceClient;
    use oc_03_tx_builder::MockTxSigner;
    use oc_04_topic_worker::TopicWorker;
    use shared_types::Nonce;

    use crate::fixtures::{cosmos_signer, decode_payload, deps, global_config, topic};

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_topics_never_share_a_sequence() {
        let chain = Arc::new(MockChainClient::new());
        chain.set_open_nonce(Some(50));
        let inference = Arc::new(MockInferenceClient::with_value("1.0"));
        let signer = cosmos_signer(&chain).await;
        let starting_balance = signer.balance();
        let config = global_config(vec![topic(1), topic(2), topic(3)]);
        let runtime = NodeRuntime::new(&config, &deps(&chain, inference, signer.clone()));

        runtime.run(tokio::time::sleep(Duration::from_secs(10))).await;

        let submitted = chain.submitted();
        assert_eq!(submitted.len(), 3);
        let mut sequences: Vec<u64> = submitted.iter().map(|tx| tx.sequence).collect();
        sequences.sort_unstable();
        assert_eq!(sequences, vec![0, 1, 2]);

        let topics: HashSet<u64> = submitted
            .iter()
            .filter_map(|tx| decode_payload(tx).worker_data_bundle.map(|b| b.topic_id))
            .collect();
        assert_eq!(topics, HashSet::from([1, 2, 3]));

        let fees: u128 = submitted.iter().map(|tx| tx.fee).sum();
        assert_eq!(signer.sequence(), 3);
        assert_eq!(signer.balance(), starting_balance - fees);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_signer_is_never_entered_twice() {
        let chain = Arc::new(MockChainClient::new());
        chain.set_open_nonce(Some(9));
        let inference = Arc::new(MockInferenceClient::with_value("1.0"));
        let signer = Arc::new(MockTxSigner::new("allo1mock").with_sign_delay(Duration::from_millis(750)));
        let config = global_config((1..=4).map(topic).collect());
        let runtime = NodeRuntime::new(&config, &deps(&chain, inference, signer.clone()));

        runtime.run(tokio::time::sleep(Duration::from_secs(10))).await;

        assert_eq!(chain.submit_calls(), 4);
        assert_eq!(signer.max_in_flight(), 1);
        assert_eq!(signer.sequence(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_mismatch_resyncs_signer() {
        let chain = Arc::new(MockChainClient::new());
        chain.set_account(Some(AccountInfo {
            account_number: 3,
            sequence: 4,
        }));
        chain.push_broadcast(Err(ChainError::SequenceMismatch {
            expected: 9,
            raw_log: "account sequence mismatch, expected 9, got 4".into(),
        }));
        let inference = Arc::new(MockInferenceClient::with_value("1.0"));
        let signer = cosmos_signer(&chain).await;
        let worker = TopicWorker::new(topic(1), &deps(&chain, inference, signer.clone()));

        assert!(worker.run_cycle(Nonce::observed(1, 10)).await.is_err());
        assert_eq!(signer.sequence(), 9);

        let attempt = worker.run_cycle(Nonce::observed(1, 11)).await.unwrap();
        assert!(attempt.outcome.unwrap().status.is_included());
        let submitted = chain.submitted();
        assert_eq!(submitted[0].sequence, 4);
        assert_eq!(submitted[1].sequence, 9);
        assert_eq!(signer.sequence(), 10);
    }
}
