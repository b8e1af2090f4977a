use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::config::BatchSize;
use crate::constants::UNBOUNDED_MODEL_MAX_LENGTH;
use crate::reconcile::TokenizationError;
use crate::remote::{MockReply, MockScoringClient, PrefillToken, RemoteScoringError};
use crate::tokenizer::MockTokenizer;

const ENDPOINT: &str = "http://tgi.test/generate";

// ids: the=0 cat=1 sat=2 on=3 mat=4 <s>=5 dog=6
fn tokenizer() -> MockTokenizer {
    MockTokenizer::new(["the", "cat", "sat", "on", "mat", "<s>", "dog"]).with_eos_token_id(5)
}

fn adapter(client: MockScoringClient) -> TgiAdapter<MockTokenizer, MockScoringClient> {
    TgiAdapter::new(tokenizer(), client, AdapterConfig::new(ENDPOINT))
}

mod batch_tests {
    use super::*;

    #[tokio::test]
    async fn test_score_batch_preserves_order() {
        let adapter = adapter(MockScoringClient::new());
        let items = vec![
            BatchItem::with_text(vec![0, 1], "the cat"),
            BatchItem::new(vec![0, 1, 2, 3, 0, 4]),
            BatchItem::with_text(vec![6], "dog"),
        ];

        let scores = adapter.score_batch(&items).await.unwrap();

        assert_eq!(scores.responses.len(), 3);
        assert_eq!(scores.responses[0].len(), 2);
        assert_eq!(scores.responses[1].len(), 6);
        assert_eq!(scores.responses[2].len(), 1);
        assert_eq!(scores.minor_drift_count, 0);

        let sent: Vec<String> = adapter
            .client()
            .calls()
            .into_iter()
            .map(|(text, _)| text)
            .collect();
        assert_eq!(sent, vec!["the cat", "the cat sat on the mat", "dog"]);
    }

    #[tokio::test]
    async fn test_score_batch_uses_scripted_response() {
        let client = MockScoringClient::new().with_reply(
            "the cat",
            MockReply::Prefill(vec![
                PrefillToken {
                    logprob: Some(-1.2),
                    predicted_id: 15,
                },
                PrefillToken {
                    logprob: Some(-0.3),
                    predicted_id: 7,
                },
            ]),
        );
        let adapter = adapter(client);

        let scores = adapter
            .score_batch(&[BatchItem::with_text(vec![0, 1], "the cat")])
            .await
            .unwrap();

        assert_eq!(scores.responses[0].logprobs(), &[Some(-1.2), Some(-0.3)]);
        assert_eq!(scores.responses[0].predicted_ids(), &[15, 7]);
    }

    #[tokio::test]
    async fn test_minor_drift_is_counted_and_scored() {
        let adapter = adapter(MockScoringClient::new());
        let items = vec![
            // Harness added a BOS; re-encoding of "the cat sat" is [0, 1, 2].
            BatchItem::with_text(vec![5, 1, 2], "the cat sat"),
            BatchItem::with_text(vec![0, 1], "the cat"),
            BatchItem::with_text(vec![6, 6, 4], "the cat mat"),
        ];

        let scores = adapter.score_batch(&items).await.unwrap();
        assert_eq!(scores.responses.len(), 3);
        assert_eq!(scores.minor_drift_count, 2);
        assert_eq!(adapter.client().call_count(), 3);
    }

    #[tokio::test]
    async fn test_mismatch_fails_whole_batch_before_any_request() {
        let adapter = adapter(MockScoringClient::new());
        let items = vec![
            BatchItem::with_text(vec![0, 1], "the cat"),
            BatchItem::with_text(vec![0, 1, 6], "the cat sat"),
            BatchItem::with_text(vec![4], "mat"),
        ];

        let err = adapter.score_batch(&items).await.unwrap_err();

        assert_eq!(err.item(), Some(1));
        match err {
            AdapterError::Tokenization {
                source: TokenizationError::Mismatch { expected, actual },
                ..
            } => {
                assert_eq!(expected, vec![0, 1, 6]);
                assert_eq!(actual, vec![0, 1, 2]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(adapter.client().call_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_error_aborts_batch() {
        let client = MockScoringClient::new()
            .with_reply("the cat", MockReply::ServerError("model overloaded".into()));
        let adapter = adapter(client);
        let items = vec![
            BatchItem::with_text(vec![4], "mat"),
            BatchItem::with_text(vec![0, 1], "the cat"),
        ];

        let err = adapter.score_batch(&items).await.unwrap_err();

        assert_eq!(err.item(), Some(1));
        match err {
            AdapterError::RemoteScoring {
                source: RemoteScoringError::Server { message },
                ..
            } => assert_eq!(message, "model overloaded"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_mismatch_wins_over_earlier_remote_error() {
        let client = MockScoringClient::new()
            .with_reply("mat", MockReply::ServerError("model overloaded".into()));
        let adapter = adapter(client);
        let items = vec![
            BatchItem::with_text(vec![4], "mat"),
            BatchItem::with_text(vec![0, 1, 3], "the cat sat"),
        ];

        let err = adapter.score_batch(&items).await.unwrap_err();

        assert!(matches!(err, AdapterError::Tokenization { item: 1, .. }));
        assert_eq!(adapter.client().call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let adapter = adapter(MockScoringClient::new());
        let scores = adapter.score_batch(&[]).await.unwrap();
        assert!(scores.responses.is_empty());
        assert_eq!(adapter.client().call_count(), 0);
    }

    #[tokio::test]
    async fn test_endpoint_override_and_fallback() {
        let adapter = adapter(MockScoringClient::new());
        let items = [BatchItem::with_text(vec![4], "mat")];

        adapter
            .score_batch_at(&items, Some("http://other/generate"))
            .await
            .unwrap();
        adapter.score_batch_at(&items, Some("")).await.unwrap();

        let endpoints: Vec<String> = adapter
            .client()
            .calls()
            .into_iter()
            .map(|(_, endpoint)| endpoint)
            .collect();
        assert_eq!(endpoints, vec!["http://other/generate", ENDPOINT]);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_keeps_item_order() {
        let client = MockScoringClient::new()
            .with_delay("the cat sat", Duration::from_millis(60))
            .with_delay("the cat", Duration::from_millis(30));
        let adapter = TgiAdapter::new(
            tokenizer(),
            client,
            AdapterConfig::new(ENDPOINT).with_max_concurrency(4),
        );
        let items = vec![
            BatchItem::with_text(vec![0, 1, 2], "the cat sat"),
            BatchItem::with_text(vec![0, 1], "the cat"),
            BatchItem::with_text(vec![4], "mat"),
        ];

        let scores = adapter.score_batch(&items).await.unwrap();

        let lengths: Vec<usize> = scores.responses.iter().map(|r| r.len()).collect();
        assert_eq!(lengths, vec![3, 2, 1]);
    }
}

mod model_call_tests {
    use super::*;

    #[tokio::test]
    async fn test_model_call_parallel_sequences() {
        let adapter = adapter(MockScoringClient::new());
        let inputs = vec![vec![0, 1], vec![6]];
        let texts = vec![None, Some("dog".to_string())];

        let (logprobs, predictions) = adapter
            .model_call(&inputs, Some(texts.as_slice()))
            .await
            .unwrap();

        assert_eq!(logprobs, vec![vec![None, Some(-0.2)], vec![None]]);
        assert_eq!(predictions, vec![vec![0, 1], vec![0]]);
    }

    #[tokio::test]
    async fn test_model_call_without_texts_decodes() {
        let adapter = adapter(MockScoringClient::new());
        adapter.model_call(&[vec![0, 1, 2]], None).await.unwrap();

        assert_eq!(adapter.client().calls()[0].0, "the cat sat");
    }

    #[tokio::test]
    async fn test_model_call_rejects_misaligned_texts() {
        let adapter = adapter(MockScoringClient::new());
        let texts: Vec<Option<String>> = vec![None];
        let err = adapter
            .model_call(&[vec![0], vec![1]], Some(texts.as_slice()))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidInput { .. }));
        assert_eq!(adapter.client().call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_call_runs_on_spawned_task() {
        let adapter: Arc<dyn ScoringAdapter> = Arc::new(adapter(MockScoringClient::new()));

        let handle =
            tokio::spawn(async move { adapter.model_call(&[vec![0, 1], vec![4]], None).await });
        let (logprobs, predictions) = handle.await.unwrap().unwrap();

        assert_eq!(logprobs.len(), 2);
        assert_eq!(predictions, vec![vec![0, 1], vec![0]]);
    }

    #[tokio::test]
    async fn test_model_call_mismatch_is_tokenization_error() {
        let adapter = adapter(MockScoringClient::new());
        let texts = vec![Some("the cat sat".to_string())];
        let err = adapter
            .model_call(&[vec![0, 1, 3]], Some(texts.as_slice()))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Tokenization { item: 0, .. }));
    }
}

mod property_tests {
    use super::*;

    #[test]
    fn test_generate_always_unsupported() {
        let adapter = adapter(MockScoringClient::new());
        for (context, max_length, eos) in [
            (vec![], 0, None),
            (vec![0, 1], 16, Some(5)),
            (vec![6; 100], usize::MAX, Some(0)),
        ] {
            let err = adapter
                .model_generate(&context, max_length, eos)
                .unwrap_err();
            assert!(matches!(
                err,
                AdapterError::UnsupportedOperation {
                    operation: "generate"
                }
            ));
        }
        assert_eq!(adapter.client().call_count(), 0);
    }

    #[test]
    fn test_max_length_override() {
        let adapter = TgiAdapter::new(
            tokenizer().with_model_max_length(4096),
            MockScoringClient::new(),
            AdapterConfig::new(ENDPOINT).with_max_length(1024),
        );
        assert_eq!(adapter.max_length(), 1024);
    }

    #[test]
    fn test_max_length_zero_override_is_ignored() {
        let adapter = TgiAdapter::new(
            tokenizer().with_model_max_length(4096),
            MockScoringClient::new(),
            AdapterConfig::new(ENDPOINT).with_max_length(0),
        );
        assert_eq!(adapter.max_length(), 4096);
    }

    #[test]
    fn test_max_length_from_tokenizer() {
        let adapter = TgiAdapter::new(
            tokenizer().with_model_max_length(8192),
            MockScoringClient::new(),
            AdapterConfig::new(ENDPOINT),
        );
        assert_eq!(adapter.max_length(), 8192);
    }

    #[test]
    fn test_max_length_sentinel_defaults() {
        let adapter = TgiAdapter::new(
            tokenizer().with_model_max_length(UNBOUNDED_MODEL_MAX_LENGTH),
            MockScoringClient::new(),
            AdapterConfig::new(ENDPOINT),
        );
        assert_eq!(adapter.max_length(), 2048);
    }

    #[test]
    fn test_max_length_without_tokenizer_value() {
        let adapter = adapter(MockScoringClient::new());
        assert_eq!(adapter.max_length(), 2048);
    }

    #[test]
    fn test_fixed_properties() {
        let adapter = TgiAdapter::new(
            tokenizer(),
            MockScoringClient::new(),
            AdapterConfig::new(ENDPOINT).with_batch_size(BatchSize::Fixed(64)),
        );
        assert_eq!(adapter.batch_size(), 1);
        assert_eq!(adapter.configured_batch_size(), BatchSize::Fixed(64));
        assert_eq!(adapter.max_gen_toks(), 256);
        assert_eq!(adapter.device(), "cpu");
        assert_eq!(adapter.vocab_size(), 7);
        assert_eq!(adapter.eot_token_id(), Some(5));
        assert_eq!(adapter.endpoint(), ENDPOINT);
    }

    #[test]
    fn test_tok_encode_decode() {
        let adapter = adapter(MockScoringClient::new());
        assert_eq!(adapter.tok_encode("the mat").unwrap(), vec![0, 4]);
        assert_eq!(adapter.tok_decode(&[6, 2]).unwrap(), "dog sat");
        assert!(matches!(
            adapter.tok_encode("zebra"),
            Err(AdapterError::Tokenizer(_))
        ));
    }

    #[test]
    fn test_config_clamps_concurrency() {
        assert_eq!(
            AdapterConfig::new(ENDPOINT)
                .with_max_concurrency(0)
                .max_concurrency,
            1
        );
    }

    #[test]
    fn test_debug_omits_collaborators() {
        let adapter = adapter(MockScoringClient::new());
        let debug_str = format!("{:?}", adapter);
        assert!(debug_str.contains("TgiAdapter"));
        assert!(debug_str.contains(ENDPOINT));
    }
}
