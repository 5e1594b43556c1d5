use super::*;

const FENCED_REPLY: &str = r#"Here is the evaluation:

```json
{
  "clarity_score": {"score": 8, "justification": "Aims are explicit."},
  "novelty_score": {"score": 6, "justification": "Extends prior sensor work."},
  "feasibility_score": {"score": 9, "justification": "Detailed timeline."},
  "strengths": "Clear plan. Good team.",
  "weaknesses": "Limited novelty. Small pilot."
}
```
"#;

mod parsing {
    use super::*;

    #[test]
    fn test_fenced_reply_is_structured() {
        let outcome = parse_reply(FENCED_REPLY);
        let rubric = outcome.rubric().expect("structured");

        assert_eq!(rubric.scores(), [8, 6, 9]);
        assert_eq!(rubric.novelty_score.justification, "Extends prior sensor work.");
        assert_eq!(rubric.strengths, "Clear plan. Good team.");
    }

    #[test]
    fn test_bare_json_is_structured() {
        let json = serde_json::to_string(&sample_rubric(5, 5, 5)).unwrap();
        assert!(parse_reply(&json).rubric().is_some());
    }

    #[test]
    fn test_prose_reply_is_unstructured() {
        let reply = "**Clarity Score (1-10):** 7\n**Novelty Score (1-10):** 5";
        assert_eq!(
            parse_reply(reply),
            EvaluationOutcome::Unstructured(reply.to_string())
        );
    }

    #[test]
    fn test_out_of_range_score_is_unstructured() {
        let json = serde_json::to_string(&sample_rubric(11, 5, 5)).unwrap();
        assert!(matches!(parse_reply(&json), EvaluationOutcome::Unstructured(_)));

        let json = serde_json::to_string(&sample_rubric(0, 5, 5)).unwrap();
        assert!(matches!(parse_reply(&json), EvaluationOutcome::Unstructured(_)));
    }

    #[test]
    fn test_missing_field_is_unstructured() {
        let reply = r#"{"clarity_score": {"score": 7, "justification": "ok"}}"#;
        assert!(matches!(parse_reply(reply), EvaluationOutcome::Unstructured(_)));
    }

    #[test]
    fn test_lenient_score_formats() {
        let reply = r#"{
            "clarity_score": {"score": "7", "justification": "a"},
            "novelty_score": {"score": 8.0, "justification": "b"},
            "feasibility_score": {"score": 4},
            "strengths": "s",
            "weaknesses": "w"
        }"#;
        let outcome = parse_reply(reply);
        let rubric = outcome.rubric().expect("structured");
        assert_eq!(rubric.scores(), [7, 8, 4]);
        assert!(rubric.feasibility_score.justification.is_empty());
    }

    #[test]
    fn test_fractional_score_is_unstructured() {
        let reply = r#"{
            "clarity_score": {"score": 7.5, "justification": "a"},
            "novelty_score": {"score": 8, "justification": "b"},
            "feasibility_score": {"score": 4, "justification": "c"},
            "strengths": "s",
            "weaknesses": "w"
        }"#;
        assert!(matches!(parse_reply(reply), EvaluationOutcome::Unstructured(_)));
    }

    #[test]
    fn test_json_payload_slices_fence() {
        assert_eq!(json_payload("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(json_payload("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(json_payload("```\nno braces\n```"), "```\nno braces\n```");
    }
}

mod summary {
    use super::*;

    #[test]
    fn test_average_highest_and_areas() {
        let rubric = sample_rubric(8, 6, 9);
        assert!((rubric.average() - 23.0 / 3.0).abs() < 1e-5);
        assert_eq!(rubric.highest(), 9);
        assert_eq!(rubric.areas_to_improve(), 1);
        assert_eq!(rubric.potential(), Potential::Good);
    }

    #[test]
    fn test_potential_bands() {
        assert_eq!(Potential::from_average(8.0), Potential::Excellent);
        assert_eq!(Potential::from_average(7.99), Potential::Good);
        assert_eq!(Potential::from_average(6.0), Potential::Good);
        assert_eq!(Potential::from_average(4.0), Potential::Moderate);
        assert_eq!(Potential::from_average(3.9), Potential::Limited);
        assert_eq!(Potential::Excellent.to_string(), "excellent potential");
    }

    #[test]
    fn test_all_high_scores_have_no_areas_to_improve() {
        assert_eq!(sample_rubric(7, 9, 10).areas_to_improve(), 0);
        assert_eq!(sample_rubric(1, 2, 3).areas_to_improve(), 3);
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let json = serde_json::to_value(EvaluationOutcome::Failed("timeout".into())).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["detail"], "timeout");

        let json = serde_json::to_value(EvaluationOutcome::Structured(sample_rubric(8, 8, 8)))
            .unwrap();
        assert_eq!(json["status"], "structured");
        assert_eq!(json["detail"]["novelty_score"]["score"], 8);
    }
}

mod scorers {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_mock_structured_round_trips_through_parser() {
        let rubric = sample_rubric(9, 7, 8);
        let scorer = MockScorer::structured(&rubric);

        let outcome = scorer.evaluate("proposal").await;
        assert_eq!(outcome, EvaluationOutcome::Structured(rubric));
        assert_eq!(scorer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let scorer = MockScorer::failing("quota exhausted");
        let outcome = scorer.evaluate("proposal").await;
        assert!(outcome.is_failed());
        assert_eq!(outcome.rubric(), None);
    }

    #[tokio::test]
    async fn test_gemini_scorer_rejects_blank_text_without_calling() {
        let scorer = GeminiScorer::new(&Config::for_testing("/tmp"));
        let outcome = scorer.evaluate("   ").await;
        assert_eq!(
            outcome,
            EvaluationOutcome::Failed(EvaluationError::EmptyInput.to_string())
        );
    }

    #[test]
    fn test_gemini_scorer_uses_configured_model() {
        let mut config = Config::for_testing("/tmp");
        config.scoring_model = "gemini-2.5-pro".to_string();
        let scorer = GeminiScorer::new(&config);
        assert_eq!(scorer.model(), "gemini-2.5-pro");
        assert!(!format!("{scorer:?}").contains("test-key"));
    }

    #[test]
    fn test_prompt_embeds_text_and_bands() {
        let prompt = build_prompt("Soil moisture sensing with quantum dots.");
        assert!(prompt.contains("Soil moisture sensing with quantum dots."));
        assert!(prompt.contains("clarity_score"));
        assert!(prompt.contains("9-10 breakthrough idea"));
    }
}

mod listing {
    use super::*;
    use crate::config::Config;
    use reqwest::StatusCode;

    const MODELS_BODY: &str = r#"{
      "models": [
        {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent", "countTokens"]},
        {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]},
        {"name": "models/gemini-2.5-pro", "supportedGenerationMethods": ["generateContent"]},
        {"name": "models/aqa"}
      ],
      "nextPageToken": "page-2"
    }"#;

    #[test]
    fn test_listing_keeps_chat_capable_models() {
        let page = parse_model_list(MODELS_BODY).unwrap();
        assert_eq!(page.names, vec!["gemini-2.5-flash", "gemini-2.5-pro"]);
        assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
    }

    #[test]
    fn test_last_page_has_no_token() {
        let page = parse_model_list(r#"{"models": [], "nextPageToken": ""}"#).unwrap();
        assert!(page.names.is_empty());
        assert_eq!(page.next_page_token, None);

        let page = parse_model_list("{}").unwrap();
        assert_eq!(page, ModelPage { names: Vec::new(), next_page_token: None });
    }

    #[test]
    fn test_malformed_listing_is_provider_error() {
        let err = parse_model_list("<html>").unwrap_err();
        assert!(matches!(err, EvaluationError::Provider { .. }));
    }

    #[test]
    fn test_rejected_key_is_unauthorized() {
        assert_eq!(
            classify_list_status(StatusCode::UNAUTHORIZED, ""),
            EvaluationError::Unauthorized { status: 401 }
        );
        assert_eq!(
            classify_list_status(StatusCode::FORBIDDEN, "{}"),
            EvaluationError::Unauthorized { status: 403 }
        );
    }

    #[test]
    fn test_other_status_carries_api_message() {
        let body = r#"{"error": {"code": 500, "message": "backend unavailable"}}"#;
        match classify_list_status(StatusCode::INTERNAL_SERVER_ERROR, body) {
            EvaluationError::Provider { reason } => {
                assert!(reason.contains("500"));
                assert!(reason.contains("backend unavailable"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_list_models_uses_configured_base_url() {
        let mut config = Config::for_testing("/tmp");
        config.api_base_url = "http://127.0.0.1:1/".to_string();

        match list_models(&config).await.unwrap_err() {
            EvaluationError::Provider { reason } => {
                assert!(reason.contains("http://127.0.0.1:1/v1beta/models"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_root_normalizes_trailing_slash() {
        assert_eq!(api_root("http://localhost:8089"), "http://localhost:8089/v1beta/");
        assert_eq!(api_root("http://localhost:8089/"), "http://localhost:8089/v1beta/");
    }

    #[tokio::test]
    async fn test_scorer_targets_configured_base_url() {
        let mut config = Config::for_testing("/tmp");
        config.api_base_url = "http://localhost:8089".to_string();
        let scorer = GeminiScorer::new(&config);

        let target = scorer
            .client()
            .resolve_service_target(scorer.model())
            .await
            .unwrap();
        assert_eq!(target.endpoint.base_url(), "http://localhost:8089/v1beta/");
    }
}
