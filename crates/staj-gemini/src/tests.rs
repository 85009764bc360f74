//! Snapshot tests for the Gemini client

#[cfg(test)]
mod snapshot_tests {
    use crate::{GeminiClient, GeminiConfig};
    use insta::{assert_snapshot, assert_yaml_snapshot};

    #[test]
    fn test_config_snapshot() {
        let config = GeminiConfig {
            api_key: "test_api_key_redacted".to_string(),
            api_url: "http://localhost:8080".to_string(),
            model: "gemini-2.5-pro".to_string(),
            embedding_model: "text-embedding-004".to_string(),
            timeout_secs: 120,
        };

        assert_yaml_snapshot!(config, @r###"
        api_key: test_api_key_redacted
        api_url: "http://localhost:8080"
        model: gemini-2.5-pro
        embedding_model: text-embedding-004
        timeout_secs: 120
        "###);
    }

    #[test]
    fn test_model_constants() {
        assert_snapshot!(GeminiClient::GEMINI_2_5_PRO, @"gemini-2.5-pro");
        assert_snapshot!(GeminiClient::GEMINI_2_5_FLASH, @"gemini-2.5-flash");
    }
}
