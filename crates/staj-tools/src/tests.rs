//! Snapshot tests for the advertised tool schemas

#[cfg(test)]
mod snapshot_tests {
    use crate::{AnalyzeDataTool, Result, SearchHit, SearchProvider, SendEmailTool, ToolHandler, ToolRegistry};
    use async_trait::async_trait;
    use std::sync::Arc;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_send_email_spec_snapshot() {
        assert_yaml_snapshot!(SendEmailTool::default().spec(), @r###"
        name: send_email
        description: E-posta gönderir (simülasyon).
        parameters:
          - name: recipient
            description: Alıcının e-posta adresi
          - name: message
            description: Gönderilecek mesaj
        "###);
    }

    #[test]
    fn test_analyze_data_spec_snapshot() {
        assert_yaml_snapshot!(AnalyzeDataTool::default().spec(), @r###"
        name: analyze_data
        description: Veri analizi yapar ve içgörüler döndürür.
        parameters:
          - name: data
            description: Analiz edilecek veri
        "###);
    }

    struct NoResults;

    #[async_trait]
    impl SearchProvider for NoResults {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "none"
        }
    }

    #[test]
    fn test_basic_tools_specs_snapshot() {
        let registry = ToolRegistry::basic_tools(Arc::new(NoResults));

        assert_yaml_snapshot!(registry.specs(), @r###"
        - name: web_search
          description: Searches the web using DuckDuckGo and returns the top 3 text results.
          parameters:
            - name: query
              description: Search query
        - name: analyze_data
          description: Analyze given data and return insights.
          parameters:
            - name: data
              description: Data to analyze
        - name: send_email
          description: Pretend to send an email.
          parameters:
            - name: recipient
              description: Recipient email address
            - name: message
              description: Message to send
        "###);
    }
}
