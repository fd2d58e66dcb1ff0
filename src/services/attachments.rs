use tracing::{error, info};

use eventsports_protocol::common::Attachment;

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AttachmentService {
    api: ApiClient,
}

impl AttachmentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_event(&self, event_id: i64) -> Result<Vec<Attachment>> {
        self.api
            .get(&Endpoints::attachments_by_event(event_id))
            .await
            .inspect_err(|e| error!(event_id, error = %e, "failed to list attachments"))
    }

    pub async fn download(&self, attachment_id: i64) -> Result<Vec<u8>> {
        let bytes = self
            .api
            .get_bytes(&Endpoints::attachment_download(attachment_id))
            .await
            .inspect_err(|e| error!(attachment_id, error = %e, "attachment download failed"))?;
        info!(attachment_id, size = bytes.len(), "attachment downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::{MockReply, TestHarness};
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_and_download() {
        let harness = TestHarness::signed_in("ATLETA");
        harness.transport.on(
            Method::GET,
            "/anexos/evento/2",
            MockReply::json(
                200,
                json!([{ "id": 8, "nomeArquivo": "regulamento.pdf", "extensao": "pdf" }]),
            ),
        );
        harness.transport.on(
            Method::GET,
            "/anexos/8/download",
            MockReply::raw(200, vec![1, 2, 3]),
        );

        let service = AttachmentService::new(harness.api.clone());
        let attachments = service.by_event(2).await.unwrap();
        assert_eq!(attachments[0].nome_arquivo, "regulamento.pdf");
        assert!(attachments[0].ativo);
        assert_eq!(service.download(8).await.unwrap(), vec![1, 2, 3]);
    }
}
