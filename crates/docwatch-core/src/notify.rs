//! Notifier: formats grouped announcements and hands them to the sink.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{ChannelId, DiffReport, DocumentRecord, RoleId},
    ports::NotifySink,
    Result,
};

/// Announces diff results to the configured channel.
///
/// Channel and role come from config at construction time. If either is
/// unset, announcements are skipped with a warning; that is a configuration
/// problem for the operator, not a pipeline failure.
pub struct Notifier {
    sink: Arc<dyn NotifySink>,
    channel: Option<ChannelId>,
    role: Option<RoleId>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotifySink>, channel: Option<ChannelId>, role: Option<RoleId>) -> Self {
        Self {
            sink,
            channel,
            role,
        }
    }

    /// Sends at most two messages: one for new records, one for modified.
    /// An empty report sends nothing.
    pub async fn announce(&self, report: &DiffReport) -> Result<()> {
        if report.is_empty() {
            info!("no new or modified documents found");
            return Ok(());
        }

        let (Some(channel), Some(role)) = (self.channel, self.role) else {
            warn!("CHANNEL_ID or ROLE_ID not configured, skipping announcements");
            return Ok(());
        };

        if !report.new.is_empty() {
            info!(count = report.new.len(), "announcing new documents");
            let msg = format_new(&role, &report.new);
            self.sink.send(channel, &msg).await?;
        }

        if !report.modified.is_empty() {
            info!(count = report.modified.len(), "announcing modified documents");
            let msg = format_modified(&role, &report.modified);
            self.sink.send(channel, &msg).await?;
        }

        Ok(())
    }
}

fn format_new(role: &RoleId, records: &[DocumentRecord]) -> String {
    let mut parts = vec![format!("{} **New Documents Posted:**\n", role.mention())];
    for r in records {
        parts.push(format!("> **{}:**\n> {}", r.title, r.url));
    }
    parts.join("\n")
}

fn format_modified(role: &RoleId, records: &[DocumentRecord]) -> String {
    let mut parts = vec![format!("{} **Documents Have Been Updated:**\n", role.mention())];
    for r in records {
        parts.push(format!("> **{}:** **(Updated)**\n> {}", r.title, r.url));
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(ChannelId, String)>>,
    }

    #[async_trait::async_trait]
    impl NotifySink for RecordingSink {
        async fn send(&self, channel: ChannelId, content: &str) -> Result<()> {
            self.sent.lock().await.push((channel, content.to_string()));
            Ok(())
        }
    }

    fn rec(title: &str, url: &str) -> DocumentRecord {
        DocumentRecord {
            title: title.to_string(),
            url: url.to_string(),
            document_id: None,
            filename: None,
        }
    }

    fn notifier(sink: Arc<RecordingSink>) -> Notifier {
        Notifier::new(sink, Some(ChannelId(111)), Some(RoleId(222)))
    }

    #[tokio::test]
    async fn empty_report_sends_nothing() {
        let sink = Arc::new(RecordingSink::default());
        notifier(sink.clone())
            .announce(&DiffReport::default())
            .await
            .unwrap();
        assert!(sink.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn new_and_modified_go_out_as_separate_messages() {
        let sink = Arc::new(RecordingSink::default());
        let report = DiffReport {
            new: vec![rec("Fresh", "u1")],
            modified: vec![rec("Changed", "u2")],
        };
        notifier(sink.clone()).announce(&report).await.unwrap();

        let sent = sink.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, ChannelId(111));
        assert!(sent[0].1.starts_with("<@&222> **New Documents Posted:**"));
        assert!(sent[0].1.contains("> **Fresh:**\n> u1"));
        assert!(sent[1].1.starts_with("<@&222> **Documents Have Been Updated:**"));
        assert!(sent[1].1.contains("> **Changed:** **(Updated)**\n> u2"));
    }

    #[tokio::test]
    async fn only_modified_sends_one_message() {
        let sink = Arc::new(RecordingSink::default());
        let report = DiffReport {
            new: vec![],
            modified: vec![rec("Changed", "u2")],
        };
        notifier(sink.clone()).announce(&report).await.unwrap();
        assert_eq!(sink.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn unresolved_channel_skips_silently() {
        let sink = Arc::new(RecordingSink::default());
        let n = Notifier::new(sink.clone(), None, Some(RoleId(222)));
        let report = DiffReport {
            new: vec![rec("Fresh", "u1")],
            modified: vec![],
        };
        n.announce(&report).await.unwrap();
        assert!(sink.sent.lock().await.is_empty());
    }
}
