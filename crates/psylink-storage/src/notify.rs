use std::fmt;

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Logical areas whose stored value may change under an open view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeDomain {
    Links,
    QuestionTypes,
    AuditLogs,
    Backups,
    ImportTasks,
}

impl ChangeDomain {
    /// Event name the browser dashboard listens for.
    pub fn event_name(self) -> &'static str {
        match self {
            ChangeDomain::Links => "links-updated",
            ChangeDomain::QuestionTypes => "question-types-updated",
            ChangeDomain::AuditLogs => "audit-logs-updated",
            ChangeDomain::Backups => "backups-updated",
            ChangeDomain::ImportTasks => "import-tasks-updated",
        }
    }
}

impl fmt::Display for ChangeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Publish/subscribe channel of "re-read this domain" signals.
///
/// Cloning yields another handle to the same channel. Signals sent while no
/// one is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<ChangeDomain>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn notify(&self, domain: ChangeDomain) {
        let receivers = self.tx.send(domain).unwrap_or(0);
        tracing::debug!(%domain, receivers, "change signal");
    }

    pub fn notify_all(&self, domains: &[ChangeDomain]) {
        for domain in domains {
            self.notify(*domain);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeDomain> {
        self.tx.subscribe()
    }
}
