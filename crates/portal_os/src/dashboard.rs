#![forbid(unsafe_code)]

use portal_engines::completion::CompletionEngine;
use portal_storage::repo::{ClientTablesRepo, DocumentMessageTablesRepo};
use serde::Serialize;

use crate::config::PortalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub client_count: usize,
    pub total_aum_usd: u64,
    /// Rounded half-up; 0 when there are no clients.
    pub average_completion: u8,
    pub needs_attention: usize,
    pub unread_messages: usize,
}

impl DashboardMetrics {
    /// Completion is scored under `config.completion`, the same rules the
    /// client form and list use.
    pub fn compute<R>(repo: &R, config: &PortalConfig) -> Self
    where
        R: ClientTablesRepo + DocumentMessageTablesRepo,
    {
        let engine = CompletionEngine::new(config.completion);
        let mut client_count = 0usize;
        let mut total_aum_usd = 0u64;
        let mut completion_sum = 0usize;
        let mut needs_attention = 0usize;
        for row in repo.client_rows_all() {
            let completion = engine.percent(&row.record);
            client_count += 1;
            total_aum_usd = total_aum_usd.saturating_add(row.aum_usd);
            completion_sum += usize::from(completion);
            if completion < config.needs_attention_below {
                needs_attention += 1;
            }
        }
        let average_completion = if client_count == 0 {
            0
        } else {
            ((completion_sum + client_count / 2) / client_count) as u8
        };
        Self {
            client_count,
            total_aum_usd,
            average_completion,
            needs_attention,
            unread_messages: repo.unread_message_row_count(),
        }
    }
}
