#![forbid(unsafe_code)]

//! Read-mostly operator commands over a portal store.

use clap::{Parser, Subcommand, ValueEnum};
use portal_engines::completion::CompletionEngine;
use portal_engines::field_format;
use portal_engines::visibility::{self, FieldRenderer};
use portal_kernel_contracts::client::{ClientId, ClientRecord};
use portal_kernel_contracts::client_schema::ClientField;
use portal_kernel_contracts::role::PortalRole;
use portal_os::client_list::{ClientListView, ClientSort};
use portal_os::config::PortalConfig;
use portal_os::dashboard::DashboardMetrics;
use portal_os::dispatcher::LoopbackDispatcher;
use portal_os::households::HouseholdsView;
use portal_os::ports::{CrmTarget, StorePersistence};
use portal_storage::portal_store::PortalStore;
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "portal")]
#[command(about = "Client onboarding portal operator CLI")]
#[command(
    after_help = "Environment:\n  PORTAL_LOG   Log filter (falls back to RUST_LOG, then warn)\n  PORTAL_SEARCH_MAX_RESULTS, PORTAL_NEEDS_ATTENTION_BELOW, PORTAL_COMPLETION_GATES_ON_VALIDITY"
)]
pub struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,
    #[command(subcommand)]
    pub command: PortalCliCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortalCliCommand {
    /// List clients with completion.
    Clients {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, value_enum, default_value_t = SortArg::Priority)]
        sort: SortArg,
    },
    /// Completion breakdown for one client.
    Completion { client_id: String },
    /// Render a client record the way a role would see it.
    View {
        client_id: String,
        #[arg(long, default_value = "advisor")]
        role: String,
    },
    /// Advisory format warnings for one client.
    Check { client_id: String },
    Dashboard,
    Households {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Run a CRM export through the loopback dispatcher.
    Export {
        #[arg(long)]
        target: String,
        #[arg(required = true)]
        client_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Priority,
    Completion,
    Name,
}

impl From<SortArg> for ClientSort {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Priority => ClientSort::Priority,
            SortArg::Completion => ClientSort::Completion,
            SortArg::Name => ClientSort::Name,
        }
    }
}

pub fn execute_portal_command(
    mut store: PortalStore,
    config: &PortalConfig,
    command: &PortalCliCommand,
) -> Result<Value, String> {
    store.set_completion_config(config.completion);
    match command {
        PortalCliCommand::Clients { query, sort } => {
            let mut view = ClientListView::new(config);
            view.search(query);
            view.sort_by((*sort).into());
            to_value(view.items(&store))
        }
        PortalCliCommand::Completion { client_id } => {
            let record = require_record(&store, client_id)?;
            to_value(CompletionEngine::new(config.completion).report(record))
        }
        PortalCliCommand::View { client_id, role } => {
            let record = require_record(&store, client_id)?;
            let role = PortalRole::parse(role);
            let renderer = FieldRenderer::new(config.visibility);
            let fields: Vec<Value> = ClientField::all()
                .map(|field| {
                    let view = visibility::field_view_for_record(role, field, record);
                    json!({
                        "field": field.name(),
                        "text": renderer.render_field(role, record, field),
                        "editable": view.editable,
                        "masked": view.masked,
                    })
                })
                .collect();
            Ok(json!({ "role": role.as_str(), "fields": fields }))
        }
        PortalCliCommand::Check { client_id } => {
            let record = require_record(&store, client_id)?;
            to_value(field_format::check_record(record))
        }
        PortalCliCommand::Dashboard => to_value(DashboardMetrics::compute(&store, config)),
        PortalCliCommand::Households { query } => {
            let mut view = HouseholdsView::default();
            view.search(query);
            let stats = view.stats(&store);
            Ok(json!({
                "households": to_value(view.visible(&store))?,
                "count": stats.count,
                "totalAUM": stats.total_aum_usd,
                "averageSize": stats.average_size.to_string(),
            }))
        }
        PortalCliCommand::Export { target, client_ids } => {
            let target = CrmTarget::parse(target).ok_or_else(|| {
                let allowed: Vec<&str> = CrmTarget::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown CRM target '{target}'. allowed: {}", allowed.join(", "))
            })?;
            let mut view = ClientListView::new(config);
            for raw in client_ids {
                let id = parse_client_id(raw)?;
                if store.client_row(&id).is_none() {
                    return Err(format!("unknown client id '{raw}'"));
                }
                view.select(&id);
            }
            let batch = view.export_selected(target).map_err(|e| e.to_string())?;
            let mut dispatcher = LoopbackDispatcher::loopback(StorePersistence::new(store));
            to_value(dispatcher.execute(batch).notification)
        }
    }
}

fn parse_client_id(raw: &str) -> Result<ClientId, String> {
    ClientId::new(raw).map_err(|e| format!("invalid client id '{raw}': {e}"))
}

fn require_record<'a>(store: &'a PortalStore, raw: &str) -> Result<&'a ClientRecord, String> {
    let id = parse_client_id(raw)?;
    store
        .client_row(&id)
        .map(|row| &row.record)
        .ok_or_else(|| format!("unknown client id '{raw}'"))
}

fn to_value<T: serde::Serialize>(v: T) -> Result<Value, String> {
    serde_json::to_value(v).map_err(|e| format!("failed to encode output: {e}"))
}
