use colored::{ColoredString, Colorize};
use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use convo_cost::error::CostError;
use convo_cost::formatting::format_number_with_commas;
use convo_cost::types::ConversationCostDisplay;
use convo_cost::{
    ConversationId, CostConfig, CostService, JsonlRecordSource, PricingTable, Result,
};

// Input structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CostRequest {
    records_dir: PathBuf,
    conversation_ids: Vec<ConversationId>,
    #[serde(default)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Force colored output even when not in a TTY
    colored::control::set_override(true);

    // Read the request directly from stdin using stream processing
    let request: CostRequest = serde_json::from_reader(io::stdin())?;

    let config = CostConfig::from_env()?;
    let table = Arc::new(PricingTable::load(&config)?);
    let service = CostService::from_config(
        JsonlRecordSource::new(&request.records_dir),
        table,
        &config,
    );

    let results = service
        .get_multiple_conversation_costs(&request.conversation_ids)
        .await;

    if request.json {
        let output = serde_json::to_string_pretty(&results).map_err(|source| {
            CostError::JsonSerialize {
                context: "cost output".to_string(),
                source,
            }
        })?;
        println!("{}", output);
        return Ok(());
    }

    // One status line per conversation, in request order
    for conversation_id in &request.conversation_ids {
        let line = match results.get(conversation_id) {
            Some(Some(display)) => display_line(display),
            _ => "no usage".dimmed().to_string(),
        };
        println!(
            "{reset_color}{conversation} {line}",
            reset_color = "\x1b[0m",
            conversation = conversation_id.as_str().green(),
            line = line,
        );
    }

    Ok(())
}

fn display_line(display: &ConversationCostDisplay) -> String {
    format!(
        "💰 {cost} 👤 {model} ⚖️ {tokens} tokens 🕒 {updated}",
        cost = colored_cost(display),
        model = display.primary_model.yellow().bold(),
        tokens = format_number_with_commas(display.total_tokens),
        updated = display.last_updated.format("%Y-%m-%d %H:%M").to_string().magenta(),
    )
}

#[inline]
fn colored_cost(display: &ConversationCostDisplay) -> ColoredString {
    if display.total_cost_raw < 0.1 {
        display.total_cost.green()
    } else if display.total_cost_raw < 1.0 {
        display.total_cost.yellow()
    } else {
        display.total_cost.red()
    }
}
