//! Telegram bot front end
//!
//! Conversation flow: `/start` greets with a START button, the user sends a
//! whitespace-separated wallet list, picks an output format from an inline
//! keyboard, and the analysis runs in a background task while a single
//! status message is edited with per-stage progress. Results arrive as one
//! text message per wallet and/or an attached CSV file.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, MessageId};
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::core::error::AppResult;
use crate::core::types::{OutputFormat, WalletMetrics};
use crate::services::analyzer::{ProgressSink, TaskProgress, WalletAnalyzer, WalletQueue};
use crate::services::endpoints::EndpointRotator;
use crate::services::report;
use crate::services::solana::SolanaRpcClient;
use super::keyboards;

/// Bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "start using the bot")]
    Start,
    #[command(description = "show usage help")]
    Help,
}

/// Wallet list awaiting a format selection
struct PendingSession {
    queue: WalletQueue,
}

/// Shared state of the bot front end
pub struct BotContext {
    pub analyzer: Arc<WalletAnalyzer>,
    pub rpc_pool: Arc<EndpointRotator>,
    pub commitment: String,
    pub connection_timeout_ms: u64,
    pub report_dir: PathBuf,
    sessions: DashMap<i64, PendingSession>,
}

impl BotContext {
    pub fn new(
        analyzer: Arc<WalletAnalyzer>,
        rpc_pool: Arc<EndpointRotator>,
        config: &AppConfig,
    ) -> Self {
        Self {
            analyzer,
            rpc_pool,
            commitment: config.solana.commitment.clone(),
            connection_timeout_ms: config.solana.connection_timeout_ms,
            report_dir: PathBuf::from(&config.report.output_dir),
            sessions: DashMap::new(),
        }
    }
}

/// Run the bot until the process is stopped
pub async fn run(bot: Bot, context: Arc<BotContext>) {
    info!("Starting Telegram bot dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_wallets))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![context])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(bot: Bot, msg: Message, command: Command) -> AppResult<()> {
    match command {
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "What can this bot do? Check ALL your Meteora metrics!",
            )
            .reply_markup(keyboards::start_keyboard())
            .await?;
        }
        Command::Help => {
            bot.send_message(
                msg.chat.id,
                "This bot analyzes Solana wallets for Meteora metrics.\n\n\
                 Send wallet addresses separated by spaces, then pick an \
                 output format. You will get per-wallet stats and optionally \
                 a CSV report.\n\n\
                 Commands:\n\
                 /start - Start using the bot\n\
                 /help - Show this help",
            )
            .await?;
        }
    }
    Ok(())
}

/// A plain text message is treated as a wallet list
async fn handle_wallets(bot: Bot, msg: Message, context: Arc<BotContext>) -> AppResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let queue = WalletQueue::from_input(text);
    if queue.is_empty() {
        bot.send_message(
            msg.chat.id,
            "No valid wallet addresses found. Please try again.",
        )
        .await?;
        return Ok(());
    }

    let count = queue.len();
    context
        .sessions
        .insert(user.id.0 as i64, PendingSession { queue });

    bot.send_message(
        msg.chat.id,
        format!("Found {} wallet(s). Please select output format:", count),
    )
    .reply_markup(keyboards::format_keyboard())
    .await?;

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    context: Arc<BotContext>,
) -> AppResult<()> {
    bot.answer_callback_query(query.id.clone()).await?;

    let Some(message) = query.regular_message() else {
        return Ok(());
    };
    let chat_id = message.chat.id;
    let message_id = message.id;
    let data = query.data.as_deref().unwrap_or("");
    let user_id = query.from.id.0 as i64;

    if data == keyboards::START_CALLBACK {
        bot.edit_message_text(chat_id, message_id, "Send me wallets separated by spaces")
            .await?;
        return Ok(());
    }

    let Some(format) = keyboards::parse_format_callback(data) else {
        warn!(data, "Unknown callback data");
        return Ok(());
    };

    let Some((_, session)) = context.sessions.remove(&user_id) else {
        bot.edit_message_text(chat_id, message_id, "No wallets found. Please start over.")
            .await?;
        return Ok(());
    };

    bot.edit_message_text(
        chat_id,
        message_id,
        format!(
            "Processing {} wallet(s)... This may take some time.",
            session.queue.len()
        ),
    )
    .await?;

    let progress_message = bot
        .send_message(
            chat_id,
            format!("Processing 1/{} wallets..", session.queue.len()),
        )
        .await?;

    // Run the batch in the background so the dispatcher stays responsive
    tokio::spawn(run_analysis(
        bot,
        context,
        chat_id,
        progress_message.id,
        user_id,
        session.queue,
        format,
    ));

    Ok(())
}

async fn run_analysis(
    bot: Bot,
    context: Arc<BotContext>,
    chat_id: ChatId,
    progress_message_id: MessageId,
    user_id: i64,
    queue: WalletQueue,
    format: OutputFormat,
) {
    let endpoint = context.rpc_pool.lease(user_id);
    let rpc = SolanaRpcClient::new(endpoint, &context.commitment, context.connection_timeout_ms);

    let total = queue.len();
    let mut results = Vec::with_capacity(total);

    for (index, wallet) in queue.iter().enumerate() {
        let sink = MessageProgressSink {
            bot: bot.clone(),
            chat_id,
            message_id: progress_message_id,
            wallet_position: index + 1,
            wallet_total: total,
        };
        let metrics = match context.analyzer.analyze(&rpc, wallet, &sink).await {
            Ok(metrics) => metrics,
            Err(e) => {
                error!(wallet = %wallet, error = %e, "Wallet analysis failed");
                WalletMetrics::new(wallet.clone())
            }
        };
        results.push(metrics);
    }

    if let Err(e) = bot.delete_message(chat_id, progress_message_id).await {
        warn!(error = %e, "Failed to delete progress message");
    }

    if let Err(e) = deliver_results(&bot, &context, chat_id, &results, format).await {
        error!(error = %e, "Failed to deliver results");
        let _ = bot
            .send_message(chat_id, "Something went wrong while sending the results.")
            .await;
    }

    context.rpc_pool.release(user_id);
}

async fn deliver_results(
    bot: &Bot,
    context: &BotContext,
    chat_id: ChatId,
    results: &[WalletMetrics],
    format: OutputFormat,
) -> AppResult<()> {
    if format.wants_text() {
        for (index, metrics) in results.iter().enumerate() {
            bot.send_message(chat_id, report::format_wallet_block(index + 1, metrics))
                .await?;
        }
    }

    if format.wants_csv() {
        let path = report::write_csv_report(results, &context.report_dir)?;
        bot.send_document(chat_id, InputFile::file(path)).await?;
    }

    bot.send_message(
        chat_id,
        format!("Analysis complete for {} wallet(s)!", results.len()),
    )
    .await?;

    Ok(())
}

/// Progress sink that edits the batch status message
struct MessageProgressSink {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
    wallet_position: usize,
    wallet_total: usize,
}

#[async_trait]
impl ProgressSink for MessageProgressSink {
    async fn report(&self, progress: &TaskProgress) {
        let text = format!(
            "Processing {}/{} wallets..\n{}",
            self.wallet_position, self.wallet_total, progress
        );
        // Telegram rejects edits that do not change the text, not worth failing over
        if let Err(e) = self
            .bot
            .edit_message_text(self.chat_id, self.message_id, text)
            .await
        {
            warn!(error = %e, "Failed to update progress message");
        }
    }
}
