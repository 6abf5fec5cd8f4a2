//! Inbound message routing.

use crate::config::DicebotConfig;
use crate::metrics::BotMetrics;
use crate::notation::{DefaultNotation, Mode};
use dicebot_cache::IdempotencyCache;
use dicebot_dice::Evaluator;
use dicebot_error::{DiceError, DiceErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const ROLL_PREFIX: &str = "r";
const MODE_PREFIX: &str = "mode";
const EXPRESSION_PREFIX: char = '=';

/// A chat message as delivered by the platform adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Platform message id, used as the idempotency key
    pub message_id: String,
    /// Plain text of the message
    pub text: String,
    /// Text of the message this one replies to, if any
    #[serde(default)]
    pub parent_text: Option<String>,
}

impl InboundEvent {
    /// Creates an event that is not a reply.
    pub fn new(message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            text: text.into(),
            parent_text: None,
        }
    }

    /// Marks the event as a reply to a message with `parent_text`.
    pub fn with_parent(mut self, parent_text: impl Into<String>) -> Self {
        self.parent_text = Some(parent_text.into());
        self
    }
}

/// What the router decided to do with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Event key already admitted; nothing was processed
    Duplicate,
    /// Not a command; no reply
    Ignored,
    /// Send this text back to the user
    Reply(String),
}

impl Dispatch {
    /// The reply text, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            Dispatch::Reply(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Consumes the dispatch, returning the reply text.
    pub fn into_reply(self) -> Option<String> {
        match self {
            Dispatch::Reply(text) => Some(text),
            _ => None,
        }
    }
}

/// Evaluates `=` arithmetic commands.
///
/// Implemented outside this crate; the router only forwards the expression
/// text and renders the outcome.
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluates `expression`, returning its rendered value.
    fn evaluate(&self, expression: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Routes inbound events to the roll, mode and expression handlers.
///
/// Clones share the cache, default notation and metrics.
#[derive(Clone)]
pub struct MessageRouter {
    cache: IdempotencyCache,
    evaluator: Arc<Evaluator>,
    notation: DefaultNotation,
    expressions: Option<Arc<dyn ExpressionEvaluator>>,
    metrics: BotMetrics,
    mention_token: String,
    roll_timeout: Duration,
}

impl MessageRouter {
    /// Creates a router over `cache` using `config`.
    pub fn new(cache: IdempotencyCache, config: &DicebotConfig, metrics: BotMetrics) -> Self {
        Self {
            cache,
            evaluator: Arc::new(Evaluator::new(&config.dice)),
            notation: DefaultNotation::new(config.dice.default_notation().clone()),
            expressions: None,
            metrics,
            mention_token: config.server.mention_token().clone(),
            roll_timeout: config.dice.roll_timeout(),
        }
    }

    /// Attaches an evaluator for `=` commands.
    pub fn with_expressions(mut self, expressions: Arc<dyn ExpressionEvaluator>) -> Self {
        self.expressions = Some(expressions);
        self
    }

    /// Shared default notation.
    pub fn notation(&self) -> &DefaultNotation {
        &self.notation
    }

    /// Metrics collector.
    pub fn metrics(&self) -> &BotMetrics {
        &self.metrics
    }

    /// Handle one inbound event.
    #[instrument(skip(self, event), fields(event_key = %event.message_id))]
    pub async fn handle(&self, event: &InboundEvent) -> Dispatch {
        self.metrics.record_event();

        if !self.cache.check_and_mark(&event.message_id) {
            debug!("Dropping duplicate event");
            self.metrics.record_duplicate();
            return Dispatch::Duplicate;
        }

        let text = event.text.trim();
        info!(text, "New message");

        if let Some(expression) = text.strip_prefix(EXPRESSION_PREFIX) {
            return self.handle_expression(expression);
        }

        if let Some(argument) = text.strip_prefix(MODE_PREFIX) {
            return self.handle_mode(argument.trim());
        }

        match self.extract_descriptor(text, event.parent_text.as_deref()) {
            Some(descriptor) => self.roll(descriptor).await,
            None => {
                debug!(text, "Ignoring message as it is not a roll message");
                self.metrics.record_ignored();
                Dispatch::Ignored
            }
        }
    }

    fn handle_expression(&self, expression: &str) -> Dispatch {
        let Some(evaluator) = &self.expressions else {
            debug!("No expression evaluator configured");
            self.metrics.record_ignored();
            return Dispatch::Ignored;
        };

        self.metrics.record_expression();
        match evaluator.evaluate(expression) {
            Ok(value) => Dispatch::Reply(format!("{}：{}", expression, value)),
            Err(e) => {
                warn!(expression, error = %e, "Expression evaluation failed");
                Dispatch::Reply(format!(
                    "已识别 evaluation 命令，但在 evaluate 时出现了问题：{}",
                    e
                ))
            }
        }
    }

    fn handle_mode(&self, argument: &str) -> Dispatch {
        match Mode::from_str(argument) {
            Ok(mode) => {
                let previous = self.notation.apply(mode);
                info!(
                    mode = mode.label(),
                    %previous,
                    current = mode.default_notation(),
                    "Switched mode"
                );
                self.metrics.record_mode_change();
                Dispatch::Reply(format!(
                    "已切换到 {} 模式 (default roll expression: {})",
                    mode.label(),
                    mode.default_notation()
                ))
            }
            Err(_) => Dispatch::Reply("模式不存在，请输入 mode coc 或 mode dnd".to_string()),
        }
    }

    /// Pull a roll descriptor out of message text.
    ///
    /// A bare mention replying to an earlier roll rerolls that roll's
    /// descriptor. `r` alone rolls the default notation. `r <descriptor>`
    /// rolls the descriptor.
    fn extract_descriptor(&self, text: &str, parent_text: Option<&str>) -> Option<String> {
        if text == self.mention_token
            && let Some(parent) = parent_text
        {
            let parent = parent.trim();
            let parent = parent.strip_prefix("r ").unwrap_or(parent).trim();
            let descriptor = parent.split(':').next().unwrap_or_default();
            return Some(descriptor.to_string());
        }

        if text == ROLL_PREFIX {
            return Some(self.notation.get());
        }

        text.strip_prefix("r ")
            .map(|descriptor| descriptor.trim().to_string())
    }

    async fn roll(&self, descriptor: String) -> Dispatch {
        info!(%descriptor, "Rolling");

        let evaluator = Arc::clone(&self.evaluator);
        let task_descriptor = descriptor.clone();
        let start = Instant::now();
        let task = tokio::task::spawn_blocking(move || evaluator.evaluate(&task_descriptor));
        let result = match tokio::time::timeout(self.roll_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(DiceError::new(DiceErrorKind::Evaluation(format!(
                "roll task aborted: {}",
                e
            )))),
            Err(_) => Err(DiceError::new(DiceErrorKind::Evaluation(format!(
                "timed out after {} ms",
                self.roll_timeout.as_millis()
            )))),
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(%descriptor, elapsed_ms, "Rolling cost");

        match result {
            Ok(summary) => {
                info!(%descriptor, summary_len = summary.len(), "Roll result");
                self.metrics.record_roll_success();
                Dispatch::Reply(summary)
            }
            Err(e) if e.is_ignorable() => {
                debug!(%descriptor, "Descriptor is not a roll");
                self.metrics.record_ignored();
                Dispatch::Ignored
            }
            Err(e) => {
                warn!(%descriptor, error = %e, "Failed to roll dice");
                self.metrics.record_roll_failure();
                Dispatch::Reply(format!(
                    "已识别 roll 命令，但在 roll 时出现了问题：{}",
                    e.diagnostic()
                ))
            }
        }
    }
}
