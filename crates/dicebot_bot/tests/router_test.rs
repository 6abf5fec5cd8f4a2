//! Tests for inbound message routing.

use dicebot_bot::{BotMetrics, DicebotConfig, Dispatch, ExpressionEvaluator, InboundEvent, MessageRouter};
use dicebot_cache::{IdempotencyCache, IdempotencyCacheConfig};
use std::sync::Arc;

fn router_with(config: &DicebotConfig) -> MessageRouter {
    let cache = IdempotencyCache::new(IdempotencyCacheConfig::default());
    MessageRouter::new(cache, config, BotMetrics::new())
}

fn router() -> MessageRouter {
    router_with(&DicebotConfig::default())
}

fn reply(dispatch: Dispatch) -> String {
    dispatch.into_reply().expect("expected a reply")
}

struct FixedEvaluator;

impl ExpressionEvaluator for FixedEvaluator {
    fn evaluate(&self, expression: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        match expression {
            "1+1" => Ok("2".to_string()),
            other => Err(format!("cannot evaluate {}", other).into()),
        }
    }
}

#[tokio::test]
async fn test_roll_command_replies_with_summary() {
    let router = router();
    let text = reply(router.handle(&InboundEvent::new("om_1", "r 3d6")).await);

    assert!(text.starts_with("r 3d6: "), "{text}");
    assert_eq!(router.metrics().rolls(), 1);
}

#[tokio::test]
async fn test_surrounding_whitespace_is_trimmed() {
    let router = router();
    let text = reply(router.handle(&InboundEvent::new("om_1", "  r   2d4  ")).await);
    assert!(text.starts_with("r 2d4: "), "{text}");
}

#[tokio::test]
async fn test_duplicate_event_is_dropped() {
    let router = router();
    let event = InboundEvent::new("om_dup", "r 1d6");

    assert!(matches!(router.handle(&event).await, Dispatch::Reply(_)));
    assert_eq!(router.handle(&event).await, Dispatch::Duplicate);
    assert_eq!(router.handle(&event).await, Dispatch::Duplicate);

    let snapshot = router.metrics().snapshot();
    assert_eq!(snapshot.events_received, 3);
    assert_eq!(snapshot.duplicates_dropped, 2);
    assert_eq!(snapshot.rolls, 1);
}

#[tokio::test]
async fn test_duplicate_of_ignored_message_is_still_dropped() {
    let router = router();
    let event = InboundEvent::new("om_chat", "good morning");

    assert_eq!(router.handle(&event).await, Dispatch::Ignored);
    assert_eq!(router.handle(&event).await, Dispatch::Duplicate);
}

#[tokio::test]
async fn test_plain_chat_is_ignored() {
    let router = router();
    for (i, text) in ["hello", "roll 1d6", "rd6", ""].into_iter().enumerate() {
        let dispatch = router.handle(&InboundEvent::new(format!("om_{i}"), text)).await;
        assert_eq!(dispatch, Dispatch::Ignored, "{text:?}");
    }
    assert_eq!(router.metrics().ignored(), 4);
}

#[tokio::test]
async fn test_non_dice_descriptor_is_ignored() {
    let router = router();
    let dispatch = router.handle(&InboundEvent::new("om_1", "r hello")).await;

    assert_eq!(dispatch, Dispatch::Ignored);
    assert_eq!(router.metrics().roll_failures(), 0);
}

#[tokio::test]
async fn test_parse_error_is_reported() {
    let router = router();
    let text = reply(router.handle(&InboundEvent::new("om_1", "r xd6")).await);

    assert!(text.starts_with("已识别 roll 命令"), "{text}");
    assert!(text.contains("\"x\""), "{text}");
    assert!(!text.contains("line"), "location must not leak: {text}");
    assert_eq!(router.metrics().roll_failures(), 1);
}

#[tokio::test]
async fn test_range_error_is_reported() {
    let router = router();
    let text = reply(router.handle(&InboundEvent::new("om_1", "r 100001d6")).await);
    assert!(text.contains("(0, 100000]"), "{text}");
}

#[tokio::test]
async fn test_bare_roll_uses_default_notation() {
    let router = router();
    let text = reply(router.handle(&InboundEvent::new("om_1", "r")).await);
    assert!(text.starts_with("r 1d100: "), "{text}");
}

#[tokio::test]
async fn test_configured_default_notation() {
    let mut config = DicebotConfig::default();
    config.dice = config.dice.with_default_notation("2d10".to_string());
    let router = router_with(&config);

    let text = reply(router.handle(&InboundEvent::new("om_1", "r")).await);
    assert!(text.starts_with("r 2d10: "), "{text}");
}

#[tokio::test]
async fn test_mode_switch_changes_default() {
    let router = router();

    let text = reply(router.handle(&InboundEvent::new("om_1", "mode dnd")).await);
    assert!(text.contains("D&D"), "{text}");
    assert!(text.contains("1d20"), "{text}");
    assert_eq!(router.notation().get(), "1d20");

    let text = reply(router.handle(&InboundEvent::new("om_2", "r")).await);
    assert!(text.starts_with("r 1d20: "), "{text}");

    let text = reply(router.handle(&InboundEvent::new("om_3", "mode  coc ")).await);
    assert!(text.contains("COC"), "{text}");
    assert_eq!(router.notation().get(), "1d100");
    assert_eq!(router.metrics().mode_changes(), 2);
}

#[tokio::test]
async fn test_unknown_mode_keeps_default() {
    let router = router();
    let text = reply(router.handle(&InboundEvent::new("om_1", "mode chess")).await);

    assert!(text.contains("mode coc"), "{text}");
    assert_eq!(router.notation().get(), "1d100");
    assert_eq!(router.metrics().mode_changes(), 0);
}

#[tokio::test]
async fn test_mode_display_names_are_not_commands() {
    let router = router();

    for (id, text) in [("om_1", "mode D&D"), ("om_2", "mode COC"), ("om_3", "mode Dnd")] {
        let dispatch = router.handle(&InboundEvent::new(id, text)).await;
        let reply = dispatch.reply().expect("expected a reply");
        assert!(reply.starts_with("模式不存在"), "{text}: {reply}");
        assert_eq!(router.notation().get(), "1d100", "{text}");
    }
    assert_eq!(router.metrics().mode_changes(), 0);
}

#[tokio::test]
async fn test_mode_is_shared_between_clones() {
    let router = router();
    let other = router.clone();

    reply(router.handle(&InboundEvent::new("om_1", "mode dnd")).await);
    assert_eq!(other.notation().get(), "1d20");
}

#[tokio::test]
async fn test_mention_rerolls_parent() {
    let router = router();
    let event = InboundEvent::new("om_2", "@_user_1").with_parent("r 2d8: 9 (4, 5)");

    let text = reply(router.handle(&event).await);
    assert!(text.starts_with("r 2d8: "), "{text}");
}

#[tokio::test]
async fn test_mention_without_parent_is_ignored() {
    let router = router();
    let dispatch = router.handle(&InboundEvent::new("om_1", "@_user_1")).await;
    assert_eq!(dispatch, Dispatch::Ignored);
}

#[tokio::test]
async fn test_expression_without_evaluator_is_ignored() {
    let router = router();
    let dispatch = router.handle(&InboundEvent::new("om_1", "=1+1")).await;
    assert_eq!(dispatch, Dispatch::Ignored);
}

#[tokio::test]
async fn test_expression_with_evaluator() {
    let router = router().with_expressions(Arc::new(FixedEvaluator));

    let text = reply(router.handle(&InboundEvent::new("om_1", "=1+1")).await);
    assert_eq!(text, "1+1：2");

    let text = reply(router.handle(&InboundEvent::new("om_2", "=1/")).await);
    assert!(text.starts_with("已识别 evaluation 命令"), "{text}");
    assert!(text.contains("cannot evaluate 1/"), "{text}");
    assert_eq!(router.metrics().expressions(), 2);
}

#[tokio::test]
async fn test_roll_timeout_is_reported() {
    let mut config = DicebotConfig::default();
    config.dice = config.dice.with_roll_timeout_ms(0);
    let router = router_with(&config);

    let text = reply(router.handle(&InboundEvent::new("om_1", "r 100000d6")).await);
    assert!(text.contains("timed out"), "{text}");
    assert_eq!(router.metrics().roll_failures(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redelivery_replies_once() {
    let router = router();
    let event = InboundEvent::new("om_storm", "r 1d6");

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let router = router.clone();
            let event = event.clone();
            tokio::spawn(async move { router.handle(&event).await })
        })
        .collect();

    let mut replies = 0;
    for handle in handles {
        if let Dispatch::Reply(_) = handle.await.unwrap() {
            replies += 1;
        }
    }

    assert_eq!(replies, 1);
    assert_eq!(router.metrics().duplicates_dropped(), 31);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bare_rolls_see_a_whole_mode_notation_during_switches() {
    let router = router();
    let barrier = Arc::new(tokio::sync::Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let router = router.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                let mut replies = Vec::new();
                for j in 0..20 {
                    let text = match (i % 4, j % 2) {
                        (0, 0) => "mode dnd",
                        (0, _) => "mode coc",
                        _ => "r",
                    };
                    let event = InboundEvent::new(format!("om_{i}_{j}"), text);
                    if let Some(reply) = router.handle(&event).await.into_reply() {
                        replies.push((text, reply));
                    }
                }
                replies
            })
        })
        .collect();

    for handle in handles {
        for (text, reply) in handle.await.unwrap() {
            if text == "r" {
                assert!(
                    reply.starts_with("r 1d20: ") || reply.starts_with("r 1d100: "),
                    "{reply}"
                );
            }
        }
    }
    assert_eq!(router.metrics().mode_changes(), 80);
}
