//! Write path: windowing followed by redrive

use crate::common::assertions::OutcomeAssertions;
use crate::common::{Event, EventFactory, MockEventSender};
use futures::StreamExt;
use mockall::Sequence;
use redrive::{
    BatchResult, BatchWriter, CountOnly, EntryResult, ExhaustReason, JsonSizer, PipelineError,
    RedriveConfig, TransportError, WindowConfig, collect_report,
};
use std::time::Duration;

fn redrive() -> RedriveConfig {
    RedriveConfig::default().with_throttle(Duration::ZERO)
}

#[tokio::test]
async fn test_thirty_events_with_batch_write_limits() {
    let mut sender = MockEventSender::new();
    let mut seq = Sequence::new();
    sender
        .expect_send_batch()
        .withf(|items| items.len() == 25 && items[0].id == 0)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(BatchResult::all_processed()));
    sender
        .expect_send_batch()
        .withf(|items| items.len() == 5 && items[0].id == 25)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(BatchResult::all_processed()));

    let writer = BatchWriter::new(sender, WindowConfig::batch_write(), redrive(), CountOnly);
    let outcomes: Vec<_> = writer.write_iter(EventFactory::batch(30)).collect().await;

    let delivered = outcomes.assert_all_delivered();
    assert_eq!(delivered, EventFactory::batch(30));
}

#[tokio::test]
async fn test_event_put_entries_are_redriven() {
    let mut sender = MockEventSender::new();
    let mut calls = 0;
    sender.expect_send_batch().times(2).returning(move |items: &[Event]| {
        calls += 1;
        let entries = items
            .iter()
            .map(|event| {
                if calls == 1 && event.id == 1 {
                    EntryResult::rejected("ThrottlingException")
                } else {
                    EntryResult::accepted(format!("entry-{}", event.id))
                }
            })
            .collect::<Vec<_>>();
        Ok(BatchResult::from_entries(entries))
    });

    let writer = BatchWriter::new(sender, WindowConfig::event_put(), redrive(), JsonSizer);
    let report = collect_report(writer.write_iter(EventFactory::batch(3)))
        .await
        .unwrap();

    assert_eq!(report.delivered, 3);
    assert_eq!(report.max_attempts, 2);
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_byte_limit_splits_large_events() {
    let mut sender = MockEventSender::new();
    let mut seq = Sequence::new();
    for expected in [2usize, 2, 1] {
        sender
            .expect_send_batch()
            .withf(move |items| items.len() == expected)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(BatchResult::all_processed()));
    }

    let events: Vec<Event> = (0..5).map(|id| EventFactory::sized(id, 100_000)).collect();
    let writer = BatchWriter::new(sender, WindowConfig::event_put(), redrive(), JsonSizer);
    let outcomes: Vec<_> = writer.write_iter(events).collect().await;

    assert_eq!(outcomes.assert_all_delivered().len(), 5);
}

#[tokio::test]
async fn test_event_over_limit_is_fatal() {
    let mut sender = MockEventSender::new();
    sender.expect_send_batch().never();

    let writer = BatchWriter::new(sender, WindowConfig::event_put(), redrive(), JsonSizer);
    let result = collect_report(writer.write_iter(vec![EventFactory::sized(0, 300_000)])).await;

    match result {
        Err(PipelineError::SizeExceeded(e)) => {
            assert_eq!(e.index, 0);
            assert_eq!(e.limit, 256_000);
            assert!(e.size > 300_000);
        }
        other => panic!("expected size error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_call_stops_the_run() {
    let mut sender = MockEventSender::new();
    let mut seq = Sequence::new();
    sender
        .expect_send_batch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(BatchResult::all_processed()));
    sender
        .expect_send_batch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(TransportError::rate_limited("Rate exceeded")));

    let writer = BatchWriter::new(sender, WindowConfig::count_only(10), redrive(), CountOnly);
    let outcomes: Vec<_> = writer.write_iter(EventFactory::batch(30)).collect().await;

    assert_eq!(outcomes.len(), 11);
    assert!(outcomes[..10].iter().all(|o| o.is_ok()));
    match &outcomes[10] {
        Err(PipelineError::Transport(e)) => assert!(e.is_rate_limited()),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dead_letters_carry_code_and_payload() {
    let mut sender = MockEventSender::new();
    sender.expect_send_batch().returning(|items: &[Event]| {
        let mut result = BatchResult::all_processed();
        for (index, event) in items.iter().enumerate() {
            if event.id % 2 == 1 {
                result.push(index, Some("ThrottlingException".to_string()));
            }
        }
        Ok(result)
    });

    let writer = BatchWriter::new(
        sender,
        WindowConfig::count_only(4),
        redrive().with_max_attempts(3),
        CountOnly,
    );
    let report = collect_report(writer.write_iter(EventFactory::batch(4)))
        .await
        .unwrap();

    assert_eq!(report.delivered, 2);
    let mut failed: Vec<u32> = report.failed.iter().map(|f| f.item.id).collect();
    failed.sort();
    assert_eq!(failed, vec![1, 3]);
    for dead in &report.failed {
        assert_eq!(dead.attempts, 3);
        assert_eq!(dead.reason, ExhaustReason::AttemptsExhausted);
        assert_eq!(dead.error_code.as_deref(), Some("ThrottlingException"));
        assert!(dead.to_string().contains("ThrottlingException"));
    }
}
