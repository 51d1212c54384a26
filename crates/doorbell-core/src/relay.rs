// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bounded ring relay on a `crossbeam` channel.
//!
//! Used on hosts and in tests. The producer never blocks; the consumer
//! blocks with no timeout.

use crossbeam::channel::{self, Receiver, Sender};
use doorbell_hal::{QueueFull, RingEvent, RingSink, RingSource};

/// Create a relay queue holding at most `capacity` tokens
pub fn relay_queue(capacity: usize) -> (RelayProducer, RelayConsumer) {
    let (tx, rx) = channel::bounded(capacity);
    (RelayProducer { tx }, RelayConsumer { rx })
}

#[derive(Clone)]
pub struct RelayProducer {
    tx: Sender<RingEvent>,
}

impl RingSink for RelayProducer {
    fn try_push(&self, event: RingEvent) -> Result<(), QueueFull> {
        // A vanished consumer is treated like a full queue: the token is lost
        self.tx.try_send(event).map_err(|_| QueueFull)
    }
}

pub struct RelayConsumer {
    rx: Receiver<RingEvent>,
}

impl RelayConsumer {
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl RingSource for RelayConsumer {
    fn recv(&self) -> Option<RingEvent> {
        self.rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_full_queue_rejects_and_keeps_contents() {
        let (producer, consumer) = relay_queue(3);
        assert!(consumer.is_empty());
        for _ in 0..3 {
            producer.try_push(RingEvent).unwrap();
        }
        assert_eq!(consumer.len(), 3);

        assert_eq!(producer.try_push(RingEvent), Err(QueueFull));
        assert_eq!(consumer.len(), 3);
    }

    #[test]
    fn test_consumer_drains_in_order_then_frees_space() {
        let (producer, consumer) = relay_queue(2);
        producer.try_push(RingEvent).unwrap();
        producer.try_push(RingEvent).unwrap();

        assert_eq!(consumer.recv(), Some(RingEvent));
        assert!(producer.try_push(RingEvent).is_ok());
        assert_eq!(consumer.len(), 2);
    }

    #[test]
    fn test_every_accepted_token_is_delivered_once() {
        let (producer, consumer) = relay_queue(10);
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let producer = producer.clone();
                thread::spawn(move || (0..5).filter(|_| producer.try_push(RingEvent).is_ok()).count())
            })
            .collect();
        drop(producer);

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        let mut delivered = 0;
        while consumer.recv().is_some() {
            delivered += 1;
        }

        assert_eq!(accepted, 10);
        assert_eq!(delivered, accepted);
    }

    #[test]
    fn test_recv_returns_none_after_producers_gone() {
        let (producer, consumer) = relay_queue(4);
        producer.try_push(RingEvent).unwrap();
        drop(producer);

        assert_eq!(consumer.recv(), Some(RingEvent));
        assert_eq!(consumer.recv(), None);
    }

    #[test]
    fn test_push_after_consumer_dropped_is_rejected() {
        let (producer, consumer) = relay_queue(4);
        drop(consumer);
        assert_eq!(producer.try_push(RingEvent), Err(QueueFull));
    }
}
