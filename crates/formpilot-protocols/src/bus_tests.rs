use super::*;
use crate::message::AutofillOutcome;

#[tokio::test]
async fn test_request_reply_round_trip() {
    let (endpoint, mut mailbox) = mailbox();

    tokio::spawn(async move {
        while let Some(delivery) = mailbox.next().await {
            let message = delivery.message().unwrap();
            assert_eq!(message, AutofillMessage::ScanAndFill);
            delivery
                .respond(&AutofillMessage::result(AutofillOutcome::filled(2)))
                .unwrap();
        }
    });

    let reply = endpoint.request(&AutofillMessage::ScanAndFill).await.unwrap();
    assert_eq!(reply.into_outcome().unwrap(), AutofillOutcome::filled(2));
}

#[tokio::test]
async fn test_request_fails_when_mailbox_dropped() {
    let (endpoint, mailbox) = mailbox();
    drop(mailbox);

    let err = endpoint
        .request(&AutofillMessage::ScanAndFill)
        .await
        .unwrap_err();
    assert!(matches!(err, BusError::NotListening));
}

#[tokio::test]
async fn test_request_fails_when_listener_drops_delivery() {
    let (endpoint, mut mailbox) = mailbox();

    tokio::spawn(async move {
        // Receive and discard without responding.
        let _ = mailbox.next().await;
    });

    let err = endpoint
        .request(&AutofillMessage::ScanAndFill)
        .await
        .unwrap_err();
    assert!(matches!(err, BusError::NotListening));
}

#[tokio::test]
async fn test_payload_crosses_serialized() {
    let (endpoint, mut mailbox) = mailbox();

    tokio::spawn(async move {
        let delivery = mailbox.next().await.unwrap();
        // The mailbox sees a JSON payload, not a shared structure.
        let message = delivery.message().unwrap();
        let AutofillMessage::AutofillResponse { mapping } = message else {
            panic!("wrong variant");
        };
        assert_eq!(mapping.len(), 1);
        delivery
            .respond(&AutofillMessage::result(AutofillOutcome::filled(1)))
            .unwrap();
    });

    let mut mapping = crate::message::FieldMapping::new();
    mapping.insert("name".to_string(), "Ada Lovelace".to_string());
    let reply = endpoint
        .request(&AutofillMessage::AutofillResponse { mapping })
        .await
        .unwrap();
    assert!(reply.into_outcome().unwrap().success);
}
