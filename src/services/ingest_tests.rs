//! Unit tests for ingestion validation and upsert behavior.

#[cfg(test)]
mod ingest_tests {
    use serde_json::{json, Value};

    use crate::data::store::CashoutStore;
    use crate::error::ApiError;
    use crate::model::IngestPayload;
    use crate::services::ingest::IngestService;

    fn reconcile(body: Value) -> crate::model::IngestRecord {
        let payload: IngestPayload = serde_json::from_value(body.clone()).unwrap();
        payload.reconcile(body)
    }

    #[test]
    fn test_missing_cashout_id_is_rejected_without_writes() {
        let store = CashoutStore::new();
        let service = IngestService::new(store.clone());

        let body = json!({
            "account": { "id": "acct-1" },
            "cashout": { "currency": "ltc", "amount": 1.0 }
        });
        let err = service.ingest(reconcile(body)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // Nothing was stored, not even the account.
        assert!(store.list_accounts().unwrap().is_empty());
    }

    #[test]
    fn test_missing_account_id_is_rejected() {
        let service = IngestService::new(CashoutStore::new());
        let body = json!({
            "cashoutId": "co-1",
            "currency": "ltc"
        });
        let err = service.ingest(reconcile(body)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_ingest_creates_account_and_record() {
        let store = CashoutStore::new();
        let service = IngestService::new(store.clone());

        let body = json!({
            "account": { "id": "acct-1", "name": "Roller" },
            "cashout": {
                "id": "co-1",
                "game": "crash",
                "currency": "ltc",
                "amount": 1.0,
                "payout": 2.0,
                "payoutMultiplier": 2.0
            }
        });
        let outcome = service.ingest(reconcile(body)).unwrap();
        assert!(outcome.inserted);
        assert_eq!(outcome.cashout_id, "co-1");

        let account = store.account("acct-1").unwrap().unwrap();
        assert_eq!(account.name.as_deref(), Some("Roller"));

        let (records, total) = store.cashouts_page("acct-1", 1, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(records[0].game, "crash");
    }

    #[test]
    fn test_reingest_same_id_updates_in_place() {
        let store = CashoutStore::new();
        let service = IngestService::new(store.clone());

        let first = json!({
            "account": { "id": "acct-1" },
            "cashout": { "id": "co-1", "currency": "ltc", "payout": 1.0, "payoutMultiplier": 1.0 }
        });
        assert!(service.ingest(reconcile(first)).unwrap().inserted);

        let second = json!({
            "account": { "id": "acct-1", "name": "Renamed" },
            "cashout": { "id": "co-1", "currency": "btc", "payout": 9.0, "payoutMultiplier": 9.0 }
        });
        let outcome = service.ingest(reconcile(second)).unwrap();
        assert!(!outcome.inserted);

        // Exactly one record, reflecting the second payload.
        let (records, total) = store.cashouts_page("acct-1", 1, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(records[0].currency, "btc");
        assert_eq!(records[0].payout_crypto, 9.0);

        // Display name refreshed on the later sighting.
        let account = store.account("acct-1").unwrap().unwrap();
        assert_eq!(account.name.as_deref(), Some("Renamed"));
    }

    #[test]
    fn test_both_shapes_produce_the_same_stored_record() {
        let store_a = CashoutStore::new();
        let store_b = CashoutStore::new();

        let nested = json!({
            "account": { "id": "acct-1", "name": "N" },
            "cashout": { "id": "co-1", "game": "dice", "currency": "doge", "amount": 100.0, "payout": 150.0 }
        });
        let flat = json!({
            "accountId": "acct-1",
            "accountName": "N",
            "cashoutId": "co-1",
            "game": "dice",
            "currency": "doge",
            "amount": 100.0,
            "payout": 150.0
        });

        IngestService::new(store_a.clone()).ingest(reconcile(nested)).unwrap();
        IngestService::new(store_b.clone()).ingest(reconcile(flat)).unwrap();

        let (a, _) = store_a.cashouts_page("acct-1", 1, 10).unwrap();
        let (b, _) = store_b.cashouts_page("acct-1", 1, 10).unwrap();
        assert_eq!(a[0].external_id, b[0].external_id);
        assert_eq!(a[0].game, b[0].game);
        assert_eq!(a[0].currency, b[0].currency);
        assert_eq!(a[0].amount_crypto, b[0].amount_crypto);
        assert_eq!(a[0].payout_crypto, b[0].payout_crypto);
    }
}
