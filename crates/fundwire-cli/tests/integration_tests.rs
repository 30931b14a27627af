//! End-to-end pipeline tests over the library APIs: prompt resolution,
//! extraction with repair, persistence, dedup across channels, and display.

use fundwire_batch::{BatchReport, BatchRunner};
use fundwire_cli::prompt::resolve_system_prompt;
use fundwire_cli::{Formatter, OutputFormat};
use fundwire_domain::{fingerprint, NewExtraction};
use fundwire_extractor::ExtractionClient;
use fundwire_llm::MockChat;
use fundwire_store::SqliteStore;

const ARTICLE: &str =
    "La start-up Acme annonce une levée de fonds de 5 millions d'euros en série A, \
     menée par Alpha Ventures avec la participation de Beta Capital.";

#[tokio::test]
async fn test_full_flow_with_repair_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("fundwire.db");

    // Register a user with a custom prompt override
    let mut store = SqliteStore::new(&db_path).unwrap();
    let user = store.add_user("alice", None).unwrap();
    store
        .update_user_prompt(user.id, Some("Extrais les données de levée en JSON."))
        .unwrap();
    let user = store.user_by_name("alice").unwrap().unwrap();

    let prompt = resolve_system_prompt(&user, std::path::Path::new("/nonexistent")).unwrap();
    assert_eq!(prompt, "Extrais les données de levée en JSON.");

    // First reply is malformed; the repair loop recovers on the second
    let provider = MockChat::new("unused");
    provider.push_reply("Voici les informations demandées !");
    provider.push_reply(
        r#"Bien sûr : {"Nom_start-up": "Acme", "Montant": "5M€", "Tour": "Série A",
            "Investisseurs": ["Alpha Ventures", "Beta Capital"]}"#,
    );
    let client = ExtractionClient::new(provider.clone());

    let fields = client.extract(ARTICLE, &prompt).await.unwrap();
    assert_eq!(provider.call_count(), 2);
    assert_eq!(fields["Montant"], "5M€");

    store
        .upsert_extraction(NewExtraction {
            user_id: user.id,
            content_hash: fingerprint(ARTICLE),
            original_content: ARTICLE.to_string(),
            extracted_data: serde_json::Value::Object(fields),
            source_url: Some("https://presse.example.com/acme".to_string()),
        })
        .unwrap();

    // Reopen the database to prove the record is durable
    let store = SqliteStore::new(&db_path).unwrap();
    let records = store.extractions_for_user(user.id).unwrap();
    assert_eq!(records.len(), 1);

    let formatter = Formatter::new(OutputFormat::Table, false);
    let table = formatter.format_records(&records).unwrap();
    assert!(table.contains("Acme"));
    assert!(table.contains("Alpha Ventures, Beta Capital"));
    assert!(table.contains("https://presse.example.com/acme"));
}

#[tokio::test]
async fn test_same_article_via_two_channels_stays_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("fundwire.db");

    let mut store = SqliteStore::new(&db_path).unwrap();
    let user = store.add_user("alice", None).unwrap();

    // Channel 1: manual paste
    let provider = MockChat::new(r#"{"Nom_start-up": "Acme", "Montant": "5M€"}"#);
    let client = ExtractionClient::new(provider.clone());
    let fields = client.extract(ARTICLE, "prompt").await.unwrap();
    store
        .upsert_extraction(NewExtraction {
            user_id: user.id,
            content_hash: fingerprint(ARTICLE),
            original_content: ARTICLE.to_string(),
            extracted_data: serde_json::Value::Object(fields),
            source_url: None,
        })
        .unwrap();

    // Channel 2: the same article arrives through a CSV batch
    let csv_path = dir.path().join("articles.csv");
    std::fs::write(&csv_path, format!("content\n\"{}\"\n", ARTICLE)).unwrap();

    let client = ExtractionClient::new(provider);
    let mut runner = BatchRunner::new(client, store, user.id, "prompt");
    let report = runner.run_csv(&csv_path).await.unwrap();
    assert_eq!(
        report,
        BatchReport {
            processed: 1,
            succeeded: 1,
            failed: 0
        }
    );

    // Still exactly one record for the article
    let records = runner.store().extractions_for_user(user.id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content_hash, fingerprint(ARTICLE));
}
