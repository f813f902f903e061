use anyhow::Result;
use chrono::NaiveDate;
use sqlx::sqlite::SqlitePool;
use tempfile::NamedTempFile;

use consumables::bot::dialogue_manager::{
    begin_add_dialogue, handle_name_input, process_dialogue_input,
};
use consumables::db::{connect, init_database_schema, list_items_by_owner, ItemSummary};
use consumables::dialogue::ConsumableDialogueState;
use consumables::localization::{init_localization, t_lang};

async fn setup() -> Result<(SqlitePool, NamedTempFile)> {
    init_localization()?;
    let temp_file = NamedTempFile::new()?;
    let pool = connect(&format!("sqlite://{}", temp_file.path().display())).await?;
    init_database_schema(&pool).await?;
    Ok((pool, temp_file))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

const EN: Option<&str> = Some("en");

/// Test the full two-step dialogue commits exactly one row
#[tokio::test]
async fn test_complete_add_dialogue() -> Result<()> {
    let (pool, _temp_file) = setup().await?;

    let reply = begin_add_dialogue(EN);
    assert_eq!(reply.next_state, ConsumableDialogueState::AwaitingName);

    let reply = process_dialogue_input(&pool, 1, reply.next_state, "  Filters ", today(), EN)
        .await
        .expect("dialogue is active");
    assert_eq!(
        reply.next_state,
        ConsumableDialogueState::AwaitingDate {
            pending_name: "Filters".to_string()
        }
    );

    let reply = process_dialogue_input(&pool, 1, reply.next_state, "01.01.2024", today(), EN)
        .await
        .expect("dialogue is active");
    assert_eq!(reply.next_state, ConsumableDialogueState::Idle);
    assert_eq!(reply.text, "Added: 'Filters' from 01.01.2024");

    let items = list_items_by_owner(&pool, 1).await?;
    assert_eq!(
        items,
        vec![ItemSummary {
            name: "Filters".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }]
    );

    Ok(())
}

/// Test an empty name keeps the dialogue waiting for a name
#[tokio::test]
async fn test_empty_name_is_rejected() -> Result<()> {
    let (pool, _temp_file) = setup().await?;

    let reply = process_dialogue_input(
        &pool,
        1,
        ConsumableDialogueState::AwaitingName,
        "",
        today(),
        EN,
    )
    .await
    .expect("dialogue is active");

    assert_eq!(reply.next_state, ConsumableDialogueState::AwaitingName);
    assert_eq!(reply.text, t_lang("add-name-empty", EN));
    assert!(list_items_by_owner(&pool, 1).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_too_long_name_is_rejected() -> Result<()> {
    init_localization()?;

    let reply = handle_name_input(&"x".repeat(101), EN);

    assert_eq!(reply.next_state, ConsumableDialogueState::AwaitingName);
    assert_eq!(reply.text, t_lang("add-name-too-long", EN));

    Ok(())
}

/// Test bad dates keep the pending name and insert nothing
#[tokio::test]
async fn test_invalid_dates_are_rejected() -> Result<()> {
    let (pool, _temp_file) = setup().await?;
    let awaiting = ConsumableDialogueState::AwaitingDate {
        pending_name: "Filters".to_string(),
    };

    for (input, key) in [
        ("tomorrow", "add-date-malformed"),
        ("1.1.2024", "add-date-malformed"),
        ("30.02.2024", "add-date-malformed"),
        ("16.06.2024", "add-date-in-future"),
    ] {
        let reply = process_dialogue_input(&pool, 1, awaiting.clone(), input, today(), EN)
            .await
            .expect("dialogue is active");
        assert_eq!(reply.next_state, awaiting, "input {input:?}");
        assert_eq!(reply.text, t_lang(key, EN), "input {input:?}");
    }

    assert!(list_items_by_owner(&pool, 1).await?.is_empty());

    Ok(())
}

/// Test a date equal to today is accepted
#[tokio::test]
async fn test_today_is_accepted() -> Result<()> {
    let (pool, _temp_file) = setup().await?;
    let awaiting = ConsumableDialogueState::AwaitingDate {
        pending_name: "Soap".to_string(),
    };

    let reply = process_dialogue_input(&pool, 1, awaiting, "15.06.2024", today(), EN)
        .await
        .expect("dialogue is active");

    assert_eq!(reply.next_state, ConsumableDialogueState::Idle);
    assert_eq!(list_items_by_owner(&pool, 1).await?.len(), 1);

    Ok(())
}

/// Test a failed commit still ends the dialogue
#[tokio::test]
async fn test_storage_failure_resets_to_idle() -> Result<()> {
    let (pool, _temp_file) = setup().await?;
    pool.close().await;

    let awaiting = ConsumableDialogueState::AwaitingDate {
        pending_name: "Filters".to_string(),
    };
    let reply = process_dialogue_input(&pool, 1, awaiting, "01.01.2024", today(), EN)
        .await
        .expect("dialogue is active");

    assert_eq!(reply.next_state, ConsumableDialogueState::Idle);
    assert_eq!(reply.text, t_lang("add-save-failed", EN));

    Ok(())
}

#[tokio::test]
async fn test_idle_state_has_no_dialogue_reply() -> Result<()> {
    let (pool, _temp_file) = setup().await?;

    let reply =
        process_dialogue_input(&pool, 1, ConsumableDialogueState::Idle, "hello", today(), EN)
            .await;
    assert!(reply.is_none());

    Ok(())
}

/// Test two users running the dialogue concurrently do not interfere
#[tokio::test]
async fn test_concurrent_dialogues_are_independent() -> Result<()> {
    let (pool, _temp_file) = setup().await?;

    async fn run(pool: &SqlitePool, owner_id: i64, name: &str, date: &str) -> Option<()> {
        let state = begin_add_dialogue(EN).next_state;
        let state = process_dialogue_input(pool, owner_id, state, name, today(), EN)
            .await?
            .next_state;
        tokio::task::yield_now().await;
        let state = process_dialogue_input(pool, owner_id, state, date, today(), EN)
            .await?
            .next_state;
        (state == ConsumableDialogueState::Idle).then_some(())
    }

    let (alice, bob) = tokio::join!(
        run(&pool, 100, "Filters", "01.01.2024"),
        run(&pool, 200, "Sponges", "02.02.2024"),
    );
    assert!(alice.is_some());
    assert!(bob.is_some());

    let alice_items = list_items_by_owner(&pool, 100).await?;
    let bob_items = list_items_by_owner(&pool, 200).await?;
    assert_eq!(alice_items.len(), 1);
    assert_eq!(alice_items[0].name, "Filters");
    assert_eq!(bob_items.len(), 1);
    assert_eq!(bob_items[0].name, "Sponges");

    Ok(())
}
