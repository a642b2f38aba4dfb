//! BDD step definitions for status translation feature

use cucumber::{given, then, when};
use serde_json::json;

use homework_bot::homework::parse_status;
use homework_bot::BotError;

use crate::world::HomeworkBotWorld;

#[given(expr = "a homework named {string} with status {string}")]
fn homework_with_status(world: &mut HomeworkBotWorld, name: String, status: String) {
    world.homework = Some(json!({"homework_name": name, "status": status}));
}

#[given(expr = "a homework record without a name and status {string}")]
fn homework_without_name(world: &mut HomeworkBotWorld, status: String) {
    world.homework = Some(json!({"status": status}));
}

#[when("the status is translated")]
fn translate(world: &mut HomeworkBotWorld) {
    let homework = world.homework.as_ref().expect("homework not set");
    world.translation = Some(parse_status(homework));
}

#[then(expr = "the message should name {string} and end with {string}")]
fn message_names_homework(world: &mut HomeworkBotWorld, name: String, verdict: String) {
    let message = world
        .translation
        .as_ref()
        .expect("no translation")
        .as_ref()
        .expect("translation failed");
    assert!(
        message.starts_with("Изменился статус проверки работы"),
        "{message}"
    );
    assert!(message.contains(&format!("\"{}\"", name)), "{message}");
    assert!(message.ends_with(&verdict), "{message}");
}

#[then("translation should fail with an unknown status error")]
fn fails_unknown_status(world: &mut HomeworkBotWorld) {
    let result = world.translation.as_ref().expect("no translation");
    assert!(
        matches!(result, Err(BotError::UnknownStatus(_))),
        "expected UnknownStatus, got {result:?}"
    );
}

#[then(expr = "translation should fail with a missing key {string}")]
fn fails_missing_key(world: &mut HomeworkBotWorld, key: String) {
    let result = world.translation.as_ref().expect("no translation");
    match result {
        Err(BotError::MissingKey(k)) => assert_eq!(k, &key),
        other => panic!("expected MissingKey, got {other:?}"),
    }
}
