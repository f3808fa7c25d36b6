//! Unit tests for city selection, inline city search, `/start` and `/help`.

use qbot_core::{Answer, BotError, Endpoint, Update, UserStateRepository, UserStep};
use storage::{AdminMessageRepository, AyatRepository, CityRepository, UserRepository};

use super::fixtures::{text_update, Fixture, CHAT_WITHOUT_CITY, CHAT_WITH_CITY};
use crate::{
    ChangeCity, HelpAnswer, InlineCityQuery, StartAnswer, UserAlreadyExistsAnswer,
    ALREADY_REGISTERED_TEXT, NEW_USER_ADMIN_TEXT, REFERRER_NOTICE_TEXT,
};

fn change_city(fixture: &Fixture) -> ChangeCity {
    ChangeCity::new(
        CityRepository::new(fixture.pool_manager.clone()),
        UserRepository::new(fixture.pool_manager.clone()),
        fixture.states(),
    )
}

fn start(fixture: &Fixture, admins: Vec<i64>) -> UserAlreadyExistsAnswer {
    UserAlreadyExistsAnswer::new(
        StartAnswer::new(
            UserRepository::new(fixture.pool_manager.clone()),
            AdminMessageRepository::new(fixture.pool_manager.clone()),
            AyatRepository::new(fixture.pool_manager.clone()),
            admins,
        ),
        UserRepository::new(fixture.pool_manager.clone()),
    )
}

/// **Test: City chosen by name is stored and the search step ends.**
///
/// **Setup:** Chat 2 without a city, in the city search step.
/// **Action:** Build `ChangeCity` for text "Казань".
/// **Expected:** Confirmation text; user city is kazan; step is back to nothing.
#[tokio::test]
async fn test_change_city_by_name() {
    let fixture = Fixture::in_memory().await;
    let states = fixture.states();
    states.change_step(CHAT_WITHOUT_CITY, UserStep::CitySearch).await.unwrap();

    let requests = change_city(&fixture)
        .build(&text_update(CHAT_WITHOUT_CITY, "Казань"))
        .await
        .unwrap();

    assert_eq!(
        requests[0].text(),
        Some("Вам будет приходить время намаза для города Казань")
    );
    let user = UserRepository::new(fixture.pool_manager.clone())
        .get(CHAT_WITHOUT_CITY)
        .await
        .unwrap();
    assert_eq!(user.city_id.as_deref(), Some("kazan"));
    assert_eq!(states.step(CHAT_WITHOUT_CITY).await.unwrap(), UserStep::Nothing);
}

/// **Test: Unknown city name is CityNotSupported and leaves the step as is.**
#[tokio::test]
async fn test_change_city_unknown() {
    let fixture = Fixture::in_memory().await;
    let states = fixture.states();
    states.change_step(CHAT_WITHOUT_CITY, UserStep::CitySearch).await.unwrap();

    let result = change_city(&fixture)
        .build(&text_update(CHAT_WITHOUT_CITY, "Париж"))
        .await;

    assert!(matches!(result, Err(BotError::CityNotSupported)));
    assert_eq!(states.step(CHAT_WITHOUT_CITY).await.unwrap(), UserStep::CitySearch);
}

/// **Test: A sent location picks the nearest city.**
#[tokio::test]
async fn test_change_city_by_location() {
    let fixture = Fixture::in_memory().await;
    let update = Update::new(format!(
        r#"{{"message":{{"message_id":7,"chat":{{"id":{}}},"location":{{"latitude":55.70,"longitude":37.50}}}}}}"#,
        CHAT_WITH_CITY
    ));

    let requests = change_city(&fixture).build(&update).await.unwrap();

    assert!(requests[0].text().unwrap().ends_with("Москва"));
}

/// **Test: Inline query lists matching cities as articles.**
#[tokio::test]
async fn test_inline_city_query() {
    let fixture = Fixture::in_memory().await;
    let update = Update::new(
        r#"{"inline_query":{"id":"iq1","query":"Каз","from":{"id":905}}}"#,
    );

    let requests = InlineCityQuery::new(CityRepository::new(fixture.pool_manager.clone()))
        .build(&update)
        .await
        .unwrap();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].endpoint, Endpoint::AnswerInlineQuery);
    assert_eq!(
        requests[0].param("inline_query_id").and_then(|v| v.as_str()),
        Some("iq1")
    );
    let results: serde_json::Value = serde_json::from_str(
        requests[0].param("results").and_then(|v| v.as_str()).unwrap(),
    )
    .unwrap();
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["title"], "Казань");
}

/// **Test: `/start` registers a new chat and notifies every admin.**
///
/// **Setup:** Chat 77 unknown; admins 1 and 3.
/// **Action:** Build the start answer.
/// **Expected:** Start text, first ayat, then one notification per admin; the user exists.
#[tokio::test]
async fn test_start_new_user() {
    let fixture = Fixture::in_memory().await;

    let requests = start(&fixture, vec![1, 3])
        .build(&text_update(77, "/start"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].text(), Some("Ассаляму алейкум!"));
    assert_eq!(requests[0].chat_id(), Some(77));
    assert!(requests[1].text().unwrap().contains("1:1-7)"));
    assert_eq!(requests[2].chat_id(), Some(1));
    assert_eq!(requests[3].chat_id(), Some(3));
    assert_eq!(requests[3].text(), Some(NEW_USER_ADMIN_TEXT));
    assert!(UserRepository::new(fixture.pool_manager.clone())
        .exists(77)
        .await
        .unwrap());
}

/// **Test: A referral link stores the referrer and notifies them.**
///
/// **Setup:** Chat 905 registered; chat 78 unknown; admin 1.
/// **Action:** Build the start answer for "/start 905".
/// **Expected:** Start text, first ayat, the notice to 905, then the admin notice; user 78
/// has referrer 905.
#[tokio::test]
async fn test_start_with_referrer() {
    let fixture = Fixture::in_memory().await;

    let requests = start(&fixture, vec![1])
        .build(&text_update(78, "/start 905"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 4);
    assert_eq!(requests[2].chat_id(), Some(CHAT_WITH_CITY));
    assert_eq!(requests[2].text(), Some(REFERRER_NOTICE_TEXT));
    assert_eq!(requests[3].chat_id(), Some(1));
    let user = UserRepository::new(fixture.pool_manager.clone())
        .get(78)
        .await
        .unwrap();
    assert_eq!(user.referrer_id, Some(CHAT_WITH_CITY));
}

/// **Test: A referral link naming an unknown chat registers without a referrer.**
#[tokio::test]
async fn test_start_with_unknown_referrer() {
    let fixture = Fixture::in_memory().await;

    let requests = start(&fixture, vec![1])
        .build(&text_update(79, "/start 123456"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.text() != Some(REFERRER_NOTICE_TEXT)));
    let user = UserRepository::new(fixture.pool_manager.clone())
        .get(79)
        .await
        .unwrap();
    assert_eq!(user.referrer_id, None);
}

/// **Test: `/start` from a registered active user.**
#[tokio::test]
async fn test_start_already_registered() {
    let fixture = Fixture::in_memory().await;

    let requests = start(&fixture, vec![1])
        .build(&text_update(CHAT_WITH_CITY, "/start"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text(), Some(ALREADY_REGISTERED_TEXT));
}

/// **Test: `/start` from an inactive user reactivates them.**
#[tokio::test]
async fn test_start_reactivates() {
    let fixture = Fixture::in_memory().await;
    let users = UserRepository::new(fixture.pool_manager.clone());
    users.set_active(CHAT_WITH_CITY, false).await.unwrap();

    let requests = start(&fixture, vec![])
        .build(&text_update(CHAT_WITH_CITY, "/start"))
        .await
        .unwrap();

    assert_eq!(
        requests[0].text(),
        Some("Рады видеть вас снова, вы продолжите с дня 2")
    );
    assert!(users.get(CHAT_WITH_CITY).await.unwrap().is_active);
}

/// **Test: `/help` sends the stored help text.**
#[tokio::test]
async fn test_help() {
    let fixture = Fixture::in_memory().await;

    let requests = HelpAnswer::new(AdminMessageRepository::new(fixture.pool_manager.clone()))
        .build(&text_update(CHAT_WITH_CITY, "/help"))
        .await
        .unwrap();

    assert_eq!(requests[0].text(), Some("Справка"));
}
