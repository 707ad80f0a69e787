use interhook::testing::{CallLog, MockRequest, RecordingHandler, test_key};
use interhook::{
    CommandDefinition, ConfigOverrides, Context, DispatchError, Dispatcher, Flow, Handled,
    InteractionServer, LoggingHook, OptionDefinition, ResponseError, RouteRegistry, ServerConfig,
    ServerError, TimeoutError, TimeoutHook, handlers,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{ENDPOINT, Rest, server, sink};

fn body(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

#[tokio::test]
async fn command_reply_goes_through_the_responder() {
    let (key, _) = test_key();
    let mut builder = Dispatcher::<Rest>::builder();
    builder.middleware(handlers![LoggingHook]);
    builder
        .command(
            CommandDefinition::new("whoami", "Who handles this"),
            handlers![|ctx: Context<Rest>| async move {
                ctx.responder()
                    .reply(format!("{} for {}", ctx.client().name, ctx.interaction().id))?;
                Ok::<_, ResponseError>(Flow::Halt)
            }],
        )
        .unwrap();
    let server = server(builder);
    let sink = sink();

    let request = MockRequest::signed(
        ENDPOINT,
        body(json!({"id": "77", "type": 2, "data": {"name": "whoami", "type": 1}})),
        &key,
    );
    let handled = server.handle(request, sink.clone()).await.unwrap();

    let Handled::Dispatched(result) = handled else {
        panic!("expected dispatch, got {handled:?}");
    };
    assert!(result.halted);
    assert!(!result.auto_responded);
    let response = sink.response().unwrap().json().unwrap();
    assert_eq!(response, json!({"type": 4, "data": {"content": "rest for 77"}}));
}

#[tokio::test]
async fn silent_chain_gets_204() {
    let (key, _) = test_key();
    let log = CallLog::new();
    let mut builder = Dispatcher::<Rest>::builder();
    builder
        .button("noop", handlers![RecordingHandler::new("noop", &log)])
        .unwrap();
    let server = server(builder);
    let sink = sink();

    let request = MockRequest::signed(
        ENDPOINT,
        body(json!({"type": 3, "data": {"custom_id": "noop", "component_type": 2}})),
        &key,
    );
    server.handle(request, sink.clone()).await.unwrap();

    assert_eq!(log.entries(), ["noop"]);
    assert_eq!(sink.status(), Some(204));
    assert_eq!(sink.response().unwrap().body, None);
}

#[tokio::test]
async fn ping_never_reaches_handlers() {
    let (key, _) = test_key();
    let log = CallLog::new();
    let mut builder = Dispatcher::<Rest>::builder();
    builder.middleware(handlers![RecordingHandler::new("global", &log)]);
    builder.unknown(handlers![RecordingHandler::new("unknown", &log)]);
    let server = server(builder);

    let handled = server
        .handle(MockRequest::signed(ENDPOINT, &br#"{"type":1}"#[..], &key), sink())
        .await
        .unwrap();

    assert_eq!(handled, Handled::Pong);
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn built_autocomplete_key_matches_live_event() {
    let (key, _) = test_key();
    let log = CallLog::new();
    let mut builder = Dispatcher::<Rest>::builder();

    let nested = CommandDefinition::new("admin", "Admin").option(
        OptionDefinition::sub_command_group("user", "Users").option(
            OptionDefinition::sub_command("ban", "Ban")
                .option(OptionDefinition::string("reason", "Reason").autocomplete()),
        ),
    );
    let nested_key = builder
        .command(nested, handlers![RecordingHandler::new("admin", &log)])
        .unwrap()
        .sub_command_group("user")
        .unwrap()
        .sub_command("ban")
        .unwrap()
        .option("reason")
        .unwrap();
    builder
        .autocomplete(nested_key, handlers![RecordingHandler::new("nested", &log)])
        .unwrap();

    let flat = CommandDefinition::new("search", "Search")
        .option(OptionDefinition::integer("page", "Page").autocomplete());
    let flat_key = builder
        .command(flat, handlers![RecordingHandler::new("search", &log)])
        .unwrap()
        .option("page")
        .unwrap();
    builder
        .autocomplete(flat_key, handlers![RecordingHandler::new("flat", &log)])
        .unwrap();

    let server = server(builder);

    let nested_event = json!({"type": 4, "data": {"name": "admin", "type": 1, "options": [
        {"name": "user", "type": 2, "options": [
            {"name": "ban", "type": 1, "options": [
                {"name": "reason", "type": 3, "value": "sp", "focused": true}
            ]}
        ]}
    ]}});
    let flat_event = json!({"type": 4, "data": {"name": "search", "type": 1, "options": [
        {"name": "page", "type": 4, "value": "1", "focused": true}
    ]}});

    for event in [nested_event, flat_event] {
        server
            .handle(MockRequest::signed(ENDPOINT, body(event), &key), sink())
            .await
            .unwrap();
    }

    assert_eq!(log.entries(), ["nested", "flat"]);
}

#[tokio::test]
async fn autocomplete_without_focus_is_a_resolve_error() {
    let (key, _) = test_key();
    let server = server(Dispatcher::builder());
    let sink = sink();

    let event = json!({"type": 4, "data": {"name": "search", "options": [
        {"name": "page", "type": 4, "value": "1"}
    ]}});
    let err = server
        .handle(MockRequest::signed(ENDPOINT, body(event), &key), sink.clone())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServerError::Dispatch(DispatchError::Resolve(_))
    ));
    assert!(sink.response().is_none());
}

#[tokio::test]
async fn chain_deadline_expires() {
    let (key, public) = test_key();
    let config = ServerConfig::from_toml_str(
        &format!("[server]\npublic_key = \"{public}\"\nchain_deadline_ms = 20\n"),
        &ConfigOverrides::default(),
    )
    .unwrap();

    let mut builder = Dispatcher::<Rest>::builder();
    builder
        .button(
            "slow",
            handlers![|_ctx: Context<Rest>| async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
            }],
        )
        .unwrap();
    let server =
        InteractionServer::from_config(&config, builder, Arc::new(Rest::default())).unwrap();
    let sink = sink();

    let request = MockRequest::signed(
        ENDPOINT,
        body(json!({"type": 3, "data": {"custom_id": "slow", "component_type": 2}})),
        &key,
    );
    let err = server.handle(request, sink.clone()).await.unwrap_err();

    assert!(matches!(
        err,
        ServerError::Dispatch(DispatchError::Deadline(limit)) if limit == Duration::from_millis(20)
    ));
    assert!(sink.response().is_none());
}

#[tokio::test]
async fn timeout_hook_fails_one_handler() {
    let (key, _) = test_key();
    let log = CallLog::new();
    let mut builder = Dispatcher::<Rest>::builder();
    builder
        .modal(
            "form",
            handlers![
                TimeoutHook::new(
                    |_ctx: Context<Rest>| async move {
                        tokio::time::sleep(Duration::from_millis(500)).await;
                    },
                    Duration::from_millis(10),
                ),
                RecordingHandler::new("after", &log)
            ],
        )
        .unwrap();
    let server = server(builder);

    let request = MockRequest::signed(
        ENDPOINT,
        body(json!({"type": 5, "data": {"custom_id": "form", "components": []}})),
        &key,
    );
    let err = server.handle(request, sink()).await.unwrap_err();

    let ServerError::Dispatch(DispatchError::Handler(source)) = err else {
        panic!("expected a handler error");
    };
    assert!(source.downcast_ref::<TimeoutError>().is_some());
    assert!(log.entries().is_empty());
}

#[test]
fn invalid_public_key_is_rejected_at_build() {
    let config = ServerConfig::from_toml_str(
        "[server]\npublic_key = \"not-a-key\"\n",
        &ConfigOverrides::default(),
    )
    .unwrap();

    let err = InteractionServer::from_config(
        &config,
        Dispatcher::<Rest>::builder(),
        Arc::new(Rest::default()),
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::PublicKey(_)));
}
