#![allow(dead_code)]

use interhook::testing::{RecordingSink, test_key};
use interhook::{Dispatcher, DispatcherBuilder, InteractionServer, PayloadGate, Verifier};
use std::sync::Arc;

pub const ENDPOINT: &str = "/interactions";

/// Stand-in for the REST client handed to handlers.
#[derive(Debug, Default)]
pub struct Rest {
    pub name: &'static str,
}

pub fn server(builder: DispatcherBuilder<Rest>) -> InteractionServer<Rest> {
    let (_, public) = test_key();
    let verifier = Verifier::from_hex(&public).unwrap();
    InteractionServer::new(
        PayloadGate::new(ENDPOINT, verifier),
        builder.build(),
        Arc::new(Rest { name: "rest" }),
    )
}

pub fn empty_server() -> InteractionServer<Rest> {
    server(Dispatcher::builder())
}

pub fn sink() -> Arc<RecordingSink> {
    RecordingSink::new()
}
