use bucketnotes::configuration::CONFIGURATION;
use bucketnotes::telemetry::{get_subscriber, init_tracing};
use bucketnotes::{BoxedNoteStore, Session};
use lazy_static::lazy_static;
use tracing_subscriber::layer::SubscriberExt;

lazy_static! {
    static ref TRACING: () = {
        let subscriber = get_subscriber(&*CONFIGURATION)
            .with(tracing_subscriber::fmt::Layer::default().with_test_writer());
        init_tracing(subscriber);
    };
}

pub fn spawn_session(store: BoxedNoteStore) -> Session {
    lazy_static::initialize(&TRACING);
    Session::new(store)
}
