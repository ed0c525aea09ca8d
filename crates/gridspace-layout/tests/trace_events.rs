//! The engine reports its decisions through `tracing`.

use std::sync::{Arc, Mutex};

use gridspace_layout::{
    BoundaryHandling, SeparationOptions, Widget, separate_all_touching_widgets, separate_widgets,
};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Default)]
struct Captured {
    spans: Vec<String>,
    messages: Vec<(tracing::Level, String)>,
}

struct Capture {
    state: Arc<Mutex<Captured>>,
}

impl<S> Layer<S> for Capture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        self.state
            .lock()
            .expect("capture lock")
            .spans
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        if let Some(message) = msg.message {
            self.state
                .lock()
                .expect("capture lock")
                .messages
                .push((*event.metadata().level(), message));
        }
    }
}

fn capture() -> (Arc<Mutex<Captured>>, impl Subscriber + Send + Sync) {
    let state = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        state: Arc::clone(&state),
    });
    (state, subscriber)
}

#[test]
fn batch_run_emits_spans_and_summary() {
    let (state, subscriber) = capture();
    let _guard = tracing::subscriber::set_default(subscriber);

    let widgets = vec![Widget::at("a", 0, 0, 6, 4), Widget::at("b", 6, 0, 6, 4)];
    let result = separate_all_touching_widgets(&widgets, &SeparationOptions::default());
    assert!(result.success);

    let captured = state.lock().expect("capture lock");
    assert!(captured.spans.iter().any(|s| s == "gridspace.separate_all"));
    assert!(captured.spans.iter().any(|s| s == "gridspace.separate"));
    assert!(
        captured
            .messages
            .iter()
            .any(|(_, m)| m == "batch separation finished"),
        "messages: {:?}",
        captured.messages
    );
}

#[test]
fn failed_separation_is_a_warning() {
    let (state, subscriber) = capture();
    let _guard = tracing::subscriber::set_default(subscriber);

    let a = Widget::at("a", 18, 0, 4, 2);
    let b = Widget::at("b", 22, 0, 4, 2);
    let opts = SeparationOptions::default().boundary_handling(BoundaryHandling::Strict);
    let result = separate_widgets(&a, &b, &[a.clone(), b.clone()], &opts);
    assert!(!result.success);

    let captured = state.lock().expect("capture lock");
    assert!(
        captured
            .messages
            .iter()
            .any(|(level, m)| *level == tracing::Level::WARN && m == "separation failed"),
        "messages: {:?}",
        captured.messages
    );
}

#[test]
fn cascade_pushes_are_traced() {
    let (state, subscriber) = capture();
    let _guard = tracing::subscriber::set_default(subscriber);

    let widgets = vec![
        Widget::at("a", 0, 0, 4, 2),
        Widget::at("b", 4, 0, 4, 2),
        Widget::at("c", 8, 0, 3, 2),
    ];
    let result = separate_widgets(
        &widgets[0],
        &widgets[1],
        &widgets,
        &SeparationOptions::aggressive(),
    );
    assert!(result.success, "{}", result.message);

    let captured = state.lock().expect("capture lock");
    assert!(captured.messages.iter().any(|(_, m)| m == "cascade push"));
}
