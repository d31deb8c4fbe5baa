//! Bridge from `tracing` events to a debugnet session.

use std::fmt::Write as _;

use tracing::{Event, Subscriber, field::Field, field::Visit};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

use crate::{
    global, is_self_target,
    level::NetLevel,
    session::SharedSession,
    transport::{DatagramTransport, UdpTransport},
};

/// A tracing layer that forwards events to a debugnet session.
///
/// Events render as `target: message key=value ...` followed by a newline,
/// prefixed with the names of the enclosing spans when there are any.
pub struct NetTracingLayer<T: DatagramTransport = UdpTransport> {
    session: SharedSession<T>,
}

impl NetTracingLayer<UdpTransport> {
    /// Layer over the process-wide session.
    pub fn global() -> Self {
        Self::new(global::session())
    }
}

impl<T: DatagramTransport> NetTracingLayer<T> {
    pub fn new(session: SharedSession<T>) -> Self {
        Self { session }
    }
}

fn map_level(level: &tracing::Level) -> NetLevel {
    match *level {
        tracing::Level::ERROR | tracing::Level::WARN => NetLevel::Error,
        tracing::Level::INFO => NetLevel::Info,
        tracing::Level::DEBUG | tracing::Level::TRACE => NetLevel::Debug,
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S, T> Layer<S> for NetTracingLayer<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    T: DatagramTransport + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_self_target(metadata.target()) {
            return;
        }
        let level = map_level(metadata.level());
        if !self.session.lock().permits(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut spans = String::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if !spans.is_empty() {
                    spans.push_str("::");
                }
                spans.push_str(span.name());
            }
        }

        let target = metadata.target();
        let mut session = self.session.lock();
        if spans.is_empty() {
            session.log(
                level,
                format_args!("{target}: {}{}\n", visitor.message, visitor.fields),
            );
        } else {
            session.log(
                level,
                format_args!("{target}: {spans}: {}{}\n", visitor.message, visitor.fields),
            );
        }
    }
}
