//! The `log` facade bridge over the process-wide session.
//!
//! Kept in its own test binary because installing the global logger is a
//! one-way, process-wide operation.

use std::{fmt, thread};

use debugnet::{NetLevel, global, install_global_logger};
use rstest::rstest;
use serial_test::serial;

mod test_utils;
use test_utils::{RECV_TIMEOUT, UdpSink, sink};

/// Value whose `Display` impl logs through the global logger.
struct Chatty;

impl fmt::Display for Chatty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        log::info!(target: "app::chatty", "rendering");
        f.write_str("chatty")
    }
}

#[rstest]
#[serial]
fn log_macros_reach_the_listener(sink: UdpSink) {
    global::reset_for_test();
    assert!(global::init("127.0.0.1", sink.port, NetLevel::Info));
    sink.take(3);

    assert!(install_global_logger());
    assert!(install_global_logger(), "second install reuses the outcome");

    log::info!(target: "app::boot", "mounted {} volumes", 2);
    log::debug!(target: "app::boot", "too verbose for INFO");
    log::warn!(target: "app::boot", "low battery");

    assert_eq!(
        sink.take(2),
        vec![
            "[DEBUGNET][INFO]: app::boot: mounted 2 volumes\n",
            "[DEBUGNET][ERROR]: app::boot: low battery\n",
        ]
    );
    sink.assert_quiet();

    global::set_log_level(NetLevel::Debug);
    log::trace!(target: "app", "now visible");
    assert_eq!(sink.next_text(), "[DEBUGNET][DEBUG]: app: now visible\n");

    global::finish();
    global::reset_for_test();
}

#[rstest]
#[serial]
fn printf_macro_uses_global_session(sink: UdpSink) {
    global::reset_for_test();
    assert!(global::init("127.0.0.1", sink.port, NetLevel::Info));
    sink.take(3);

    debugnet::debugnet_printf!(NetLevel::Debug, "dropped {}", 1);
    debugnet::debugnet_printf!(NetLevel::Error, "kept {}", 2);
    global::raw_send(format_args!("raw line\n"));

    assert_eq!(
        sink.take(2),
        vec!["[DEBUGNET][ERROR]: kept 2", "raw line\n"]
    );
    global::reset_for_test();
}

#[rstest]
#[serial]
fn values_that_log_while_rendering_do_not_block(sink: UdpSink) {
    global::reset_for_test();
    assert!(global::init("127.0.0.1", sink.port, NetLevel::Info));
    sink.take(3);
    assert!(install_global_logger());

    let (done_tx, done_rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        log::info!(target: "app", "value {}", Chatty);
        debugnet::debugnet_printf!(NetLevel::Info, "printf {}", Chatty);
        global::raw_send(format_args!("raw {}\n", Chatty));
        let _ = done_tx.send(());
    });
    done_rx
        .recv_timeout(RECV_TIMEOUT)
        .expect("nested logging returns");

    assert_eq!(
        sink.take(6),
        vec![
            "[DEBUGNET][INFO]: app::chatty: rendering\n",
            "[DEBUGNET][INFO]: app: value chatty\n",
            "[DEBUGNET][INFO]: app::chatty: rendering\n",
            "[DEBUGNET][INFO]: printf chatty",
            "[DEBUGNET][INFO]: app::chatty: rendering\n",
            "raw chatty\n",
        ]
    );
    global::reset_for_test();
}
