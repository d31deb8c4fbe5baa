//! `format!`-style logging macros.
//!
//! The session macros take any expression that evaluates to a
//! [`Session`](crate::Session) (or a mutable reference to one) and forward
//! to [`Session::log`](crate::Session::log). `debugnet_printf!` targets the
//! process-wide session in [`global`](crate::global).
//!
//! # Examples
//!
//! ```rust,no_run
//! use debugnet::{NetLevel, Session, debugnet_error, debugnet_info};
//!
//! let mut session = Session::default();
//! session.init("192.168.1.20", 18194, NetLevel::Debug);
//! debugnet_info!(session, "loaded {} modules\n", 12);
//! debugnet_error!(session, "mount failed\n");
//! ```

/// Log at an explicit level on a session.
#[macro_export]
macro_rules! debugnet_log {
    ($session:expr, $level:expr, $($arg:tt)+) => {
        $session.log($level, ::std::format_args!($($arg)+))
    };
}

/// Log at `INFO` on a session.
#[macro_export]
macro_rules! debugnet_info {
    ($session:expr, $($arg:tt)+) => {
        $crate::debugnet_log!($session, $crate::NetLevel::Info, $($arg)+)
    };
}

/// Log at `ERROR` on a session.
#[macro_export]
macro_rules! debugnet_error {
    ($session:expr, $($arg:tt)+) => {
        $crate::debugnet_log!($session, $crate::NetLevel::Error, $($arg)+)
    };
}

/// Log at `DEBUG` on a session.
#[macro_export]
macro_rules! debugnet_debug {
    ($session:expr, $($arg:tt)+) => {
        $crate::debugnet_log!($session, $crate::NetLevel::Debug, $($arg)+)
    };
}

/// Log on the process-wide session.
///
/// ```rust,no_run
/// use debugnet::{NetLevel, debugnet_printf, global};
///
/// global::init("192.168.1.20", 18194, NetLevel::Info);
/// debugnet_printf!(NetLevel::Info, "free memory: {} KiB\n", 2048);
/// ```
#[macro_export]
macro_rules! debugnet_printf {
    ($level:expr, $($arg:tt)+) => {
        $crate::global::log($level, ::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::{NetLevel, Session, test_utils::RecordingTransport};

    #[test]
    fn macros_forward_to_session_log() {
        let recorder = RecordingTransport::new();
        let mut session = Session::new(recorder.clone()).with_tag("M");
        session.init("127.0.0.1", 9, NetLevel::Debug);
        recorder.clear();

        let count = 3;
        debugnet_info!(session, "started {count} workers");
        debugnet_error!(session, "plain error");
        debugnet_debug!(&mut session, "{}-{}", 1, 2);
        debugnet_log!(session, NetLevel::None, "never");

        assert_eq!(
            recorder.texts(),
            vec![
                "[M][INFO]: started 3 workers",
                "[M][ERROR]: plain error",
                "[M][DEBUG]: 1-2",
            ]
        );
    }
}
