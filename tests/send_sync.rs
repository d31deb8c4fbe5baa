//! Send/Sync guarantees for core types.

use debugnet::{
    MessageBuf, NetLogAdapter, NetTracingLayer, Session, SessionConfig, SessionSettings,
    SharedConfig, SharedSession, UdpTransport, test_utils::RecordingTransport,
};
use rstest::rstest;
use static_assertions::assert_impl_all;

#[rstest]
fn sessions_can_move_between_threads() {
    assert_impl_all!(Session<UdpTransport>: Send);
    assert_impl_all!(Session<RecordingTransport>: Send);
    assert_impl_all!(SharedSession<UdpTransport>: Send, Sync);
}

#[rstest]
fn shared_state_is_send_sync() {
    assert_impl_all!(SessionConfig: Send, Sync, Copy);
    assert_impl_all!(SharedConfig: Send, Sync);
    assert_impl_all!(SessionSettings: Send, Sync);
    assert_impl_all!(MessageBuf: Send, Sync);
}

#[rstest]
fn bridges_are_send_sync() {
    assert_impl_all!(NetLogAdapter: Send, Sync);
    assert_impl_all!(NetTracingLayer: Send, Sync);
}
