//! Logging session lifecycle and message pipeline.
//!
//! A [`Session`] owns, or borrows, one [`SessionConfig`] and a
//! [`DatagramTransport`]. `init` opens a handle to the listening host,
//! `log` gates a message on the configured level, formats it into a bounded
//! buffer behind a `[TAG][SEVERITY]: ` prefix and sends it as one datagram.
//!
//! Sending is fire-and-forget: [`Session::log`] and [`Session::raw_send`]
//! never return an error and never panic. Failures are counted and reported
//! through the `log` facade at most once per warn interval. Callers that want
//! to see individual outcomes use [`Session::try_log`] and
//! [`Session::try_raw_send`].
//!
//! A session is not internally synchronised. Share one across threads
//! through [`SharedSession`], which serialises every call.

mod outcome;
mod slot;


use std::{fmt, sync::Arc};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::{
    bounded_buf::MessageBuf,
    config::{
        DEFAULT_TAG, DEFAULT_WARN_INTERVAL, SessionConfig, SessionSettings, SharedConfig,
        TransportHandle,
    },
    level::NetLevel,
    rate_limited_warner::RateLimitedWarner,
    transport::{DatagramTransport, UdpTransport, resolve_peer},
};

pub use outcome::{Delivery, TransmitError};
use slot::ConfigSlot;

/// Session shared between threads or subsystems.
pub type SharedSession<T = UdpTransport> = Arc<Mutex<Session<T>>>;

/// Remote logging session over a datagram transport.
pub struct Session<T: DatagramTransport = UdpTransport> {
    slot: Option<ConfigSlot>,
    transport: T,
    tag: String,
    warner: RateLimitedWarner,
}

impl Default for Session<UdpTransport> {
    fn default() -> Self {
        Self::new(UdpTransport::default())
    }
}

impl<T: DatagramTransport> Session<T> {
    /// Create a session with no config. Nothing is opened until `init`.
    pub fn new(transport: T) -> Self {
        Self {
            slot: None,
            transport,
            tag: DEFAULT_TAG.to_owned(),
            warner: RateLimitedWarner::new(DEFAULT_WARN_INTERVAL),
        }
    }

    /// Override the product tag written before each severity.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Override how often dropped-datagram warnings may be emitted.
    pub fn with_warn_interval(mut self, interval: std::time::Duration) -> Self {
        self.warner = RateLimitedWarner::new(interval);
        self
    }

    /// Wrap the session for use from several threads.
    pub fn into_shared(self) -> SharedSession<T> {
        Arc::new(Mutex::new(self))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `true` when the current config was supplied by the caller.
    pub fn is_external(&self) -> bool {
        self.slot.as_ref().is_some_and(ConfigSlot::is_borrowed)
    }

    pub fn is_initialized(&self) -> bool {
        self.config().is_some_and(|c| c.initialized)
    }

    /// Ensure a config exists.
    ///
    /// Creates an owned config (`initialized = false`, invalid handle,
    /// `Info` level) when none exists. Returns `true` only when the existing
    /// config is already live, in which case nothing changes.
    pub fn create_config(&mut self) -> bool {
        match &self.slot {
            None => {
                self.slot = Some(ConfigSlot::Owned(SessionConfig::default()));
                false
            }
            Some(slot) => slot.snapshot().initialized,
        }
    }

    /// Open a transport handle to `server:port` and mark the session live.
    ///
    /// Calling `init` on a live session is a no-op that keeps the existing
    /// handle and returns `true`. When the peer cannot be resolved or the
    /// socket cannot be opened the config stays uninitialised and `false` is
    /// returned. Three informational bootstrap lines are sent on success;
    /// their delivery does not affect the result.
    pub fn init(&mut self, server: &str, port: u16, level: NetLevel) -> bool {
        if self.create_config() {
            debug!("debugnet: init ignored, session already live");
            return true;
        }
        self.set_log_level(level);

        let handle = match resolve_peer(server, port).and_then(|peer| self.transport.open(peer)) {
            Ok(handle) => handle,
            Err(err) => {
                warn!("debugnet: failed to open transport to {server}:{port}: {err}");
                return false;
            }
        };
        self.update_config(|config| {
            config.handle = handle;
            config.initialized = true;
        });
        debug!("debugnet: session live on handle {handle} ({server}:{port})");

        self.log(NetLevel::Info, format_args!("debugnet initialized\n"));
        self.log(
            NetLevel::Info,
            format_args!("sending to {server}:{port} at level {level}\n"),
        );
        self.log(NetLevel::Info, format_args!("ready to have a lot of fun...\n"));

        self.is_initialized()
    }

    /// Apply `settings` (tag, warn interval) and call [`Session::init`].
    pub fn init_with_settings(&mut self, settings: &SessionSettings) -> bool {
        self.tag.clone_from(&settings.tag);
        self.warner = RateLimitedWarner::new(settings.warn_interval);
        self.init(&settings.server, settings.port, settings.level)
    }

    /// Adopt a config that another subsystem already brought up.
    ///
    /// Returns `true` and announces the adopted state when the config is
    /// live. An uninitialised config is still adopted but nothing is
    /// opened and `false` is returned.
    pub fn init_with_external_config(&mut self, conf: SharedConfig) -> bool {
        if !self.set_config(Some(conf)) {
            return false;
        }
        let Some(config) = self.config() else {
            return false;
        };
        self.log(
            NetLevel::Info,
            format_args!("debugnet already initialized using configuration from host\n"),
        );
        self.log(
            NetLevel::Info,
            format_args!(
                "debugnet_initialized={} handle={} logLevel={}\n",
                u8::from(config.initialized),
                config.handle,
                u8::from(config.log_level),
            ),
        );
        self.log(NetLevel::Info, format_args!("ready to have a lot of fun...\n"));
        config.initialized
    }

    /// Snapshot of the current config, if any.
    pub fn config(&self) -> Option<SessionConfig> {
        self.slot.as_ref().map(ConfigSlot::snapshot)
    }

    /// Replace the current config with a borrowed one.
    ///
    /// `None` leaves the session untouched and returns `false`. Otherwise
    /// the session switches to `conf` without taking ownership and returns
    /// its `initialized` flag. A live owned config being replaced has its
    /// handle closed.
    pub fn set_config(&mut self, conf: Option<SharedConfig>) -> bool {
        let Some(conf) = conf else {
            return false;
        };
        if let Some(ConfigSlot::Owned(previous)) = self.slot.take() {
            if previous.initialized {
                debug!(
                    "debugnet: closing owned handle {} replaced by external config",
                    previous.handle
                );
                self.transport.close(previous.handle);
            }
        }
        let initialized = conf.lock().initialized;
        self.slot = Some(ConfigSlot::Borrowed(conf));
        initialized
    }

    /// Hand the current config to another subsystem.
    ///
    /// The session keeps logging through the returned config but no longer
    /// owns it, so its `shutdown` becomes a no-op. The receiver adopts it with
    /// [`Session::init_with_external_config`]. Once detached, no `shutdown`
    /// closes the handle; call [`Session::reclaim_config`] on the session
    /// that should own the socket again.
    pub fn detach_config(&mut self) -> Option<SharedConfig> {
        let shared = match self.slot.take()? {
            ConfigSlot::Owned(config) => config.into_shared(),
            ConfigSlot::Borrowed(shared) => shared,
        };
        self.slot = Some(ConfigSlot::Borrowed(Arc::clone(&shared)));
        Some(shared)
    }

    /// Take ownership of a borrowed config.
    ///
    /// The session keeps a private copy and the shared config is reset to
    /// uninitialised with an invalid handle, so other holders stop sending
    /// on the socket. A later `shutdown` on this session closes it. Returns
    /// `false` when the current config is not borrowed.
    pub fn reclaim_config(&mut self) -> bool {
        let Some(ConfigSlot::Borrowed(shared)) = self.slot.as_ref() else {
            return false;
        };
        let config = {
            let mut guard = shared.lock();
            let config = *guard;
            guard.initialized = false;
            guard.handle = TransportHandle::INVALID;
            config
        };
        self.slot = Some(ConfigSlot::Owned(config));
        debug!("debugnet: reclaimed config for handle {}", config.handle);
        true
    }

    /// Change the transmit threshold. Does nothing without a config.
    pub fn set_log_level(&mut self, level: NetLevel) {
        self.update_config(|config| config.log_level = level);
    }

    /// Close the handle of an owned live config and mark it uninitialised.
    ///
    /// The config itself is kept so a later `init` can reuse it. Borrowed
    /// configs are never touched.
    pub fn shutdown(&mut self) {
        let tag = &self.tag;
        self.warner.flush(|count| {
            warn!("debugnet: [{tag}] dropped {count} datagrams before shutdown");
        });
        let Some(ConfigSlot::Owned(config)) = self.slot.as_mut() else {
            return;
        };
        if !config.initialized {
            return;
        }
        self.transport.close(config.handle);
        config.initialized = false;
        config.handle = TransportHandle::INVALID;
        debug!("debugnet: session shut down");
    }

    /// Format `args` and send the text as-is, without level or tag.
    ///
    /// Without a config the datagram is still handed to the transport, on
    /// the invalid handle.
    pub fn raw_send(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.try_raw_send(args) {
            self.report_failure(&err);
        }
    }

    /// Like [`Session::raw_send`], returning the outcome.
    pub fn try_raw_send(&mut self, args: fmt::Arguments<'_>) -> Result<Delivery, TransmitError> {
        self.try_raw_send_message(&MessageBuf::from_args(args))
    }

    /// Send text that was already rendered, as-is.
    pub fn raw_send_message(&mut self, message: &MessageBuf) {
        if let Err(err) = self.try_raw_send_message(message) {
            self.report_failure(&err);
        }
    }

    pub fn try_raw_send_message(&mut self, message: &MessageBuf) -> Result<Delivery, TransmitError> {
        self.transmit(message, message.is_truncated())
    }

    /// Send `args` at `level` as `[TAG][SEVERITY]: text`.
    ///
    /// The message is dropped before formatting when a config exists and
    /// `level` is more verbose than its threshold, and always when `level`
    /// is [`NetLevel::None`]. Without a config no gating applies.
    pub fn log(&mut self, level: NetLevel, args: fmt::Arguments<'_>) {
        if let Err(err) = self.try_log(level, args) {
            self.report_failure(&err);
        }
    }

    /// Like [`Session::log`], returning the outcome.
    pub fn try_log(
        &mut self,
        level: NetLevel,
        args: fmt::Arguments<'_>,
    ) -> Result<Delivery, TransmitError> {
        if !self.permits(level) || level == NetLevel::None {
            return Ok(Delivery::Suppressed);
        }
        self.try_log_message(level, &MessageBuf::from_args(args))
    }

    /// Send text that was already rendered at `level`.
    ///
    /// Callers that share a session render user values before taking its
    /// lock, so a `Display` impl that logs cannot re-enter a held mutex.
    pub fn log_message(&mut self, level: NetLevel, message: &MessageBuf) {
        if let Err(err) = self.try_log_message(level, message) {
            self.report_failure(&err);
        }
    }

    /// Like [`Session::log_message`], returning the outcome.
    pub fn try_log_message(
        &mut self,
        level: NetLevel,
        message: &MessageBuf,
    ) -> Result<Delivery, TransmitError> {
        if !self.permits(level) {
            return Ok(Delivery::Suppressed);
        }
        let Some(severity) = level.tag() else {
            return Ok(Delivery::Suppressed);
        };
        let payload =
            MessageBuf::from_args(format_args!("[{}][{severity}]: {message}", self.tag));
        let truncated = message.is_truncated() || payload.is_truncated();
        self.transmit(&payload, truncated)
    }

    /// Whether a message at `level` passes the current threshold.
    pub fn permits(&self, level: NetLevel) -> bool {
        self.config()
            .is_none_or(|config| config.log_level.allows(level))
    }

    fn transmit(&mut self, payload: &MessageBuf, truncated: bool) -> Result<Delivery, TransmitError> {
        let handle = self
            .config()
            .map_or(TransportHandle::INVALID, |config| config.handle);
        let expected = payload.len();
        let sent = self.transport.send(handle, payload.as_bytes())?;
        if sent < expected {
            return Err(TransmitError::Short { sent, expected });
        }
        Ok(Delivery::Sent {
            bytes: sent,
            truncated,
        })
    }

    fn update_config(&mut self, f: impl FnOnce(&mut SessionConfig)) {
        if let Some(slot) = self.slot.as_mut() {
            slot.update(f);
        }
    }

    fn report_failure(&self, err: &TransmitError) {
        self.warner.record_drop();
        self.warner.warn_if_due(|count| {
            warn!(
                "debugnet: [{}] dropped {count} datagrams; last error: {err}",
                self.tag
            );
        });
    }
}

impl<T: DatagramTransport> Drop for Session<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<T: DatagramTransport> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config())
            .field("external", &self.is_external())
            .field("tag", &self.tag)
            .finish()
    }
}
