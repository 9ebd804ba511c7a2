use std::{borrow::Cow, time::Duration};

/// Host used by `connect` when the caller does not name one.
pub const DEFAULT_HOST: &str = "localhost";

/// Size of the buffer a single send chunk or receive goes through.
///
/// One slot is reserved for a string terminator, so a chunk or a receive
/// moves at most `get() - 1` bytes of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferSize(usize);

impl BufferSize {
  pub const DEFAULT: BufferSize = BufferSize(4096);

  /// Smallest size that still leaves room for one payload byte.
  pub const MIN: usize = 2;

  /// Returns `None` when `size` is below [`BufferSize::MIN`].
  pub const fn new(size: usize) -> Option<Self> {
    if size < Self::MIN { None } else { Some(Self(size)) }
  }

  pub const fn get(self) -> usize {
    self.0
  }

  /// Bytes of payload one chunk or one receive can carry.
  pub const fn payload_capacity(self) -> usize {
    self.0 - 1
  }
}

impl Default for BufferSize {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Options which configure how a [`Client`](crate::Client) connects and
/// moves bytes.
///
/// Every call stays blocking. Timeouts are off unless set here, in which
/// case a timed-out receive or send surfaces as the ordinary receive or send
/// failure.
///
/// ```
/// use std::time::Duration;
/// use syncnet::{BufferSize, Client, Config};
///
/// let config = Config::new()
///   .default_host("127.0.0.1")
///   .buffer_size(BufferSize::new(512).unwrap())
///   .read_timeout(Some(Duration::from_secs(5)));
///
/// let client = Client::new(config);
/// # let _ = client;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub(crate) default_host: Cow<'static, str>,
  pub(crate) buffer_size: BufferSize,
  pub(crate) read_timeout: Option<Duration>,
  pub(crate) write_timeout: Option<Duration>,
}

impl Config {
  /// `localhost`, a 4096 byte buffer and no timeouts.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      default_host: Cow::Borrowed(DEFAULT_HOST),
      buffer_size: BufferSize::DEFAULT,
      read_timeout: None,
      write_timeout: None,
    }
  }

  /// Sets the host `connect` resolves when called without one.
  #[must_use]
  pub fn default_host(mut self, host: impl Into<Cow<'static, str>>) -> Self {
    self.default_host = host.into();
    self
  }

  /// Sets the transmission and receive buffer size.
  #[must_use]
  pub fn buffer_size(mut self, size: BufferSize) -> Self {
    self.buffer_size = size;
    self
  }

  /// Sets `SO_RCVTIMEO` on every new connection. A zero duration means no
  /// timeout.
  #[must_use]
  pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.read_timeout = timeout.filter(|dur| !dur.is_zero());
    self
  }

  /// Sets `SO_SNDTIMEO` on every new connection. A zero duration means no
  /// timeout.
  #[must_use]
  pub fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.write_timeout = timeout.filter(|dur| !dur.is_zero());
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new()
  }
}
