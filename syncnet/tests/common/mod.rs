#![allow(dead_code)]

use std::{
  io::{Read, Write},
  net::{TcpListener, TcpStream},
  thread,
  time::Duration,
};

use crossbeam_channel::Receiver;
use tracing_subscriber::EnvFilter;

pub const WAIT: Duration = Duration::from_secs(10);

/// Routes crate logs to the test output; `RUST_LOG=syncnet=trace` shows
/// every chunk.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// Accepts one connection and hands it to `f` on a separate thread. The
/// result comes back over the returned channel.
pub fn peer<F, T>(listener: TcpListener, f: F) -> Receiver<T>
where
  F: FnOnce(TcpStream) -> T + Send + 'static,
  T: Send + 'static,
{
  let (tx, rx) = crossbeam_channel::bounded(1);

  thread::spawn(move || {
    let (stream, _) = listener.accept().unwrap();
    let _ = tx.send(f(stream));
  });

  rx
}

/// A peer that reads until the client closes and reports everything it got.
pub fn sink(listener: TcpListener) -> Receiver<Vec<u8>> {
  peer(listener, |mut stream| {
    let mut got = Vec::new();
    stream.read_to_end(&mut got).unwrap();
    got
  })
}

/// A peer that writes `data` and then keeps the connection open until the
/// client closes.
pub fn speaker(listener: TcpListener, data: Vec<u8>) -> Receiver<()> {
  peer(listener, move |mut stream| {
    stream.write_all(&data).unwrap();
    let _ = stream.read_to_end(&mut Vec::new());
  })
}
