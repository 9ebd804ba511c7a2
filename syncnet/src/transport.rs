use std::io;

/// The two data-moving primitives the sender and receiver are written
/// against.
///
/// [`Connection`](crate::Connection) implements this with one `send(2)` or
/// `recv(2)` per call. Anything else implementing it (a scripted peer in a
/// test, say) gets the exact same chunking and failure handling.
pub trait Transport {
  /// Issues one transmission of `chunk` and returns how many bytes were
  /// accepted. Fewer than `chunk.len()` is a short write, not an error.
  fn transmit(&mut self, chunk: &[u8]) -> io::Result<usize>;

  /// Issues one receive into `buf`. `Ok(0)` means the peer closed.
  fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T> Transport for &mut T
where
  T: Transport + ?Sized,
{
  fn transmit(&mut self, chunk: &[u8]) -> io::Result<usize> {
    (**self).transmit(chunk)
  }

  fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    (**self).receive(buf)
  }
}
