use crate::{BufferSize, Error, Result, transport::Transport};

#[cfg(feature = "zeroize")]
type TransmitBuffer = zeroize::Zeroizing<Vec<u8>>;
#[cfg(not(feature = "zeroize"))]
type TransmitBuffer = Vec<u8>;

/// Where one send call stands. Lives only for the duration of the call.
#[derive(Debug)]
struct Progress {
  offset: usize,
  remaining: usize,
  sent: usize,
}

impl Progress {
  fn new(len: usize) -> Self {
    Self { offset: 0, remaining: len, sent: 0 }
  }

  fn advance(&mut self, batch: usize) {
    self.offset += batch;
    self.remaining -= batch;
    self.sent += batch;
  }
}

/// Sends `payload` through `transport` in chunks of at most
/// [`buffer_size.payload_capacity()`](BufferSize::payload_capacity) bytes.
///
/// Each chunk is copied into the transmission buffer and handed to a single
/// [`Transport::transmit`] call. Returns the number of bytes confirmed sent:
///
/// - every chunk fully accepted: the payload length,
/// - a chunk only partly accepted (a short write): the earlier chunks plus
///   the accepted part of that one. Nothing further is transmitted.
///
/// A failed transmission returns [`Error::Send`] without any count. Chunks
/// that were reported sent right before a failure are no proof of delivery.
///
/// An empty payload transmits nothing and returns `0`.
pub fn send_chunked<T>(
  transport: &mut T,
  payload: &[u8],
  buffer_size: BufferSize,
) -> Result<usize>
where
  T: Transport + ?Sized,
{
  let capacity = buffer_size.payload_capacity();
  let mut buf: TransmitBuffer =
    Vec::<u8>::with_capacity(capacity.min(payload.len())).into();
  let mut progress = Progress::new(payload.len());

  while progress.remaining > 0 {
    let batch = progress.remaining.min(capacity);

    buf.clear();
    buf.extend_from_slice(&payload[progress.offset..progress.offset + batch]);

    let sent = match transport.transmit(&buf[..]) {
      Ok(sent) => sent,
      Err(err) => {
        tracing::debug!(error = %err, offset = progress.offset, "send failed");
        return Err(Error::Send(err));
      }
    };
    tracing::trace!(batch, sent, "transmitted chunk");

    if sent < batch {
      progress.sent += sent;
      tracing::debug!(
        batch,
        sent,
        total = progress.sent,
        "short write, dropping the rest of the payload"
      );
      break;
    }

    progress.advance(batch);
  }

  Ok(progress.sent)
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::{collections::VecDeque, io};

  use proptest::prelude::*;

  /// Records every chunk and answers with scripted results. Once the script
  /// runs out every chunk is fully accepted.
  #[derive(Default)]
  struct Scripted {
    chunks: Vec<Vec<u8>>,
    script: VecDeque<io::Result<usize>>,
  }

  impl Scripted {
    fn answering(script: impl IntoIterator<Item = io::Result<usize>>) -> Self {
      Self { chunks: Vec::new(), script: script.into_iter().collect() }
    }
  }

  impl Transport for Scripted {
    fn transmit(&mut self, chunk: &[u8]) -> io::Result<usize> {
      self.chunks.push(chunk.to_vec());
      self.script.pop_front().unwrap_or(Ok(chunk.len()))
    }

    fn receive(&mut self, _: &mut [u8]) -> io::Result<usize> {
      unreachable!("the sender never receives")
    }
  }

  fn size(n: usize) -> BufferSize {
    BufferSize::new(n).unwrap()
  }

  #[test]
  fn empty_payload_transmits_nothing() {
    let mut peer = Scripted::default();

    assert_eq!(send_chunked(&mut peer, b"", size(8)).unwrap(), 0);
    assert!(peer.chunks.is_empty());
  }

  #[test]
  fn small_payload_is_one_chunk() {
    let mut peer = Scripted::default();

    assert_eq!(send_chunked(&mut peer, b"ping", BufferSize::DEFAULT).unwrap(), 4);
    assert_eq!(peer.chunks, vec![b"ping".to_vec()]);
  }

  #[test]
  fn exactly_capacity_is_one_chunk() {
    let mut peer = Scripted::default();

    assert_eq!(send_chunked(&mut peer, b"abcd", size(5)).unwrap(), 4);
    assert_eq!(peer.chunks.len(), 1);
  }

  #[test]
  fn large_payload_is_split_at_capacity() {
    let mut peer = Scripted::default();

    assert_eq!(send_chunked(&mut peer, b"abcdefghij", size(5)).unwrap(), 10);
    assert_eq!(peer.chunks, vec![
      b"abcd".to_vec(),
      b"efgh".to_vec(),
      b"ij".to_vec()
    ]);
  }

  #[test]
  fn short_write_stops_transmitting() {
    let mut peer = Scripted::answering([Ok(4), Ok(1)]);

    let sent = send_chunked(&mut peer, b"abcdefghijkl", size(5)).unwrap();

    assert_eq!(sent, 5);
    assert_eq!(peer.chunks.len(), 2);
  }

  #[test]
  fn zero_byte_write_counts_as_short() {
    let mut peer = Scripted::answering([Ok(0)]);

    assert_eq!(send_chunked(&mut peer, b"abcdefgh", size(5)).unwrap(), 0);
    assert_eq!(peer.chunks.len(), 1);
  }

  #[test]
  fn failure_reports_no_count() {
    let mut peer = Scripted::answering([
      Ok(4),
      Err(io::Error::from_raw_os_error(libc::EPIPE)),
    ]);

    let err = send_chunked(&mut peer, b"abcdefghijkl", size(5)).unwrap_err();

    assert!(matches!(err, Error::Send(ref io) if io.raw_os_error() == Some(libc::EPIPE)));
    assert_eq!(err.to_string(), "send failed");
    assert_eq!(peer.chunks.len(), 2);
  }

  proptest! {
    #[test]
    fn cooperative_peer_gets_everything(
      payload in proptest::collection::vec(any::<u8>(), 0..600),
      buffer in 2usize..70,
    ) {
      let mut peer = Scripted::default();
      let capacity = buffer - 1;

      let sent = send_chunked(&mut peer, &payload, size(buffer)).unwrap();

      prop_assert_eq!(sent, payload.len());
      prop_assert_eq!(peer.chunks.len(), payload.len().div_ceil(capacity));
      prop_assert!(peer.chunks.iter().all(|c| !c.is_empty() && c.len() <= capacity));
      prop_assert_eq!(peer.chunks.concat(), payload);
    }

    #[test]
    fn chunk_boundaries_are_deterministic(
      payload in proptest::collection::vec(any::<u8>(), 0..300),
      buffer in 2usize..40,
    ) {
      let mut first = Scripted::default();
      let mut second = Scripted::default();

      send_chunked(&mut first, &payload, size(buffer)).unwrap();
      send_chunked(&mut second, &payload, size(buffer)).unwrap();

      prop_assert_eq!(first.chunks, second.chunks);
    }

    #[test]
    fn short_write_total_is_prefix_plus_partial(
      full_chunks in 0usize..5,
      partial in 0usize..4,
    ) {
      // Four-byte chunks; the peer takes `full_chunks` whole chunks and then
      // only `partial` bytes of the next one.
      let payload = vec![7u8; (full_chunks + 3) * 4];
      let script = std::iter::repeat_with(|| Ok(4))
        .take(full_chunks)
        .chain([Ok(partial)]);
      let mut peer = Scripted::answering(script);

      let sent = send_chunked(&mut peer, &payload, size(5)).unwrap();

      prop_assert_eq!(sent, full_chunks * 4 + partial);
      prop_assert_eq!(peer.chunks.len(), full_chunks + 1);
    }
  }
}
