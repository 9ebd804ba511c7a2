use crate::{BufferSize, Error, RecvFailure, Result, transport::Transport};

/// Performs one receive of at most
/// [`buffer_size.payload_capacity()`](BufferSize::payload_capacity) bytes.
///
/// Receiving nothing is a failure. A peer that closed the connection and a
/// genuine I/O error both come back as [`Error::Recv`]; the attached
/// [`RecvFailure`] says which one it was.
pub fn recv_once<T>(transport: &mut T, buffer_size: BufferSize) -> Result<Vec<u8>>
where
  T: Transport + ?Sized,
{
  let mut buf = vec![0; buffer_size.payload_capacity()];

  match transport.receive(&mut buf) {
    Ok(0) => {
      tracing::debug!("recv returned no bytes, peer closed");
      Err(Error::Recv(RecvFailure::PeerClosed))
    }
    Ok(received) => {
      tracing::trace!(received, "received");
      buf.truncate(received);
      Ok(buf)
    }
    Err(err) => {
      tracing::debug!(error = %err, "recv failed");
      Err(Error::Recv(RecvFailure::Io(err)))
    }
  }
}
