use std::os::fd::FromRawFd;

use crate::{Config, Connection, Error, Result, resolve::Endpoint, sys};

/// Connects to the first candidate that accepts.
///
/// Candidates are tried strictly in the order given. A candidate whose
/// socket cannot be created is skipped; a candidate whose connect fails has
/// its socket closed before moving on. The first success ends the search,
/// so on success exactly one socket is open and on failure none are.
///
/// Fails with [`Error::Connect`] once every candidate has been tried. The
/// error carries the last cause seen, and nothing is retried.
pub fn connect_first<I>(candidates: I, config: &Config) -> Result<Connection>
where
  I: IntoIterator<Item = Endpoint>,
{
  let mut attempts = 0;
  let mut last = None;

  for endpoint in candidates {
    attempts += 1;

    let fd = match sys::socket(
      endpoint.family(),
      endpoint.socket_type(),
      endpoint.protocol(),
    ) {
      Ok(fd) => fd,
      Err(err) => {
        tracing::debug!(%endpoint, error = %err, "socket creation failed");
        last = Some(err);
        continue;
      }
    };

    // SAFETY: `fd` was just returned by socket(2) and has no other owner.
    let conn = unsafe { Connection::from_raw_fd(fd) };

    let connected = sys::connect(fd, &endpoint.addr()).and_then(|()| {
      conn.set_timeouts(config.read_timeout, config.write_timeout)
    });

    match connected {
      Ok(()) => {
        tracing::debug!(%endpoint, fd, attempts, "connected");
        return Ok(conn);
      }
      Err(err) => {
        tracing::debug!(%endpoint, error = %err, "connect attempt failed");
        conn.close();
        last = Some(err);
      }
    }
  }

  Err(Error::Connect { attempts, last })
}
