mod common;

use syncnet::{Client, Config, test_utils::loopback_listener};

#[test]
fn close_returns_zero() {
  let (listener, addr) = loopback_listener();
  let _peer = common::sink(listener);

  let conn = syncnet::connect(addr.port(), Some("127.0.0.1")).unwrap();
  assert_eq!(syncnet::close(conn), 0);
}

#[test]
fn peer_sees_the_close() {
  let (listener, addr) = loopback_listener();
  let received = common::sink(listener);
  let client = Client::new(Config::default());

  let conn = client.connect(addr.port(), Some("127.0.0.1")).unwrap();
  client.send(&conn, "bye").unwrap();
  assert_eq!(client.close(conn), 0);

  // The sink only returns once it has read to end of stream.
  assert_eq!(received.recv_timeout(common::WAIT).unwrap(), b"bye");
}

#[test]
fn dropping_closes_too() {
  let (listener, addr) = loopback_listener();
  let received = common::sink(listener);

  let conn = syncnet::connect(addr.port(), Some("127.0.0.1")).unwrap();
  drop(conn);

  assert!(received.recv_timeout(common::WAIT).unwrap().is_empty());
}
