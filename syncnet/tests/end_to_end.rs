mod common;

use std::{
  io::{Read, Write},
  net::TcpListener,
};

#[test]
fn ping_pong_on_9999() {
  common::init_tracing();
  let listener = TcpListener::bind("127.0.0.1:9999").unwrap();

  let heard = common::peer(listener, |mut stream| {
    let mut got = [0u8; 4];
    stream.read_exact(&mut got).unwrap();
    stream.write_all(b"pong").unwrap();
    // Hold the connection until the client closes.
    let _ = stream.read_to_end(&mut Vec::new());
    got
  });

  let h = syncnet::connect(9999, Some("127.0.0.1")).unwrap();

  assert_eq!(syncnet::send(&h, "ping").unwrap(), 4);
  assert_eq!(syncnet::recv(&h).unwrap(), "pong");
  assert_eq!(syncnet::close(h), 0);

  assert_eq!(&heard.recv_timeout(common::WAIT).unwrap(), b"ping");
}
