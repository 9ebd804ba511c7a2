fn main() {
  cfg_aliases::cfg_aliases! {
      linux: { target_os = "linux" },
      apple: { target_vendor = "apple" },
      bsd: { any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
      ) },
      sockaddr_len: { any(apple, bsd) },
      nosigpipe: { any(apple, target_os = "freebsd", target_os = "netbsd", target_os = "dragonfly") },
  }

  #[cfg(feature = "unstable_ffi")]
  {
    let bindings = match cbindgen::generate(".") {
      Ok(bindings) => bindings,
      Err(err) => panic!("failed to generate C bindings: {err}"),
    };

    if let Err(err) = std::fs::create_dir_all("./include") {
      panic!("failed to create ./include: {err}");
    }

    bindings.write_to_file("./include/syncnet.h");
  }
}
