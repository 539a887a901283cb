// stream.rs — Blocking Stream: owns the TCP socket lifecycle and timeouts.
//
// Connect with a short connect timeout, then widen to the operational
// timeout for every subsequent read/write. `socket2::Socket` is pulled in
// for `connect_timeout`, the one thing `std::net::TcpStream::connect`
// can't express on its own.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{Domain, Socket, Type};

use netdimm_proto::NetDimmError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// A connected, timeout-configured TCP stream to a NetDIMM device.
pub struct BlockingStream {
    inner: TcpStream,
}

impl BlockingStream {
    /// Connect to `(ip, port)` with a 1 s connect timeout, then raise the
    /// read/write timeout to 10 s for the lifetime of the connection.
    pub fn connect(addr: SocketAddr) -> Result<Self, NetDimmError> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, None)?;
        socket.connect_timeout(&addr.into(), CONNECT_TIMEOUT)?;
        socket.set_read_timeout(Some(OPERATION_TIMEOUT))?;
        socket.set_write_timeout(Some(OPERATION_TIMEOUT))?;
        Ok(Self { inner: socket.into() })
    }

    /// Read exactly `buf.len()` bytes, blocking as needed; short reads are
    /// retried until the buffer is full or an error (including a timeout)
    /// occurs.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), NetDimmError> {
        self.inner.read_exact(buf).map_err(NetDimmError::from)
    }

    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, NetDimmError> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Write the entire buffer, retrying partial writes to completion.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), NetDimmError> {
        self.inner.write_all(buf).map_err(NetDimmError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn connect_read_write_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut buf = [0u8; 5];
            sock.read_exact(&mut buf).unwrap();
            sock.write_all(&buf).unwrap();
        });

        let mut stream = BlockingStream::connect(addr).unwrap();
        stream.write_all(b"hello").unwrap();
        let echoed = stream.read_vec(5).unwrap();
        assert_eq!(echoed, b"hello");

        server.join().unwrap();
    }

    #[test]
    fn connect_to_closed_port_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = BlockingStream::connect(addr);
        assert!(result.is_err());
    }
}
